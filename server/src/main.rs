#[macro_use]
extern crate rocket;

mod entrypoints;

use std::{sync::Arc, time::Duration};

use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_prometheus::PrometheusMetrics;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use dashboard_stats_server::{
    dashboard, db,
    github::{GithubClientFactory, GithubConfig, DEFAULT_RETRIES, DEFAULT_TIMEOUT},
    metrics::DashboardMetrics,
};

#[derive(Debug, serde::Deserialize)]
pub struct Env {
    github_api_url: Option<String>,
    github_timeout_secs: Option<u64>,
    github_retries: Option<usize>,
    allowed_origins: Option<String>,
}

impl Env {
    fn github_config(&self) -> GithubConfig {
        GithubConfig {
            api_url: self.github_api_url.clone(),
            timeout: self
                .github_timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            retries: self.github_retries.unwrap_or(DEFAULT_RETRIES),
        }
    }

    fn allowed_origins(&self) -> AllowedOrigins {
        match &self.allowed_origins {
            Some(origins) => {
                let origins: Vec<&str> = origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .collect();
                AllowedOrigins::some_exact(&origins)
            }
            None => AllowedOrigins::all(),
        }
    }
}

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let env = envy::from_env::<Env>().expect("Failed to load environment variables");

    let prometheus = PrometheusMetrics::new();
    let metrics = DashboardMetrics::new().expect("Failed to create dashboard metrics");
    metrics
        .register(prometheus.registry())
        .expect("Failed to register dashboard metrics");

    let cors = CorsOptions {
        allowed_origins: env.allowed_origins(),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()
    .expect("Failed to create CORS fairing");

    let factory = Arc::new(GithubClientFactory::new(env.github_config()));

    let span = tracing::info_span!("Starting Rocket");
    let _enter = span.enter();

    rocket::build()
        .attach(dashboard::stage(db::stage, factory, metrics))
        .attach(prometheus.clone())
        .mount("/metrics", prometheus)
        .attach(cors)
        .attach(entrypoints::stage())
}
