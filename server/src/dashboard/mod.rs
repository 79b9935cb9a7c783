use std::sync::Arc;

use chrono::Utc;
use rocket::{fairing::AdHoc, Build, Rocket};
use rocket_db_pools::Database;
use shared::ContributionCalendar;
use tracing::{error, instrument};

use crate::{
    context::RequestContext,
    credentials::CredentialResolver,
    db::{ReviewStore, DB},
    error::DashboardError,
    github::{contributions, ClientFactory, ProviderApi},
    metrics::DashboardMetrics,
};

mod activity;
mod stats;

pub use activity::ACTIVITY_ENTRYPOINT;
pub use stats::STATS_ENTRYPOINT;

pub const CALENDAR_ENTRYPOINT: &str = "contributions";

/// Reconciles GitHub data with the review store into what the dashboard
/// renders. The public entry points never fail: errors are logged, counted
/// and replaced by a safe default.
#[derive(Clone)]
pub struct Dashboard {
    resolver: CredentialResolver,
    reviews: Arc<dyn ReviewStore>,
    metrics: DashboardMetrics,
}

impl Dashboard {
    pub fn new(
        resolver: CredentialResolver,
        reviews: Arc<dyn ReviewStore>,
        metrics: DashboardMetrics,
    ) -> Self {
        Self {
            resolver,
            reviews,
            metrics,
        }
    }

    pub fn metrics(&self) -> &DashboardMetrics {
        &self.metrics
    }

    /// Contribution heatmap of the signed-in user, `None` when unknown.
    pub async fn contribution_calendar(&self, ctx: &RequestContext) -> Option<ContributionCalendar> {
        match self.try_contribution_calendar(ctx).await {
            Ok(calendar) => calendar,
            Err(e) => {
                self.fallback(CALENDAR_ENTRYPOINT, &e);
                None
            }
        }
    }

    #[instrument(skip_all)]
    async fn try_contribution_calendar(
        &self,
        ctx: &RequestContext,
    ) -> Result<Option<ContributionCalendar>, DashboardError> {
        let client = self.resolver.client(ctx).await?;
        let viewer = self.resolver.viewer(ctx).await?;
        Ok(self.calendar(ctx, client.as_ref(), &viewer.login).await)
    }

    // One GraphQL round trip per request, however many aggregations need it
    async fn calendar(
        &self,
        ctx: &RequestContext,
        client: &dyn ProviderApi,
        username: &str,
    ) -> Option<ContributionCalendar> {
        ctx.calendar
            .get_or_init(|| contributions::fetch(client, username))
            .await
            .clone()
    }

    fn fallback(&self, entrypoint: &'static str, e: &DashboardError) {
        let category = e.category();
        error!(
            entrypoint,
            error = %e,
            %category,
            timestamp = %Utc::now().to_rfc3339(),
            "Serving safe default"
        );
        self.metrics.record_fallback(entrypoint, category);
    }
}

/// Attaches the store fairings through `stores` and, in the same ignite
/// batch right after them, a fairing that manages the [`Dashboard`] built
/// on the pool. Ignite fairings attached from a nested stage run only after
/// every sibling has run, so the pool must not sit one stage deeper.
pub fn stage<F>(stores: F, clients: Arc<dyn ClientFactory>, metrics: DashboardMetrics) -> AdHoc
where
    F: FnOnce(Rocket<Build>) -> Rocket<Build> + Send + 'static,
{
    AdHoc::on_ignite("Dashboard Stage", move |rocket| async move {
        stores(rocket).attach(AdHoc::try_on_ignite(
            "Dashboard Service",
            move |rocket| async move {
                let Some(db) = DB::fetch(&rocket).cloned() else {
                    error!("Database pool is not attached");
                    return Err(rocket);
                };
                let db = Arc::new(db);
                let resolver = CredentialResolver::new(db.clone(), db.clone(), clients);
                Ok(rocket.manage(Dashboard::new(resolver, db, metrics)))
            },
        ))
    })
}
