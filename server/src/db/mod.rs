use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocket::{
    fairing::{self, AdHoc},
    Build, Rocket,
};
use rocket_db_pools::Database;
use sqlx::PgPool;
use tracing::instrument;

pub mod types;

use self::types::{Credential, ReviewCreatedRecord, ReviewStatus, SessionUser};

pub const GITHUB_PROVIDER_ID: &str = "github";

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Unknown and expired sessions both come back as `None`.
    async fn find_session(&self, token: &str) -> anyhow::Result<Option<SessionUser>>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_credential(
        &self,
        user_id: &str,
        provider_id: &str,
    ) -> anyhow::Result<Option<Credential>>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn count_reviews(&self, user_id: &str, status: ReviewStatus) -> anyhow::Result<u64>;

    async fn reviews_created_since(
        &self,
        user_id: &str,
        status: ReviewStatus,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DateTime<Utc>>>;
}

// The tables belong to the auth and review subsystems, this service only reads them.
#[derive(Database, Clone, Debug)]
#[database("dashboard")]
pub struct DB(PgPool);

impl DB {
    // Pool that connects on first use, for wiring without a live database
    #[cfg(test)]
    pub(crate) fn lazy(url: &str) -> anyhow::Result<Self> {
        Ok(Self(PgPool::connect_lazy(url)?))
    }
}

#[async_trait]
impl SessionStore for DB {
    #[instrument(skip(self, token))]
    async fn find_session(&self, token: &str) -> anyhow::Result<Option<SessionUser>> {
        Ok(sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT u.id, u.name, u.email
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.0)
        .await?)
    }
}

#[async_trait]
impl CredentialStore for DB {
    #[instrument(skip(self))]
    async fn find_credential(
        &self,
        user_id: &str,
        provider_id: &str,
    ) -> anyhow::Result<Option<Credential>> {
        let token = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT access_token
            FROM accounts
            WHERE user_id = $1 AND provider_id = $2
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(provider_id)
        .fetch_optional(&self.0)
        .await?;

        Ok(token
            .flatten()
            .filter(|token| !token.trim().is_empty())
            .map(Credential::new))
    }
}

#[async_trait]
impl ReviewStore for DB {
    #[instrument(skip(self))]
    async fn count_reviews(&self, user_id: &str, status: ReviewStatus) -> anyhow::Result<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM reviews
            WHERE user_id = $1 AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(status.as_ref())
        .fetch_one(&self.0)
        .await?;

        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self))]
    async fn reviews_created_since(
        &self,
        user_id: &str,
        status: ReviewStatus,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DateTime<Utc>>> {
        let records = sqlx::query_as::<_, ReviewCreatedRecord>(
            r#"
            SELECT created_at
            FROM reviews
            WHERE user_id = $1 AND status = $2 AND created_at >= $3
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .bind(status.as_ref())
        .bind(since.naive_utc())
        .fetch_all(&self.0)
        .await?;

        Ok(records
            .into_iter()
            .map(|record| record.created_at.and_utc())
            .collect())
    }
}

async fn check_connection(rocket: Rocket<Build>) -> fairing::Result {
    match DB::fetch(&rocket) {
        Some(db) => match sqlx::query("SELECT 1").execute(&**db).await {
            Ok(_) => Ok(rocket),
            Err(e) => {
                rocket::error!("Failed to reach the dashboard database: {}", e);
                Err(rocket)
            }
        },
        None => Err(rocket),
    }
}

/// Pool and connection check. Fairings that read the pool at ignite must be
/// attached after these from the same stage, see `dashboard::stage`.
pub fn stage(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(DB::init())
        .attach(AdHoc::try_on_ignite("SQLx Connection Check", check_connection))
}
