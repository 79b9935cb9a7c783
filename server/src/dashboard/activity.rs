use chrono::{DateTime, Utc};
use shared::{MonthWindow, MonthlyBucket};
use tracing::{instrument, warn};

use super::Dashboard;
use crate::{context::RequestContext, db::types::ReviewStatus, error::DashboardError};

pub const ACTIVITY_ENTRYPOINT: &str = "activity";

/// Search page size for pull requests inside the window. Anything past the
/// first page is not counted.
pub const PULL_REQUEST_PAGE_SIZE: u8 = 100;

impl Dashboard {
    /// Six monthly buckets, oldest first, ending at the month of `now`.
    ///
    /// Commits come from the contribution calendar, which is all-or-nothing:
    /// without it the result is empty rather than partially filled.
    #[instrument(skip(self, ctx))]
    pub async fn try_monthly_activity_at(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> Result<Vec<MonthlyBucket>, DashboardError> {
        let user = self.resolver.session(ctx).await?;
        let client = self.resolver.client(ctx).await?;
        let viewer = self.resolver.viewer(ctx).await?;

        let mut window = MonthWindow::ending_at(now);

        let Some(calendar) = self.calendar(ctx, client.as_ref(), &viewer.login).await else {
            warn!(username = %viewer.login, "No contribution calendar available");
            return Ok(vec![]);
        };
        for day in calendar.days() {
            window.add_commits(day.date, day.count);
        }

        let cutoff = window.cutoff();
        let query = format!(
            "author:{} type:pr created:>{}",
            viewer.login,
            cutoff.format("%Y-%m-%d")
        );
        let (prs, reviews) = tokio::join!(
            client.search_pull_requests(&query, PULL_REQUEST_PAGE_SIZE),
            self.reviews
                .reviews_created_since(&user.id, ReviewStatus::Completed, cutoff),
        );
        let prs = prs.map_err(DashboardError::provider)?;
        let reviews = reviews.map_err(DashboardError::store)?;

        for created_at in prs.created_at {
            window.add_pull_request(created_at);
        }
        for created_at in reviews {
            window.add_review(created_at);
        }

        Ok(window.into_buckets())
    }

    /// Like [`Dashboard::try_monthly_activity_at`], with failures logged and
    /// turned into an empty series so charts show a gap, not a flat line.
    pub async fn monthly_activity_at(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> Vec<MonthlyBucket> {
        match self.try_monthly_activity_at(ctx, now).await {
            Ok(buckets) => buckets,
            Err(e) => {
                self.fallback(ACTIVITY_ENTRYPOINT, &e);
                vec![]
            }
        }
    }

    pub async fn monthly_activity(&self, ctx: &RequestContext) -> Vec<MonthlyBucket> {
        self.monthly_activity_at(ctx, Utc::now()).await
    }
}
