use shared::DashboardSummary;
use tracing::{debug, instrument};

use super::Dashboard;
use crate::{
    context::RequestContext, db::types::ReviewStatus, error::DashboardError,
    github::REPOSITORY_PAGE_SIZE,
};

pub const STATS_ENTRYPOINT: &str = "stats";

impl Dashboard {
    #[instrument(skip_all)]
    pub async fn try_summary(
        &self,
        ctx: &RequestContext,
    ) -> Result<DashboardSummary, DashboardError> {
        let user = self.resolver.session(ctx).await?;
        let client = self.resolver.client(ctx).await?;
        let viewer = self.resolver.viewer(ctx).await?;

        // Only `total_count` is read, a single item per page is enough
        let query = format!("author:{} type:pr", viewer.login);
        let (calendar, prs, repos, reviews) = tokio::join!(
            self.calendar(ctx, client.as_ref(), &viewer.login),
            client.search_pull_requests(&query, 1),
            client.list_repositories(REPOSITORY_PAGE_SIZE),
            self.reviews.count_reviews(&user.id, ReviewStatus::Completed),
        );
        let prs = prs.map_err(DashboardError::provider)?;
        let repos = repos.map_err(DashboardError::provider)?;
        let reviews = reviews.map_err(DashboardError::store)?;

        debug!(
            username = %viewer.login,
            calendar = calendar.is_some(),
            repos = repos.len(),
            "Dashboard summary sources joined"
        );

        Ok(DashboardSummary {
            total_repo: repos.len() as u64,
            total_contributions: calendar.map_or(0, |c| c.total_contributions),
            total_prs: prs.total_count,
            total_ai_reviews: reviews,
            username: viewer.login,
            avatar_url: viewer.avatar_url,
        })
    }

    /// Summary for the signed-in user, or [`DashboardSummary::unknown`] when
    /// any source fails. Computed once per request.
    pub async fn summary(&self, ctx: &RequestContext) -> DashboardSummary {
        ctx.summary
            .get_or_init(|| async {
                match self.try_summary(ctx).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        self.fallback(STATS_ENTRYPOINT, &e);
                        DashboardSummary::unknown()
                    }
                }
            })
            .await
            .clone()
    }
}
