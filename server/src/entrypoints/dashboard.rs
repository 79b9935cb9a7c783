use dashboard_stats_server::{context::RequestContext, dashboard::Dashboard};
use rocket::{serde::json::Json, State};

use super::types::{ContributionCalendarResponse, DashboardStatsResponse, MonthlyActivityResponse};

#[utoipa::path(context_path = "/api/dashboard", tag = "dashboard", responses(
    (status = 200, description = "Headline numbers, zeroed with username \"Unknown\" on failure", body = DashboardStatsResponse)
))]
#[get("/stats")]
pub async fn get_stats(
    ctx: &RequestContext,
    dashboard: &State<Dashboard>,
) -> Json<DashboardStatsResponse> {
    Json(dashboard.summary(ctx).await.into())
}

#[utoipa::path(context_path = "/api/dashboard", tag = "dashboard", responses(
    (status = 200, description = "Six months of activity, oldest first, empty on failure", body = [MonthlyActivityResponse])
))]
#[get("/activity")]
pub async fn get_activity(
    ctx: &RequestContext,
    dashboard: &State<Dashboard>,
) -> Json<Vec<MonthlyActivityResponse>> {
    let buckets = dashboard.monthly_activity(ctx).await;
    Json(buckets.into_iter().map(Into::into).collect())
}

#[utoipa::path(context_path = "/api/dashboard", tag = "dashboard", responses(
    (status = 200, description = "Contribution calendar for the trailing year", body = ContributionCalendarResponse),
    (status = 404, description = "Calendar is not available"),
))]
#[get("/contributions")]
pub async fn get_contributions(
    ctx: &RequestContext,
    dashboard: &State<Dashboard>,
) -> Option<Json<ContributionCalendarResponse>> {
    let calendar = dashboard.contribution_calendar(ctx).await?;
    Some(Json(calendar.into()))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing dashboard entrypoints", |rocket| async {
        rocket.mount(
            "/api/dashboard",
            rocket::routes![get_stats, get_activity, get_contributions],
        )
    })
}
