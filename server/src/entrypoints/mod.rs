use rocket::fairing::AdHoc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod dashboard;
pub mod types;

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard::get_stats,
        dashboard::get_activity,
        dashboard::get_contributions,
    ),
    components(schemas(
        types::DashboardStatsResponse,
        types::MonthlyActivityResponse,
        types::ContributionCalendarResponse,
        types::ContributionWeekResponse,
        types::ContributionDayResponse,
    )),
    tags((name = "dashboard", description = "Statistics for the signed-in user"))
)]
struct ApiDoc;

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket.attach(dashboard::stage()).mount(
            "/",
            SwaggerUi::new("/swagger-ui/<_..>").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
    })
}
