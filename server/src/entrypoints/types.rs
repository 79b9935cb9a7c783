use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{
    ContributionCalendar, ContributionDay, ContributionWeek, DashboardSummary, MonthlyBucket,
};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    pub total_repo: u64,
    pub total_contributions: u64,
    #[serde(rename = "totalPRs")]
    pub total_prs: u64,
    #[serde(rename = "totalAIReviews")]
    pub total_ai_reviews: u64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<DashboardSummary> for DashboardStatsResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            total_repo: summary.total_repo,
            total_contributions: summary.total_contributions,
            total_prs: summary.total_prs,
            total_ai_reviews: summary.total_ai_reviews,
            username: summary.username,
            avatar_url: summary.avatar_url,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlyActivityResponse {
    /// Short month name, e.g. "Jan".
    pub name: String,
    pub commit: u64,
    pub prs: u64,
    pub review: u64,
}

impl From<MonthlyBucket> for MonthlyActivityResponse {
    fn from(bucket: MonthlyBucket) -> Self {
        Self {
            name: bucket.name.to_string(),
            commit: bucket.commit,
            prs: bucket.prs,
            review: bucket.review,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDayResponse {
    pub date: NaiveDate,
    pub contribution_count: u32,
    pub color: Option<String>,
}

impl From<ContributionDay> for ContributionDayResponse {
    fn from(day: ContributionDay) -> Self {
        Self {
            date: day.date,
            contribution_count: day.count,
            color: day.color,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeekResponse {
    pub contribution_days: Vec<ContributionDayResponse>,
}

impl From<ContributionWeek> for ContributionWeekResponse {
    fn from(week: ContributionWeek) -> Self {
        Self {
            contribution_days: week
                .contribution_days
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendarResponse {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeekResponse>,
}

impl From<ContributionCalendar> for ContributionCalendarResponse {
    fn from(calendar: ContributionCalendar) -> Self {
        Self {
            total_contributions: calendar.total_contributions,
            weeks: calendar.weeks.into_iter().map(Into::into).collect(),
        }
    }
}
