use chrono::Utc;
use shared::ContributionCalendar;
use tracing::{error, instrument};

use super::{ContributionsData, GraphqlResponse, ProviderApi};
use crate::error::DashboardError;

pub const CONTRIBUTIONS_QUERY: &str = r#"
query($username: String!) {
  user(login: $username) {
    contributionsCollection {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
            color
          }
        }
      }
    }
  }
}
"#;

/// Contribution calendar of `username` over the trailing year.
#[instrument(skip(client))]
pub async fn try_fetch(
    client: &dyn ProviderApi,
    username: &str,
) -> Result<ContributionCalendar, DashboardError> {
    let value = client
        .graphql(
            CONTRIBUTIONS_QUERY,
            serde_json::json!({ "username": username }),
        )
        .await
        .map_err(DashboardError::provider)?;

    parse_calendar(value)
}

/// Like [`try_fetch`], but any failure is logged and reported as `None`:
/// an unknown calendar, not an empty one.
pub async fn fetch(client: &dyn ProviderApi, username: &str) -> Option<ContributionCalendar> {
    match try_fetch(client, username).await {
        Ok(calendar) => Some(calendar),
        Err(e) => {
            error!(
                username,
                error = %e,
                category = %e.category(),
                timestamp = %Utc::now().to_rfc3339(),
                "Error fetching contributions"
            );
            None
        }
    }
}

fn parse_calendar(value: serde_json::Value) -> Result<ContributionCalendar, DashboardError> {
    let response: GraphqlResponse<ContributionsData> = serde_json::from_value(value)
        .map_err(|e| DashboardError::provider(format!("Invalid response structure: {e}")))?;

    if let Some(first) = response.errors.first() {
        return Err(DashboardError::provider(format!(
            "GraphQL error: {}",
            first.message
        )));
    }

    response
        .data
        .and_then(|data| data.user)
        .map(|user| user.contributions_collection.contribution_calendar)
        .ok_or_else(|| DashboardError::provider("Invalid response structure: no user calendar"))
}
