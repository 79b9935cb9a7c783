use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: NaiveDate,
    #[serde(rename = "contributionCount")]
    pub count: u32,
    // Heatmap colour as reported by GitHub, e.g. "#216e39"
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub contribution_days: Vec<ContributionDay>,
}

/// Daily contribution counts for the trailing year, grouped into weeks the
/// way GitHub returns them. Boundary weeks may hold fewer than seven days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeek>,
}

impl ContributionCalendar {
    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> {
        self.weeks
            .iter()
            .flat_map(|week| week.contribution_days.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_graphql_calendar_shape() {
        let json = r##"{
            "totalContributions": 7,
            "weeks": [
                { "contributionDays": [
                    { "contributionCount": 3, "date": "2026-10-04", "color": "#40c463" },
                    { "contributionCount": 0, "date": "2026-10-05", "color": "#ebedf0" }
                ] },
                { "contributionDays": [
                    { "contributionCount": 4, "date": "2026-10-11" }
                ] }
            ]
        }"##;

        let calendar: ContributionCalendar = serde_json::from_str(json).unwrap();

        assert_eq!(calendar.total_contributions, 7);
        assert_eq!(calendar.weeks.len(), 2);
        assert_eq!(calendar.days().count(), 3);
        assert_eq!(calendar.days().map(|d| d.count).sum::<u32>(), 7);
        assert_eq!(calendar.weeks[1].contribution_days[0].color, None);
        assert_eq!(
            calendar.weeks[0].contribution_days[0].date,
            NaiveDate::from_ymd_opt(2026, 10, 4).unwrap()
        );
    }

    #[test]
    fn rejects_missing_days() {
        let json = r#"{ "totalContributions": 1, "weeks": [ {} ] }"#;
        assert!(serde_json::from_str::<ContributionCalendar>(json).is_err());
    }
}
