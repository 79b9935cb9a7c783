pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Headline numbers shown at the top of the dashboard. Recomputed on every
/// request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_repo: u64,
    pub total_contributions: u64,
    pub total_prs: u64,
    pub total_ai_reviews: u64,
    pub username: String,
    pub avatar_url: Option<String>,
}

impl DashboardSummary {
    /// Zeroed summary shown when anything upstream failed.
    pub fn unknown() -> Self {
        Self {
            total_repo: 0,
            total_contributions: 0,
            total_prs: 0,
            total_ai_reviews: 0,
            username: UNKNOWN_USERNAME.to_string(),
            avatar_url: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }
}

impl Default for DashboardSummary {
    fn default() -> Self {
        Self::unknown()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub name: &'static str,
    pub commit: u64,
    pub prs: u64,
    pub review: u64,
}

impl MonthlyBucket {
    pub fn empty(name: &'static str) -> Self {
        Self {
            name,
            commit: 0,
            prs: 0,
            review: 0,
        }
    }
}
