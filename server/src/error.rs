use std::fmt::Display;

/// Coarse tag attached to logs and the fallback metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorCategory {
    Auth,
    Api,
    Store,
}

// Clone so a memoised failure can be handed to every caller within a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("No session found. Please log in.")]
    Unauthenticated,
    #[error("GitHub account not connected. Please connect your GitHub account.")]
    ProviderNotLinked,
    #[error("GitHub API request failed: {0}")]
    ProviderUnavailable(String),
    #[error("Review store query failed: {0}")]
    StoreUnavailable(String),
}

impl DashboardError {
    pub fn provider(error: impl Display) -> Self {
        Self::ProviderUnavailable(format!("{error:#}"))
    }

    pub fn store(error: impl Display) -> Self {
        Self::StoreUnavailable(format!("{error:#}"))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthenticated | Self::ProviderNotLinked => ErrorCategory::Auth,
            Self::ProviderUnavailable(_) => ErrorCategory::Api,
            Self::StoreUnavailable(_) => ErrorCategory::Store,
        }
    }
}
