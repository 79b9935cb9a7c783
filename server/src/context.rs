use std::sync::Arc;

use rocket::{
    request::{FromRequest, Outcome},
    Request,
};
use shared::{github::Viewer, ContributionCalendar, DashboardSummary};
use tokio::sync::OnceCell;

use crate::{
    db::types::{Credential, SessionUser},
    error::DashboardError,
    github::ProviderApi,
};

pub const SESSION_COOKIE: &str = "session_token";

/// State for one logical request.
///
/// Everything resolved through the context is computed at most once and the
/// outcome, success or failure, is replayed to later callers. A context is
/// never shared between requests; drop it and the memoised values go with it.
#[derive(Default)]
pub struct RequestContext {
    session_token: Option<String>,
    pub(crate) session: OnceCell<Result<SessionUser, DashboardError>>,
    pub(crate) credential: OnceCell<Result<Credential, DashboardError>>,
    pub(crate) client: OnceCell<Result<Arc<dyn ProviderApi>, DashboardError>>,
    pub(crate) viewer: OnceCell<Result<Viewer, DashboardError>>,
    pub(crate) calendar: OnceCell<Option<ContributionCalendar>>,
    pub(crate) summary: OnceCell<DashboardSummary>,
}

impl RequestContext {
    pub fn new(session_token: Option<String>) -> Self {
        Self {
            session_token: session_token.filter(|token| !token.trim().is_empty()),
            ..Default::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    fn from_headers(request: &Request<'_>) -> Self {
        let cookie = request
            .cookies()
            .get(SESSION_COOKIE)
            .map(|cookie| strip_signature(cookie.value()).to_string());
        let bearer = || {
            request
                .headers()
                .get_one("Authorization")
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string())
        };

        Self::new(cookie.or_else(bearer))
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("has_session_token", &self.session_token.is_some())
            .field("session", &self.session.get())
            .finish_non_exhaustive()
    }
}

// Signed session cookies look like `<token>.<signature>`
fn strip_signature(value: &str) -> &str {
    value.split_once('.').map_or(value, |(token, _)| token)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for &'r RequestContext {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let context = request.local_cache(|| RequestContext::from_headers(request));
        if context.session_token().is_none() {
            tracing::debug!(uri = %request.uri(), "No session token on request");
        }
        Outcome::Success(context)
    }
}
