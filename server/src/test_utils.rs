use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::github::{RepositorySummary, SearchPage, Viewer};

use crate::{
    credentials::CredentialResolver,
    dashboard::Dashboard,
    db::{
        types::{Credential, ReviewStatus, SessionUser},
        CredentialStore, ReviewStore, SessionStore, GITHUB_PROVIDER_ID,
    },
    github::{ClientFactory, ProviderApi},
    metrics::DashboardMetrics,
};

pub const TOKEN: &str = "session-token";
pub const USER_ID: &str = "user-1";

/// GraphQL reply carrying a calendar with the given days, seven per week.
pub fn calendar_response(total: u64, days: &[(&str, u32)]) -> serde_json::Value {
    let weeks: Vec<_> = days
        .chunks(7)
        .map(|week| {
            let days: Vec<_> = week
                .iter()
                .map(|(date, count)| {
                    serde_json::json!({
                        "contributionCount": count,
                        "date": date,
                        "color": "#ebedf0",
                    })
                })
                .collect();
            serde_json::json!({ "contributionDays": days })
        })
        .collect();

    serde_json::json!({
        "data": {
            "user": {
                "contributionsCollection": {
                    "contributionCalendar": {
                        "totalContributions": total,
                        "weeks": weeks,
                    }
                }
            }
        }
    })
}

#[derive(Default)]
pub struct MockStore {
    sessions: Mutex<HashMap<String, SessionUser>>,
    credentials: Mutex<HashMap<(String, String), Credential>>,
    reviews: Mutex<Vec<(String, ReviewStatus, DateTime<Utc>)>>,
    last_since: Mutex<Option<DateTime<Utc>>>,
    sessions_down: AtomicBool,
    reviews_down: AtomicBool,
    pub session_calls: AtomicUsize,
    pub credential_calls: AtomicUsize,
    pub review_count_calls: AtomicUsize,
    pub review_list_calls: AtomicUsize,
}

impl MockStore {
    pub fn add_session(&self, token: &str, user_id: &str) {
        self.sessions.lock().unwrap().insert(
            token.to_string(),
            SessionUser {
                id: user_id.to_string(),
                name: "Mona Lisa".to_string(),
                email: "mona@example.com".to_string(),
            },
        );
    }

    pub fn link(&self, user_id: &str, token: &str) {
        self.credentials.lock().unwrap().insert(
            (user_id.to_string(), GITHUB_PROVIDER_ID.to_string()),
            Credential::new(token),
        );
    }

    pub fn add_review(&self, status: ReviewStatus, created_at: DateTime<Utc>) {
        self.reviews
            .lock()
            .unwrap()
            .push((USER_ID.to_string(), status, created_at));
    }

    pub fn fail_sessions(&self) {
        self.sessions_down.store(true, Ordering::SeqCst);
    }

    pub fn fail_reviews(&self) {
        self.reviews_down.store(true, Ordering::SeqCst);
    }

    /// Lower bound of the last `reviews_created_since` call.
    pub fn review_since(&self) -> Option<DateTime<Utc>> {
        *self.last_since.lock().unwrap()
    }
}

#[async_trait]
impl SessionStore for MockStore {
    async fn find_session(&self, token: &str) -> anyhow::Result<Option<SessionUser>> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        if self.sessions_down.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(self.sessions.lock().unwrap().get(token).cloned())
    }
}

#[async_trait]
impl CredentialStore for MockStore {
    async fn find_credential(
        &self,
        user_id: &str,
        provider_id: &str,
    ) -> anyhow::Result<Option<Credential>> {
        self.credential_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), provider_id.to_string()))
            .cloned())
    }
}

#[async_trait]
impl ReviewStore for MockStore {
    async fn count_reviews(&self, user_id: &str, status: ReviewStatus) -> anyhow::Result<u64> {
        self.review_count_calls.fetch_add(1, Ordering::SeqCst);
        if self.reviews_down.load(Ordering::SeqCst) {
            anyhow::bail!("relation \"reviews\" does not exist");
        }
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|(user, s, _)| user == user_id && *s == status)
            .count() as u64)
    }

    async fn reviews_created_since(
        &self,
        user_id: &str,
        status: ReviewStatus,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DateTime<Utc>>> {
        self.review_list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_since.lock().unwrap() = Some(since);
        if self.reviews_down.load(Ordering::SeqCst) {
            anyhow::bail!("relation \"reviews\" does not exist");
        }
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|(user, s, created_at)| user == user_id && *s == status && *created_at >= since)
            .map(|(_, _, created_at)| *created_at)
            .collect())
    }
}

pub struct MockGithub {
    viewer: Viewer,
    calendar: Option<serde_json::Value>,
    pr_total: u64,
    pr_created_at: Vec<DateTime<Utc>>,
    repositories: usize,
    search_down: bool,
    repos_down: bool,
    searches: Mutex<Vec<(String, u8)>>,
    variables: Mutex<Option<serde_json::Value>>,
    pub viewer_calls: AtomicUsize,
    pub graphql_calls: AtomicUsize,
    pub repo_calls: AtomicUsize,
}

impl Default for MockGithub {
    fn default() -> Self {
        Self {
            viewer: Viewer {
                login: "octocat".to_string(),
                avatar_url: Some("https://avatars.githubusercontent.com/u/583231".to_string()),
            },
            calendar: Some(calendar_response(0, &[])),
            pr_total: 0,
            pr_created_at: vec![],
            repositories: 0,
            search_down: false,
            repos_down: false,
            searches: Mutex::new(vec![]),
            variables: Mutex::new(None),
            viewer_calls: AtomicUsize::new(0),
            graphql_calls: AtomicUsize::new(0),
            repo_calls: AtomicUsize::new(0),
        }
    }
}

impl MockGithub {
    pub fn with_calendar(mut self, response: serde_json::Value) -> Self {
        self.calendar = Some(response);
        self
    }

    pub fn failing_graphql(mut self) -> Self {
        self.calendar = None;
        self
    }

    pub fn with_pull_requests(mut self, total: u64, created_at: Vec<DateTime<Utc>>) -> Self {
        self.pr_total = total;
        self.pr_created_at = created_at;
        self
    }

    pub fn with_repositories(mut self, amount: usize) -> Self {
        self.repositories = amount;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.search_down = true;
        self
    }

    pub fn failing_repositories(mut self) -> Self {
        self.repos_down = true;
        self
    }

    pub fn searches(&self) -> Vec<(String, u8)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn last_variables(&self) -> Option<serde_json::Value> {
        self.variables.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderApi for MockGithub {
    async fn authenticated_user(&self) -> anyhow::Result<Viewer> {
        self.viewer_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.viewer.clone())
    }

    async fn search_pull_requests(&self, query: &str, per_page: u8) -> anyhow::Result<SearchPage> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), per_page));
        if self.search_down {
            anyhow::bail!("API rate limit exceeded");
        }
        Ok(SearchPage {
            total_count: self.pr_total,
            created_at: self
                .pr_created_at
                .iter()
                .take(per_page as usize)
                .copied()
                .collect(),
        })
    }

    async fn list_repositories(&self, per_page: u8) -> anyhow::Result<Vec<RepositorySummary>> {
        self.repo_calls.fetch_add(1, Ordering::SeqCst);
        if self.repos_down {
            anyhow::bail!("Bad credentials");
        }
        Ok((0..self.repositories.min(per_page as usize))
            .map(|i| RepositorySummary {
                full_name: format!("octocat/repo-{i}"),
            })
            .collect())
    }

    async fn graphql(
        &self,
        _query: &str,
        variables: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        self.graphql_calls.fetch_add(1, Ordering::SeqCst);
        *self.variables.lock().unwrap() = Some(variables);
        self.calendar
            .clone()
            .ok_or_else(|| anyhow::anyhow!("operation timed out"))
    }
}

pub struct MockFactory {
    github: Arc<MockGithub>,
    pub build_calls: AtomicUsize,
    pub tokens: Mutex<Vec<String>>,
}

impl ClientFactory for MockFactory {
    fn build(&self, credential: &Credential) -> anyhow::Result<Arc<dyn ProviderApi>> {
        self.build_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        Ok(self.github.clone())
    }
}

pub struct Fixture {
    pub store: Arc<MockStore>,
    pub github: Arc<MockGithub>,
    pub factory: Arc<MockFactory>,
}

impl Fixture {
    /// Signed-in user with a linked GitHub account.
    pub fn linked() -> Self {
        let fixture = Self::unlinked();
        fixture.store.link(USER_ID, "gho_token");
        fixture
    }

    /// Signed-in user without a GitHub account.
    pub fn unlinked() -> Self {
        let store = Arc::new(MockStore::default());
        store.add_session(TOKEN, USER_ID);
        Self::with_parts(store, MockGithub::default())
    }

    pub fn with_github(self, github: MockGithub) -> Self {
        Self::with_parts(self.store, github)
    }

    fn with_parts(store: Arc<MockStore>, github: MockGithub) -> Self {
        let github = Arc::new(github);
        let factory = Arc::new(MockFactory {
            github: github.clone(),
            build_calls: AtomicUsize::new(0),
            tokens: Mutex::new(vec![]),
        });
        Self {
            store,
            github,
            factory,
        }
    }

    pub fn resolver(&self) -> CredentialResolver {
        CredentialResolver::new(self.store.clone(), self.store.clone(), self.factory.clone())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(
            self.resolver(),
            self.store.clone(),
            DashboardMetrics::new().unwrap(),
        )
    }
}
