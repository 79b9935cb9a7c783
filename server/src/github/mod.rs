use std::{sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use octocrab::service::middleware::retry::RetryConfig;
use shared::github::{RepositorySummary, SearchPage, Viewer};
use tracing::instrument;

use crate::db::types::Credential;

pub mod contributions;
mod types;

pub use types::*;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRIES: usize = 2;

/// Page size for the repository listing. Accounts with more repositories are
/// under-counted, only the first page is read.
pub const REPOSITORY_PAGE_SIZE: u8 = 100;

/// The subset of the GitHub API the dashboard reads.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    async fn authenticated_user(&self) -> anyhow::Result<Viewer>;

    async fn search_pull_requests(&self, query: &str, per_page: u8) -> anyhow::Result<SearchPage>;

    async fn list_repositories(&self, per_page: u8) -> anyhow::Result<Vec<RepositorySummary>>;

    async fn graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value>;
}

pub trait ClientFactory: Send + Sync {
    fn build(&self, credential: &Credential) -> anyhow::Result<Arc<dyn ProviderApi>>;
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Base URL for GitHub Enterprise, `None` for github.com.
    pub api_url: Option<String>,
    pub timeout: Duration,
    pub retries: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GithubClientFactory {
    config: GithubConfig,
}

impl GithubClientFactory {
    pub fn new(config: GithubConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for GithubClientFactory {
    fn build(&self, credential: &Credential) -> anyhow::Result<Arc<dyn ProviderApi>> {
        Ok(Arc::new(GithubClient::new(credential, &self.config)?))
    }
}

#[derive(Clone)]
pub struct GithubClient {
    octocrab: octocrab::Octocrab,
}

impl GithubClient {
    pub fn new(credential: &Credential, config: &GithubConfig) -> anyhow::Result<Self> {
        let mut builder = octocrab::Octocrab::builder()
            .personal_token(credential.expose().to_string())
            .set_connect_timeout(Some(config.timeout))
            .set_read_timeout(Some(config.timeout))
            .set_write_timeout(Some(config.timeout))
            .add_retry_config(RetryConfig::Simple(config.retries));
        if let Some(api_url) = &config.api_url {
            builder = builder.base_uri(api_url.as_str())?;
        }
        let octocrab = builder.build()?;

        Ok(Self { octocrab })
    }
}

#[async_trait]
impl ProviderApi for GithubClient {
    #[instrument(skip(self))]
    async fn authenticated_user(&self) -> anyhow::Result<Viewer> {
        let user = self
            .octocrab
            .current()
            .user()
            .await
            .context("Failed to get authenticated user")?;
        Ok(user.into())
    }

    #[instrument(skip(self))]
    async fn search_pull_requests(&self, query: &str, per_page: u8) -> anyhow::Result<SearchPage> {
        let page = self
            .octocrab
            .search()
            .issues_and_pull_requests(query)
            .per_page(per_page)
            .send()
            .await
            .context("Failed to search pull requests")?;
        Ok(page.into())
    }

    #[instrument(skip(self))]
    async fn list_repositories(&self, per_page: u8) -> anyhow::Result<Vec<RepositorySummary>> {
        let mut page = self
            .octocrab
            .current()
            .list_repos_for_authenticated_user()
            .per_page(per_page)
            .send()
            .await
            .context("Failed to list repositories")?;
        Ok(page.take_items().into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, query))]
    async fn graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        let payload = serde_json::json!({
            "query": query,
            "variables": variables,
        });
        Ok(self.octocrab.graphql(&payload).await?)
    }
}
