use chrono::{DateTime, Utc};
use octocrab::models::{issues::Issue, Author, Repository};
use octocrab::Page;

use crate::GithubHandle;

/// The account the access token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub login: GithubHandle,
    pub avatar_url: Option<String>,
}

impl From<Author> for Viewer {
    fn from(author: Author) -> Self {
        Self {
            login: author.login,
            avatar_url: Some(author.avatar_url.to_string()),
        }
    }
}

/// One page of an issue search. `total_count` counts the whole result set,
/// which is usually larger than the page itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    pub total_count: u64,
    pub created_at: Vec<DateTime<Utc>>,
}

impl From<Page<Issue>> for SearchPage {
    fn from(mut page: Page<Issue>) -> Self {
        let items = page.take_items();
        Self {
            total_count: page.total_count.unwrap_or(items.len() as u64),
            created_at: items.into_iter().map(|issue| issue.created_at).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    pub full_name: String,
}

impl From<Repository> for RepositorySummary {
    fn from(repo: Repository) -> Self {
        Self {
            full_name: repo.full_name.unwrap_or(repo.name),
        }
    }
}
