use std::sync::Arc;

use shared::github::Viewer;
use tracing::{debug, instrument};

use crate::{
    context::RequestContext,
    db::{
        types::{Credential, SessionUser},
        CredentialStore, SessionStore, GITHUB_PROVIDER_ID,
    },
    error::DashboardError,
    github::{ClientFactory, ProviderApi},
};

/// Turns the session on a request into a GitHub token and a client built
/// from it. Each step is memoised on the [`RequestContext`].
#[derive(Clone)]
pub struct CredentialResolver {
    sessions: Arc<dyn SessionStore>,
    credentials: Arc<dyn CredentialStore>,
    clients: Arc<dyn ClientFactory>,
}

impl CredentialResolver {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        credentials: Arc<dyn CredentialStore>,
        clients: Arc<dyn ClientFactory>,
    ) -> Self {
        Self {
            sessions,
            credentials,
            clients,
        }
    }

    #[instrument(skip_all)]
    pub async fn session(&self, ctx: &RequestContext) -> Result<SessionUser, DashboardError> {
        ctx.session
            .get_or_init(|| async {
                let token = ctx.session_token().ok_or(DashboardError::Unauthenticated)?;
                self.sessions
                    .find_session(token)
                    .await
                    .map_err(DashboardError::store)?
                    .ok_or(DashboardError::Unauthenticated)
            })
            .await
            .clone()
    }

    #[instrument(skip_all)]
    pub async fn resolve(&self, ctx: &RequestContext) -> Result<Credential, DashboardError> {
        ctx.credential
            .get_or_init(|| async {
                let user = self.session(ctx).await?;
                let credential = self
                    .credentials
                    .find_credential(&user.id, GITHUB_PROVIDER_ID)
                    .await
                    .map_err(DashboardError::store)?;
                debug!(user_id = %user.id, linked = credential.is_some(), "Credential lookup");
                credential.ok_or(DashboardError::ProviderNotLinked)
            })
            .await
            .clone()
    }

    #[instrument(skip_all)]
    pub async fn client(
        &self,
        ctx: &RequestContext,
    ) -> Result<Arc<dyn ProviderApi>, DashboardError> {
        ctx.client
            .get_or_init(|| async {
                let credential = self.resolve(ctx).await?;
                self.clients
                    .build(&credential)
                    .map_err(DashboardError::provider)
            })
            .await
            .clone()
    }

    /// The GitHub account behind the linked credential.
    #[instrument(skip_all)]
    pub async fn viewer(&self, ctx: &RequestContext) -> Result<Viewer, DashboardError> {
        ctx.viewer
            .get_or_init(|| async {
                let client = self.client(ctx).await?;
                client
                    .authenticated_user()
                    .await
                    .map_err(DashboardError::provider)
            })
            .await
            .clone()
    }
}
