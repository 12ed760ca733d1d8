// Token sources: static, authorized user, and gcp_auth backed

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::refresh;
use super::types::{AuthorizedUserSecret, Token};
use crate::error::AuthError;

/// Which strategy produced a token source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSourceKind {
    /// Configured `access_token`, never refreshed
    Static,
    /// Service account key from configured `credentials`
    ServiceAccount,
    /// Authorized user secret from configured `credentials`
    AuthorizedUser,
    /// Application default credentials discovered from the environment
    Default,
}

impl fmt::Display for TokenSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenSourceKind::Static => "access_token",
            TokenSourceKind::ServiceAccount => "service_account",
            TokenSourceKind::AuthorizedUser => "authorized_user",
            TokenSourceKind::Default => "default",
        };
        f.write_str(name)
    }
}

/// Produces bearer tokens on demand
#[async_trait]
pub trait TokenSource: Send + Sync + fmt::Debug {
    /// Return a currently valid token, refreshing if the source supports it
    async fn token(&self) -> Result<Token, AuthError>;

    fn kind(&self) -> TokenSourceKind;
}

/// Always returns the same token
pub struct StaticTokenSource {
    token: Token,
}

impl StaticTokenSource {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: Token::new(access_token, None),
        }
    }
}

impl fmt::Debug for StaticTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenSource").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> Result<Token, AuthError> {
        Ok(self.token.clone())
    }

    fn kind(&self) -> TokenSourceKind {
        TokenSourceKind::Static
    }
}

/// Refreshes tokens from an authorized user secret, reusing each one until it expires
pub struct AuthorizedUserTokenSource {
    secret: AuthorizedUserSecret,
    client: Client,
    current: RwLock<Option<Token>>,
}

impl AuthorizedUserTokenSource {
    pub fn new(secret: AuthorizedUserSecret, client: Client) -> Self {
        Self {
            secret,
            client,
            current: RwLock::new(None),
        }
    }
}

impl fmt::Debug for AuthorizedUserTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserTokenSource")
            .field("token_uri", &self.secret.token_uri)
            .field("quota_project_id", &self.secret.quota_project_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for AuthorizedUserTokenSource {
    async fn token(&self) -> Result<Token, AuthError> {
        {
            let current = self.current.read().await;
            if let Some(ref token) = *current {
                if !token.is_expired() {
                    return Ok(token.clone());
                }
            }
        }

        // Hold the write lock across the exchange so only one refresh runs at a time
        let mut current = self.current.write().await;
        if let Some(ref token) = *current {
            if !token.is_expired() {
                return Ok(token.clone());
            }
        }

        let token = refresh::refresh_authorized_user(&self.client, &self.secret)
            .await
            .map_err(|e| AuthError::TokenRequest(format!("{:#}", e)))?;
        *current = Some(token.clone());
        Ok(token)
    }

    fn kind(&self) -> TokenSourceKind {
        TokenSourceKind::AuthorizedUser
    }
}

/// Delegates to a `gcp_auth` provider bound to a fixed scope list.
/// `gcp_auth` caches and refreshes tokens itself.
pub struct GcpTokenSource {
    provider: Arc<dyn gcp_auth::TokenProvider>,
    scopes: Vec<String>,
    kind: TokenSourceKind,
}

impl GcpTokenSource {
    pub fn new(
        provider: Arc<dyn gcp_auth::TokenProvider>,
        scopes: &[String],
        kind: TokenSourceKind,
    ) -> Self {
        Self {
            provider,
            scopes: scopes.to_vec(),
            kind,
        }
    }
}

impl fmt::Debug for GcpTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcpTokenSource")
            .field("scopes", &self.scopes)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for GcpTokenSource {
    async fn token(&self) -> Result<Token, AuthError> {
        let scopes: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        let token = self
            .provider
            .token(&scopes)
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?;

        Ok(Token::new(token.as_str(), None))
    }

    fn kind(&self) -> TokenSourceKind {
        self.kind
    }
}
