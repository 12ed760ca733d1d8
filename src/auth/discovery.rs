// Application default credentials discovery

use async_trait::async_trait;
use std::sync::Arc;

use super::token_source::{GcpTokenSource, TokenSource, TokenSourceKind};
use crate::error::AuthError;

/// Ambient credential lookup used when nothing is configured explicitly
#[async_trait]
pub trait CredentialDiscovery: Send + Sync {
    async fn discover(&self, scopes: &[String]) -> Result<Arc<dyn TokenSource>, AuthError>;
}

/// Google application default credentials, as found by `gcp_auth`:
/// `GOOGLE_APPLICATION_CREDENTIALS`, the gcloud default credentials file,
/// the GCE metadata server, then the `gcloud` CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApplicationDefaultCredentials;

#[async_trait]
impl CredentialDiscovery for ApplicationDefaultCredentials {
    async fn discover(&self, scopes: &[String]) -> Result<Arc<dyn TokenSource>, AuthError> {
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| AuthError::NoCredentials(e.to_string()))?;

        Ok(Arc::new(GcpTokenSource::new(
            provider,
            scopes,
            TokenSourceKind::Default,
        )))
    }
}
