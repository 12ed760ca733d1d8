// Credential resolution: pick one token source in fixed priority order

use reqwest::Client;
use std::sync::Arc;

use super::credentials::{parse_document, read_path_or_contents};
use super::discovery::{ApplicationDefaultCredentials, CredentialDiscovery};
use super::token_source::{
    AuthorizedUserTokenSource, GcpTokenSource, StaticTokenSource, TokenSource, TokenSourceKind,
};
use super::types::CredentialsFile;
use crate::error::AuthError;

/// Scope requested when the caller supplies none
pub const DEFAULT_CLIENT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/tagmanager.publish"];

/// Default scopes as owned strings
pub fn default_scopes() -> Vec<String> {
    DEFAULT_CLIENT_SCOPES.iter().map(|s| s.to_string()).collect()
}

/// Turns configured credential inputs into a single token source.
///
/// Priority:
/// 1. `access_token` (literal or file) -> static token
/// 2. `credentials` (JSON or file) -> service account / authorized user
/// 3. application default credentials
pub struct CredentialResolver {
    discovery: Arc<dyn CredentialDiscovery>,
    client: Client,
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialResolver {
    pub fn new() -> Self {
        Self::with_discovery(Arc::new(ApplicationDefaultCredentials))
    }

    /// Use a custom ambient discovery mechanism
    pub fn with_discovery(discovery: Arc<dyn CredentialDiscovery>) -> Self {
        Self {
            discovery,
            client: Client::new(),
        }
    }

    /// Resolve credential inputs. Empty strings count as absent.
    pub async fn resolve(
        &self,
        access_token: Option<&str>,
        credentials: Option<&str>,
        scopes: &[String],
    ) -> Result<Arc<dyn TokenSource>, AuthError> {
        if let Some(access_token) = access_token.filter(|s| !s.is_empty()) {
            let contents = read_path_or_contents(access_token, "access token")?;

            tracing::info!("Authenticating using configured Google JSON 'access_token'...");
            tracing::info!("  -- Scopes: {:?}", scopes);
            return Ok(Arc::new(StaticTokenSource::new(contents)));
        }

        if let Some(credentials) = credentials.filter(|s| !s.is_empty()) {
            let contents = read_path_or_contents(credentials, "credentials")?;
            let source = self.source_from_document(&contents, scopes)?;

            tracing::info!("Authenticating using configured Google JSON 'credentials'...");
            tracing::info!("  -- Type: {}", source.kind());
            tracing::info!("  -- Scopes: {:?}", scopes);
            return Ok(source);
        }

        tracing::info!("Authenticating using DefaultClient...");
        tracing::info!("  -- Scopes: {:?}", scopes);
        self.discovery.discover(scopes).await
    }

    /// Build a token source from a credentials document bound to `scopes`
    fn source_from_document(
        &self,
        contents: &str,
        scopes: &[String],
    ) -> Result<Arc<dyn TokenSource>, AuthError> {
        match parse_document(contents)? {
            CredentialsFile::ServiceAccount(_) => {
                let account = gcp_auth::CustomServiceAccount::from_json(contents)
                    .map_err(|e| AuthError::CredentialParse(e.to_string()))?;
                Ok(Arc::new(GcpTokenSource::new(
                    Arc::new(account),
                    scopes,
                    TokenSourceKind::ServiceAccount,
                )))
            }
            CredentialsFile::AuthorizedUser(secret) => Ok(Arc::new(
                AuthorizedUserTokenSource::new(secret, self.client.clone()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Discovery that never finds anything and counts calls
    #[derive(Default)]
    struct NoAmbientCredentials {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CredentialDiscovery for NoAmbientCredentials {
        async fn discover(&self, _scopes: &[String]) -> Result<Arc<dyn TokenSource>, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::NoCredentials("nothing configured".to_string()))
        }
    }

    fn resolver() -> (CredentialResolver, Arc<NoAmbientCredentials>) {
        let discovery = Arc::new(NoAmbientCredentials::default());
        (
            CredentialResolver::with_discovery(discovery.clone()),
            discovery,
        )
    }

    #[test]
    fn test_default_scopes() {
        assert_eq!(
            default_scopes(),
            vec!["https://www.googleapis.com/auth/tagmanager.publish".to_string()]
        );
    }

    #[tokio::test]
    async fn test_literal_access_token() {
        let (resolver, discovery) = resolver();
        let source = resolver
            .resolve(Some("ya29.literal"), None, &default_scopes())
            .await
            .unwrap();

        assert_eq!(source.kind(), TokenSourceKind::Static);
        assert_eq!(source.token().await.unwrap().as_str(), "ya29.literal");
        assert_eq!(source.token().await.unwrap().as_str(), "ya29.literal");
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_access_token_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ya29.from-file\n").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let (resolver, _) = resolver();
        let source = resolver
            .resolve(Some(path.as_str()), None, &default_scopes())
            .await
            .unwrap();

        assert_eq!(source.token().await.unwrap().as_str(), "ya29.from-file\n");
    }

    #[tokio::test]
    async fn test_access_token_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let (resolver, _) = resolver();
        let err = resolver
            .resolve(Some(path.as_str()), None, &default_scopes())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::CredentialRead { .. }));
    }

    #[tokio::test]
    async fn test_access_token_takes_priority_over_credentials() {
        let (resolver, _) = resolver();
        let source = resolver
            .resolve(Some("tok-123"), Some("not even json"), &default_scopes())
            .await
            .unwrap();

        assert_eq!(source.kind(), TokenSourceKind::Static);
    }

    #[tokio::test]
    async fn test_empty_access_token_falls_through() {
        let (resolver, discovery) = resolver();
        let err = resolver
            .resolve(Some(""), Some(""), &default_scopes())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::NoCredentials(_)));
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_credentials() {
        let (resolver, discovery) = resolver();
        let err = resolver
            .resolve(None, Some("{\"type\": \"service_account\""), &default_scopes())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::CredentialParse(_)));
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsupported_credentials_type() {
        let (resolver, _) = resolver();
        let err = resolver
            .resolve(
                None,
                Some(r#"{"type":"external_account","audience":"aud"}"#),
                &default_scopes(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::CredentialParse(_)));
    }

    #[tokio::test]
    async fn test_authorized_user_credentials() {
        let (resolver, _) = resolver();
        let source = resolver
            .resolve(
                None,
                Some(
                    r#"{"type":"authorized_user","client_id":"id","client_secret":"secret","refresh_token":"refresh"}"#,
                ),
                &default_scopes(),
            )
            .await
            .unwrap();

        assert_eq!(source.kind(), TokenSourceKind::AuthorizedUser);
    }

    #[tokio::test]
    async fn test_no_credentials() {
        let (resolver, _) = resolver();
        let err = resolver
            .resolve(None, None, &default_scopes())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::NoCredentials(_)));
    }
}
