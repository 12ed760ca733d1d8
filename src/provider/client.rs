// Provider configuration: credentials in, configured API client out

use std::fmt;
use std::sync::Arc;

use super::fields::ProviderFields;
use super::{ATTR_ACCESS_TOKEN, ATTR_CREDENTIALS};
use crate::auth::{default_scopes, CredentialResolver, TokenSource, TokenSourceKind};
use crate::error::ConfigError;
use crate::http_client::GtmHttpClient;
use crate::tagmanager::TagManagerClient;
use crate::version;

/// Configuration used to instantiate the Google Tag Manager API client.
/// Holds at most one credential input.
#[derive(Clone, Default)]
pub struct Config {
    pub credentials: Option<String>,
    pub access_token: Option<String>,
    pub scopes: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("has_credentials", &self.credentials.is_some())
            .field("has_access_token", &self.access_token.is_some())
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl Config {
    /// Pick the credential source: `access_token` if set, else `credentials`, else neither
    pub fn from_fields(fields: &ProviderFields) -> Self {
        let mut config = Config::default();

        if let Some(v) = fields.get_ok(ATTR_ACCESS_TOKEN) {
            config.access_token = Some(v.to_string());
        } else if let Some(v) = fields.get_ok(ATTR_CREDENTIALS) {
            config.credentials = Some(v.to_string());
        }

        config
    }

    /// Requested scopes, falling back to the Tag Manager publish scope
    pub fn effective_scopes(&self) -> Vec<String> {
        if self.scopes.is_empty() {
            default_scopes()
        } else {
            self.scopes.clone()
        }
    }

    /// Resolve credentials and build the client handle.
    /// Nothing is returned unless every step succeeds.
    pub async fn load_and_validate(
        &self,
        resolver: &CredentialResolver,
        terraform_version: &str,
    ) -> Result<GtmClient, ConfigError> {
        let scopes = self.effective_scopes();
        let token_source = resolver
            .resolve(
                self.access_token.as_deref(),
                self.credentials.as_deref(),
                &scopes,
            )
            .await?;

        let http = GtmHttpClient::new(token_source.clone())?;
        let user_agent = version::user_agent(terraform_version);

        tracing::info!("Instantiating GTM client...");
        let tag_manager = TagManagerClient::new(http.clone(), user_agent.clone());

        Ok(GtmClient {
            user_agent,
            token_source,
            http,
            tag_manager,
        })
    }
}

/// Configured provider handle passed to resource and data source callbacks
#[derive(Debug, Clone)]
pub struct GtmClient {
    user_agent: String,
    token_source: Arc<dyn TokenSource>,
    http: GtmHttpClient,
    tag_manager: TagManagerClient,
}

impl GtmClient {
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn token_source(&self) -> &Arc<dyn TokenSource> {
        &self.token_source
    }

    /// Strategy the credentials were resolved with
    pub fn auth_kind(&self) -> TokenSourceKind {
        self.token_source.kind()
    }

    pub fn http(&self) -> &GtmHttpClient {
        &self.http
    }

    pub fn tag_manager(&self) -> &TagManagerClient {
        &self.tag_manager
    }
}
