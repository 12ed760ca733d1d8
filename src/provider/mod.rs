// Provider definition: schema, configuration callback and resource tables

mod client;
mod fields;
mod schema;
mod validation;

pub use client::{Config, GtmClient};
pub use fields::ProviderFields;
pub use schema::{
    configured_string, Attribute, Diagnostic, ProviderSchema, Schema, Severity, ValidateFn,
    ValueType,
};
pub use validation::{validate_credentials, ValidationOutcome};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::CredentialResolver;
use crate::config::env_lookup;
use crate::error::ConfigError;
use crate::version::DEFAULT_TERRAFORM_VERSION;

pub const ATTR_CREDENTIALS: &str = "credentials";
pub const ATTR_ACCESS_TOKEN: &str = "access_token";

/// Environment fallbacks for `credentials`, first set wins
pub const CREDENTIALS_ENV_VARS: &[&str] = &[
    "GOOGLE_CREDENTIALS",
    "GOOGLE_CLOUD_KEYFILE_JSON",
    "GCLOUD_KEYFILE_JSON",
];

/// Environment fallback for `access_token`
pub const ACCESS_TOKEN_ENV_VARS: &[&str] = &["GOOGLE_OAUTH_ACCESS_TOKEN"];

/// Environment variable lookup
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configure call issued by the host
#[derive(Debug, Clone)]
pub struct ConfigureRequest {
    /// Version of the host tool, used in the user agent
    pub terraform_version: String,
    /// Provider block as a JSON object
    pub config: Value,
}

impl ConfigureRequest {
    pub fn new(config: Value) -> Self {
        Self {
            terraform_version: DEFAULT_TERRAFORM_VERSION.to_string(),
            config,
        }
    }

    pub fn with_terraform_version(mut self, version: impl Into<String>) -> Self {
        self.terraform_version = version.into();
        self
    }
}

/// Surface the host drives: schema, validation and configure.
/// The transport that carries these calls lives outside this crate.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Handle returned from `configure` and passed to resource callbacks
    type Client: Send;

    fn schema(&self) -> &ProviderSchema;

    fn validate_config(&self, config: &Value) -> Vec<Diagnostic>;

    async fn configure(&self, request: ConfigureRequest) -> Result<Self::Client, ConfigError>;
}

/// Schema for the GTM provider. Resource and data source tables are empty.
pub fn provider_schema() -> ProviderSchema {
    let provider = Schema::new()
        .with_attribute(
            ATTR_CREDENTIALS,
            Attribute::optional_string()
                .sensitive()
                .with_description(
                    "Service account key or authorized user JSON, inline or as a file path",
                )
                .with_env_defaults(CREDENTIALS_ENV_VARS)
                .with_validate(validate_credentials),
        )
        .with_attribute(
            ATTR_ACCESS_TOKEN,
            Attribute::optional_string()
                .sensitive()
                .with_description("OAuth2 access token, inline or as a file path")
                .with_env_defaults(ACCESS_TOKEN_ENV_VARS)
                .conflicts_with(&[ATTR_CREDENTIALS]),
        );

    ProviderSchema {
        provider,
        ..ProviderSchema::default()
    }
}

/// Google Tag Manager provider
pub struct GtmProvider {
    schema: ProviderSchema,
    resolver: CredentialResolver,
    env: EnvLookup,
}

impl Default for GtmProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GtmProvider {
    pub fn new() -> Self {
        Self {
            schema: provider_schema(),
            resolver: CredentialResolver::new(),
            env: Arc::new(env_lookup),
        }
    }

    /// Replace the credential resolver
    pub fn with_resolver(mut self, resolver: CredentialResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace environment variable lookup
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Field values after environment defaults are applied
    pub fn fields(&self, config: &Value) -> ProviderFields {
        ProviderFields::resolve(&self.schema.provider, config, |key| (self.env)(key))
    }
}

#[async_trait]
impl ResourceProvider for GtmProvider {
    type Client = GtmClient;

    fn schema(&self) -> &ProviderSchema {
        &self.schema
    }

    fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        self.schema
            .provider
            .validate_config(config, |key| (self.env)(key))
    }

    async fn configure(&self, request: ConfigureRequest) -> Result<GtmClient, ConfigError> {
        let diagnostics = self.validate_config(&request.config);
        for warning in diagnostics.iter().filter(|d| !d.is_error()) {
            tracing::warn!("{}", warning);
        }

        let errors: Vec<String> = diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(ToString::to_string)
            .collect();
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }

        let config = Config::from_fields(&self.fields(&request.config));
        tracing::debug!("Provider configuration: {:?}", config);

        config
            .load_and_validate(&self.resolver, &request.terraform_version)
            .await
    }
}
