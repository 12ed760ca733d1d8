use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use crate::provider::{ATTR_ACCESS_TOKEN, ATTR_CREDENTIALS};
use crate::version::DEFAULT_TERRAFORM_VERSION;

/// Terraform provider for Google Tag Manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Service account key or authorized user JSON (inline or file path)
    #[arg(short = 'c', long, global = true)]
    pub credentials: Option<String>,

    /// OAuth2 access token (inline or file path)
    #[arg(short = 't', long, global = true)]
    pub access_token: Option<String>,

    /// Terraform version reported in the user agent
    #[arg(long, global = true, default_value = DEFAULT_TERRAFORM_VERSION)]
    pub terraform_version: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TF_LOG", global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the provider schema as JSON
    Schema,
    /// Validate the provider configuration and print diagnostics
    Validate,
    /// Resolve credentials and build the API client
    Configure,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub command: Command,
    pub log_level: String,
    pub terraform_version: String,

    /// Provider block assembled from the command line; env defaults are
    /// applied later by the provider schema
    pub provider_config: Value,
}

impl Settings {
    /// Load settings with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Self::from_args(CliArgs::parse()))
    }

    pub fn from_args(args: CliArgs) -> Self {
        let mut provider_config = Map::new();
        if let Some(credentials) = args.credentials {
            provider_config.insert(ATTR_CREDENTIALS.to_string(), Value::String(credentials));
        }
        if let Some(access_token) = args.access_token {
            provider_config.insert(ATTR_ACCESS_TOKEN.to_string(), Value::String(access_token));
        }

        Self {
            command: args.command,
            log_level: args.log_level,
            terraform_version: args.terraform_version,
            provider_config: Value::Object(provider_config),
        }
    }
}

/// Process environment lookup
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// First non-empty value among `keys`, checked in order
pub fn env_with_fallbacks_from<F>(keys: &[&str], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .find_map(|key| lookup(*key).filter(|v| !v.is_empty()))
}
