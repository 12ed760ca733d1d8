// Error handling module
// Defines the credential, configuration and API error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning credential inputs into a token source
#[derive(Error, Debug)]
pub enum AuthError {
    /// Input named a file that exists but could not be read
    #[error("Error loading {what} from {}: {source}", .path.display())]
    CredentialRead {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credentials document is malformed or of an unsupported type
    #[error("Unable to parse credentials: {0}")]
    CredentialParse(String),

    /// Default credentials discovery found nothing usable
    #[error("No default credentials found: {0}")]
    NoCredentials(String),

    /// Token source failed to produce a token
    #[error("Token request failed: {0}")]
    TokenRequest(String),
}

/// Errors surfaced while configuring the provider
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Credential resolution failed
    #[error("Configuration error: {0}")]
    Auth(#[from] AuthError),

    /// Provider configuration rejected by schema validation
    #[error("Invalid provider configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors from calls against the Tag Manager API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Could not obtain a bearer token
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Error status returned by the API
    #[error("Tag Manager API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Transport or decoding failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request could not be prepared
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
