// Authentication types

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Google OAuth2 token endpoint used when a document does not name one
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Parsed Google credentials document, discriminated by its `type` field
#[derive(Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsFile {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUserSecret),
}

impl CredentialsFile {
    /// Document type as written in the `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialsFile::ServiceAccount(_) => "service_account",
            CredentialsFile::AuthorizedUser(_) => "authorized_user",
        }
    }
}

/// Service account key file
#[derive(Deserialize, Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    pub project_id: Option<String>,
    pub client_id: Option<String>,
    pub token_uri: Option<String>,
}

/// Authorized user secret written by `gcloud auth application-default login`
#[derive(Deserialize, Clone)]
pub struct AuthorizedUserSecret {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub quota_project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

/// Bearer token handed out by a token source
#[derive(Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    /// None when the token never expires or expiry is tracked elsewhere
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.access_token
    }

    /// Check if the token is past its expiry time
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            None => false,
            Some(exp) => Utc::now() >= exp,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// OAuth2 token endpoint response
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
}
