// Token refresh logic for authorized user credentials

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use reqwest::Client;

use super::types::{AuthorizedUserSecret, Token, TokenResponse};

/// Seconds subtracted from the reported lifetime so a token is renewed before it lapses
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Exchange a refresh token for an access token at the document's token endpoint
pub async fn refresh_authorized_user(
    client: &Client,
    secret: &AuthorizedUserSecret,
) -> Result<Token> {
    tracing::info!("Refreshing access token for authorized user credentials...");

    tracing::debug!(
        "OAuth2 refresh request: url={}, client_id={}...",
        secret.token_uri,
        secret.client_id.chars().take(8).collect::<String>()
    );

    // Google's token endpoint takes form-urlencoded data
    let form = [
        ("grant_type", "refresh_token"),
        ("client_id", secret.client_id.as_str()),
        ("client_secret", secret.client_secret.as_str()),
        ("refresh_token", secret.refresh_token.as_str()),
    ];

    let response = client
        .post(&secret.token_uri)
        .form(&form)
        .send()
        .await
        .context("Failed to send OAuth2 refresh request")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();

        // Google returns {"error": ..., "error_description": ...}
        if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&error_text) {
            if let (Some(error_code), Some(error_desc)) = (
                error_json.get("error").and_then(|v| v.as_str()),
                error_json.get("error_description").and_then(|v| v.as_str()),
            ) {
                anyhow::bail!(
                    "OAuth2 refresh failed: {} - {}: {}",
                    status,
                    error_code,
                    error_desc
                );
            }
        }

        anyhow::bail!("OAuth2 refresh failed: {} - {}", status, error_text);
    }

    let data: TokenResponse = response
        .json()
        .await
        .context("Failed to parse OAuth2 refresh response")?;

    if data.access_token.is_empty() {
        anyhow::bail!("OAuth2 response does not contain access_token");
    }

    let expires_in = data.expires_in.unwrap_or(3600);
    let expires_at = i64::try_from(expires_in)
        .ok()
        .and_then(|secs| Duration::try_seconds(secs.saturating_sub(EXPIRY_BUFFER_SECS)))
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .with_context(|| format!("OAuth2 response has out of range expires_in: {}", expires_in))?;

    tracing::info!("Access token refreshed, expires: {}", expires_at.to_rfc3339());

    Ok(Token::new(data.access_token, Some(expires_at)))
}
