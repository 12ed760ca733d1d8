// Tag Manager API v2 client

use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::error::Result;
use crate::http_client::GtmHttpClient;

/// Tag Manager API v2 base URL
pub const TAG_MANAGER_BASE_URL: &str = "https://www.googleapis.com/tagmanager/v2";

/// Tag Manager account
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub path: String,
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub tag_manager_url: Option<String>,
}

/// Response of `accounts.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsResponse {
    #[serde(default)]
    pub account: Vec<Account>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Client for the Tag Manager API, sending the provider's user agent on every call
#[derive(Debug, Clone)]
pub struct TagManagerClient {
    http: GtmHttpClient,
    base_url: String,
    user_agent: String,
}

impl TagManagerClient {
    pub fn new(http: GtmHttpClient, user_agent: impl Into<String>) -> Self {
        Self {
            http,
            base_url: TAG_MANAGER_BASE_URL.to_string(),
            user_agent: user_agent.into(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all accounts the credentials can see, following page tokens
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let url = format!("{}/accounts", self.base_url);
        let mut accounts = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut builder = self
                .http
                .client()
                .get(&url)
                .header(USER_AGENT, &self.user_agent);
            if let Some(ref token) = page_token {
                builder = builder.query(&[("pageToken", token)]);
            }

            let response = self.http.execute(builder.build()?).await?;
            let page: ListAccountsResponse = response.json().await?;
            accounts.extend(page.account);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    tracing::warn!("Tag Manager returned the same page token twice, stopping");
                    break;
                }
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!("Listed {} Tag Manager accounts", accounts.len());
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenSource;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TagManagerClient {
        let http = GtmHttpClient::new(Arc::new(StaticTokenSource::new("tok-123"))).unwrap();
        TagManagerClient::new(http, "test-agent/1.0").with_base_url(format!("{}/", server.uri()))
    }

    #[test]
    fn test_default_base_url() {
        let http = GtmHttpClient::new(Arc::new(StaticTokenSource::new("tok"))).unwrap();
        let client = TagManagerClient::new(http, "ua");
        assert_eq!(client.base_url(), TAG_MANAGER_BASE_URL);
        assert_eq!(client.user_agent(), "ua");
    }

    #[tokio::test]
    async fn test_list_accounts_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "account": [
                    {"path": "accounts/2", "accountId": "2", "name": "Second"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("user-agent", "test-agent/1.0"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "account": [
                    {"path": "accounts/1", "accountId": "1", "name": "First", "fingerprint": "abc"}
                ],
                "nextPageToken": "page-2"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let accounts = client(&server).list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].account_id, "1");
        assert_eq!(accounts[0].fingerprint.as_deref(), Some("abc"));
        assert_eq!(accounts[1].name, "Second");
    }

    #[tokio::test]
    async fn test_list_accounts_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let accounts = client(&server).list_accounts().await.unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_list_accounts_stops_on_repeated_page_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "account": [{"path": "accounts/1", "accountId": "1", "name": "Loop"}],
                "nextPageToken": "same"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let accounts = client(&server).list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
    }
}
