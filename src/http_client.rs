use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Request, Response};
use std::fmt;
use std::sync::Arc;

use crate::auth::TokenSource;
use crate::error::ApiError;

/// Component name attached to every request/response log line
pub const LOG_COMPONENT: &str = "GTM";

/// Authenticated HTTP client.
/// Injects a bearer token from the token source and logs each exchange.
#[derive(Clone)]
pub struct GtmHttpClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Token source shared with the owning configured client
    token_source: Arc<dyn TokenSource>,

    /// Log tag
    component: &'static str,
}

impl fmt::Debug for GtmHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GtmHttpClient")
            .field("token_source", &self.token_source)
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

impl GtmHttpClient {
    /// Create a new HTTP client. Timeouts are the reqwest defaults.
    pub fn new(token_source: Arc<dyn TokenSource>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            token_source,
            component: LOG_COMPONENT,
        })
    }

    /// Execute a request with a bearer token attached.
    /// No retries: any failure is returned to the caller.
    pub async fn execute(&self, mut request: Request) -> Result<Response, ApiError> {
        let token = self.token_source.token().await?;
        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .context("Access token is not a valid header value")?;
        request.headers_mut().insert(AUTHORIZATION, value);

        let request_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(
            component = self.component,
            request_id = %request_id,
            method = %method,
            url = %url,
            headers = ?redacted(request.headers()),
            "{} API Request Details",
            self.component
        );

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    component = self.component,
                    request_id = %request_id,
                    error = %e,
                    url = %url,
                    "{} API Request failed",
                    self.component
                );
                return Err(ApiError::Http(e));
            }
        };

        let status = response.status();
        tracing::debug!(
            component = self.component,
            request_id = %request_id,
            status = %status,
            headers = ?response.headers(),
            "{} API Response Details",
            self.component
        );

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            component = self.component,
            request_id = %request_id,
            status = status.as_u16(),
            url = %url,
            response_body = %error_text,
            "HTTP request failed with error response"
        );

        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_text,
        })
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get the token source requests are signed with
    pub fn token_source(&self) -> &Arc<dyn TokenSource> {
        &self.token_source
    }
}

/// Copy of the headers safe to log
fn redacted(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer <redacted>"));
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenSource;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_with_token(token: &str) -> GtmHttpClient {
        GtmHttpClient::new(Arc::new(StaticTokenSource::new(token))).unwrap()
    }

    #[test]
    fn test_redacted_hides_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        headers.insert("x-other", HeaderValue::from_static("kept"));

        let safe = redacted(&headers);
        assert_eq!(safe.get(AUTHORIZATION).unwrap(), "Bearer <redacted>");
        assert_eq!(safe.get("x-other").unwrap(), "kept");
    }

    #[tokio::test]
    async fn test_execute_attaches_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let http = client_with_token("tok-123");
        let request = http
            .client()
            .get(format!("{}/ping", server.uri()))
            .build()
            .unwrap();

        let response = http.execute(request).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_execute_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/denied"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .expect(1)
            .mount(&server)
            .await;

        let http = client_with_token("tok-123");
        let request = http
            .client()
            .get(format!("{}/denied", server.uri()))
            .build()
            .unwrap();

        match http.execute(request).await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("expected status error, got {:?}", other.map(|r| r.status())),
        }
    }

    #[tokio::test]
    async fn test_invalid_token_is_internal_error() {
        let http = client_with_token("bad\ntoken");
        let request = http.client().get("http://localhost/never").build().unwrap();

        let err = http.execute(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
