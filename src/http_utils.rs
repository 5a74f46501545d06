//! HTTP utilities shared by the authentication and data-management clients.
//!
//! Wraps a single reqwest client, attaches the bearer token and default
//! headers, and turns non-success statuses into [`ApiError::RemoteRequest`].

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, error, trace};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("revit-version-report/", env!("CARGO_PKG_VERSION"));

/// Error emitted by calls against the remote API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("invalid base URL {0:?}")]
    InvalidUrl(String),
    #[error("request to {url} failed with status {status}: {body}")]
    RemoteRequest {
        status: StatusCode,
        url: String,
        body: String,
    },
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::RemoteRequest { status, .. } => Some(*status),
            ApiError::HttpError(e) => e.status(),
            ApiError::JsonError(_) | ApiError::InvalidUrl(_) => None,
        }
    }
}

/// Whether a successful response body may appear in trace logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyLogging {
    Raw,
    /// The body carries credentials.
    Redacted,
}

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone)]
pub struct HttpRequestConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Default headers to include with all requests
    pub default_headers: HashMap<String, String>,
}

impl HttpRequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());

        Self {
            base_url: base_url.into(),
            default_headers,
        }
    }

    pub fn from_configuration(configuration: &crate::configuration::Configuration) -> Self {
        Self::new(configuration.api_base_url())
    }
}

/// HTTP client wrapper with common request handling logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    config: HttpRequestConfig,
}

impl HttpClient {
    pub fn new(config: HttpRequestConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidUrl(config.base_url.clone()))?;
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Append `segments` to the base URL, percent-encoding each one, so an id
    /// containing `/`, `?` or `#` stays a single path segment.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base URLs are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make an authenticated GET request and decode the JSON response
    pub async fn get<T>(&self, segments: &[&str], auth_token: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(segments);
        debug!("GET {}", url);
        let request = self
            .client
            .get(url.clone())
            .header("Authorization", format!("Bearer {}", auth_token));
        self.execute_request(request, url, BodyLogging::Raw).await
    }

    /// Make a form-encoded POST request and decode the JSON response. The
    /// response body is never logged.
    pub async fn post_form<T, B>(&self, segments: &[&str], form: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(segments);
        debug!("POST {}", url);
        let request = self.client.post(url.clone()).form(form);
        self.execute_request(request, url, BodyLogging::Redacted).await
    }

    async fn execute_request<T>(
        &self,
        mut request: reqwest::RequestBuilder,
        url: Url,
        logging: BodyLogging,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Request to {} failed with status {}", url, status);
            trace!("Error response body: {}", response_text);
            return Err(ApiError::RemoteRequest {
                status,
                url: url.to_string(),
                body: response_text,
            });
        }

        if logging == BodyLogging::Raw {
            trace!("Raw response text for deserialization: {}", response_text);
        }
        serde_json::from_str::<T>(&response_text).map_err(|e| {
            match logging {
                BodyLogging::Raw => error!(
                    "Failed to deserialize response: {}. Raw response: {}",
                    e, response_text
                ),
                BodyLogging::Redacted => {
                    error!("Failed to deserialize response from {}: {}", url, e)
                }
            }
            ApiError::JsonError(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_http_client_config_default_headers() {
        let config = HttpRequestConfig::new("https://example.com");
        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(
            config.default_headers.get("User-Agent").map(String::as_str),
            Some(DEFAULT_USER_AGENT)
        );
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(HttpRequestConfig::new(server.uri())).unwrap();
        let value: Value = client.get(&["thing"], "abc").await.unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_remote_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let client = HttpClient::new(HttpRequestConfig::new(server.uri())).unwrap();
        let err = client.get::<Value>(&["missing"], "abc").await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        match err {
            ApiError::RemoteRequest { url, body, .. } => {
                assert!(url.ends_with("/missing"));
                assert_eq!(body, "nope");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_becomes_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = HttpClient::new(HttpRequestConfig::new(server.uri())).unwrap();
        let err = client.get::<Value>(&["x"], "abc").await.unwrap_err();
        assert!(matches!(err, ApiError::JsonError(_)));
    }

    #[test]
    fn test_url_encodes_each_segment() {
        let client = HttpClient::new(HttpRequestConfig::new("https://example.com/api")).unwrap();

        assert_eq!(
            client.url(&["folders", "urn:a/b?c#d", "contents"]).as_str(),
            "https://example.com/api/folders/urn:a%2Fb%3Fc%23d/contents"
        );
        let root = HttpClient::new(HttpRequestConfig::new("https://example.com/")).unwrap();
        assert_eq!(root.url(&["x"]).as_str(), "https://example.com/x");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let result = HttpClient::new(HttpRequestConfig::new("mailto:someone@example.com"));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
