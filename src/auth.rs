use crate::http_utils::{ApiError, HttpClient};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub const TOKEN_PATH: &str = "/authentication/v2/token";
pub const TOKEN_PATH_SEGMENTS: [&str; 3] = ["authentication", "v2", "token"];
pub const GRANT_TYPE: &str = "client_credentials";
pub const TOKEN_SCOPE: &str = "data:read data:write";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Authentication failed with status {status}: {body}")]
    AuthenticationFailed { status: StatusCode, body: String },
    #[error("Invalid authentication URL: {0}")]
    InvalidUrl(String),
    #[error("Token lifetime of {expires_in}s is out of range")]
    InvalidTokenLifetime { expires_in: i64 },
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::HttpError(e) => AuthError::HttpError(e),
            ApiError::JsonError(e) => AuthError::JsonError(e),
            ApiError::InvalidUrl(url) => AuthError::InvalidUrl(url),
            ApiError::RemoteRequest { status, body, .. } => {
                AuthError::AuthenticationFailed { status, body }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime of the token in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Performs the two-legged client-credentials exchange.
pub struct AuthClient {
    client_id: String,
    client_secret: String,
}

impl AuthClient {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_configuration(configuration: &crate::configuration::Configuration) -> Self {
        Self::new(configuration.client_id(), configuration.client_secret())
    }

    pub async fn request_token(&self, http: &HttpClient) -> Result<TokenResponse, AuthError> {
        tracing::debug!(
            "Authenticating with token URL: {}",
            http.url(&TOKEN_PATH_SEGMENTS)
        );
        tracing::debug!("Client ID: {}", &self.client_id);

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", GRANT_TYPE),
            ("scope", TOKEN_SCOPE),
        ];

        match http
            .post_form::<TokenResponse, _>(&TOKEN_PATH_SEGMENTS, &params)
            .await
        {
            Ok(token_response) => {
                tracing::debug!(
                    "Authentication successful, token expires in {}s",
                    token_response.expires_in
                );
                Ok(token_response)
            }
            Err(e) => {
                let e = AuthError::from(e);
                if let AuthError::AuthenticationFailed { status, body } = &e {
                    tracing::error!(
                        "Authentication request failed with status {}: {}",
                        status,
                        body
                    );
                }
                Err(e)
            }
        }
    }
}
