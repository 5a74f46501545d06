//! Bearer token cache.
//!
//! Holds at most one [`Credential`] and hands it out while it is still valid
//! outside the expiration buffer. Once inside the buffer (or when empty) the
//! credential is replaced wholesale by a fresh client-credentials exchange.

use crate::auth::{AuthClient, AuthError};
use crate::http_utils::HttpClient;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;

/// Seconds before expiry at which a token is considered stale.
pub const TOKEN_EXPIRATION_BUFFER_SECONDS: i64 = 60;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// `now < expires_at - buffer`
    pub fn is_valid_at(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        self.expires_at
            .checked_sub_signed(buffer)
            .is_some_and(|stale_at| now < stale_at)
    }
}

pub struct TokenCache {
    auth: AuthClient,
    clock: Arc<dyn Clock>,
    buffer: Duration,
    credential: Option<Credential>,
}

impl TokenCache {
    pub fn new(auth: AuthClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth,
            clock,
            buffer: Duration::seconds(TOKEN_EXPIRATION_BUFFER_SECONDS),
            credential: None,
        }
    }

    /// Seed the cache with a token obtained elsewhere, trusted for `lifetime`.
    pub fn with_access_token(mut self, token: impl Into<String>, lifetime: Duration) -> Self {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.credential = Some(Credential::new(token, expires_at));
        self
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Return the cached credential, refreshing it first when absent or about
    /// to expire. A failed exchange leaves the previous slot untouched.
    pub async fn get_valid_token(&mut self, http: &HttpClient) -> Result<Credential, AuthError> {
        let now = self.clock.now();
        if let Some(credential) = &self.credential {
            if credential.is_valid_at(now, self.buffer) {
                return Ok(credential.clone());
            }
            debug!("Access token expires at {}, refreshing", credential.expires_at);
        } else {
            debug!("No access token cached, requesting one");
        }

        let response = self.auth.request_token(http).await?;
        let expires_at = Duration::try_seconds(response.expires_in)
            .filter(|lifetime| *lifetime > Duration::zero())
            .and_then(|lifetime| self.clock.now().checked_add_signed(lifetime))
            .ok_or(AuthError::InvalidTokenLifetime {
                expires_in: response.expires_in,
            })?;
        let credential = Credential::new(response.access_token, expires_at);
        self.credential = Some(credential.clone());
        Ok(credential)
    }
}
