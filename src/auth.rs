//! Bearer-token cache for the data API.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use log::{debug, info};
use tokio_retry::RetryIf;

use crate::api::wire::TokenResponse;
use crate::config::TOKEN_EXPIRY_MARGIN_SECS;
use crate::error_handling::{get_retry_strategy, is_transient, ImportError};

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Process-wide cache for the client-credentials bearer token.
///
/// Lazily exchanges credentials on first use and refreshes when the cached
/// token is within the expiry margin. Concurrent callers may race to refresh;
/// that is deliberate: a redundant exchange is cheap, every freshly issued
/// token is equally valid, and last-writer-wins leaves the cache correct, so
/// the read path stays lock-cheap instead of serializing every fetch behind
/// a refresh mutex.
pub struct TokenCache {
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Creates an empty cache for the given credentials.
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        TokenCache {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: RwLock::new(None),
        }
    }

    /// Returns a valid bearer token, exchanging credentials if the cached one
    /// is missing or stale.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::AuthFailure`] when the exchange fails; callers
    /// must not attempt a data fetch without a token.
    pub async fn get_token(&self, client: &reqwest::Client) -> Result<String, ImportError> {
        if let Ok(guard) = self.cached.read() {
            if let Some(cached) = guard.as_ref() {
                if Instant::now() < cached.expires_at {
                    return Ok(cached.token.clone());
                }
            }
        }

        debug!("bearer token missing or stale, exchanging credentials");
        let response = RetryIf::spawn(
            get_retry_strategy(),
            || {
                client
                    .post(&self.token_url)
                    .basic_auth(&self.client_id, Some(&self.client_secret))
                    .form(&[("grant_type", "client_credentials")])
                    .send()
            },
            |error: &reqwest::Error| is_transient(error),
        )
        .await
        .map_err(|e| ImportError::AuthFailure(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ImportError::AuthFailure(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ImportError::AuthFailure(format!("unreadable token response: {e}")))?;

        // Treat the token as stale a margin before the server does, so
        // in-flight requests never carry an about-to-expire credential
        let lifetime = body.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        let expires_at = Instant::now() + Duration::from_secs(lifetime);
        info!("exchanged credentials; token valid for {lifetime}s after margin");

        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(CachedToken {
                token: body.access_token.clone(),
                expires_at,
            });
        }
        Ok(body.access_token)
    }
}
