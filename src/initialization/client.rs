//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{ImportConfig, USER_AGENT};

/// Initializes the HTTP client shared by every request in an import.
///
/// Configured with the per-request timeout from the config and a static
/// User-Agent. The same client serves the credential exchange and both data
/// stages, so connection pooling spans the whole batch.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &ImportConfig) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}
