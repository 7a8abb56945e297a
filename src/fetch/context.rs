//! Shared context for character fetch tasks.

use std::sync::Arc;

use url::Url;

use crate::api::ApiEra;
use crate::auth::TokenCache;
use crate::error_handling::ImportStats;
use crate::lookup::ClassDirectory;
use crate::rate_limit::FixedWindowThrottle;
use crate::ruleset::Ruleset;

/// Everything a fetch task shares with the rest of the batch.
///
/// Grouping these keeps the task signature small; one `Arc<FetchContext>` is
/// cloned per spawned character.
pub(crate) struct FetchContext {
    /// HTTP client shared across the batch
    pub client: Arc<reqwest::Client>,
    /// Bearer-token cache
    pub token_cache: Arc<TokenCache>,
    /// Outbound request throttle
    pub throttle: Arc<FixedWindowThrottle>,
    /// Batch failure counters
    pub stats: Arc<ImportStats>,
    /// Active game-data tables
    pub ruleset: Arc<Ruleset>,
    /// Class id → name directory
    pub classes: Arc<ClassDirectory>,
    /// Data API base URL
    pub api_base: Url,
    /// Locale requested from the API
    pub locale: String,
    /// Payload era for the equipment adapter
    pub era: ApiEra,
}
