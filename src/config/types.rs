//! Configuration types.

use crate::api::ApiEra;
use crate::config::constants::{
    DEFAULT_API_BASE, DEFAULT_LOCALE, DEFAULT_TOKEN_URL, MAX_CONCURRENT_FETCHES, RATE_LIMIT_EVERY,
    RATE_LIMIT_PAUSE_MS, REQUEST_TIMEOUT_SECS,
};

/// Logging level for the embedding application.
#[derive(Clone, Debug)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Configuration for one import run.
///
/// Construct with struct-update syntax over [`Default`]:
///
/// ```no_run
/// use group_status::ImportConfig;
///
/// let config = ImportConfig {
///     client_id: "my-client-id".into(),
///     client_secret: "my-client-secret".into(),
///     home_realm: "argent-dawn".into(),
///     home_realm_name: "Argent Dawn".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Data API base URL
    pub api_base: String,

    /// Credential exchange endpoint
    pub token_url: String,

    /// OAuth client id for the client-credentials grant
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Locale requested from the data API
    pub locale: String,

    /// The group's home realm slug; entries on this realm skip the realm
    /// directory lookup
    pub home_realm: String,

    /// Display name for the home realm
    pub home_realm_name: String,

    /// Which API payload era the equipment adapter should expect
    pub era: ApiEra,

    /// Maximum concurrent character fetches
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Pause after every this-many data requests (0 disables the throttle)
    pub rate_limit_every: u32,

    /// Length of the rate-limit pause in milliseconds
    pub rate_limit_pause_ms: u64,

    /// Optional whole-import deadline in seconds; entries still pending when
    /// it expires fail with a timeout reason instead of hanging the caller
    pub deadline_seconds: Option<u64>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            locale: DEFAULT_LOCALE.to_string(),
            home_realm: String::new(),
            home_realm_name: String::new(),
            era: ApiEra::Profile,
            max_concurrency: MAX_CONCURRENT_FETCHES,
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            rate_limit_every: RATE_LIMIT_EVERY,
            rate_limit_pause_ms: RATE_LIMIT_PAUSE_MS,
            deadline_seconds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.max_concurrency, 10);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.rate_limit_every, 10);
        assert_eq!(config.rate_limit_pause_ms, 100);
        assert!(config.deadline_seconds.is_none());
        assert_eq!(config.locale, "en_US");
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
    }
}
