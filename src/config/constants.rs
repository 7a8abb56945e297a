//! Configuration constants.
//!
//! These are the defaults behind `ImportConfig::default()`; every one of them
//! can be overridden per import.

/// Maximum concurrent character fetches (semaphore limit).
///
/// Matches the API's published concurrency guidance; more in-flight requests
/// mostly queue behind the rate limit anyway.
pub const MAX_CONCURRENT_FETCHES: usize = 10;

/// Per-request timeout in seconds.
///
/// The client default of 5s is too short for the armory endpoints under
/// load; 10s keeps slow characters from failing spuriously without letting
/// one request stall the batch for long.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Pause after every this-many outbound data requests.
///
/// The API enforces a calls-per-second quota and punishes violations for the
/// whole batch, so the throttle errs conservative.
pub const RATE_LIMIT_EVERY: u32 = 10;

/// Length of the rate-limit pause in milliseconds.
pub const RATE_LIMIT_PAUSE_MS: u64 = 100;

/// Seconds before actual expiry at which a cached token is treated as stale.
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

// Retry strategy (credential exchange only)
/// Initial delay in milliseconds before the first retry.
pub const RETRY_INITIAL_DELAY_MS: u64 = 250;
/// Factor by which the retry delay grows on each attempt.
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds.
pub const RETRY_MAX_DELAY_SECS: u64 = 2;
/// Maximum number of retry attempts after the initial one.
pub const RETRY_MAX_ATTEMPTS: usize = 3;

/// Default data API base URL.
pub const DEFAULT_API_BASE: &str = "https://us.api.blizzard.com";

/// Default credential exchange endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth.battle.net/token";

/// Default locale requested from the data API.
pub const DEFAULT_LOCALE: &str = "en_US";

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("group_status/", env!("CARGO_PKG_VERSION"));
