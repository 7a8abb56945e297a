//! Error categorization and retry strategy.

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use super::types::{CharacterFailure, FailureKind, FetchStage};
use crate::config::{RETRY_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_SECS};

/// Creates the exponential backoff strategy used for the credential exchange.
///
/// Only the token exchange is retried; per-character data fetches fail fast
/// into `nok` records so one slow character can't stall the batch.
pub(crate) fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_INITIAL_DELAY_MS)
        .factor(RETRY_FACTOR)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(RETRY_MAX_ATTEMPTS)
}

/// Whether a transport error is worth retrying.
///
/// Timeouts, connect failures, and low-level request errors are transient;
/// anything carrying a response (status, decode) is not.
pub(crate) fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

/// Categorizes a `reqwest::Error` into a [`FailureKind`].
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::ConnectionError
    } else if error.is_status() {
        FailureKind::HttpError
    } else if error.is_decode() {
        FailureKind::ParseError
    } else {
        // Request construction and body errors are transport-level problems
        // as far as the dashboard is concerned
        FailureKind::ConnectionError
    }
}

/// Builds a per-character failure from a transport error, with a reason the
/// dashboard can show verbatim.
pub(crate) fn failure_from_reqwest(
    name: &str,
    stage: FetchStage,
    error: &reqwest::Error,
) -> CharacterFailure {
    let kind = categorize_reqwest_error(error);
    let reason = match kind {
        FailureKind::Timeout => format!(
            "Timeout retrieving {stage} data from Battle.net for {name}. Refresh page to try again."
        ),
        FailureKind::HttpError => match error.status() {
            Some(status) => format!(
                "Got a {} from Battle.net for {name}. Refresh page to try again.",
                status.as_u16()
            ),
            None => format!(
                "Battle.net rejected the {stage} request for {name}. Refresh page to try again."
            ),
        },
        FailureKind::ParseError => format!(
            "Could not decode the {stage} response from Battle.net for {name}. Refresh page to try again."
        ),
        _ => format!(
            "Network error retrieving {stage} data from Battle.net for {name}. Refresh page to try again."
        ),
    };
    CharacterFailure::new(kind, stage, reason)
}
