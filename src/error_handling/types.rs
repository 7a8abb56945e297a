//! Error type definitions.
//!
//! Two levels of failure exist during an import: batch-fatal conditions
//! ([`ImportError`], which abort the whole run) and per-character failures
//! ([`CharacterFailure`], which are recovered locally so the rest of the
//! group still renders).

use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Batch-fatal import errors.
///
/// Per-character problems never surface here; they become `nok` records in
/// the output list instead.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The client-credentials exchange failed; no data fetch can proceed
    /// without a bearer token.
    #[error("credential exchange failed: {0}")]
    AuthFailure(String),

    /// The configured API base URL is unusable.
    #[error("invalid API base URL {url:?}: {detail}")]
    InvalidApiBase {
        /// The offending configuration value
        url: String,
        /// Why it was rejected
        detail: String,
    },

    /// Error building the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Structured failure kind, for programmatic handling and batch statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIterMacro)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Request exceeded the per-request or whole-import deadline
    Timeout,
    /// Transport-level failure (DNS, connection refused, TLS)
    ConnectionError,
    /// Non-200 status, or an API error envelope on a 200
    HttpError,
    /// Response body was not well-formed JSON
    ParseError,
    /// Well-formed JSON whose shape did not match the expected schema
    MalformedPayload,
    /// Bearer token could not be refreshed mid-batch
    AuthFailure,
}

impl FailureKind {
    /// Human-readable label for logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::ConnectionError => "connection error",
            FailureKind::HttpError => "HTTP error",
            FailureKind::ParseError => "parse error",
            FailureKind::MalformedPayload => "malformed payload",
            FailureKind::AuthFailure => "auth failure",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two dependent requests for a character failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStage {
    /// The character profile request
    Profile,
    /// The follow-up equipment request
    Equipment,
}

impl FetchStage {
    /// Lowercase stage name used in failure reasons.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStage::Profile => "profile",
            FetchStage::Equipment => "equipment",
        }
    }
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure for one roster entry.
///
/// `reason` is display-ready text shown on the dashboard next to the
/// character's name; `kind` and `stage` are for tests and statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterFailure {
    /// Structured failure kind
    pub kind: FailureKind,
    /// The request stage that failed
    pub stage: FetchStage,
    /// Display-ready description of the failure
    pub reason: String,
}

impl CharacterFailure {
    /// Creates a failure with an explicit kind, stage, and reason.
    pub fn new(kind: FailureKind, stage: FetchStage, reason: String) -> Self {
        CharacterFailure {
            kind,
            stage,
            reason,
        }
    }

    /// Failure used when the whole-import deadline expires before this
    /// character finished loading.
    pub(crate) fn deadline(name: &str) -> Self {
        CharacterFailure::new(
            FailureKind::Timeout,
            FetchStage::Profile,
            format!("Import deadline expired before data for {name} finished loading. Refresh page to try again."),
        )
    }

    /// Failure used when an import worker task died unexpectedly.
    pub(crate) fn worker_lost(name: &str) -> Self {
        CharacterFailure::new(
            FailureKind::ConnectionError,
            FetchStage::Profile,
            format!("Internal error while loading {name}. Refresh page to try again."),
        )
    }
}
