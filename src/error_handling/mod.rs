//! Error taxonomy, categorization, and batch failure statistics.

mod categorization;
mod stats;
mod types;

pub(crate) use categorization::{failure_from_reqwest, get_retry_strategy, is_transient};
pub use categorization::categorize_reqwest_error;
pub use stats::ImportStats;
pub use types::{CharacterFailure, FailureKind, FetchStage, ImportError};
