//! Configuration for the importer.
//!
//! Split into compile-time constants (defaults, endpoints, limits) and the
//! runtime [`ImportConfig`] struct the caller fills in.

mod constants;
mod types;

pub use constants::*;
pub use types::{ImportConfig, LogFormat, LogLevel};
