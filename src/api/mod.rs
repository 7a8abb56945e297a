//! External API payload handling.
//!
//! The raw JSON schemas have drifted across API eras; everything downstream
//! of this module works on the canonical [`RawItem`] shape, so schema churn
//! stays inside the per-era adapters.

mod adapt;
pub(crate) mod wire;

pub use adapt::{adapt_equipment, AdaptError, ApiEra, RawItem};
