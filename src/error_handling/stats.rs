//! Batch failure statistics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;
use strum::IntoEnumIterator;

use super::types::{CharacterFailure, FailureKind};

/// Thread-safe per-batch counters.
///
/// Tracks attempted/loaded/failed entries plus one counter per
/// [`FailureKind`], using atomics so concurrent fetch tasks can record
/// outcomes without coordination. All counters start at zero.
pub struct ImportStats {
    attempted: AtomicUsize,
    loaded: AtomicUsize,
    failed: AtomicUsize,
    failures: HashMap<FailureKind, AtomicUsize>,
}

impl ImportStats {
    /// Creates a fresh tracker with every failure kind initialized to zero.
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in FailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }
        ImportStats {
            attempted: AtomicUsize::new(0),
            loaded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            failures,
        }
    }

    pub(crate) fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_loaded(&self) {
        self.loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, failure: &CharacterFailure) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        if let Some(counter) = self.failures.get(&failure.kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of roster entries scheduled.
    pub fn attempted(&self) -> usize {
        self.attempted.load(Ordering::SeqCst)
    }

    /// Number of entries that loaded successfully.
    pub fn loaded(&self) -> usize {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Number of entries that failed.
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Count for one failure kind.
    pub fn failure_count(&self, kind: FailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Logs a per-kind failure breakdown at the end of a run.
    pub fn log_summary(&self) {
        let failed = self.failed();
        if failed == 0 {
            return;
        }
        info!("Failure counts ({} total):", failed);
        for kind in FailureKind::iter() {
            let count = self.failure_count(kind);
            if count > 0 {
                info!("   {}: {}", kind.as_str(), count);
            }
        }
    }
}

impl Default for ImportStats {
    fn default() -> Self {
        Self::new()
    }
}
