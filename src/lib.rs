//! group_status library: bulk character-data import for group dashboards
//!
//! This library loads every character of a registered group from the
//! Battle.net API, concurrently and rate-limited with a cached bearer token,
//! normalizes each character's equipment into display-ready slot records,
//! and aggregates group-level statistics (average item levels, armor and
//! token composition, role counts).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use group_status::{
//!     import_roster, ClassDirectory, ImportConfig, Membership, RealmDirectory, Role,
//!     RosterEntry, Ruleset,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), group_status::ImportError> {
//! let config = ImportConfig {
//!     client_id: "my-client-id".into(),
//!     client_secret: "my-client-secret".into(),
//!     home_realm: "argent-dawn".into(),
//!     home_realm_name: "Argent Dawn".into(),
//!     ..Default::default()
//! };
//! let roster = vec![RosterEntry {
//!     name: "Arthas".into(),
//!     realm: "argent-dawn".into(),
//!     role: Role::Tank,
//!     status: Membership::Main,
//! }];
//! let classes = Arc::new(ClassDirectory::from_iter([(6, "Death Knight".to_string())]));
//! let realms = RealmDirectory::new();
//!
//! let report =
//!     import_roster(&config, Arc::new(Ruleset::builtin()), &roster, classes, &realms).await?;
//! println!(
//!     "{} of {} loaded; group avg ilvl {}",
//!     report.loaded, report.attempted, report.summary.average_item_level
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call [`import_roster`] from within an async context.

#![warn(missing_docs)]

mod aggregate;
mod api;
mod auth;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod lookup;
mod models;
mod normalize;
mod rate_limit;
mod ruleset;

// Re-export public API
pub use aggregate::{
    armor_type_for_class, token_type_for_class, ArmorType, GroupStats, GroupSummary, TokenType,
};
pub use api::{adapt_equipment, AdaptError, ApiEra, RawItem};
pub use auth::TokenCache;
pub use config::{ImportConfig, LogFormat, LogLevel};
pub use error_handling::{
    categorize_reqwest_error, CharacterFailure, FailureKind, FetchStage, ImportError,
};
pub use initialization::init_logger_with;
pub use lookup::{ClassDirectory, RealmDirectory};
pub use models::{
    CharacterOutcome, CharacterRecord, EnchantQuality, EquipmentSlotRecord, LoadedCharacter,
    Membership, Role, RosterEntry, SetClassification, SlotId, SLOT_COUNT,
};
pub use normalize::{normalize, NormalizedEquipment};
pub use rate_limit::FixedWindowThrottle;
pub use ruleset::{ItemLevelCorrection, Ruleset, RulesetError, SlotOverride};
pub use run::{import_roster, ImportReport};

// Internal run module (contains the orchestration logic)
mod run {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use chrono::Utc;
    use futures::future::join_all;
    use log::{info, warn};
    use url::Url;

    use crate::aggregate::{GroupStats, GroupSummary};
    use crate::auth::TokenCache;
    use crate::config::ImportConfig;
    use crate::error_handling::{CharacterFailure, ImportError, ImportStats};
    use crate::fetch::{fetch_character, FetchContext};
    use crate::initialization::{init_client, init_semaphore};
    use crate::lookup::{ClassDirectory, RealmDirectory};
    use crate::models::{CharacterOutcome, CharacterRecord, Membership, RosterEntry};
    use crate::rate_limit::FixedWindowThrottle;
    use crate::ruleset::Ruleset;

    /// Results of one import run.
    #[derive(Debug)]
    pub struct ImportReport {
        /// One record per roster entry, in roster order
        pub characters: Vec<CharacterRecord>,
        /// Finalized group statistics over successfully loaded mains
        pub summary: GroupSummary,
        /// Number of roster entries scheduled
        pub attempted: usize,
        /// Number of entries that loaded successfully
        pub loaded: usize,
        /// Number of entries that failed
        pub failed: usize,
        /// Run identifier (format: `import_<timestamp_millis>`)
        pub run_id: String,
        /// Elapsed wall-clock time in seconds
        pub elapsed_seconds: f64,
    }

    /// Imports every character of a roster and aggregates group statistics.
    ///
    /// Fetches run concurrently (bounded by `config.max_concurrency`) through
    /// a shared rate-limit throttle, using a bearer token that is exchanged
    /// once up front and cached. Each character takes two dependent requests
    /// (profile, then the equipment detail it links to) and any failure
    /// along the way turns into a `nok` record without disturbing the rest
    /// of the batch.
    ///
    /// The returned record list always has exactly one entry per roster
    /// entry, in roster order, regardless of completion order.
    ///
    /// # Errors
    ///
    /// Only batch-fatal conditions surface as errors: the credential
    /// exchange failing ([`ImportError::AuthFailure`]), an unusable API base
    /// URL, or HTTP client construction failing. Per-character problems are
    /// reported inside the record list instead.
    pub async fn import_roster(
        config: &ImportConfig,
        ruleset: Arc<Ruleset>,
        roster: &[RosterEntry],
        classes: Arc<ClassDirectory>,
        realms: &RealmDirectory,
    ) -> Result<ImportReport, ImportError> {
        let start_time = Instant::now();
        let run_id = format!("import_{}", Utc::now().timestamp_millis());
        info!(
            "Starting import run {}: {} roster entries",
            run_id,
            roster.len()
        );

        let api_base =
            Url::parse(&config.api_base).map_err(|e| ImportError::InvalidApiBase {
                url: config.api_base.clone(),
                detail: e.to_string(),
            })?;
        if api_base.cannot_be_a_base() {
            return Err(ImportError::InvalidApiBase {
                url: config.api_base.clone(),
                detail: "URL cannot serve as a base".to_string(),
            });
        }

        let client = init_client(config)?;
        let token_cache = Arc::new(TokenCache::new(
            &config.token_url,
            &config.client_id,
            &config.client_secret,
        ));
        // Credential problems are batch-fatal; fail here instead of
        // producing one identical auth failure per roster entry
        token_cache.get_token(&client).await?;

        let stats = Arc::new(ImportStats::new());
        let semaphore = init_semaphore(config.max_concurrency);
        let ctx = Arc::new(FetchContext {
            client,
            token_cache,
            throttle: Arc::new(FixedWindowThrottle::new(
                config.rate_limit_every,
                Duration::from_millis(config.rate_limit_pause_ms),
            )),
            stats: Arc::clone(&stats),
            ruleset,
            classes,
            api_base,
            locale: config.locale.clone(),
            era: config.era,
        });
        let deadline = config
            .deadline_seconds
            .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));

        // Resolve realm display names up front; entries on the group's home
        // realm skip the directory lookup
        let resolved: Vec<(RosterEntry, String)> = roster
            .iter()
            .map(|entry| {
                let realm_name = if entry.realm == config.home_realm {
                    config.home_realm_name.clone()
                } else {
                    realms
                        .resolve(&entry.realm)
                        .unwrap_or(entry.realm.as_str())
                        .to_string()
                };
                (entry.clone(), realm_name)
            })
            .collect();

        let mut handles = Vec::with_capacity(resolved.len());
        for (entry, realm_name) in &resolved {
            stats.record_attempt();
            let ctx = Arc::clone(&ctx);
            let semaphore = Arc::clone(&semaphore);
            let entry = entry.clone();
            let realm_name = realm_name.clone();
            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return None,
                };
                let fetch = fetch_character(&ctx, &entry, &realm_name);
                let record = match deadline {
                    Some(at) => match tokio::time::timeout_at(at, fetch).await {
                        Ok(record) => record,
                        Err(_) => {
                            let failure = CharacterFailure::deadline(&entry.name);
                            ctx.stats.record_failure(&failure);
                            CharacterRecord::failed(&entry, realm_name.clone(), failure)
                        }
                    },
                    None => fetch.await,
                };
                Some(record)
            }));
        }

        // join_all keeps spawn order, so the output list matches the roster
        // order no matter what order completions arrive in
        let results = join_all(handles).await;
        let mut characters = Vec::with_capacity(resolved.len());
        for ((entry, realm_name), result) in resolved.iter().zip(results) {
            match result {
                Ok(Some(record)) => characters.push(record),
                Ok(None) | Err(_) => {
                    warn!("import worker died while loading {}", entry.name);
                    let failure = CharacterFailure::worker_lost(&entry.name);
                    stats.record_failure(&failure);
                    characters.push(CharacterRecord::failed(entry, realm_name.clone(), failure));
                }
            }
        }

        // Fold group statistics single-threaded over the joined records;
        // bench members and failed entries don't count
        let mut group = GroupStats::new();
        for record in &characters {
            if let CharacterOutcome::Loaded(data) = &record.outcome {
                if data.membership == Membership::Main {
                    // Prefer the server-reported equipped level; the
                    // recomputed value covers payloads that omit it
                    let equipped = if data.equipped_item_level > 0.0 {
                        data.equipped_item_level
                    } else {
                        data.computed_equipped_item_level
                    };
                    group.record_main(
                        &data.class_name,
                        data.role,
                        data.average_item_level,
                        equipped,
                    );
                }
            }
        }
        let summary = group.finalize();

        stats.log_summary();
        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        info!(
            "Import run {} finished: {}/{} loaded, {} failed in {:.1}s",
            run_id,
            stats.loaded(),
            stats.attempted(),
            stats.failed(),
            elapsed_seconds
        );

        Ok(ImportReport {
            characters,
            summary,
            attempted: stats.attempted(),
            loaded: stats.loaded(),
            failed: stats.failed(),
            run_id,
            elapsed_seconds,
        })
    }
}
