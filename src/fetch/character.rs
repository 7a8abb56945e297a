//! The two-stage fetch for one roster entry.
//!
//! Profile first, then the equipment detail linked from it. The stages of
//! one character are strictly ordered; failures at either stage terminate
//! the entry with a `nok` record and never abort the batch.

use log::{debug, warn};
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::api::wire::{error_envelope, ProfileSummary};
use crate::api::{adapt_equipment, ApiEra, RawItem};
use crate::error_handling::{failure_from_reqwest, CharacterFailure, FailureKind, FetchStage};
use crate::fetch::FetchContext;
use crate::models::{CharacterRecord, LoadedCharacter, RosterEntry};
use crate::normalize::normalize;

/// Loads one roster entry into a character record.
///
/// Always returns a record; every failure mode is folded into a `nok`
/// outcome with a display-ready reason.
pub(crate) async fn fetch_character(
    ctx: &FetchContext,
    entry: &RosterEntry,
    realm_name: &str,
) -> CharacterRecord {
    debug!("loading {} ({})", entry.name, entry.realm);

    let profile = match fetch_profile(ctx, entry).await {
        Ok(profile) => profile,
        Err(failure) => return fail(ctx, entry, realm_name, failure),
    };

    // The profile alone isn't worth displaying without valid equipment, so
    // an equipment failure marks the whole entry nok
    let items = match fetch_equipment(ctx, entry, &profile.equipment.href).await {
        Ok(items) => items,
        Err(failure) => return fail(ctx, entry, realm_name, failure),
    };

    let equipment = normalize(&items, &ctx.ruleset);
    let class_name = ctx
        .classes
        .resolve(profile.character_class.id)
        .map(str::to_string)
        .or_else(|| profile.character_class.name.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    ctx.stats.record_loaded();
    debug!(
        "loaded {} ({}): {class_name}, equipped ilvl {:.1}",
        entry.name, entry.realm, equipment.equipped_item_level
    );

    CharacterRecord::loaded(
        entry,
        realm_name.to_string(),
        LoadedCharacter {
            class_name,
            guild: profile.guild.map(|g| g.name),
            role: entry.role,
            membership: entry.status,
            average_item_level: profile.average_item_level,
            equipped_item_level: profile.equipped_item_level,
            computed_equipped_item_level: equipment.equipped_item_level,
            tier_pieces: equipment.tier_pieces,
            crafted_pieces: equipment.crafted_pieces,
            slots: equipment.slots,
        },
    )
}

fn fail(
    ctx: &FetchContext,
    entry: &RosterEntry,
    realm_name: &str,
    failure: CharacterFailure,
) -> CharacterRecord {
    warn!(
        "failed to load {} ({}): {}",
        entry.name, entry.realm, failure.reason
    );
    ctx.stats.record_failure(&failure);
    CharacterRecord::failed(entry, realm_name.to_string(), failure)
}

async fn fetch_profile(
    ctx: &FetchContext,
    entry: &RosterEntry,
) -> Result<ProfileSummary, CharacterFailure> {
    let url = profile_url(&ctx.api_base, &entry.realm, &entry.name, &ctx.locale);
    let body = request_json(ctx, FetchStage::Profile, &entry.name, url).await?;
    serde_json::from_value(body).map_err(|e| {
        CharacterFailure::new(
            FailureKind::MalformedPayload,
            FetchStage::Profile,
            format!(
                "Unexpected profile data from Battle.net for {}: {e}. Refresh page to try again.",
                entry.name
            ),
        )
    })
}

async fn fetch_equipment(
    ctx: &FetchContext,
    entry: &RosterEntry,
    href: &str,
) -> Result<Vec<RawItem>, CharacterFailure> {
    let url = Url::parse(href).map_err(|e| {
        CharacterFailure::new(
            FailureKind::MalformedPayload,
            FetchStage::Equipment,
            format!(
                "Profile for {} carries an invalid equipment link: {e}. Refresh page to try again.",
                entry.name
            ),
        )
    })?;
    let body = request_json(ctx, FetchStage::Equipment, &entry.name, url).await?;

    // The legacy API nested the slot map under `items`
    let payload = match ctx.era {
        ApiEra::Legacy => body.get("items").cloned().unwrap_or(body),
        ApiEra::Profile => body,
    };
    adapt_equipment(ctx.era, &payload).map_err(|e| {
        CharacterFailure::new(
            FailureKind::MalformedPayload,
            FetchStage::Equipment,
            format!(
                "Unexpected equipment data from Battle.net for {}: {e}. Refresh page to try again.",
                entry.name
            ),
        )
    })
}

/// Issues one throttled, authenticated GET and validates the response down
/// to a JSON body with no error envelope.
async fn request_json(
    ctx: &FetchContext,
    stage: FetchStage,
    name: &str,
    url: Url,
) -> Result<Value, CharacterFailure> {
    ctx.throttle.acquire().await;

    let token = ctx.token_cache.get_token(&ctx.client).await.map_err(|e| {
        CharacterFailure::new(
            FailureKind::AuthFailure,
            stage,
            format!("Could not refresh API credentials while loading {name}: {e}. Refresh page to try again."),
        )
    })?;

    debug!("GET {url}");
    let response = ctx
        .client
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| failure_from_reqwest(name, stage, &e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| failure_from_reqwest(name, stage, &e))?;

    let body: Value = match serde_json::from_str(&text) {
        Ok(body) => body,
        Err(_) if status != StatusCode::OK => {
            // A non-JSON error page; the status is the useful signal
            return Err(CharacterFailure::new(
                FailureKind::HttpError,
                stage,
                format!(
                    "Got a {} from Battle.net for {name}. Refresh page to try again.",
                    status.as_u16()
                ),
            ));
        }
        Err(e) => {
            return Err(CharacterFailure::new(
                FailureKind::ParseError,
                stage,
                format!(
                    "Battle.net returned malformed JSON for {name}: {e}. Refresh page to try again."
                ),
            ));
        }
    };

    if status != StatusCode::OK {
        let reason = match error_envelope(&body) {
            Some(envelope) => format!(
                "Got a {} from Battle.net for {name}: {}. Refresh page to try again.",
                status.as_u16(),
                envelope.detail
            ),
            None => format!(
                "Got a {} from Battle.net for {name}. Refresh page to try again.",
                status.as_u16()
            ),
        };
        return Err(CharacterFailure::new(FailureKind::HttpError, stage, reason));
    }

    // The API reports logical errors under HTTP 200 too
    if let Some(envelope) = error_envelope(&body) {
        return Err(CharacterFailure::new(
            FailureKind::HttpError,
            stage,
            format!(
                "Battle.net error {} for {name}: {}. Refresh page to try again.",
                envelope.code, envelope.detail
            ),
        ));
    }

    Ok(body)
}

fn profile_url(base: &Url, realm: &str, name: &str, locale: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .push("profile")
            .push(realm)
            .push(&name.to_lowercase());
    }
    url.query_pairs_mut().append_pair("locale", locale);
    url
}
