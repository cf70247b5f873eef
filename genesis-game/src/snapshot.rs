//! Saved-game codec for the single persistence slot.
//!
//! The layout matches what the browser build has always written to
//! localStorage, so existing saves keep loading:
//!
//! ```json
//! {
//!   "discoveredElements": [["air", { "id": "air", ... }], ...],
//!   "currentDay": 3,
//!   "combinations": 12,
//!   "foundCombinations": ["air+fire", "earth+water"],
//!   "gameComplete": false,
//!   "timestamp": "2025-01-01T00:00:00Z"
//! }
//! ```
//!
//! Reading is lenient: every field is optional and parsed on its own.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{Catalog, ElementId, ElementRecord, PairKey};
use crate::constants::{FIRST_DAY, LAST_DAY};
use crate::error::GameError;
use crate::store::DiscoveryStore;

const FIELD_DISCOVERED: &str = "discoveredElements";
const FIELD_DAY: &str = "currentDay";
const FIELD_ATTEMPTS: &str = "combinations";
const FIELD_FOUND: &str = "foundCombinations";
const FIELD_COMPLETE: &str = "gameComplete";

/// Self-contained copy of a store, full element records included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub discovered_elements: Vec<(ElementId, ElementRecord)>,
    pub current_day: u8,
    pub combinations: u32,
    pub found_combinations: Vec<PairKey>,
    pub game_complete: bool,
    pub timestamp: String,
}

impl SavedGame {
    /// Serialize for the storage slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Capture `store` as a saved game stamped with `timestamp`.
#[must_use]
pub fn snapshot(store: &DiscoveryStore, timestamp: DateTime<Utc>) -> SavedGame {
    SavedGame {
        discovered_elements: store
            .discovered()
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect(),
        current_day: store.current_day(),
        combinations: store.attempts(),
        found_combinations: store.found_combinations().iter().cloned().collect(),
        game_complete: store.is_complete(),
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Outcome of a lenient restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub store: DiscoveryStore,
    /// Top-level fields that were missing or unreadable and fell back to defaults.
    pub defaulted: Vec<&'static str>,
    /// List entries dropped as unreadable or naming a pair no rule defines.
    pub skipped_entries: usize,
    /// Timestamp recorded in the blob, if any.
    pub timestamp: Option<String>,
}

/// Parse a saved blob back into a store.
///
/// # Errors
///
/// Returns [`GameError::CorruptState`] when the blob is not a JSON object.
pub fn restore(catalog: &Catalog, blob: &str) -> Result<DiscoveryStore, GameError> {
    restore_with_report(catalog, blob).map(|restored| restored.store)
}

/// Parse a saved blob, reporting which fields fell back to defaults.
///
/// # Errors
///
/// Returns [`GameError::CorruptState`] when the blob is not a JSON object.
pub fn restore_with_report(catalog: &Catalog, blob: &str) -> Result<Restored, GameError> {
    let value: Value = serde_json::from_str(blob)?;
    let Value::Object(mut fields) = value else {
        return Err(GameError::CorruptState(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let mut defaulted = Vec::new();
    let mut skipped_entries = 0;

    let discovered = take_field::<Vec<Value>>(&mut fields, FIELD_DISCOVERED, &mut defaulted)
        .map(|entries| parse_discovered(entries, &mut skipped_entries))
        .unwrap_or_default();
    let found = take_field::<Vec<Value>>(&mut fields, FIELD_FOUND, &mut defaulted)
        .map(|entries| parse_found(catalog, entries, &mut skipped_entries))
        .unwrap_or_default();
    let current_day = take_field::<i64>(&mut fields, FIELD_DAY, &mut defaulted)
        .map_or(FIRST_DAY, clamp_day);
    let attempts = take_field::<u32>(&mut fields, FIELD_ATTEMPTS, &mut defaulted).unwrap_or(0);
    let complete =
        take_field::<bool>(&mut fields, FIELD_COMPLETE, &mut defaulted).unwrap_or(false);
    let timestamp = fields
        .remove("timestamp")
        .and_then(|raw| raw.as_str().map(str::to_string));

    if !defaulted.is_empty() {
        log::warn!("saved game missing or unreadable fields: {defaulted:?}");
    }
    if skipped_entries > 0 {
        log::warn!("saved game dropped {skipped_entries} unreadable entries");
    }

    let store = DiscoveryStore::from_parts(
        catalog,
        discovered,
        found,
        current_day,
        attempts,
        complete,
    );
    Ok(Restored {
        store,
        defaulted,
        skipped_entries,
        timestamp,
    })
}

fn take_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    name: &'static str,
    defaulted: &mut Vec<&'static str>,
) -> Option<T> {
    let parsed = match fields.remove(name) {
        None | Some(Value::Null) => None,
        Some(raw) => serde_json::from_value(raw)
            .map_err(|err| log::debug!("field `{name}` unreadable: {err}"))
            .ok(),
    };
    if parsed.is_none() {
        defaulted.push(name);
    }
    parsed
}

fn parse_discovered(
    entries: Vec<Value>,
    skipped: &mut usize,
) -> BTreeMap<ElementId, ElementRecord> {
    let mut discovered = BTreeMap::new();
    for entry in entries {
        match serde_json::from_value::<(ElementId, ElementRecord)>(entry) {
            Ok((_, record)) => {
                discovered.insert(record.id.clone(), record);
            }
            Err(_) => *skipped += 1,
        }
    }
    discovered
}

fn clamp_day(raw: i64) -> u8 {
    let day = raw.clamp(i64::from(FIRST_DAY), i64::from(LAST_DAY));
    u8::try_from(day).unwrap_or(LAST_DAY)
}

/// Keys that no rule defines are dropped and counted as skipped.
fn parse_found(
    catalog: &Catalog,
    entries: Vec<Value>,
    skipped: &mut usize,
) -> BTreeSet<PairKey> {
    let mut found = BTreeSet::new();
    for entry in entries {
        match entry
            .as_str()
            .and_then(PairKey::parse)
            .filter(|key| catalog.defines_pair(key))
        {
            Some(key) => {
                found.insert(key);
            }
            None => *skipped += 1,
        }
    }
    found
}
