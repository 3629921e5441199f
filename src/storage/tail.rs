//! Tail records (`last_tail.json`).
//!
//! The document maps `"{YYYY}{MM}_2"` keys to `{staffName: [symbol × 4]}`.
//! Several periods share one file, so saving merges into what is already
//! there.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::DataPaths;
use crate::error::{EngineError, EngineResult};
use crate::models::{Period, TailLinkage, TailRecord};

use super::{read_json, write_json};

/// Loads the tail written when `previous` was finalized.
///
/// Missing files, missing keys and malformed records all fall back to the
/// default record (four `Work` days) for the affected staff.
pub fn load_tail(paths: &DataPaths, previous: Period) -> TailLinkage {
    let path = paths.last_tail();
    let key = TailLinkage::key_for(previous);
    let mut linkage = TailLinkage::new();

    let document = match read_json(&path) {
        Ok(document) => document,
        Err(EngineError::ConfigNotFound { .. }) => return linkage,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable tail document");
            return linkage;
        }
    };

    let Some(records) = document.get(&key).and_then(Value::as_object) else {
        debug!(key = %key, "No tail recorded");
        return linkage;
    };

    for (name, symbols) in records {
        let parsed = symbols
            .as_array()
            .and_then(|list| list.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
            .and_then(|list| TailRecord::from_symbols(&list));
        match parsed {
            Some(record) => linkage.insert(name.clone(), record),
            None => warn!(key = %key, staff = %name, "Skipping malformed tail record"),
        }
    }
    linkage
}

/// Stores the tail of `period` under its key, keeping other periods' entries.
pub fn save_tail(paths: &DataPaths, period: Period, linkage: &TailLinkage) -> EngineResult<()> {
    let path = paths.last_tail();
    let key = TailLinkage::key_for(period);

    let mut document = match read_json(&path) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(EngineError::ConfigNotFound { .. }) => Map::new(),
        Err(e) => {
            warn!(error = %e, "Replacing unreadable tail document");
            Map::new()
        }
    };

    let records: Map<String, Value> = linkage
        .iter()
        .map(|(name, record)| (name.to_string(), Value::from(record.symbols())))
        .collect();
    document.insert(key.clone(), Value::Object(records));

    write_json(&path, &Value::Object(document))?;
    info!(key = %key, staff = linkage.len(), "Tail saved");
    Ok(())
}
