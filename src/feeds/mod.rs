pub mod espn;
pub mod normalize;
pub mod odds_api;

pub use normalize::{deep_normalize, normalize, normalize_key};

use crate::models::CanonicalOddsRecord;
use serde_json::Value;
use tracing::debug;

/// Keys that wrap lists of events or odds items in provider responses
const WRAPPER_KEYS: &[&str] = &["data", "items", "events", "competitions", "odds"];

/// Normalize a whole provider response into zero or more records
///
/// Recognizes TheOddsAPI events, ESPN odds items, lists of either, and the
/// usual `data` / `items` / `events` wrappers. Any other object, including
/// one that looks like an ESPN item but carries no ESPN leg, is read as a
/// single flat record. Never fails.
pub fn normalize_payload(raw: &Value) -> Vec<CanonicalOddsRecord> {
    let normalized = deep_normalize(raw);
    let records = records_from(&normalized);
    debug!(count = records.len(), "normalized odds payload");
    records
}

fn records_from(node: &Value) -> Vec<CanonicalOddsRecord> {
    match node {
        Value::Array(items) => items.iter().flat_map(records_from).collect(),
        Value::Object(map) => {
            if odds_api::is_event(node) {
                return odds_api::records_from_event(node);
            }
            if espn::is_odds_item(node) {
                let records = espn::records_from_item(node);
                if !records.is_empty() {
                    return records;
                }
            }
            let wrapped: Vec<&Value> = WRAPPER_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .filter(|value| value.is_array())
                .collect();
            if wrapped.is_empty() {
                vec![normalize::record_from_normalized(node)]
            } else {
                wrapped.into_iter().flat_map(records_from).collect()
            }
        }
        _ => Vec::new(),
    }
}

/// Stamp `provider` on records whose payload named none
pub fn fill_default_provider(records: &mut [CanonicalOddsRecord], provider: &str) {
    for record in records.iter_mut().filter(|r| r.provider.is_none()) {
        record.provider = Some(provider.to_string());
    }
}
