//! Generic normalization of third-party odds payloads.
//!
//! Provider payloads are walked as `serde_json::Value` trees. Every map key
//! is first rewritten to lower snake case so lookups are insensitive to
//! casing and separators ("lastUpdated", "Last-Update", "last_updated").
//! Field extraction then only ever asks "is this key present with a usable
//! value"; a wrong-shaped node reads as absent.

use crate::models::{AmericanOdds, CanonicalOddsRecord, Market, Price};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::debug;

const PROVIDER_KEYS: &[&str] = &["provider", "bookmaker", "sportsbook", "book", "source"];
const PROVIDER_NAME_KEYS: &[&str] = &["name", "title", "display_name", "key"];
const MARKET_KEYS: &[&str] = &["market", "market_type", "market_key", "bet_type", "type", "key"];
const SIDE_KEYS: &[&str] = &["side", "selection", "outcome", "name", "team", "participant"];
const PLAYER_KEYS: &[&str] = &["player", "player_name", "description", "athlete"];
const PRICE_KEYS: &[&str] = &["price", "odds", "american", "american_odds", "money_line", "moneyline"];
const POINT_KEYS: &[&str] = &["point", "points", "line", "handicap", "spread", "total", "over_under"];
const UPDATED_KEYS: &[&str] = &[
    "last_updated",
    "last_update",
    "updated_at",
    "updated",
    "last_modified",
    "timestamp",
];

/// Epoch values above this are taken as milliseconds
const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;

/// Rewrite a key to lower snake case: "homeTeamOdds" -> "home_team_odds"
pub fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.trim().chars() {
        if c.is_uppercase() {
            if matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c.is_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
        prev = Some(c);
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Recursively rewrite every map key with `normalize_key`
///
/// When two keys collapse to the same normalized form the first one (in
/// map order) wins.
pub fn deep_normalize(raw: &Value) -> Value {
    match raw {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                out.entry(normalize_key(key))
                    .or_insert_with(|| deep_normalize(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(deep_normalize).collect()),
        other => other.clone(),
    }
}

/// First key in `keys` holding a non-null value
pub(crate) fn lookup<'a>(node: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = node.as_object()?;
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

/// Follow a path of keys through nested maps
pub(crate) fn lookup_path<'a>(node: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(node, |current, key| current.as_object()?.get(*key))
        .filter(|value| !value.is_null())
}

pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a price leaf: integer, integral float, "+150"/"-110"/"EVEN", or a
/// nested object exposing an "american" field
pub fn parse_price(value: &Value) -> Option<AmericanOdds> {
    match value {
        Value::Number(n) => {
            let american = match n.as_i64() {
                Some(i) => i,
                None => {
                    let f = n.as_f64()?;
                    if f.fract() != 0.0 || f.abs() > i64::MAX as f64 {
                        return None;
                    }
                    f as i64
                }
            };
            AmericanOdds::new(american).ok()
        }
        Value::String(s) => s.parse().ok(),
        Value::Object(_) => lookup(value, &["american"]).and_then(|inner| match inner {
            Value::Object(_) => None,
            leaf => parse_price(leaf),
        }),
        _ => None,
    }
}

/// Read a line value: number, or a string such as "+3.5", "o47.5", "PK"
pub fn parse_point(value: &Value) -> Option<f64> {
    let point = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("pk") || s.eq_ignore_ascii_case("pick") {
                return Some(0.0);
            }
            let s = s.trim_start_matches(['o', 'O', 'u', 'U']);
            s.strip_prefix('+').unwrap_or(s).parse().ok()?
        }
        _ => return None,
    };
    point.is_finite().then_some(point)
}

/// Read a timestamp: RFC 3339 string, or epoch seconds/milliseconds
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| s.trim().parse::<f64>().ok().and_then(epoch_to_datetime)),
        Value::Number(n) => n.as_f64().and_then(epoch_to_datetime),
        _ => None,
    }
}

fn epoch_to_datetime(epoch: f64) -> Option<DateTime<Utc>> {
    if !epoch.is_finite() || epoch < 0.0 {
        return None;
    }
    let millis = if epoch > EPOCH_MILLIS_THRESHOLD {
        epoch
    } else {
        epoch * 1000.0
    };
    if millis > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

fn extract_provider(node: &Value) -> Option<String> {
    match lookup(node, PROVIDER_KEYS)? {
        nested @ Value::Object(_) => lookup(nested, PROVIDER_NAME_KEYS).and_then(as_text),
        leaf => as_text(leaf),
    }
}

fn extract_market(node: &Value) -> Option<Market> {
    MARKET_KEYS
        .iter()
        .filter_map(|key| lookup(node, &[*key]))
        .filter_map(|value| value.as_str())
        .find_map(Market::parse)
}

fn extract_side(node: &Value) -> Option<String> {
    let side = lookup(node, SIDE_KEYS).and_then(as_text)?;
    let lowered = side.to_ascii_lowercase();
    if matches!(lowered.as_str(), "home" | "away" | "over" | "under") {
        Some(lowered)
    } else {
        Some(side)
    }
}

fn extract_price(node: &Value) -> Price {
    let candidate = match node {
        Value::Object(_) => lookup(node, PRICE_KEYS),
        Value::Array(_) | Value::Null | Value::Bool(_) => None,
        leaf => Some(leaf),
    };
    match candidate {
        Some(value) => match parse_price(value) {
            Some(odds) => Price::Available(odds),
            None => {
                debug!(raw = %value, "unreadable odds price, marking unavailable");
                Price::Unavailable
            }
        },
        None => Price::Unavailable,
    }
}

fn extract_point(node: &Value) -> Option<f64> {
    POINT_KEYS
        .iter()
        .filter_map(|key| lookup(node, &[*key]))
        .find_map(parse_point)
}

fn extract_last_updated(node: &Value) -> Option<DateTime<Utc>> {
    UPDATED_KEYS
        .iter()
        .filter_map(|key| lookup(node, &[*key]))
        .find_map(parse_timestamp)
}

/// Build a record from an already key-normalized node
pub(crate) fn record_from_normalized(node: &Value) -> CanonicalOddsRecord {
    let price = extract_price(node);
    let mut market = extract_market(node);
    let mut side = extract_side(node);

    if market.is_none() && matches!(side.as_deref(), Some("over") | Some("under")) {
        market = Some(Market::Total);
    }

    if market == Some(Market::PlayerProp) {
        let player = lookup(node, PLAYER_KEYS).and_then(as_text);
        side = match (player, side) {
            (Some(player), Some(side)) if player != side => Some(format!("{} {}", player, side)),
            (player, side) => side.or(player),
        };
    }

    CanonicalOddsRecord {
        provider: extract_provider(node),
        market,
        side,
        price,
        point: extract_point(node),
        last_updated: extract_last_updated(node),
    }
}

/// Normalize an arbitrary payload into one canonical record
///
/// Never fails: null, lists, or unexpected shapes produce a record whose
/// fields are absent and whose price is `Price::Unavailable`. A bare scalar
/// is read as a price.
pub fn normalize(raw: &Value) -> CanonicalOddsRecord {
    match raw {
        Value::Object(_) => record_from_normalized(&deep_normalize(raw)),
        Value::Number(_) | Value::String(_) => CanonicalOddsRecord {
            price: extract_price(raw),
            ..Default::default()
        },
        _ => CanonicalOddsRecord::default(),
    }
}
