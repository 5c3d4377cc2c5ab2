use crate::feeds::normalize::{lookup, lookup_path, parse_point, record_from_normalized};
use crate::models::{CanonicalOddsRecord, Market};
use serde_json::{Map, Value};

/// Where one leg's price and line live in an ESPN odds item
struct LegSource {
    market: Market,
    side: &'static str,
    /// Candidate paths to the price, legacy shape first
    price_paths: &'static [&'static [&'static str]],
    /// Candidate paths to a line stated from this leg's own perspective
    point_paths: &'static [&'static [&'static str]],
}

const LEGS: &[LegSource] = &[
    LegSource {
        market: Market::Moneyline,
        side: "home",
        price_paths: &[
            &["home_team_odds", "money_line"],
            &["moneyline", "home", "close", "odds"],
            &["moneyline", "home", "open", "odds"],
        ],
        point_paths: &[],
    },
    LegSource {
        market: Market::Moneyline,
        side: "away",
        price_paths: &[
            &["away_team_odds", "money_line"],
            &["moneyline", "away", "close", "odds"],
            &["moneyline", "away", "open", "odds"],
        ],
        point_paths: &[],
    },
    LegSource {
        market: Market::Spread,
        side: "home",
        price_paths: &[
            &["home_team_odds", "spread_odds"],
            &["point_spread", "home", "close", "odds"],
            &["point_spread", "home", "open", "odds"],
        ],
        point_paths: &[
            &["point_spread", "home", "close", "line"],
            &["point_spread", "home", "open", "line"],
        ],
    },
    LegSource {
        market: Market::Spread,
        side: "away",
        price_paths: &[
            &["away_team_odds", "spread_odds"],
            &["point_spread", "away", "close", "odds"],
            &["point_spread", "away", "open", "odds"],
        ],
        point_paths: &[
            &["point_spread", "away", "close", "line"],
            &["point_spread", "away", "open", "line"],
        ],
    },
    LegSource {
        market: Market::Total,
        side: "over",
        price_paths: &[
            &["over_odds"],
            &["total", "over", "close", "odds"],
            &["total", "over", "open", "odds"],
        ],
        point_paths: &[
            &["total", "over", "close", "line"],
            &["total", "over", "open", "line"],
        ],
    },
    LegSource {
        market: Market::Total,
        side: "under",
        price_paths: &[
            &["under_odds"],
            &["total", "under", "close", "odds"],
            &["total", "under", "open", "odds"],
        ],
        point_paths: &[
            &["total", "under", "close", "line"],
            &["total", "under", "open", "line"],
        ],
    },
];

/// ESPN odds item, legacy (`homeTeamOdds`) or current (`moneyline.home.close`) shape
///
/// Only object-valued keys qualify, so a flat record's numeric `total` does not.
pub fn is_odds_item(node: &Value) -> bool {
    ["home_team_odds", "away_team_odds", "point_spread", "moneyline", "total"]
        .iter()
        .any(|key| node.get(*key).map_or(false, Value::is_object))
        && node.get("bookmakers").is_none()
}

fn first_at<'a>(node: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup_path(node, path))
}

/// Legacy line: `spread` is from the home side, `over_under` is the total
fn legacy_point(node: &Value, market: Market, side: &str) -> Option<f64> {
    match market {
        Market::Spread => {
            let home_line = lookup(node, &["spread"]).and_then(parse_point)?;
            Some(match side {
                "home" => home_line,
                _ if home_line == 0.0 => 0.0,
                _ => -home_line,
            })
        }
        Market::Total => lookup(node, &["over_under"]).and_then(parse_point),
        _ => None,
    }
}

/// Flatten one key-normalized ESPN odds item into a record per available leg
///
/// A leg is emitted only if the item carries a price for it; an
/// unparseable price still yields a record with `Price::Unavailable`.
pub fn records_from_item(item: &Value) -> Vec<CanonicalOddsRecord> {
    let provider = lookup(item, &["provider", "sportsbook"]).cloned();
    let last_update = lookup(item, &["last_modified", "last_updated", "last_update"]).cloned();

    LEGS.iter()
        .filter_map(|leg| {
            let price = first_at(item, leg.price_paths)?;
            let point = first_at(item, leg.point_paths)
                .and_then(parse_point)
                .or_else(|| legacy_point(item, leg.market, leg.side));

            let mut node = Map::new();
            node.insert("market".to_string(), Value::from(leg.market.as_str()));
            node.insert("side".to_string(), Value::from(leg.side));
            node.insert("price".to_string(), price.clone());
            if let Some(point) = point {
                node.insert("point".to_string(), Value::from(point));
            }
            if let Some(provider) = &provider {
                node.insert("provider".to_string(), provider.clone());
            }
            if let Some(last_update) = &last_update {
                node.insert("last_update".to_string(), last_update.clone());
            }
            Some(record_from_normalized(&Value::Object(node)))
        })
        .collect()
}
