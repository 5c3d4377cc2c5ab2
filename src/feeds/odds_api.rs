use crate::feeds::normalize::{as_text, lookup, record_from_normalized};
use crate::models::CanonicalOddsRecord;
use serde_json::{Map, Value};

/// TheOddsAPI event: `bookmakers[].markets[].outcomes[]`
pub fn is_event(node: &Value) -> bool {
    node.get("bookmakers").map_or(false, Value::is_array)
}

fn items<'a>(node: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    node.get(key)
        .and_then(Value::as_array)
        .map(|items| items.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|item| item.is_object())
}

/// Flatten one key-normalized TheOddsAPI event into a record per outcome
///
/// Outcome names equal to the event's home or away team become "home" /
/// "away". Market-level `last_update` wins over the bookmaker's.
pub fn records_from_event(event: &Value) -> Vec<CanonicalOddsRecord> {
    let home_team = lookup(event, &["home_team"]).and_then(as_text);
    let away_team = lookup(event, &["away_team"]).and_then(as_text);
    let mut records = Vec::new();

    for bookmaker in items(event, "bookmakers") {
        let provider = lookup(bookmaker, &["title", "key"]).cloned();

        for market in items(bookmaker, "markets") {
            let market_key = lookup(market, &["key"]).cloned();
            let last_update = lookup(market, &["last_update"])
                .or_else(|| lookup(bookmaker, &["last_update"]))
                .cloned();

            for outcome in items(market, "outcomes") {
                let mut leg: Map<String, Value> =
                    outcome.as_object().cloned().unwrap_or_default();

                let side = lookup(outcome, &["name"]).and_then(as_text).map(|name| {
                    if home_team.as_deref() == Some(name.as_str()) {
                        "home".to_string()
                    } else if away_team.as_deref() == Some(name.as_str()) {
                        "away".to_string()
                    } else {
                        name
                    }
                });

                if let Some(side) = side {
                    leg.insert("side".to_string(), Value::String(side));
                }
                if let Some(provider) = &provider {
                    leg.insert("provider".to_string(), provider.clone());
                }
                if let Some(market_key) = &market_key {
                    leg.insert("market".to_string(), market_key.clone());
                }
                if let Some(last_update) = &last_update {
                    leg.insert("last_update".to_string(), last_update.clone());
                }

                records.push(record_from_normalized(&Value::Object(leg)));
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::normalize::deep_normalize;
    use crate::models::{Market, Price};
    use serde_json::json;

    fn event() -> Value {
        deep_normalize(&json!({
            "id": "e912304de2b2ede8fc4d47a7a7a7a7a7",
            "sport_key": "americanfootball_nfl",
            "commence_time": "2026-10-18T17:00:00Z",
            "home_team": "Kansas City Chiefs",
            "away_team": "Buffalo Bills",
            "bookmakers": [
                {
                    "key": "draftkings",
                    "title": "DraftKings",
                    "last_update": "2026-10-16T12:00:00Z",
                    "markets": [
                        {
                            "key": "h2h",
                            "outcomes": [
                                {"name": "Kansas City Chiefs", "price": -150},
                                {"name": "Buffalo Bills", "price": 130}
                            ]
                        },
                        {
                            "key": "totals",
                            "last_update": "2026-10-16T12:05:00Z",
                            "outcomes": [
                                {"name": "Over", "price": -110, "point": 47.5},
                                {"name": "Under", "price": "bogus", "point": 47.5}
                            ]
                        }
                    ]
                },
                {
                    "key": "fanduel",
                    "markets": [
                        {
                            "key": "player_pass_tds",
                            "outcomes": [
                                {"name": "Over", "description": "Josh Allen", "price": 140, "point": 1.5}
                            ]
                        }
                    ]
                },
                "not a bookmaker"
            ]
        }))
    }

    #[test]
    fn test_is_event() {
        assert!(is_event(&event()));
        assert!(!is_event(&json!({"bookmakers": "none"})));
        assert!(!is_event(&json!([])));
    }

    #[test]
    fn test_records_from_event() {
        let records = records_from_event(&event());
        assert_eq!(records.len(), 5);

        let home = &records[0];
        assert_eq!(home.provider.as_deref(), Some("DraftKings"));
        assert_eq!(home.market, Some(Market::Moneyline));
        assert_eq!(home.side.as_deref(), Some("home"));
        assert_eq!(home.price.american().unwrap().value(), -150);
        assert_eq!(
            home.last_updated.unwrap().to_rfc3339(),
            "2026-10-16T12:00:00+00:00"
        );

        assert_eq!(records[1].side.as_deref(), Some("away"));

        let over = &records[2];
        assert_eq!(over.market, Some(Market::Total));
        assert_eq!(over.side.as_deref(), Some("over"));
        assert_eq!(over.point, Some(47.5));
        assert_eq!(
            over.last_updated.unwrap().to_rfc3339(),
            "2026-10-16T12:05:00+00:00"
        );

        assert_eq!(records[3].price, Price::Unavailable);
        assert_eq!(records[3].point, Some(47.5));

        let prop = &records[4];
        assert_eq!(prop.provider.as_deref(), Some("fanduel"));
        assert_eq!(prop.market, Some(Market::PlayerProp));
        assert_eq!(prop.side.as_deref(), Some("Josh Allen over"));
        assert_eq!(prop.last_updated, None);
    }
}
