use crate::error::OddsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A game a pick can be placed on (supplied by the surrounding app)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    pub sport: String,
}

/// A validated American odds price (e.g., -110, +150)
///
/// Magnitude is always at least 100. `-100` and `+100` are the same
/// even-money price and are both stored as `+100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AmericanOdds(i64);

impl AmericanOdds {
    pub const EVEN: AmericanOdds = AmericanOdds(100);

    pub fn new(value: i64) -> Result<Self, OddsError> {
        if value.unsigned_abs() < 100 {
            return Err(OddsError::invalid_american(value));
        }
        if value == -100 {
            return Ok(Self::EVEN);
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Underdog prices are positive
    pub fn is_underdog(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl TryFrom<i64> for AmericanOdds {
    type Error = OddsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        AmericanOdds::new(value)
    }
}

impl TryFrom<i32> for AmericanOdds {
    type Error = OddsError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        AmericanOdds::new(value as i64)
    }
}

impl From<AmericanOdds> for i64 {
    fn from(odds: AmericanOdds) -> Self {
        odds.0
    }
}

impl FromStr for AmericanOdds {
    type Err = OddsError;

    /// Accepts "-110", "+150", "150", and the even-money spellings "EVEN" / "EV"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("even") || trimmed.eq_ignore_ascii_case("ev") {
            return Ok(Self::EVEN);
        }
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let value: i64 = digits.parse().map_err(|_| OddsError::InvalidOddsFormat {
            value: trimmed.to_string(),
            reason: "not an integer American odds value",
        })?;
        AmericanOdds::new(value)
    }
}

/// Bet market types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    Moneyline,
    Spread,
    Total,
    PlayerProp,
}

impl Market {
    /// Parse a provider market key ("h2h", "spreads", "totals", "player_pass_tds", ...)
    pub fn parse(key: &str) -> Option<Market> {
        let key = key.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "moneyline" | "money_line" | "ml" | "h2h" | "head_to_head" => Some(Market::Moneyline),
            "spread" | "spreads" | "point_spread" | "handicap" | "run_line" | "puck_line" => {
                Some(Market::Spread)
            }
            "total" | "totals" | "over_under" | "ou" => Some(Market::Total),
            "player_prop" | "player_props" | "prop" | "props" => Some(Market::PlayerProp),
            other if other.starts_with("player_") => Some(Market::PlayerProp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Market::Moneyline => "moneyline",
            Market::Spread => "spread",
            Market::Total => "total",
            Market::PlayerProp => "player_prop",
        }
    }

    /// Spread and total quotes are meaningless without a line
    pub fn requires_point(self) -> bool {
        matches!(self, Market::Spread | Market::Total)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market-dependent selector for a quote
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
    Over,
    Under,
    /// Player + line descriptor, e.g. "Patrick Mahomes Over"
    Prop(String),
}

impl Side {
    pub fn parse(s: &str) -> Side {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Side::Home,
            "away" => Side::Away,
            "over" | "o" => Side::Over,
            "under" | "u" => Side::Under,
            _ => Side::Prop(s.trim().to_string()),
        }
    }

    fn fits(&self, market: Market) -> bool {
        match market {
            Market::Moneyline | Market::Spread => matches!(self, Side::Home | Side::Away),
            Market::Total => matches!(self, Side::Over | Side::Under),
            Market::PlayerProp => !matches!(self, Side::Home | Side::Away),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
            Side::Over => f.write_str("over"),
            Side::Under => f.write_str("under"),
            Side::Prop(descriptor) => f.write_str(descriptor),
        }
    }
}

/// A single priced outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    pub market: Market,
    pub side: Side,
    pub price: AmericanOdds,
    pub point: Option<f64>,
}

impl OddsQuote {
    pub fn new(
        market: Market,
        side: Side,
        price: AmericanOdds,
        point: Option<f64>,
    ) -> Result<Self, OddsError> {
        if !side.fits(market) {
            return Err(OddsError::InvalidQuote {
                reason: format!("side '{}' does not belong to a {} market", side, market),
            });
        }
        match point {
            None if market.requires_point() => {
                return Err(OddsError::InvalidQuote {
                    reason: format!("{} quote requires a point", market),
                });
            }
            Some(_) if market == Market::Moneyline => {
                return Err(OddsError::InvalidQuote {
                    reason: "moneyline quote cannot carry a point".to_string(),
                });
            }
            Some(p) if !p.is_finite() => {
                return Err(OddsError::InvalidQuote {
                    reason: format!("point {} is not a finite number", p),
                });
            }
            _ => {}
        }
        Ok(Self {
            market,
            side,
            price,
            point,
        })
    }

    pub fn moneyline(side: Side, price: AmericanOdds) -> Result<Self, OddsError> {
        Self::new(Market::Moneyline, side, price, None)
    }

    /// Display label such as "Chiefs -3.5 (-110)" or "Over 47.5 (-110)"
    pub fn label(&self, game: &Game) -> String {
        let selection = match &self.side {
            Side::Home => game.home_team.clone(),
            Side::Away => game.away_team.clone(),
            Side::Over => "Over".to_string(),
            Side::Under => "Under".to_string(),
            Side::Prop(descriptor) => descriptor.clone(),
        };
        match (self.market, self.point) {
            (Market::Spread, Some(point)) => {
                format!("{} {:+.1} ({})", selection, point, self.price)
            }
            (_, Some(point)) => format!("{} {:.1} ({})", selection, point, self.price),
            (_, None) => format!("{} ({})", selection, self.price),
        }
    }
}

/// One leg a user selected for a bet slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub game: Game,
    pub quote: OddsQuote,
    pub reasoning: Option<String>,
}

impl Pick {
    pub fn new(game: Game, quote: OddsQuote) -> Self {
        Self {
            game,
            quote,
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn label(&self) -> String {
        self.quote.label(&self.game)
    }
}

/// Price field of a normalized record
///
/// `Unavailable` means the provider sent something that could not be read
/// as valid odds. It is never conflated with a zero price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "american", rename_all = "snake_case")]
pub enum Price {
    Available(AmericanOdds),
    #[default]
    Unavailable,
}

impl Price {
    pub fn american(self) -> Option<AmericanOdds> {
        match self {
            Price::Available(odds) => Some(odds),
            Price::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Price::Available(_))
    }
}

impl From<Option<AmericanOdds>> for Price {
    fn from(odds: Option<AmericanOdds>) -> Self {
        odds.map_or(Price::Unavailable, Price::Available)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Available(odds) => write!(f, "{}", odds),
            Price::Unavailable => f.write_str("N/A"),
        }
    }
}

/// Provider-independent odds record produced by normalization
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalOddsRecord {
    pub provider: Option<String>,
    pub market: Option<Market>,
    pub side: Option<String>,
    pub price: Price,
    pub point: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl CanonicalOddsRecord {
    pub fn format(&self) -> String {
        format!(
            "{} | {} | {} | {}{}",
            self.provider.as_deref().unwrap_or("unknown"),
            self.market.map_or("unknown", Market::as_str),
            self.side.as_deref().unwrap_or("-"),
            self.price,
            self.point.map(|p| format!(" @ {}", p)).unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn game() -> Game {
        Game {
            id: "g1".to_string(),
            home_team: "Kansas City Chiefs".to_string(),
            away_team: "Buffalo Bills".to_string(),
            commence_time: Utc.with_ymd_and_hms(2026, 1, 18, 23, 30, 0).unwrap(),
            sport: "NFL".to_string(),
        }
    }

    #[test]
    fn test_american_odds_domain() {
        assert!(AmericanOdds::new(100).is_ok());
        assert!(AmericanOdds::new(-100).is_ok());
        assert!(AmericanOdds::new(99).is_err());
        assert!(AmericanOdds::new(-99).is_err());
        assert!(AmericanOdds::new(0).is_err());
        assert_eq!(AmericanOdds::new(-100).unwrap(), AmericanOdds::EVEN);
    }

    #[test]
    fn test_american_odds_parse_and_display() {
        assert_eq!("+150".parse::<AmericanOdds>().unwrap().value(), 150);
        assert_eq!(" -110 ".parse::<AmericanOdds>().unwrap().value(), -110);
        assert_eq!("EVEN".parse::<AmericanOdds>().unwrap(), AmericanOdds::EVEN);
        assert!("abc".parse::<AmericanOdds>().is_err());
        assert!("50".parse::<AmericanOdds>().is_err());

        assert_eq!(AmericanOdds::new(150).unwrap().to_string(), "+150");
        assert_eq!(AmericanOdds::new(-110).unwrap().to_string(), "-110");
    }

    #[test]
    fn test_side_parse() {
        assert_eq!(Side::parse("HOME"), Side::Home);
        assert_eq!(Side::parse("o"), Side::Over);
        assert_eq!(
            Side::parse(" Josh Allen Over "),
            Side::Prop("Josh Allen Over".to_string())
        );
        assert!(AmericanOdds::new(120).unwrap().is_underdog());
        assert!(!AmericanOdds::new(-120).unwrap().is_underdog());
    }

    #[test]
    fn test_american_odds_serde_rejects_invalid() {
        let odds: AmericanOdds = serde_json::from_str("-120").unwrap();
        assert_eq!(odds.value(), -120);
        assert!(serde_json::from_str::<AmericanOdds>("42").is_err());
    }

    #[test]
    fn test_market_parse_aliases() {
        assert_eq!(Market::parse("h2h"), Some(Market::Moneyline));
        assert_eq!(Market::parse("Spreads"), Some(Market::Spread));
        assert_eq!(Market::parse("over-under"), Some(Market::Total));
        assert_eq!(Market::parse("player_pass_tds"), Some(Market::PlayerProp));
        assert_eq!(Market::parse("futures"), None);
    }

    #[test]
    fn test_quote_validation() {
        let price = AmericanOdds::new(-110).unwrap();
        assert!(OddsQuote::new(Market::Spread, Side::Home, price, None).is_err());
        assert!(OddsQuote::new(Market::Moneyline, Side::Home, price, Some(3.5)).is_err());
        assert!(OddsQuote::new(Market::Total, Side::Home, price, Some(47.5)).is_err());
        assert!(OddsQuote::new(Market::Spread, Side::Away, price, Some(f64::NAN)).is_err());
        assert!(OddsQuote::new(Market::Total, Side::Over, price, Some(47.5)).is_ok());
        assert!(OddsQuote::new(
            Market::PlayerProp,
            Side::Prop("Patrick Mahomes Over".to_string()),
            price,
            Some(1.5)
        )
        .is_ok());
    }

    #[test]
    fn test_quote_label() {
        let price = AmericanOdds::new(-110).unwrap();
        let spread = OddsQuote::new(Market::Spread, Side::Home, price, Some(-3.5)).unwrap();
        assert_eq!(spread.label(&game()), "Kansas City Chiefs -3.5 (-110)");

        let total = OddsQuote::new(Market::Total, Side::Under, price, Some(47.5)).unwrap();
        assert_eq!(total.label(&game()), "Under 47.5 (-110)");

        let ml = OddsQuote::moneyline(Side::Away, AmericanOdds::new(135).unwrap()).unwrap();
        assert_eq!(ml.label(&game()), "Buffalo Bills (+135)");
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::Unavailable.to_string(), "N/A");
        assert_eq!(Price::from(AmericanOdds::new(-200).ok()).to_string(), "-200");
        assert_eq!(Price::default(), Price::Unavailable);
    }
}
