use crate::error::Result;
use crate::models::{AmericanOdds, OddsQuote, Pick};
use crate::utils::odds_converter::{american_to_decimal, decimal_to_american};
use serde::{Deserialize, Serialize};

/// Anything that carries an American price and can be a parlay leg
pub trait Leg {
    fn american_price(&self) -> i64;
}

impl Leg for i64 {
    fn american_price(&self) -> i64 {
        *self
    }
}

impl Leg for i32 {
    fn american_price(&self) -> i64 {
        *self as i64
    }
}

impl Leg for AmericanOdds {
    fn american_price(&self) -> i64 {
        self.value()
    }
}

impl Leg for OddsQuote {
    fn american_price(&self) -> i64 {
        self.price.value()
    }
}

impl Leg for Pick {
    fn american_price(&self) -> i64 {
        self.quote.price.value()
    }
}

/// Product of every leg's decimal odds
/// Returns None for fewer than two legs (a single is not a parlay)
pub fn combine_parlay_decimal<L: Leg>(legs: &[L]) -> Result<Option<f64>> {
    if legs.len() < 2 {
        return Ok(None);
    }

    let mut combined = 1.0;
    for (index, leg) in legs.iter().enumerate() {
        let decimal = american_to_decimal(leg.american_price()).map_err(|e| e.at_leg(index))?;
        combined *= decimal;
    }

    Ok(Some(combined))
}

/// Combined American price of a parlay
pub fn combine_parlay_odds<L: Leg>(legs: &[L]) -> Result<Option<AmericanOdds>> {
    match combine_parlay_decimal(legs)? {
        Some(decimal) => decimal_to_american(decimal).map(Some),
        None => Ok(None),
    }
}

/// Combined parlay price formatted with an explicit sign ("+264", "-150")
///
/// `Ok(None)` means the slip is not a parlay and no badge should be shown.
pub fn combine_parlay<L: Leg>(legs: &[L]) -> Result<Option<String>> {
    Ok(combine_parlay_odds(legs)?.map(|odds| odds.to_string()))
}

/// What a slip currently represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlipKind {
    Empty,
    Single,
    Parlay(usize),
}

/// An in-memory bet slip built during a "build post" flow
///
/// Picks keep insertion order for display; price does not depend on order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickSlip {
    picks: Vec<Pick>,
}

impl PickSlip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pick. Returns false if the slip already holds a pick on the
    /// same game, market and side.
    pub fn add(&mut self, pick: Pick) -> bool {
        let duplicate = self.picks.iter().any(|existing| {
            existing.game.id == pick.game.id
                && existing.quote.market == pick.quote.market
                && existing.quote.side == pick.quote.side
        });
        if duplicate {
            return false;
        }
        self.picks.push(pick);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Pick> {
        (index < self.picks.len()).then(|| self.picks.remove(index))
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn kind(&self) -> SlipKind {
        match self.picks.len() {
            0 => SlipKind::Empty,
            1 => SlipKind::Single,
            n => SlipKind::Parlay(n),
        }
    }

    /// Price of the whole slip: the leg price for a single, the combined
    /// price for a parlay, None when empty
    pub fn combined_price(&self) -> Result<Option<AmericanOdds>> {
        match self.picks.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(single.quote.price)),
            picks => combine_parlay_odds(picks),
        }
    }

    /// Total return for a winning slip at the given stake
    pub fn potential_payout(&self, stake: f64) -> Result<Option<f64>> {
        let decimal = match self.picks.as_slice() {
            [] => None,
            [single] => Some(american_to_decimal(single.quote.price.value())?),
            picks => combine_parlay_decimal(picks)?,
        };
        Ok(decimal.map(|d| d * stake))
    }

    /// One-line description for display, None for an empty slip
    pub fn summary(&self) -> Option<String> {
        let price = match self.combined_price() {
            Ok(Some(odds)) => odds.to_string(),
            Ok(None) => return None,
            Err(_) => "N/A".to_string(),
        };
        let legs = self
            .picks
            .iter()
            .map(Pick::label)
            .collect::<Vec<_>>()
            .join(" + ");
        Some(match self.kind() {
            SlipKind::Parlay(n) => format!("{}-leg parlay ({}): {}", n, price, legs),
            _ => format!("Single ({}): {}", price, legs),
        })
    }
}
