use crate::error::{OddsError, Result};
use crate::models::AmericanOdds;

/// Largest American magnitude a combined price may reach before it stops
/// being an exactly representable integer in an f64
const MAX_AMERICAN_MAGNITUDE: f64 = 9_007_199_254_740_992.0;

/// Convert American odds to decimal odds (total payout per unit staked)
/// Positive odds (+150) -> 1 + 150/100 = 2.5
/// Negative odds (-110) -> 1 + 100/110 = 1.909...
pub fn american_to_decimal(american: i64) -> Result<f64> {
    AmericanOdds::new(american).map(decimal_from_odds)
}

/// Infallible form of `american_to_decimal` for an already validated price
pub fn decimal_from_odds(odds: AmericanOdds) -> f64 {
    let american = odds.value() as f64;
    if american > 0.0 {
        1.0 + american / 100.0
    } else {
        1.0 + 100.0 / american.abs()
    }
}

/// Convert decimal odds back to American odds
///
/// Rounds half away from zero (`f64::round`). Decimal 2.0 maps to +100.
pub fn decimal_to_american(decimal: f64) -> Result<AmericanOdds> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(OddsError::invalid_decimal(decimal));
    }

    let american = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        -(100.0 / (decimal - 1.0)).round()
    };

    if !american.is_finite() || american.abs() > MAX_AMERICAN_MAGNITUDE {
        return Err(OddsError::InvalidOddsFormat {
            value: decimal.to_string(),
            reason: "price exceeds the representable American odds range",
        });
    }

    AmericanOdds::new(american as i64)
}

/// Convert American odds to implied probability
/// Positive odds (+150) mean you win $150 on a $100 bet
/// Negative odds (-150) mean you need to bet $150 to win $100
pub fn implied_probability(odds: AmericanOdds) -> f64 {
    1.0 / decimal_from_odds(odds)
}

/// Profit (excluding the returned stake) for a winning bet
pub fn profit_for_stake(odds: AmericanOdds, stake: f64) -> f64 {
    stake * (decimal_from_odds(odds) - 1.0)
}

/// Total return (stake + profit) for a winning bet
pub fn payout_for_stake(odds: AmericanOdds, stake: f64) -> f64 {
    stake * decimal_from_odds(odds)
}

/// Render a conversion result for display, falling back to "N/A"
pub fn display_or_na(result: &Result<AmericanOdds>) -> String {
    match result {
        Ok(odds) => odds.to_string(),
        Err(_) => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds(value: i64) -> AmericanOdds {
        AmericanOdds::new(value).unwrap()
    }

    #[test]
    fn test_american_to_decimal() {
        assert!((american_to_decimal(150).unwrap() - 2.5).abs() < 1e-12);
        assert!((american_to_decimal(-110).unwrap() - 1.909_090_909).abs() < 1e-8);
        assert!((american_to_decimal(100).unwrap() - 2.0).abs() < 1e-12);
        assert!((american_to_decimal(-100).unwrap() - 2.0).abs() < 1e-12);
        assert!((american_to_decimal(-200).unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_american_to_decimal_rejects_dead_zone() {
        for a in -99..=99 {
            let err = american_to_decimal(a).unwrap_err();
            assert!(err.is_invalid_format(), "{} should be rejected", a);
        }
    }

    #[test]
    fn test_decimal_is_always_above_one() {
        for a in [100, 101, 250, 10_000, -100, -101, -250, -10_000] {
            assert!(american_to_decimal(a).unwrap() > 1.0);
        }
    }

    #[test]
    fn test_decimal_to_american() {
        assert_eq!(decimal_to_american(2.5).unwrap().value(), 150);
        assert_eq!(decimal_to_american(1.5).unwrap().value(), -200);
        assert_eq!(decimal_to_american(2.0).unwrap().value(), 100);
        assert_eq!(decimal_to_american(3.75).unwrap().value(), 275);
        // 1.91 -> 100 / 0.91 = 109.89
        assert_eq!(decimal_to_american(1.91).unwrap().value(), -110);
    }

    #[test]
    fn test_decimal_to_american_rounding() {
        // 112.5 is exact in binary and rounds away from zero
        assert_eq!(decimal_to_american(2.125).unwrap().value(), 113);
        assert_eq!(decimal_to_american(1.8).unwrap().value(), -125);
        assert_eq!(decimal_to_american(1.64).unwrap().value(), -156);
    }

    #[test]
    fn test_decimal_to_american_rejects_degenerate() {
        assert!(decimal_to_american(1.0).is_err());
        assert!(decimal_to_american(0.5).is_err());
        assert!(decimal_to_american(-3.0).is_err());
        assert!(decimal_to_american(f64::NAN).is_err());
        assert!(decimal_to_american(f64::INFINITY).is_err());
        assert!(decimal_to_american(1e300).is_err());
    }

    #[test]
    fn test_round_trip_is_exact() {
        for a in (100..=5_000).chain(-5_000..=-101) {
            let back = decimal_to_american(american_to_decimal(a).unwrap()).unwrap();
            assert_eq!(back.value(), a, "round trip failed for {}", a);
        }
        for a in [10_000, 25_000, 100_000, -10_000, -25_000, -100_000] {
            let back = decimal_to_american(american_to_decimal(a).unwrap()).unwrap();
            assert_eq!(back.value(), a);
        }
    }

    #[test]
    fn test_even_money_round_trip() {
        // -100 and +100 are the same price
        let back = decimal_to_american(american_to_decimal(-100).unwrap()).unwrap();
        assert_eq!(back, AmericanOdds::new(-100).unwrap());
        assert_eq!(back.value(), 100);
    }

    #[test]
    fn test_implied_probability() {
        assert!((implied_probability(odds(150)) - 0.4).abs() < 1e-9);
        assert!((implied_probability(odds(-150)) - 0.6).abs() < 1e-9);
        assert!((implied_probability(odds(100)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_stake_math() {
        assert!((profit_for_stake(odds(150), 100.0) - 150.0).abs() < 1e-9);
        assert!((profit_for_stake(odds(-110), 110.0) - 100.0).abs() < 1e-9);
        assert!((payout_for_stake(odds(-200), 50.0) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_or_na() {
        assert_eq!(display_or_na(&decimal_to_american(2.5)), "+150");
        assert_eq!(display_or_na(&decimal_to_american(1.0)), "N/A");
    }
}
