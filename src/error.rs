use thiserror::Error;

/// Errors raised by the odds engine.
///
/// Only caller-data problems live here. Malformed provider payloads never
/// produce an `OddsError`; they degrade to `Price::Unavailable` or absent
/// fields during normalization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OddsError {
    /// An American or decimal price outside its valid domain
    #[error("invalid odds format: {value} ({reason})")]
    InvalidOddsFormat { value: String, reason: &'static str },

    /// A parlay leg carried an invalid price
    #[error("parlay leg {leg}: {source}")]
    InvalidParlayLeg {
        leg: usize,
        #[source]
        source: Box<OddsError>,
    },

    /// A quote whose side or point does not fit its market
    #[error("invalid quote: {reason}")]
    InvalidQuote { reason: String },
}

impl OddsError {
    pub(crate) fn invalid_american(value: i64) -> Self {
        OddsError::InvalidOddsFormat {
            value: value.to_string(),
            reason: "American odds must be +100 or greater, or -100 or less",
        }
    }

    pub(crate) fn invalid_decimal(value: f64) -> Self {
        OddsError::InvalidOddsFormat {
            value: value.to_string(),
            reason: "decimal odds must be a finite number greater than 1.0",
        }
    }

    pub(crate) fn at_leg(self, leg: usize) -> Self {
        OddsError::InvalidParlayLeg {
            leg,
            source: Box::new(self),
        }
    }

    /// True for `InvalidOddsFormat`, whether raised directly or from a parlay leg.
    pub fn is_invalid_format(&self) -> bool {
        match self {
            OddsError::InvalidOddsFormat { .. } => true,
            OddsError::InvalidParlayLeg { source, .. } => source.is_invalid_format(),
            OddsError::InvalidQuote { .. } => false,
        }
    }

    /// Zero-based index of the offending parlay leg, if any.
    pub fn leg(&self) -> Option<usize> {
        match self {
            OddsError::InvalidParlayLeg { leg, .. } => Some(*leg),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OddsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_wrapping_keeps_category() {
        let err = OddsError::invalid_american(50).at_leg(2);
        assert!(err.is_invalid_format());
        assert_eq!(err.leg(), Some(2));
        assert_eq!(
            err.to_string(),
            "parlay leg 2: invalid odds format: 50 (American odds must be +100 or greater, or -100 or less)"
        );
    }

    #[test]
    fn test_quote_error_is_not_format_error() {
        let err = OddsError::InvalidQuote {
            reason: "spread quote requires a point".to_string(),
        };
        assert!(!err.is_invalid_format());
        assert_eq!(err.leg(), None);
    }
}
