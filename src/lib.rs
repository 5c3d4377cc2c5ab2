//! Odds engine for the WagerLoop betting app.
//!
//! Pure, synchronous functions over already-fetched data: American/decimal
//! odds conversion, parlay pricing, and normalization of third-party odds
//! payloads into a canonical record.

pub mod config;
pub mod error;
pub mod feeds;
pub mod models;
pub mod utils;

pub use error::{OddsError, Result};
pub use feeds::{normalize, normalize_payload};
pub use models::*;
pub use utils::*;

pub use utils::odds_converter::{american_to_decimal, decimal_to_american};
pub use utils::parlay::{combine_parlay, PickSlip};
