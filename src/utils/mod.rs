pub mod data;
pub mod odds_converter;
pub mod parlay;
