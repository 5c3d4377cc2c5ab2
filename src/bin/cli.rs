use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wagerloop_odds::config::Config;
use wagerloop_odds::data::{load_payload, save_records_to_csv, save_records_to_json};
use wagerloop_odds::feeds::{fill_default_provider, normalize_payload};
use wagerloop_odds::models::AmericanOdds;
use wagerloop_odds::odds_converter::{
    american_to_decimal, decimal_to_american, display_or_na, implied_probability,
    profit_for_stake,
};
use wagerloop_odds::parlay::combine_parlay_decimal;

#[derive(Parser)]
#[command(name = "wagerloop")]
#[command(version)]
#[command(about = "Odds conversion, parlay pricing and payload normalization", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert American odds to decimal, or decimal back to American
    Convert {
        /// American odds, e.g. -110, +150, EVEN
        #[arg(allow_hyphen_values = true, required_unless_present = "decimal")]
        odds: Option<String>,
        /// Decimal odds to convert to American instead
        #[arg(long, conflicts_with = "odds")]
        decimal: Option<f64>,
    },
    /// Price a parlay from two or more American odds legs
    Parlay {
        /// American odds for each leg
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        legs: Vec<String>,
        /// Stake to price the payout with (defaults to WAGERLOOP_DEFAULT_STAKE)
        #[arg(long)]
        stake: Option<f64>,
    },
    /// Normalize a provider odds payload stored in a JSON file
    Normalize {
        file: PathBuf,
        /// Also export the records as CSV into the output directory
        #[arg(long)]
        csv: bool,
        /// Also export the records as JSON into the output directory
        #[arg(long)]
        json: bool,
    },
}

/// Parse a leg without validating its range so the parlay can name the bad leg
fn parse_leg(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("even") || trimmed.eq_ignore_ascii_case("ev") {
        return Ok(AmericanOdds::EVEN.value());
    }
    trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .parse()
        .with_context(|| format!("'{}' is not an American odds value", raw))
}

fn run_convert(odds: Option<String>, decimal: Option<f64>) -> Result<()> {
    if let Some(decimal) = decimal {
        let american = decimal_to_american(decimal);
        if let Err(e) = &american {
            warn!("{}", e);
        }
        println!("Decimal {} -> American {}", decimal, display_or_na(&american));
        return Ok(());
    }

    let Some(raw) = odds else {
        bail!("Provide American odds or --decimal");
    };
    let odds: AmericanOdds = raw.parse()?;
    let decimal = american_to_decimal(odds.value())?;
    println!("American {} -> Decimal {:.4}", odds, decimal);
    println!(
        "Implied probability: {:.1}%",
        implied_probability(odds) * 100.0
    );
    Ok(())
}

/// Combined decimal and American price, or `None` for fewer than two legs
fn price_parlay(legs: &[i64]) -> Result<Option<(f64, AmericanOdds)>> {
    let Some(decimal) = combine_parlay_decimal(legs)? else {
        return Ok(None);
    };
    Ok(Some((decimal, decimal_to_american(decimal)?)))
}

fn run_parlay(legs: &[String], stake: f64) -> Result<()> {
    let legs = legs
        .iter()
        .map(|leg| parse_leg(leg))
        .collect::<Result<Vec<_>>>()?;

    let Some((decimal, price)) = price_parlay(&legs)? else {
        println!("A single pick is not a parlay");
        return Ok(());
    };

    println!("{}-leg parlay: {}", legs.len(), price);
    println!("Decimal: {:.4}", decimal);
    println!(
        "Implied probability: {:.2}%",
        implied_probability(price) * 100.0
    );
    println!(
        "Stake {:.2} returns {:.2} (profit {:.2})",
        stake,
        decimal * stake,
        profit_for_stake(price, stake)
    );
    Ok(())
}

fn run_normalize(config: &Config, file: PathBuf, csv: bool, json: bool) -> Result<()> {
    let payload = load_payload(&file)?;
    let mut records = normalize_payload(&payload);
    if let Some(provider) = &config.default_provider {
        fill_default_provider(&mut records, provider);
    }

    info!(count = records.len(), file = %file.display(), "normalized payload");
    if records.is_empty() {
        println!("No odds records found in {}", file.display());
    }
    for (i, record) in records.iter().enumerate() {
        println!("{}. {}", i + 1, record.format());
    }

    if csv || json {
        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                config.output_dir.display()
            )
        })?;
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("odds");
        if csv {
            let path = config.output_dir.join(format!("{}_records.csv", stem));
            save_records_to_csv(&records, &path)?;
            println!("\nSaved records to {}", path.display());
        }
        if json {
            let path = config.output_dir.join(format!("{}_records.json", stem));
            save_records_to_json(&records, &path)?;
            println!("\nSaved records to {}", path.display());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert { odds, decimal } => run_convert(odds, decimal),
        Commands::Parlay { legs, stake } => {
            run_parlay(&legs, stake.unwrap_or(config.default_stake))
        }
        Commands::Normalize { file, csv, json } => run_normalize(&config, file, csv, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leg() {
        assert_eq!(parse_leg("+150").unwrap(), 150);
        assert_eq!(parse_leg(" -110 ").unwrap(), -110);
        assert_eq!(parse_leg("EVEN").unwrap(), 100);
        // Out-of-range values are left for the parlay to reject by index
        assert_eq!(parse_leg("50").unwrap(), 50);
        assert!(parse_leg("abc").is_err());
    }

    #[test]
    fn test_price_parlay() {
        let (decimal, price) = price_parlay(&[150, -200]).unwrap().unwrap();
        assert!((decimal - 3.75).abs() < 1e-9);
        assert_eq!(price.value(), 275);

        assert!(price_parlay(&[-110]).unwrap().is_none());
        assert!(price_parlay(&[-110, 50]).is_err());
    }
}
