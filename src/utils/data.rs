use crate::models::CanonicalOddsRecord;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load a raw provider payload from a JSON file
pub fn load_payload(path: &Path) -> Result<Value> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file {}", path.display()))?;
    let payload: Value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
    Ok(payload)
}

/// Save canonical records to a JSON file
pub fn save_records_to_json(records: &[CanonicalOddsRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize odds records")?;
    std::fs::write(path, json).context("Failed to write JSON file")?;
    Ok(())
}

/// Save canonical records to CSV
pub fn save_records_to_csv(records: &[CanonicalOddsRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("Failed to create CSV file")?;

    writer.write_record(["Provider", "Market", "Side", "Price", "Point", "Last Updated"])?;

    for record in records {
        writer.write_record([
            record.provider.clone().unwrap_or_default(),
            record.market.map(|m| m.to_string()).unwrap_or_default(),
            record.side.clone().unwrap_or_default(),
            record.price.to_string(),
            record.point.map(|p| p.to_string()).unwrap_or_default(),
            record
                .last_updated
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        ])?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}
