use std::path::PathBuf;

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_STAKE: f64 = 100.0;

/// Settings for the command line tool, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Provider stamped on records whose payload names none
    pub default_provider: Option<String>,
    /// Directory exports are written to
    pub output_dir: PathBuf,
    /// Stake used when pricing a slip payout
    pub default_stake: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            default_stake: DEFAULT_STAKE,
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read settings from the environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            default_provider: get("WAGERLOOP_DEFAULT_PROVIDER")
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            output_dir: get("WAGERLOOP_OUTPUT_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            default_stake: get("WAGERLOOP_DEFAULT_STAKE")
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|stake| stake.is_finite() && *stake > 0.0)
                .unwrap_or(defaults.default_stake),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("WAGERLOOP_DEFAULT_PROVIDER", " manual "),
            ("WAGERLOOP_OUTPUT_DIR", "/tmp/exports"),
            ("WAGERLOOP_DEFAULT_STAKE", "25"),
        ]);
        assert_eq!(config.default_provider.as_deref(), Some("manual"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.default_stake, 25.0);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[
            ("WAGERLOOP_DEFAULT_PROVIDER", "  "),
            ("WAGERLOOP_DEFAULT_STAKE", "-5"),
        ]);
        assert_eq!(config.default_provider, None);
        assert_eq!(config.default_stake, DEFAULT_STAKE);

        let config = config_from(&[("WAGERLOOP_DEFAULT_STAKE", "lots")]);
        assert_eq!(config.default_stake, DEFAULT_STAKE);
    }
}
