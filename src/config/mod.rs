//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

/// Bot configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,

    /// Fixed seed for the dodge tie-break, random when unset
    pub seed: Option<u64>,

    /// Decision thresholds
    pub tuning: Tuning,
}

/// Distances the decision policy compares against, in map units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Per-axis window inside which bullets are assessed
    pub bullet_window: f64,
    /// Distance from a boundary corner (per axis) that triggers recentering
    pub boundary_margin: f64,
    /// Movement below this between turns counts as being stuck
    pub stuck_distance: f64,
    /// Opponent closer than this triggers a retreat
    pub retreat_distance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bullet_window: 100.0,
            boundary_margin: 80.0,
            stuck_distance: 1.0,
            retreat_distance: 200.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Tuning::default();

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
        };

        let seed = match lookup("BOT_SEED") {
            Some(raw) => Some(parse_value::<u64>(&raw, "BOT_SEED")?),
            None => None,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
            seed,
            tuning: Tuning {
                bullet_window: threshold(&lookup, "BULLET_WINDOW", defaults.bullet_window)?,
                boundary_margin: threshold(&lookup, "BOUNDARY_MARGIN", defaults.boundary_margin)?,
                stuck_distance: threshold(&lookup, "STUCK_DISTANCE", defaults.stuck_distance)?,
                retreat_distance: threshold(
                    &lookup,
                    "RETREAT_DISTANCE",
                    defaults.retreat_distance,
                )?,
            },
        })
    }
}

fn parse_value<T: FromStr>(raw: &str, key: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid(key))
}

/// Read a non-negative, finite distance threshold
fn threshold<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value: f64 = parse_value(&raw, key)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid(key));
    }
    Ok(value)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.seed, None);
        assert_eq!(config.tuning, Tuning::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "json"),
            ("BOT_SEED", " 42 "),
            ("BULLET_WINDOW", "55.5"),
            ("RETREAT_DISTANCE", "0"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.tuning.bullet_window, 55.5);
        assert_eq!(config.tuning.retreat_distance, 0.0);
        assert_eq!(config.tuning.boundary_margin, 80.0);
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            ("LOG_FORMAT", "xml"),
            ("BOT_SEED", "-1"),
            ("BOUNDARY_MARGIN", "-3"),
            ("STUCK_DISTANCE", "NaN"),
            ("BULLET_WINDOW", "far"),
        ] {
            let err = Config::from_lookup(lookup_from(&[(key, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(k) if k == key), "{key}={value}");
        }
    }
}
