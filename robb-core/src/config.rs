//! Strategy configuration: indicator parameters and host-side session policy.
//!
//! Stored as TOML. Every table and key is optional and falls back to the
//! defaults below; whatever is loaded is validated before it is handed out.
//!
//! ```toml
//! name = "Robb Strategy"
//!
//! [params]
//! stddev_period = 20
//! profit_target_stddevs = 3.0
//! bbands_period = 58
//! upper_stddevs = 3.0
//! lower_stddevs = 3.0
//!
//! [policy]
//! force_close_at_session_end = true
//! max_open_position = 1
//! uses_advanced_order_management = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STRATEGY_NAME: &str = "Robb Strategy";

/// Smallest period for which both sample and population deviation are defined.
pub const MIN_PERIOD: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be >= 2, got {value}")]
    PeriodTooShort { name: &'static str, value: usize },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveMultiplier { name: &'static str, value: f64 },

    #[error("max_open_position must be >= 1")]
    ZeroMaxOpenPosition,

    #[error("parse strategy TOML: {0}")]
    Parse(String),

    #[error("read strategy config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The five scalar inputs of the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyParams {
    /// Lookback of the profit-target standard deviation.
    pub stddev_period: usize,
    /// Distance from entry to profit target, in standard deviations.
    pub profit_target_stddevs: f64,
    /// Lookback of the Bollinger Bands.
    pub bbands_period: usize,
    pub upper_stddevs: f64,
    pub lower_stddevs: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            stddev_period: 20,
            profit_target_stddevs: 3.0,
            bbands_period: 58,
            upper_stddevs: 3.0,
            lower_stddevs: 3.0,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_period("stddev_period", self.stddev_period)?;
        check_period("bbands_period", self.bbands_period)?;
        check_multiplier("profit_target_stddevs", self.profit_target_stddevs)?;
        check_multiplier("upper_stddevs", self.upper_stddevs)?;
        check_multiplier("lower_stddevs", self.lower_stddevs)?;
        Ok(())
    }

    /// Display names and values, in declaration order.
    pub fn parameter_table(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Standard deviation period", self.stddev_period.to_string()),
            (
                "Profit target standard deviations",
                self.profit_target_stddevs.to_string(),
            ),
            ("Bollinger Bands period", self.bbands_period.to_string()),
            ("Upper standard deviations", self.upper_stddevs.to_string()),
            ("Lower standard deviations", self.lower_stddevs.to_string()),
        ]
    }

    /// Bars needed before the entry rule can fire: the bands must have a
    /// previous and a current value, and the deviation a current one.
    pub fn warmup_bars(&self) -> usize {
        (self.bbands_period + 1).max(self.stddev_period)
    }
}

pub(crate) fn check_period(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value < MIN_PERIOD {
        return Err(ConfigError::PeriodTooShort { name, value });
    }
    Ok(())
}

pub(crate) fn check_multiplier(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::NonPositiveMultiplier { name, value });
    }
    Ok(())
}

/// Session-level safety flags.
///
/// These are read and enforced by the host (order routing, end-of-session
/// handling). Nothing in the evaluator branches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionPolicy {
    /// Close any open position when the session ends.
    pub force_close_at_session_end: bool,
    /// Maximum open position size in units, either side.
    pub max_open_position: u32,
    /// Simple order management: resting orders live for one bar and must be
    /// re-submitted on every bar.
    pub uses_advanced_order_management: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            force_close_at_session_end: true,
            max_open_position: 1,
            uses_advanced_order_management: false,
        }
    }
}

/// Complete, validated configuration of one strategy session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    pub name: String,
    pub params: StrategyParams,
    pub policy: SessionPolicy,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: STRATEGY_NAME.to_string(),
            params: StrategyParams::default(),
            policy: SessionPolicy::default(),
        }
    }
}

impl StrategyConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: StrategyConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        if self.policy.max_open_position == 0 {
            return Err(ConfigError::ZeroMaxOpenPosition);
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_published_parameters() {
        let p = StrategyParams::default();
        assert_eq!(p.stddev_period, 20);
        assert_eq!(p.profit_target_stddevs, 3.0);
        assert_eq!(p.bbands_period, 58);
        assert_eq!(p.upper_stddevs, 3.0);
        assert_eq!(p.lower_stddevs, 3.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn default_policy_flags() {
        let policy = SessionPolicy::default();
        assert!(policy.force_close_at_session_end);
        assert_eq!(policy.max_open_position, 1);
        assert!(!policy.uses_advanced_order_management);
    }

    #[test]
    fn rejects_short_periods() {
        let p = StrategyParams {
            stddev_period: 1,
            ..StrategyParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(ConfigError::PeriodTooShort {
                name: "stddev_period",
                value: 1
            })
        ));

        let p = StrategyParams {
            bbands_period: 0,
            ..StrategyParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(ConfigError::PeriodTooShort {
                name: "bbands_period",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_multipliers() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let p = StrategyParams {
                lower_stddevs: bad,
                ..StrategyParams::default()
            };
            assert!(
                matches!(
                    p.validate(),
                    Err(ConfigError::NonPositiveMultiplier {
                        name: "lower_stddevs",
                        ..
                    })
                ),
                "expected rejection for {bad}"
            );
        }
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config = StrategyConfig::from_toml("").unwrap();
        assert_eq!(config, StrategyConfig::default());
        assert_eq!(config.name, STRATEGY_NAME);
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = StrategyConfig::from_toml(
            r#"
            [params]
            bbands_period = 30
            profit_target_stddevs = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.params.bbands_period, 30);
        assert_eq!(config.params.profit_target_stddevs, 2.0);
        assert_eq!(config.params.stddev_period, 20);
        assert_eq!(config.policy, SessionPolicy::default());
    }

    #[test]
    fn invalid_values_fail_at_load() {
        let err = StrategyConfig::from_toml("[params]\nstddev_period = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::PeriodTooShort { .. }));

        let err = StrategyConfig::from_toml("[policy]\nmax_open_position = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMaxOpenPosition));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = StrategyConfig::from_toml("[params]\nstdev_period = 20\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let config = StrategyConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(StrategyConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn from_file_reads_and_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[params]\nlower_stddevs = 2.5").unwrap();
        let config = StrategyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.params.lower_stddevs, 2.5);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StrategyConfig::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn parameter_table_uses_display_names() {
        let table = StrategyParams::default().parameter_table();
        assert_eq!(table.len(), 5);
        assert_eq!(table[0], ("Standard deviation period", "20".to_string()));
        assert_eq!(table[2], ("Bollinger Bands period", "58".to_string()));
    }

    #[test]
    fn warmup_covers_previous_band() {
        assert_eq!(StrategyParams::default().warmup_bars(), 59);
    }

    #[test]
    fn warmup_follows_longer_deviation_window() {
        let p = StrategyParams {
            stddev_period: 10,
            bbands_period: 3,
            ..StrategyParams::default()
        };
        assert_eq!(p.warmup_bars(), 10);

        let p = StrategyParams {
            stddev_period: 4,
            bbands_period: 3,
            ..StrategyParams::default()
        };
        assert_eq!(p.warmup_bars(), 4);
    }
}
