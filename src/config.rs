use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::env;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{FrontSeerError, Result};

pub const AGGRESSIVE_MIN_VALUE_KEY: &str = "AGGRESSIVE_FRONT_RUN_MIN_VALUE_ETH";
pub const AGGRESSIVE_THRESHOLD_KEY: &str = "AGGRESSIVE_FRONT_RUN_RISK_SCORE_THRESHOLD";
pub const PREDICTIVE_THRESHOLD_KEY: &str = "FRONT_RUN_OPPORTUNITY_SCORE_THRESHOLD";
pub const VOLATILITY_THRESHOLD_KEY: &str = "VOLATILITY_FRONT_RUN_SCORE_THRESHOLD";
pub const ADVANCED_THRESHOLD_KEY: &str = "ADVANCED_FRONT_RUN_RISK_SCORE_THRESHOLD";

/// Thresholds and limits for the front-run strategies.
///
/// Every field has a default; no source is required to be complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(rename = "AGGRESSIVE_FRONT_RUN_MIN_VALUE_ETH")]
    pub aggressive_min_value_eth: f64,
    #[serde(rename = "AGGRESSIVE_FRONT_RUN_RISK_SCORE_THRESHOLD")]
    pub aggressive_risk_threshold: f64,
    #[serde(rename = "FRONT_RUN_OPPORTUNITY_SCORE_THRESHOLD")]
    pub opportunity_threshold: f64,
    #[serde(rename = "VOLATILITY_FRONT_RUN_SCORE_THRESHOLD")]
    pub volatility_threshold: f64,
    #[serde(rename = "ADVANCED_FRONT_RUN_RISK_SCORE_THRESHOLD")]
    pub advanced_risk_threshold: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            aggressive_min_value_eth: 0.01,
            aggressive_risk_threshold: 70.0,
            opportunity_threshold: 60.0,
            volatility_threshold: 75.0,
            advanced_risk_threshold: 70.0,
        }
    }
}

impl StrategyConfig {
    /// Builds a config from a string-keyed mapping (e.g. a parsed JSON file).
    /// Unknown keys are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut config = Self::default();
        config.apply(|key| map.get(key).and_then(value_to_number));
        config
    }

    /// Overrides fields from any source that can answer "what is KEY?".
    pub fn apply<F>(&mut self, mut lookup: F)
    where
        F: FnMut(&str) -> Option<RawSetting>,
    {
        for (key, slot) in self.fields_mut() {
            match lookup(key) {
                Some(RawSetting::Number(n)) if n.is_finite() => {
                    debug!("{} = {}", key, n);
                    *slot = n;
                }
                Some(RawSetting::Number(n)) => {
                    warn!("Ignoring non-finite value {} for {}, keeping {}", n, key, slot);
                }
                Some(RawSetting::Invalid(raw)) => {
                    warn!("Ignoring unparseable value {:?} for {}, keeping {}", raw, key, slot);
                }
                None => {}
            }
        }
    }

    fn fields_mut(&mut self) -> [(&'static str, &mut f64); 5] {
        [
            (AGGRESSIVE_MIN_VALUE_KEY, &mut self.aggressive_min_value_eth),
            (AGGRESSIVE_THRESHOLD_KEY, &mut self.aggressive_risk_threshold),
            (PREDICTIVE_THRESHOLD_KEY, &mut self.opportunity_threshold),
            (VOLATILITY_THRESHOLD_KEY, &mut self.volatility_threshold),
            (ADVANCED_THRESHOLD_KEY, &mut self.advanced_risk_threshold),
        ]
    }
}

/// A configuration value as found in a source, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSetting {
    Number(f64),
    Invalid(String),
}

impl RawSetting {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Invalid(raw.to_string()),
        }
    }
}

fn value_to_number(value: &Value) -> Option<RawSetting> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(RawSetting::Number),
        Value::String(s) => Some(RawSetting::parse(s)),
        other => Some(RawSetting::Invalid(other.to_string())),
    }
}

/// Reads a JSON object of settings from disk.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<StrategyConfig> {
    let path = path.as_ref();
    info!("Loading strategy configuration from {}", path.display());

    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(StrategyConfig::from_map(&map)),
        _ => Err(FrontSeerError::config_error(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
    }
}

/// Defaults, then the optional config file, then environment variables.
pub fn load_config(path: Option<&Path>) -> Result<StrategyConfig> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => StrategyConfig::default(),
    };

    config.apply(|key| env::var(key).ok().map(|raw| RawSetting::parse(&raw)));

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_documented_values() {
        let config = StrategyConfig::default();
        assert_eq!(config.aggressive_min_value_eth, 0.01);
        assert_eq!(config.aggressive_risk_threshold, 70.0);
        assert_eq!(config.opportunity_threshold, 60.0);
        assert_eq!(config.volatility_threshold, 75.0);
        assert_eq!(config.advanced_risk_threshold, 70.0);
    }

    #[test]
    fn partial_map_keeps_remaining_defaults() {
        let map = json!({
            "AGGRESSIVE_FRONT_RUN_MIN_VALUE_ETH": 0.005,
            "AGGRESSIVE_FRONT_RUN_RISK_SCORE_THRESHOLD": 75,
            "VOLATILITY_FRONT_RUN_SCORE_THRESHOLD": "80",
            "SOMETHING_ELSE": true,
        });
        let config = StrategyConfig::from_map(map.as_object().unwrap());

        assert_eq!(config.aggressive_min_value_eth, 0.005);
        assert_eq!(config.aggressive_risk_threshold, 75.0);
        assert_eq!(config.volatility_threshold, 80.0);
        assert_eq!(config.opportunity_threshold, 60.0);
        assert_eq!(config.advanced_risk_threshold, 70.0);
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let map = json!({
            "FRONT_RUN_OPPORTUNITY_SCORE_THRESHOLD": "sixty-five",
            "ADVANCED_FRONT_RUN_RISK_SCORE_THRESHOLD": [1, 2],
        });
        let config = StrategyConfig::from_map(map.as_object().unwrap());

        assert_eq!(config, StrategyConfig::default());
    }

    #[test]
    fn lookup_overrides_apply_on_top() {
        let env: HashMap<&str, &str> =
            [(PREDICTIVE_THRESHOLD_KEY, " 65 "), (ADVANCED_THRESHOLD_KEY, "NaN")]
                .into_iter()
                .collect();

        let mut config = StrategyConfig::default();
        config.apply(|key| env.get(key).map(|raw| RawSetting::parse(raw)));

        assert_eq!(config.opportunity_threshold, 65.0);
        assert_eq!(config.advanced_risk_threshold, 70.0);
    }

    #[test]
    fn serializes_with_config_keys() {
        let value = serde_json::to_value(StrategyConfig::default()).unwrap();
        assert_eq!(value[VOLATILITY_THRESHOLD_KEY], json!(75.0));
        assert_eq!(value[AGGRESSIVE_MIN_VALUE_KEY], json!(0.01));
    }
}
