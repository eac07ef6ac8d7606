use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{
    StrategyConfig, ADVANCED_THRESHOLD_KEY, AGGRESSIVE_THRESHOLD_KEY, PREDICTIVE_THRESHOLD_KEY,
    VOLATILITY_THRESHOLD_KEY,
};
use crate::error::FrontSeerError;

/// The four fixed strategy configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Aggressive,
    Predictive,
    Volatility,
    Advanced,
}

/// Which signals a variant asks the fetcher for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalSet {
    pub predicted_price: bool,
    pub current_price: bool,
    pub historical_prices: bool,
    pub market_conditions: bool,
    pub volume_24h: bool,
    pub price_change_24h: bool,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Aggressive,
        Variant::Predictive,
        Variant::Volatility,
        Variant::Advanced,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Aggressive => "aggressive",
            Variant::Predictive => "predictive",
            Variant::Volatility => "volatility",
            Variant::Advanced => "advanced",
        }
    }

    /// What the score means for this variant.
    pub fn score_kind(&self) -> &'static str {
        match self {
            Variant::Aggressive | Variant::Advanced => "risk",
            Variant::Predictive => "opportunity",
            Variant::Volatility => "volatility",
        }
    }

    pub fn signals(&self) -> SignalSet {
        match self {
            Variant::Aggressive => SignalSet {
                price_change_24h: true,
                ..SignalSet::default()
            },
            Variant::Predictive => SignalSet {
                predicted_price: true,
                current_price: true,
                market_conditions: true,
                historical_prices: true,
                ..SignalSet::default()
            },
            Variant::Volatility => SignalSet {
                market_conditions: true,
                current_price: true,
                historical_prices: true,
                ..SignalSet::default()
            },
            Variant::Advanced => SignalSet {
                predicted_price: true,
                market_conditions: true,
                current_price: true,
                volume_24h: true,
                ..SignalSet::default()
            },
        }
    }

    pub fn threshold_key(&self) -> &'static str {
        match self {
            Variant::Aggressive => AGGRESSIVE_THRESHOLD_KEY,
            Variant::Predictive => PREDICTIVE_THRESHOLD_KEY,
            Variant::Volatility => VOLATILITY_THRESHOLD_KEY,
            Variant::Advanced => ADVANCED_THRESHOLD_KEY,
        }
    }

    pub fn threshold(&self, config: &StrategyConfig) -> f64 {
        match self {
            Variant::Aggressive => config.aggressive_risk_threshold,
            Variant::Predictive => config.opportunity_threshold,
            Variant::Volatility => config.volatility_threshold,
            Variant::Advanced => config.advanced_risk_threshold,
        }
    }

    /// Minimum transaction value handed to the validator. Only the
    /// aggressive variant enforces one.
    pub fn min_value(&self, config: &StrategyConfig) -> Option<f64> {
        match self {
            Variant::Aggressive => Some(config.aggressive_min_value_eth),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = FrontSeerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FrontSeerError::config_error(format!("Unknown strategy variant: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_come_from_the_variant_key() {
        let config = StrategyConfig {
            aggressive_risk_threshold: 75.0,
            opportunity_threshold: 65.0,
            volatility_threshold: 80.0,
            advanced_risk_threshold: 71.0,
            ..StrategyConfig::default()
        };

        assert_eq!(Variant::Aggressive.threshold(&config), 75.0);
        assert_eq!(Variant::Predictive.threshold(&config), 65.0);
        assert_eq!(Variant::Volatility.threshold(&config), 80.0);
        assert_eq!(Variant::Advanced.threshold(&config), 71.0);
        assert_eq!(
            Variant::Predictive.threshold_key(),
            "FRONT_RUN_OPPORTUNITY_SCORE_THRESHOLD"
        );
    }

    #[test]
    fn only_aggressive_enforces_min_value() {
        let config = StrategyConfig::default();
        assert_eq!(Variant::Aggressive.min_value(&config), Some(0.01));
        for variant in [Variant::Predictive, Variant::Volatility, Variant::Advanced] {
            assert_eq!(variant.min_value(&config), None);
        }
    }

    #[test]
    fn signal_sets_match_variant_needs() {
        let aggressive = Variant::Aggressive.signals();
        assert!(aggressive.price_change_24h);
        assert!(!aggressive.current_price && !aggressive.predicted_price);

        let volatility = Variant::Volatility.signals();
        assert!(volatility.historical_prices && volatility.current_price);
        assert!(!volatility.predicted_price);

        let advanced = Variant::Advanced.signals();
        assert!(advanced.volume_24h && advanced.predicted_price);
        assert!(!advanced.historical_prices);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Advanced".parse::<Variant>().unwrap(), Variant::Advanced);
        assert!("sandwich".parse::<Variant>().is_err());
    }
}
