use serde::{Deserialize, Serialize};
use std::fmt;

/// Market flags reported for a contract address.
///
/// Each flag may be absent. Readers go through the accessors, which fall back
/// to the conservative reading: no trend, no volatility, and *no* liquidity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullish_trend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_volatility: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_liquidity: Option<bool>,
}

impl MarketConditions {
    pub fn new(bullish_trend: bool, high_volatility: bool, low_liquidity: bool) -> Self {
        Self {
            bullish_trend: Some(bullish_trend),
            high_volatility: Some(high_volatility),
            low_liquidity: Some(low_liquidity),
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.bullish_trend.unwrap_or(false)
    }

    pub fn is_volatile(&self) -> bool {
        self.high_volatility.unwrap_or(false)
    }

    pub fn has_liquidity(&self) -> bool {
        !self.low_liquidity.unwrap_or(true)
    }
}

impl fmt::Display for MarketConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |v: Option<bool>| match v {
            Some(true) => "yes",
            Some(false) => "no",
            None => "?",
        };
        write!(
            f,
            "bullish={} volatile={} low_liquidity={}",
            flag(self.bullish_trend),
            flag(self.high_volatility),
            flag(self.low_liquidity)
        )
    }
}
