use serde::{Deserialize, Serialize};
use tracing::debug;

use super::signals::Signals;
use super::variant::Variant;
use crate::error::{FrontSeerError, Result};
use crate::market::MarketConditions;
use crate::transaction::TargetTransaction;

/// Expected move from `current` to `predicted`, in percent.
pub fn price_change_pct(predicted: f64, current: f64) -> f64 {
    (predicted / current - 1.0) * 100.0
}

/// Coefficient of variation of a price series (population standard
/// deviation over mean). Empty or zero-mean series yield 0.
pub fn volatility_ratio(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }

    let n = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }

    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// Inputs handed to a score reducer, shaped per variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum ScoreInputs {
    Aggressive {
        price_change: f64,
    },
    Predictive {
        price_change: f64,
        volatility: f64,
        market_conditions: MarketConditions,
        current_price: f64,
        historical_prices: Vec<f64>,
    },
    Volatility {
        historical_prices: Vec<f64>,
        current_price: f64,
        market_conditions: MarketConditions,
    },
    /// The risk reducer only needs `price_change`; the readings are carried
    /// for diagnostics.
    Advanced {
        price_change: f64,
        is_bullish: bool,
        is_volatile: bool,
        has_liquidity: bool,
    },
}

/// Everything a reducer sees for one evaluation.
#[derive(Debug, Clone)]
pub struct ScoreRequest<'a> {
    pub transaction: &'a TargetTransaction,
    pub token_symbol: &'a str,
    pub inputs: ScoreInputs,
}

/// A reducer's answer. Risk reducers also echo the market conditions they
/// consulted; the echo is logged and never used for gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_conditions: Option<MarketConditions>,
}

impl ScoreOutcome {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            market_conditions: None,
        }
    }

    pub fn with_market_conditions(mut self, market_conditions: MarketConditions) -> Self {
        self.market_conditions = Some(market_conditions);
        self
    }
}

fn require<T>(value: Option<T>, signal: &'static str) -> Result<T> {
    value.ok_or(FrontSeerError::MissingSignal(signal))
}

// Prices are divided by, so a zero or non-finite quote is as good as absent.
fn require_price(value: Option<f64>, signal: &'static str) -> Result<f64> {
    match value {
        Some(price) if price.is_finite() && price > 0.0 => Ok(price),
        _ => Err(FrontSeerError::MissingSignal(signal)),
    }
}

fn require_finite(value: Option<f64>, signal: &'static str) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(FrontSeerError::MissingSignal(signal)),
    }
}

/// Checks the mandatory signals for `variant` and derives its score inputs.
pub fn build_inputs(variant: Variant, signals: &Signals) -> Result<ScoreInputs> {
    match variant {
        Variant::Aggressive => Ok(ScoreInputs::Aggressive {
            price_change: require(signals.price_change_24h, "24h price change")?,
        }),
        Variant::Predictive => {
            let current_price = require_price(signals.current_price, "current price")?;
            let predicted_price = require_finite(signals.predicted_price, "predicted price")?;
            let historical_prices =
                require(signals.historical_prices.clone(), "historical prices")?;

            Ok(ScoreInputs::Predictive {
                price_change: price_change_pct(predicted_price, current_price),
                volatility: volatility_ratio(&historical_prices),
                market_conditions: require(
                    signals.market_conditions.clone(),
                    "market conditions",
                )?,
                current_price,
                historical_prices,
            })
        }
        Variant::Volatility => Ok(ScoreInputs::Volatility {
            historical_prices: require(signals.historical_prices.clone(), "historical prices")?,
            current_price: require(signals.current_price, "current price")?,
            market_conditions: require(signals.market_conditions.clone(), "market conditions")?,
        }),
        Variant::Advanced => {
            let current_price = require_price(signals.current_price, "current price")?;
            let predicted_price = require_finite(signals.predicted_price, "predicted price")?;
            let conditions = require(signals.market_conditions.as_ref(), "market conditions")?;

            Ok(ScoreInputs::Advanced {
                price_change: price_change_pct(predicted_price, current_price),
                is_bullish: conditions.is_bullish(),
                is_volatile: conditions.is_volatile(),
                has_liquidity: conditions.has_liquidity(),
            })
        }
    }
}

/// Per-variant analysis summary, emitted once the score is known.
pub fn log_analysis(token_symbol: &str, signals: &Signals, inputs: &ScoreInputs, score: f64) {
    match inputs {
        ScoreInputs::Aggressive { price_change } => {
            debug!(
                "Aggressive analysis for {}: 24h change {:.2}%, risk score {:.2}/100",
                token_symbol, price_change, score
            );
        }
        ScoreInputs::Predictive {
            price_change,
            volatility,
            market_conditions,
            current_price,
            ..
        } => {
            debug!(
                "Predictive analysis for {}: current price {:.6}, predicted price {:.6}, \
                 expected change {:.2}%, volatility {:.2}, opportunity score {:.2}/100, \
                 market [{}]",
                token_symbol,
                current_price,
                signals.predicted_price.unwrap_or_default(),
                price_change,
                volatility,
                score,
                market_conditions
            );
        }
        ScoreInputs::Volatility {
            historical_prices,
            current_price,
            market_conditions,
        } => {
            let range = price_range(historical_prices)
                .map(|(lo, hi)| format!("{:.4} - {:.4}", lo, hi))
                .unwrap_or_else(|| "n/a".to_string());
            debug!(
                "Volatility analysis for {}: volatility score {:.2}/100, current price {}, \
                 price range {}, market [{}]",
                token_symbol, score, current_price, range, market_conditions
            );
        }
        ScoreInputs::Advanced {
            price_change,
            is_bullish,
            is_volatile,
            has_liquidity,
        } => {
            let volume = signals
                .volume_24h
                .map(|v| format!("${:.2}", v))
                .unwrap_or_else(|| "n/a".to_string());
            debug!(
                "Advanced analysis for {}: price increase {:.2}%, trend {}, volatility {}, \
                 liquidity {}, 24h volume {}, risk score {:.2}/100",
                token_symbol,
                price_change,
                if *is_bullish { "bullish" } else { "bearish" },
                if *is_volatile { "high" } else { "low" },
                if *has_liquidity { "adequate" } else { "low" },
                volume,
                score
            );
        }
    }
}

fn price_range(prices: &[f64]) -> Option<(f64, f64)> {
    let mut iter = prices.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}
