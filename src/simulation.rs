//! Simulated collaborators for dry runs and demos.
//!
//! Everything here answers with fixed values so that a run is reproducible.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::collaborators::{FrontRunExecutor, ScoreReducer, SignalFetcher, TransactionValidator};
use crate::config::StrategyConfig;
use crate::error::{FrontSeerError, Result};
use crate::evaluator::{
    Collaborators, Reducers, ScoreInputs, ScoreOutcome, ScoreRequest, StrategySet,
};
use crate::market::MarketConditions;
use crate::transaction::{DecodedTransaction, TargetTransaction, ValidationVerdict};

pub const SIMULATED_TOKEN: &str = "MOCK_TOKEN";

/// A swap sent to the Uniswap V2 router.
pub fn example_transaction() -> TargetTransaction {
    TargetTransaction::new("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D", 0.01).with_data("0x")
}

/// Validates, scores and "executes" without touching a chain.
pub struct SimulatedTransactionCore {
    token_symbol: String,
}

impl SimulatedTransactionCore {
    pub fn new() -> Self {
        Self {
            token_symbol: SIMULATED_TOKEN.to_string(),
        }
    }
}

impl Default for SimulatedTransactionCore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionValidator for SimulatedTransactionCore {
    async fn validate(
        &self,
        transaction: &TargetTransaction,
        intent: &str,
        min_value: Option<f64>,
    ) -> Result<ValidationVerdict> {
        info!(
            "[SIMULATION] Validating transaction to {} for {}, min_value={:?}",
            transaction.to, intent, min_value
        );

        if !transaction.value.is_finite() || transaction.value < 0.0 {
            return Err(FrontSeerError::validation_error(format!(
                "unusable transaction value {}",
                transaction.value
            )));
        }

        if let Some(min_value) = min_value {
            if transaction.value < min_value {
                info!(
                    "[SIMULATION] Transaction value {} below minimum {}",
                    transaction.value, min_value
                );
                return Ok(ValidationVerdict::rejected());
            }
        }

        let decoded = DecodedTransaction(json!({
            "to": transaction.to,
            "value": transaction.value,
            "intent": intent,
        }));
        Ok(ValidationVerdict::valid(decoded, self.token_symbol.clone()))
    }
}

#[async_trait]
impl ScoreReducer for SimulatedTransactionCore {
    async fn compute_score(&self, request: &ScoreRequest<'_>) -> Result<ScoreOutcome> {
        let outcome = match &request.inputs {
            ScoreInputs::Aggressive { price_change }
            | ScoreInputs::Advanced { price_change, .. } => {
                info!("[SIMULATION] Calculating risk score, price_change={:.2}", price_change);
                ScoreOutcome::new(80.0).with_market_conditions(MarketConditions {
                    bullish_trend: Some(true),
                    ..MarketConditions::default()
                })
            }
            ScoreInputs::Predictive {
                price_change,
                volatility,
                ..
            } => {
                info!(
                    "[SIMULATION] Calculating opportunity score, price_change={:.2}, \
                     volatility={:.4}",
                    price_change, volatility
                );
                ScoreOutcome::new(70.0)
            }
            ScoreInputs::Volatility { .. } => {
                info!("[SIMULATION] Calculating volatility score");
                ScoreOutcome::new(85.0)
            }
        };
        Ok(outcome)
    }
}

#[async_trait]
impl FrontRunExecutor for SimulatedTransactionCore {
    async fn execute_front_run(&self, transaction: &TargetTransaction) -> Result<bool> {
        info!("[SIMULATION] Would front-run transaction to {}", transaction.to);
        Ok(true)
    }
}

/// Price feed and market monitor in one.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMarketFeed;

#[async_trait]
impl SignalFetcher for SimulatedMarketFeed {
    async fn predicted_price(&self, token_symbol: &str) -> Result<Option<f64>> {
        info!("[SIMULATION] Predicting price movement for {}", token_symbol);
        Ok(Some(10.5))
    }

    async fn current_price(&self, token_symbol: &str) -> Result<Option<f64>> {
        info!("[SIMULATION] Getting real-time price for {}", token_symbol);
        Ok(Some(10.0))
    }

    async fn historical_prices(
        &self,
        token_symbol: &str,
        kind: &str,
        timeframe: u32,
    ) -> Result<Vec<f64>> {
        info!(
            "[SIMULATION] Getting {} price data for {} (timeframe {})",
            kind, token_symbol, timeframe
        );
        Ok(vec![9.5, 9.8, 10.1, 9.9])
    }

    async fn market_conditions(&self, address: &str) -> Result<MarketConditions> {
        info!("[SIMULATION] Checking market conditions for {}", address);
        Ok(MarketConditions::new(true, true, false))
    }

    async fn volume_24h(&self, token_symbol: &str) -> Result<Option<f64>> {
        info!("[SIMULATION] Getting 24h volume for {}", token_symbol);
        Ok(Some(1_000_000.0))
    }

    async fn price_change_24h(&self, token_symbol: &str) -> Result<Option<f64>> {
        info!("[SIMULATION] Getting 24h price change for {}", token_symbol);
        Ok(Some(5.0))
    }
}

/// All four strategies wired to the simulated collaborators.
pub fn simulated_strategy_set(config: &StrategyConfig) -> StrategySet {
    let core = Arc::new(SimulatedTransactionCore::new());
    let collaborators = Collaborators::new(
        core.clone(),
        Arc::new(SimulatedMarketFeed),
        core.clone(),
    );
    StrategySet::new(config, collaborators, Reducers::shared(core))
}
