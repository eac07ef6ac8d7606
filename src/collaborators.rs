//! Capability traits for everything the evaluator depends on but does not own.
//!
//! Every method is asynchronous and may fail on its own. The evaluator never
//! retries a call and never imposes a timeout; implementations that need
//! bounded latency must enforce it themselves.

use async_trait::async_trait;

use crate::error::Result;
use crate::evaluator::{ScoreOutcome, ScoreRequest};
use crate::market::MarketConditions;
use crate::transaction::{TargetTransaction, ValidationVerdict};

/// Decides whether a target transaction is eligible and resolves its token.
#[async_trait]
pub trait TransactionValidator: Send + Sync {
    async fn validate(
        &self,
        transaction: &TargetTransaction,
        intent: &str,
        min_value: Option<f64>,
    ) -> Result<ValidationVerdict>;
}

/// Market signal providers. `Ok(None)` means the provider answered but had
/// no value for the token.
#[async_trait]
pub trait SignalFetcher: Send + Sync {
    async fn predicted_price(&self, token_symbol: &str) -> Result<Option<f64>>;

    async fn current_price(&self, token_symbol: &str) -> Result<Option<f64>>;

    async fn historical_prices(
        &self,
        token_symbol: &str,
        kind: &str,
        timeframe: u32,
    ) -> Result<Vec<f64>>;

    async fn market_conditions(&self, address: &str) -> Result<MarketConditions>;

    async fn volume_24h(&self, token_symbol: &str) -> Result<Option<f64>>;

    async fn price_change_24h(&self, token_symbol: &str) -> Result<Option<f64>>;
}

/// Maps variant-specific inputs to a 0-100 score. Risk, opportunity and
/// volatility reducers all share this shape.
#[async_trait]
pub trait ScoreReducer: Send + Sync {
    async fn compute_score(&self, request: &ScoreRequest<'_>) -> Result<ScoreOutcome>;
}

/// Submits the front-run. The returned flag is the evaluation's final answer.
#[async_trait]
pub trait FrontRunExecutor: Send + Sync {
    async fn execute_front_run(&self, transaction: &TargetTransaction) -> Result<bool>;
}
