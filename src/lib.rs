pub mod collaborators;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod market;
pub mod simulation;
pub mod transaction;

pub use collaborators::{FrontRunExecutor, ScoreReducer, SignalFetcher, TransactionValidator};
pub use config::StrategyConfig;
pub use error::{FrontSeerError, Result};
pub use evaluator::{
    Collaborators, Evaluation, Outcome, Reducers, Rejection, StrategyEvaluator, StrategySet,
    Variant,
};
pub use market::MarketConditions;
pub use transaction::{DecodedTransaction, TargetTransaction, ValidationVerdict};
