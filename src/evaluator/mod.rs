//! The strategy evaluator.
//!
//! One evaluation walks `Validating -> Gathering -> Scoring -> Gating` and
//! then either acts or skips. Validation and gathering may end the run early
//! with a rejection. Nothing is retried and nothing escapes: every failure
//! becomes a negative outcome.

pub mod decision_maker;
pub mod scorer;
pub mod signals;
pub mod variant;

pub use decision_maker::DecisionMaker;
pub use scorer::{price_change_pct, volatility_ratio, ScoreInputs, ScoreOutcome, ScoreRequest};
pub use signals::{SignalBundle, Signals};
pub use variant::{SignalSet, Variant};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::collaborators::{FrontRunExecutor, ScoreReducer, SignalFetcher, TransactionValidator};
use crate::config::StrategyConfig;
use crate::error::FrontSeerError;
use crate::transaction::TargetTransaction;

/// Intent tag passed to the validator.
pub const FRONT_RUN_INTENT: &str = "front_run";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Gathering,
    Scoring,
    Gating,
    Acting,
}

/// Why an evaluation stopped before the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The validator said no. A normal negative outcome.
    Ineligible,
    ValidatorFailed(String),
    /// One entry per failed fetch.
    SignalFailures(Vec<String>),
    MissingSignal(String),
    ScoringFailed(String),
    /// A collaborator panicked.
    Aborted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rejected(Rejection),
    /// Score below threshold; executor not called.
    Skipped,
    Executed { success: bool },
    ExecutionFailed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Rejected(Rejection::Ineligible) => write!(f, "rejected (ineligible)"),
            Outcome::Rejected(Rejection::ValidatorFailed(e)) => {
                write!(f, "rejected (validator failed: {})", e)
            }
            Outcome::Rejected(Rejection::SignalFailures(failures)) => {
                write!(f, "rejected (insufficient data: {})", failures.join("; "))
            }
            Outcome::Rejected(Rejection::MissingSignal(signal)) => {
                write!(f, "rejected (missing {})", signal)
            }
            Outcome::Rejected(Rejection::ScoringFailed(e)) => {
                write!(f, "rejected (scoring failed: {})", e)
            }
            Outcome::Rejected(Rejection::Aborted(e)) => write!(f, "rejected (aborted: {})", e),
            Outcome::Skipped => write!(f, "skipped (below threshold)"),
            Outcome::Executed { success } => write!(f, "executed (success={})", success),
            Outcome::ExecutionFailed(e) => write!(f, "execution failed ({})", e),
        }
    }
}

/// Record of one evaluation run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub variant: Variant,
    pub threshold: f64,
    pub token_symbol: Option<String>,
    pub score: Option<f64>,
    /// Last phase entered before the run ended.
    pub phase: Phase,
    pub outcome: Outcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Evaluation {
    /// The boolean answer: true only when the executor ran and reported success.
    pub fn front_ran(&self) -> bool {
        matches!(self.outcome, Outcome::Executed { success: true })
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Validator, fetcher and executor shared by every variant.
#[derive(Clone)]
pub struct Collaborators {
    pub validator: Arc<dyn TransactionValidator>,
    pub fetcher: Arc<dyn SignalFetcher>,
    pub executor: Arc<dyn FrontRunExecutor>,
}

impl Collaborators {
    pub fn new(
        validator: Arc<dyn TransactionValidator>,
        fetcher: Arc<dyn SignalFetcher>,
        executor: Arc<dyn FrontRunExecutor>,
    ) -> Self {
        Self {
            validator,
            fetcher,
            executor,
        }
    }
}

/// One configured strategy. Immutable after construction, so a single
/// instance can evaluate many transactions concurrently.
#[derive(Clone)]
pub struct StrategyEvaluator {
    variant: Variant,
    min_value: Option<f64>,
    decision_maker: DecisionMaker,
    collaborators: Collaborators,
    reducer: Arc<dyn ScoreReducer>,
}

impl StrategyEvaluator {
    /// Reads the variant's threshold (and minimum value, if any) from
    /// `config` once.
    pub fn new(
        variant: Variant,
        config: &StrategyConfig,
        collaborators: Collaborators,
        reducer: Arc<dyn ScoreReducer>,
    ) -> Self {
        let threshold = variant.threshold(config);
        debug!(
            "Configured {} strategy: {} = {}",
            variant,
            variant.threshold_key(),
            threshold
        );

        Self {
            variant,
            min_value: variant.min_value(config),
            decision_maker: DecisionMaker::new(threshold),
            collaborators,
            reducer,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn threshold(&self) -> f64 {
        self.decision_maker.threshold()
    }

    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    /// True if a front-run was executed successfully for `transaction`.
    pub async fn evaluate(&self, transaction: &TargetTransaction) -> bool {
        self.evaluate_detailed(transaction).await.front_ran()
    }

    pub async fn evaluate_detailed(&self, transaction: &TargetTransaction) -> Evaluation {
        let mut evaluation = Evaluation {
            variant: self.variant,
            threshold: self.threshold(),
            token_symbol: None,
            score: None,
            phase: Phase::Validating,
            outcome: Outcome::Skipped,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };

        let result = AssertUnwindSafe(self.run(transaction, &mut evaluation))
            .catch_unwind()
            .await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(
                    "{} strategy aborted during {:?}: {}",
                    self.variant, evaluation.phase, reason
                );
                Outcome::Rejected(Rejection::Aborted(reason))
            }
        };

        evaluation.outcome = outcome;
        evaluation.finished_at = Utc::now();

        info!(
            "{} strategy on {}: {}",
            self.variant,
            evaluation.token_symbol.as_deref().unwrap_or("<unresolved>"),
            evaluation.outcome
        );
        evaluation
    }

    async fn run(&self, transaction: &TargetTransaction, evaluation: &mut Evaluation) -> Outcome {
        debug!("Initiating {} front-run strategy...", self.variant);

        let verdict = match self
            .collaborators
            .validator
            .validate(transaction, FRONT_RUN_INTENT, self.min_value)
            .await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("Validation failed for transaction to {}: {}", transaction.to, e);
                return Outcome::Rejected(Rejection::ValidatorFailed(e.to_string()));
            }
        };

        if !verdict.is_valid {
            debug!("Transaction to {} is not eligible for front-run", transaction.to);
            return Outcome::Rejected(Rejection::Ineligible);
        }

        let token_symbol = verdict.token_symbol.as_str();
        debug!("Validated {} transaction: {:?}", token_symbol, verdict.decoded);
        evaluation.token_symbol = Some(verdict.token_symbol.clone());

        evaluation.phase = Phase::Gathering;
        let bundle = signals::gather(
            self.collaborators.fetcher.as_ref(),
            self.variant.signals(),
            token_symbol,
            &transaction.to,
        )
        .await;

        let signals = match bundle.into_signals() {
            Ok(signals) => signals,
            Err(failures) => {
                warn!("Failed to gather complete market data for {}", token_symbol);
                return Outcome::Rejected(Rejection::SignalFailures(
                    failures.iter().map(ToString::to_string).collect(),
                ));
            }
        };

        let inputs = match scorer::build_inputs(self.variant, &signals) {
            Ok(inputs) => inputs,
            Err(e) => {
                debug!("{} for {}. Skipping...", e, token_symbol);
                let signal = match e {
                    FrontSeerError::MissingSignal(signal) => signal.to_string(),
                    other => other.to_string(),
                };
                return Outcome::Rejected(Rejection::MissingSignal(signal));
            }
        };

        evaluation.phase = Phase::Scoring;
        let request = ScoreRequest {
            transaction,
            token_symbol,
            inputs,
        };
        let scored = match self.reducer.compute_score(&request).await {
            Ok(scored) => scored,
            Err(e) => {
                warn!(
                    "Failed to compute {} score for {}: {}",
                    self.variant.score_kind(),
                    token_symbol,
                    e
                );
                return Outcome::Rejected(Rejection::ScoringFailed(e.to_string()));
            }
        };

        if let Some(conditions) = &scored.market_conditions {
            debug!("Reducer market conditions for {}: {}", token_symbol, conditions);
        }
        scorer::log_analysis(token_symbol, &signals, &request.inputs, scored.score);
        evaluation.score = Some(scored.score);

        evaluation.phase = Phase::Gating;
        if !self.decision_maker.passes(scored.score) {
            debug!(
                "{} score {:.2}/100 below threshold {:.2}. Skipping front-run.",
                self.variant.score_kind(),
                scored.score,
                self.threshold()
            );
            return Outcome::Skipped;
        }

        evaluation.phase = Phase::Acting;
        self.decision_maker
            .act(
                self.collaborators.executor.as_ref(),
                transaction,
                token_symbol,
                scored.score,
            )
            .await
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Risk, opportunity and volatility reducers for a full strategy set.
#[derive(Clone)]
pub struct Reducers {
    pub risk: Arc<dyn ScoreReducer>,
    pub opportunity: Arc<dyn ScoreReducer>,
    pub volatility: Arc<dyn ScoreReducer>,
}

impl Reducers {
    /// The same reducer for every score kind; it can tell them apart by the
    /// shape of `ScoreInputs`.
    pub fn shared(reducer: Arc<dyn ScoreReducer>) -> Self {
        Self {
            risk: reducer.clone(),
            opportunity: reducer.clone(),
            volatility: reducer,
        }
    }

    fn for_variant(&self, variant: Variant) -> Arc<dyn ScoreReducer> {
        match variant {
            Variant::Aggressive | Variant::Advanced => self.risk.clone(),
            Variant::Predictive => self.opportunity.clone(),
            Variant::Volatility => self.volatility.clone(),
        }
    }
}

/// All four variants built from one config.
#[derive(Clone)]
pub struct StrategySet {
    strategies: Vec<StrategyEvaluator>,
}

impl StrategySet {
    pub fn new(config: &StrategyConfig, collaborators: Collaborators, reducers: Reducers) -> Self {
        let strategies = Variant::ALL
            .into_iter()
            .map(|variant| {
                StrategyEvaluator::new(
                    variant,
                    config,
                    collaborators.clone(),
                    reducers.for_variant(variant),
                )
            })
            .collect();

        Self { strategies }
    }

    pub fn get(&self, variant: Variant) -> Option<&StrategyEvaluator> {
        self.strategies.iter().find(|s| s.variant() == variant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyEvaluator> {
        self.strategies.iter()
    }
}
