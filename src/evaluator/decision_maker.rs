use tracing::{debug, error, info};

use super::Outcome;
use crate::collaborators::FrontRunExecutor;
use crate::transaction::TargetTransaction;

/// Threshold gate plus dispatch to the executor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionMaker {
    threshold: f64,
}

impl DecisionMaker {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Inclusive: a score equal to the threshold passes. NaN never does.
    pub fn passes(&self, score: f64) -> bool {
        score >= self.threshold
    }

    /// Hands the original transaction to the executor and reports what it
    /// said. An executor error is a failed execution, nothing more.
    pub async fn act(
        &self,
        executor: &dyn FrontRunExecutor,
        transaction: &TargetTransaction,
        token_symbol: &str,
        score: f64,
    ) -> Outcome {
        info!(
            "Executing front-run for {} (score {:.2}/100, threshold {:.2})",
            token_symbol, score, self.threshold
        );

        match executor.execute_front_run(transaction).await {
            Ok(success) => {
                debug!("Executor returned {} for {}", success, token_symbol);
                Outcome::Executed { success }
            }
            Err(e) => {
                error!("Front-run execution failed for {}: {}", token_symbol, e);
                Outcome::ExecutionFailed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_is_inclusive_at_threshold() {
        let gate = DecisionMaker::new(70.0);
        assert!(gate.passes(70.0));
        assert!(gate.passes(70.5));
        assert!(!gate.passes(69.999));
    }

    #[test]
    fn nan_score_never_passes() {
        assert!(!DecisionMaker::new(0.0).passes(f64::NAN));
    }
}
