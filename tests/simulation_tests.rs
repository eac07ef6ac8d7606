//! End-to-end runs against the simulated collaborators.

use frontseer::config::{load_config_file, StrategyConfig};
use frontseer::simulation::{example_transaction, simulated_strategy_set, SIMULATED_TOKEN};
use frontseer::{Outcome, Rejection, TargetTransaction, Variant};

#[tokio::test]
async fn default_config_front_runs_with_every_variant() {
    let strategies = simulated_strategy_set(&StrategyConfig::default());
    let tx = example_transaction();

    for strategy in strategies.iter() {
        let evaluation = strategy.evaluate_detailed(&tx).await;
        assert!(evaluation.front_ran(), "{}: {}", strategy.variant(), evaluation.outcome);
        assert_eq!(evaluation.token_symbol.as_deref(), Some(SIMULATED_TOKEN));
    }
}

#[tokio::test]
async fn demo_thresholds_gate_each_variant() {
    let config = StrategyConfig {
        aggressive_min_value_eth: 0.005,
        aggressive_risk_threshold: 75.0,
        opportunity_threshold: 65.0,
        volatility_threshold: 80.0,
        advanced_risk_threshold: 70.0,
    };
    let strategies = simulated_strategy_set(&config);
    let tx = example_transaction();

    let aggressive = strategies.get(Variant::Aggressive).unwrap();
    assert_eq!(aggressive.min_value(), Some(0.005));
    let evaluation = aggressive.evaluate_detailed(&tx).await;
    assert_eq!(evaluation.score, Some(80.0));
    assert!(evaluation.front_ran());

    let predictive = strategies.get(Variant::Predictive).unwrap();
    assert_eq!(predictive.evaluate_detailed(&tx).await.score, Some(70.0));

    let volatility = strategies.get(Variant::Volatility).unwrap();
    assert_eq!(volatility.threshold(), 80.0);
    assert!(volatility.evaluate(&tx).await);
}

#[tokio::test]
async fn raised_thresholds_skip_every_variant() {
    let config = StrategyConfig {
        aggressive_risk_threshold: 90.0,
        opportunity_threshold: 90.0,
        volatility_threshold: 90.0,
        advanced_risk_threshold: 90.0,
        ..StrategyConfig::default()
    };
    let strategies = simulated_strategy_set(&config);
    let tx = example_transaction();

    for strategy in strategies.iter() {
        let evaluation = strategy.evaluate_detailed(&tx).await;
        assert_eq!(evaluation.outcome, Outcome::Skipped, "{}", strategy.variant());
    }
}

#[test]
fn config_file_overrides_only_what_it_names() {
    let path = std::env::temp_dir().join(format!("frontseer-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"VOLATILITY_FRONT_RUN_SCORE_THRESHOLD": 80}"#).unwrap();

    let config = load_config_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.volatility_threshold, 80.0);
    assert_eq!(config.opportunity_threshold, 60.0);
}

#[test]
fn config_file_must_be_an_object() {
    let path = std::env::temp_dir()
        .join(format!("frontseer-bad-config-{}.json", std::process::id()));
    std::fs::write(&path, "[75]").unwrap();

    let result = load_config_file(&path);
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
}

#[tokio::test]
async fn aggressive_min_value_is_enforced_by_simulated_validator() {
    let strategies = simulated_strategy_set(&StrategyConfig::default());
    let dust = TargetTransaction::new("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D", 0.001);

    let aggressive = strategies.get(Variant::Aggressive).unwrap();
    let evaluation = aggressive.evaluate_detailed(&dust).await;
    assert_eq!(evaluation.outcome, Outcome::Rejected(Rejection::Ineligible));

    // no minimum for the other variants
    let advanced = strategies.get(Variant::Advanced).unwrap();
    assert!(advanced.evaluate(&dust).await);
}

#[tokio::test]
async fn simulated_validator_fails_on_unusable_value() {
    let strategies = simulated_strategy_set(&StrategyConfig::default());
    let broken = TargetTransaction::new("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D", f64::NAN);

    let evaluation = strategies
        .get(Variant::Predictive)
        .unwrap()
        .evaluate_detailed(&broken)
        .await;

    assert!(!evaluation.front_ran());
    match &evaluation.outcome {
        Outcome::Rejected(Rejection::ValidatorFailed(reason)) => {
            assert!(reason.contains("unusable transaction value"))
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
