use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use frontseer::config;
use frontseer::simulation::{example_transaction, simulated_strategy_set};
use frontseer::{TargetTransaction, Variant};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every evaluation phase
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run front-run strategies against a transaction using simulated market data
    Evaluate {
        /// Strategy to run
        #[arg(long, value_enum, default_value_t = VariantArg::All)]
        variant: VariantArg,

        /// JSON file holding the target transaction
        #[arg(long)]
        tx: Option<PathBuf>,

        /// JSON file holding strategy thresholds
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective strategy configuration
    Config {
        /// JSON file holding strategy thresholds
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Aggressive,
    Predictive,
    Volatility,
    Advanced,
    All,
}

impl VariantArg {
    fn variants(self) -> Vec<Variant> {
        match self {
            VariantArg::Aggressive => vec![Variant::Aggressive],
            VariantArg::Predictive => vec![Variant::Predictive],
            VariantArg::Volatility => vec![Variant::Volatility],
            VariantArg::Advanced => vec![Variant::Advanced],
            VariantArg::All => Variant::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    match cli.command {
        Some(Commands::Evaluate {
            variant,
            tx,
            config,
        }) => run_evaluation(variant, tx.as_deref(), config.as_deref()).await?,
        Some(Commands::Config { config }) => {
            let config = config::load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => {
            info!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

async fn run_evaluation(
    variant: VariantArg,
    tx_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    info!("Loading configuration...");
    let config = config::load_config(config_path)?;

    let transaction = match tx_path {
        Some(path) => load_transaction(path)?,
        None => example_transaction(),
    };
    info!("Evaluating transaction to {} (value {})", transaction.to, transaction.value);

    let strategies = simulated_strategy_set(&config);
    for variant in variant.variants() {
        let strategy = strategies
            .get(variant)
            .with_context(|| format!("no {} strategy configured", variant))?;

        let evaluation = strategy.evaluate_detailed(&transaction).await;
        println!(
            "{} front-run result: {} ({}, {} ms)",
            variant,
            evaluation.front_ran(),
            evaluation.outcome,
            evaluation.elapsed_ms()
        );
    }

    Ok(())
}

fn load_transaction(path: &Path) -> Result<TargetTransaction> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading transaction from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing transaction from {}", path.display()))
}
