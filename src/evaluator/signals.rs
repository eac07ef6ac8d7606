use std::future::Future;
use tracing::{debug, warn};

use super::variant::SignalSet;
use crate::collaborators::SignalFetcher;
use crate::error::{FrontSeerError, Result};
use crate::market::MarketConditions;

/// Historical series requested for every variant that needs one.
pub const HISTORICAL_KIND: &str = "historical";
pub const HISTORICAL_TIMEFRAME: u32 = 1;

/// Raw fan-in of one gather: `None` for signals the variant did not ask for,
/// otherwise whatever the fetcher produced.
#[derive(Debug, Default)]
pub struct SignalBundle {
    pub predicted_price: Option<Result<Option<f64>>>,
    pub current_price: Option<Result<Option<f64>>>,
    pub historical_prices: Option<Result<Vec<f64>>>,
    pub market_conditions: Option<Result<MarketConditions>>,
    pub volume_24h: Option<Result<Option<f64>>>,
    pub price_change_24h: Option<Result<Option<f64>>>,
}

/// Signals that were fetched without error. Nullable values are still
/// `Option` here; mandatory ones are checked when score inputs are built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signals {
    pub predicted_price: Option<f64>,
    pub current_price: Option<f64>,
    pub historical_prices: Option<Vec<f64>>,
    pub market_conditions: Option<MarketConditions>,
    pub volume_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
}

async fn fetch_if<T, F, Fut>(wanted: bool, signal: &'static str, fetch: F) -> Option<Result<T>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if !wanted {
        return None;
    }
    Some(fetch().await.map_err(|e| label(signal, e)))
}

fn label(signal: &'static str, err: FrontSeerError) -> FrontSeerError {
    match err {
        err @ FrontSeerError::SignalFetch { .. } => err,
        other => FrontSeerError::signal_error(signal, other.to_string()),
    }
}

/// Runs every wanted fetch concurrently and waits for all of them.
/// A failure in one branch never cancels the others.
pub async fn gather(
    fetcher: &dyn SignalFetcher,
    wanted: SignalSet,
    token_symbol: &str,
    address: &str,
) -> SignalBundle {
    debug!("Gathering signals for {} ({:?})", token_symbol, wanted);

    let (
        predicted_price,
        current_price,
        historical_prices,
        market_conditions,
        volume_24h,
        price_change_24h,
    ) = tokio::join!(
        fetch_if(wanted.predicted_price, "predicted price", || {
            fetcher.predicted_price(token_symbol)
        }),
        fetch_if(wanted.current_price, "current price", || {
            fetcher.current_price(token_symbol)
        }),
        fetch_if(wanted.historical_prices, "historical prices", || {
            fetcher.historical_prices(token_symbol, HISTORICAL_KIND, HISTORICAL_TIMEFRAME)
        }),
        fetch_if(wanted.market_conditions, "market conditions", || {
            fetcher.market_conditions(address)
        }),
        fetch_if(wanted.volume_24h, "24h volume", || fetcher.volume_24h(token_symbol)),
        fetch_if(wanted.price_change_24h, "24h price change", || {
            fetcher.price_change_24h(token_symbol)
        }),
    );

    SignalBundle {
        predicted_price,
        current_price,
        historical_prices,
        market_conditions,
        volume_24h,
        price_change_24h,
    }
}

impl SignalBundle {
    /// Splits the bundle into usable signals, or every failure it contains.
    pub fn into_signals(self) -> std::result::Result<Signals, Vec<FrontSeerError>> {
        let mut failures = Vec::new();

        let signals = Signals {
            predicted_price: settle(self.predicted_price, &mut failures).flatten(),
            current_price: settle(self.current_price, &mut failures).flatten(),
            historical_prices: settle(self.historical_prices, &mut failures),
            market_conditions: settle(self.market_conditions, &mut failures),
            volume_24h: settle(self.volume_24h, &mut failures).flatten(),
            price_change_24h: settle(self.price_change_24h, &mut failures).flatten(),
        };

        if failures.is_empty() {
            Ok(signals)
        } else {
            for failure in &failures {
                warn!("{}", failure);
            }
            Err(failures)
        }
    }
}

fn settle<T>(slot: Option<Result<T>>, failures: &mut Vec<FrontSeerError>) -> Option<T> {
    match slot? {
        Ok(value) => Some(value),
        Err(e) => {
            failures.push(e);
            None
        }
    }
}
