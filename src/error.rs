use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum FrontSeerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to fetch {signal}: {reason}")]
    SignalFetch {
        signal: &'static str,
        reason: String,
    },

    #[error("Missing signal: {0}")]
    MissingSignal(&'static str),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Execution error: {0}")]
    Execution(String),
}

impl FrontSeerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn signal_error(signal: &'static str, reason: impl Into<String>) -> Self {
        Self::SignalFetch {
            signal,
            reason: reason.into(),
        }
    }

    pub fn scoring_error(msg: impl Into<String>) -> Self {
        Self::Scoring(msg.into())
    }

    pub fn execution_error(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FrontSeerError>;
