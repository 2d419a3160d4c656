//! Error types for the exposure engine

use thiserror::Error;

use super::option::ExclusionReason;

#[derive(Error, Debug)]
pub enum ExposureError {
    #[error("Invalid contract {contract}: {reason}")]
    InvalidContract {
        contract: String,
        reason: ExclusionReason,
    },

    #[error("Empty option chain for {symbol}")]
    EmptyChain { symbol: String },

    #[error("Market data unavailable for {symbol}: {reason}")]
    ProviderUnavailable { symbol: String, reason: String },

    #[error("Invalid regime input: {days} days to expiry")]
    InvalidRegimeInput { days: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type ExposureResult<T> = Result<T, ExposureError>;

impl ExposureError {
    pub fn invalid_contract(contract: impl Into<String>, reason: ExclusionReason) -> Self {
        Self::InvalidContract {
            contract: contract.into(),
            reason,
        }
    }

    pub fn empty_chain(symbol: impl Into<String>) -> Self {
        Self::EmptyChain {
            symbol: symbol.into(),
        }
    }

    pub fn provider_unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures that come from the market-data collaborator
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::ProviderUnavailable { .. })
    }
}

impl From<serde_json::Error> for ExposureError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
