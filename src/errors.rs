// Error types and error handling module
// This file defines the error kinds surfaced by quoting and execution
// and how they map onto API status codes
//
// Numan Thabit 2025 Nov

use crate::asset::Amount;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AggrError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggrError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no liquidity: {0}")]
    NoLiquidity(String),
    #[error("venue {venue} unavailable: {reason}")]
    VenueUnavailable { venue: String, reason: String },
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),
    #[error("slippage exceeded: expected at least {expected}, got {actual}")]
    SlippageExceeded { expected: Amount, actual: Amount },
    #[error("config error: {0}")]
    Config(String),
}

impl AggrError {
    pub fn unavailable(venue: &str, reason: impl Into<String>) -> Self {
        Self::VenueUnavailable {
            venue: venue.to_string(),
            reason: reason.into(),
        }
    }

    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NoLiquidity(_) => "no_liquidity",
            Self::VenueUnavailable { .. } => "venue_unavailable",
            Self::ArithmeticOverflow(_) => "overflow",
            Self::SlippageExceeded { .. } => "slippage",
            Self::Config(_) => "config",
        }
    }

    /// Errors that only degrade a single venue and never abort a quote
    pub fn is_local(&self) -> bool {
        matches!(self, Self::VenueUnavailable { .. })
    }
}
