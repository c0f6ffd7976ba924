//! # Error Types
//!
//! Errors surfaced by the deposit engine. All of them describe recoverable
//! states: the form stays interactive and the user can correct the input.

use thiserror::Error;

/// Errors produced by amount parsing and controller entry points
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepositError {
    #[error("Malformed decimal amount: {0:?}")]
    MalformedAmount(String),

    #[error("Amount scale {scale} exceeds token precision {decimals}")]
    ScaleExceedsPrecision { scale: usize, decimals: u8 },

    #[error("Asset index {index} out of bounds ({len} assets)")]
    AssetIndexOutOfBounds { index: usize, len: usize },

    #[error("Fee tier index {index} out of bounds ({len} tiers)")]
    FeeTierOutOfBounds { index: usize, len: usize },

    #[error("Unknown asset symbol: {0}")]
    UnknownSymbol(String),
}

/// Result type using deposit errors
pub type CoreResult<T> = Result<T, DepositError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DepositError::ScaleExceedsPrecision { scale: 7, decimals: 6 };
        assert_eq!(
            format!("{}", err),
            "Amount scale 7 exceeds token precision 6"
        );

        let err = DepositError::UnknownSymbol("WETH".to_string());
        assert_eq!(format!("{}", err), "Unknown asset symbol: WETH");
    }
}
