//! Arithmetic precondition failures

use thiserror::Error;

/// Result type alias for AMM calculations
pub type Result<T> = std::result::Result<T, AmmError>;

/// Errors raised before any transaction is attempted
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// `reserve_in + amount_in` is zero, so no quote exists
    #[error("Invalid quote inputs: reserve_in ({reserve_in}) + amount_in ({amount_in}) is zero")]
    InvalidQuoteInputs { amount_in: u128, reserve_in: u128 },

    /// Deposit pairing needs a non-empty reserve A
    #[error("Invalid reserves: reserve_a is zero")]
    InvalidReserves,

    /// Withdrawal needs a non-zero LP supply
    #[error("Invalid supply: total supply is zero")]
    InvalidSupply,

    /// Removal slider needs a non-zero LP balance
    #[error("LP balance is zero")]
    EmptyBalance,

    /// Intermediate product exceeds u128
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },
}
