//! Error types for the client

use dex_amm::AmmError;
use dex_network::NetworkError;
use dex_types::ValueError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Operation needs an active wallet session
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// Wallet adapter refused or failed the request
    #[error("Transaction {function} failed: {reason}")]
    TransactionFailed { function: String, reason: String },

    /// Wallet adapter failure outside a transaction request
    #[error("Wallet adapter error: {0}")]
    Wallet(String),

    /// Requested action does not match the form state
    #[error("No {action} action available while form is {state}")]
    ActionUnavailable { action: &'static str, state: String },

    /// User input rejected before any transaction is built
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Mapping entry the operation depends on does not exist
    #[error("No {mapping} entry under {key}")]
    MissingEntry { mapping: &'static str, key: String },

    /// Form was disposed
    #[error("Form has been disposed")]
    Disposed,

    /// Scheduling requires a running Tokio runtime
    #[error("No Tokio runtime available to schedule task")]
    NoRuntime,

    #[error(transparent)]
    Amm(#[from] AmmError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

impl ClientError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
