//! Transaction request model
//!
//! Mirrors the object a wallet adapter accepts for `requestTransaction`:
//!
//! ```json
//! { "address": "aleo1...", "chainId": "testnetbeta",
//!   "transitions": [{ "program": "...", "functionName": "...", "inputs": [...] }],
//!   "fee": 35000, "feePrivate": false }
//! ```

use dex_types::{Address, IntegerValue, ProgramId, WalletChain};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One program input
///
/// Literals are sent as strings (`1000u128`, `aleo1...`, `12field`); records
/// are the plaintext object supplied by the wallet and passed through as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionInput {
    Literal(String),
    Record(serde_json::Value),
}

impl TransactionInput {
    pub fn literal(value: impl fmt::Display) -> Self {
        TransactionInput::Literal(value.to_string())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            TransactionInput::Literal(s) => Some(s),
            TransactionInput::Record(_) => None,
        }
    }
}

impl From<IntegerValue> for TransactionInput {
    fn from(value: IntegerValue) -> Self {
        TransactionInput::literal(value)
    }
}

impl From<&Address> for TransactionInput {
    fn from(value: &Address) -> Self {
        TransactionInput::literal(value)
    }
}

impl From<&dex_types::Field> for TransactionInput {
    fn from(value: &dex_types::Field) -> Self {
        TransactionInput::literal(value)
    }
}

/// Single program function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub program: ProgramId,
    pub function_name: String,
    pub inputs: Vec<TransactionInput>,
}

/// Request handed to the wallet for signing and broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub address: Address,
    pub chain_id: WalletChain,
    pub transitions: Vec<Transition>,
    /// Fee in microcredits
    pub fee: u64,
    /// Pay the fee from a private record instead of the public balance
    pub fee_private: bool,
}

impl TransactionRequest {
    /// Request with a single transition
    pub fn single(
        address: Address,
        chain_id: WalletChain,
        transition: Transition,
        fee: u64,
        fee_private: bool,
    ) -> Self {
        Self {
            address,
            chain_id,
            transitions: vec![transition],
            fee,
            fee_private,
        }
    }

    /// `program/function` of the first transition, for logging
    pub fn describe(&self) -> String {
        self.transitions
            .first()
            .map(|t| format!("{}/{}", t.program, t.function_name))
            .unwrap_or_else(|| "<empty>".to_string())
    }
}
