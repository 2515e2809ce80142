//! Program call builders
//!
//! One constructor per program function. Inputs are emitted in the order the
//! function signature declares them, with the unit suffix the program
//! expects: token amounts and reserves are `u128`, credits amounts `u64`.

use crate::transaction::{TransactionInput, TransactionRequest, Transition};
use dex_config::{DexConfig, FeeSettings, ProgramSettings};
use dex_types::{Address, Field, IntegerValue, ProgramId, WalletChain};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Function names of the deployed programs
pub mod functions {
    pub const APPROVE_PUBLIC: &str = "approve_public";
    pub const SWAP_EXACT_TOKENS_FOR_TOKENS: &str = "swap_exact_tokens_for_tokens";
    pub const ADD_LIQUIDITY: &str = "add_liquidity";
    pub const REMOVE_LIQUIDITY: &str = "remove_liquidity";
    pub const TRANSFER_PUBLIC: &str = "transfer_public";
    pub const TRANSFER_PUBLIC_TO_PRIVATE: &str = "transfer_public_to_private";
    pub const TRANSFER_PRIVATE: &str = "transfer_private";
    pub const TRANSFER_PRIVATE_TO_PUBLIC: &str = "transfer_private_to_public";
}

/// Exact-input swap against a reserve snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCall {
    pub token_in: Field,
    pub token_out: Field,
    pub amount_in: u128,
    pub reserve_in: u128,
    pub reserve_out: u128,
}

/// Paired deposit into an existing pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityCall {
    pub token_a: Field,
    pub token_b: Field,
    pub amount_a: u128,
    pub amount_b: u128,
    pub supply: u128,
    pub reserve_a: u128,
    pub reserve_b: u128,
}

/// Withdrawal of LP tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityCall {
    pub token_a: Field,
    pub token_b: Field,
    pub removed: u128,
    pub supply: u128,
    pub reserve_a: u128,
    pub reserve_b: u128,
}

/// Credits transfer between public balances and private records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    Public,
    PublicToPrivate,
    Private,
    PrivateToPublic,
}

impl TransferKind {
    pub const fn function_name(self) -> &'static str {
        match self {
            TransferKind::Public => functions::TRANSFER_PUBLIC,
            TransferKind::PublicToPrivate => functions::TRANSFER_PUBLIC_TO_PRIVATE,
            TransferKind::Private => functions::TRANSFER_PRIVATE,
            TransferKind::PrivateToPublic => functions::TRANSFER_PRIVATE_TO_PUBLIC,
        }
    }

    /// Whether the transfer consumes a private credits record
    pub const fn spends_record(self) -> bool {
        matches!(self, TransferKind::Private | TransferKind::PrivateToPublic)
    }
}

/// Builds transaction requests for the configured programs and fees
#[derive(Debug, Clone)]
pub struct ProgramCalls {
    programs: ProgramSettings,
    fees: FeeSettings,
    chain: WalletChain,
}

impl ProgramCalls {
    pub fn new(programs: ProgramSettings, fees: FeeSettings, chain: WalletChain) -> Self {
        Self {
            programs,
            fees,
            chain,
        }
    }

    pub fn from_config(config: &DexConfig) -> Self {
        Self::new(
            config.programs.clone(),
            config.fees,
            config.network.chain,
        )
    }

    pub fn programs(&self) -> &ProgramSettings {
        &self.programs
    }

    pub fn fees(&self) -> &FeeSettings {
        &self.fees
    }

    /// `token_registry.aleo/approve_public(token_id, spender, amount)`
    ///
    /// The spender is always the DEX program account.
    pub fn approve_public(&self, owner: &Address, token_id: &Field, amount: u128) -> TransactionRequest {
        self.public_request(
            owner,
            &self.programs.token_registry,
            functions::APPROVE_PUBLIC,
            vec![
                token_id.into(),
                (&self.programs.dex_address).into(),
                IntegerValue::u128(amount).into(),
            ],
            self.fees.approve,
        )
    }

    /// `swap_exact_tokens_for_tokens(token_in, token_out, amount_in, reserve_in, reserve_out, owner)`
    pub fn swap_exact_tokens_for_tokens(&self, owner: &Address, call: &SwapCall) -> TransactionRequest {
        self.public_request(
            owner,
            &self.programs.dex,
            functions::SWAP_EXACT_TOKENS_FOR_TOKENS,
            vec![
                (&call.token_in).into(),
                (&call.token_out).into(),
                IntegerValue::u128(call.amount_in).into(),
                IntegerValue::u128(call.reserve_in).into(),
                IntegerValue::u128(call.reserve_out).into(),
                owner.into(),
            ],
            self.fees.swap,
        )
    }

    /// `add_liquidity(token_a, token_b, amount_a, amount_b, supply, reserve_a, reserve_b)`
    pub fn add_liquidity(&self, owner: &Address, call: &AddLiquidityCall) -> TransactionRequest {
        self.public_request(
            owner,
            &self.programs.dex,
            functions::ADD_LIQUIDITY,
            vec![
                (&call.token_a).into(),
                (&call.token_b).into(),
                IntegerValue::u128(call.amount_a).into(),
                IntegerValue::u128(call.amount_b).into(),
                IntegerValue::u128(call.supply).into(),
                IntegerValue::u128(call.reserve_a).into(),
                IntegerValue::u128(call.reserve_b).into(),
            ],
            self.fees.liquidity,
        )
    }

    /// `remove_liquidity(token_a, token_b, removed, supply, reserve_a, reserve_b, owner)`
    pub fn remove_liquidity(&self, owner: &Address, call: &RemoveLiquidityCall) -> TransactionRequest {
        self.public_request(
            owner,
            &self.programs.dex,
            functions::REMOVE_LIQUIDITY,
            vec![
                (&call.token_a).into(),
                (&call.token_b).into(),
                IntegerValue::u128(call.removed).into(),
                IntegerValue::u128(call.supply).into(),
                IntegerValue::u128(call.reserve_a).into(),
                IntegerValue::u128(call.reserve_b).into(),
                owner.into(),
            ],
            self.fees.liquidity,
        )
    }

    /// `credits.aleo` transfer of `amount` microcredits to `recipient`
    ///
    /// Record-spending transfers take the record as first input and pay the
    /// fee privately; public transfers pay it from the public balance.
    /// Returns `None` when a record-spending transfer is built without a
    /// record, or a public one with one.
    pub fn transfer(
        &self,
        owner: &Address,
        kind: TransferKind,
        recipient: &Address,
        amount: u64,
        record: Option<serde_json::Value>,
    ) -> Option<TransactionRequest> {
        let mut inputs = Vec::with_capacity(3);
        match (kind.spends_record(), record) {
            (true, Some(record)) => inputs.push(TransactionInput::Record(record)),
            (false, None) => {}
            _ => return None,
        }
        inputs.push(recipient.into());
        inputs.push(IntegerValue::u64(amount).into());

        Some(self.request(
            owner,
            &self.programs.credits,
            kind.function_name(),
            inputs,
            self.fees.transfer,
            kind.spends_record(),
        ))
    }

    fn public_request(
        &self,
        owner: &Address,
        program: &ProgramId,
        function: &str,
        inputs: Vec<TransactionInput>,
        fee: u64,
    ) -> TransactionRequest {
        self.request(owner, program, function, inputs, fee, false)
    }

    fn request(
        &self,
        owner: &Address,
        program: &ProgramId,
        function: &str,
        inputs: Vec<TransactionInput>,
        fee: u64,
        fee_private: bool,
    ) -> TransactionRequest {
        debug!(
            "Building {}/{} with {} inputs, fee {}",
            program,
            function,
            inputs.len(),
            fee
        );
        TransactionRequest::single(
            owner.clone(),
            self.chain,
            Transition {
                program: program.clone(),
                function_name: function.to_string(),
                inputs,
            },
            fee,
            fee_private,
        )
    }
}
