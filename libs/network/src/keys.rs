//! Hashed mapping keys
//!
//! The DEX and registry programs key their mappings by hashes of structured
//! values (owner, spender, token ids). Computing them requires running the
//! helper program locally, which happens outside this crate; the client only
//! sees the [`KeyDeriver`] seam.

use crate::error::{NetworkError, Result};
use async_trait::async_trait;
use dex_types::{Address, Field, ProgramId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keys needed to gate and quote a swap between two tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapKeys {
    /// `allowances` key for (owner, dex, token_in)
    pub allowance_in: Field,
    /// `allowances` key for (owner, dex, token_out)
    pub allowance_out: Field,
    /// `pairs` key, also the LP token id in the registry
    pub pair_id: Field,
}

/// Derives hashed mapping keys for an owner
#[async_trait]
pub trait KeyDeriver: Send + Sync {
    /// Allowance keys for both tokens and the pair id
    async fn swap_keys(
        &self,
        owner: &Address,
        dex: &ProgramId,
        token_in: &Field,
        token_out: &Field,
    ) -> Result<SwapKeys>;

    /// `authorized_balances` key of `owner` for `token_id`
    async fn balance_key(&self, token_id: &Field, owner: &Address) -> Result<Field>;
}

/// Precomputed keys served from a table
///
/// Used when keys are supplied on the command line, and by tests.
#[derive(Debug, Default)]
pub struct StaticKeyDeriver {
    swaps: RwLock<HashMap<(Address, Field, Field), SwapKeys>>,
    balances: RwLock<HashMap<(Field, Address), Field>>,
}

impl StaticKeyDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_swap_keys(
        self,
        owner: Address,
        token_in: Field,
        token_out: Field,
        keys: SwapKeys,
    ) -> Self {
        self.insert_swap_keys(owner, token_in, token_out, keys);
        self
    }

    pub fn with_balance_key(self, token_id: Field, owner: Address, key: Field) -> Self {
        self.insert_balance_key(token_id, owner, key);
        self
    }

    pub fn insert_swap_keys(&self, owner: Address, token_in: Field, token_out: Field, keys: SwapKeys) {
        self.swaps.write().insert((owner, token_in, token_out), keys);
    }

    pub fn insert_balance_key(&self, token_id: Field, owner: Address, key: Field) {
        self.balances.write().insert((token_id, owner), key);
    }
}

#[async_trait]
impl KeyDeriver for StaticKeyDeriver {
    async fn swap_keys(
        &self,
        owner: &Address,
        _dex: &ProgramId,
        token_in: &Field,
        token_out: &Field,
    ) -> Result<SwapKeys> {
        self.swaps
            .read()
            .get(&(owner.clone(), token_in.clone(), token_out.clone()))
            .cloned()
            .ok_or_else(|| {
                NetworkError::key_derivation(format!(
                    "no swap keys for {} -> {} (owner {})",
                    token_in, token_out, owner
                ))
            })
    }

    async fn balance_key(&self, token_id: &Field, owner: &Address) -> Result<Field> {
        self.balances
            .read()
            .get(&(token_id.clone(), owner.clone()))
            .cloned()
            .ok_or_else(|| {
                NetworkError::key_derivation(format!(
                    "no balance key for token {} (owner {})",
                    token_id, owner
                ))
            })
    }
}
