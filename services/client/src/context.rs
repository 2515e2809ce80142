//! Shared collaborators handed to every form

use crate::error::Result;
use crate::session::WalletSession;
use dex_config::DexConfig;
use dex_network::{KeyDeriver, MappingQueries, MappingReader, ProgramCalls, SwapKeys};
use dex_types::{Address, Field};
use std::sync::Arc;
use std::time::Duration;

/// Session, network access and call builders for one client
#[derive(Clone)]
pub struct DexContext {
    pub session: Arc<WalletSession>,
    pub queries: MappingQueries,
    pub keys: Arc<dyn KeyDeriver>,
    pub calls: ProgramCalls,
    /// Quiet period before an edited form refetches
    pub debounce: Duration,
}

impl DexContext {
    pub fn new(
        config: &DexConfig,
        session: Arc<WalletSession>,
        reader: Arc<dyn MappingReader>,
        keys: Arc<dyn KeyDeriver>,
    ) -> Self {
        Self {
            session,
            queries: MappingQueries::new(reader, config.programs.clone()),
            keys,
            calls: ProgramCalls::from_config(config),
            debounce: config.client.debounce(),
        }
    }

    /// Connected account, or `WalletNotConnected`
    pub fn owner(&self) -> Result<Address> {
        self.session.address()
    }

    /// Owner plus the hashed keys for a token pair
    pub async fn swap_keys(&self, token_in: &Field, token_out: &Field) -> Result<(Address, SwapKeys)> {
        let owner = self.owner()?;
        let keys = self
            .keys
            .swap_keys(&owner, &self.calls.programs().dex, token_in, token_out)
            .await?;
        Ok((owner, keys))
    }
}
