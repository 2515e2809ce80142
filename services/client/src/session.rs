//! Wallet session
//!
//! Signing and broadcast belong to an external wallet reached through the
//! [`WalletAdapter`] seam. [`WalletSession`] tracks whether that wallet is
//! connected and which account it exposes; forms read the account from the
//! session and never hold it themselves.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use dex_network::TransactionRequest;
use dex_types::Address;
use parking_lot::RwLock;
use tracing::{info, warn};

/// External wallet
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Open the wallet and return the account it exposes
    async fn connect(&self) -> Result<Address>;

    /// Hand a transaction to the wallet, returning its request id
    async fn request_transaction(&self, request: &TransactionRequest) -> Result<String>;

    async fn disconnect(&self) -> Result<()>;
}

/// Connection state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Active { address: Address },
}

/// Disconnected -> Active -> Disconnected lifecycle over a wallet adapter
pub struct WalletSession {
    adapter: Box<dyn WalletAdapter>,
    state: RwLock<SessionState>,
}

impl WalletSession {
    pub fn new(adapter: impl WalletAdapter + 'static) -> Self {
        Self {
            adapter: Box::new(adapter),
            state: RwLock::new(SessionState::Disconnected),
        }
    }

    /// Connect the wallet; reconnecting an active session keeps it active
    pub async fn connect(&self) -> Result<Address> {
        if let SessionState::Active { address } = self.state() {
            return Ok(address);
        }

        let address = self.adapter.connect().await?;
        info!("Wallet connected: {}", address);
        *self.state.write() = SessionState::Active {
            address: address.clone(),
        };
        Ok(address)
    }

    pub async fn disconnect(&self) -> Result<()> {
        if *self.state.read() == SessionState::Disconnected {
            return Ok(());
        }
        // The session ends even if the adapter reports an error
        *self.state.write() = SessionState::Disconnected;
        if let Err(e) = self.adapter.disconnect().await {
            warn!("Wallet adapter disconnect failed: {}", e);
            return Err(e);
        }
        info!("Wallet disconnected");
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn is_active(&self) -> bool {
        matches!(*self.state.read(), SessionState::Active { .. })
    }

    /// Connected account
    pub fn address(&self) -> Result<Address> {
        match &*self.state.read() {
            SessionState::Active { address } => Ok(address.clone()),
            SessionState::Disconnected => Err(ClientError::WalletNotConnected),
        }
    }

    /// Submit a request built for the connected account
    pub async fn submit(&self, request: &TransactionRequest) -> Result<String> {
        let address = self.address()?;
        if request.address != address {
            return Err(ClientError::invalid_input(format!(
                "request built for {} but wallet is {}",
                request.address, address
            )));
        }

        let description = request.describe();
        info!("Submitting {} (fee {})", description, request.fee);
        self.adapter
            .request_transaction(request)
            .await
            .map_err(|e| {
                warn!("{} rejected: {}", description, e);
                ClientError::TransactionFailed {
                    function: description.clone(),
                    reason: e.to_string(),
                }
            })
    }
}
