//! File-exporting wallet adapter
//!
//! Writes each transaction request as pretty JSON into a directory for an
//! external signer to pick up. The request id is the file stem.

use crate::error::{ClientError, Result};
use crate::session::WalletAdapter;
use async_trait::async_trait;
use dex_network::TransactionRequest;
use dex_types::Address;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// [`WalletAdapter`] that exports requests instead of signing them
#[derive(Debug, Clone)]
pub struct JsonExportWallet {
    directory: PathBuf,
    address: Address,
}

impl JsonExportWallet {
    pub fn new(directory: impl Into<PathBuf>, address: Address) -> Self {
        Self {
            directory: directory.into(),
            address,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path the request with `id` is written to
    pub fn request_path(&self, id: &str) -> PathBuf {
        self.directory.join(format!("{}.json", id))
    }
}

#[async_trait]
impl WalletAdapter for JsonExportWallet {
    async fn connect(&self) -> Result<Address> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| {
                ClientError::Wallet(format!(
                    "cannot create {}: {}",
                    self.directory.display(),
                    e
                ))
            })?;
        Ok(self.address.clone())
    }

    async fn request_transaction(&self, request: &TransactionRequest) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let path = self.request_path(&id);
        let body = serde_json::to_string_pretty(request)
            .map_err(|e| ClientError::Wallet(format!("cannot encode request: {}", e)))?;

        tokio::fs::write(&path, body)
            .await
            .map_err(|e| ClientError::Wallet(format!("cannot write {}: {}", path.display(), e)))?;

        info!("Exported {} to {}", request.describe(), path.display());
        Ok(id)
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}
