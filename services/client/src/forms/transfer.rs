//! Credits transfers

use crate::context::DexContext;
use crate::error::{ClientError, Result};
use dex_network::{TransactionRequest, TransferKind};
use dex_types::Address;
use tracing::info;

/// Builds and submits `credits.aleo` transfers for the connected account
pub struct Transfers {
    ctx: DexContext,
}

impl Transfers {
    pub fn new(ctx: DexContext) -> Self {
        Self { ctx }
    }

    /// Validate inputs and build the request
    ///
    /// Private variants spend `record`, the plaintext credits record obtained
    /// from the wallet.
    pub fn transaction(
        &self,
        kind: TransferKind,
        recipient: &Address,
        amount: u64,
        record: Option<serde_json::Value>,
    ) -> Result<TransactionRequest> {
        if amount == 0 {
            return Err(ClientError::invalid_input("transfer amount must be positive"));
        }
        let record_given = record.is_some();
        let owner = self.ctx.owner()?;

        self.ctx
            .calls
            .transfer(&owner, kind, recipient, amount, record)
            .ok_or_else(|| {
                ClientError::invalid_input(if record_given {
                    format!("{} does not take a record", kind.function_name())
                } else {
                    format!("{} needs a credits record", kind.function_name())
                })
            })
    }

    pub async fn submit(
        &self,
        kind: TransferKind,
        recipient: &Address,
        amount: u64,
        record: Option<serde_json::Value>,
    ) -> Result<String> {
        let request = self.transaction(kind, recipient, amount, record)?;
        let id = self.ctx.session.submit(&request).await?;
        info!("Transfer {} of {} microcredits submitted as {}", kind.function_name(), amount, id);
        Ok(id)
    }
}
