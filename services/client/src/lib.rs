//! # DEX Client
//!
//! ## Purpose
//!
//! Client-side logic of the DEX front end without the UI: a wallet session,
//! allowance gating, debounced mapping refreshes and one state machine per
//! form. The `dex` binary drives the same forms from the command line.
//!
//! ## Integration Points
//!
//! - **Wallet**: [`WalletAdapter`] seam; [`JsonExportWallet`] writes requests
//!   to disk for an external signer
//! - **Network**: `dex-network` mapping queries and call builders, shared
//!   through [`DexContext`]
//! - **Math**: `dex-amm` quotes and liquidity amounts
//!
//! ## Flow
//!
//! ```text
//! edit -> Debouncer (1s) -> derive keys -> fetch mappings (joined)
//!      -> quote / liquidity math -> AllowanceGate -> FormState
//!      -> Approve | Act -> WalletSession::submit
//! ```

pub mod context;
pub mod debounce;
pub mod error;
pub mod export;
pub mod forms;
pub mod gate;
pub mod session;
pub mod state;

pub use context::DexContext;
pub use debounce::Debouncer;
pub use error::{ClientError, Result};
pub use export::JsonExportWallet;
pub use forms::{
    AddLiquidityForm, AddLiquidityPreview, LiquidityManager, LiquidityPosition, PoolLookup,
    PoolSnapshot, RemovalPreview, RemoveLiquidityForm, SwapForm, SwapInputs, SwapPreview,
    Transfers,
};
pub use gate::{AllowanceGate, DualAllowanceGate, DualGateStep, GateState};
pub use session::{SessionState, WalletAdapter, WalletSession};
pub use state::{FormAction, FormState};
