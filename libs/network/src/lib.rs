//! # DEX Network Layer
//!
//! ## Purpose
//!
//! Boundary between the client and the Aleo network. Mapping reads go through
//! the [`MappingReader`] trait so forms and tests never depend on a concrete
//! transport; transaction requests are modelled in the shape the wallet
//! adapter expects, with program inputs in the exact order each function
//! signature declares.
//!
//! ## Integration Points
//!
//! - **Mapping reads**: [`HttpMappingReader`] against the explorer API,
//!   [`InMemoryMappingReader`] for tests and offline use
//! - **Typed queries**: [`MappingQueries`] parses pair, supply, balance and
//!   allowance values into `dex-types` records
//! - **Key derivation**: [`KeyDeriver`] supplies the hashed mapping keys that
//!   the programs compute on chain
//! - **Transactions**: [`ProgramCalls`] builds [`TransactionRequest`]s with
//!   unit-suffixed literal inputs and configured fees

pub mod calls;
pub mod error;
pub mod http;
pub mod keys;
pub mod mapping;
pub mod memory;
pub mod queries;
pub mod transaction;

pub use calls::{AddLiquidityCall, ProgramCalls, RemoveLiquidityCall, SwapCall, TransferKind};
pub use error::{NetworkError, Result};
pub use http::HttpMappingReader;
pub use keys::{KeyDeriver, StaticKeyDeriver, SwapKeys};
pub use mapping::MappingReader;
pub use memory::InMemoryMappingReader;
pub use queries::MappingQueries;
pub use transaction::{TransactionInput, TransactionRequest, Transition};
