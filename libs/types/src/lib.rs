//! # DEX Types - Typed Aleo Values and Mapping Records
//!
//! ## Purpose
//!
//! Shared type system for the DEX client workspace. Every numeric value the
//! Aleo network hands back arrives as a string carrying a unit suffix
//! (`1000u128`, `35000u64`); this crate turns those strings into typed values
//! at the network boundary and formats them back when they are used as
//! transaction inputs.
//!
//! ## Integration Points
//!
//! - **Input Sources**: raw mapping values returned by the network client
//! - **Output Destinations**: AMM calculators, allowance gate, transaction builders
//! - **Identifiers**: `Address`, `Field`, `ProgramId`, `WalletChain`
//! - **Parsing**: [`MappingValueParser`] for `name: <digits><unit>` blobs
//!
//! ## Usage
//!
//! ```rust
//! use dex_types::{IntegerValue, MappingValueParser, PairRecord};
//!
//! let raw = "{ reserve_a: 1000u128, reserve_b: 2000u128 }";
//! assert_eq!(MappingValueParser::parse(raw, "reserve_b"), 2000);
//!
//! let pair = PairRecord::parse(raw).unwrap();
//! assert_eq!(pair.reserve_a, 1000);
//!
//! let amount = IntegerValue::u128(181);
//! assert_eq!(amount.to_string(), "181u128");
//! ```

pub mod error;
pub mod identifiers;
pub mod parser;
pub mod records;
pub mod value;

pub use error::{Result, ValueError};
pub use identifiers::{Address, Field, ProgramId, WalletChain};
pub use parser::{FieldValue, MappingValueParser};
pub use records::{BalanceRecord, PairRecord, PoolReserves, TokenRecord};
pub use value::{IntegerUnit, IntegerValue};
