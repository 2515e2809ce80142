//! # DEX AMM Library - Client-Side Constant Product Mathematics
//!
//! ## Purpose
//!
//! Exact integer arithmetic for the zero-fee constant-product pool the DEX
//! program implements. Quotes and liquidity amounts are computed on the
//! client so the user sees them before a transaction is built, and the same
//! values are passed to the program as inputs.
//!
//! ## Integration Points
//!
//! - **Input Sources**: pool snapshots parsed from the `pairs` and
//!   `registered_tokens` mappings ([`dex_types::PoolReserves`])
//! - **Output Destinations**: swap and liquidity forms, transaction builders
//! - **Rounding**: every division floors, matching the on-chain program
//! - **Validation**: zero denominators and u128 overflow are reported as
//!   [`AmmError`] values, never as NaN or wrapped results
//!
//! ## Formulas
//!
//! | Operation | Formula |
//! |---|---|
//! | Swap output | `floor(in * reserve_out / (reserve_in + in))` |
//! | Deposit pairing | `floor(amount_a * reserve_b / reserve_a)` |
//! | Withdrawal | `floor(liquidity * reserve_x / supply)` |
//! | Removal slider | `amount = floor(balance * pct / 100)`, `pct = floor(amount * 100 / balance)` |

pub mod error;
pub mod liquidity_math;
pub mod pool_traits;
pub mod swap_math;

pub use error::{AmmError, Result};
pub use liquidity_math::{LiquidityCalculator, RemovalInput, WithdrawalAmounts};
pub use pool_traits::AmmPool;
pub use swap_math::{SwapQuote, SwapQuoteCalculator};

/// Common types for AMM calculations
pub use rust_decimal::Decimal;
