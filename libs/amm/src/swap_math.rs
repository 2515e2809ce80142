//! Constant-product swap quotes
//!
//! The DEX program charges no swap fee, so the quote is the plain x*y=k
//! output rounded down. Price impact is computed in `Decimal` for display only.

use crate::error::{AmmError, Result};
use dex_types::PoolReserves;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Quote for an exact-input swap against one reserve snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub input_amount: u128,
    pub output_amount: u128,
    /// Reserves the quote was computed from; sent with the swap transaction
    pub reserve_in: u128,
    pub reserve_out: u128,
}

/// Zero-fee constant-product quote math
pub struct SwapQuoteCalculator;

impl SwapQuoteCalculator {
    /// Output amount for `amount_in` using x*y=k
    ///
    /// `floor(amount_in * reserve_out / (reserve_in + amount_in))`, which is
    /// never larger than `reserve_out`.
    pub fn calculate_output_amount(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> Result<u128> {
        let denominator = reserve_in
            .checked_add(amount_in)
            .ok_or(AmmError::Overflow {
                operation: "swap denominator",
            })?;
        if denominator == 0 {
            return Err(AmmError::InvalidQuoteInputs {
                amount_in,
                reserve_in,
            });
        }

        let numerator = amount_in
            .checked_mul(reserve_out)
            .ok_or(AmmError::Overflow {
                operation: "swap numerator",
            })?;

        Ok(numerator / denominator)
    }

    /// Full quote against a reserve snapshot
    pub fn quote(amount_in: u128, reserve_in: u128, reserve_out: u128) -> Result<SwapQuote> {
        let output_amount = Self::calculate_output_amount(amount_in, reserve_in, reserve_out)?;
        Ok(SwapQuote {
            input_amount: amount_in,
            output_amount,
            reserve_in,
            reserve_out,
        })
    }

    /// Quote selling token A into a pool snapshot
    pub fn quote_pool(amount_in: u128, pool: &PoolReserves) -> Result<SwapQuote> {
        Self::quote(amount_in, pool.reserve_a, pool.reserve_b)
    }

    /// Price impact of a trade as a percentage of the pre-trade price
    pub fn calculate_price_impact(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> Result<Decimal> {
        if amount_in == 0 || reserve_in == 0 || reserve_out == 0 {
            return Err(AmmError::InvalidQuoteInputs {
                amount_in,
                reserve_in,
            });
        }

        let amount_out = Self::calculate_output_amount(amount_in, reserve_in, reserve_out)?;

        let overflow = AmmError::Overflow {
            operation: "price impact",
        };
        let to_decimal = |v: u128| Decimal::from_u128(v).ok_or(overflow);

        // Current price (before trade)
        let price_before = to_decimal(reserve_out)?
            .checked_div(to_decimal(reserve_in)?)
            .ok_or(overflow)?;

        // Price after trade
        let new_reserve_in = to_decimal(reserve_in)?
            .checked_add(to_decimal(amount_in)?)
            .ok_or(overflow)?;
        let new_reserve_out = to_decimal(reserve_out - amount_out)?;
        let price_after = new_reserve_out.checked_div(new_reserve_in).ok_or(overflow)?;

        (price_before - price_after)
            .abs()
            .checked_div(price_before)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or(overflow)
    }
}
