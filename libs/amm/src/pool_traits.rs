//! Pool trait for reserve snapshots

use crate::{LiquidityCalculator, Result, SwapQuote, SwapQuoteCalculator, WithdrawalAmounts};
use dex_types::PoolReserves;

/// Unified pool interface used by the client forms
pub trait AmmPool {
    /// Quote selling token A for token B
    fn quote_a_to_b(&self, amount_in: u128) -> Result<SwapQuote>;

    /// Token B amount that pairs with a deposit of token A
    fn paired_deposit(&self, amount_a: u128) -> Result<u128>;

    /// Token amounts owed for burning LP tokens
    fn withdrawal(&self, liquidity: u128) -> Result<WithdrawalAmounts>;
}

impl AmmPool for PoolReserves {
    fn quote_a_to_b(&self, amount_in: u128) -> Result<SwapQuote> {
        SwapQuoteCalculator::quote_pool(amount_in, self)
    }

    fn paired_deposit(&self, amount_a: u128) -> Result<u128> {
        LiquidityCalculator::deposit_amount_b(amount_a, self.reserve_a, self.reserve_b)
    }

    fn withdrawal(&self, liquidity: u128) -> Result<WithdrawalAmounts> {
        LiquidityCalculator::withdrawal(liquidity, self)
    }
}
