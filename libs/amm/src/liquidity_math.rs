//! Proportional deposit and withdrawal amounts

use crate::error::{AmmError, Result};
use dex_types::PoolReserves;
use serde::{Deserialize, Serialize};

/// Largest value the removal slider accepts
pub const MAX_PERCENTAGE: u8 = 100;

/// Token amounts returned for burning LP tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalAmounts {
    pub liquidity: u128,
    pub withdraw_a: u128,
    pub withdraw_b: u128,
}

/// Deposit and withdrawal math for a constant-product pool
pub struct LiquidityCalculator;

impl LiquidityCalculator {
    /// Amount of token B matching a deposit of `amount_a` at the current ratio
    pub fn deposit_amount_b(amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128> {
        if reserve_a == 0 {
            return Err(AmmError::InvalidReserves);
        }
        let numerator = amount_a.checked_mul(reserve_b).ok_or(AmmError::Overflow {
            operation: "deposit pairing",
        })?;
        Ok(numerator / reserve_a)
    }

    /// Share of one reserve owed for `liquidity` LP tokens
    pub fn withdraw_amount(liquidity: u128, reserve: u128, supply: u128) -> Result<u128> {
        if supply == 0 {
            return Err(AmmError::InvalidSupply);
        }
        let numerator = liquidity.checked_mul(reserve).ok_or(AmmError::Overflow {
            operation: "withdrawal",
        })?;
        Ok(numerator / supply)
    }

    /// Both token amounts owed for `liquidity` LP tokens
    pub fn withdrawal(liquidity: u128, pool: &PoolReserves) -> Result<WithdrawalAmounts> {
        Ok(WithdrawalAmounts {
            liquidity,
            withdraw_a: Self::withdraw_amount(liquidity, pool.reserve_a, pool.total_supply)?,
            withdraw_b: Self::withdraw_amount(liquidity, pool.reserve_b, pool.total_supply)?,
        })
    }
}

/// Removal amount entered either as a literal or through a percentage slider
///
/// Each setter writes its own field and recomputes the other directly, so an
/// update never re-enters the setter it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalInput {
    balance: u128,
    removed_amount: u128,
    percentage: u128,
}

impl RemovalInput {
    pub fn new(balance: u128) -> Result<Self> {
        if balance == 0 {
            return Err(AmmError::EmptyBalance);
        }
        Ok(Self {
            balance,
            removed_amount: 0,
            percentage: 0,
        })
    }

    /// Literal amount edit: `percentage = floor(amount * 100 / balance)`
    pub fn set_amount(&mut self, amount: u128) -> Result<()> {
        let scaled = amount.checked_mul(100).ok_or(AmmError::Overflow {
            operation: "removal percentage",
        })?;
        self.removed_amount = amount;
        self.percentage = scaled / self.balance;
        Ok(())
    }

    /// Slider edit, clamped to 0..=100: `amount = floor(balance * percentage / 100)`
    pub fn set_percentage(&mut self, percentage: u8) -> Result<()> {
        let percentage = percentage.min(MAX_PERCENTAGE);
        let scaled = self
            .balance
            .checked_mul(u128::from(percentage))
            .ok_or(AmmError::Overflow {
                operation: "removal amount",
            })?;
        self.percentage = u128::from(percentage);
        self.removed_amount = scaled / 100;
        Ok(())
    }

    pub fn balance(&self) -> u128 {
        self.balance
    }

    pub fn removed_amount(&self) -> u128 {
        self.removed_amount
    }

    /// May exceed 100 when a literal larger than the balance was entered
    pub fn percentage(&self) -> u128 {
        self.percentage
    }

    pub fn exceeds_balance(&self) -> bool {
        self.removed_amount > self.balance
    }
}
