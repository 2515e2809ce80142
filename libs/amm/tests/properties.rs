//! AMM Calculation Property Tests
//!
//! Mathematical properties that must hold for every reserve snapshot,
//! independent of specific pool states.

use dex_amm::{AmmError, LiquidityCalculator, RemovalInput, SwapQuoteCalculator};
use dex_types::PoolReserves;
use proptest::prelude::*;

// Amounts bounded to u64 so intermediate products stay within u128
fn amount() -> impl Strategy<Value = u128> {
    (0u64..=u64::MAX).prop_map(u128::from)
}

proptest! {
    #[test]
    fn quote_matches_floor_formula_and_never_exceeds_reserve(
        amount_in in amount(),
        reserve_in in amount(),
        reserve_out in amount(),
    ) {
        prop_assume!(reserve_in + amount_in > 0);

        let output = SwapQuoteCalculator::calculate_output_amount(amount_in, reserve_in, reserve_out)
            .expect("inputs are valid");

        prop_assert_eq!(output, amount_in * reserve_out / (reserve_in + amount_in));
        prop_assert!(output <= reserve_out);
    }

    #[test]
    fn larger_input_never_quotes_less(
        amount_in in 0u64..1_000_000_000,
        extra in 0u64..1_000_000_000,
        reserve_in in 1u64..u64::MAX,
        reserve_out in amount(),
    ) {
        let small = SwapQuoteCalculator::calculate_output_amount(
            u128::from(amount_in), u128::from(reserve_in), reserve_out).unwrap();
        let large = SwapQuoteCalculator::calculate_output_amount(
            u128::from(amount_in) + u128::from(extra), u128::from(reserve_in), reserve_out).unwrap();
        prop_assert!(large >= small);
    }

    #[test]
    fn withdrawal_is_proportional_to_share(
        reserve_a in 1u64..u64::MAX,
        reserve_b in 1u64..u64::MAX,
        supply in 1u64..u64::MAX,
        share in 0u64..=10_000,
    ) {
        let supply = u128::from(supply);
        let liquidity = supply * u128::from(share) / 10_000;
        let pool = PoolReserves::new(u128::from(reserve_a), u128::from(reserve_b), supply);

        let amounts = LiquidityCalculator::withdrawal(liquidity, &pool).unwrap();

        // withdraw_x / reserve_x == liquidity / supply within one unit of floor rounding
        prop_assert!(amounts.withdraw_a * supply <= liquidity * pool.reserve_a);
        prop_assert!(liquidity * pool.reserve_a < (amounts.withdraw_a + 1) * supply);
        prop_assert!(amounts.withdraw_b * supply <= liquidity * pool.reserve_b);
        prop_assert!(liquidity * pool.reserve_b < (amounts.withdraw_b + 1) * supply);
        prop_assert!(amounts.withdraw_a <= pool.reserve_a);
        prop_assert!(amounts.withdraw_b <= pool.reserve_b);
    }

    #[test]
    fn slider_amount_stays_within_balance(balance in 1u64..u64::MAX, percentage in 0u8..=255) {
        let mut input = RemovalInput::new(u128::from(balance)).unwrap();
        input.set_percentage(percentage).unwrap();

        prop_assert!(input.percentage() <= 100);
        prop_assert!(input.removed_amount() <= u128::from(balance));
        prop_assert!(!input.exceeds_balance());
    }
}

#[test]
fn swap_scenario_from_pool_snapshot() {
    let quote = SwapQuoteCalculator::quote(100, 1000, 2000).unwrap();
    assert_eq!(quote.output_amount, 181);
}

#[test]
fn withdrawal_scenario_from_pool_snapshot() {
    let pool = PoolReserves::new(1000, 2000, 500);
    let amounts = LiquidityCalculator::withdrawal(50, &pool).unwrap();
    assert_eq!((amounts.withdraw_a, amounts.withdraw_b), (100, 200));
}

#[test]
fn preconditions_short_circuit() {
    assert!(matches!(
        SwapQuoteCalculator::calculate_output_amount(0, 0, 1),
        Err(AmmError::InvalidQuoteInputs { .. })
    ));
    assert_eq!(
        LiquidityCalculator::deposit_amount_b(1, 0, 1),
        Err(AmmError::InvalidReserves)
    );
    assert_eq!(
        LiquidityCalculator::withdraw_amount(1, 1, 0),
        Err(AmmError::InvalidSupply)
    );
}
