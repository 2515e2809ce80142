//! Liquidity position and add/remove forms
//!
//! [`LiquidityManager`] loads the caller's LP balance together with the pool
//! reserves and LP supply. The add and remove forms work on that snapshot and
//! recompute synchronously on every edit.

use super::{settle, FormCore};
use crate::context::DexContext;
use crate::error::{ClientError, Result};
use crate::gate::{AllowanceGate, DualAllowanceGate, DualGateStep};
use crate::state::{FormAction, FormState};
use dex_amm::{AmmPool, RemovalInput, WithdrawalAmounts};
use dex_config::defaults::mappings;
use dex_network::{AddLiquidityCall, RemoveLiquidityCall, SwapKeys, TransactionRequest};
use dex_types::{Field, PoolReserves};
use serde::Serialize;
use tracing::{debug, info};

/// LP holdings of the connected account in one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiquidityPosition {
    pub token_a: Field,
    pub token_b: Field,
    pub keys: SwapKeys,
    /// `authorized_balances` key of the LP token for the owner
    pub balance_key: Field,
    /// LP tokens held, 0 when never credited
    pub balance: u128,
    pub reserves: PoolReserves,
    pub allowance_a: u128,
    pub allowance_b: u128,
}

impl LiquidityPosition {
    /// The LP token id equals the pair id
    pub fn lp_token_id(&self) -> &Field {
        &self.keys.pair_id
    }
}

/// Loads a [`LiquidityPosition`] for a token pair
pub struct LiquidityManager {
    ctx: DexContext,
    core: FormCore<(Field, Field), LiquidityPosition>,
}

impl LiquidityManager {
    pub fn new(ctx: DexContext, token_a: Field, token_b: Field) -> Self {
        Self {
            ctx,
            core: FormCore::new("liquidity", (token_a, token_b)),
        }
    }

    pub fn state(&self) -> FormState<LiquidityPosition> {
        self.core.state()
    }

    pub async fn refresh(&self) -> FormState<LiquidityPosition> {
        let Some(generation) = self.core.begin() else {
            return self.core.state();
        };
        let next = settle("liquidity", self.load().await);
        self.core.publish(generation, next);
        self.core.state()
    }

    async fn load(&self) -> Result<FormState<LiquidityPosition>> {
        let (token_a, token_b) = self.core.inputs();
        let (owner, keys) = self.ctx.swap_keys(&token_a, &token_b).await?;
        let balance_key = self.ctx.keys.balance_key(&keys.pair_id, &owner).await?;

        let queries = &self.ctx.queries;
        let (pair, token, balance, allowance_a, allowance_b) = tokio::join!(
            queries.pair(&keys.pair_id),
            queries.token(&keys.pair_id),
            queries.balance(&balance_key),
            queries.allowance(&keys.allowance_in),
            queries.allowance(&keys.allowance_out)
        );

        let Some(pair) = pair? else {
            return Ok(FormState::PairMissing);
        };
        let token = token?.ok_or_else(|| ClientError::MissingEntry {
            mapping: mappings::REGISTERED_TOKENS,
            key: keys.pair_id.to_string(),
        })?;
        let balance = balance?.map(|record| record.balance).unwrap_or(0);
        debug!("LP balance {} under {}", balance, balance_key);

        Ok(FormState::Ready(LiquidityPosition {
            token_a,
            token_b,
            reserves: PoolReserves::from_records(pair, token),
            keys,
            balance_key,
            balance,
            allowance_a: allowance_a?,
            allowance_b: allowance_b?,
        }))
    }

    fn position(&self) -> Result<LiquidityPosition> {
        self.core.require(FormAction::Act)
    }

    /// Deposit form for the loaded position
    pub fn add_liquidity(&self) -> Result<AddLiquidityForm> {
        Ok(AddLiquidityForm::new(self.ctx.clone(), self.position()?))
    }

    /// Withdrawal form; fails with `EmptyBalance` when no LP tokens are held
    pub fn remove_liquidity(&self) -> Result<RemoveLiquidityForm> {
        RemoveLiquidityForm::new(self.ctx.clone(), self.position()?)
    }

    pub fn dispose(&self) {
        self.core.dispose();
    }
}

/// Derived data of the deposit form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddLiquidityPreview {
    pub amount_a: u128,
    /// Matching token B amount at the current reserve ratio
    pub amount_b: u128,
    pub gate: DualAllowanceGate,
    pub step: DualGateStep,
}

#[derive(Debug, Clone, Copy, Default)]
struct AddInputs {
    amount_a: u128,
    allowance_a: u128,
    allowance_b: u128,
}

/// Paired deposit: approve token A, then token B, then deposit
pub struct AddLiquidityForm {
    ctx: DexContext,
    position: LiquidityPosition,
    core: FormCore<AddInputs, AddLiquidityPreview>,
}

impl AddLiquidityForm {
    pub fn new(ctx: DexContext, position: LiquidityPosition) -> Self {
        let inputs = AddInputs {
            amount_a: 0,
            allowance_a: position.allowance_a,
            allowance_b: position.allowance_b,
        };
        Self {
            ctx,
            position,
            core: FormCore::new("add_liquidity", inputs),
        }
    }

    pub fn position(&self) -> &LiquidityPosition {
        &self.position
    }

    pub fn state(&self) -> FormState<AddLiquidityPreview> {
        self.core.state()
    }

    /// Token A amount edit; token B follows the pool ratio
    pub fn set_amount_a(&self, amount_a: u128) -> Result<FormState<AddLiquidityPreview>> {
        let inputs = self.core.update(|i| {
            i.amount_a = amount_a;
            Ok(())
        })?;
        let next = settle("add_liquidity", self.compute(inputs));
        self.core.set(next.clone())?;
        Ok(next)
    }

    /// Refetch both allowances, typically after an approval went through
    pub async fn refresh_allowances(&self) -> Result<FormState<AddLiquidityPreview>> {
        let generation = self.core.begin().ok_or(ClientError::Disposed)?;
        let queries = &self.ctx.queries;
        let (a, b) = tokio::join!(
            queries.allowance(&self.position.keys.allowance_in),
            queries.allowance(&self.position.keys.allowance_out)
        );

        let next = match (a, b) {
            (Ok(a), Ok(b)) => {
                let inputs = self.core.update(|i| {
                    i.allowance_a = a;
                    i.allowance_b = b;
                    Ok(())
                })?;
                settle("add_liquidity", self.compute(inputs))
            }
            (Err(e), _) | (_, Err(e)) => settle("add_liquidity", Err(e.into())),
        };
        self.core.publish(generation, next);
        Ok(self.core.state())
    }

    fn compute(&self, inputs: AddInputs) -> Result<FormState<AddLiquidityPreview>> {
        if inputs.amount_a == 0 {
            return Ok(FormState::Idle);
        }
        let amount_b = self.position.reserves.paired_deposit(inputs.amount_a)?;

        let gate = DualAllowanceGate::new(
            AllowanceGate::new(inputs.amount_a, inputs.allowance_a),
            AllowanceGate::new(amount_b, inputs.allowance_b),
        );
        let preview = AddLiquidityPreview {
            amount_a: inputs.amount_a,
            amount_b,
            gate,
            step: gate.step(),
        };
        Ok(match preview.step {
            DualGateStep::Ready => FormState::Ready(preview),
            DualGateStep::ApproveA | DualGateStep::ApproveB => FormState::NeedsApproval(preview),
        })
    }

    /// Approval of A, approval of B, or the deposit, in that order
    pub fn next_transaction(&self) -> Result<TransactionRequest> {
        let state = self.core.state();
        let Some(preview) = state.data().copied() else {
            return Err(ClientError::ActionUnavailable {
                action: "submit",
                state: state.to_string(),
            });
        };
        let owner = self.ctx.owner()?;
        let calls = &self.ctx.calls;
        let position = &self.position;

        Ok(match preview.step {
            DualGateStep::ApproveA => {
                calls.approve_public(&owner, &position.token_a, preview.amount_a)
            }
            DualGateStep::ApproveB => {
                calls.approve_public(&owner, &position.token_b, preview.amount_b)
            }
            DualGateStep::Ready => calls.add_liquidity(
                &owner,
                &AddLiquidityCall {
                    token_a: position.token_a.clone(),
                    token_b: position.token_b.clone(),
                    amount_a: preview.amount_a,
                    amount_b: preview.amount_b,
                    supply: position.reserves.total_supply,
                    reserve_a: position.reserves.reserve_a,
                    reserve_b: position.reserves.reserve_b,
                },
            ),
        })
    }

    pub async fn submit(&self) -> Result<String> {
        let request = self.next_transaction()?;
        let id = self.ctx.session.submit(&request).await?;
        info!("Add liquidity form submitted {} as {}", request.describe(), id);
        self.core.record_submission(&id);
        Ok(id)
    }

    pub fn last_submission(&self) -> Option<String> {
        self.core.last_submission()
    }

    pub fn dispose(&self) {
        self.core.dispose();
    }
}

/// Derived data of the withdrawal form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemovalPreview {
    pub removed: u128,
    pub percentage: u128,
    pub withdrawal: WithdrawalAmounts,
}

/// LP withdrawal with a linked amount field and percentage slider
pub struct RemoveLiquidityForm {
    ctx: DexContext,
    position: LiquidityPosition,
    core: FormCore<RemovalInput, RemovalPreview>,
}

impl RemoveLiquidityForm {
    pub fn new(ctx: DexContext, position: LiquidityPosition) -> Result<Self> {
        let input = RemovalInput::new(position.balance)?;
        Ok(Self {
            ctx,
            position,
            core: FormCore::new("remove_liquidity", input),
        })
    }

    pub fn position(&self) -> &LiquidityPosition {
        &self.position
    }

    pub fn state(&self) -> FormState<RemovalPreview> {
        self.core.state()
    }

    /// Current amount and percentage, whichever was edited last
    pub fn input(&self) -> RemovalInput {
        self.core.inputs()
    }

    pub fn set_amount(&self, amount: u128) -> Result<FormState<RemovalPreview>> {
        self.apply(|input| Ok(input.set_amount(amount)?))
    }

    pub fn set_percentage(&self, percentage: u8) -> Result<FormState<RemovalPreview>> {
        self.apply(|input| Ok(input.set_percentage(percentage)?))
    }

    fn apply(
        &self,
        f: impl FnOnce(&mut RemovalInput) -> Result<()>,
    ) -> Result<FormState<RemovalPreview>> {
        let input = self.core.update(f)?;
        let next = settle("remove_liquidity", self.compute(input));
        self.core.set(next.clone())?;
        Ok(next)
    }

    fn compute(&self, input: RemovalInput) -> Result<FormState<RemovalPreview>> {
        if input.removed_amount() == 0 {
            return Ok(FormState::Idle);
        }
        if input.exceeds_balance() {
            return Err(ClientError::invalid_input(format!(
                "removal of {} exceeds LP balance {}",
                input.removed_amount(),
                input.balance()
            )));
        }
        let withdrawal = self.position.reserves.withdrawal(input.removed_amount())?;
        Ok(FormState::Ready(RemovalPreview {
            removed: input.removed_amount(),
            percentage: input.percentage(),
            withdrawal,
        }))
    }

    pub fn remove_transaction(&self) -> Result<TransactionRequest> {
        let preview = self.core.require(FormAction::Act)?;
        let owner = self.ctx.owner()?;
        let position = &self.position;
        Ok(self.ctx.calls.remove_liquidity(
            &owner,
            &RemoveLiquidityCall {
                token_a: position.token_a.clone(),
                token_b: position.token_b.clone(),
                removed: preview.removed,
                supply: position.reserves.total_supply,
                reserve_a: position.reserves.reserve_a,
                reserve_b: position.reserves.reserve_b,
            },
        ))
    }

    pub async fn submit(&self) -> Result<String> {
        let request = self.remove_transaction()?;
        let id = self.ctx.session.submit(&request).await?;
        info!("Remove liquidity form submitted {} as {}", request.describe(), id);
        self.core.record_submission(&id);
        Ok(id)
    }

    pub fn last_submission(&self) -> Option<String> {
        self.core.last_submission()
    }

    pub fn dispose(&self) {
        self.core.dispose();
    }
}
