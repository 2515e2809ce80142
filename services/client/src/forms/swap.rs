//! Swap form
//!
//! Token pair and input amount in; quote and approve/swap decision out.

use super::{settle, FormCore, FormInputs, REFRESH};
use crate::context::DexContext;
use crate::debounce::Debouncer;
use crate::error::{ClientError, Result};
use crate::gate::{AllowanceGate, GateState};
use crate::state::{FormAction, FormState};
use dex_amm::{Decimal, SwapQuote, SwapQuoteCalculator};
use dex_network::{SwapCall, SwapKeys, TransactionRequest};
use dex_types::Field;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Raw user inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapInputs {
    pub token_in: Option<Field>,
    pub token_out: Option<Field>,
    pub amount: u128,
}

/// Derived data of a refreshed swap form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapPreview {
    pub token_in: Field,
    pub token_out: Field,
    pub keys: SwapKeys,
    pub quote: SwapQuote,
    /// Allowance of `token_in` for the DEX
    pub allowance: u128,
    /// Display only
    pub price_impact: Option<Decimal>,
}

impl FormInputs for SwapInputs {
    fn is_complete(&self) -> bool {
        self.token_in.is_some() && self.token_out.is_some() && self.amount > 0
    }
}

struct SwapInner {
    ctx: DexContext,
    core: FormCore<SwapInputs, SwapPreview>,
}

/// Exact-input swap between two registry tokens
pub struct SwapForm {
    inner: Arc<SwapInner>,
    debouncer: Debouncer<&'static str>,
}

impl SwapForm {
    pub fn new(ctx: DexContext) -> Self {
        let debouncer = Debouncer::new(ctx.debounce);
        Self {
            inner: Arc::new(SwapInner {
                ctx,
                core: FormCore::new("swap", SwapInputs::default()),
            }),
            debouncer,
        }
    }

    pub fn set_token_in(&self, token: Field) -> Result<()> {
        self.edit(|i| i.token_in = Some(token))
    }

    pub fn set_token_out(&self, token: Field) -> Result<()> {
        self.edit(|i| i.token_out = Some(token))
    }

    pub fn set_amount(&self, amount: u128) -> Result<()> {
        self.edit(|i| i.amount = amount)
    }

    pub fn inputs(&self) -> SwapInputs {
        self.inner.core.inputs()
    }

    pub fn state(&self) -> FormState<SwapPreview> {
        self.inner.core.state()
    }

    /// Refresh now, dropping any scheduled refresh
    pub async fn refresh(&self) -> FormState<SwapPreview> {
        self.debouncer.cancel(&REFRESH);
        self.inner.refresh().await
    }

    /// `approve_public` for the input amount; only while `NeedsApproval`
    pub fn approve_transaction(&self) -> Result<TransactionRequest> {
        let preview = self.inner.core.require(FormAction::Approve)?;
        let owner = self.inner.ctx.owner()?;
        Ok(self.inner.ctx.calls.approve_public(
            &owner,
            &preview.token_in,
            preview.quote.input_amount,
        ))
    }

    /// `swap_exact_tokens_for_tokens` at the quoted reserves; only while `Ready`
    pub fn swap_transaction(&self) -> Result<TransactionRequest> {
        let preview = self.inner.core.require(FormAction::Act)?;
        let owner = self.inner.ctx.owner()?;
        Ok(self.inner.ctx.calls.swap_exact_tokens_for_tokens(
            &owner,
            &SwapCall {
                token_in: preview.token_in,
                token_out: preview.token_out,
                amount_in: preview.quote.input_amount,
                reserve_in: preview.quote.reserve_in,
                reserve_out: preview.quote.reserve_out,
            },
        ))
    }

    /// Submit whichever action the state offers
    pub async fn submit(&self) -> Result<String> {
        let state = self.state();
        let request = match state.action() {
            Some(FormAction::Approve) => self.approve_transaction()?,
            Some(FormAction::Act) => self.swap_transaction()?,
            None => {
                return Err(ClientError::ActionUnavailable {
                    action: "submit",
                    state: state.to_string(),
                })
            }
        };

        let id = self.inner.ctx.session.submit(&request).await?;
        info!("Swap form submitted {} as {}", request.describe(), id);
        self.inner.core.record_submission(&id);
        Ok(id)
    }

    pub fn last_submission(&self) -> Option<String> {
        self.inner.core.last_submission()
    }

    /// Stop scheduled refreshes and ignore results still in flight
    pub fn dispose(&self) {
        self.debouncer.cancel_all();
        self.inner.core.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.core.is_disposed()
    }

    fn edit(&self, f: impl FnOnce(&mut SwapInputs)) -> Result<()> {
        self.inner.core.edit(f)?;
        let inner = Arc::clone(&self.inner);
        self.debouncer.schedule(REFRESH, async move {
            inner.refresh().await;
        })
    }
}

impl SwapInner {
    async fn refresh(&self) -> FormState<SwapPreview> {
        let Some(generation) = self.core.begin() else {
            return self.core.state();
        };
        let inputs = self.core.inputs();
        let next = settle("swap", self.compute(inputs).await);
        self.core.publish(generation, next);
        self.core.state()
    }

    async fn compute(&self, inputs: SwapInputs) -> Result<FormState<SwapPreview>> {
        let (Some(token_in), Some(token_out)) = (inputs.token_in, inputs.token_out) else {
            return Ok(FormState::Idle);
        };
        if inputs.amount == 0 {
            return Ok(FormState::Idle);
        }
        if token_in == token_out {
            return Err(ClientError::invalid_input("input and output token are the same"));
        }

        let (_owner, keys) = self.ctx.swap_keys(&token_in, &token_out).await?;
        let (allowance, pair) = tokio::join!(
            self.ctx.queries.allowance(&keys.allowance_in),
            self.ctx.queries.pair(&keys.pair_id)
        );

        let Some(pair) = pair? else {
            debug!("No pair under {}", keys.pair_id);
            return Ok(FormState::PairMissing);
        };
        let allowance = allowance?;

        // The pair's reserve_a is the input side of the quote
        let quote = SwapQuoteCalculator::quote(inputs.amount, pair.reserve_a, pair.reserve_b)?;
        let price_impact =
            SwapQuoteCalculator::calculate_price_impact(inputs.amount, pair.reserve_a, pair.reserve_b)
                .ok();

        let preview = SwapPreview {
            token_in,
            token_out,
            keys,
            quote,
            allowance,
            price_impact,
        };
        Ok(match AllowanceGate::new(inputs.amount, allowance).state() {
            GateState::Ready => FormState::Ready(preview),
            GateState::NeedsApproval => FormState::NeedsApproval(preview),
        })
    }
}
