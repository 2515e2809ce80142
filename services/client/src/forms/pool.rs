//! Pool import lookup

use super::{settle, FormCore, FormInputs, REFRESH};
use crate::context::DexContext;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::state::FormState;
use dex_network::SwapKeys;
use dex_types::{Field, PairRecord};
use serde::Serialize;
use std::sync::Arc;

/// Pair data and allowances for a token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    pub token_a: Field,
    pub token_b: Field,
    pub keys: SwapKeys,
    pub pair: PairRecord,
    pub allowance_a: u128,
    pub allowance_b: u128,
}

type PoolInputs = (Option<Field>, Option<Field>);

impl FormInputs for PoolInputs {
    fn is_complete(&self) -> bool {
        self.0.is_some() && self.1.is_some()
    }
}

struct PoolInner {
    ctx: DexContext,
    core: FormCore<PoolInputs, PoolSnapshot>,
}

impl PoolInner {
    async fn refresh(&self) -> FormState<PoolSnapshot> {
        let Some(generation) = self.core.begin() else {
            return self.core.state();
        };
        let next = settle("pool", self.compute(self.core.inputs()).await);
        self.core.publish(generation, next);
        self.core.state()
    }

    async fn compute(&self, inputs: PoolInputs) -> Result<FormState<PoolSnapshot>> {
        let (Some(token_a), Some(token_b)) = inputs else {
            return Ok(FormState::Idle);
        };

        let (_owner, keys) = self.ctx.swap_keys(&token_a, &token_b).await?;
        let queries = &self.ctx.queries;
        let (pair, allowance_a, allowance_b) = tokio::join!(
            queries.pair(&keys.pair_id),
            queries.allowance(&keys.allowance_in),
            queries.allowance(&keys.allowance_out)
        );

        let Some(pair) = pair? else {
            return Ok(FormState::PairMissing);
        };
        Ok(FormState::Ready(PoolSnapshot {
            token_a,
            token_b,
            keys,
            pair,
            allowance_a: allowance_a?,
            allowance_b: allowance_b?,
        }))
    }
}

/// Looks up an existing pool before managing its liquidity
pub struct PoolLookup {
    inner: Arc<PoolInner>,
    debouncer: Debouncer<&'static str>,
}

impl PoolLookup {
    pub fn new(ctx: DexContext) -> Self {
        let debouncer = Debouncer::new(ctx.debounce);
        Self {
            inner: Arc::new(PoolInner {
                ctx,
                core: FormCore::new("pool", (None, None)),
            }),
            debouncer,
        }
    }

    pub fn set_token_a(&self, token: Field) -> Result<()> {
        self.edit(|i| i.0 = Some(token))
    }

    pub fn set_token_b(&self, token: Field) -> Result<()> {
        self.edit(|i| i.1 = Some(token))
    }

    pub fn state(&self) -> FormState<PoolSnapshot> {
        self.inner.core.state()
    }

    pub async fn refresh(&self) -> FormState<PoolSnapshot> {
        self.debouncer.cancel(&REFRESH);
        self.inner.refresh().await
    }

    pub fn dispose(&self) {
        self.debouncer.cancel_all();
        self.inner.core.dispose();
    }

    fn edit(&self, f: impl FnOnce(&mut PoolInputs)) -> Result<()> {
        self.inner.core.edit(f)?;
        let inner = Arc::clone(&self.inner);
        self.debouncer.schedule(REFRESH, async move {
            inner.refresh().await;
        })
    }
}
