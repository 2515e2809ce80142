//! DEX forms
//!
//! Each form owns its inputs and a single [`FormState`]. Edits bump a
//! generation counter; a refresh publishes its result only if no edit or
//! newer refresh happened meanwhile and the form has not been disposed.
//!
//! | Form | Fetches | Action |
//! |---|---|---|
//! | [`SwapForm`] | swap keys, allowance, pair | approve token in, then swap |
//! | [`PoolLookup`] | pair, both allowances | none (snapshot for liquidity) |
//! | [`LiquidityManager`] | LP balance, pair, LP supply, allowances | none |
//! | [`AddLiquidityForm`] | allowances on demand | approve A, approve B, deposit |
//! | [`RemoveLiquidityForm`] | nothing | withdraw |
//! | [`Transfers`] | nothing | credits transfer |

mod liquidity;
mod pool;
mod swap;
mod transfer;

pub use liquidity::{
    AddLiquidityForm, AddLiquidityPreview, LiquidityManager, LiquidityPosition, RemovalPreview,
    RemoveLiquidityForm,
};
pub use pool::{PoolLookup, PoolSnapshot};
pub use swap::{SwapForm, SwapInputs, SwapPreview};
pub use transfer::Transfers;

use crate::error::{ClientError, Result};
use crate::state::{FormAction, FormState};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, warn};

/// Debouncer key shared by all forms; a form has one pending refresh at most
pub(crate) const REFRESH: &str = "refresh";

/// Inputs of a form that refetches after edits
pub(crate) trait FormInputs {
    /// Whether a refresh has anything to compute
    fn is_complete(&self) -> bool;
}

/// Inputs, state and staleness tracking common to every form
pub(crate) struct FormCore<I, T> {
    name: &'static str,
    inputs: Mutex<I>,
    state: RwLock<FormState<T>>,
    generation: AtomicU64,
    disposed: AtomicBool,
    last_submission: Mutex<Option<String>>,
}

impl<I: Clone, T: Clone> FormCore<I, T> {
    pub(crate) fn new(name: &'static str, inputs: I) -> Self {
        Self {
            name,
            inputs: Mutex::new(inputs),
            state: RwLock::new(FormState::Idle),
            generation: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
            last_submission: Mutex::new(None),
        }
    }

    pub(crate) fn inputs(&self) -> I {
        self.inputs.lock().clone()
    }

    pub(crate) fn state(&self) -> FormState<T> {
        self.state.read().clone()
    }

    /// Change inputs and invalidate any refresh in flight
    ///
    /// The published state no longer matches the inputs, so it is replaced
    /// right away: `Loading` until the next refresh, or `Idle` while the
    /// inputs are incomplete. No action is offered in between.
    pub(crate) fn edit(&self, f: impl FnOnce(&mut I)) -> Result<()>
    where
        I: FormInputs,
    {
        self.ensure_live()?;
        let mut inputs = self.inputs.lock();
        f(&mut *inputs);
        let mut state = self.state.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = if inputs.is_complete() {
            FormState::Loading
        } else {
            FormState::Idle
        };
        Ok(())
    }

    /// Change inputs of a form whose state is recomputed synchronously
    pub(crate) fn update(&self, f: impl FnOnce(&mut I) -> Result<()>) -> Result<I> {
        self.ensure_live()?;
        let mut inputs = self.inputs.lock();
        f(&mut *inputs)?;
        Ok(inputs.clone())
    }

    /// Start a refresh: returns its generation, or `None` once disposed
    pub(crate) fn begin(&self) -> Option<u64> {
        if self.is_disposed() {
            return None;
        }
        let mut state = self.state.write();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = FormState::Loading;
        Some(generation)
    }

    /// Store a refresh result unless it has been superseded
    pub(crate) fn publish(&self, generation: u64, next: FormState<T>) -> bool {
        let mut state = self.state.write();
        if self.is_disposed() {
            debug!("{}: dropping result after dispose", self.name);
            return false;
        }
        let current = self.generation.load(Ordering::SeqCst);
        if current != generation {
            debug!(
                "{}: dropping stale result (generation {} < {})",
                self.name, generation, current
            );
            return false;
        }
        debug!("{}: {} -> {}", self.name, *state, next);
        *state = next;
        true
    }

    /// Replace the state outside a refresh
    pub(crate) fn set(&self, next: FormState<T>) -> Result<()> {
        self.ensure_live()?;
        *self.state.write() = next;
        Ok(())
    }

    /// Data of the current state if it offers `action`
    pub(crate) fn require(&self, action: FormAction) -> Result<T> {
        let state = self.state.read();
        match (state.action(), state.data()) {
            (Some(offered), Some(data)) if offered == action => Ok(data.clone()),
            _ => Err(ClientError::ActionUnavailable {
                action: match action {
                    FormAction::Approve => "approve",
                    FormAction::Act => "submit",
                },
                state: state.to_string(),
            }),
        }
    }

    pub(crate) fn record_submission(&self, id: &str) {
        *self.last_submission.lock() = Some(id.to_string());
    }

    pub(crate) fn last_submission(&self) -> Option<String> {
        self.last_submission.lock().clone()
    }

    pub(crate) fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            self.generation.fetch_add(1, Ordering::SeqCst);
            debug!("{}: disposed", self.name);
        }
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            Err(ClientError::Disposed)
        } else {
            Ok(())
        }
    }
}

/// Collapse a failed computation into the `Error` state
pub(crate) fn settle<T>(form: &'static str, result: Result<FormState<T>>) -> FormState<T> {
    result.unwrap_or_else(|e| {
        warn!("{}: refresh failed: {}", form, e);
        FormState::Error(e.to_string())
    })
}
