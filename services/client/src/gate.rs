//! Allowance gating
//!
//! An action that spends tokens on the user's behalf is only offered once the
//! on-chain allowance covers the requested amount. Nothing is cached: the
//! approved amount is whatever the last fetch returned.

use serde::Serialize;

/// Gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateState {
    NeedsApproval,
    Ready,
}

/// Single-token allowance gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AllowanceGate {
    requested: u128,
    approved: u128,
}

impl AllowanceGate {
    pub fn new(requested: u128, approved: u128) -> Self {
        Self {
            requested,
            approved,
        }
    }

    /// Record an edit of the requested amount
    pub fn set_requested(&mut self, requested: u128) -> GateState {
        self.requested = requested;
        self.state()
    }

    /// Record a refetched allowance
    pub fn set_approved(&mut self, approved: u128) -> GateState {
        self.approved = approved;
        self.state()
    }

    pub fn state(&self) -> GateState {
        if self.approved >= self.requested {
            GateState::Ready
        } else {
            GateState::NeedsApproval
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == GateState::Ready
    }

    pub fn requested(&self) -> u128 {
        self.requested
    }

    pub fn approved(&self) -> u128 {
        self.approved
    }

    /// Amount still missing from the allowance
    pub fn shortfall(&self) -> u128 {
        self.requested.saturating_sub(self.approved)
    }
}

/// Next step of a two-token action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DualGateStep {
    ApproveA,
    ApproveB,
    Ready,
}

/// Gate for actions spending two tokens, such as a paired deposit
///
/// Token A is approved before token B, then the action is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DualAllowanceGate {
    pub a: AllowanceGate,
    pub b: AllowanceGate,
}

impl DualAllowanceGate {
    pub fn new(a: AllowanceGate, b: AllowanceGate) -> Self {
        Self { a, b }
    }

    pub fn set_requested(&mut self, amount_a: u128, amount_b: u128) -> DualGateStep {
        self.a.set_requested(amount_a);
        self.b.set_requested(amount_b);
        self.step()
    }

    pub fn set_approved(&mut self, approved_a: u128, approved_b: u128) -> DualGateStep {
        self.a.set_approved(approved_a);
        self.b.set_approved(approved_b);
        self.step()
    }

    pub fn step(&self) -> DualGateStep {
        if !self.a.is_ready() {
            DualGateStep::ApproveA
        } else if !self.b.is_ready() {
            DualGateStep::ApproveB
        } else {
            DualGateStep::Ready
        }
    }
}
