//! The submit/wait/render state machine behind the simulation page.

use shared::domain::{IterationCount, SimulationNarrative, SimulationRequest};
use tracing::debug;

/// Shown when submit is attempted with nothing to simulate. Fixed wording,
/// surfaced directly to the user.
pub const EMPTY_DESCRIPTION_MESSAGE: &str = "Please enter a product description.";

/// Shown for every transport or response failure. The underlying cause is
/// diagnostic only and must not replace this.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Number of phases the pending indicator cycles through (0 to 3 dots).
const TICK_PHASES: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Pending,
    Succeeded(SimulationNarrative),
    Failed(String),
}

/// Owns the page's input state and drives one submission at a time through
/// `Idle -> Pending -> Succeeded | Failed`.
///
/// `submit` hands back the request to execute instead of executing it, so the
/// caller decides where the network call runs; the gating still lives here and
/// guarantees at most one outstanding request no matter how often submit is
/// triggered. `resolve_success`/`resolve_failure` are the only exits from
/// `Pending`, and each submission passes through exactly one of them.
#[derive(Debug, Default)]
pub struct RequestLifecycleController {
    description: String,
    iterations: IterationCount,
    state: LifecycleState,
    tick: u8,
}

impl RequestLifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_iterations(&mut self, count: IterationCount) {
        self.iterations = count;
    }

    pub fn iterations(&self) -> IterationCount {
        self.iterations
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == LifecycleState::Pending
    }

    /// Starts a submission cycle. Returns the request to execute, or `None`
    /// when no network call may be issued: either a submission is already in
    /// flight, or validation failed locally.
    ///
    /// The description is trimmed before both the emptiness check and the
    /// outgoing request.
    pub fn submit(&mut self) -> Option<SimulationRequest> {
        if self.is_pending() {
            debug!("submit ignored; request already in flight");
            return None;
        }

        let description = self.description.trim();
        if description.is_empty() {
            self.tick = 0;
            self.state = LifecycleState::Failed(EMPTY_DESCRIPTION_MESSAGE.to_string());
            return None;
        }

        self.tick = 0;
        self.state = LifecycleState::Pending;
        Some(SimulationRequest {
            product_description: description.to_string(),
            iterations: self.iterations,
        })
    }

    /// Applies a successful outcome of the in-flight request. Ignored unless
    /// pending, so a stale completion cannot clobber a later cycle.
    pub fn resolve_success(&mut self, narrative: SimulationNarrative) {
        if !self.is_pending() {
            return;
        }
        self.tick = 0;
        self.state = LifecycleState::Succeeded(narrative);
    }

    /// Applies a failed outcome. Always surfaces the fixed generic message;
    /// callers log the actual cause instead of rendering it.
    pub fn resolve_failure(&mut self) {
        if !self.is_pending() {
            return;
        }
        self.tick = 0;
        self.state = LifecycleState::Failed(GENERIC_FAILURE_MESSAGE.to_string());
    }

    /// One animation step of the pending indicator. Only moves while pending;
    /// the counter carries no meaning beyond the trailing-dot count.
    pub fn advance_tick(&mut self) {
        if self.is_pending() {
            self.tick = (self.tick + 1) % TICK_PHASES;
        }
    }

    pub fn tick_phase(&self) -> u8 {
        self.tick
    }

    pub fn pending_indicator(&self) -> String {
        format!("Working{}", ".".repeat(usize::from(self.tick)))
    }
}

#[cfg(test)]
#[path = "tests/lifecycle_tests.rs"]
mod tests;
