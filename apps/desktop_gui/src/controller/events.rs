//! Events flowing from the backend worker to the UI.
//!
//! Failure events carry the underlying cause for logging; the page itself only
//! ever shows the lifecycle's fixed messages.

use shared::domain::SimulationNarrative;

pub enum UiEvent {
    SimulationCompleted { narrative: SimulationNarrative },
    SimulationFailed { detail: String },
    BackendStartupFailed { detail: String },
}
