//! Backend commands queued from UI to the backend worker.

use shared::domain::SimulationRequest;

pub enum BackendCommand {
    RunSimulation { request: SimulationRequest },
}
