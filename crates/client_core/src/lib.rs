//! Client-side core for the boardroom simulation service: the request
//! lifecycle state machine and the HTTP transport that executes submissions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{SimulationNarrative, SimulationRequest},
    protocol::{SimulateHttpRequest, SimulateHttpResponse},
};
use thiserror::Error;
use tracing::debug;

pub mod lifecycle;

pub use lifecycle::{
    LifecycleState, RequestLifecycleController, EMPTY_DESCRIPTION_MESSAGE, GENERIC_FAILURE_MESSAGE,
};

/// Production deployment of the simulation service.
pub const DEFAULT_ENDPOINT: &str = "https://boardroom-197814739607.us-central1.run.app/chat";

/// A full run walks several model turns, so the ceiling is generous. It exists
/// so a dead upstream cannot hold the lifecycle in `Pending` forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Network failure, timeout, or a non-success status from the service.
    #[error("simulation request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The service answered 2xx but the body had no usable narrative.
    #[error("simulation response was malformed: {0}")]
    MalformedResponse(String),
}

/// Request-execution capability injected into the submission cycle, so the
/// lifecycle can be driven against a test double instead of a live service.
#[async_trait]
pub trait SimulationTransport: Send + Sync {
    async fn execute(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationNarrative, SimulationError>;
}

/// Talks to the real simulation service. One POST per execution, nothing
/// retried; classification of the outcome is left to the caller.
pub struct HttpSimulationTransport {
    http: Client,
    endpoint: String,
}

impl HttpSimulationTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SimulationTransport for HttpSimulationTransport {
    async fn execute(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationNarrative, SimulationError> {
        debug!(
            iterations = request.iterations.get(),
            description_len = request.product_description.len(),
            "posting simulation request"
        );
        let response = self
            .http
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&SimulateHttpRequest::from(request))
            .send()
            .await
            .map_err(SimulationError::Transport)?
            .error_for_status()
            .map_err(SimulationError::Transport)?;

        let body: SimulateHttpResponse = response
            .json()
            .await
            .map_err(|err| SimulationError::MalformedResponse(err.to_string()))?;

        Ok(SimulationNarrative {
            markup: body.response,
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
