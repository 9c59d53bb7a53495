use serde::{Deserialize, Serialize};

use crate::domain::SimulationRequest;

/// Body of the POST to the simulation service. Field names are fixed by the
/// service contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateHttpRequest {
    pub product_description: String,
    pub init_count: u32,
}

impl From<&SimulationRequest> for SimulateHttpRequest {
    fn from(request: &SimulationRequest) -> Self {
        Self {
            product_description: request.product_description.clone(),
            init_count: u32::from(request.iterations.get()),
        }
    }
}

/// Success body from the simulation service. Only `response` is consumed;
/// serde drops any additional fields the service may add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateHttpResponse {
    pub response: String,
}
