use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use shared::domain::IterationCount;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct RecordingState {
    requests: Arc<Mutex<Vec<SimulateHttpRequest>>>,
    hits: Arc<AtomicUsize>,
}

async fn handle_simulate(
    State(state): State<RecordingState>,
    Json(payload): Json<SimulateHttpRequest>,
) -> Json<SimulateHttpResponse> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().await.push(payload);
    Json(SimulateHttpResponse {
        response: "<b>hi</b>".to_string(),
    })
}

async fn handle_simulate_error() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "model quota exhausted" })),
    )
}

async fn handle_simulate_without_result_field() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to the marketing chatbot API!" }))
}

async fn spawn_recording_server() -> (String, RecordingState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = RecordingState::default();
    let app = Router::new()
        .route("/chat", post(handle_simulate))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/chat"), state)
}

async fn spawn_static_server(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/chat")
}

fn request(description: &str, iterations: u8) -> SimulationRequest {
    SimulationRequest {
        product_description: description.to_string(),
        iterations: IterationCount::new(iterations).expect("valid count"),
    }
}

#[tokio::test]
async fn execute_posts_the_service_payload_once() {
    let (endpoint, state) = spawn_recording_server().await;
    let transport = HttpSimulationTransport::new(endpoint);

    let narrative = transport
        .execute(&request("magnetic toothbrush", 3))
        .await
        .expect("simulation succeeds");

    assert_eq!(narrative.markup, "<b>hi</b>");
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
    let recorded = state.requests.lock().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].product_description, "magnetic toothbrush");
    assert_eq!(recorded[0].init_count, 3);
}

#[tokio::test]
async fn execute_classifies_error_status_as_transport_failure() {
    let endpoint =
        spawn_static_server(Router::new().route("/chat", post(handle_simulate_error))).await;
    let transport = HttpSimulationTransport::new(endpoint);

    let err = transport
        .execute(&request("solar kettle", 1))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SimulationError::Transport(_)), "got: {err}");
}

#[tokio::test]
async fn execute_classifies_missing_result_field_as_malformed() {
    let endpoint = spawn_static_server(
        Router::new().route("/chat", post(handle_simulate_without_result_field)),
    )
    .await;
    let transport = HttpSimulationTransport::new(endpoint);

    let err = transport
        .execute(&request("solar kettle", 1))
        .await
        .expect_err("must fail");
    assert!(
        matches!(err, SimulationError::MalformedResponse(_)),
        "got: {err}"
    );
}

#[tokio::test]
async fn execute_classifies_unreachable_service_as_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let transport = HttpSimulationTransport::new(format!("http://{addr}/chat"));

    let err = transport
        .execute(&request("solar kettle", 1))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SimulationError::Transport(_)), "got: {err}");
}

#[tokio::test]
async fn full_cycle_resolves_success_through_the_controller() {
    let (endpoint, state) = spawn_recording_server().await;
    let transport = HttpSimulationTransport::new(endpoint);
    let mut controller = RequestLifecycleController::new();
    controller.set_description("magnetic toothbrush");
    controller.set_iterations(IterationCount::new(5).expect("valid count"));

    let request = controller.submit().expect("request issued");
    match transport.execute(&request).await {
        Ok(narrative) => controller.resolve_success(narrative),
        Err(_) => controller.resolve_failure(),
    }

    assert_eq!(
        controller.state(),
        &LifecycleState::Succeeded(SimulationNarrative {
            markup: "<b>hi</b>".to_string(),
        })
    );
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn pending_gate_holds_the_request_count_at_one() {
    let (endpoint, state) = spawn_recording_server().await;
    let transport = HttpSimulationTransport::new(endpoint);
    let mut controller = RequestLifecycleController::new();
    controller.set_description("magnetic toothbrush");

    let first = controller.submit().expect("request issued");
    // A second trigger while the first is outstanding must not reach the wire.
    assert!(controller.submit().is_none());

    let narrative = transport.execute(&first).await.expect("simulation succeeds");
    controller.resolve_success(narrative);

    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_submissions_classify_identically() {
    let (endpoint, state) = spawn_recording_server().await;
    let transport = HttpSimulationTransport::new(endpoint);
    let mut controller = RequestLifecycleController::new();
    controller.set_description("magnetic toothbrush");

    for _ in 0..2 {
        let request = controller.submit().expect("request issued");
        match transport.execute(&request).await {
            Ok(narrative) => controller.resolve_success(narrative),
            Err(_) => controller.resolve_failure(),
        }
        assert!(matches!(controller.state(), LifecycleState::Succeeded(_)));
    }
    assert_eq!(state.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_cycle_surfaces_the_generic_message_only() {
    let endpoint =
        spawn_static_server(Router::new().route("/chat", post(handle_simulate_error))).await;
    let transport = HttpSimulationTransport::new(endpoint);
    let mut controller = RequestLifecycleController::new();
    controller.set_description("magnetic toothbrush");

    let request = controller.submit().expect("request issued");
    match transport.execute(&request).await {
        Ok(narrative) => controller.resolve_success(narrative),
        Err(_) => controller.resolve_failure(),
    }

    assert_eq!(
        controller.state(),
        &LifecycleState::Failed(GENERIC_FAILURE_MESSAGE.to_string())
    );
}
