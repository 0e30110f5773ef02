//! Integration tests for the QRPG Dashboard API.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use qrpg_core::{GeneratorSettings, PasswordGenerator};
use qrpg_dashboard::{AppState, DashboardConfig, create_router};
use qrpg_hal::{
    ApiToken, Backend, DeviceInfo, HalError, HalResult, Provider, ProviderConnector, WaitOptions,
};

// ============================================================================
// Test helpers
// ============================================================================

/// Accepts one token and offers only devices too small for the circuit.
struct SmallFleetConnector;

struct SmallFleet;

#[async_trait]
impl Provider for SmallFleet {
    fn name(&self) -> &str {
        "small_fleet"
    }

    async fn devices(&self) -> HalResult<Vec<DeviceInfo>> {
        Ok(vec![DeviceInfo {
            name: "ibm_armonk".into(),
            num_qubits: 1,
            simulator: false,
            operational: true,
            pending_jobs: Some(0),
            status_msg: None,
        }])
    }

    fn backend_for(&self, device: &DeviceInfo) -> HalResult<Arc<dyn Backend>> {
        Err(HalError::BackendUnavailable(device.name.clone()))
    }
}

#[async_trait]
impl ProviderConnector for SmallFleetConnector {
    async fn connect(&self, token: &ApiToken) -> HalResult<Arc<dyn Provider>> {
        if token.expose() == "valid" {
            Ok(Arc::new(SmallFleet))
        } else {
            Err(HalError::AuthenticationFailed("token rejected".into()))
        }
    }
}

fn test_server() -> TestServer {
    let settings = GeneratorSettings {
        token_env: "QRPG_DASHBOARD_TEST_UNSET".into(),
        wait: WaitOptions::default(),
        default_seed: None,
        simulator_max_qubits: 20,
    };
    let generator = PasswordGenerator::new(Arc::new(SmallFleetConnector)).with_settings(settings);
    let state = Arc::new(AppState::new(generator, DashboardConfig::default()));
    TestServer::new(create_router(state)).expect("test server")
}

// ============================================================================
// Health, options, circuit
// ============================================================================

#[tokio::test]
async fn test_health_returns_ok() {
    let server = test_server();
    let response = server.get("/api/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn test_options() {
    let server = test_server();
    let response = server.get("/api/options").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["length"]["min"], 4);
    assert_eq!(body["length"]["max"], 12);
    assert_eq!(body["length"]["step"], 2);
    assert_eq!(body["length"]["default"], 8);
    assert_eq!(body["backends"][0]["value"], "simulator");
    assert_eq!(body["backends"][1]["value"], "ibm");
    assert_eq!(body["backends"][1]["requires_token"], true);
}

#[tokio::test]
async fn test_circuit() {
    let server = test_server();
    let response = server.get("/api/circuit").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["num_qubits"], 5);
    assert_eq!(body["num_clbits"], 5);
    assert_eq!(body["depth"], 2);
    assert!(body["diagram"].as_str().unwrap().contains("H"));
    assert!(body["qasm"].as_str().unwrap().contains("h q[4];"));
}

#[tokio::test]
async fn test_index_page() {
    let server = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("Quantum Random Password Generator"));
}

#[tokio::test]
async fn test_app_js_renders_failure_messages() {
    let server = test_server();
    let response = server.get("/app.js").await;
    response.assert_status_ok();
    let script = response.text();
    assert!(script.contains("error.messages = body.messages"));
    assert!(script.contains("renderMessages(err.messages"));
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn test_generate_with_simulator() {
    let server = test_server();
    let response = server
        .post("/api/generate")
        .json(&json!({ "backend": "simulator", "length": 10, "seed": 5 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let password = body["password"].as_str().unwrap();
    assert_eq!(password.chars().count(), 10);
    assert_eq!(body["shots"], 10);
    assert_eq!(body["backend"], "simulator");

    let total: u64 = body["histogram"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["count"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 10);
    assert!(!body["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_seeded_is_reproducible() {
    let server = test_server();
    let request = json!({ "backend": "simulator", "length": 12, "seed": 99 });

    let first: Value = server.post("/api/generate").json(&request).await.json();
    let second: Value = server.post("/api/generate").json(&request).await.json();
    assert_eq!(first["password"], second["password"]);
}

#[tokio::test]
async fn test_generate_invalid_length_returns_400() {
    let server = test_server();
    let response = server
        .post("/api/generate")
        .json(&json!({ "backend": "simulator", "length": 7 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains('7'));
}

#[tokio::test]
async fn test_generate_malformed_body_returns_400() {
    let server = test_server();
    let response = server
        .post("/api/generate")
        .json(&json!({ "backend": "quantum-annealer" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_remote_without_token_returns_400() {
    let server = test_server();
    let response = server
        .post("/api/generate")
        .json(&json!({ "backend": "ibm", "length": 8 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_remote_bad_token_returns_401() {
    let server = test_server();
    let response = server
        .post("/api/generate")
        .json(&json!({ "backend": "ibm", "token": "expired", "length": 8 }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"], "credential_error");
    assert!(body.get("messages").is_none());
}

#[tokio::test]
async fn test_generate_remote_no_eligible_device_returns_503() {
    let server = test_server();
    let response = server
        .post("/api/generate")
        .json(&json!({ "backend": "ibm", "token": "valid", "length": 8 }))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json();
    assert_eq!(body["error"], "no_eligible_backend");
    assert_eq!(body["messages"], json!(["Account loaded"]));

    // The server keeps serving after a failed run.
    server.get("/api/health").await.assert_status_ok();
}
