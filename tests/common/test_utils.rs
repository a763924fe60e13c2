#![allow(dead_code)]

use axum::{Router, body::Body, http::Request, response::Response};
use loan_predictor::{
    config::{LabelsConfig, ModelConfig},
    predictor::LoanModel,
    server,
};
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

/// Standard scaler fitted on the eleven loan columns.
pub const SCALER_JSON: &str = r#"{
  "kind": "standard",
  "mean": [45.0, 20.0, 70.0, 2.5, 2.0, 2.0, 50.0, 0.1, 0.05, 0.6, 0.3],
  "scale": [10.0, 10.0, 40.0, 1.0, 2.0, 1.0, 100.0, 0.3, 0.25, 0.5, 0.5],
  "feature_names": ["Age", "Experience", "Income", "Family", "CCAvg", "Education",
                    "Mortgage", "Securities", "CD", "Online", "CreditCard"]
}"#;

/// Logistic regression over the scaled columns.
pub const MODEL_JSON: &str = r#"{
  "kind": "logistic_regression",
  "coef": [0.1, -0.1, 2.5, 0.8, 0.3, 1.2, 0.1, -0.2, 0.9, -0.1, -0.3],
  "intercept": -4.0,
  "classes": [0, 1],
  "feature_names": ["Age", "Experience", "Income", "Family", "CCAvg", "Education",
                    "Mortgage", "Securities", "CD", "Online", "CreditCard"]
}"#;

/// Logistic regression that ignores Age.
pub const ZERO_AGE_MODEL_JSON: &str = r#"{
  "kind": "logistic_regression",
  "coef": [0.0, -0.1, 2.5, 0.8, 0.3, 1.2, 0.1, -0.2, 0.9, -0.1, -0.3],
  "intercept": -4.0
}"#;

/// Scaler fitted on one column too few, without names to catch it at load.
pub const NARROW_SCALER_JSON: &str = r#"{
  "kind": "standard",
  "mean": [45.0, 20.0, 70.0, 2.5, 2.0, 2.0, 50.0, 0.1, 0.05, 0.6],
  "scale": [10.0, 10.0, 40.0, 1.0, 2.0, 1.0, 100.0, 0.3, 0.25, 0.5]
}"#;

pub const NEGATIVE_LABEL: &str = "❌ Will Not Take Loan";
pub const POSITIVE_LABEL: &str = "✅ Will Take Loan";
pub const LOAD_ERROR_PREFIX: &str = "❌ Error loading model or scaler:";

/// Writes the artifacts into `dir` and returns a config pointing at them.
pub async fn write_artifacts(dir: &TempDir, scaler: &str, model: &str) -> ModelConfig {
    let scaler_path = dir.path().join("scaler.json");
    let model_path = dir.path().join("loan_model.json");
    tokio::fs::write(&scaler_path, scaler).await.unwrap();
    tokio::fs::write(&model_path, model).await.unwrap();
    ModelConfig {
        model_path: model_path.to_string_lossy().to_string(),
        scaler_path: scaler_path.to_string_lossy().to_string(),
    }
}

pub async fn create_app_with(scaler: &str, model: &str) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let model_config = write_artifacts(&temp_dir, scaler, model).await;
    let model = LoanModel::load(&model_config, LabelsConfig::default()).await;
    (server::router(model), temp_dir)
}

/// Router backed by the fixture scaler and model.
pub async fn create_test_app() -> (Router, TempDir) {
    create_app_with(SCALER_JSON, MODEL_JSON).await
}

/// Router whose artifacts point at files that do not exist.
pub async fn create_unloaded_app() -> Router {
    let model_config = ModelConfig {
        model_path: Path::new("does-not-exist").join("loan_model.json").to_string_lossy().to_string(),
        scaler_path: Path::new("does-not-exist").join("scaler.json").to_string_lossy().to_string(),
    };
    server::router(LoanModel::load(&model_config, LabelsConfig::default()).await)
}

/// Age=35, Experience=10, Income=80, Family=2, CCAvg=1.5, Education=2,
/// Mortgage=0, Online only.
pub fn sample_request() -> Value {
    json!({
        "Age": 35, "Experience": 10, "Income": 80, "Family": 2, "CCAvg": 1.5,
        "Education": 2, "Mortgage": 0,
        "Securities": false, "CD": false, "Online": true, "CreditCard": false
    })
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn read_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8080
  logs:
    level: "debug"

model:
  model_path: "artifacts/loan_model.json"
  scaler_path: "artifacts/scaler.json"

labels:
  positive: "approve"
  negative: "decline"
"#;
