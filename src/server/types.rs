use serde::{Deserialize, Serialize};

pub use crate::features::PredictionRequest;
pub use crate::predictor::PredictionResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
