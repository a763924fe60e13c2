use crate::{
    Error, Result,
    config::{LabelsConfig, ModelConfig},
    features::{FEATURE_COUNT, FEATURE_NAMES, PredictionRequest},
    model::{self, Classifier, FeatureScaler},
};
use serde::{Deserialize, Serialize};
use std::{env, sync::Arc};
use tracing::{debug, error, info, warn};

/// Body returned for every prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Success {
        #[serde(rename = "Prediction")]
        prediction: String,
        #[serde(rename = "Probability")]
        probability: String,
    },
    Failure {
        #[serde(rename = "Error")]
        error: String,
    },
}

impl PredictionResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Outcome of one successful inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: i64,
    pub label: String,
    /// Probability of the positive class, in `[0, 1]`.
    pub probability: f64,
}

impl Prediction {
    /// Positive-class probability with two decimals, e.g. `"0.87"`.
    pub fn probability_text(&self) -> String {
        format!("{:.2}", self.probability)
    }
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self::Success {
            probability: prediction.probability_text(),
            prediction: prediction.label,
        }
    }
}

/// A scaler and classifier pair ready to serve predictions.
pub struct Predictor {
    scaler: Box<dyn FeatureScaler>,
    classifier: Box<dyn Classifier>,
    labels: LabelsConfig,
}

impl Predictor {
    pub fn new(
        scaler: impl FeatureScaler + 'static,
        classifier: impl Classifier + 'static,
        labels: LabelsConfig,
    ) -> Self {
        // Widths are rechecked on every call; a mismatch here only means every
        // request will fail, which is worth saying once up front.
        if scaler.n_features() != FEATURE_COUNT || classifier.n_features() != FEATURE_COUNT {
            warn!(
                "Artifacts expect {} (scaler) and {} (classifier) features, requests carry {}",
                scaler.n_features(),
                classifier.n_features(),
                FEATURE_COUNT
            );
        }
        Self {
            scaler: Box::new(scaler),
            classifier: Box::new(classifier),
            labels,
        }
    }

    /// Reads both artifacts and checks any recorded column names against
    /// [`FEATURE_NAMES`].
    pub async fn load(model_config: &ModelConfig, labels: LabelsConfig) -> Result<Self> {
        let scaler = model::load_scaler(&model_config.scaler_path).await?;
        model::check_feature_names("scaler", scaler.feature_names(), &FEATURE_NAMES)?;

        let classifier = model::load_classifier(&model_config.model_path).await?;
        model::check_feature_names("model", classifier.feature_names(), &FEATURE_NAMES)?;

        Ok(Self::new(scaler, classifier, labels))
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let features = request.to_features();
        if let Some(index) = features.iter().position(|v| !v.is_finite()) {
            return Err(Error::invalid_input(format!(
                "{} must be a finite number",
                FEATURE_NAMES[index]
            )));
        }

        let scaled = self.scaler.transform(&features)?;
        // Finite inputs can still overflow, e.g. a huge value over a scale below 1.
        if let Some(index) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(Error::invalid_input(format!(
                "{} is out of range after scaling",
                FEATURE_NAMES[index]
            )));
        }

        let proba = self.classifier.predict_proba(&scaled)?;
        if !proba[1].is_finite() {
            return Err(Error::internal(format!(
                "classifier produced a non-finite probability ({})",
                proba[1]
            )));
        }
        let class = self.classifier.predict(&scaled)?;

        let label = if class == 1 {
            &self.labels.positive
        } else {
            &self.labels.negative
        };
        Ok(Prediction {
            class,
            label: label.clone(),
            probability: proba[1].clamp(0.0, 1.0),
        })
    }
}

/// Process-wide inference state: either a loaded predictor, or the message
/// every request receives because loading failed.
#[derive(Clone)]
pub struct LoanModel {
    state: Arc<std::result::Result<Predictor, String>>,
}

impl LoanModel {
    pub fn ready(predictor: Predictor) -> Self {
        Self {
            state: Arc::new(Ok(predictor)),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Err(message.into())),
        }
    }

    /// Loads the artifacts named by `model_config`, with `MODEL_PATH` and
    /// `SCALER_PATH` taking precedence. Never fails: a load error is kept
    /// and served in place of predictions.
    pub async fn load(model_config: &ModelConfig, labels: LabelsConfig) -> Self {
        let model_config = ModelConfig {
            model_path: env::var("MODEL_PATH").unwrap_or_else(|_| model_config.model_path.clone()),
            scaler_path: env::var("SCALER_PATH")
                .unwrap_or_else(|_| model_config.scaler_path.clone()),
        };

        match Predictor::load(&model_config, labels).await {
            Ok(predictor) => {
                info!(
                    "Model ready (model: {}, scaler: {})",
                    model_config.model_path, model_config.scaler_path
                );
                Self::ready(predictor)
            }
            Err(e) => {
                error!("Failed to load model or scaler: {}", e);
                Self::unavailable(format!("❌ Error loading model or scaler: {e}"))
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ok()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.state.as_ref().as_ref().err().map(String::as_str)
    }

    pub fn respond(&self, request: &PredictionRequest) -> PredictionResponse {
        let predictor = match self.state.as_ref() {
            Ok(predictor) => predictor,
            Err(message) => return PredictionResponse::failure(message.clone()),
        };
        match predictor.predict(request) {
            Ok(prediction) => {
                debug!(
                    "Predicted class {} with probability {:.4}",
                    prediction.class, prediction.probability
                );
                prediction.into()
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                PredictionResponse::failure(e.to_string())
            }
        }
    }
}
