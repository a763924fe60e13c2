//! Fitted scaler and classifier artifacts.
//!
//! Both are plain JSON documents carrying the parameters a training pipeline
//! exports; this crate only evaluates them.

mod classifier;
mod scaler;
pub mod tree;

pub use classifier::{ClassifierArtifact, DecisionTree, LogisticRegression, RandomForest};
pub use scaler::{MinMaxScaler, ScalerArtifact, StandardScaler};

use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// A fitted transform from raw feature values to the model's input space.
pub trait FeatureScaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// A fitted binary classifier.
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    /// Class labels, in the column order of [`Classifier::predict_proba`].
    fn classes(&self) -> [i64; 2];

    fn predict(&self, features: &[f64]) -> Result<i64>;

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]>;
}

pub(crate) fn check_len(stage: &'static str, expected: usize, features: &[f64]) -> Result<()> {
    if features.len() != expected {
        return Err(Error::shape_mismatch(stage, expected, features.len()));
    }
    Ok(())
}

pub async fn load_scaler(path: impl AsRef<Path>) -> Result<ScalerArtifact> {
    let path = path.as_ref();
    debug!("Loading scaler from: {}", path.display());

    let raw = tokio::fs::read_to_string(path).await?;
    let scaler: ScalerArtifact = serde_json::from_str(&raw)?;
    scaler.validate()?;

    info!(
        "Loaded {} scaler over {} features",
        scaler.kind(),
        scaler.n_features()
    );
    Ok(scaler)
}

pub async fn load_classifier(path: impl AsRef<Path>) -> Result<ClassifierArtifact> {
    let path = path.as_ref();
    debug!("Loading classifier from: {}", path.display());

    let raw = tokio::fs::read_to_string(path).await?;
    let classifier: ClassifierArtifact = serde_json::from_str(&raw)?;
    classifier.validate()?;

    info!(
        "Loaded {} classifier over {} features",
        classifier.kind(),
        classifier.n_features()
    );
    Ok(classifier)
}

/// Compares column names recorded in an artifact against the expected
/// order. Artifacts without names are accepted as-is.
pub fn check_feature_names(
    artifact: &str,
    names: Option<&[String]>,
    expected: &[&str],
) -> Result<()> {
    let Some(names) = names else {
        debug!("{} carries no feature names, skipping order check", artifact);
        return Ok(());
    };
    if names.len() != expected.len() {
        return Err(Error::artifact(format!(
            "{} was fitted on {} columns, expected {}",
            artifact,
            names.len(),
            expected.len()
        )));
    }
    if let Some((index, (got, want))) = names
        .iter()
        .zip(expected)
        .enumerate()
        .find(|(_, (got, want))| got.as_str() != **want)
    {
        return Err(Error::artifact(format!(
            "{artifact} column {index} is '{got}', expected '{want}'"
        )));
    }
    Ok(())
}
