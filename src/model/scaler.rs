use super::{FeatureScaler, check_len};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A fitted scaler, tagged by `kind` in its JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

/// Standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Range scaling: `x * scale + min`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl ScalerArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Standard(_) => "standard",
            Self::MinMax(_) => "min_max",
        }
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Standard(s) => s.feature_names.as_deref(),
            Self::MinMax(s) => s.feature_names.as_deref(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (offsets, scales) = match self {
            Self::Standard(s) => (&s.mean, &s.scale),
            Self::MinMax(s) => (&s.min, &s.scale),
        };
        if offsets.is_empty() {
            return Err(Error::artifact(format!("{} scaler has no features", self.kind())));
        }
        if offsets.len() != scales.len() {
            return Err(Error::artifact(format!(
                "{} scaler has {} offsets but {} scales",
                self.kind(),
                offsets.len(),
                scales.len()
            )));
        }
        if offsets.iter().chain(scales).any(|v| !v.is_finite()) {
            return Err(Error::artifact(format!(
                "{} scaler contains non-finite parameters",
                self.kind()
            )));
        }
        if let Some(names) = self.feature_names() {
            if names.len() != offsets.len() {
                return Err(Error::artifact(format!(
                    "{} scaler names {} features but has {} parameters",
                    self.kind(),
                    names.len(),
                    offsets.len()
                )));
            }
        }
        Ok(())
    }
}

impl FeatureScaler for ScalerArtifact {
    fn n_features(&self) -> usize {
        match self {
            Self::Standard(s) => s.mean.len(),
            Self::MinMax(s) => s.min.len(),
        }
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_len("scaler", self.n_features(), features)?;
        let scaled = match self {
            Self::Standard(s) => features
                .iter()
                .zip(s.mean.iter().zip(&s.scale))
                // A constant column is fitted with a zero scale; leave it centred.
                .map(|(x, (mean, scale))| {
                    let scale = if *scale == 0.0 { 1.0 } else { *scale };
                    (x - mean) / scale
                })
                .collect(),
            Self::MinMax(s) => features
                .iter()
                .zip(s.scale.iter().zip(&s.min))
                .map(|(x, (scale, min))| x * scale + min)
                .collect(),
        };
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn standard(mean: Vec<f64>, scale: Vec<f64>) -> ScalerArtifact {
        ScalerArtifact::Standard(StandardScaler {
            mean,
            scale,
            feature_names: None,
        })
    }

    #[test]
    fn standard_centres_and_scales() {
        let scaler = standard(vec![10.0, 0.0], vec![2.0, 0.5]);
        assert_eq!(scaler.transform(&[14.0, 1.0]).unwrap(), vec![2.0, 2.0]);
    }

    #[test]
    fn zero_scale_only_centres() {
        let scaler = standard(vec![3.0], vec![0.0]);
        assert_eq!(scaler.transform(&[5.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn min_max_applies_scale_then_offset() {
        let scaler = ScalerArtifact::MinMax(MinMaxScaler {
            min: vec![-1.0, 0.0],
            scale: vec![0.1, 2.0],
            feature_names: None,
        });
        assert_eq!(scaler.transform(&[20.0, 0.25]).unwrap(), vec![1.0, 0.5]);
    }

    #[test]
    fn wrong_width_is_a_shape_mismatch() {
        let scaler = standard(vec![0.0; 3], vec![1.0; 3]);
        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn mismatched_parameter_lengths_fail_validation() {
        assert!(standard(vec![0.0; 3], vec![1.0; 2]).validate().is_err());
        assert!(standard(vec![], vec![]).validate().is_err());
        assert!(standard(vec![f64::NAN], vec![1.0]).validate().is_err());
    }

    #[test]
    fn deserializes_from_tagged_json() {
        let scaler: ScalerArtifact = serde_json::from_str(
            r#"{"kind":"standard","mean":[1.0],"scale":[2.0],"feature_names":["Age"]}"#,
        )
        .unwrap();
        assert_eq!(scaler.kind(), "standard");
        assert_eq!(scaler.feature_names(), Some(&["Age".to_string()][..]));
        scaler.validate().unwrap();
    }
}
