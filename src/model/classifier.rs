use super::{Classifier, check_len, tree::Tree};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const N_CLASSES: usize = 2;

fn default_classes() -> [i64; N_CLASSES] {
    [0, 1]
}

/// A fitted binary classifier, tagged by `kind` in its JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_classes")]
    pub classes: [i64; N_CLASSES],
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    #[serde(flatten)]
    pub tree: Tree,
    #[serde(default = "default_classes")]
    pub classes: [i64; N_CLASSES],
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Bagged trees; the forest's probability is the mean of its trees'.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<Tree>,
    #[serde(default = "default_classes")]
    pub classes: [i64; N_CLASSES],
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LogisticRegression {
    fn decision(&self, features: &[f64]) -> f64 {
        self.coef
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    // Split on sign so exp() never overflows to inf for large |z|.
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::DecisionTree(_) => "decision_tree",
            Self::RandomForest(_) => "random_forest",
        }
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::LogisticRegression(m) => m.feature_names.as_deref(),
            Self::DecisionTree(m) => m.feature_names.as_deref(),
            Self::RandomForest(m) => m.feature_names.as_deref(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let n_features = self.n_features();
        if n_features == 0 {
            return Err(Error::artifact(format!("{} has no features", self.kind())));
        }
        let classes = self.classes();
        if classes[0] == classes[1] {
            return Err(Error::artifact(format!(
                "{} lists class {} twice",
                self.kind(),
                classes[0]
            )));
        }

        match self {
            Self::LogisticRegression(m) => {
                if m.coef.iter().any(|w| !w.is_finite()) || !m.intercept.is_finite() {
                    return Err(Error::artifact(
                        "logistic_regression contains non-finite parameters",
                    ));
                }
            }
            Self::DecisionTree(m) => m.tree.validate(n_features, N_CLASSES)?,
            Self::RandomForest(m) => {
                if m.trees.is_empty() {
                    return Err(Error::artifact("random_forest has no trees"));
                }
                for (index, tree) in m.trees.iter().enumerate() {
                    tree.validate(n_features, N_CLASSES)
                        .map_err(|e| Error::artifact(format!("tree {index}: {e}")))?;
                }
            }
        }

        if let Some(names) = self.feature_names() {
            if names.len() != n_features {
                return Err(Error::artifact(format!(
                    "{} names {} features but expects {}",
                    self.kind(),
                    names.len(),
                    n_features
                )));
            }
        }
        Ok(())
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        match self {
            Self::LogisticRegression(m) => m.coef.len(),
            Self::DecisionTree(m) => m.n_features,
            Self::RandomForest(m) => m.n_features,
        }
    }

    fn classes(&self) -> [i64; 2] {
        match self {
            Self::LogisticRegression(m) => m.classes,
            Self::DecisionTree(m) => m.classes,
            Self::RandomForest(m) => m.classes,
        }
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
        check_len("classifier", self.n_features(), features)?;
        let proba = match self {
            Self::LogisticRegression(m) => {
                let p1 = sigmoid(m.decision(features));
                [1.0 - p1, p1]
            }
            Self::DecisionTree(m) => {
                let p = m.tree.predict_proba(features);
                [p[0], p[1]]
            }
            Self::RandomForest(m) => {
                let mut sum = [0.0; N_CLASSES];
                for tree in &m.trees {
                    for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)) {
                        *acc += p;
                    }
                }
                let n = m.trees.len() as f64;
                [sum[0] / n, sum[1] / n]
            }
        };
        Ok(proba)
    }

    fn predict(&self, features: &[f64]) -> Result<i64> {
        let classes = self.classes();
        match self {
            Self::LogisticRegression(m) => {
                check_len("classifier", self.n_features(), features)?;
                Ok(if m.decision(features) > 0.0 {
                    classes[1]
                } else {
                    classes[0]
                })
            }
            _ => {
                // Argmax over probabilities; a tie goes to the first class.
                let proba = self.predict_proba(features)?;
                Ok(if proba[1] > proba[0] {
                    classes[1]
                } else {
                    classes[0]
                })
            }
        }
    }
}
