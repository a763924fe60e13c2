use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Child index marking a leaf.
pub const LEAF: i64 = -1;

/// A fitted binary decision tree in parallel-array layout.
///
/// Node `i` is a leaf when `children_left[i] == LEAF`; otherwise a sample
/// goes left when `x[feature[i]] <= threshold[i]`. `value[i]` holds the
/// per-class weight of the training samples that reached node `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl Tree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == LEAF
    }

    /// Checks the arrays describe a well-formed tree over `n_features`
    /// columns with `n_classes` weights per leaf.
    ///
    /// Children must have a higher index than their parent, which rules out
    /// cycles so that [`Tree::leaf`] always terminates.
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(Error::artifact("tree has no nodes"));
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err(Error::artifact(format!(
                "tree arrays disagree on node count (expected {n})"
            )));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(Error::artifact(format!(
                        "node {node} has a right child but no left child"
                    )));
                }
                let weights = &self.value[node];
                if weights.len() != n_classes {
                    return Err(Error::artifact(format!(
                        "leaf {node} has {} class weights, expected {n_classes}",
                        weights.len()
                    )));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0)
                    || weights.iter().sum::<f64>() <= 0.0
                {
                    return Err(Error::artifact(format!(
                        "leaf {node} has invalid class weights {weights:?}"
                    )));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(Error::artifact(format!(
                        "node {node} has out-of-order child {child}"
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(Error::artifact(format!(
                    "node {node} splits on feature {feature}, model has {n_features}"
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(Error::artifact(format!("node {node} has a NaN threshold")));
            }
        }
        Ok(())
    }

    /// Index of the leaf `features` falls into.
    pub fn leaf(&self, features: &[f64]) -> usize {
        let mut node = 0;
        while !self.is_leaf(node) {
            let feature = self.feature[node] as usize;
            node = if features[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Class probabilities at the leaf `features` falls into.
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let weights = &self.value[self.leaf(features)];
        let total: f64 = weights.iter().sum();
        weights.iter().map(|w| w / total).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // Income <= 100 ? [9, 1] : (CCAvg <= 2.5 ? [3, 1] : [1, 4])
    fn income_tree() -> Tree {
        Tree {
            children_left: vec![1, LEAF, 3, LEAF, LEAF],
            children_right: vec![2, LEAF, 4, LEAF, LEAF],
            feature: vec![0, -2, 1, -2, -2],
            threshold: vec![100.0, -2.0, 2.5, -2.0, -2.0],
            value: vec![
                vec![13.0, 6.0],
                vec![9.0, 1.0],
                vec![4.0, 5.0],
                vec![3.0, 1.0],
                vec![1.0, 4.0],
            ],
        }
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let tree = income_tree();
        assert_eq!(tree.leaf(&[100.0, 9.0]), 1);
        assert_eq!(tree.leaf(&[100.5, 2.5]), 3);
        assert_eq!(tree.leaf(&[150.0, 3.0]), 4);
    }

    #[test]
    fn leaf_weights_are_normalised() {
        let tree = income_tree();
        assert_eq!(tree.predict_proba(&[50.0, 0.0]), vec![0.9, 0.1]);
        assert_eq!(tree.predict_proba(&[150.0, 3.0]), vec![0.2, 0.8]);
    }

    #[test]
    fn well_formed_tree_validates() {
        income_tree().validate(2, 2).unwrap();
    }

    #[test]
    fn backward_child_is_rejected() {
        let mut tree = income_tree();
        tree.children_left[2] = 0;
        assert!(tree.validate(2, 2).is_err());
    }

    #[test]
    fn split_on_unknown_feature_is_rejected() {
        assert!(income_tree().validate(1, 2).is_err());
    }

    #[test]
    fn empty_leaf_is_rejected() {
        let mut tree = income_tree();
        tree.value[1] = vec![0.0, 0.0];
        assert!(tree.validate(2, 2).is_err());
    }

    #[test]
    fn ragged_arrays_are_rejected() {
        let mut tree = income_tree();
        tree.threshold.pop();
        assert!(tree.validate(2, 2).is_err());
    }
}
