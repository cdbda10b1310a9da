//! Fitted regression models.
//!
//! Two serialized forms are understood:
//!
//! - `gradient_boosting`: an additive tree ensemble. Each tree is a flat
//!   node array rooted at index 0; a split sends `x[feature] < threshold`
//!   left and everything else right, NaN follows `default_left`. Leaf values
//!   already include the learning rate.
//! - `linear`: `intercept + coef · x`.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A fitted function from scaled feature vector to scalar estimate.
pub trait Regressor: Send + Sync {
    /// Short name for logs and the health endpoint.
    fn kind(&self) -> &'static str;

    /// Input width the model was fitted on.
    fn n_features(&self) -> usize;

    fn predict(&self, input: &[f64]) -> Result<f64, ModelError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Structural check: non-empty, features in range, children strictly
    /// after their parent (which also rules out cycles).
    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!("node {idx} splits on feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has non-finite threshold"));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child {child}"));
                        }
                    }
                }
                Node::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("node {idx} has non-finite leaf"));
                    }
                }
            }
        }
        Ok(())
    }

    fn eval(&self, tree_idx: usize, input: &[f64]) -> Result<f64, ModelError> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in at most `nodes.len()` steps.
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx).ok_or(ModelError::InvalidNode {
                tree: tree_idx,
                node: idx,
            })?;
            match node {
                Node::Leaf { leaf } => return Ok(*leaf),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = input.get(*feature).copied().ok_or(ModelError::ShapeMismatch {
                        expected: feature + 1,
                        got: input.len(),
                    })?;
                    idx = if value.is_nan() {
                        if *default_left { *left } else { *right }
                    } else if value < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
        Err(ModelError::InvalidNode {
            tree: tree_idx,
            node: idx,
        })
    }
}

/// Additive ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl TreeEnsemble {
    pub fn check(&self) -> Result<(), String> {
        if !self.base_score.is_finite() {
            return Err("non-finite base_score".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features)
                .map_err(|reason| format!("tree {i}: {reason}"))?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, input: &[f64]) -> Result<f64, ModelError> {
        if input.len() != self.n_features {
            return Err(ModelError::ShapeMismatch {
                expected: self.n_features,
                got: input.len(),
            });
        }
        let mut sum = self.base_score;
        for (i, tree) in self.trees.iter().enumerate() {
            sum += tree.eval(i, input)?;
        }
        Ok(sum)
    }
}

/// Ordinary linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl LinearModel {
    pub fn check(&self) -> Result<(), String> {
        if self.coef.iter().chain([&self.intercept]).any(|v| !v.is_finite()) {
            return Err("non-finite coefficient".to_string());
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, input: &[f64]) -> Result<f64, ModelError> {
        if input.len() != self.coef.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.coef.len(),
                got: input.len(),
            });
        }
        Ok(self.intercept + self.coef.iter().zip(input).map(|(c, x)| c * x).sum::<f64>())
    }
}

/// A serialized model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    GradientBoosting(TreeEnsemble),
    Linear(LinearModel),
}

impl Model {
    pub fn check(&self) -> Result<(), String> {
        match self {
            Model::GradientBoosting(m) => m.check(),
            Model::Linear(m) => m.check(),
        }
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        match self {
            Model::GradientBoosting(m) => m.feature_names.as_deref(),
            Model::Linear(m) => m.feature_names.as_deref(),
        }
    }
}

impl Regressor for Model {
    fn kind(&self) -> &'static str {
        match self {
            Model::GradientBoosting(m) => m.kind(),
            Model::Linear(m) => m.kind(),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            Model::GradientBoosting(m) => m.n_features(),
            Model::Linear(m) => m.n_features(),
        }
    }

    fn predict(&self, input: &[f64]) -> Result<f64, ModelError> {
        match self {
            Model::GradientBoosting(m) => m.predict(input),
            Model::Linear(m) => m.predict(input),
        }
    }
}
