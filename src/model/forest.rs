//! Multi-output Random Forest
//!
//! Evaluates the irrigation classifier from its JSON artifact: one forest of
//! CART trees per sprinkler. Each tree routes a row to a leaf holding
//! per-class weights; the forest averages the normalised leaf distributions
//! and predicts the class with the highest mean probability.
//!
//! ## Artifact layout
//!
//! ```json
//! {
//!   "n_features": 20,
//!   "outputs": [
//!     { "classes": [0.0, 1.0],
//!       "trees": [ { "nodes": [
//!           { "feature": 3, "threshold": 0.41, "left": 1, "right": 2 },
//!           { "value": [12.0, 3.0] },
//!           { "value": [1.0, 9.0] } ] } ] }
//!   ]
//! }
//! ```

use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{Classifier, Label};
use crate::utils::error::{IrrigationError, Result};

/// A node of a decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else to `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights (sample counts or fractions)
    Leaf { value: Vec<f64> },
}

/// A single decision tree, nodes stored root-first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Follow the splits from the root and return the leaf weights
    fn leaf_for(&self, row: ArrayView1<'_, f64>) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but the model has {} features",
                            i, feature, n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", i));
                    }
                    // Children must point forward so traversal always terminates.
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child index {}", i, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {} has {} class weights, expected {}",
                            i,
                            value.len(),
                            n_classes
                        ));
                    }
                    let total: f64 = value.iter().sum();
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) || total <= 0.0 {
                        return Err(format!("leaf {} has invalid class weights", i));
                    }
                }
            }
        }

        Ok(())
    }
}

/// The forest responsible for one sprinkler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputForest {
    /// Class labels, in the order of the leaf weights
    pub classes: Vec<Label>,
    pub trees: Vec<Tree>,
}

impl OutputForest {
    /// Mean class probabilities over all trees
    fn probabilities(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        let mut probs = vec![0.0; self.classes.len()];

        for tree in &self.trees {
            let leaf = tree.leaf_for(row);
            let total: f64 = leaf.iter().sum();
            for (p, w) in probs.iter_mut().zip(leaf) {
                *p += w / total;
            }
        }

        let n = self.trees.len() as f64;
        probs.iter_mut().for_each(|p| *p /= n);
        probs
    }

    /// Predicted label: the class with the highest mean probability,
    /// the earliest class winning ties
    fn predict_row(&self, row: ArrayView1<'_, f64>) -> Label {
        let probs = self.probabilities(row);
        let mut best = 0;
        for (i, &p) in probs.iter().enumerate().skip(1) {
            if p > probs[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

/// Multi-output forest classifier loaded from a JSON artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub outputs: Vec<OutputForest>,
}

impl ForestModel {
    /// Parse and validate an artifact from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: ForestModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load and validate an artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Save the artifact as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check the structural invariants the evaluator relies on
    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(IrrigationError::Serialization(
                "n_features must be greater than 0".to_string(),
            ));
        }
        if self.outputs.is_empty() {
            return Err(IrrigationError::Serialization(
                "model has no outputs".to_string(),
            ));
        }

        for (o, output) in self.outputs.iter().enumerate() {
            if output.classes.is_empty() {
                return Err(IrrigationError::Serialization(format!(
                    "output {} has no classes",
                    o
                )));
            }
            if output.trees.is_empty() {
                return Err(IrrigationError::Serialization(format!(
                    "output {} has no trees",
                    o
                )));
            }
            for (t, tree) in output.trees.iter().enumerate() {
                tree.validate(self.n_features, output.classes.len())
                    .map_err(|e| {
                        IrrigationError::Serialization(format!("output {} tree {}: {}", o, t, e))
                    })?;
            }
        }

        Ok(())
    }

    /// Total number of trees across all outputs
    pub fn tree_count(&self) -> usize {
        self.outputs.iter().map(|o| o.trees.len()).sum()
    }

    /// Total number of nodes across all trees
    pub fn node_count(&self) -> usize {
        self.outputs
            .iter()
            .flat_map(|o| &o.trees)
            .map(|t| t.nodes.len())
            .sum()
    }
}

impl Classifier for ForestModel {
    fn input_width(&self) -> usize {
        self.n_features
    }

    fn output_width(&self) -> usize {
        self.outputs.len()
    }

    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Array2<Label>> {
        // Fields are public, so a model may reach here without passing through `load`.
        self.validate()
            .map_err(|e| IrrigationError::Inference(format!("malformed model: {}", e)))?;

        if batch.ncols() != self.n_features {
            return Err(IrrigationError::InvalidInput(format!(
                "batch has {} columns, model expects {}",
                batch.ncols(),
                self.n_features
            )));
        }

        let mut out = Array2::zeros((batch.nrows(), self.outputs.len()));
        for (r, row) in batch.rows().into_iter().enumerate() {
            for (o, forest) in self.outputs.iter().enumerate() {
                out[[r, o]] = forest.predict_row(row);
            }
        }

        Ok(out)
    }

    fn describe(&self) -> String {
        format!(
            "random forest ({} inputs -> {} outputs, {} trees)",
            self.n_features,
            self.outputs.len(),
            self.tree_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::TempDir;

    /// Stump on `feature`: ON when the reading is above `threshold`
    fn stump(feature: usize, threshold: f64) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    value: vec![10.0, 0.0],
                },
                TreeNode::Leaf {
                    value: vec![0.0, 10.0],
                },
            ],
        }
    }

    fn two_output_model() -> ForestModel {
        ForestModel {
            n_features: 3,
            outputs: vec![
                OutputForest {
                    classes: vec![0.0, 1.0],
                    trees: vec![stump(0, 0.5)],
                },
                OutputForest {
                    classes: vec![0.0, 1.0],
                    trees: vec![stump(2, 0.2), stump(1, 0.8), stump(2, 0.9)],
                },
            ],
        }
    }

    #[test]
    fn test_split_goes_left_on_equal() {
        let model = two_output_model();
        let out = model.predict(array![[0.5, 0.0, 0.0]].view()).unwrap();
        assert_eq!(out[[0, 0]], 0.0);

        let out = model.predict(array![[0.51, 0.0, 0.0]].view()).unwrap();
        assert_eq!(out[[0, 0]], 1.0);
    }

    #[test]
    fn test_forest_majority() {
        let model = two_output_model();

        // feature 2 = 0.5: first stump ON, third OFF; feature 1 = 0.9 makes the second ON
        let out = model.predict(array![[0.0, 0.9, 0.5]].view()).unwrap();
        assert_eq!(out[[0, 1]], 1.0);

        // feature 1 = 0.1 flips the second stump OFF: two of three say OFF
        let out = model.predict(array![[0.0, 0.1, 0.5]].view()).unwrap();
        assert_eq!(out[[0, 1]], 0.0);
    }

    #[test]
    fn test_leaf_weights_are_normalised() {
        // A tree with a large leaf count must not outvote two confident trees.
        let heavy = Tree {
            nodes: vec![TreeNode::Leaf {
                value: vec![1000.0, 1.0],
            }],
        };
        let light = Tree {
            nodes: vec![TreeNode::Leaf {
                value: vec![0.0, 1.0],
            }],
        };
        let model = ForestModel {
            n_features: 1,
            outputs: vec![OutputForest {
                classes: vec![0.0, 1.0],
                trees: vec![heavy, light.clone(), light],
            }],
        };

        let out = model.predict(array![[0.3]].view()).unwrap();
        assert_eq!(out[[0, 0]], 1.0);
    }

    #[test]
    fn test_tie_picks_first_class() {
        let model = ForestModel {
            n_features: 1,
            outputs: vec![OutputForest {
                classes: vec![0.0, 1.0],
                trees: vec![Tree {
                    nodes: vec![TreeNode::Leaf {
                        value: vec![5.0, 5.0],
                    }],
                }],
            }],
        };
        let out = model.predict(array![[0.3]].view()).unwrap();
        assert_eq!(out[[0, 0]], 0.0);
    }

    #[test]
    fn test_batch_shape() {
        let model = two_output_model();
        let out = model
            .predict(array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]].view())
            .unwrap();
        assert_eq!(out.dim(), (2, 2));
        assert_eq!(out.row(1).to_vec(), vec![1.0, 1.0]);

        assert!(model.predict(array![[0.0, 0.0]].view()).is_err());
    }

    #[test]
    fn test_json_parsing() {
        let json = r#"{
            "n_features": 2,
            "outputs": [
                { "classes": [0.0, 1.0],
                  "trees": [ { "nodes": [
                      { "feature": 1, "threshold": 0.4, "left": 1, "right": 2 },
                      { "value": [3.0, 1.0] },
                      { "value": [0.0, 4.0] } ] } ] }
            ]
        }"#;

        let model = ForestModel::from_json_str(json).unwrap();
        assert_eq!(model.input_width(), 2);
        assert_eq!(model.output_width(), 1);
        assert_eq!(model.tree_count(), 1);
        assert_eq!(model.node_count(), 3);
        assert!(model.describe().contains("1 trees"));
    }

    #[test]
    fn test_validation_rejects_backward_child() {
        let json = r#"{
            "n_features": 1,
            "outputs": [ { "classes": [0.0, 1.0], "trees": [ { "nodes": [
                { "feature": 0, "threshold": 0.5, "left": 0, "right": 1 },
                { "value": [1.0, 0.0] } ] } ] } ]
        }"#;
        let err = ForestModel::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("invalid child index"));
    }

    #[test]
    fn test_unvalidated_model_refuses_to_predict() {
        let row = array![[0.0, 0.0, 0.0]];

        // Self-loop would never reach a leaf.
        let mut model = two_output_model();
        model.outputs[0].trees[0].nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 0.5,
            left: 0,
            right: 0,
        };
        let err = model.predict(row.view()).unwrap_err();
        assert!(matches!(err, IrrigationError::Inference(_)));

        let mut model = two_output_model();
        model.outputs[1].classes.clear();
        assert!(matches!(
            model.predict(row.view()),
            Err(IrrigationError::Inference(_))
        ));

        let mut model = two_output_model();
        model.outputs[0].trees.clear();
        assert!(matches!(
            model.predict(row.view()),
            Err(IrrigationError::Inference(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_feature_and_leaf() {
        let mut model = two_output_model();
        model.n_features = 2;
        assert!(model.validate().is_err());

        let mut model = two_output_model();
        model.outputs[0].trees[0].nodes[1] = TreeNode::Leaf { value: vec![1.0] };
        assert!(model.validate().is_err());

        let mut model = two_output_model();
        model.outputs[1].trees.clear();
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_save_load() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("forest.json");

        let original = two_output_model();
        original.save(&path)?;
        let loaded = ForestModel::load(&path)?;

        assert_eq!(loaded, original);
        Ok(())
    }

    #[test]
    fn test_load_garbage_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("forest.json");
        std::fs::write(&path, b"\x80\x04\x95 not json").unwrap();

        assert!(ForestModel::load(&path).is_err());
    }
}
