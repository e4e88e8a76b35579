//! Decision-tree ensembles exported as JSON
//!
//! Each file holds one ensemble:
//!
//! ```json
//! {
//!   "kind": "random_forest_regressor",
//!   "n_features": 8,
//!   "max_depth": 12,
//!   "feature_importances": [0.31, 0.22, ...],
//!   "trees": [{ "nodes": [
//!     { "feature": 3, "threshold": 7.5, "left": 1, "right": 2 },
//!     { "value": [1.8] },
//!     { "value": [4.2] }
//!   ]}]
//! }
//! ```
//!
//! Nodes without children are leaves. A sample goes left when
//! `x[feature] <= threshold`. Gradient boosting adds `init` and
//! `learning_rate`; classifier leaves hold per-class weights.

use serde::Deserialize;
use std::path::Path;

/// Length of the feature vector every model is trained on
pub const FEATURE_COUNT: usize = 8;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "word_count",
    "complexity_keywords",
    "agent_count",
    "step_count",
    "historical_avg_time",
    "confidence_score",
    "workflow_age_days",
    "agent_performance",
];

#[derive(Debug, thiserror::Error)]
pub enum EnsembleError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid ensemble: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleKind {
    RandomForestRegressor,
    GradientBoostingRegressor,
    RandomForestClassifier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    #[serde(default)]
    pub value: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walk from the root to the leaf for `x`
    ///
    /// Trees are checked by [`Ensemble::validate`], so every index is in range
    /// and each split names a known feature.
    fn leaf(&self, x: &[f64]) -> &Node {
        let mut node = &self.nodes[0];
        while let (Some(feature), Some(left), Some(right)) = (node.feature, node.left, node.right) {
            node = if x[feature] <= node.threshold {
                &self.nodes[left]
            } else {
                &self.nodes[right]
            };
        }
        node
    }

    fn validate(&self, n_features: usize, index: usize) -> Result<(), EnsembleError> {
        if self.nodes.is_empty() {
            return Err(EnsembleError::Invalid(format!("tree {} has no nodes", index)));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match (node.feature, node.left, node.right) {
                (Some(feature), Some(left), Some(right)) => {
                    if feature >= n_features {
                        return Err(EnsembleError::Invalid(format!(
                            "tree {} node {} splits on feature {}",
                            index, i, feature
                        )));
                    }
                    // Children must come after their parent, which also rules out cycles
                    if left <= i || right <= i || left >= self.nodes.len() || right >= self.nodes.len() {
                        return Err(EnsembleError::Invalid(format!(
                            "tree {} node {} has out-of-order children",
                            index, i
                        )));
                    }
                }
                (None, None, None) if !node.value.is_empty() => {}
                _ => {
                    return Err(EnsembleError::Invalid(format!(
                        "tree {} node {} is neither a split nor a leaf",
                        index, i
                    )))
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ensemble {
    pub kind: EnsembleKind,
    pub n_features: usize,
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default)]
    pub learning_rate: f64,
    #[serde(default)]
    pub init: f64,
    #[serde(default)]
    pub feature_importances: Vec<f64>,
    pub trees: Vec<Tree>,
}

impl Ensemble {
    pub fn load(path: &Path) -> Result<Self, EnsembleError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| EnsembleError::Io {
            path: display.clone(),
            source,
        })?;
        let ensemble: Ensemble =
            serde_json::from_str(&raw).map_err(|source| EnsembleError::Parse { path: display, source })?;
        ensemble.validate()?;
        Ok(ensemble)
    }

    pub fn validate(&self) -> Result<(), EnsembleError> {
        if self.n_features != FEATURE_COUNT {
            return Err(EnsembleError::Invalid(format!(
                "expected {} features, found {}",
                FEATURE_COUNT, self.n_features
            )));
        }
        if self.trees.is_empty() {
            return Err(EnsembleError::Invalid("no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, i)?;
        }
        Ok(())
    }

    /// Regression output
    ///
    /// Forests average their trees; boosting sums them onto `init`.
    pub fn predict(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let leaf_values = self.trees.iter().map(|tree| tree.leaf(x).value[0]);
        match self.kind {
            EnsembleKind::GradientBoostingRegressor => {
                self.init + self.learning_rate * leaf_values.sum::<f64>()
            }
            _ => leaf_values.sum::<f64>() / self.trees.len() as f64,
        }
    }

    /// Mean per-class probability across trees
    ///
    /// Leaf weights may be raw sample counts, so each leaf is normalized first.
    pub fn predict_proba(&self, x: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        let n_classes = self.n_classes();
        let mut totals = vec![0.0; n_classes];

        for tree in &self.trees {
            let leaf = &tree.leaf(x).value;
            let weight: f64 = leaf.iter().sum();
            if weight <= 0.0 {
                continue;
            }
            for (total, v) in totals.iter_mut().zip(leaf) {
                *total += v / weight;
            }
        }

        let trees = self.trees.len() as f64;
        totals.into_iter().map(|t| t / trees).collect()
    }

    pub fn n_classes(&self) -> usize {
        self.trees
            .iter()
            .flat_map(|tree| tree.nodes.iter())
            .map(|node| node.value.len())
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(|tree| tree.nodes.len()).sum()
    }

    /// Feature name to importance, when the export carries them
    pub fn importances(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES
            .iter()
            .copied()
            .zip(self.feature_importances.iter().copied())
            .collect()
    }

    pub fn importance_of(&self, feature: &str) -> f64 {
        self.importances()
            .into_iter()
            .find(|(name, _)| *name == feature)
            .map(|(_, value)| value)
            .unwrap_or(0.0)
    }
}

/// The three ensembles behind the trained prediction path
#[derive(Debug, Clone)]
pub struct TrainedModels {
    pub time_rf: Ensemble,
    pub time_gb: Ensemble,
    pub success_clf: Ensemble,
}

impl TrainedModels {
    pub fn load(dir: &Path) -> Result<Self, EnsembleError> {
        let models = Self {
            time_rf: Ensemble::load(&dir.join("time_rf.json"))?,
            time_gb: Ensemble::load(&dir.join("time_gb.json"))?,
            success_clf: Ensemble::load(&dir.join("success_clf.json"))?,
        };

        let kinds = [
            (&models.time_rf, EnsembleKind::RandomForestRegressor),
            (&models.time_gb, EnsembleKind::GradientBoostingRegressor),
            (&models.success_clf, EnsembleKind::RandomForestClassifier),
        ];
        for (ensemble, expected) in kinds {
            if ensemble.kind != expected {
                return Err(EnsembleError::Invalid(format!(
                    "expected {:?}, found {:?}",
                    expected, ensemble.kind
                )));
            }
        }

        Ok(models)
    }

    pub fn total_trees(&self) -> usize {
        self.time_rf.trees.len() + self.time_gb.trees.len() + self.success_clf.trees.len()
    }

    pub fn total_nodes(&self) -> usize {
        self.time_rf.node_count() + self.time_gb.node_count() + self.success_clf.node_count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    /// Two stumps splitting on step_count at 5
    pub fn stump(kind: &str, low: serde_json::Value, high: serde_json::Value) -> serde_json::Value {
        let tree = json!({ "nodes": [
            { "feature": 3, "threshold": 5.0, "left": 1, "right": 2 },
            { "value": low },
            { "value": high },
        ]});
        json!({
            "kind": kind,
            "n_features": 8,
            "max_depth": 1,
            "learning_rate": 0.5,
            "init": 1.0,
            "feature_importances": [0.1, 0.2, 0.1, 0.4, 0.1, 0.05, 0.03, 0.02],
            "trees": [tree.clone(), tree],
        })
    }

    pub fn trained() -> TrainedModels {
        let parse = |value: serde_json::Value| -> Ensemble { serde_json::from_value(value).unwrap() };
        TrainedModels {
            time_rf: parse(stump("random_forest_regressor", json!([2.0]), json!([6.0]))),
            time_gb: parse(stump("gradient_boosting_regressor", json!([0.5]), json!([3.0]))),
            success_clf: parse(stump("random_forest_classifier", json!([10.0, 30.0]), json!([3.0, 1.0]))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{stump, trained};
    use super::*;
    use serde_json::json;

    fn features(steps: f64) -> [f64; FEATURE_COUNT] {
        [10.0, 1.0, 2.0, steps, 2.0, 0.8, 30.0, 0.85]
    }

    #[test]
    fn test_forest_averages_and_boosting_sums() {
        let models = trained();
        assert_eq!(models.time_rf.predict(&features(3.0)), 2.0);
        assert_eq!(models.time_rf.predict(&features(8.0)), 6.0);
        // 1.0 + 0.5 * (3.0 + 3.0)
        assert_eq!(models.time_gb.predict(&features(8.0)), 4.0);
    }

    #[test]
    fn test_classifier_normalizes_leaf_counts() {
        let proba = trained().success_clf.predict_proba(&features(3.0));
        assert_eq!(proba, vec![0.25, 0.75]);
        assert_eq!(trained().success_clf.n_classes(), 2);
    }

    #[test]
    fn test_validation_rejects_bad_trees() {
        let mut value = stump("random_forest_regressor", json!([1.0]), json!([2.0]));
        value["trees"][0]["nodes"][0]["left"] = json!(0);
        let ensemble: Ensemble = serde_json::from_value(value).unwrap();
        assert!(ensemble.validate().is_err());

        let mut value = stump("random_forest_regressor", json!([1.0]), json!([2.0]));
        value["n_features"] = json!(5);
        let ensemble: Ensemble = serde_json::from_value(value).unwrap();
        assert!(ensemble.validate().is_err());
    }

    #[test]
    fn test_missing_directory_fails_to_load() {
        let err = TrainedModels::load(Path::new("/nonexistent/flowpilot-models")).unwrap_err();
        assert!(matches!(err, EnsembleError::Io { .. }));
    }

    #[test]
    fn test_importance_lookup() {
        let models = trained();
        assert_eq!(models.time_rf.importance_of("step_count"), 0.4);
        assert_eq!(models.time_rf.importance_of("unknown"), 0.0);
        assert_eq!(models.total_trees(), 6);
        assert_eq!(models.total_nodes(), 18);
    }
}
