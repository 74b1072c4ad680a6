//! Bagged forest of Gini decision trees grown by `linfa-trees`.
//!
//! Each member tree is fitted on a bootstrap sample of the rows, restricted
//! to a random subset of the columns. All randomness flows from one seeded
//! ChaCha generator, so a forest is a pure function of its data and
//! parameters.
//!
//! The pass probability is the share of trees voting pass. Votes are
//! integers, so a reloaded forest scores bit-for-bit the same.
use linfa::traits::{Fit as _, Predict as _};
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::Array1;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::MaxFeatures;
use crate::error::ModelError;
use crate::math::Array2;
use crate::models::classifier_trait::{check_fit_input, check_predict_input, ClassifierModel};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Columns drawn for each member tree.
    pub max_features: MaxFeatures,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        ForestParams {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            seed: 42,
        }
    }
}

/// One tree of the forest and the columns it was fitted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestMember {
    /// Ascending indices into the full feature row.
    columns: Vec<usize>,
    tree: DecisionTree<f64, bool>,
}

impl ForestMember {
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn tree(&self) -> &DecisionTree<f64, bool> {
        &self.tree
    }

    fn records(&self, x: &Array2<f32>) -> ndarray::Array2<f64> {
        ndarray::Array2::from_shape_fn((x.nrows(), self.columns.len()), |(r, c)| {
            f64::from(x[(r, self.columns[c])])
        })
    }

    fn votes(&self, x: &Array2<f32>) -> Array1<bool> {
        self.tree.predict(&self.records(x))
    }
}

/// Bootstrap aggregate of `linfa-trees` classifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    params: ForestParams,
    members: Vec<ForestMember>,
    n_features: Option<usize>,
    feature_importances: Vec<f64>,
}

impl RandomForestClassifier {
    pub fn new(params: ForestParams) -> Self {
        RandomForestClassifier {
            params,
            members: Vec::new(),
            n_features: None,
            feature_importances: Vec::new(),
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn members(&self) -> &[ForestMember] {
        &self.members
    }

    /// Structural check used after deserialization.
    pub fn is_well_formed(&self) -> bool {
        match self.n_features {
            None => self.members.is_empty(),
            Some(n) => {
                !self.members.is_empty()
                    && self.feature_importances.len() == n
                    && self.members.iter().all(|m| {
                        !m.columns.is_empty()
                            && m.columns.windows(2).all(|w| w[0] < w[1])
                            && m.columns.iter().all(|&c| c < n)
                    })
            }
        }
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[bool]) -> Result<(), ModelError> {
        check_fit_input(x, y)?;
        if self.params.n_trees == 0 {
            return Err(ModelError::InvalidParameter("n_trees must be positive".into()));
        }
        if self.params.min_samples_split < 2 || self.params.min_samples_leaf < 1 {
            return Err(ModelError::InvalidParameter(
                "min_samples_split must be at least 2 and min_samples_leaf at least 1".into(),
            ));
        }

        let (n_samples, n_features) = x.shape();
        let n_columns = self.params.max_features.resolve(n_features);
        let tree_params = DecisionTree::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(self.params.max_depth)
            .min_weight_split(self.params.min_samples_split as f32)
            .min_weight_leaf(self.params.min_samples_leaf as f32);

        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let mut members = Vec::with_capacity(self.params.n_trees);
        let mut importances = vec![0.0f64; n_features];

        for _ in 0..self.params.n_trees {
            let rows: Vec<usize> = (0..n_samples)
                .map(|_| rng.gen_range(0..n_samples))
                .collect();
            let mut columns = sample(&mut rng, n_features, n_columns).into_vec();
            columns.sort_unstable();

            let records = ndarray::Array2::from_shape_fn((n_samples, columns.len()), |(r, c)| {
                f64::from(x[(rows[r], columns[c])])
            });
            let targets: Array1<bool> = rows.iter().map(|&r| y[r]).collect();
            let dataset = Dataset::new(records, targets);
            let fitted: Result<DecisionTree<f64, bool>, linfa::Error> =
                tree_params.fit(&dataset);
            let tree = fitted?;

            // A single-leaf tree reports no finite importances.
            for (&col, imp) in columns.iter().zip(tree.feature_importance()) {
                if imp.is_finite() {
                    importances[col] += imp;
                }
            }
            members.push(ForestMember { columns, tree });
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        log::debug!(
            "Fitted {} trees on {} samples x {} features ({} columns per tree, max depth {})",
            members.len(),
            n_samples,
            n_features,
            n_columns,
            members.iter().map(|m| m.tree.max_depth()).max().unwrap_or(0)
        );

        self.members = members;
        self.n_features = Some(n_features);
        self.feature_importances = importances;
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f64>, ModelError> {
        check_predict_input(x, self.n_features)?;
        let mut pass_votes = vec![0u32; x.nrows()];
        for member in &self.members {
            let votes = member.votes(x);
            for (count, &vote) in pass_votes.iter_mut().zip(votes.iter()) {
                if vote {
                    *count += 1;
                }
            }
        }
        let n_trees = self.members.len() as f64;
        Ok(pass_votes
            .into_iter()
            .map(|v| f64::from(v) / n_trees)
            .collect())
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.n_features.map(|_| self.feature_importances.clone())
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Label follows the first column; the second column is noise.
    fn toy_data() -> (Array2<f32>, Vec<bool>) {
        let mut x = Array2::with_columns(2);
        let mut y = Vec::new();
        for i in 0..40 {
            let grade = (i % 20) as f32;
            let noise = ((i * 7) % 5) as f32;
            x.push_row(&[grade, noise]).unwrap();
            y.push(grade >= 10.0);
        }
        (x, y)
    }

    fn params(n_trees: usize, seed: u64) -> ForestParams {
        ForestParams {
            n_trees,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn learns_a_threshold() {
        let (x, y) = toy_data();
        let mut rf = RandomForestClassifier::new(params(25, 42));
        rf.fit(&x, &y).unwrap();

        assert_eq!(rf.predict(&x).unwrap(), y);
        let probs = rf.predict_proba(&x).unwrap();
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!(rf.is_well_formed());
        assert_eq!(rf.members().len(), 25);
    }

    #[test]
    fn importances_favor_informative_feature() {
        let (x, y) = toy_data();
        let mut rf = RandomForestClassifier::new(params(25, 1));
        rf.fit(&x, &y).unwrap();

        let imp = rf.feature_importances().unwrap();
        assert_eq!(imp.len(), 2);
        assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(imp[0] > imp[1]);
    }

    #[test]
    fn same_seed_same_forest() {
        let (x, y) = toy_data();
        let mut a = RandomForestClassifier::new(params(10, 42));
        let mut b = RandomForestClassifier::new(params(10, 42));
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
    }

    #[test]
    fn json_round_trip_is_exact() {
        let (x, y) = toy_data();
        let mut rf = RandomForestClassifier::new(params(15, 9));
        rf.fit(&x, &y).unwrap();

        let json = serde_json::to_string(&rf).unwrap();
        let back: RandomForestClassifier = serde_json::from_str(&json).unwrap();
        assert!(back.is_well_formed());
        let before = rf.predict_proba(&x).unwrap();
        let after = back.predict_proba(&x).unwrap();
        assert!(before
            .iter()
            .zip(&after)
            .all(|(a, b)| a.to_bits() == b.to_bits()));
    }

    #[test]
    fn column_subsets_follow_max_features() {
        let (x, y) = toy_data();
        let mut rf = RandomForestClassifier::new(ForestParams {
            max_features: MaxFeatures::Count(1),
            ..params(12, 5)
        });
        rf.fit(&x, &y).unwrap();
        assert!(rf.members().iter().all(|m| m.columns().len() == 1));
        assert!(rf.is_well_formed());
    }

    #[test]
    fn depth_limit_is_respected() {
        let (x, y) = toy_data();
        let mut rf = RandomForestClassifier::new(ForestParams {
            max_depth: Some(1),
            ..params(5, 3)
        });
        rf.fit(&x, &y).unwrap();
        assert!(rf.members().iter().all(|m| m.tree().max_depth() <= 1));
        assert!(rf.members().iter().all(|m| m.tree().num_leaves() <= 2));
    }

    #[test]
    fn single_class_gives_certain_votes() {
        let (x, _) = toy_data();
        let y = vec![true; x.nrows()];
        let mut rf = RandomForestClassifier::new(params(3, 0));
        rf.fit(&x, &y).unwrap();
        assert!(rf.predict_proba(&x).unwrap().iter().all(|&p| p == 1.0));
    }

    #[test]
    fn rejects_bad_input() {
        let (x, y) = toy_data();
        let rf = RandomForestClassifier::new(ForestParams::default());
        assert!(matches!(rf.predict_proba(&x), Err(ModelError::NotFitted)));

        let mut rf = RandomForestClassifier::new(params(0, 0));
        assert!(matches!(
            rf.fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));

        let mut rf = RandomForestClassifier::new(params(2, 0));
        assert!(matches!(
            rf.fit(&x, &y[..3]),
            Err(ModelError::LengthMismatch { .. })
        ));
        rf.fit(&x, &y).unwrap();

        let wide = Array2::from_shape_vec((1, 3), vec![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            rf.predict_proba(&wide),
            Err(ModelError::FeatureCountMismatch {
                expected: 2,
                found: 3
            })
        ));
    }
}
