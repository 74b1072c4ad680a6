use std::fmt;

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::math::Array2;
use crate::models::classifier_trait::{check_fit_input, check_predict_input, ClassifierModel};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbdtParams {
    pub max_depth: u32,
    pub num_boost_round: u32,
    pub learning_rate: f32,
    pub min_leaf_size: usize,
    pub training_optimization_level: u8,
}

impl Default for GbdtParams {
    fn default() -> Self {
        GbdtParams {
            max_depth: 4,
            num_boost_round: 100,
            learning_rate: 0.1,
            min_leaf_size: 1,
            training_optimization_level: 2,
        }
    }
}

/// Gradient Boosting Decision Tree (GBDT) classifier
///
/// Uses the log-likelihood loss, whose labels are -1/+1 and whose
/// predictions are already probabilities of the +1 (pass) class. Row and
/// feature sampling stay at 1.0 so that fitting is deterministic.
#[derive(Serialize, Deserialize)]
pub struct GbdtClassifier {
    params: GbdtParams,
    model: Option<GBDT>,
    n_features: Option<usize>,
}

impl GbdtClassifier {
    pub fn new(params: GbdtParams) -> Self {
        GbdtClassifier {
            params,
            model: None,
            n_features: None,
        }
    }

    pub fn params(&self) -> &GbdtParams {
        &self.params
    }

    pub fn is_well_formed(&self) -> bool {
        self.model.is_some() == self.n_features.is_some()
    }

    fn config(&self, feature_size: usize) -> Config {
        let mut config = Config::new();
        config.set_feature_size(feature_size);
        config.set_shrinkage(self.params.learning_rate);
        config.set_max_depth(self.params.max_depth);
        config.set_iterations(self.params.num_boost_round as usize);
        config.set_min_leaf_size(self.params.min_leaf_size);
        config.set_training_optimization_level(self.params.training_optimization_level);
        config.set_data_sample_ratio(1.0);
        config.set_feature_sample_ratio(1.0);
        config.set_debug(false);
        config.set_loss("LogLikelyhood");
        config
    }
}

impl fmt::Debug for GbdtClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GbdtClassifier")
            .field("params", &self.params)
            .field("fitted", &self.model.is_some())
            .field("n_features", &self.n_features)
            .finish()
    }
}

impl ClassifierModel for GbdtClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[bool]) -> Result<(), ModelError> {
        check_fit_input(x, y)?;
        if self.params.num_boost_round == 0 {
            return Err(ModelError::InvalidParameter(
                "num_boost_round must be positive".into(),
            ));
        }

        let feature_size = x.ncols();
        let mut gbdt = GBDT::new(&self.config(feature_size));

        let mut train_x = DataVec::with_capacity(x.nrows());
        for (row, &label) in x.rows().zip(y) {
            let target = if label { 1.0 } else { -1.0 };
            train_x.push(Data::new_training_data(row.to_vec(), 1.0, target, None));
        }

        gbdt.fit(&mut train_x);
        log::debug!(
            "Fitted GBDT with {} boosting rounds on {} samples",
            self.params.num_boost_round,
            x.nrows()
        );

        self.model = Some(gbdt);
        self.n_features = Some(feature_size);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f64>, ModelError> {
        check_predict_input(x, self.n_features)?;
        let model = self.model.as_ref().ok_or(ModelError::NotFitted)?;

        let test_x: DataVec = x
            .rows()
            .map(|row| Data::new_training_data(row.to_vec(), 1.0, 0.0, None))
            .collect();
        Ok(model
            .predict(&test_x)
            .into_iter()
            .map(f64::from)
            .collect())
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gbdt_classifier() {
        let mut x = Array2::with_columns(2);
        let mut y = Vec::new();
        for i in 0..30 {
            let grade = (i % 20) as f32;
            x.push_row(&[grade, (i % 3) as f32]).unwrap();
            y.push(grade >= 10.0);
        }

        let mut classifier = GbdtClassifier::new(GbdtParams {
            num_boost_round: 20,
            ..Default::default()
        });
        classifier.fit(&x, &y).unwrap();

        let probs = classifier.predict_proba(&x).unwrap();
        assert_eq!(probs.len(), x.nrows());
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        assert_eq!(classifier.predict(&x).unwrap(), y);
    }

    #[test]
    fn unfitted_model_refuses_to_predict() {
        let classifier = GbdtClassifier::new(GbdtParams::default());
        let x = Array2::from_shape_vec((1, 2), vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            classifier.predict_proba(&x),
            Err(ModelError::NotFitted)
        ));
    }
}
