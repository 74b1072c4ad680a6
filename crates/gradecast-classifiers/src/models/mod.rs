pub mod classifier_trait;
pub mod factory;
pub mod gbdt;
pub mod random_forest;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::math::Array2;

pub use classifier_trait::ClassifierModel;
pub use gbdt::{GbdtClassifier, GbdtParams};
pub use random_forest::{ForestParams, RandomForestClassifier};

/// The concrete classifier stored inside a model artifact.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classifier {
    RandomForest(RandomForestClassifier),
    Gbdt(GbdtClassifier),
}

impl Classifier {
    fn inner(&self) -> &dyn ClassifierModel {
        match self {
            Classifier::RandomForest(m) => m,
            Classifier::Gbdt(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ClassifierModel {
        match self {
            Classifier::RandomForest(m) => m,
            Classifier::Gbdt(m) => m,
        }
    }

    /// Structural check of a deserialized model.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Classifier::RandomForest(m) => m.is_well_formed(),
            Classifier::Gbdt(m) => m.is_well_formed(),
        }
    }
}

impl ClassifierModel for Classifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[bool]) -> Result<(), ModelError> {
        self.inner_mut().fit(x, y)
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f64>, ModelError> {
        self.inner().predict_proba(x)
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<bool>, ModelError> {
        self.inner().predict(x)
    }

    fn n_features(&self) -> Option<usize> {
        self.inner().n_features()
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.inner().feature_importances()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classifier::RandomForest(m) => f.debug_tuple("RandomForest").field(m).finish(),
            Classifier::Gbdt(m) => f.debug_tuple("Gbdt").field(m).finish(),
        }
    }
}
