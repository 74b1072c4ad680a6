use crate::config::{ModelConfig, ModelType};
use crate::models::{Classifier, ForestParams, GbdtClassifier, GbdtParams, RandomForestClassifier};

/// Build an unfitted classifier from a `ModelConfig`.
pub fn build_model(config: &ModelConfig) -> Classifier {
    match config.model_type {
        ModelType::RandomForest {
            n_trees,
            max_depth,
            min_samples_split,
            min_samples_leaf,
            max_features,
            seed,
        } => Classifier::RandomForest(RandomForestClassifier::new(ForestParams {
            n_trees,
            max_depth,
            min_samples_split,
            min_samples_leaf,
            max_features,
            seed,
        })),
        ModelType::Gbdt {
            max_depth,
            num_boost_round,
            learning_rate,
            min_leaf_size,
            training_optimization_level,
        } => Classifier::Gbdt(GbdtClassifier::new(GbdtParams {
            max_depth,
            num_boost_round,
            learning_rate,
            min_leaf_size,
            training_optimization_level,
        })),
    }
}
