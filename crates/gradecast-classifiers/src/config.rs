use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;

use crate::error::TrainError;

/// Default location of the raw training data, relative to the project root.
pub const DEFAULT_TRAIN_DATA: &str = "data/raw/student-mat.csv";

/// Default directory the model artifact is written to.
pub const DEFAULT_OUTPUT_DIR: &str = "model/saved_models";

/// Number of columns drawn for each member tree of a forest.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    Log2,
    All,
    Count(usize),
}

impl MaxFeatures {
    /// Resolve against the number of available features; always at least 1.
    pub fn resolve(self, n_features: usize) -> usize {
        let n = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(k) => k,
        };
        n.clamp(1, n_features.max(1))
    }
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    RandomForest {
        n_trees: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
        max_features: MaxFeatures,
        seed: u64,
    },
    Gbdt {
        max_depth: u32,
        num_boost_round: u32,
        learning_rate: f32,
        min_leaf_size: usize,
        training_optimization_level: u8,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::RandomForest {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            seed: 42,
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::RandomForest { .. } => "random_forest",
            ModelType::Gbdt { .. } => "gbdt",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random_forest" | "random-forest" | "rf" => Ok(ModelType::default()),
            "gbdt" => Ok(ModelType::Gbdt {
                max_depth: 4,
                num_boost_round: 100,
                learning_rate: 0.1,
                min_leaf_size: 1,
                training_optimization_level: 2,
            }),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: random_forest, gbdt",
                s
            )),
        }
    }
}

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub model_type: ModelType,
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }
}

/// Parameters of a training run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    /// Semicolon-separated raw dataset.
    pub train_data: PathBuf,
    /// Directory receiving `model.json` and the optional HTML report.
    pub output_dir: PathBuf,
    /// Share of rows held out for evaluation.
    pub test_fraction: f64,
    /// Seed of the train/evaluation shuffle.
    pub seed: u64,
    pub model: ModelConfig,
    pub write_report: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            train_data: PathBuf::from(DEFAULT_TRAIN_DATA),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            test_fraction: 0.2,
            seed: 42,
            model: ModelConfig::default(),
            write_report: true,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), TrainError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(TrainError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        match &self.model.model_type {
            ModelType::RandomForest {
                n_trees,
                min_samples_split,
                min_samples_leaf,
                ..
            } => {
                if *n_trees == 0 {
                    return Err(TrainError::InvalidConfig("n_trees must be positive".into()));
                }
                if *min_samples_split < 2 {
                    return Err(TrainError::InvalidConfig(
                        "min_samples_split must be at least 2".into(),
                    ));
                }
                if *min_samples_leaf == 0 {
                    return Err(TrainError::InvalidConfig(
                        "min_samples_leaf must be positive".into(),
                    ));
                }
            }
            ModelType::Gbdt {
                num_boost_round,
                learning_rate,
                ..
            } => {
                if *num_boost_round == 0 {
                    return Err(TrainError::InvalidConfig(
                        "num_boost_round must be positive".into(),
                    ));
                }
                if *learning_rate <= 0.0 {
                    return Err(TrainError::InvalidConfig(
                        "learning_rate must be positive".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Load a training configuration from a JSON file.
pub fn load_train_config<P: AsRef<Path>>(path: P) -> anyhow::Result<TrainConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
