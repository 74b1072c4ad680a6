use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a raw dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failures raised by classifier fitting and scoring.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model has not been fitted")]
    NotFitted,
    #[error("cannot fit a model on an empty training set")]
    EmptyTrainingSet,
    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    LengthMismatch { rows: usize, labels: usize },
    #[error("model expects {expected} features, got {found}")]
    FeatureCountMismatch { expected: usize, found: usize },
    #[error("invalid model parameter: {0}")]
    InvalidParameter(String),
    #[error("{expected} labels cannot be scored against {found} predictions")]
    PredictionCountMismatch { expected: usize, found: usize },
    #[error("decision tree fitting failed: {0}")]
    Tree(#[from] linfa::Error),
}

/// Divergence between the artifact's feature list and the features built at
/// inference time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema drift: artifact expects feature '{0}' which the input does not provide")]
    MissingFeature(String),
    #[error("schema drift: input provides feature '{0}' which the artifact does not expect")]
    UnexpectedFeature(String),
    #[error("feature '{0}' appears more than once in the artifact")]
    DuplicateFeature(String),
}

/// Invalid values supplied by a caller at serve time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{field} has no code for '{value}'")]
    UnknownCategory { field: &'static str, value: String },
}

/// Failures while persisting or loading a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no model artifact at {}", .0.display())]
    NotFound(PathBuf),
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Failures of a single prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Failures of a training run.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("label column '{0}' is missing from the training data")]
    MissingLabelColumn(&'static str),
    #[error("no usable rows left after cleaning the training data")]
    NoUsableRows,
    #[error("split of {rows} rows with test fraction {test_fraction} leaves an empty partition")]
    EmptyPartition { rows: usize, test_fraction: f64 },
    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("failed to write report {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
