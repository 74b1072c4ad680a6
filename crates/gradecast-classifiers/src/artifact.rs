//! The persisted model bundle: a fitted classifier plus the ordered feature
//! names it was fitted on.
//!
//! The feature list is a runtime schema contract. It is checked for shape
//! when an artifact is loaded and enforced on every prediction by
//! [`ModelArtifact::reindex`].
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data_handling::FeatureVector;
use crate::error::{ArtifactError, SchemaError};
use crate::math::Array2;
use crate::models::{Classifier, ClassifierModel};
use crate::schema::Feature;

/// File name of the artifact inside the output directory.
pub const ARTIFACT_FILE_NAME: &str = "model.json";

/// Layout version written into every artifact.
pub const FORMAT_VERSION: u32 = 1;

/// Descriptive fields recorded at training time. Never read by inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub created_at: String,
    pub crate_version: String,
    pub model_type: String,
    pub split_seed: u64,
    pub test_fraction: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub accuracy: f64,
}

#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// Column order the classifier was fitted with.
    pub feature_names: Vec<String>,
    pub classifier: Classifier,
    pub metadata: ArtifactMetadata,
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("format_version", &self.format_version)
            .field("feature_names", &self.feature_names)
            .field("classifier", &self.classifier.name())
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl ModelArtifact {
    pub fn new(
        feature_names: Vec<String>,
        classifier: Classifier,
        metadata: ArtifactMetadata,
    ) -> Result<Self, ArtifactError> {
        let artifact = ModelArtifact {
            format_version: FORMAT_VERSION,
            feature_names,
            classifier,
            metadata,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Structural checks that do not depend on the caller's schema.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "unsupported format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        if self.feature_names.is_empty() {
            return Err(ArtifactError::Invalid("feature list is empty".into()));
        }

        let mut seen = HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateFeature(name.clone()).into());
            }
        }

        match self.classifier.n_features() {
            Some(n) if n == self.feature_names.len() => {}
            Some(n) => {
                return Err(ArtifactError::Invalid(format!(
                    "classifier was fitted on {} features but the artifact lists {}",
                    n,
                    self.feature_names.len()
                )))
            }
            None => return Err(ArtifactError::Invalid("classifier is not fitted".into())),
        }

        if !self.classifier.is_well_formed() {
            return Err(ArtifactError::Invalid("classifier structure is corrupt".into()));
        }
        Ok(())
    }

    /// Path of the artifact inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(ARTIFACT_FILE_NAME)
    }

    /// Write the artifact to `<dir>/model.json`, creating `dir` if needed.
    ///
    /// The JSON is written to a temporary sibling and renamed into place, so
    /// a failed save never leaves a truncated artifact behind.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ArtifactError> {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
        let path = Self::path_in(dir);
        let tmp_path = dir.join(format!(".{}.tmp", ARTIFACT_FILE_NAME));

        let json = serde_json::to_vec(self)?;
        {
            let mut file = fs::File::create(&tmp_path).map_err(io_err(&tmp_path))?;
            file.write_all(&json).map_err(io_err(&tmp_path))?;
            file.sync_all().map_err(io_err(&tmp_path))?;
        }
        fs::rename(&tmp_path, &path).map_err(io_err(&path))?;

        log::info!("Model saved to: {}", path.display());
        Ok(path)
    }

    /// Read and validate an artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(io_err(path))?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
        artifact.validate()?;

        log::debug!(
            "Loaded {} model with {} features from {}",
            artifact.classifier.name(),
            artifact.feature_names.len(),
            path.display()
        );
        Ok(artifact)
    }

    /// Order the values of `features` by this artifact's feature list.
    ///
    /// Both directions of drift are rejected: a name the artifact needs that
    /// the schema cannot produce, and a schema feature the artifact lacks.
    pub fn reindex(&self, features: &FeatureVector) -> Result<Vec<f32>, SchemaError> {
        let row = self
            .feature_names
            .iter()
            .map(|name| {
                features
                    .value_of(name)
                    .ok_or_else(|| SchemaError::MissingFeature(name.clone()))
            })
            .collect::<Result<Vec<f32>, _>>()?;

        if let Some(extra) = Feature::ALL
            .iter()
            .find(|f| !self.feature_names.iter().any(|n| n == f.name()))
        {
            return Err(SchemaError::UnexpectedFeature(extra.name().to_string()));
        }
        Ok(row)
    }

    /// Reindexed single-row matrix ready for the classifier.
    pub fn feature_row(&self, features: &FeatureVector) -> Result<Array2<f32>, SchemaError> {
        Ok(Array2::from_row(self.reindex(features)?))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ArtifactError {
    let path = path.to_path_buf();
    move |source| ArtifactError::Io { path, source }
}
