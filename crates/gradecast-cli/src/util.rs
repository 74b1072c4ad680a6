use anyhow::Result;
use std::path::Path;

use gradecast_classifiers::artifact::ModelArtifact;
use gradecast_classifiers::error::ArtifactError;

/// Load a trained artifact, pointing the user at `gradecast train` when
/// there is none yet.
pub fn load_model(path: &Path) -> Result<ModelArtifact> {
    match ModelArtifact::load(path) {
        Ok(artifact) => Ok(artifact),
        Err(ArtifactError::NotFound(p)) => anyhow::bail!(
            "No trained model found at {}. Run `gradecast train` first.",
            p.display()
        ),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("Failed to load model: {}", path.display()))),
    }
}
