use crate::error::ModelError;
use crate::math::Array2;

/// Contract shared by the binary pass/fail classifiers.
///
/// Labels are `true` for pass. Probabilities always refer to the pass class.
pub trait ClassifierModel {
    /// Fit the model on rows of `x` and their labels.
    fn fit(&mut self, x: &Array2<f32>, y: &[bool]) -> Result<(), ModelError>;

    /// Probability of the pass class for each row of `x`.
    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f64>, ModelError>;

    /// Predicted labels: pass when the pass probability exceeds one half.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<bool>, ModelError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| p > 0.5)
            .collect())
    }

    /// Number of features seen at fit time, `None` before fitting.
    fn n_features(&self) -> Option<usize>;

    /// Normalized per-feature importances, when the model records them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Common argument checks for `fit`.
pub(crate) fn check_fit_input(x: &Array2<f32>, y: &[bool]) -> Result<(), ModelError> {
    if x.nrows() != y.len() {
        return Err(ModelError::LengthMismatch {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    if x.is_empty() || x.ncols() == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }
    Ok(())
}

/// Common argument checks for scoring.
pub(crate) fn check_predict_input(
    x: &Array2<f32>,
    n_features: Option<usize>,
) -> Result<(), ModelError> {
    let expected = n_features.ok_or(ModelError::NotFitted)?;
    if x.ncols() != expected {
        return Err(ModelError::FeatureCountMismatch {
            expected,
            found: x.ncols(),
        });
    }
    Ok(())
}
