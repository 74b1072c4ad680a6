use std::path::PathBuf;

use crate::artifact::{ArtifactMetadata, ModelArtifact};
use crate::config::TrainConfig;
use crate::data_handling::{self, train_test_split, TransformSummary, TransformedData};
use crate::error::TrainError;
use crate::io::read_student_csv;
use crate::metrics::ClassificationReport;
use crate::models::factory::build_model;
use crate::models::ClassifierModel;
use crate::report;
use crate::schema;

/// File name of the HTML report inside the output directory.
pub const REPORT_FILE_NAME: &str = "training_report.html";

/// Everything a training run produced.
#[derive(Debug)]
pub struct TrainOutcome {
    pub artifact: ModelArtifact,
    /// Evaluation on the held-out partition.
    pub evaluation: ClassificationReport,
    pub summary: TransformSummary,
    pub n_train: usize,
    pub n_test: usize,
    /// `(feature, importance)` pairs, when the model records them.
    pub feature_importances: Option<Vec<(String, f64)>>,
    /// Set once the artifact has been written.
    pub model_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl TrainOutcome {
    pub fn accuracy(&self) -> f64 {
        self.evaluation.accuracy
    }
}

/// Split, fit and evaluate. Nothing is written.
pub fn train(data: &TransformedData, config: &TrainConfig) -> Result<TrainOutcome, TrainError> {
    config.validate()?;
    if data.is_empty() {
        return Err(TrainError::NoUsableRows);
    }

    let (train_idx, test_idx) = train_test_split(data.len(), config.test_fraction, config.seed);
    if train_idx.is_empty() || test_idx.is_empty() {
        return Err(TrainError::EmptyPartition {
            rows: data.len(),
            test_fraction: config.test_fraction,
        });
    }
    log::info!(
        "Split {} rows into {} training and {} evaluation rows (seed {})",
        data.len(),
        train_idx.len(),
        test_idx.len(),
        config.seed
    );

    let x_train = data.x.select_rows(&train_idx);
    let y_train: Vec<bool> = train_idx.iter().map(|&i| data.y[i]).collect();
    let x_test = data.x.select_rows(&test_idx);
    let y_test: Vec<bool> = test_idx.iter().map(|&i| data.y[i]).collect();

    let mut model = build_model(&config.model);
    log::info!("Training {} model", model.name());
    model.fit(&x_train, &y_train)?;

    let y_pred = model.predict(&x_test)?;
    let evaluation = ClassificationReport::new(&y_test, &y_pred)?;

    let feature_importances = model.feature_importances().map(|importances| {
        data.feature_names
            .iter()
            .cloned()
            .zip(importances)
            .collect::<Vec<_>>()
    });

    let metadata = ArtifactMetadata {
        created_at: chrono::Utc::now().to_rfc3339(),
        crate_version: env!("CARGO_PKG_VERSION").to_string(),
        model_type: model.name().to_string(),
        split_seed: config.seed,
        test_fraction: config.test_fraction,
        n_train: train_idx.len(),
        n_test: test_idx.len(),
        accuracy: evaluation.accuracy,
    };
    let artifact = ModelArtifact::new(data.feature_names.clone(), model, metadata)?;

    Ok(TrainOutcome {
        artifact,
        evaluation,
        summary: data.summary.clone(),
        n_train: train_idx.len(),
        n_test: test_idx.len(),
        feature_importances,
        model_path: None,
        report_path: None,
    })
}

/// Full offline pipeline: read, clean, train, evaluate and persist.
///
/// The label column is checked before anything else happens, so a dataset
/// without `G3` never produces an artifact.
pub fn run_training(config: &TrainConfig) -> Result<TrainOutcome, TrainError> {
    config.validate()?;

    log::info!("Loading training data from {}", config.train_data.display());
    let table = read_student_csv(&config.train_data)?;
    if !table.has_column(schema::LABEL_SOURCE_COLUMN) {
        return Err(TrainError::MissingLabelColumn(schema::LABEL_SOURCE_COLUMN));
    }

    let data = data_handling::transform(&table.records);
    data.log_summary();

    let mut outcome = train(&data, config)?;
    log::info!("Accuracy: {:.4}", outcome.accuracy());
    log::info!("Classification report:\n{}", outcome.evaluation);

    let model_path = outcome.artifact.save(&config.output_dir)?;
    outcome.model_path = Some(model_path);

    if config.write_report {
        let path = config.output_dir.join(REPORT_FILE_NAME);
        let html = report::render_training_report(&outcome, config);
        std::fs::write(&path, html).map_err(|source| TrainError::Report {
            path: path.clone(),
            source,
        })?;
        log::info!("Report written to: {}", path.display());
        outcome.report_path = Some(path);
    }

    Ok(outcome)
}
