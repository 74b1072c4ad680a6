pub mod input;

use anyhow::Result;

use gradecast_classifiers::config::TrainConfig;
use gradecast_classifiers::trainer;

/// Run a training job and print where the results went.
pub fn run(config: &TrainConfig) -> Result<()> {
    let outcome = trainer::run_training(config)?;

    println!("Accuracy: {:.4}", outcome.accuracy());
    println!("\nClassification report:\n{}", outcome.evaluation);
    if let Some(path) = &outcome.model_path {
        println!("Model saved to: {}", path.display());
    }
    if let Some(path) = &outcome.report_path {
        println!("Report written to: {}", path.display());
    }
    Ok(())
}
