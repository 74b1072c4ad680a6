use anyhow::Result;
use clap::ArgMatches;
use std::path::PathBuf;
use std::str::FromStr;

use gradecast_classifiers::config::{load_train_config, ModelConfig, ModelType, TrainConfig};

/// Build the training configuration from an optional JSON file and the
/// command line overrides.
pub fn train_config_from_arguments(
    config_path: Option<&PathBuf>,
    matches: &ArgMatches,
) -> Result<TrainConfig> {
    let mut config = match config_path {
        Some(path) => load_train_config(path)?,
        None => TrainConfig::default(),
    };

    if let Some(train_data) = matches.get_one::<PathBuf>("train_data") {
        config.train_data = train_data.clone();
    }

    if let Some(output_dir) = matches.get_one::<PathBuf>("output_dir") {
        config.output_dir = output_dir.clone();
    }

    if let Some(model_type) = matches.get_one::<String>("model_type") {
        let requested = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
        if requested.name() != config.model.model_type.name() {
            config.model = ModelConfig::new(requested);
        }
    }

    if matches.get_flag("no_report") {
        config.write_report = false;
    }

    Ok(config)
}
