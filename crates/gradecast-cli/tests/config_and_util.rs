use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use gradecast_classifiers::config::{ModelType, TrainConfig};
use gradecast_cli::train::input::train_config_from_arguments;

fn command() -> Command {
    Command::new("train")
        .arg(Arg::new("train_data").short('d').value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("output_dir").short('o').value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("model_type").long("model-type"))
        .arg(Arg::new("no_report").long("no-report").action(ArgAction::SetTrue))
}

#[test]
fn file_values_are_overridden_by_flags() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("students.csv");
    std::fs::write(&data, "G1;G3\n1;2\n").unwrap();

    let config_path = dir.path().join("train.json");
    std::fs::write(
        &config_path,
        r#"{ "test_fraction": 0.3, "seed": 7, "output_dir": "from_file" }"#,
    )
    .unwrap();

    let matches = command().get_matches_from([
        "train".into(),
        "-d".into(),
        data.clone().into_os_string(),
        "--model-type".into(),
        "gbdt".into(),
        "--no-report".into(),
    ]);
    let config = train_config_from_arguments(Some(&config_path), &matches).unwrap();

    assert_eq!(config.train_data, data);
    assert_eq!(config.output_dir, PathBuf::from("from_file"));
    assert_eq!(config.test_fraction, 0.3);
    assert_eq!(config.seed, 7);
    assert!(!config.write_report);
    assert_eq!(config.model.model_type.name(), "gbdt");
}

#[test]
fn defaults_apply_without_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("students.csv");
    std::fs::write(&data, "G1;G3\n1;2\n").unwrap();

    let matches = command().get_matches_from([
        "train".into(),
        "-d".into(),
        data.into_os_string(),
    ]);
    let config = train_config_from_arguments(None, &matches).unwrap();
    let defaults = TrainConfig::default();
    assert_eq!(config.output_dir, defaults.output_dir);
    assert_eq!(config.model.model_type, ModelType::default());
    assert!(config.write_report);
}

#[test]
fn data_path_is_checked_when_training_starts() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("students.txt");

    let matches = command().get_matches_from([
        "train".into(),
        "-d".into(),
        data.clone().into_os_string(),
    ]);
    let config = train_config_from_arguments(None, &matches).unwrap();
    assert_eq!(config.train_data, data);
}
