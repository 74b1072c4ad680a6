mod common;

use gradecast_classifiers::artifact::{ModelArtifact, ARTIFACT_FILE_NAME};
use gradecast_classifiers::config::{MaxFeatures, ModelConfig, ModelType, TrainConfig};
use gradecast_classifiers::data_handling::transform;
use gradecast_classifiers::error::{DataError, PredictError, SchemaError, TrainError};
use gradecast_classifiers::inference::{predict, StudentForm};
use gradecast_classifiers::io::read_student_csv;
use gradecast_classifiers::schema;
use gradecast_classifiers::trainer::{run_training, REPORT_FILE_NAME};

fn config(dir: &std::path::Path, data: std::path::PathBuf) -> TrainConfig {
    TrainConfig {
        train_data: data,
        output_dir: dir.join("saved_models"),
        model: ModelConfig::new(ModelType::RandomForest {
            n_trees: 20,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            seed: 42,
        }),
        ..Default::default()
    }
}

#[test]
fn training_writes_artifact_and_report() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let data = common::write_dataset(dir.path(), &common::dataset(100, &[]));
    let cfg = config(dir.path(), data);

    let outcome = run_training(&cfg).unwrap();
    assert_eq!(outcome.n_test, 20);
    assert_eq!(outcome.n_train, 80);
    assert!(outcome.accuracy() > 0.8, "accuracy {}", outcome.accuracy());

    let model_path = cfg.output_dir.join(ARTIFACT_FILE_NAME);
    assert_eq!(outcome.model_path.as_deref(), Some(model_path.as_path()));
    assert!(model_path.exists());
    assert!(cfg.output_dir.join(REPORT_FILE_NAME).exists());

    let artifact = ModelArtifact::load(&model_path).unwrap();
    assert_eq!(artifact.feature_names, schema::feature_names());
    assert_eq!(artifact.metadata.split_seed, 42);
}

#[test]
fn training_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let data = common::write_dataset(dir.path(), &common::dataset(80, &[]));

    let mut first_cfg = config(dir.path(), data.clone());
    first_cfg.output_dir = dir.path().join("first");
    first_cfg.write_report = false;
    let mut second_cfg = first_cfg.clone();
    second_cfg.output_dir = dir.path().join("second");

    let first = run_training(&first_cfg).unwrap();
    let second = run_training(&second_cfg).unwrap();
    assert_eq!(first.accuracy(), second.accuracy());
    assert!(!first_cfg.output_dir.join(REPORT_FILE_NAME).exists());

    let first = ModelArtifact::load(first_cfg.output_dir.join(ARTIFACT_FILE_NAME)).unwrap();
    let second = ModelArtifact::load(second_cfg.output_dir.join(ARTIFACT_FILE_NAME)).unwrap();
    for form in [
        StudentForm::default(),
        StudentForm {
            grade_bucket: 1,
            failures: 2,
            ..Default::default()
        },
        StudentForm {
            grade_bucket: 5,
            sex: "M".into(),
            romantic: true,
            ..Default::default()
        },
    ] {
        let a = predict(&form, &first).unwrap();
        let b = predict(&form, &second).unwrap();
        assert_eq!(a.probability.to_bits(), b.probability.to_bits());
        assert_eq!(a.pass, b.pass);
    }
}

#[test]
fn missing_label_column_aborts_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let text = common::drop_column(&common::dataset(40, &[]), "G3");
    let data = common::write_dataset(dir.path(), &text);
    let cfg = config(dir.path(), data);

    let err = run_training(&cfg).unwrap_err();
    assert!(matches!(err, TrainError::MissingLabelColumn("G3")));
    assert!(!cfg.output_dir.exists());
}

#[test]
fn missing_dataset_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), dir.path().join("absent.csv"));
    assert!(matches!(
        run_training(&cfg),
        Err(TrainError::Data(DataError::FileNotFound(_)))
    ));
}

#[test]
fn unusable_rows_are_dropped_and_counted() {
    let bad = vec![
        common::set_field(&common::row(1000), "G3", ""),
        common::set_field(&common::row(1001), "G3", "NA"),
        common::set_field(&common::row(1002), "school", "XX"),
        common::set_field(&common::row(1003), "internet", "maybe"),
        common::set_field(&common::row(1004), "absences", ""),
        common::set_field(&common::row(1005), "Medu", ""),
        common::set_field(&common::row(1006), "internet", ""),
    ];
    let table = read_student_csv_text(&common::dataset(30, &bad));
    let data = transform(&table.records);

    assert_eq!(data.summary.rows_read, 37);
    assert_eq!(data.summary.rows_kept, 30);
    assert_eq!(data.summary.dropped_missing_label, 2);
    assert_eq!(data.summary.dropped_unmappable, 3);
    assert_eq!(data.summary.dropped_missing_feature, 2);
    assert_eq!(data.len(), 30);
    assert_eq!(data.x.ncols(), schema::N_FEATURES);
}

#[test]
fn trained_artifact_scores_form_input() {
    let dir = tempfile::tempdir().unwrap();
    let data = common::write_dataset(dir.path(), &common::dataset(100, &[]));
    let mut cfg = config(dir.path(), data);
    cfg.write_report = false;
    run_training(&cfg).unwrap();

    let artifact = ModelArtifact::load(cfg.output_dir.join(ARTIFACT_FILE_NAME)).unwrap();
    let strong = predict(
        &StudentForm {
            grade_bucket: 5,
            ..Default::default()
        },
        &artifact,
    )
    .unwrap();
    let weak = predict(
        &StudentForm {
            grade_bucket: 1,
            failures: 3,
            ..Default::default()
        },
        &artifact,
    )
    .unwrap();
    assert!((0.0..=1.0).contains(&strong.probability));
    assert!(strong.probability > weak.probability);
    assert!(strong.pass);
    assert!(!weak.pass);

    let invalid = StudentForm {
        studytime: 9,
        ..Default::default()
    };
    assert!(matches!(
        predict(&invalid, &artifact),
        Err(PredictError::Input(_))
    ));
}

#[test]
fn schema_drift_is_rejected_at_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let data = common::write_dataset(dir.path(), &common::dataset(60, &[]));
    let mut cfg = config(dir.path(), data);
    cfg.write_report = false;
    run_training(&cfg).unwrap();

    let path = cfg.output_dir.join(ARTIFACT_FILE_NAME);
    let mut json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    json["feature_names"][3] = serde_json::Value::String("hours_of_sleep".into());
    std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    let artifact = ModelArtifact::load(&path).unwrap();
    let err = predict(&StudentForm::default(), &artifact).unwrap_err();
    assert!(matches!(
        err,
        PredictError::Schema(SchemaError::MissingFeature(ref name)) if name == "hours_of_sleep"
    ));
}

fn read_student_csv_text(text: &str) -> gradecast_classifiers::io::StudentTable {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_dataset(dir.path(), text);
    read_student_csv(path).unwrap()
}
