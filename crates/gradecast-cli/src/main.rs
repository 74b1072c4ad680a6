use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use gradecast_classifiers::artifact::ARTIFACT_FILE_NAME;
use gradecast_classifiers::config::{DEFAULT_OUTPUT_DIR, DEFAULT_TRAIN_DATA};
use gradecast_cli::predict::form::FormSession;
use gradecast_cli::predict::input::{form_args, student_form_from_arguments};
use gradecast_cli::train::input::train_config_from_arguments;
use gradecast_cli::util::load_model;
use gradecast_cli::{inspect, predict, train};

fn model_arg() -> Arg {
    Arg::new("model_path")
        .short('m')
        .long("model")
        .help("Path to the trained model artifact (model.json)")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn data_arg(help: &'static str) -> Arg {
    Arg::new("train_data")
        .short('d')
        .long("train_data")
        .help(help)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("GRADECAST_LOG", "error,gradecast=info"))
        .init();

    let matches = Command::new("gradecast")
        .version(clap::crate_version!())
        .author("gradecast developers")
        .about("\u{1F393} gradecast - Will you pass the exam?")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train the pass/fail model on the student dataset")
                .arg(
                    Arg::new("config")
                        .help("Path to a training configuration file (JSON). Defaults are used when omitted.")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(data_arg(
                    "Path to the semicolon separated dataset. Overrides the training data \
                     file specified in the configuration file.",
                ))
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output_dir")
                        .help(
                            "Directory that model.json and the report are written to. \
                             Overrides the directory specified in the configuration file.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("model_type")
                        .long("model-type")
                        .help("Override the model type from the JSON config.")
                        .value_parser(["random_forest", "gbdt"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Predict pass/fail for one student given on the command line")
                .arg(model_arg())
                .args(form_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the prediction as JSON.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("form")
                .about("Fill in an interactive form and get a prediction")
                .arg(model_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Clean a dataset and preview the resulting feature table")
                .arg(data_arg("Path to the semicolon separated dataset."))
                .arg(
                    Arg::new("rows")
                        .short('n')
                        .long("rows")
                        .help("Number of rows to show")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("form", sub_m)) => handle_form(sub_m),
        Some(("inspect", sub_m)) => handle_inspect(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn model_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("model_path")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR).join(ARTIFACT_FILE_NAME))
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config_path = matches.get_one::<PathBuf>("config");
    match config_path {
        Some(path) => log::info!("[gradecast::train] Training from config: {:?}", path),
        None => log::info!("[gradecast::train] No config provided; using defaults."),
    }

    let config = train_config_from_arguments(config_path, matches)?;
    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[gradecast::train] Default config:\n{}", default_json);
    }

    train::run(&config)
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let form = student_form_from_arguments(matches);
    predict::run(&model_path(matches), &form, matches.get_flag("json"))
}

fn handle_form(matches: &ArgMatches) -> Result<()> {
    // Fails before any prompt when there is no trained model.
    let artifact = load_model(&model_path(matches))?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let shown = FormSession::new(stdin.lock(), stdout.lock(), &artifact).run()?;
    log::debug!("Form session ended after {} prediction(s)", shown);
    Ok(())
}

fn handle_inspect(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<PathBuf>("train_data")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TRAIN_DATA));
    let rows = matches.get_one::<usize>("rows").copied().unwrap_or(5);
    inspect::run(&path, rows)
}
