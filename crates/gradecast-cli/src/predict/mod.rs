pub mod form;
pub mod input;
pub mod output;

use anyhow::Result;
use std::path::Path;

use gradecast_classifiers::inference::{self, StudentForm};

use crate::util::load_model;

/// Score a single form given on the command line.
pub fn run(model_path: &Path, form: &StudentForm, as_json: bool) -> Result<()> {
    let artifact = load_model(model_path)?;
    let prediction = inference::predict(form, &artifact)?;

    if as_json {
        println!("{}", output::prediction_json(form, &prediction)?);
    } else {
        println!("{}", output::render_prediction(&prediction));
    }
    Ok(())
}
