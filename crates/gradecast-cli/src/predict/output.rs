use anyhow::Result;
use serde::Serialize;

use gradecast_classifiers::inference::{Prediction, StudentForm};

/// One line verdict with the pass probability.
pub fn render_prediction(prediction: &Prediction) -> String {
    if prediction.pass {
        format!("PASS (confidence: {:.1}%)", prediction.percent())
    } else {
        format!("AT RISK (chance of passing: {:.1}%)", prediction.percent())
    }
}

#[derive(Serialize)]
struct PredictionRecord<'a> {
    input: &'a StudentForm,
    pass: bool,
    probability: f64,
}

pub fn prediction_json(form: &StudentForm, prediction: &Prediction) -> Result<String> {
    let record = PredictionRecord {
        input: form,
        pass: prediction.pass,
        probability: prediction.probability,
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdicts() {
        let pass = Prediction {
            pass: true,
            probability: 0.873,
        };
        assert_eq!(render_prediction(&pass), "PASS (confidence: 87.3%)");

        let fail = Prediction {
            pass: false,
            probability: 0.2,
        };
        assert_eq!(render_prediction(&fail), "AT RISK (chance of passing: 20.0%)");
    }

    #[test]
    fn json_carries_input_and_result() {
        let p = Prediction {
            pass: true,
            probability: 0.75,
        };
        let json: serde_json::Value =
            serde_json::from_str(&prediction_json(&StudentForm::default(), &p).unwrap()).unwrap();
        assert_eq!(json["pass"], true);
        assert_eq!(json["probability"], 0.75);
        assert_eq!(json["input"]["grade_bucket"], 3);
    }
}
