//! Single-record prediction from form input.
//!
//! A [`StudentForm`] carries answers in the units a person fills in (for
//! example a 1-5 grade bucket rather than the 0-20 training scale). It is
//! converted through the same `schema` tables the transformer uses, then
//! reordered to the artifact's feature list. Unlike training, nothing here
//! is dropped or defaulted: bad input is an error.
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::artifact::ModelArtifact;
use crate::data_handling::FeatureVector;
use crate::error::{InputError, PredictError};
use crate::models::ClassifierModel;
use crate::schema::{self, Feature, N_FEATURES};

/// Accepted ranges of the numeric form fields.
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const GRADE_BUCKET: RangeInclusive<u8> = 1..=5;
    pub const FAILURES: RangeInclusive<u8> = 0..=4;
    pub const ABSENCES: RangeInclusive<u8> = 0..=93;
    pub const STUDY_TIME: RangeInclusive<u8> = 1..=4;
    pub const TRAVEL_TIME: RangeInclusive<u8> = 1..=4;
    pub const LIKERT: RangeInclusive<u8> = 1..=5;
    pub const AGE: RangeInclusive<u8> = 17..=30;
}

/// One student's answers in UI units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    /// Exercise grade bucket, 1 (fail) to 5 (very good).
    pub grade_bucket: u8,
    pub failures: u8,
    pub absences: u8,
    /// Weekly study time bucket: <2h, 2-5h, 5-10h, >10h.
    pub studytime: u8,
    pub health: u8,
    /// Commute bucket: <15min, 15-30min, 30min-1h, >1h.
    pub traveltime: u8,
    pub weekday_alcohol: u8,
    pub weekend_alcohol: u8,
    /// Sex code as used in the dataset (`F` or `M`).
    pub sex: String,
    pub romantic: bool,
    pub goout: u8,
    pub freetime: u8,
    pub age: u8,
}

impl Default for StudentForm {
    fn default() -> Self {
        StudentForm {
            grade_bucket: 3,
            failures: 0,
            absences: 4,
            studytime: 1,
            health: 5,
            traveltime: 1,
            weekday_alcohol: 1,
            weekend_alcohol: 2,
            sex: "F".to_string(),
            romantic: false,
            goout: 3,
            freetime: 3,
            age: 20,
        }
    }
}

fn check(field: &'static str, value: u8, range: RangeInclusive<u8>) -> Result<f32, InputError> {
    if range.contains(&value) {
        Ok(f32::from(value))
    } else {
        Err(InputError::OutOfRange {
            field,
            value: i64::from(value),
            min: i64::from(*range.start()),
            max: i64::from(*range.end()),
        })
    }
}

impl StudentForm {
    /// Validate the answers and encode them in schema order.
    pub fn to_feature_vector(&self) -> Result<FeatureVector, InputError> {
        check("grade_bucket", self.grade_bucket, ranges::GRADE_BUCKET)?;
        let grade = schema::grade_bucket_to_scale(self.grade_bucket).ok_or(
            InputError::OutOfRange {
                field: "grade_bucket",
                value: i64::from(self.grade_bucket),
                min: 1,
                max: 5,
            },
        )?;

        let sex = schema::SEX
            .encode(self.sex.trim())
            .ok_or_else(|| InputError::UnknownCategory {
                field: "sex",
                value: self.sex.clone(),
            })?;
        let romantic = schema::YES_NO
            .encode(if self.romantic { "yes" } else { "no" })
            .ok_or_else(|| InputError::UnknownCategory {
                field: "romantic",
                value: self.romantic.to_string(),
            })?;

        let mut values = [0.0f32; N_FEATURES];
        let mut put = |feature: Feature, value: f32| values[feature.index()] = value;

        put(Feature::ExerciseGrade, f32::from(grade));
        put(Feature::Failures, check("failures", self.failures, ranges::FAILURES)?);
        put(Feature::Absences, check("absences", self.absences, ranges::ABSENCES)?);
        put(Feature::StudyTime, check("studytime", self.studytime, ranges::STUDY_TIME)?);
        put(Feature::GoOut, check("goout", self.goout, ranges::LIKERT)?);
        put(Feature::Age, check("age", self.age, ranges::AGE)?);
        put(
            Feature::WeekendAlcohol,
            check("weekend_alcohol", self.weekend_alcohol, ranges::LIKERT)?,
        );
        put(
            Feature::WeekdayAlcohol,
            check("weekday_alcohol", self.weekday_alcohol, ranges::LIKERT)?,
        );
        put(Feature::Health, check("health", self.health, ranges::LIKERT)?);
        put(Feature::FreeTime, check("freetime", self.freetime, ranges::LIKERT)?);
        put(Feature::Romantic, f32::from(romantic));
        put(Feature::Sex, f32::from(sex));
        put(
            Feature::TravelTime,
            check("traveltime", self.traveltime, ranges::TRAVEL_TIME)?,
        );

        Ok(FeatureVector::new(values))
    }
}

/// Outcome of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub pass: bool,
    /// Probability of the pass class.
    pub probability: f64,
}

impl Prediction {
    /// Pass probability as a percentage.
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}

/// Predict pass/fail for one form submission.
pub fn predict(form: &StudentForm, artifact: &ModelArtifact) -> Result<Prediction, PredictError> {
    let features = form.to_feature_vector()?;
    predict_features(&features, artifact)
}

/// Predict from an already encoded feature vector.
pub fn predict_features(
    features: &FeatureVector,
    artifact: &ModelArtifact,
) -> Result<Prediction, PredictError> {
    let x = artifact.feature_row(features)?;
    let pass = artifact.classifier.predict(&x)?;
    let probability = artifact.classifier.predict_proba(&x)?;

    match (pass.first(), probability.first()) {
        (Some(&pass), Some(&probability)) => {
            log::debug!("Prediction: pass={} p={:.4}", pass, probability);
            Ok(Prediction { pass, probability })
        }
        _ => Err(crate::error::ModelError::NotFitted.into()),
    }
}
