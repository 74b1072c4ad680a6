//! Cleaning raw student records into the fixed feature schema.
//!
//! `transform` is the offline half of the schema contract: it drops rows it
//! cannot map instead of failing, and counts why. The online half is
//! `inference::StudentForm`, which rejects the same kind of input outright.
use std::fmt;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::io::RawRecord;
use crate::math::Array2;
use crate::schema::{self, Feature, N_FEATURES};

/// One record encoded in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f32; N_FEATURES],
}

impl FeatureVector {
    pub fn new(values: [f32; N_FEATURES]) -> Self {
        FeatureVector { values }
    }

    pub fn get(&self, feature: Feature) -> f32 {
        self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f32) {
        self.values[feature.index()] = value;
    }

    /// Value for an artifact feature name, if the schema knows it.
    pub fn value_of(&self, name: &str) -> Option<f32> {
        Feature::from_name(name).map(|f| self.get(f))
    }

    pub fn into_array(self) -> [f32; N_FEATURES] {
        self.values
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        Feature::ALL.iter().map(move |f| (f.name(), self.get(*f)))
    }
}

/// Why a row was left out of the transformed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// `G3` absent or not a number.
    MissingLabel,
    /// A categorical or yes/no value outside its lookup table, or empty.
    UnmappableCategory,
    /// A retained feature absent or not a number, or any carried column empty.
    MissingFeature,
}

/// Row counts of a transform run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransformSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped_missing_label: usize,
    pub dropped_unmappable: usize,
    pub dropped_missing_feature: usize,
}

impl TransformSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingLabel => self.dropped_missing_label += 1,
            DropReason::UnmappableCategory => self.dropped_unmappable += 1,
            DropReason::MissingFeature => self.dropped_missing_feature += 1,
        }
    }
}

impl fmt::Display for TransformSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} kept ({} without label, {} with unmappable categories, {} with missing features)",
            self.rows_read,
            self.rows_kept,
            self.dropped_missing_label,
            self.dropped_unmappable,
            self.dropped_missing_feature
        )
    }
}

/// Feature matrix and labels ready for a classifier.
#[derive(Debug, Clone)]
pub struct TransformedData {
    /// Rows are records, columns follow `feature_names`.
    pub x: Array2<f32>,
    /// `true` for pass.
    pub y: Vec<bool>,
    pub feature_names: Vec<String>,
    pub summary: TransformSummary,
}

impl TransformedData {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Feature vector of row `row`.
    pub fn feature_vector(&self, row: usize) -> FeatureVector {
        let mut values = [0.0; N_FEATURES];
        values.copy_from_slice(self.x.row_slice(row));
        FeatureVector::new(values)
    }

    pub fn n_pass(&self) -> usize {
        self.y.iter().filter(|&&v| v).count()
    }

    pub fn log_summary(&self) {
        log::info!("----- Training Data Summary -----");
        log::info!("{}", self.summary);
        log::info!(
            "{} passing and {} failing students, {} features",
            self.n_pass(),
            self.len() - self.n_pass(),
            self.x.ncols()
        );
        log::info!("---------------------------------");
    }
}

/// Encode raw records into the retained feature schema.
///
/// Rows with a missing label, an unmappable categorical value, an empty
/// value in any carried column or a missing retained feature are excluded.
/// No values are imputed.
pub fn transform(records: &[RawRecord]) -> TransformedData {
    let mut rows = Vec::with_capacity(records.len());
    let mut y = Vec::with_capacity(records.len());
    let mut summary = TransformSummary {
        rows_read: records.len(),
        ..Default::default()
    };

    for (row_idx, record) in records.iter().enumerate() {
        match transform_record(record) {
            Ok((features, label)) => {
                rows.push(features.into_array());
                y.push(label);
            }
            Err(reason) => {
                log::trace!("Dropping row {}: {:?}", row_idx + 1, reason);
                summary.record_drop(reason);
            }
        }
    }

    summary.rows_kept = y.len();
    if summary.rows_dropped() > 0 {
        log::debug!("Dropped {} of {} rows", summary.rows_dropped(), summary.rows_read);
    }

    TransformedData {
        x: Array2::from_rows(rows),
        y,
        feature_names: schema::feature_names(),
        summary,
    }
}

/// Encode a single record, or report why it cannot be used.
pub fn transform_record(record: &RawRecord) -> Result<(FeatureVector, bool), DropReason> {
    let label = record
        .get(schema::LABEL_SOURCE_COLUMN)
        .and_then(parse_number)
        .map(schema::label_from_final_grade)
        .ok_or(DropReason::MissingLabel)?;

    // Every categorical column the record carries must map, retained or not.
    for column in record.columns() {
        if let Some(table) = schema::table_for_column(column) {
            let mapped = record.get(column).and_then(|v| table.encode(v));
            if mapped.is_none() {
                return Err(DropReason::UnmappableCategory);
            }
        }
    }

    // Any other carried column left empty drops the row too. G2 leaves the
    // table before cleaning, so its value is never looked at.
    let has_gap = record
        .columns()
        .filter(|&c| c != schema::DROPPED_GRADE_COLUMN)
        .any(|c| record.get(c).is_none());
    if has_gap {
        return Err(DropReason::MissingFeature);
    }

    let mut features = FeatureVector::new([0.0; N_FEATURES]);
    for feature in Feature::ALL {
        let raw = record
            .get(feature.source_column())
            .ok_or(DropReason::MissingFeature)?;
        let value = match feature.table() {
            Some(table) => table
                .encode(raw)
                .map(f32::from)
                .ok_or(DropReason::UnmappableCategory)?,
            None => parse_number(raw).ok_or(DropReason::MissingFeature)?,
        };
        features.set(feature, value);
    }

    Ok((features, label))
}

fn parse_number(raw: &str) -> Option<f32> {
    raw.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Reproducible train/evaluation split of `n_samples` row indices.
///
/// Indices are shuffled with a seeded ChaCha generator; the first
/// `ceil(n_samples * test_fraction)` shuffled indices form the evaluation
/// partition. Returns `(train, test)`, each sorted ascending.
pub fn train_test_split(n_samples: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(&mut rng);

    let n_test = ((n_samples as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(n_samples);
    let mut test = indices[..n_test].to_vec();
    let mut train = indices[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    (train, test)
}
