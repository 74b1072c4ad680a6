//! Held-out evaluation metrics for the binary pass/fail task.
//!
//! These numbers are reported to the operator and written to the training
//! report; nothing downstream makes decisions on them.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

fn check_lengths(y_true: &[bool], y_pred: &[bool]) -> Result<(), ModelError> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::PredictionCountMismatch {
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }
    Ok(())
}

/// Fraction of predictions equal to the truth; 0.0 for empty input.
pub fn accuracy(y_true: &[bool], y_pred: &[bool]) -> Result<f64, ModelError> {
    check_lengths(y_true, y_pred)?;
    if y_true.is_empty() {
        return Ok(0.0);
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(tp: usize, fp: usize, fn_: usize) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        ClassMetrics {
            precision,
            recall,
            f1,
            support: tp + fn_,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Per-class precision/recall/F1 with accuracy and averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub fail: ClassMetrics,
    pub pass: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn new(y_true: &[bool], y_pred: &[bool]) -> Result<Self, ModelError> {
        check_lengths(y_true, y_pred)?;

        let (mut tp, mut fp, mut tn, mut fn_) = (0, 0, 0, 0);
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t, p) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (false, false) => tn += 1,
                (true, false) => fn_ += 1,
            }
        }

        let pass = ClassMetrics::from_counts(tp, fp, fn_);
        let fail = ClassMetrics::from_counts(tn, fn_, fp);
        let total = y_true.len();

        let macro_avg = ClassMetrics {
            precision: (fail.precision + pass.precision) / 2.0,
            recall: (fail.recall + pass.recall) / 2.0,
            f1: (fail.f1 + pass.f1) / 2.0,
            support: total,
        };
        let weight = |m: &ClassMetrics| ratio(m.support, total);
        let weighted_avg = ClassMetrics {
            precision: fail.precision * weight(&fail) + pass.precision * weight(&pass),
            recall: fail.recall * weight(&fail) + pass.recall * weight(&pass),
            f1: fail.f1 * weight(&fail) + pass.f1 * weight(&pass),
            support: total,
        };

        Ok(ClassificationReport {
            fail,
            pass,
            accuracy: accuracy(y_true, y_pred)?,
            macro_avg,
            weighted_avg,
        })
    }

    /// `(row label, metrics)` for the four table rows, accuracy excluded.
    pub fn rows(&self) -> [(&'static str, &ClassMetrics); 4] {
        [
            ("fail", &self.fail),
            ("pass", &self.pass),
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ]
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, label: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        label, m.precision, m.recall, m.f1, m.support
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        write_row(f, "fail", &self.fail)?;
        write_row(f, "pass", &self.pass)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}
