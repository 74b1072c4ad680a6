//! Row-major matrix used for feature tables.
//!
//! Rows are samples and columns follow the schema order. The container is
//! deliberately small; classifiers only need row access and row selection.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
