//! gradecast-classifiers: pass/fail prediction for secondary school students.
//!
//! The crate covers the offline half (reading the semicolon separated
//! student dataset, encoding it into a fixed feature schema, training and
//! evaluating a classifier, persisting it as a JSON artifact) and the online
//! half (validating a single form submission and scoring it against a loaded
//! artifact). Both halves share the lookup tables in [`schema`].
pub mod artifact;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod inference;
pub mod io;
pub mod math;
pub mod metrics;
pub mod models;
pub mod report;
pub mod schema;
pub mod trainer;
