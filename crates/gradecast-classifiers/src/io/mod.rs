//! Readers for raw student datasets.
pub mod student_csv;

pub use student_csv::{read_student_csv, read_student_csv_from_reader, RawRecord, StudentTable};
