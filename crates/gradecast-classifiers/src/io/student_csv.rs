//! Semicolon-separated student dataset reader.
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::DataError;

/// Field delimiter of the student performance dataset.
pub const DELIMITER: u8 = b';';

/// One dataset row keyed by header name.
///
/// Values are kept as raw text; empty values count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RawRecord {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `column`, or `None` when it is absent or empty.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether the record carries the column at all, empty or not.
    pub fn has(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Copy of the record with `column` replaced.
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.fields.insert(column.to_string(), value.to_string());
        self
    }

    /// Copy of the record without `column`.
    pub fn without(mut self, column: &str) -> Self {
        self.fields.remove(column);
        self
    }
}

/// A parsed dataset: header order plus raw records.
#[derive(Debug, Clone, Default)]
pub struct StudentTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl StudentTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a semicolon-separated student dataset.
pub fn read_student_csv<P: AsRef<Path>>(path: P) -> Result<StudentTable, DataError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path).map_err(|e| DataError::Csv {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let table = read_student_csv_from_reader(file).map_err(|source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "Read {} rows with {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Parse a dataset from any reader.
pub fn read_student_csv_from_reader<R: Read>(reader: R) -> Result<StudentTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record: StringRecord = result?;
        records.push(RawRecord {
            fields: headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect(),
        });
    }

    Ok(StudentTable { headers, records })
}
