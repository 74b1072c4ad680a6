//! Preview of a cleaned dataset.
use anyhow::Result;
use std::io::Write;
use std::path::Path;

use gradecast_classifiers::data_handling::{transform, TransformedData};
use gradecast_classifiers::io::read_student_csv;

/// Transform `path` and print shape, drop counts and the first `n_rows` rows.
pub fn run(path: &Path, n_rows: usize) -> Result<()> {
    let table = read_student_csv(path)?;
    let data = transform(&table.records);
    let stdout = std::io::stdout();
    write_preview(&mut stdout.lock(), &data, n_rows)
}

pub fn write_preview<W: Write>(out: &mut W, data: &TransformedData, n_rows: usize) -> Result<()> {
    writeln!(out, "Shape: ({}, {})", data.len(), data.x.ncols())?;
    writeln!(out, "{}", data.summary)?;
    writeln!(
        out,
        "Pass: {}, fail: {}",
        data.n_pass(),
        data.len() - data.n_pass()
    )?;
    writeln!(out)?;

    let mut header: Vec<String> = data
        .feature_names
        .iter()
        .map(|n| format!("{:>14}", n))
        .collect();
    header.push(format!("{:>6}", "pass"));
    writeln!(out, "{}", header.join(""))?;

    for row in 0..n_rows.min(data.len()) {
        let mut cells: Vec<String> = data
            .x
            .row_slice(row)
            .iter()
            .map(|v| format!("{:>14}", v))
            .collect();
        cells.push(format!("{:>6}", if data.y[row] { 1 } else { 0 }));
        writeln!(out, "{}", cells.join(""))?;
    }
    Ok(())
}
