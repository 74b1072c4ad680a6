#![allow(dead_code)]
//! Synthetic student datasets in the UCI layout.
use std::path::{Path, PathBuf};

pub const HEADER: &str = "school;sex;age;address;famsize;Pstatus;Medu;Fedu;Mjob;Fjob;reason;guardian;traveltime;studytime;failures;schoolsup;famsup;paid;activities;nursery;higher;internet;romantic;famrel;freetime;goout;Dalc;Walc;health;absences;G1;G2;G3";

const JOBS: [&str; 5] = ["teacher", "health", "services", "at_home", "other"];
const REASONS: [&str; 4] = ["home", "reputation", "course", "other"];
const GUARDIANS: [&str; 3] = ["mother", "father", "other"];

/// One well-formed row. The final grade tracks the first-period grade, so
/// the label is learnable from `exercise_grade`.
pub fn row(i: usize) -> String {
    let g1 = (i * 7) % 20;
    let g3 = if g1 >= 10 { g1.min(18) + 1 } else { g1 / 2 };
    let yn = |k: usize| if (i + k) % 2 == 0 { "yes" } else { "no" };
    format!(
        "{school};{sex};{age};{address};{famsize};{pstatus};{medu};{fedu};{mjob};{fjob};{reason};{guardian};{travel};{study};{failures};{s1};{s2};{s3};{s4};{s5};{s6};{s7};{romantic};{famrel};{free};{goout};{dalc};{walc};{health};{absences};{g1};{g2};{g3}",
        school = if i % 3 == 0 { "MS" } else { "GP" },
        sex = if i % 2 == 0 { "F" } else { "M" },
        age = 15 + i % 7,
        address = if i % 4 == 0 { "R" } else { "U" },
        famsize = if i % 5 == 0 { "LE3" } else { "GT3" },
        pstatus = if i % 6 == 0 { "A" } else { "T" },
        medu = i % 5,
        fedu = (i + 2) % 5,
        mjob = JOBS[i % 5],
        fjob = JOBS[(i + 3) % 5],
        reason = REASONS[i % 4],
        guardian = GUARDIANS[i % 3],
        travel = 1 + i % 4,
        study = 1 + (i / 3) % 4,
        failures = if g1 < 6 { 1 + i % 3 } else { 0 },
        s1 = yn(1),
        s2 = yn(2),
        s3 = yn(3),
        s4 = yn(4),
        s5 = yn(5),
        s6 = yn(6),
        s7 = yn(7),
        romantic = yn(8),
        famrel = 1 + i % 5,
        free = 1 + (i / 2) % 5,
        goout = 1 + (i / 4) % 5,
        dalc = 1 + i % 3,
        walc = 1 + i % 5,
        health = 1 + (i / 5) % 5,
        absences = (i * 3) % 30,
        g1 = g1,
        g2 = g1,
        g3 = g3,
    )
}

/// Dataset text with `n` rows and optional extra raw lines appended.
pub fn dataset(n: usize, extra: &[String]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for i in 0..n {
        text.push_str(&row(i));
        text.push('\n');
    }
    for line in extra {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// Replace column `column` of a semicolon row.
pub fn set_field(line: &str, column: &str, value: &str) -> String {
    let idx = HEADER
        .split(';')
        .position(|c| c == column)
        .expect("unknown column");
    line.split(';')
        .enumerate()
        .map(|(i, v)| if i == idx { value } else { v })
        .collect::<Vec<_>>()
        .join(";")
}

/// Remove column `column` from header and rows of a dataset.
pub fn drop_column(text: &str, column: &str) -> String {
    let idx = HEADER
        .split(';')
        .position(|c| c == column)
        .expect("unknown column");
    text.lines()
        .map(|line| {
            line.split(';')
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, v)| v)
                .collect::<Vec<_>>()
                .join(";")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn write_dataset(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("student-mat.csv");
    std::fs::write(&path, text).expect("failed to write dataset");
    path
}
