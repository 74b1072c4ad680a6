//! Interactive terminal form.
//!
//! Prompts for every field of a [`StudentForm`], shows the verdict and offers
//! another round. An empty answer keeps the shown default, an invalid answer
//! asks again. End of input ends the session.
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

use anyhow::Result;

use gradecast_classifiers::artifact::ModelArtifact;
use gradecast_classifiers::error::PredictError;
use gradecast_classifiers::inference::{self, ranges, StudentForm};

use super::output::render_prediction;

const GRADE_OPTS: &[(u8, &str)] = &[
    (1, "fail"),
    (2, "poor / sufficient"),
    (3, "satisfactory"),
    (4, "good"),
    (5, "very good"),
];
const FREQ_OPTS: &[(u8, &str)] = &[
    (1, "very low"),
    (2, "low"),
    (3, "medium"),
    (4, "high"),
    (5, "very high"),
];
const HEALTH_OPTS: &[(u8, &str)] = &[
    (1, "very bad"),
    (2, "bad"),
    (3, "average"),
    (4, "good"),
    (5, "very good"),
];
const STUDY_OPTS: &[(u8, &str)] = &[(1, "<2h"), (2, "2-5h"), (3, "5-10h"), (4, ">10h")];
const TRAVEL_OPTS: &[(u8, &str)] = &[
    (1, "<15 min"),
    (2, "15-30 min"),
    (3, "30 min - 1h"),
    (4, ">1h"),
];

pub struct FormSession<'a, R, W> {
    input: R,
    output: W,
    artifact: &'a ModelArtifact,
}

impl<'a, R: BufRead, W: Write> FormSession<'a, R, W> {
    pub fn new(input: R, output: W, artifact: &'a ModelArtifact) -> Self {
        FormSession {
            input,
            output,
            artifact,
        }
    }

    /// Run rounds until the user declines another one or input ends.
    /// Returns the number of predictions shown.
    pub fn run(&mut self) -> Result<usize> {
        writeln!(self.output, "Will you pass the exam?")?;
        writeln!(
            self.output,
            "Enter your grades and habits. Press Enter to keep the value in brackets."
        )?;

        let mut shown = 0;
        loop {
            let Some(form) = self.read_form()? else {
                break;
            };

            writeln!(self.output)?;
            match inference::predict(&form, self.artifact) {
                Ok(prediction) => {
                    writeln!(self.output, "{}", render_prediction(&prediction))?;
                    shown += 1;
                }
                Err(PredictError::Schema(e)) => {
                    log::warn!("Schema error: {}", e);
                    writeln!(self.output, "Data error: {}", e)?;
                }
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }

            match self.ask_yes_no("\nAnother prediction?", false)? {
                Some(true) => continue,
                _ => break,
            }
        }
        Ok(shown)
    }

    fn read_form(&mut self) -> Result<Option<StudentForm>> {
        let d = StudentForm::default();
        let mut form = d.clone();

        writeln!(self.output, "\n-- Grades and studies --")?;
        let Some(v) = self.ask_number("Exercise grade", ranges::GRADE_BUCKET, d.grade_bucket, GRADE_OPTS)? else {
            return Ok(None);
        };
        form.grade_bucket = v;
        let Some(v) = self.ask_number("Failed courses", ranges::FAILURES, d.failures, &[])? else {
            return Ok(None);
        };
        form.failures = v;
        let Some(v) = self.ask_number("Hours of absence this term", ranges::ABSENCES, d.absences, &[])? else {
            return Ok(None);
        };
        form.absences = v;
        let Some(v) = self.ask_number("Weekly study time", ranges::STUDY_TIME, d.studytime, STUDY_OPTS)? else {
            return Ok(None);
        };
        form.studytime = v;

        writeln!(self.output, "\n-- Lifestyle and health --")?;
        let Some(v) = self.ask_number("Health", ranges::LIKERT, d.health, HEALTH_OPTS)? else {
            return Ok(None);
        };
        form.health = v;
        let Some(v) = self.ask_number("Commute time", ranges::TRAVEL_TIME, d.traveltime, TRAVEL_OPTS)? else {
            return Ok(None);
        };
        form.traveltime = v;
        let Some(v) = self.ask_number("Alcohol on weekdays", ranges::LIKERT, d.weekday_alcohol, FREQ_OPTS)? else {
            return Ok(None);
        };
        form.weekday_alcohol = v;
        let Some(v) = self.ask_number("Alcohol on weekends", ranges::LIKERT, d.weekend_alcohol, FREQ_OPTS)? else {
            return Ok(None);
        };
        form.weekend_alcohol = v;

        writeln!(self.output, "\n-- Other --")?;
        let Some(v) = self.ask_sex(&d.sex)? else {
            return Ok(None);
        };
        form.sex = v;
        let Some(v) = self.ask_number("Age", ranges::AGE, d.age, &[])? else {
            return Ok(None);
        };
        form.age = v;
        let Some(v) = self.ask_yes_no("In a relationship?", d.romantic)? else {
            return Ok(None);
        };
        form.romantic = v;
        let Some(v) = self.ask_number("Going out with friends", ranges::LIKERT, d.goout, FREQ_OPTS)? else {
            return Ok(None);
        };
        form.goout = v;
        let Some(v) = self.ask_number("Free time", ranges::LIKERT, d.freetime, FREQ_OPTS)? else {
            return Ok(None);
        };
        form.freetime = v;

        Ok(Some(form))
    }

    /// One line of input, trimmed. `None` at end of input.
    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_number(
        &mut self,
        label: &str,
        range: RangeInclusive<u8>,
        default: u8,
        options: &[(u8, &str)],
    ) -> Result<Option<u8>> {
        if !options.is_empty() {
            let listed: Vec<String> = options
                .iter()
                .map(|(code, text)| format!("{} = {}", code, text))
                .collect();
            writeln!(self.output, "  {}", listed.join(", "))?;
        }
        let prompt = format!("{} ({}-{}) [{}]", label, range.start(), range.end(), default);

        loop {
            let Some(answer) = self.read_answer(&prompt)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse::<u8>() {
                Ok(v) if range.contains(&v) => return Ok(Some(v)),
                _ => writeln!(
                    self.output,
                    "  Please enter a whole number from {} to {}.",
                    range.start(),
                    range.end()
                )?,
            }
        }
    }

    fn ask_sex(&mut self, default: &str) -> Result<Option<String>> {
        let prompt = format!("Sex (F = female, M = male) [{}]", default);
        loop {
            let Some(answer) = self.read_answer(&prompt)? else {
                return Ok(None);
            };
            match answer.to_uppercase().as_str() {
                "" => return Ok(Some(default.to_string())),
                "F" | "M" => return Ok(Some(answer.to_uppercase())),
                _ => writeln!(self.output, "  Please enter F or M.")?,
            }
        }
    }

    fn ask_yes_no(&mut self, label: &str, default: bool) -> Result<Option<bool>> {
        let prompt = format!("{} [{}]", label, if default { "Y/n" } else { "y/N" });
        loop {
            let Some(answer) = self.read_answer(&prompt)? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "  Please answer y or n.")?,
            }
        }
    }
}
