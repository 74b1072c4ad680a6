//! The feature schema shared by training and inference.
//!
//! Every constant that has to agree between the offline transformer and the
//! online façade lives here: the ordered list of retained features, the
//! fixed categorical lookup tables, the UI grade-bucket table and the pass
//! threshold. Nothing in this module is fitted from data.

use std::fmt;
use std::str::FromStr;

/// Column holding the final grade the label is derived from.
pub const LABEL_SOURCE_COLUMN: &str = "G3";

/// Column holding the second-period grade. Never used as a feature.
pub const DROPPED_GRADE_COLUMN: &str = "G2";

/// Final grade (0-20 scale) at or above which a student passes.
pub const PASS_THRESHOLD: f32 = 10.0;

/// Number of retained features.
pub const N_FEATURES: usize = 13;

/// The retained features, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    ExerciseGrade,
    Failures,
    Absences,
    StudyTime,
    GoOut,
    Age,
    WeekendAlcohol,
    WeekdayAlcohol,
    Health,
    FreeTime,
    Romantic,
    Sex,
    TravelTime,
}

impl Feature {
    /// All features in the order they are fed to a classifier.
    pub const ALL: [Feature; N_FEATURES] = [
        Feature::ExerciseGrade,
        Feature::Failures,
        Feature::Absences,
        Feature::StudyTime,
        Feature::GoOut,
        Feature::Age,
        Feature::WeekendAlcohol,
        Feature::WeekdayAlcohol,
        Feature::Health,
        Feature::FreeTime,
        Feature::Romantic,
        Feature::Sex,
        Feature::TravelTime,
    ];

    /// Name stored in the model artifact.
    pub fn name(self) -> &'static str {
        match self {
            Feature::ExerciseGrade => "exercise_grade",
            Feature::Failures => "failures",
            Feature::Absences => "absences",
            Feature::StudyTime => "studytime",
            Feature::GoOut => "goout",
            Feature::Age => "age",
            Feature::WeekendAlcohol => "Walc",
            Feature::WeekdayAlcohol => "Dalc",
            Feature::Health => "health",
            Feature::FreeTime => "freetime",
            Feature::Romantic => "romantic",
            Feature::Sex => "sex",
            Feature::TravelTime => "traveltime",
        }
    }

    /// Raw dataset column the feature is read from.
    ///
    /// Only `exercise_grade` differs from its name: it is the renamed `G1`.
    pub fn source_column(self) -> &'static str {
        match self {
            Feature::ExerciseGrade => "G1",
            other => other.name(),
        }
    }

    /// Position of the feature in [`Feature::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Lookup table applied to the raw text, if the column is categorical.
    pub fn table(self) -> Option<&'static CategoryTable> {
        table_for_column(self.source_column())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::from_name(s).ok_or_else(|| format!("Unknown feature: {}", s))
    }
}

/// Feature names in schema order, as stored in a freshly trained artifact.
pub fn feature_names() -> Vec<String> {
    Feature::ALL.iter().map(|f| f.name().to_string()).collect()
}

/// A fixed text-to-code mapping for one or more categorical columns.
#[derive(Debug, PartialEq, Eq)]
pub struct CategoryTable {
    pub columns: &'static [&'static str],
    pub entries: &'static [(&'static str, u8)],
}

impl CategoryTable {
    /// Code for `value`, or `None` when the value is outside the table.
    pub fn encode(&self, value: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|(label, _)| *label == value)
            .map(|(_, code)| *code)
    }

    pub fn decode(&self, code: u8) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(label, _)| *label)
    }

    pub fn applies_to(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }
}

pub const YES_NO: CategoryTable = CategoryTable {
    columns: &[
        "schoolsup",
        "famsup",
        "paid",
        "activities",
        "nursery",
        "higher",
        "internet",
        "romantic",
    ],
    entries: &[("yes", 1), ("no", 0)],
};

pub const SEX: CategoryTable = CategoryTable {
    columns: &["sex"],
    entries: &[("F", 1), ("M", 0)],
};

pub const SCHOOL: CategoryTable = CategoryTable {
    columns: &["school"],
    entries: &[("GP", 1), ("MS", 0)],
};

pub const ADDRESS: CategoryTable = CategoryTable {
    columns: &["address"],
    entries: &[("U", 1), ("R", 0)],
};

pub const FAMILY_SIZE: CategoryTable = CategoryTable {
    columns: &["famsize"],
    entries: &[("LE3", 1), ("GT3", 0)],
};

pub const PARENT_STATUS: CategoryTable = CategoryTable {
    columns: &["Pstatus"],
    entries: &[("T", 1), ("A", 0)],
};

pub const PARENT_JOB: CategoryTable = CategoryTable {
    columns: &["Mjob", "Fjob"],
    entries: &[
        ("teacher", 0),
        ("health", 1),
        ("services", 2),
        ("at_home", 3),
        ("other", 4),
    ],
};

pub const REASON: CategoryTable = CategoryTable {
    columns: &["reason"],
    entries: &[("home", 0), ("reputation", 1), ("course", 2), ("other", 3)],
};

pub const GUARDIAN: CategoryTable = CategoryTable {
    columns: &["guardian"],
    entries: &[("mother", 0), ("father", 1), ("other", 2)],
};

/// Every categorical table, yes/no included.
pub const CATEGORY_TABLES: [&CategoryTable; 9] = [
    &YES_NO,
    &SEX,
    &SCHOOL,
    &ADDRESS,
    &FAMILY_SIZE,
    &PARENT_STATUS,
    &PARENT_JOB,
    &REASON,
    &GUARDIAN,
];

/// Table used for a raw column, if it is categorical.
pub fn table_for_column(column: &str) -> Option<&'static CategoryTable> {
    CATEGORY_TABLES
        .iter()
        .copied()
        .find(|table| table.applies_to(column))
}

/// UI grade bucket (1-5) to a representative point on the 0-20 scale.
pub const GRADE_BUCKETS: [(u8, u8); 5] = [(1, 5), (2, 9), (3, 12), (4, 15), (5, 19)];

/// Training-scale grade for a UI bucket. No interpolation.
pub fn grade_bucket_to_scale(bucket: u8) -> Option<u8> {
    GRADE_BUCKETS
        .iter()
        .find(|(b, _)| *b == bucket)
        .map(|(_, grade)| *grade)
}

/// Derive the pass/fail label from a final grade.
pub fn label_from_final_grade(final_grade: f32) -> bool {
    final_grade >= PASS_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_order_is_fixed() {
        let names = feature_names();
        assert_eq!(
            names,
            vec![
                "exercise_grade",
                "failures",
                "absences",
                "studytime",
                "goout",
                "age",
                "Walc",
                "Dalc",
                "health",
                "freetime",
                "romantic",
                "sex",
                "traveltime",
            ]
        );
        for (i, f) in Feature::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
            assert_eq!(Feature::from_name(f.name()), Some(*f));
        }
    }

    #[test]
    fn exercise_grade_reads_g1() {
        assert_eq!(Feature::ExerciseGrade.source_column(), "G1");
        assert_eq!(Feature::Age.source_column(), "age");
        assert!(Feature::ALL.iter().all(|f| {
            f.source_column() != DROPPED_GRADE_COLUMN && f.source_column() != LABEL_SOURCE_COLUMN
        }));
    }

    #[test]
    fn lookup_codes_match_table() {
        assert_eq!(SEX.encode("F"), Some(1));
        assert_eq!(SEX.encode("M"), Some(0));
        assert_eq!(SCHOOL.encode("GP"), Some(1));
        assert_eq!(PARENT_JOB.encode("at_home"), Some(3));
        assert_eq!(REASON.encode("reputation"), Some(1));
        assert_eq!(GUARDIAN.encode("other"), Some(2));
        assert_eq!(SEX.encode("X"), None);
        assert_eq!(SEX.decode(1), Some("F"));
    }

    #[test]
    fn both_job_columns_share_one_table() {
        assert_eq!(table_for_column("Mjob"), Some(&PARENT_JOB));
        assert_eq!(table_for_column("Fjob"), Some(&PARENT_JOB));
        assert_eq!(table_for_column("romantic"), Some(&YES_NO));
        assert_eq!(table_for_column("absences"), None);
        assert_eq!(Feature::Romantic.table(), Some(&YES_NO));
        assert_eq!(Feature::Sex.table(), Some(&SEX));
    }

    #[test]
    fn grade_buckets_are_exact() {
        assert_eq!(grade_bucket_to_scale(1), Some(5));
        assert_eq!(grade_bucket_to_scale(2), Some(9));
        assert_eq!(grade_bucket_to_scale(3), Some(12));
        assert_eq!(grade_bucket_to_scale(4), Some(15));
        assert_eq!(grade_bucket_to_scale(5), Some(19));
        assert_eq!(grade_bucket_to_scale(0), None);
        assert_eq!(grade_bucket_to_scale(6), None);
    }

    #[test]
    fn label_boundaries() {
        assert!(!label_from_final_grade(0.0));
        assert!(!label_from_final_grade(9.0));
        assert!(label_from_final_grade(10.0));
        assert!(label_from_final_grade(20.0));
    }
}
