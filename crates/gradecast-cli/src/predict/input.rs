use clap::{Arg, ArgAction, ArgMatches};

use gradecast_classifiers::inference::StudentForm;

/// `(argument id, help)` of the numeric form fields.
const NUMERIC_FIELDS: [(&str, &str); 11] = [
    ("grade", "Exercise grade, 1 (fail) to 5 (very good)"),
    ("failures", "Number of past failed courses, 0-4"),
    ("absences", "Hours of absence this term, 0-93"),
    ("studytime", "Weekly study time: 1 <2h, 2 2-5h, 3 5-10h, 4 >10h"),
    ("health", "Health, 1 (very bad) to 5 (very good)"),
    ("traveltime", "Commute: 1 <15min, 2 15-30min, 3 30min-1h, 4 >1h"),
    ("dalc", "Alcohol on weekdays, 1 (very low) to 5 (very high)"),
    ("walc", "Alcohol on weekends, 1 (very low) to 5 (very high)"),
    ("goout", "Going out with friends, 1 (very low) to 5 (very high)"),
    ("freetime", "Free time after school, 1 (very low) to 5 (very high)"),
    ("age", "Age in years, 17-30"),
];

/// Command line arguments describing one student. Omitted fields take the
/// `StudentForm` defaults.
pub fn form_args() -> Vec<Arg> {
    let mut args: Vec<Arg> = NUMERIC_FIELDS
        .iter()
        .map(|(id, help)| {
            Arg::new(*id)
                .long(*id)
                .help(*help)
                .value_parser(clap::value_parser!(u8))
        })
        .collect();

    args.push(
        Arg::new("sex")
            .long("sex")
            .help("Sex as coded in the dataset")
            .value_parser(["F", "M"])
            .ignore_case(true),
    );
    args.push(
        Arg::new("romantic")
            .long("romantic")
            .help("Student is in a romantic relationship")
            .action(ArgAction::SetTrue),
    );
    args
}

/// Read a `StudentForm` from arguments built by [`form_args`].
pub fn student_form_from_arguments(matches: &ArgMatches) -> StudentForm {
    let mut form = StudentForm::default();
    let number = |id: &str, fallback: u8| matches.get_one::<u8>(id).copied().unwrap_or(fallback);

    form.grade_bucket = number("grade", form.grade_bucket);
    form.failures = number("failures", form.failures);
    form.absences = number("absences", form.absences);
    form.studytime = number("studytime", form.studytime);
    form.health = number("health", form.health);
    form.traveltime = number("traveltime", form.traveltime);
    form.weekday_alcohol = number("dalc", form.weekday_alcohol);
    form.weekend_alcohol = number("walc", form.weekend_alcohol);
    form.goout = number("goout", form.goout);
    form.freetime = number("freetime", form.freetime);
    form.age = number("age", form.age);
    if let Some(sex) = matches.get_one::<String>("sex") {
        form.sex = sex.to_uppercase();
    }
    form.romantic = matches.get_flag("romantic");
    form
}
