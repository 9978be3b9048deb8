use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Instructor,
    ClassName,
    Duration,
    Room,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Instructor,
        Field::ClassName,
        Field::Duration,
        Field::Room,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Instructor => "instructor",
            Field::ClassName => "className",
            Field::Duration => "duration",
            Field::Room => "room",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

pub type FieldErrors = BTreeMap<Field, String>;

pub const INSTRUCTOR_REQUIRED: &str = "Instructor name is required.";
pub const CLASS_NAME_REQUIRED: &str = "Class name is required.";
pub const DURATION_INVALID: &str = "Duration must be a positive number.";
pub const ROOM_REQUIRED: &str = "Room is required.";

/// Raw, untrimmed form values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub instructor: String,
    pub class_name: String,
    pub duration: String,
    pub room: String,
}

/// A submission that passed validation: strings trimmed, duration parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub instructor: String,
    pub class_name: String,
    pub duration: f64,
    pub room: String,
}

/// Run every rule and report every failing field together.
pub fn validate(input: &FormInput) -> Result<Candidate, FieldErrors> {
    let mut errors = FieldErrors::new();

    let instructor = input.instructor.trim();
    if instructor.is_empty() {
        errors.insert(Field::Instructor, INSTRUCTOR_REQUIRED.to_string());
    }

    let class_name = input.class_name.trim();
    if class_name.is_empty() {
        errors.insert(Field::ClassName, CLASS_NAME_REQUIRED.to_string());
    }

    let duration = parse_duration(&input.duration);
    if duration.is_none() {
        errors.insert(Field::Duration, DURATION_INVALID.to_string());
    }

    let room = input.room.trim();
    if room.is_empty() {
        errors.insert(Field::Room, ROOM_REQUIRED.to_string());
    }

    match duration {
        Some(duration) if errors.is_empty() => Ok(Candidate {
            instructor: instructor.to_string(),
            class_name: class_name.to_string(),
            duration,
            room: room.to_string(),
        }),
        _ => Err(errors),
    }
}

/// Reads the longest leading decimal number, so "1.5h" is 1.5 and
/// "2 hours" is 2; trailing text is ignored.
fn parse_duration(raw: &str) -> Option<f64> {
    let prefix = numeric_prefix(raw.trim_start());
    if prefix.is_empty() {
        return None;
    }
    let v = prefix.parse::<f64>().ok()?;
    (v.is_finite() && v > 0.0).then_some(v)
}

fn numeric_prefix(s: &str) -> &str {
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let sign = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let mut end = digits_from(sign);
    let mut digit_count = end - sign;
    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digit_count += frac_end - (end + 1);
        end = frac_end;
    }
    if digit_count == 0 {
        return "";
    }

    if matches!(b.get(end), Some(b'e' | b'E')) {
        let exp_sign = usize::from(matches!(b.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + exp_sign);
        if exp_end > end + 1 + exp_sign {
            end = exp_end;
        }
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(instructor: &str, class_name: &str, duration: &str, room: &str) -> FormInput {
        FormInput {
            instructor: instructor.to_string(),
            class_name: class_name.to_string(),
            duration: duration.to_string(),
            room: room.to_string(),
        }
    }

    #[test]
    fn accepts_and_trims_valid_input() {
        let c = validate(&input("  Ana ", "Yoga\t", " 1.5 ", " Studio 2 ")).expect("valid");
        assert_eq!(c.instructor, "Ana");
        assert_eq!(c.class_name, "Yoga");
        assert_eq!(c.duration, 1.5);
        assert_eq!(c.room, "Studio 2");
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = validate(&input("   ", "Yoga", "abc", "A1")).expect_err("invalid");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[&Field::Instructor], INSTRUCTOR_REQUIRED);
        assert_eq!(errors[&Field::Duration], DURATION_INVALID);

        let errors = validate(&FormInput::default()).expect_err("empty form");
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[&Field::ClassName], CLASS_NAME_REQUIRED);
        assert_eq!(errors[&Field::Room], ROOM_REQUIRED);
    }

    #[test]
    fn duration_must_be_finite_and_positive() {
        for raw in ["0", "-1", "", "abc", ".", "-", "inf", "NaN", "Infinity", "1e400", "0x10", "h2"] {
            let errors = validate(&input("Ana", "Yoga", raw, "A1")).expect_err(raw);
            assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![Field::Duration]);
        }
        assert_eq!(validate(&input("Ana", "Yoga", "0.01", "A1")).expect("tiny").duration, 0.01);
        assert_eq!(validate(&input("Ana", "Yoga", "3", "A1")).expect("int").duration, 3.0);
    }

    #[test]
    fn duration_reads_leading_number_and_ignores_trailing_text() {
        let cases = [
            ("1.5h", 1.5),
            ("2 hours", 2.0),
            ("  .5", 0.5),
            ("4.", 4.0),
            ("+2", 2.0),
            ("3e2x", 300.0),
            ("1e", 1.0),
            ("1.25e-1 hrs", 0.125),
            ("2.5.1", 2.5),
        ];
        for (raw, expected) in cases {
            let c = validate(&input("Ana", "Yoga", raw, "A1")).expect(raw);
            assert_eq!(c.duration, expected, "{raw}");
        }
    }

    #[test]
    fn field_names_round_trip() {
        for f in Field::ALL {
            assert_eq!(Field::from_name(f.name()), Some(f));
        }
        assert_eq!(Field::from_name("class_name"), None);
    }
}
