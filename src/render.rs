use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::InstructorTotal;
use crate::store::ScheduleEntry;
use crate::validate::{Field, FieldErrors};

/// Shared number formatter: at most two fraction digits, trailing zeros
/// trimmed, locale grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    group: String,
    decimal: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::for_locale("en")
    }
}

impl NumberFormat {
    pub fn for_locale(tag: &str) -> Self {
        let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
        let primary = tag.split('-').next().unwrap_or("");
        let (group, decimal) = match primary {
            "de" if tag == "de-ch" => ("\u{2019}", "."),
            "de" | "nl" | "it" | "es" | "pt" | "da" | "id" | "tr" => (".", ","),
            "fr" | "nb" | "sv" | "fi" | "pl" | "cs" | "ru" | "uk" => ("\u{202f}", ","),
            _ => (",", "."),
        };
        Self {
            group: group.to_string(),
            decimal: decimal.to_string(),
        }
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value < 0.0 { "-∞" } else { "∞" }.to_string();
        }

        let fixed = round_two_places(value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
        let frac = frac_part.trim_end_matches('0');

        let mut out = String::new();
        if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            out.push('-');
        }
        out.push_str(&self.group_digits(int_part));
        if !frac.is_empty() {
            out.push_str(&self.decimal);
            out.push_str(frac);
        }
        out
    }

    fn group_digits(&self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3 * self.group.len());
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(&self.group);
            }
            out.push(ch);
        }
        out
    }
}

/// Two-place decimal text for a non-negative finite value, with exact ties
/// rounded away from zero (`{:.2}` alone would round them to even).
fn round_two_places(abs: f64) -> String {
    // f64 fractions terminate within 1074 digits, so this expansion is exact.
    let exact = format!("{abs:.1100}");
    let Some((int_part, frac)) = exact.split_once('.') else {
        return format!("{abs:.2}");
    };
    let rest = &frac.as_bytes()[2..];
    let is_tie = rest.first() == Some(&b'5') && rest[1..].iter().all(|b| *b == b'0');
    if !is_tie {
        return format!("{abs:.2}");
    }

    let mut digits: Vec<u8> = int_part.bytes().chain(frac.bytes().take(2)).collect();
    let mut i = digits.len();
    loop {
        if i == 0 {
            digits.insert(0, b'1');
            break;
        }
        i -= 1;
        if digits[i] == b'9' {
            digits[i] = b'0';
        } else {
            digits[i] += 1;
            break;
        }
    }
    let split = digits.len() - 2;
    let text: String = digits.into_iter().map(char::from).collect();
    format!("{}.{}", &text[..split], &text[split..])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub id: String,
    pub instructor: String,
    pub class_name: String,
    pub duration: String,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoursRow {
    pub instructor: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<R> {
    pub rows: Vec<R>,
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub schedule: Table<ScheduleRow>,
    pub hours: Table<HoursRow>,
    pub errors: BTreeMap<Field, String>,
}

pub fn schedule_row(entry: &ScheduleEntry, format: &NumberFormat) -> ScheduleRow {
    ScheduleRow {
        id: entry.id.clone(),
        instructor: entry.instructor.clone(),
        class_name: entry.class_name.clone(),
        duration: format.format(entry.duration),
        room: entry.room.clone(),
    }
}

pub fn hours_row(total: &InstructorTotal, format: &NumberFormat) -> HoursRow {
    HoursRow {
        instructor: total.instructor.clone(),
        total: format.format(total.total),
    }
}

/// Rebuild both tables and the error slots from scratch.
pub fn render(
    entries: &[ScheduleEntry],
    totals: &[InstructorTotal],
    errors: &FieldErrors,
    format: &NumberFormat,
) -> View {
    View {
        schedule: Table {
            rows: entries.iter().map(|e| schedule_row(e, format)).collect(),
            empty: entries.is_empty(),
        },
        hours: Table {
            rows: totals.iter().map(|t| hours_row(t, format)).collect(),
            empty: totals.is_empty(),
        },
        errors: errors.clone(),
    }
}
