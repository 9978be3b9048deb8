use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::store::ScheduleEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructorTotal {
    pub instructor: String,
    pub total: f64,
}

/// Sum durations per instructor, grouping names case-insensitively.
///
/// A group keeps the casing of the first entry seen for it. Groups come back
/// in collation order (see [`collate`]).
pub fn instructor_totals(entries: &[ScheduleEntry]) -> Vec<InstructorTotal> {
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<InstructorTotal> = Vec::new();

    for entry in entries {
        let key = entry.instructor.to_lowercase();
        match index_by_key.get(&key) {
            Some(&i) => totals[i].total += entry.duration,
            None => {
                index_by_key.insert(key, totals.len());
                totals.push(InstructorTotal {
                    instructor: entry.instructor.clone(),
                    total: entry.duration,
                });
            }
        }
    }

    totals.sort_by(|a, b| collate(&a.instructor, &b.instructor));
    totals
}

/// Base-sensitivity ordering: case and accents do not affect order.
/// Names that collate equal fall back to plain string order.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_key(a).cmp(&base_key(b)).then_with(|| a.cmp(b))
}

fn base_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(instructor: &str, duration: f64) -> ScheduleEntry {
        ScheduleEntry {
            id: format!("{instructor}-{duration}"),
            instructor: instructor.to_string(),
            class_name: "Class".to_string(),
            duration,
            room: "R".to_string(),
        }
    }

    #[test]
    fn groups_case_insensitively_keeping_first_casing() {
        let totals = instructor_totals(&[entry("Al", 1.0), entry("al", 2.0), entry("AL", 0.5)]);
        assert_eq!(
            totals,
            vec![InstructorTotal {
                instructor: "Al".to_string(),
                total: 3.5
            }]
        );
    }

    #[test]
    fn sorts_ignoring_case() {
        let totals = instructor_totals(&[entry("beta", 1.0), entry("Alpha", 2.0)]);
        let names: Vec<&str> = totals.iter().map(|t| t.instructor.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta"]);
    }

    #[test]
    fn sorts_ignoring_accents() {
        let totals = instructor_totals(&[
            entry("Zoe", 1.0),
            entry("Émile", 1.0),
            entry("edgar", 1.0),
            entry("Fay", 1.0),
        ]);
        let names: Vec<&str> = totals.iter().map(|t| t.instructor.as_str()).collect();
        assert_eq!(names, vec!["edgar", "Émile", "Fay", "Zoe"]);
    }

    #[test]
    fn accent_variants_stay_separate_groups_with_stable_tiebreak() {
        // Lowercase folding does not remove accents, so these are two groups
        // that collate equal; plain string order decides.
        let totals = instructor_totals(&[entry("José", 1.0), entry("Jose", 2.0)]);
        let names: Vec<&str> = totals.iter().map(|t| t.instructor.as_str()).collect();
        assert_eq!(names, vec!["Jose", "José"]);
    }

    #[test]
    fn empty_list_has_no_groups() {
        assert!(instructor_totals(&[]).is_empty());
    }
}
