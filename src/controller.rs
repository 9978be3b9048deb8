use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate;
use crate::render::{self, NumberFormat, View};
use crate::store::{self, ScheduleEntry, Slot};
use crate::validate::{self, Field, FieldErrors, FormInput};

pub const CLEAR_ALL_PROMPT: &str =
    "This will remove all scheduled sessions. Do you want to continue?";

pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Synchronous yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub values: BTreeMap<Field, String>,
    pub errors: FieldErrors,
    pub focus: Option<Field>,
}

impl FormState {
    fn value(&self, field: Field) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    pub fn input(&self) -> FormInput {
        FormInput {
            instructor: self.value(Field::Instructor),
            class_name: self.value(Field::ClassName),
            duration: self.value(Field::Duration),
            room: self.value(Field::Room),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Added { entry: ScheduleEntry, persisted: bool },
    Rejected(FieldErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    AlreadyEmpty,
    Declined,
    Cleared { persisted: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: bool,
    pub persisted: bool,
}

/// Owns the entry list and everything that reads or writes it.
pub struct Controller<S: Slot, G: IdGenerator> {
    slot: S,
    ids: G,
    entries: Vec<ScheduleEntry>,
    form: FormState,
    format: NumberFormat,
}

impl<S: Slot, G: IdGenerator> Controller<S, G> {
    pub fn open(slot: S, ids: G, format: NumberFormat) -> Self {
        let entries = store::load(&slot);
        info!(entries = entries.len(), "schedule loaded");
        Self {
            slot,
            ids,
            entries,
            form: FormState::default(),
            format,
        }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn view(&self) -> View {
        let totals = aggregate::instructor_totals(&self.entries);
        render::render(&self.entries, &totals, &self.form.errors, &self.format)
    }

    /// Record a new field value, hiding that field's error if one is shown.
    pub fn edit_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.values.insert(field, value.into());
        if self.form.errors.remove(&field).is_some() {
            debug!(field = field.name(), "cleared field error");
        }
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        self.form.errors.clear();

        let candidate = match validate::validate(&self.form.input()) {
            Ok(c) => c,
            Err(errors) => {
                debug!(fields = errors.len(), "submission rejected");
                self.form.errors = errors.clone();
                return SubmitOutcome::Rejected(errors);
            }
        };

        let entry = ScheduleEntry {
            id: self.ids.next_id(),
            instructor: candidate.instructor,
            class_name: candidate.class_name,
            duration: candidate.duration,
            room: candidate.room,
        };
        let next = store::add(&self.entries, entry.clone());
        let persisted = self.commit(next);

        self.form.values.clear();
        self.form.focus = Some(Field::Instructor);

        SubmitOutcome::Added { entry, persisted }
    }

    pub fn delete(&mut self, id: &str) -> DeleteOutcome {
        let next = store::remove_by_id(&self.entries, id);
        let removed = next.len() != self.entries.len();
        let persisted = self.commit(next);
        DeleteOutcome { removed, persisted }
    }

    pub fn clear_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) -> ClearOutcome {
        if self.entries.is_empty() {
            return ClearOutcome::AlreadyEmpty;
        }
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            return ClearOutcome::Declined;
        }
        let persisted = self.commit(store::clear());
        ClearOutcome::Cleared { persisted }
    }

    /// Swap in a whole list, e.g. one restored from a backup bundle.
    pub fn replace_all(&mut self, entries: Vec<ScheduleEntry>) -> bool {
        self.commit(entries)
    }

    fn commit(&mut self, next: Vec<ScheduleEntry>) -> bool {
        self.entries = next;
        match store::save(&mut self.slot, &self.entries) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "unable to save schedule to storage");
                false
            }
        }
    }
}
