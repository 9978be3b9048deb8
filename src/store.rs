use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, warn};

/// One scheduled class session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub instructor: String,
    pub class_name: String,
    pub duration: f64,
    pub room: String,
}

/// A durable key-value location holding the serialized entry list.
pub trait Slot {
    fn read(&self) -> anyhow::Result<Option<String>>;
    fn write(&mut self, value: &str) -> anyhow::Result<()>;
}

/// Decode a stored payload, keeping only elements with a valid entry shape.
///
/// Returns `Err` only when the payload is not JSON or not an array; bad
/// elements are dropped without failing the whole payload.
pub fn parse_entries(text: &str) -> anyhow::Result<Vec<ScheduleEntry>> {
    // Elements stay raw until decoded one by one, so a number out of f64
    // range only costs the element holding it.
    let items: Vec<Box<RawValue>> =
        serde_json::from_str(text).context("stored schedule is not a JSON array")?;

    let total = items.len();
    let entries: Vec<ScheduleEntry> = items.iter().filter_map(|raw| entry_from_raw(raw)).collect();
    if entries.len() != total {
        debug!(
            dropped = total - entries.len(),
            kept = entries.len(),
            "dropped malformed schedule entries"
        );
    }
    Ok(entries)
}

fn entry_from_raw(raw: &RawValue) -> Option<ScheduleEntry> {
    if !raw.get().trim_start().starts_with('{') {
        return None;
    }
    let entry: ScheduleEntry = serde_json::from_str(raw.get()).ok()?;
    entry.duration.is_finite().then_some(entry)
}

/// Read the persisted list. Anything unusable yields an empty list.
pub fn load<S: Slot + ?Sized>(slot: &S) -> Vec<ScheduleEntry> {
    let stored = match slot.read() {
        Ok(Some(v)) => v,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "unable to read schedule from storage");
            return Vec::new();
        }
    };
    if stored.trim().is_empty() {
        return Vec::new();
    }

    match parse_entries(&stored) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "unable to load schedule from storage");
            Vec::new()
        }
    }
}

pub fn save<S: Slot + ?Sized>(slot: &mut S, entries: &[ScheduleEntry]) -> anyhow::Result<()> {
    let text = serde_json::to_string(entries)?;
    slot.write(&text)
}

pub fn add(entries: &[ScheduleEntry], entry: ScheduleEntry) -> Vec<ScheduleEntry> {
    let mut next = Vec::with_capacity(entries.len() + 1);
    next.extend_from_slice(entries);
    next.push(entry);
    next
}

pub fn remove_by_id(entries: &[ScheduleEntry], id: &str) -> Vec<ScheduleEntry> {
    entries.iter().filter(|e| e.id != id).cloned().collect()
}

pub fn clear() -> Vec<ScheduleEntry> {
    Vec::new()
}

#[cfg(test)]
pub struct MemorySlot {
    pub value: Option<String>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemorySlot {
    pub fn new(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            fail_writes: false,
        }
    }
}

#[cfg(test)]
impl Slot for MemorySlot {
    fn read(&self) -> anyhow::Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("quota exceeded");
        }
        self.value = Some(value.to_string());
        Ok(())
    }
}
