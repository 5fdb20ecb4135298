//! Persistent memory shared by every tick of one run.

use crate::value::Value;
use std::collections::BTreeMap;

/// Ordered key/value store a program keeps across ticks.
///
/// Keys are dotted paths: `Set("nav.target", v)` stores `v` under the
/// `target` field of the record at `nav`, creating the record if needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryScope {
    entries: BTreeMap<String, Value>,
}

impl MemoryScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `path`, if every segment exists.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            match current {
                Value::Record(fields) => current = fields.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Value at `path`, or `""` when absent.
    pub fn get_or_empty(&self, path: &str) -> Value {
        self.get(path).cloned().unwrap_or_else(|| Value::str(""))
    }

    /// Store `value` at `path`. Intermediate segments that are missing or
    /// not records are replaced by empty records.
    pub fn set(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return,
        };
        let mut fields = &mut self.entries;
        for segment in parents {
            let slot = fields
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Record(BTreeMap::new()));
            if !matches!(slot, Value::Record(_)) {
                *slot = Value::Record(BTreeMap::new());
            }
            fields = match slot {
                Value::Record(inner) => inner,
                _ => return,
            };
        }
        fields.insert((*last).to_string(), value);
    }

    /// Remove the value at `path`. Returns whether anything was removed.
    pub fn kill(&mut self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        let mut fields = &mut self.entries;
        for segment in parents {
            fields = match fields.get_mut(*segment) {
                Some(Value::Record(inner)) => inner,
                _ => return false,
            };
        }
        fields.remove(*last).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Snapshot as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}
