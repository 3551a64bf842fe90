use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// StudentRecord – one data line of the roster
// ---------------------------------------------------------------------------

/// A parsed data line. Both values are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub first_name: String,
    /// Field of study, the grouping key.
    pub field: String,
}

impl StudentRecord {
    pub fn new(first_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            field: field.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldGroup / FieldGroups – names bucketed by field of study
// ---------------------------------------------------------------------------

/// First names of every student in one field, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    pub field: String,
    pub names: Vec<String>,
}

impl FieldGroup {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Insertion-ordered map: field → [`FieldGroup`].
///
/// Fields iterate in the order they were first seen; `index` maps a field
/// name to its slot in `groups`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldGroups {
    groups: Vec<FieldGroup>,
    index: HashMap<String, usize>,
}

impl FieldGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record's first name to the bucket for its field.
    pub fn push(&mut self, record: &StudentRecord) {
        let slot = match self.index.get(&record.field) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.groups.push(FieldGroup {
                    field: record.field.clone(),
                    names: Vec::new(),
                });
                self.index.insert(record.field.clone(), slot);
                slot
            }
        };
        self.groups[slot].names.push(record.first_name.clone());
    }

    pub fn get(&self, field: &str) -> Option<&FieldGroup> {
        self.index.get(field).map(|&slot| &self.groups[slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldGroup> {
        self.groups.iter()
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldGroups {
    type Item = &'a FieldGroup;
    type IntoIter = std::slice::Iter<'a, FieldGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl<'a> FromIterator<&'a StudentRecord> for FieldGroups {
    fn from_iter<I: IntoIterator<Item = &'a StudentRecord>>(iter: I) -> Self {
        let mut groups = FieldGroups::new();
        for record in iter {
            groups.push(record);
        }
        groups
    }
}

// ---------------------------------------------------------------------------
// Roster – the complete parsed file
// ---------------------------------------------------------------------------

/// The parsed roster with its field index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    /// Valid records in file order.
    pub students: Vec<StudentRecord>,
    pub groups: FieldGroups,
    /// Data lines dropped for lacking a first name or a field.
    pub skipped: usize,
}

impl Roster {
    /// Build the field index from the parsed records.
    pub fn from_records(students: Vec<StudentRecord>, skipped: usize) -> Self {
        let groups = students.iter().collect();
        Roster {
            students,
            groups,
            skipped,
        }
    }

    /// Number of valid students.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
