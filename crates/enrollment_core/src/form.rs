//! Live field values and their validity, built from the schema.

use std::collections::HashMap;

use shared::domain::{ControlKind, FieldSpec, InputFilter, StepId};

use crate::schema::YES;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub spec: FieldSpec,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    invalid: bool,
    error: Option<String>,
}

impl FieldRecord {
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            value: String::new(),
            checked: false,
            required: spec.required_by_default,
            invalid: false,
            error: None,
        }
    }

    pub fn id(&self) -> &'static str {
        self.spec.id
    }

    pub fn is_checkbox(&self) -> bool {
        self.spec.control == ControlKind::Checkbox
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces any existing message rather than stacking a second one.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.invalid = true;
        self.error = Some(message.into());
    }

    /// Flags the field without an inline message; the caller reports the
    /// reason elsewhere.
    pub fn mark_invalid(&mut self) {
        self.invalid = true;
    }

    pub fn clear_error(&mut self) {
        self.invalid = false;
        self.error = None;
    }

    /// Whether the step validator has anything to check on this record.
    pub fn needs_validation(&self) -> bool {
        !self.is_checkbox() && (self.required || !self.value.trim().is_empty())
    }
}

/// Applies the field's character restriction and casing to a typed value.
pub fn filter_input(spec: &FieldSpec, raw: &str) -> String {
    let filtered: String = match spec.filter {
        InputFilter::None => raw.to_string(),
        InputFilter::Digits => raw.chars().filter(char::is_ascii_digit).collect(),
        InputFilter::Letters => raw.chars().filter(|c| is_name_char(*c)).collect(),
    };
    if spec.uppercases_input() {
        filtered.to_uppercase()
    } else {
        filtered
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c.is_whitespace()
        || matches!(
            c,
            'á' | 'é' | 'í' | 'ó' | 'ú' | 'Á' | 'É' | 'Í' | 'Ó' | 'Ú' | 'ñ' | 'Ñ' | 'ü' | 'Ü'
        )
}

#[derive(Debug, Clone)]
pub struct FormModel {
    records: Vec<FieldRecord>,
    index: HashMap<&'static str, usize>,
}

impl FormModel {
    pub fn new(specs: &[FieldSpec]) -> Self {
        let records: Vec<FieldRecord> = specs.iter().copied().map(FieldRecord::new).collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id(), pos))
            .collect();
        Self { records, index }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&FieldRecord> {
        self.index.get(id).map(|pos| &self.records[*pos])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut FieldRecord> {
        self.index.get(id).map(|pos| &mut self.records[*pos])
    }

    pub fn records(&self) -> impl Iterator<Item = &FieldRecord> {
        self.records.iter()
    }

    pub fn records_on_step_mut(&mut self, step: StepId) -> impl Iterator<Item = &mut FieldRecord> {
        self.records
            .iter_mut()
            .filter(move |record| record.spec.step == step)
    }

    pub fn has_step(&self, step: StepId) -> bool {
        self.records.iter().any(|record| record.spec.step == step)
    }

    pub fn value(&self, id: &str) -> &str {
        self.get(id).map(|record| record.value.as_str()).unwrap_or("")
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.get(id).is_some_and(|record| record.checked)
    }

    /// Stores a value as-is. Returns `false` when the field does not exist.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn set_required(&mut self, id: &str, required: bool) {
        if let Some(record) = self.get_mut(id) {
            record.required = required;
        }
    }

    /// Every submitted control as `(name, value)` parts in schema order.
    /// Checked checkboxes are sent as `"Sí"`; unchecked ones are omitted.
    pub fn submission_parts(&self) -> Vec<(String, String)> {
        self.records
            .iter()
            .filter(|record| record.spec.is_submitted())
            .filter_map(|record| {
                if record.is_checkbox() {
                    record
                        .checked
                        .then(|| (record.id().to_string(), YES.to_string()))
                } else {
                    Some((record.id().to_string(), record.value.clone()))
                }
            })
            .collect()
    }
}
