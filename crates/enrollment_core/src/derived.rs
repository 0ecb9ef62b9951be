//! Values computed from other fields: age, the sibling panel, the
//! cancellation-reasons summary and the photo attachment.

use std::collections::BTreeSet;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Datelike, NaiveDate};
use shared::domain::ChoiceOption;

use crate::{
    form::FormModel,
    schema::{SIBLING_DEPENDENTS, YES},
};

pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";
pub const EMPTY_SELECTION_LABEL: &str = "Selecciona";

/// Whole years elapsed, minus one while this year's birthday is still ahead.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Age text for the read-only age field: empty when the birth date is blank,
/// unparseable or in the future.
pub fn age_text(birth_date: &str, today: NaiveDate) -> String {
    let birth_date = birth_date.trim();
    if birth_date.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(birth_date, BIRTH_DATE_FORMAT) {
        Ok(birth) => {
            let age = age_in_years(birth, today);
            if age >= 0 {
                age.to_string()
            } else {
                String::new()
            }
        }
        Err(err) => {
            tracing::debug!(birth_date, %err, "unparseable birth date");
            String::new()
        }
    }
}

/// Shows or hides the sibling panel. Returns whether the panel is visible.
pub fn apply_sibling_selection(form: &mut FormModel, selection: &str) -> bool {
    let has_sibling = selection == YES;
    for id in SIBLING_DEPENDENTS {
        form.set_required(id, has_sibling);
        if !has_sibling {
            if let Some(record) = form.get_mut(id) {
                record.value.clear();
                record.clear_error();
            }
        }
    }
    has_sibling
}

/// A checkbox group collapsed into one joined value plus a display summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGroup {
    options: Vec<ChoiceOption>,
    selected: BTreeSet<usize>,
    panel_open: bool,
}

impl ChoiceGroup {
    pub fn new(options: Vec<ChoiceOption>) -> Self {
        Self {
            options,
            selected: BTreeSet::new(),
            panel_open: false,
        }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.position(value)
            .is_some_and(|pos| self.selected.contains(&pos))
    }

    /// Returns `false` when no option carries that value.
    pub fn set(&mut self, value: &str, checked: bool) -> bool {
        let Some(pos) = self.position(value) else {
            return false;
        };
        if checked {
            self.selected.insert(pos);
        } else {
            self.selected.remove(&pos);
        }
        true
    }

    /// Selects exactly the options named in a comma-separated stored value.
    pub fn load_joined(&mut self, joined: &str) {
        let wanted: Vec<&str> = joined.split(',').map(str::trim).collect();
        self.selected = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| wanted.contains(&option.value.as_str()))
            .map(|(pos, _)| pos)
            .collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Canonical values of the selected options, in option order.
    pub fn joined_value(&self) -> String {
        self.selected_options()
            .map(|option| option.value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn summary_label(&self) -> String {
        if self.selected.is_empty() {
            return EMPTY_SELECTION_LABEL.to_string();
        }
        self.selected_options()
            .map(|option| option.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    fn position(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|option| option.value == value)
    }

    fn selected_options(&self) -> impl Iterator<Item = &ChoiceOption> {
        self.selected.iter().map(|pos| &self.options[*pos])
    }
}

/// Encodes file bytes as a `data:` URI, guessing the MIME type from the name.
pub fn encode_data_uri(filename: &str, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes))
}
