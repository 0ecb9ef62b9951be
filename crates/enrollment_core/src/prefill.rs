//! Merging a looked-up record into the live form.

use serde_json::Value;
use shared::protocol::PrefillRecord;

use crate::{derived::ChoiceGroup, form::FormModel, schema::{CANCELLATION, YES}};

/// Overwrites every field whose id appears in `record`. Keys with no matching
/// field are ignored. Returns the ids that were written.
pub fn apply_record(
    form: &mut FormModel,
    cancellation: &mut ChoiceGroup,
    record: &PrefillRecord,
) -> Vec<&'static str> {
    let mut applied = Vec::new();
    for (key, value) in record {
        let Some(field) = form.get_mut(key) else {
            tracing::debug!(field = %key, "prefill key has no matching field");
            continue;
        };
        if field.is_checkbox() {
            field.checked = is_affirmative(value);
        } else {
            field.value = value_text(value);
            if key == CANCELLATION {
                cancellation.load_joined(&field.value);
            }
        }
        applied.push(field.id());
    }
    applied
}

fn is_affirmative(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text == YES,
        _ => false,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
