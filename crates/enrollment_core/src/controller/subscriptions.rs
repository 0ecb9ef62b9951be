//! Event subscription table, built once from the schema.

use std::collections::HashMap;

use shared::{domain::FieldSpec, protocol::BackendCommand};

use super::FormController;
use crate::schema::{BIRTH_DATE, ENABLE_FATHER, ENABLE_MOTHER, HAS_SIBLING, LOOKUP_FIELDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Input,
    Change,
    Blur,
    Toggle,
}

pub type Handler = fn(&mut FormController, &'static str) -> Vec<BackendCommand>;

#[derive(Default)]
pub struct Subscriptions {
    table: HashMap<&'static str, HashMap<Trigger, Vec<Handler>>>,
}

impl Subscriptions {
    pub fn build(specs: &[FieldSpec]) -> Self {
        let mut subs = Self::default();
        for spec in specs {
            if LOOKUP_FIELDS.contains(&spec.id) {
                subs.on(spec.id, Trigger::Blur, FormController::lookup_by_national_id);
            }
            subs.on(spec.id, Trigger::Blur, FormController::validate_on_blur);
            subs.on(spec.id, Trigger::Input, FormController::revalidate_if_invalid);
            subs.on(spec.id, Trigger::Change, FormController::revalidate_if_invalid);
        }
        subs.on(BIRTH_DATE, Trigger::Change, FormController::recompute_age);
        subs.on(HAS_SIBLING, Trigger::Change, FormController::toggle_sibling_panel);
        for id in [ENABLE_MOTHER, ENABLE_FATHER] {
            subs.on(id, Trigger::Toggle, FormController::recompute_visible_steps);
        }
        subs
    }

    pub fn on(&mut self, field: &'static str, trigger: Trigger, handler: Handler) {
        self.table
            .entry(field)
            .or_default()
            .entry(trigger)
            .or_default()
            .push(handler);
    }

    pub fn handlers(&self, field: &str, trigger: Trigger) -> Vec<Handler> {
        self.table
            .get(field)
            .and_then(|by_trigger| by_trigger.get(&trigger))
            .cloned()
            .unwrap_or_default()
    }
}
