//! Controller layer: form events, state transitions and the commands they
//! hand to the backend bridge.

pub mod events;
pub mod subscriptions;
pub mod view;

use chrono::{Local, NaiveDate};
use shared::{
    domain::{ChoiceOption, ControlKind, FieldSpec, StepId, Tone},
    protocol::{
        BackendCommand, BackendReply, LookupOutcome, SearchRequest, SubmitOutcome, SubmitRequest,
    },
};
use tracing::{debug, error, info, warn};

use crate::{
    config::Settings,
    derived::{self, ChoiceGroup},
    form::{filter_input, FormModel},
    navigation::{FormState, StepFlags},
    prefill,
    schema::{
        self, AGE, BIRTH_DATE, CANCELLATION, ENABLE_FATHER, ENABLE_MOTHER, HAS_SIBLING, PHOTO,
        PHOTO_DATA, SIBLING_DEPENDENTS,
    },
    validator::{is_valid_national_id, Validator},
};

pub use events::{ControllerError, FormEvent};
use subscriptions::{Subscriptions, Trigger};
pub use view::{CancellationView, Dialog, FieldView, FormView, StatusLine, ToggleView};

pub const STEP_ERRORS_MESSAGE: &str = "Por favor, corrige los errores marcados.";
pub const LOOKUP_FOUND_MESSAGE: &str = "Datos encontrados y cargados en el formulario.";
pub const SUBMITTING_MESSAGE: &str = "Generando ficha...";
pub const DEPLOYMENT_STATUS_MESSAGE: &str =
    "Error de Despliegue: El script del servidor no está actualizado.";
pub const DEPLOYMENT_ALERT_MESSAGE: &str = "Error de Despliegue: El script del servidor no está actualizado. Se creó un documento por error en lugar de buscar.\n\nPor favor, contacta al administrador y pídele que realice una 'Nueva Implementación' (New Deployment) en el Google Apps Script.";

pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct FormController {
    settings: Settings,
    specs: Vec<FieldSpec>,
    form: FormModel,
    nav: FormState,
    cancellation: ChoiceGroup,
    subscriptions: Subscriptions,
    status: StatusLine,
    dialog: Option<Dialog>,
    age_warning: Option<String>,
    focused: Option<&'static str>,
    sibling_panel_visible: bool,
    photo_preview: Option<String>,
    submitting: bool,
    clock: Clock,
}

impl FormController {
    pub fn new(settings: Settings) -> Self {
        Self::with_schema(settings, schema::enrollment_fields(), schema::cancellation_options())
    }

    pub fn with_schema(
        settings: Settings,
        specs: Vec<FieldSpec>,
        cancellation_options: Vec<ChoiceOption>,
    ) -> Self {
        let subscriptions = Subscriptions::build(&specs);
        Self {
            settings,
            form: FormModel::new(&specs),
            specs,
            nav: FormState::default(),
            cancellation: ChoiceGroup::new(cancellation_options),
            subscriptions,
            status: StatusLine::default(),
            dialog: Some(Dialog::Options),
            age_warning: None,
            focused: None,
            sibling_panel_visible: false,
            photo_preview: None,
            submitting: false,
            clock: local_today,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn form(&self) -> &FormModel {
        &self.form
    }

    pub fn state(&self) -> &FormState {
        &self.nav
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn focused(&self) -> Option<&'static str> {
        self.focused
    }

    pub fn cancellation(&self) -> &ChoiceGroup {
        &self.cancellation
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Discards every value and returns to the opening dialog, as a page reload does.
    pub fn reset(&mut self) {
        info!("form reset");
        let options = self.cancellation.options().to_vec();
        let settings = self.settings.clone();
        let specs = std::mem::take(&mut self.specs);
        let clock = self.clock;
        *self = Self::with_schema(settings, specs, options).with_clock(clock);
    }

    pub fn handle(&mut self, event: FormEvent) -> Result<Vec<BackendCommand>, ControllerError> {
        match event {
            FormEvent::Input { field, value } => {
                let id = self.text_field(&field)?;
                let Some(spec) = self.form.get(id).map(|record| record.spec) else {
                    return Err(ControllerError::UnknownField(field));
                };
                // date and select controls commit whole values
                if matches!(spec.control, ControlKind::Date | ControlKind::Select) {
                    return self.change(id, field, value);
                }
                self.form.set_value(id, filter_input(&spec, &value));
                Ok(self.fire(id, Trigger::Input))
            }
            FormEvent::Change { field, value } => {
                let id = self.text_field(&field)?;
                self.change(id, field, value)
            }
            FormEvent::Blur { field } => {
                let id = self.field_id(&field)?;
                Ok(self.fire(id, Trigger::Blur))
            }
            FormEvent::Toggle { field, checked } => {
                let id = self.field_id(&field)?;
                if !self.form.get(id).is_some_and(|record| record.is_checkbox()) {
                    return Err(ControllerError::NotACheckbox(field));
                }
                self.form.set_checked(id, checked);
                Ok(self.fire(id, Trigger::Toggle))
            }
            FormEvent::Next => {
                self.next();
                Ok(Vec::new())
            }
            FormEvent::Prev => {
                self.prev();
                Ok(Vec::new())
            }
            FormEvent::Submit => Ok(self.submit()),
            FormEvent::ContinueOptions => {
                if self.dialog == Some(Dialog::Options) {
                    self.dialog = None;
                }
                self.refresh_visible_steps();
                Ok(Vec::new())
            }
            FormEvent::CloseNotFound => {
                self.close_dialog(|dialog| matches!(dialog, Dialog::NotFound));
                Ok(Vec::new())
            }
            FormEvent::DismissAlert => {
                self.close_dialog(|dialog| matches!(dialog, Dialog::DeploymentAlert(_)));
                Ok(Vec::new())
            }
            FormEvent::CloseConfirmation => {
                if self.dialog == Some(Dialog::Confirmation) {
                    self.reset();
                }
                Ok(Vec::new())
            }
            FormEvent::ToggleCancellationPanel => {
                self.cancellation.toggle_panel();
                Ok(Vec::new())
            }
            FormEvent::OutsideClick => {
                self.cancellation.close_panel();
                Ok(Vec::new())
            }
            FormEvent::SelectCancellationReason { value, checked } => {
                if !self.cancellation.set(&value, checked) {
                    return Err(ControllerError::UnknownChoice(value));
                }
                let joined = self.cancellation.joined_value();
                self.form.set_value(CANCELLATION, joined);
                Ok(Vec::new())
            }
            FormEvent::AttachPhoto { filename, bytes } => {
                let uri = derived::encode_data_uri(&filename, &bytes);
                debug!(filename = %filename, size = bytes.len(), "photo attached");
                self.form.set_value(PHOTO, filename);
                self.form.set_value(PHOTO_DATA, uri.clone());
                self.photo_preview = Some(uri);
                Ok(Vec::new())
            }
            FormEvent::ClearPhoto => {
                self.form.set_value(PHOTO, String::new());
                self.form.set_value(PHOTO_DATA, String::new());
                self.photo_preview = None;
                Ok(Vec::new())
            }
            FormEvent::Backend(reply) => {
                self.apply_reply(reply);
                Ok(Vec::new())
            }
        }
    }

    fn field_id(&self, field: &str) -> Result<&'static str, ControllerError> {
        self.form
            .get(field)
            .map(|record| record.id())
            .ok_or_else(|| ControllerError::UnknownField(field.to_string()))
    }

    fn text_field(&self, field: &str) -> Result<&'static str, ControllerError> {
        let id = self.field_id(field)?;
        if self.form.get(id).is_some_and(|record| record.is_checkbox()) {
            return Err(ControllerError::IsACheckbox(field.to_string()));
        }
        Ok(id)
    }

    fn fire(&mut self, id: &'static str, trigger: Trigger) -> Vec<BackendCommand> {
        let mut commands = Vec::new();
        for handler in self.subscriptions.handlers(id, trigger) {
            commands.extend(handler(self, id));
        }
        commands
    }

    fn change(
        &mut self,
        id: &'static str,
        field: String,
        value: String,
    ) -> Result<Vec<BackendCommand>, ControllerError> {
        if let Some(options) = schema::select_options(id, (self.clock)()) {
            if !options.iter().any(|option| option.value == value) {
                return Err(ControllerError::InvalidOption { field, value });
            }
        }
        self.form.set_value(id, value);
        Ok(self.fire(id, Trigger::Change))
    }

    fn close_dialog(&mut self, matches: impl Fn(&Dialog) -> bool) {
        if self.dialog.as_ref().is_some_and(matches) {
            self.dialog = None;
        }
    }

    fn next(&mut self) {
        if !self.validate_current_step() {
            return;
        }
        if self.nav.advance() {
            debug!(step = self.nav.current_step().as_str(), "advanced");
            self.show_current_step();
        }
    }

    fn prev(&mut self) {
        if self.nav.retreat() {
            debug!(step = self.nav.current_step().as_str(), "went back");
            self.show_current_step();
        }
    }

    fn show_current_step(&mut self) {
        if self.nav.is_last() {
            self.status.hide();
        }
    }

    /// Validates every field of the active step that is required or filled in,
    /// plus the age range when the birth date lives on this step. Focuses the
    /// first offending field on failure.
    pub fn validate_current_step(&mut self) -> bool {
        self.status.hide();
        let step = self.nav.current_step();
        let mut first_invalid = None;

        for record in self.form.records_on_step_mut(step) {
            if record.needs_validation() && !Validator::validate_field(record) {
                first_invalid.get_or_insert(record.id());
            }
        }

        if self.birth_date_on(step) {
            let age = derived::age_text(self.form.value(BIRTH_DATE), (self.clock)())
                .parse::<u32>()
                .ok();
            if age.is_some_and(|age| self.settings.age_in_range(age)) {
                self.age_warning = None;
            } else {
                if let Some(record) = self.form.get_mut(BIRTH_DATE) {
                    record.mark_invalid();
                }
                self.age_warning = Some(self.settings.age_warning());
                first_invalid.get_or_insert(BIRTH_DATE);
            }
        }

        match first_invalid {
            None => true,
            Some(id) => {
                self.status.show(STEP_ERRORS_MESSAGE, Tone::Error);
                self.focused = Some(id);
                debug!(step = step.as_str(), field = id, "step validation failed");
                false
            }
        }
    }

    fn birth_date_on(&self, step: StepId) -> bool {
        self.form
            .get(BIRTH_DATE)
            .is_some_and(|record| record.spec.step == step)
    }

    fn submit(&mut self) -> Vec<BackendCommand> {
        if self.submitting {
            return Vec::new();
        }
        if !self.validate_current_step() {
            return Vec::new();
        }
        self.submitting = true;
        self.status.show(SUBMITTING_MESSAGE, Tone::Neutral);
        let request = SubmitRequest {
            fields: self.form.submission_parts(),
        };
        info!(parts = request.fields.len(), "submitting enrollment form");
        vec![BackendCommand::Submit(request)]
    }

    fn apply_reply(&mut self, reply: BackendReply) {
        match reply {
            BackendReply::LookupCompleted {
                search_type,
                outcome,
            } => self.apply_lookup(&search_type, outcome),
            BackendReply::SubmitCompleted(SubmitOutcome::Success) => {
                info!("enrollment form submitted");
                self.dialog = Some(Dialog::Confirmation);
            }
            BackendReply::SubmitCompleted(SubmitOutcome::Failure(err)) => {
                warn!(code = ?err.code, message = %err.message, "submission failed");
                self.status
                    .show(format!("Error: {}", err.message), Tone::Error);
                self.submitting = false;
            }
        }
    }

    fn apply_lookup(&mut self, search_type: &str, outcome: LookupOutcome) {
        match outcome {
            LookupOutcome::Found(record) => {
                self.status.show(LOOKUP_FOUND_MESSAGE, Tone::Success);
                let applied = prefill::apply_record(&mut self.form, &mut self.cancellation, &record);
                info!(search_type, fields = applied.len(), "record found and applied");
                self.fire(BIRTH_DATE, Trigger::Change);
                self.fire(HAS_SIBLING, Trigger::Change);
                self.refresh_visible_steps();
            }
            LookupOutcome::NotFound => {
                info!(search_type, "no record for national id");
                self.status.hide();
                self.dialog = Some(Dialog::NotFound);
            }
            LookupOutcome::DeploymentMismatch => {
                error!(
                    search_type,
                    "backend answered 'success' to a search action; endpoint deployment is stale"
                );
                self.status.show(DEPLOYMENT_STATUS_MESSAGE, Tone::Error);
                self.dialog = Some(Dialog::DeploymentAlert(
                    DEPLOYMENT_ALERT_MESSAGE.to_string(),
                ));
            }
            LookupOutcome::Failed(err) => {
                warn!(search_type, code = ?err.code, message = %err.message, "lookup failed");
                self.status.show(err.message, Tone::Error);
            }
        }
    }

    pub(crate) fn lookup_by_national_id(&mut self, id: &'static str) -> Vec<BackendCommand> {
        let cedula = self.form.value(id).trim().to_string();
        if !is_valid_national_id(&cedula) {
            return Vec::new();
        }
        self.status.show(
            format!("Buscando datos por C.I. ({id})..."),
            Tone::Neutral,
        );
        debug!(search_type = id, "queueing national id lookup");
        vec![BackendCommand::Search(SearchRequest::new(cedula, id))]
    }

    pub(crate) fn validate_on_blur(&mut self, id: &'static str) -> Vec<BackendCommand> {
        if let Some(record) = self.form.get_mut(id) {
            if !record.is_checkbox() {
                Validator::validate_field(record);
            }
        }
        Vec::new()
    }

    pub(crate) fn revalidate_if_invalid(&mut self, id: &'static str) -> Vec<BackendCommand> {
        if let Some(record) = self.form.get_mut(id) {
            if record.is_invalid() {
                Validator::validate_field(record);
            }
        }
        Vec::new()
    }

    pub(crate) fn recompute_age(&mut self, _id: &'static str) -> Vec<BackendCommand> {
        let birth_date = self.form.value(BIRTH_DATE).to_string();
        let age = derived::age_text(&birth_date, (self.clock)());
        self.form.set_value(AGE, age);
        if !birth_date.trim().is_empty() {
            self.validate_current_step();
        }
        Vec::new()
    }

    pub(crate) fn toggle_sibling_panel(&mut self, _id: &'static str) -> Vec<BackendCommand> {
        let selection = self.form.value(HAS_SIBLING).to_string();
        self.sibling_panel_visible = derived::apply_sibling_selection(&mut self.form, &selection);
        Vec::new()
    }

    pub(crate) fn recompute_visible_steps(&mut self, _id: &'static str) -> Vec<BackendCommand> {
        self.refresh_visible_steps();
        Vec::new()
    }

    fn refresh_visible_steps(&mut self) {
        let flags = StepFlags {
            mother: self.form.is_checked(ENABLE_MOTHER),
            father: self.form.is_checked(ENABLE_FATHER),
            guardian_present: self.form.has_step(StepId::Guardian),
        };
        self.nav.recompute(flags);
        debug!(
            steps = self.nav.visible_steps().len(),
            index = self.nav.current_step_index(),
            "visible steps recomputed"
        );
        self.show_current_step();
    }

    pub fn view(&self) -> FormView {
        let today = (self.clock)();
        let step = self.nav.current_step();
        let fields = self
            .form
            .records()
            .filter(|record| record.spec.step == step)
            .map(|record| FieldView {
                id: record.id(),
                control: record.spec.control,
                value: record.value.clone(),
                checked: record.checked,
                required: record.required,
                invalid: record.is_invalid(),
                error: record.error().map(str::to_string),
                options: schema::select_options(record.id(), today),
                hidden: record.spec.control == ControlKind::Hidden
                    || (SIBLING_DEPENDENTS.contains(&record.id()) && !self.sibling_panel_visible),
            })
            .collect();

        let parent_toggles = [ENABLE_MOTHER, ENABLE_FATHER]
            .into_iter()
            .filter(|id| self.form.contains(id))
            .map(|id| {
                let checked = self.form.is_checked(id);
                ToggleView {
                    id,
                    checked,
                    tone: if checked { Tone::Success } else { Tone::Error },
                }
            })
            .collect();

        FormView {
            step: self.nav.render(),
            fields,
            status: self.status.visible.then(|| self.status.clone()),
            dialog: self.dialog.clone(),
            age_warning: self.age_warning.clone(),
            focused: self.focused,
            parent_toggles,
            cancellation: CancellationView {
                summary: self.cancellation.summary_label(),
                panel_open: self.cancellation.is_panel_open(),
                options: self
                    .cancellation
                    .options()
                    .iter()
                    .map(|option| (option.clone(), self.cancellation.is_selected(&option.value)))
                    .collect(),
            },
            photo_preview: self.photo_preview.clone(),
            submit_enabled: !self.submitting,
        }
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
