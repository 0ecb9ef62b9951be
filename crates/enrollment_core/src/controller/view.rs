//! Render-ready snapshot of the controller state.

use shared::domain::{ChoiceOption, ControlKind, Tone};

use crate::navigation::StepView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Opening dialog where the parent steps are switched on.
    Options,
    NotFound,
    Confirmation,
    /// Blocking notice that the endpoint's deployment is out of date.
    DeploymentAlert(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
    pub visible: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: String::new(),
            tone: Tone::Neutral,
            visible: false,
        }
    }
}

impl StatusLine {
    pub fn show(&mut self, text: impl Into<String>, tone: Tone) {
        self.text = text.into();
        self.tone = tone;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub id: &'static str,
    pub control: ControlKind,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub invalid: bool,
    pub error: Option<String>,
    pub options: Option<Vec<ChoiceOption>>,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleView {
    pub id: &'static str,
    pub checked: bool,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CancellationView {
    pub summary: String,
    pub panel_open: bool,
    pub options: Vec<(ChoiceOption, bool)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub step: StepView,
    pub fields: Vec<FieldView>,
    pub status: Option<StatusLine>,
    pub dialog: Option<Dialog>,
    pub age_warning: Option<String>,
    pub focused: Option<&'static str>,
    pub parent_toggles: Vec<ToggleView>,
    pub cancellation: CancellationView,
    pub photo_preview: Option<String>,
    pub submit_enabled: bool,
}
