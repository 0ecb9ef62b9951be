use serde::{Deserialize, Serialize};

/// One screen of the enrollment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepId {
    #[serde(rename = "step1")]
    Student,
    #[serde(rename = "step2")]
    Mother,
    #[serde(rename = "step3")]
    Father,
    #[serde(rename = "step4")]
    Guardian,
}

impl StepId {
    pub const ALL: [StepId; 4] = [
        StepId::Student,
        StepId::Mother,
        StepId::Father,
        StepId::Guardian,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Student => "step1",
            StepId::Mother => "step2",
            StepId::Father => "step3",
            StepId::Guardian => "step4",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StepId::Student => {
                "Por favor, completa los datos del estudiante y selecciona las opciones."
            }
            StepId::Mother => "Ahora, ingresa los datos de la madre.",
            StepId::Father => "A continuación, ingresa los datos del padre.",
            StepId::Guardian => "Finalmente, completa los datos del representante.",
        }
    }
}

/// Semantic kind of a field, which decides the format rule it is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    NationalId,
    Phone,
}

/// How the field is presented and how its value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Input,
    Date,
    Select,
    Checkbox,
    Hidden,
    File,
}

/// Character restriction applied to every input event before the value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFilter {
    None,
    Digits,
    Letters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: &'static str,
    pub step: StepId,
    pub kind: FieldKind,
    pub control: ControlKind,
    pub filter: InputFilter,
    pub required_by_default: bool,
}

impl FieldSpec {
    pub const fn input(id: &'static str, step: StepId) -> Self {
        Self {
            id,
            step,
            kind: FieldKind::Text,
            control: ControlKind::Input,
            filter: InputFilter::None,
            required_by_default: false,
        }
    }

    pub const fn of_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn control(mut self, control: ControlKind) -> Self {
        self.control = control;
        self
    }

    pub const fn filter(mut self, filter: InputFilter) -> Self {
        self.filter = filter;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required_by_default = true;
        self
    }

    /// Free-text and email inputs are upper-cased as the user types.
    pub fn uppercases_input(&self) -> bool {
        self.control == ControlKind::Input && matches!(self.kind, FieldKind::Text | FieldKind::Email)
    }

    /// Whether the control is sent with the submission body.
    pub fn is_submitted(&self) -> bool {
        self.control != ControlKind::File
    }
}

/// One entry of a multi-select checkbox group: the canonical value sent to the
/// backend and the label shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Colour hint for status text and toggle labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Success,
    Error,
}
