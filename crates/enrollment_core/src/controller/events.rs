//! Interaction events fed into the form controller.

use shared::protocol::BackendReply;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// Raw keystroke-level text for a field; filters apply before storage.
    Input { field: String, value: String },
    /// Committed value for a select or date control.
    Change { field: String, value: String },
    Blur { field: String },
    Toggle { field: String, checked: bool },
    Next,
    Prev,
    Submit,
    ContinueOptions,
    CloseNotFound,
    CloseConfirmation,
    DismissAlert,
    ToggleCancellationPanel,
    /// A click that landed outside the cancellation dropdown and its button.
    OutsideClick,
    SelectCancellationReason { value: String, checked: bool },
    AttachPhoto { filename: String, bytes: Vec<u8> },
    ClearPhoto,
    Backend(BackendReply),
}

impl FormEvent {
    pub fn input(field: impl Into<String>, value: impl Into<String>) -> Self {
        FormEvent::Input {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn change(field: impl Into<String>, value: impl Into<String>) -> Self {
        FormEvent::Change {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn blur(field: impl Into<String>) -> Self {
        FormEvent::Blur {
            field: field.into(),
        }
    }

    pub fn toggle(field: impl Into<String>, checked: bool) -> Self {
        FormEvent::Toggle {
            field: field.into(),
            checked,
        }
    }
}

/// Events the controller refuses; the form state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' is not a checkbox")]
    NotACheckbox(String),
    #[error("field '{0}' is a checkbox; use a toggle event")]
    IsACheckbox(String),
    #[error("'{value}' is not an option of '{field}'")]
    InvalidOption { field: String, value: String },
    #[error("unknown cancellation reason '{0}'")]
    UnknownChoice(String),
}
