//! Field-level format rules and inline error decoration.

use std::sync::LazyLock;

use regex::Regex;
use shared::domain::FieldKind;
use thiserror::Error;

use crate::form::FieldRecord;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7,8}$").expect("national id pattern"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{11}$").expect("phone pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Este campo es obligatorio.")]
    Required,
    #[error("Correo electrónico inválido.")]
    InvalidEmail,
    #[error("La cédula debe tener 7 u 8 dígitos.")]
    InvalidNationalId,
    #[error("El teléfono debe tener 11 dígitos (ej. 02551234567).")]
    InvalidPhone,
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_national_id(value: &str) -> bool {
    NATIONAL_ID_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Checks a raw value against the rules for its kind. The value is trimmed
/// first; the first failing rule wins.
pub fn check(kind: FieldKind, required: bool, value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return if required {
            Err(FieldError::Required)
        } else {
            Ok(())
        };
    }

    match kind {
        FieldKind::Email if !is_valid_email(value) => Err(FieldError::InvalidEmail),
        FieldKind::NationalId if !is_valid_national_id(value) => {
            Err(FieldError::InvalidNationalId)
        }
        FieldKind::Phone if !is_valid_phone(value) => Err(FieldError::InvalidPhone),
        _ => Ok(()),
    }
}

pub struct Validator;

impl Validator {
    /// Validates a record and mirrors the result into its inline decoration.
    pub fn validate_field(record: &mut FieldRecord) -> bool {
        match check(record.spec.kind, record.required, &record.value) {
            Ok(()) => {
                record.clear_error();
                true
            }
            Err(err) => {
                record.show_error(err.to_string());
                false
            }
        }
    }
}
