use proptest::prelude::*;
use shared::domain::{FieldKind, FieldSpec, StepId};

use crate::{
    form::FieldRecord,
    validator::{check, FieldError, Validator},
};

#[test]
fn required_empty_fails_before_format_rules() {
    assert_eq!(check(FieldKind::Email, true, "   "), Err(FieldError::Required));
    assert_eq!(check(FieldKind::NationalId, true, ""), Err(FieldError::Required));
    assert_eq!(check(FieldKind::Text, false, ""), Ok(()));
}

#[test]
fn format_rules_only_apply_to_filled_values() {
    assert_eq!(check(FieldKind::Phone, false, ""), Ok(()));
    assert_eq!(check(FieldKind::Email, false, "  "), Ok(()));
}

#[test]
fn national_id_accepts_seven_or_eight_digits() {
    assert_eq!(check(FieldKind::NationalId, true, "1234567"), Ok(()));
    assert_eq!(check(FieldKind::NationalId, true, " 12345678 "), Ok(()));
    assert_eq!(
        check(FieldKind::NationalId, true, "123456"),
        Err(FieldError::InvalidNationalId)
    );
    assert_eq!(
        check(FieldKind::NationalId, true, "123456789"),
        Err(FieldError::InvalidNationalId)
    );
    assert_eq!(
        check(FieldKind::NationalId, true, "V1234567"),
        Err(FieldError::InvalidNationalId)
    );
}

#[test]
fn phone_needs_exactly_eleven_digits() {
    assert_eq!(check(FieldKind::Phone, false, "02551234567"), Ok(()));
    assert_eq!(
        check(FieldKind::Phone, false, "0255123456"),
        Err(FieldError::InvalidPhone)
    );
    assert_eq!(
        check(FieldKind::Phone, false, "0255-123456"),
        Err(FieldError::InvalidPhone)
    );
}

#[test]
fn email_rules() {
    assert_eq!(check(FieldKind::Email, false, "ANA@LICEO.EDU.VE"), Ok(()));
    for bad in ["ana", "ana@liceo", "ana@@liceo.ve", "an a@liceo.ve", "@liceo.ve"] {
        assert_eq!(
            check(FieldKind::Email, false, bad),
            Err(FieldError::InvalidEmail),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn text_fields_accept_anything_non_empty() {
    assert_eq!(check(FieldKind::Text, true, "12 de Octubre"), Ok(()));
}

#[test]
fn decoration_is_replaced_in_place_and_cleared() {
    let spec = FieldSpec::input("ciEst", StepId::Student)
        .of_kind(FieldKind::NationalId)
        .required();
    let mut record = FieldRecord::new(spec);

    assert!(!Validator::validate_field(&mut record));
    assert_eq!(record.error(), Some("Este campo es obligatorio."));

    record.value = "12".into();
    assert!(!Validator::validate_field(&mut record));
    assert!(record.is_invalid());
    assert_eq!(record.error(), Some("La cédula debe tener 7 u 8 dígitos."));

    record.value = "12345678".into();
    assert!(Validator::validate_field(&mut record));
    assert!(!record.is_invalid());
    assert_eq!(record.error(), None);
}

proptest! {
    #[test]
    fn national_id_validity_matches_digit_count(value in "[0-9]{0,10}") {
        let expected = (7..=8).contains(&value.len());
        prop_assert_eq!(check(FieldKind::NationalId, false, &value).is_ok(), expected || value.is_empty());
    }

    #[test]
    fn national_id_rejects_any_non_digit(prefix in "[0-9]{3,4}", junk in "[a-zA-Z.\\-]", suffix in "[0-9]{3,4}") {
        let value = format!("{prefix}{junk}{suffix}");
        prop_assert_eq!(check(FieldKind::NationalId, false, &value), Err(FieldError::InvalidNationalId));
    }

    #[test]
    fn phone_validity_matches_digit_count(value in "[0-9]{1,14}") {
        prop_assert_eq!(check(FieldKind::Phone, false, &value).is_ok(), value.len() == 11);
    }

    #[test]
    fn trimming_does_not_change_the_verdict(value in "[0-9]{6,9}", pad in " {0,3}") {
        let padded = format!("{pad}{value}{pad}");
        prop_assert_eq!(
            check(FieldKind::NationalId, true, &padded),
            check(FieldKind::NationalId, true, &value)
        );
    }

    #[test]
    fn well_formed_emails_pass(local in "[a-z0-9._]{1,10}", domain in "[a-z0-9]{1,10}", tld in "[a-z]{2,4}") {
        let value = format!("{local}@{domain}.{tld}");
        prop_assert!(check(FieldKind::Email, true, &value).is_ok());
    }

    #[test]
    fn emails_with_inner_whitespace_fail(local in "[a-z]{1,5}", rest in "[a-z]{1,5}") {
        let value = format!("{local} {rest}@liceo.ve");
        prop_assert_eq!(check(FieldKind::Email, false, &value), Err(FieldError::InvalidEmail));
    }
}
