use serde_json::json;
use shared::protocol::PrefillRecord;

use crate::{
    derived::ChoiceGroup,
    form::FormModel,
    prefill::apply_record,
    schema::{self, CANCELLATION, ENABLE_FATHER, ENABLE_MOTHER},
};

fn record(value: serde_json::Value) -> PrefillRecord {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn fixture() -> (FormModel, ChoiceGroup) {
    (
        FormModel::new(&schema::enrollment_fields()),
        ChoiceGroup::new(schema::cancellation_options()),
    )
}

#[test]
fn overwrites_matching_fields_only() {
    let (mut form, mut group) = fixture();
    form.set_value("apeEst", "PEREZ");

    let applied = apply_record(
        &mut form,
        &mut group,
        &record(json!({ "nomEst": "ANA", "noSuchField": "x" })),
    );

    assert_eq!(applied, vec!["nomEst"]);
    assert_eq!(form.value("nomEst"), "ANA");
    assert_eq!(form.value("apeEst"), "PEREZ");
}

#[test]
fn checkboxes_read_si_and_true() {
    let (mut form, mut group) = fixture();
    form.set_checked(ENABLE_FATHER, true);

    apply_record(
        &mut form,
        &mut group,
        &record(json!({ ENABLE_MOTHER: "Sí", ENABLE_FATHER: "No" })),
    );
    assert!(form.is_checked(ENABLE_MOTHER));
    assert!(!form.is_checked(ENABLE_FATHER));

    apply_record(&mut form, &mut group, &record(json!({ ENABLE_FATHER: true })));
    assert!(form.is_checked(ENABLE_FATHER));
}

#[test]
fn cancellation_value_selects_group_members() {
    let (mut form, mut group) = fixture();

    apply_record(
        &mut form,
        &mut group,
        &record(json!({ CANCELLATION: "inscripcion, seguro" })),
    );

    assert_eq!(form.value(CANCELLATION), "inscripcion, seguro");
    assert!(group.is_selected("inscripcion"));
    assert!(!group.is_selected("mensualidad"));
    assert!(group.is_selected("seguro"));
    assert_eq!(group.summary_label(), "Inscripción, Seguro escolar");
}

#[test]
fn non_string_values_are_stringified() {
    let (mut form, mut group) = fixture();
    apply_record(
        &mut form,
        &mut group,
        &record(json!({ "montoPago": 1500, "referencia": null })),
    );
    assert_eq!(form.value("montoPago"), "1500");
    assert_eq!(form.value("referencia"), "");
}
