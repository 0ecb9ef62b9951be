//! Declarative description of every control on the enrollment form.
//!
//! Each field's validation kind, input filter and default required flag are
//! fixed here once; nothing downstream inspects ids to decide how to treat a
//! field.

use chrono::{Datelike, NaiveDate};
use shared::domain::{
    ChoiceOption,
    ControlKind::{Checkbox, Date, File, Hidden, Select},
    FieldKind::{Email, NationalId, Phone},
    FieldSpec,
    InputFilter::{Digits, Letters},
    StepId::{self, Father, Guardian, Mother, Student},
};

pub const STUDENT_ID: &str = "ciEst";
pub const MOTHER_ID: &str = "ciMad";
pub const FATHER_ID: &str = "ciPad";
pub const GUARDIAN_ID: &str = "ciRep";

pub const BIRTH_DATE: &str = "fNacEst";
pub const AGE: &str = "edadEst";
pub const HAS_SIBLING: &str = "tieneHerm";
pub const SIBLING_NAME: &str = "nomHerm";
pub const SIBLING_YEAR: &str = "anoHerm";
pub const SCHOOL_YEAR: &str = "ano_cursar";
pub const HEIGHT: &str = "estatura";
pub const PHOTO: &str = "fotoEst";
pub const PHOTO_DATA: &str = "fotoEstBase64";
pub const CANCELLATION: &str = "cancelado";
pub const ENABLE_MOTHER: &str = "enableMadre";
pub const ENABLE_FATHER: &str = "enablePadre";

/// Value of the sibling selector that opens the sibling panel.
pub const YES: &str = "Sí";
pub const NO: &str = "No";

/// National-ID fields whose blur triggers a record lookup.
pub const LOOKUP_FIELDS: [&str; 4] = [STUDENT_ID, MOTHER_ID, FATHER_ID, GUARDIAN_ID];
pub const SIBLING_DEPENDENTS: [&str; 2] = [SIBLING_NAME, SIBLING_YEAR];

const SCHOOL_YEARS_OFFERED: i32 = 10;

const fn national_id(id: &'static str, step: StepId) -> FieldSpec {
    FieldSpec::input(id, step).of_kind(NationalId).filter(Digits)
}

const fn phone(id: &'static str, step: StepId) -> FieldSpec {
    FieldSpec::input(id, step).of_kind(Phone).filter(Digits)
}

const fn letters(id: &'static str, step: StepId) -> FieldSpec {
    FieldSpec::input(id, step).filter(Letters)
}

const fn email(id: &'static str, step: StepId) -> FieldSpec {
    FieldSpec::input(id, step).of_kind(Email)
}

const ENROLLMENT_FIELDS: &[FieldSpec] = &[
    // step 1: student
    national_id(STUDENT_ID, Student).required(),
    letters("nomEst", Student).required(),
    letters("apeEst", Student).required(),
    FieldSpec::input(BIRTH_DATE, Student).control(Date).required(),
    FieldSpec::input(AGE, Student),
    letters("lugNacEst", Student),
    letters("plantelProc", Student),
    FieldSpec::input(SCHOOL_YEAR, Student).control(Select).required(),
    FieldSpec::input(HEIGHT, Student).control(Select),
    letters("enfDisc", Student),
    letters("actInt", Student),
    FieldSpec::input(HAS_SIBLING, Student).control(Select).required(),
    letters(SIBLING_NAME, Student),
    FieldSpec::input(SIBLING_YEAR, Student),
    FieldSpec::input(PHOTO, Student).control(File),
    FieldSpec::input(PHOTO_DATA, Student).control(Hidden),
    FieldSpec::input(CANCELLATION, Student).control(Hidden),
    FieldSpec::input("referencia", Student).filter(Digits),
    FieldSpec::input("montoPago", Student).filter(Digits),
    FieldSpec::input(ENABLE_MOTHER, Student).control(Checkbox),
    FieldSpec::input(ENABLE_FATHER, Student).control(Checkbox),
    // step 2: mother
    national_id(MOTHER_ID, Mother).required(),
    letters("nomMad", Mother).required(),
    phone("telHabMad", Mother),
    phone("celMad", Mother).required(),
    email("emailMad", Mother),
    letters("profMad", Mother),
    letters("trabMad", Mother),
    letters("cargoMad", Mother),
    // step 3: father
    national_id(FATHER_ID, Father).required(),
    letters("nomPad", Father).required(),
    phone("telHabPad", Father),
    phone("celPad", Father).required(),
    email("emailPad", Father),
    letters("profPad", Father),
    letters("trabPad", Father),
    letters("cargoPad", Father),
    // step 4: guardian
    national_id(GUARDIAN_ID, Guardian).required(),
    letters("nomRep", Guardian).required(),
    letters("parentesco", Guardian).required(),
    phone("telHabRep", Guardian),
    phone("celRep", Guardian).required(),
    email("emailRep", Guardian),
    letters("profRep", Guardian),
    letters("trabRep", Guardian),
    letters("cargoRep", Guardian),
    phone("contEmerg", Guardian).required(),
    letters("autRetirar", Guardian),
];

pub fn enrollment_fields() -> Vec<FieldSpec> {
    ENROLLMENT_FIELDS.to_vec()
}

/// Payment items offered in the cancellation-reasons dropdown.
pub fn cancellation_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::new("inscripcion", "Inscripción"),
        ChoiceOption::new("mensualidad", "Mensualidad"),
        ChoiceOption::new("seguro", "Seguro escolar"),
    ]
}

/// Options for a select control, placeholder first. `None` for non-select fields.
pub fn select_options(field_id: &str, today: NaiveDate) -> Option<Vec<ChoiceOption>> {
    match field_id {
        SCHOOL_YEAR => Some(school_year_options(today.year())),
        HEIGHT => Some(height_options()),
        HAS_SIBLING => Some(vec![
            ChoiceOption::new("", "Selecciona"),
            ChoiceOption::new(YES, YES),
            ChoiceOption::new(NO, NO),
        ]),
        _ => None,
    }
}

fn school_year_options(current_year: i32) -> Vec<ChoiceOption> {
    let mut options = vec![ChoiceOption::new("", "Selecciona un año")];
    options.extend((0..SCHOOL_YEARS_OFFERED).map(|offset| {
        let start = current_year + offset;
        let span = format!("{start}-{}", start + 1);
        ChoiceOption::new(span.clone(), span)
    }));
    options
}

fn height_options() -> Vec<ChoiceOption> {
    let mut options = vec![ChoiceOption::new("", "Selecciona")];
    options.extend(
        (100..=200)
            .step_by(5)
            .map(|cm| ChoiceOption::new(cm.to_string(), format!("{cm} cm"))),
    );
    options
}
