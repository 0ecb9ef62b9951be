//! Plain-text rendering of the form view.

use std::fmt::Write as _;

use enrollment_core::{controller::FieldView, Dialog, FormView};
use shared::domain::{ControlKind, Tone};

pub fn render(view: &FormView) -> String {
    let mut out = String::new();
    let step = &view.step;
    let _ = writeln!(
        out,
        "== {} ({:.0}%) ==",
        step.active_step.as_str(),
        step.progress_percent
    );
    let _ = writeln!(out, "{}", step.description);

    for field in view.fields.iter().filter(|field| !field.hidden) {
        render_field(&mut out, field, view.focused == Some(field.id));
    }
    if let Some(warning) = &view.age_warning {
        let _ = writeln!(out, "  ! {warning}");
    }

    if !view.parent_toggles.is_empty() {
        let toggles: Vec<String> = view
            .parent_toggles
            .iter()
            .map(|toggle| {
                let mark = if toggle.checked { "x" } else { " " };
                format!("[{mark}] {}", toggle.id)
            })
            .collect();
        let _ = writeln!(out, "  {}", toggles.join("  "));
    }

    let cancellation = &view.cancellation;
    let _ = writeln!(out, "  cancelado: {}", cancellation.summary);
    if cancellation.panel_open {
        for (option, selected) in &cancellation.options {
            let mark = if *selected { "x" } else { " " };
            let _ = writeln!(out, "    [{mark}] {} ({})", option.label, option.value);
        }
    }
    if view.photo_preview.is_some() {
        let _ = writeln!(out, "  foto: adjunta");
    }

    if let Some(status) = &view.status {
        let tone = match status.tone {
            Tone::Neutral => "..",
            Tone::Success => "ok",
            Tone::Error => "!!",
        };
        let _ = writeln!(out, "[{tone}] {}", status.text);
    }

    let mut controls = Vec::new();
    if step.prev_visible {
        controls.push("prev");
    }
    if step.next_visible {
        controls.push("next");
    }
    if step.submit_visible {
        controls.push(if view.submit_enabled {
            "submit"
        } else {
            "submit (enviando)"
        });
    }
    let _ = writeln!(out, "-> {}", controls.join(" | "));

    if let Some(dialog) = &view.dialog {
        let _ = writeln!(out, "** {} **", dialog_text(dialog));
    }
    out
}

fn render_field(out: &mut String, field: &FieldView, focused: bool) {
    let cursor = if focused { ">" } else { " " };
    let required = if field.required { "*" } else { "" };
    let value = match field.control {
        ControlKind::Checkbox => return,
        ControlKind::File if field.value.is_empty() => "(sin archivo)".to_string(),
        _ => field.value.clone(),
    };
    let _ = write!(out, "{cursor} {}{required}: [{value}]", field.id);
    if let Some(options) = &field.options {
        let choices: Vec<&str> = options
            .iter()
            .filter(|option| !option.value.is_empty())
            .map(|option| option.value.as_str())
            .collect();
        if choices.len() <= 4 {
            let _ = write!(out, " ({})", choices.join("/"));
        }
    }
    match (&field.error, field.invalid) {
        (Some(error), _) => {
            let _ = write!(out, "  ! {error}");
        }
        (None, true) => {
            let _ = write!(out, "  !");
        }
        (None, false) => {}
    }
    out.push('\n');
}

fn dialog_text(dialog: &Dialog) -> &str {
    match dialog {
        Dialog::Options => {
            "Opciones: marca enableMadre/enablePadre si corresponde y escribe 'continue'"
        }
        Dialog::NotFound => "No se encontraron datos para esa cédula ('close')",
        Dialog::Confirmation => "¡Ficha generada con éxito! ('close' para empezar de nuevo)",
        Dialog::DeploymentAlert(message) => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrollment_core::{FormController, FormEvent, Settings};

    #[test]
    fn renders_errors_and_hides_hidden_fields() {
        let mut controller = FormController::new(Settings::default());
        controller
            .handle(FormEvent::ContinueOptions)
            .expect("continue");
        controller.handle(FormEvent::Next).expect("next");

        let text = render(&controller.view());

        assert!(text.starts_with("== step1 (50%) =="));
        assert!(text.contains("> ciEst*: []  ! Este campo es obligatorio."));
        assert!(!text.contains("fotoEstBase64"));
        assert!(!text.contains("nomHerm"));
        assert!(text.contains("[!!] Por favor, corrige los errores marcados."));
        assert!(text.contains("[ ] enableMadre  [ ] enablePadre"));
        assert!(text.contains("-> next"));
    }

    #[test]
    fn renders_the_open_dialog() {
        let controller = FormController::new(Settings::default());
        let text = render(&controller.view());
        assert!(text.contains("** Opciones:"));
        assert!(text.contains("-> submit"));
    }
}
