//! Typed console lines turned into form events.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use enrollment_core::FormEvent;

pub const HELP: &str = "\
commands:
  set <field> <text>        type into a field
  pick <field> [value]      choose a select/date value (empty clears it)
  blur <field>              leave a field (national-id fields trigger a lookup)
  check <field> | uncheck <field>
  next | prev | submit
  continue                  confirm the options dialog
  close                     close the open dialog
  reasons                   open or close the cancellation list
  reason +<value> | reason -<value>
  outside                   click outside the cancellation list
  photo <path> | photo      attach or clear the student photo
  wait                      block until pending requests answer
  show | help | quit";

#[derive(Debug, PartialEq)]
pub enum ConsoleCommand {
    Event(FormEvent),
    CloseDialog,
    AttachPhoto(PathBuf),
    Wait,
    Show,
    Help,
    Quit,
}

/// Parses one input line; blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    };

    let command = match verb {
        "set" => {
            let (field, value) = field_and_value(rest)?;
            ConsoleCommand::Event(FormEvent::input(field, value))
        }
        "pick" => {
            let (field, value) = field_and_value(rest)?;
            ConsoleCommand::Event(FormEvent::change(field, value))
        }
        "blur" => ConsoleCommand::Event(FormEvent::blur(single_field(rest)?)),
        "check" => ConsoleCommand::Event(FormEvent::toggle(single_field(rest)?, true)),
        "uncheck" => ConsoleCommand::Event(FormEvent::toggle(single_field(rest)?, false)),
        "next" => ConsoleCommand::Event(FormEvent::Next),
        "prev" | "back" => ConsoleCommand::Event(FormEvent::Prev),
        "submit" => ConsoleCommand::Event(FormEvent::Submit),
        "continue" => ConsoleCommand::Event(FormEvent::ContinueOptions),
        "close" | "dismiss" => ConsoleCommand::CloseDialog,
        "reasons" => ConsoleCommand::Event(FormEvent::ToggleCancellationPanel),
        "outside" => ConsoleCommand::Event(FormEvent::OutsideClick),
        "reason" => {
            let (checked, value) = if let Some(value) = rest.strip_prefix('+') {
                (true, value)
            } else if let Some(value) = rest.strip_prefix('-') {
                (false, value)
            } else {
                bail!("usage: reason +<value> | reason -<value>");
            };
            if value.is_empty() {
                bail!("usage: reason +<value> | reason -<value>");
            }
            ConsoleCommand::Event(FormEvent::SelectCancellationReason {
                value: value.to_string(),
                checked,
            })
        }
        "photo" if rest.is_empty() => ConsoleCommand::Event(FormEvent::ClearPhoto),
        "photo" => ConsoleCommand::AttachPhoto(PathBuf::from(rest)),
        "wait" => ConsoleCommand::Wait,
        "show" => ConsoleCommand::Show,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => bail!("unknown command '{other}'; type 'help'"),
    };
    Ok(Some(command))
}

fn field_and_value(rest: &str) -> Result<(&str, &str)> {
    match rest.split_once(char::is_whitespace) {
        Some((field, value)) => Ok((field, value.trim_start())),
        None if !rest.is_empty() => Ok((rest, "")),
        None => Err(anyhow!("missing field name")),
    }
}

fn single_field(rest: &str) -> Result<&str> {
    match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
        [field] => Ok(*field),
        [] => bail!("missing field name"),
        _ => bail!("expected a single field name"),
    }
}
