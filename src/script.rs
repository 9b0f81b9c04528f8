//! Line-oriented event scripts that drive the dashboard

use std::time::Duration;

use thiserror::Error;

use crate::controls::Trigger;
use crate::dashboard::UiEvent;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Step {
    Event(UiEvent),
    /// Advance the virtual clock
    Wait(Duration),
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: '{command}' needs {expected}")]
    MissingArgument {
        line: usize,
        command: String,
        expected: &'static str,
    },
    #[error("line {line}: unexpected text after '{command}'")]
    TrailingText { line: usize, command: String },
    #[error("line {line}: invalid wait '{value}'")]
    InvalidWait { line: usize, value: String },
    #[error("line {line}: unterminated quoted value")]
    UnterminatedQuote { line: usize },
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub(crate) fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        steps.push(parse_line(line, idx + 1)?);
    }
    Ok(steps)
}

fn parse_line(line: &str, number: usize) -> Result<Step, ScriptError> {
    let (command, rest) = split_word(line);
    let missing = |expected| ScriptError::MissingArgument {
        line: number,
        command: command.to_string(),
        expected,
    };
    let trailing = || ScriptError::TrailingText {
        line: number,
        command: command.to_string(),
    };

    match command {
        "wait" => {
            let (value, rest) = split_word(rest);
            if value.is_empty() {
                return Err(missing("a duration in milliseconds"));
            }
            if !rest.is_empty() {
                return Err(trailing());
            }
            let ms = value.parse::<u64>().map_err(|_| ScriptError::InvalidWait {
                line: number,
                value: value.to_string(),
            })?;
            Ok(Step::Wait(Duration::from_millis(ms)))
        }
        "blur" | "click" => {
            let (target, rest) = split_word(rest);
            if target.is_empty() {
                return Err(missing("a control id"));
            }
            if !rest.is_empty() {
                return Err(trailing());
            }
            let trigger = if command == "blur" {
                Trigger::Blur
            } else {
                Trigger::Click
            };
            Ok(Step::Event(UiEvent::new(target, trigger, None)))
        }
        "input" | "change" => {
            let (target, rest) = split_word(rest);
            if target.is_empty() {
                return Err(missing("a control id and a value"));
            }
            let value = parse_value(rest, number)?;
            let trigger = if command == "input" {
                Trigger::Input
            } else {
                Trigger::Change
            };
            Ok(Step::Event(UiEvent::new(target, trigger, Some(&value))))
        }
        other => Err(ScriptError::UnknownCommand {
            line: number,
            command: other.to_string(),
        }),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], s[end..].trim_start()),
        None => (s, ""),
    }
}

/// A bare value runs to end of line; a quoted one may hold `\"` and `\\`
fn parse_value(rest: &str, line: usize) -> Result<String, ScriptError> {
    let rest = rest.trim_end();
    let Some(body) = rest.strip_prefix('"') else {
        return Ok(rest.to_string());
    };
    let mut out = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('"' | '\\')) => out.push(escaped),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err(ScriptError::UnterminatedQuote { line }),
            },
            '"' => {
                if !chars.as_str().trim().is_empty() {
                    return Err(ScriptError::TrailingText {
                        line,
                        command: "value".to_string(),
                    });
                }
                return Ok(out);
            }
            c => out.push(c),
        }
    }
    Err(ScriptError::UnterminatedQuote { line })
}
