//! Host command vocabulary and the line-oriented session script format.
//!
//! ```text
//! # comments run to end of line
//! click CT_AXIAL 10 10      pointer down at canvas (10, 10)
//! finish CT_AXIAL           finish that viewport's curve (omit id: last used)
//! measure                   toggle measurement mode
//! undo                      undo the most recent curve action anywhere
//! clear-last CT_AXIAL       undo the most recent curve of one viewport
//! clear CT_AXIAL            clear one viewport
//! clear                     clear every viewport
//! ```
//!
//! Parsed with `winnow` 0.7.

use crate::id::ViewportId;
use serde::{Deserialize, Serialize};
use std::fmt;
use winnow::ascii::{float, space1};
use winnow::combinator::{opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// A discrete host-issued action against the curve tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Primary pointer pressed at a canvas position.
    PointerDown { viewport: ViewportId, x: f64, y: f64 },
    /// Finalize the active curve; `None` targets the last-interacted viewport.
    Finish { viewport: Option<ViewportId> },
    ToggleMeasure,
    /// Undo the single most recent curve action across all viewports.
    Undo,
    /// Undo the most recent curve of one viewport.
    ClearLast { viewport: Option<ViewportId> },
    ClearViewport { viewport: ViewportId },
    ClearAll,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PointerDown { viewport, x, y } => write!(f, "click {viewport} {x} {y}"),
            Command::Finish { viewport: Some(vp) } => write!(f, "finish {vp}"),
            Command::Finish { viewport: None } => f.write_str("finish"),
            Command::ToggleMeasure => f.write_str("measure"),
            Command::Undo => f.write_str("undo"),
            Command::ClearLast { viewport: Some(vp) } => write!(f, "clear-last {vp}"),
            Command::ClearLast { viewport: None } => f.write_str("clear-last"),
            Command::ClearViewport { viewport } => write!(f, "clear {viewport}"),
            Command::ClearAll => f.write_str("clear"),
        }
    }
}

/// Parse a session script into commands.
///
/// # Errors
/// Returns a message naming the 1-based line of the first malformed command.
#[must_use = "parsing result should be used"]
pub fn parse_script(input: &str) -> Result<Vec<Command>, String> {
    let mut commands = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let command =
            parse_line(line).map_err(|e| format!("Script parse error on line {}: {e}", i + 1))?;
        commands.push(command);
    }
    Ok(commands)
}

fn parse_line(line: &str) -> Result<Command, String> {
    let mut rest = line;
    let keyword = parse_keyword
        .parse_next(&mut rest)
        .map_err(|_| format!("expected a command, got `{line}`"))?;

    let command = match keyword {
        "click" => parse_click_args
            .parse_next(&mut rest)
            .map_err(|_| "usage: click <viewport> <x> <y>".to_string())?,
        "finish" => Command::Finish {
            viewport: parse_opt_viewport(&mut rest)?,
        },
        "measure" => Command::ToggleMeasure,
        "undo" => Command::Undo,
        "clear-last" => Command::ClearLast {
            viewport: parse_opt_viewport(&mut rest)?,
        },
        "clear" => match parse_opt_viewport(&mut rest)? {
            Some(viewport) => Command::ClearViewport { viewport },
            None => Command::ClearAll,
        },
        other => return Err(format!("unknown command `{other}`")),
    };

    if !rest.trim().is_empty() {
        return Err(format!("unexpected trailing input `{}`", rest.trim()));
    }
    Ok(command)
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn parse_keyword<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '-').parse_next(input)
}

fn parse_viewport_name(input: &mut &str) -> ModalResult<ViewportId> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
    })
    .map(ViewportId::intern)
    .parse_next(input)
}

fn parse_opt_viewport(input: &mut &str) -> Result<Option<ViewportId>, String> {
    opt(preceded(space1, parse_viewport_name))
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| "expected a viewport id".to_string())
}

fn parse_number(input: &mut &str) -> ModalResult<f64> {
    float::<_, f64, _>
        .verify(|v: &f64| v.is_finite())
        .parse_next(input)
}

fn parse_click_args(input: &mut &str) -> ModalResult<Command> {
    let viewport = preceded(space1, parse_viewport_name).parse_next(input)?;
    let x = preceded(space1, parse_number).parse_next(input)?;
    let y = preceded(space1, parse_number).parse_next(input)?;
    Ok(Command::PointerDown { viewport, x, y })
}
