//! Line-oriented interactive session.
//!
//! Plain lines are collected as one block of recognized text and merged into
//! the session on a blank line. Lines starting with `:` are commands. Item
//! numbers are 1-based.

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::ValueEnum;
use tracing::debug;

use ocrcalc::CalcError;
use ocrcalc::calculator::{MergeMode, Operator, Separator, Session, copy_value, format_display};

const HELP: &str = "\
Paste recognized text, then an empty line to add it.
  :op N OP        operator after number N (+ - * /)
  :set N VALUE    replace number N
  :del N          delete number N
  :eval           evaluate
  :clear          clear numbers and result
  :show           list numbers
  :history        list past results, newest first
  :combine on|off append new batches instead of replacing
  :row on|off     one number per line
  :thousands SEP  comma, period, space or none
  :decimal SEP    comma, period or none
  :copy [N]       copy the result, or history entry N
  :quit";

#[derive(Debug, PartialEq)]
enum ReplCommand {
    Operator(usize, Operator),
    Set(usize, String),
    Delete(usize),
    Eval,
    Clear,
    Show,
    History,
    Combine(bool),
    Row(bool),
    Thousands(Separator),
    Decimal(Separator),
    Copy(Option<usize>),
    Help,
    Quit,
}

/// Parse a command line without its leading `:`.
fn parse_command(line: &str) -> std::result::Result<ReplCommand, String> {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let command = match (name, args.as_slice()) {
        ("op", [n, op]) => ReplCommand::Operator(
            parse_position(n)?,
            Operator::from_symbol(op).ok_or_else(|| format!("unknown operator '{op}'"))?,
        ),
        ("set", [n, value @ ..]) if !value.is_empty() => {
            ReplCommand::Set(parse_position(n)?, value.join(" "))
        }
        ("del", [n]) => ReplCommand::Delete(parse_position(n)?),
        ("eval", []) => ReplCommand::Eval,
        ("clear", []) => ReplCommand::Clear,
        ("show", []) => ReplCommand::Show,
        ("history", []) => ReplCommand::History,
        ("combine", [flag]) => ReplCommand::Combine(parse_flag(flag)?),
        ("row", [flag]) => ReplCommand::Row(parse_flag(flag)?),
        ("thousands", [sep]) => ReplCommand::Thousands(Separator::from_str(sep, true)?),
        ("decimal", [sep]) => ReplCommand::Decimal(Separator::from_str(sep, true)?),
        ("copy", []) => ReplCommand::Copy(None),
        ("copy", [n]) => ReplCommand::Copy(Some(parse_position(n)?)),
        ("help", []) => ReplCommand::Help,
        ("quit" | "q", []) => ReplCommand::Quit,
        _ => return Err(format!("unknown command ':{line}', try :help")),
    };
    Ok(command)
}

/// 1-based position to index.
fn parse_position(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("'{s}' is not a position (1, 2, ...)")),
    }
}

/// `on`/`off` and their spellings.
fn parse_flag(s: &str) -> std::result::Result<bool, String> {
    match s {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(format!("expected on/off, got '{s}'")),
    }
}

/// Read lines from `input` until end of input or `:quit`, writing replies to
/// `out`. Command errors are reported and the session continues.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<()> {
    let mut pending = String::new();

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        if let Some(command) = trimmed.strip_prefix(':') {
            if !pending.is_empty() {
                ingest(session, &mut pending, out)?;
            }
            match parse_command(command) {
                Ok(ReplCommand::Quit) => return Ok(()),
                Ok(command) => {
                    if let Err(e) = execute(session, command, out) {
                        writeln!(out, "error: {e}")?;
                    }
                }
                Err(msg) => writeln!(out, "error: {msg}")?,
            }
        } else if trimmed.is_empty() {
            if !pending.is_empty() {
                ingest(session, &mut pending, out)?;
            }
        } else {
            pending.push_str(&line);
            pending.push('\n');
        }
    }

    if !pending.is_empty() {
        ingest(session, &mut pending, out)?;
    }
    Ok(())
}

/// Merge the collected block and echo the expression.
fn ingest<W: Write>(session: &mut Session, pending: &mut String, out: &mut W) -> Result<()> {
    let text = std::mem::take(pending);
    debug!(chars = text.len(), "ingesting block");

    match session.ingest(&text) {
        Ok(outcome) => {
            let verb = match outcome.mode {
                MergeMode::Replaced => "started with",
                MergeMode::Appended => "appended",
            };
            writeln!(out, "{verb} {} number(s)", outcome.added)?;
            if let Err(e) = outcome.evaluation {
                writeln!(out, "error: {e}")?;
            }
            write_expression(session, out)
        }
        Err(CalcError::NoNumbersFound) => {
            writeln!(out, "no numbers found")?;
            Ok(())
        }
        Err(e) => {
            writeln!(out, "error: {e}")?;
            Ok(())
        }
    }
}

/// Run one command. Errors go back to the caller to be printed.
fn execute<W: Write>(session: &mut Session, command: ReplCommand, out: &mut W) -> Result<()> {
    let separators = session.config().separators;

    match command {
        ReplCommand::Operator(index, op) => {
            session.set_operator(index, op)?;
            write_expression(session, out)?;
        }
        ReplCommand::Set(index, value) => {
            session.edit_value(index, &value)?;
            write_expression(session, out)?;
        }
        ReplCommand::Delete(index) => {
            session.delete_at(index)?;
            write_expression(session, out)?;
        }
        ReplCommand::Eval => {
            session.evaluate()?;
            write_expression(session, out)?;
        }
        ReplCommand::Clear => {
            session.clear();
            writeln!(out, "cleared")?;
        }
        ReplCommand::Show => {
            for (i, item) in session.expression().items().iter().enumerate() {
                let op = item.modifier().map(|op| op.to_string()).unwrap_or_default();
                writeln!(out, "[{}] {} {op}", i + 1, format_display(item.value, &separators))?;
            }
            write_result(session, out)?;
        }
        ReplCommand::History => {
            if session.history().is_empty() {
                writeln!(out, "no history")?;
            }
            for (i, entry) in session.history().newest_first().enumerate() {
                writeln!(out, "[{}] {}", i + 1, entry.expression_text(&separators))?;
            }
        }
        ReplCommand::Combine(enabled) => {
            session.set_combine_mode(enabled);
            writeln!(out, "combine {}", if enabled { "on" } else { "off" })?;
        }
        ReplCommand::Row(enabled) => {
            session.set_row_mode(enabled);
            writeln!(out, "row mode {}", if enabled { "on" } else { "off" })?;
        }
        ReplCommand::Thousands(sep) => {
            session.set_separators(separators.with_thousand_separator(sep));
            writeln!(out, "thousand separator: {sep:?}")?;
        }
        ReplCommand::Decimal(sep) => {
            session.set_separators(separators.with_decimal_point(sep));
            writeln!(out, "decimal point: {sep:?}")?;
        }
        ReplCommand::Copy(position) => {
            let value = match position {
                None => session.result(),
                Some(n) => session.history().recent(n).map(|e| e.result()),
            };
            let Some(value) = value else {
                writeln!(out, "nothing to copy")?;
                return Ok(());
            };
            let text = copy_value(value)?;
            writeln!(out, "copied {text}")?;
        }
        ReplCommand::Help => writeln!(out, "{HELP}")?,
        ReplCommand::Quit => {}
    }
    Ok(())
}

fn write_expression<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let separators = session.config().separators;
    let mut line = String::new();
    for item in session.expression().items() {
        line.push_str(&format_display(item.value, &separators));
        if let Some(op) = item.modifier() {
            line.push_str(&format!(" {op} "));
        }
    }
    writeln!(out, "{line}")?;
    write_result(session, out)
}

fn write_result<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    match session.result() {
        Some(result) => writeln!(
            out,
            "= {}",
            format_display(result, &session.config().separators)
        )?,
        None => writeln!(out, "= (not evaluated)")?,
    }
    Ok(())
}
