//! User-facing output: colored text for terminals, JSON for tools.

use std::io::{self, IsTerminal, Write};

use miette::IntoDiagnostic;
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::completion::{Suggestion, TerminalExpansion};
use crate::grammar::{Grammar, GrammarIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Text,
    Json,
}

impl Mode {
    pub fn new(json: bool) -> Self {
        if json {
            Mode::Json
        } else {
            Mode::Text
        }
    }
}

// ============================================================================
// COMMAND OUTPUT
// ============================================================================

pub fn print_suggestions(mode: Mode, suggestions: &[Suggestion]) -> miette::Result<()> {
    if mode == Mode::Json {
        return print_json(suggestions);
    }
    let mut out = stdout();
    if suggestions.is_empty() {
        writeln!(out, "no suggestions").into_diagnostic()?;
    }
    for suggestion in suggestions {
        write_heading(&mut out, &suggestion.symbol).into_diagnostic()?;
        write_literals(&mut out, suggestion.literals.iter().map(String::as_str)).into_diagnostic()?;
        for opaque in &suggestion.opaque {
            write_opaque(&mut out, &opaque.symbol, &opaque.reason.to_string()).into_diagnostic()?;
        }
    }
    Ok(())
}

pub fn print_expansion(mode: Mode, symbol: &str, expansion: &TerminalExpansion) -> miette::Result<()> {
    if mode == Mode::Json {
        return print_json(expansion);
    }
    let mut out = stdout();
    write_heading(&mut out, symbol).into_diagnostic()?;
    write_literals(&mut out, expansion.literals.iter().map(String::as_str)).into_diagnostic()?;
    for opaque in &expansion.opaque {
        write_opaque(&mut out, &opaque.symbol, &opaque.reason.to_string()).into_diagnostic()?;
    }
    Ok(())
}

pub fn print_rules(mode: Mode, grammar: &Grammar) -> miette::Result<()> {
    if mode == Mode::Json {
        return print_json(grammar);
    }
    let mut out = stdout();
    for (name, alternatives) in grammar.rules() {
        let body = alternatives
            .iter()
            .map(|alt| if alt.is_empty() { "ε".to_string() } else { alt.join(" ") })
            .collect::<Vec<_>>()
            .join(" | ");
        write_colored(&mut out, name, Color::Cyan, true).into_diagnostic()?;
        writeln!(out, " ::= {body}").into_diagnostic()?;
    }
    Ok(())
}

pub fn print_parents(mode: Mode, index: &GrammarIndex) -> miette::Result<()> {
    if mode == Mode::Json {
        return print_json(index.reverse_index());
    }
    let mut out = stdout();
    for (symbol, parents) in index.reverse_index() {
        write_colored(&mut out, symbol, Color::Cyan, true).into_diagnostic()?;
        let parents = parents.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        writeln!(out, " <- {parents}").into_diagnostic()?;
    }
    Ok(())
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn stdout() -> StandardStream {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> miette::Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn write_colored(out: &mut StandardStream, text: &str, color: Color, bold: bool) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))?;
    write!(out, "{text}")?;
    out.reset()
}

fn write_heading(out: &mut StandardStream, symbol: &str) -> io::Result<()> {
    write_colored(out, symbol, Color::Yellow, true)?;
    writeln!(out)
}

fn write_literals<'a>(out: &mut StandardStream, literals: impl Iterator<Item = &'a str>) -> io::Result<()> {
    for literal in literals {
        write!(out, "  ")?;
        write_colored(out, &format!("{literal:?}"), Color::Green, false)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_opaque(out: &mut StandardStream, symbol: &str, reason: &str) -> io::Result<()> {
    write!(out, "  ")?;
    write_colored(out, &format!("<{symbol}>"), Color::Magenta, false)?;
    writeln!(out, " ({reason})")
}
