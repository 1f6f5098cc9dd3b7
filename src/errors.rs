//! Error taxonomy for grammar loading, cursor analysis and literal decoding.
//!
//! Grammar-level errors abort before any analysis can run. Analysis errors
//! short-circuit a single `suggest` call. Literal errors never abort anything:
//! they are attached to the suggestion they belong to.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Named source text used to attach grammar-file snippets to diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Context for grammar text that did not come from a file.
    pub fn inline(content: impl Into<String>) -> Self {
        Self::from_file("<inline>", content)
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.clone())
    }
}

// ============================================================================
// GRAMMAR ERRORS
// ============================================================================

/// Failures while reading a grammar or building its index.
#[derive(Debug, Error, Diagnostic)]
pub enum GrammarError {
    #[error("rule '{rule}' references unknown symbol '{symbol}'")]
    #[diagnostic(
        code(bnf_complete::unknown_rule),
        help("define a rule named '{symbol}', or spell the terminal as a quoted literal, a [class], a /pattern/ or an UPPER_CASE token")
    )]
    UnknownRule { rule: String, symbol: String },

    #[error("rule '{name}' is defined more than once")]
    #[diagnostic(code(bnf_complete::duplicate_rule))]
    DuplicateRule { name: String },

    #[error("grammar defines no rules")]
    #[diagnostic(code(bnf_complete::empty_grammar))]
    EmptyGrammar,

    #[error("grammar syntax error: {message}")]
    #[diagnostic(code(bnf_complete::grammar_syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid rule table: {0}")]
    #[diagnostic(
        code(bnf_complete::rule_table),
        help("a rule table is a JSON object mapping rule names to lists of alternatives")
    )]
    RuleTable(#[from] serde_json::Error),
}

// ============================================================================
// ANALYSIS ERRORS
// ============================================================================

/// Failures of a single completion analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CompletionError {
    #[error("no atomic node ends at cursor offset {cursor}")]
    #[diagnostic(
        code(bnf_complete::no_atomic_node),
        help("completion is only available when the cursor sits exactly at the end of a token")
    )]
    NoAtomicNodeAtCursor { cursor: usize },

    #[error("cursor offset {cursor} is outside the parsed input (0..={len})")]
    #[diagnostic(code(bnf_complete::cursor_out_of_range))]
    CursorOutOfRange { cursor: usize, len: usize },

    #[error("symbol '{symbol}' is neither a rule nor a terminal")]
    #[diagnostic(code(bnf_complete::unknown_symbol))]
    UnknownSymbol { symbol: String },

    #[error("malformed syntax tree: {reason}")]
    #[diagnostic(code(bnf_complete::malformed_tree))]
    MalformedTree { reason: String },
}

// ============================================================================
// LITERAL ERRORS
// ============================================================================

/// Why a terminal specifier could not be turned into concrete strings.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LiteralError {
    #[error("malformed terminal literal {literal}: {reason}")]
    #[diagnostic(code(bnf_complete::malformed_terminal_literal))]
    Malformed { literal: String, reason: String },

    #[error("terminal {literal} is not enumerable: {reason}")]
    #[diagnostic(code(bnf_complete::non_enumerable_terminal))]
    NonEnumerable { literal: String, reason: String },
}

impl LiteralError {
    pub(crate) fn malformed(literal: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn non_enumerable(literal: &str, reason: impl Into<String>) -> Self {
        Self::NonEnumerable {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }

    pub fn literal(&self) -> &str {
        match self {
            Self::Malformed { literal, .. } | Self::NonEnumerable { literal, .. } => literal,
        }
    }
}

/// Converts a byte range into a miette span.
pub fn to_source_span(start: usize, end: usize) -> SourceSpan {
    SourceSpan::new(start.into(), end.saturating_sub(start))
}
