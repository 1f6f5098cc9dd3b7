//! Grammar rule table and symbol classification.
//!
//! A grammar maps rule names to ordered alternatives; each alternative is an
//! ordered list of symbols. A symbol is either the name of another rule or a
//! terminal specifier in its surface form (`"+"`, `[0-9]`, `/\d+/`, `NUMBER`).

pub mod index;
pub mod literal;
pub mod parser;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::GrammarError;

pub use index::GrammarIndex;

/// One production: an ordered sequence of symbol names.
pub type Alternative = Vec<String>;

/// Upper-case identifiers name tokens produced by an external lexer.
static TOKEN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("token name regex is valid"));

/// How a symbol of an alternative is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Names a rule of the grammar.
    Nonterminal,
    /// A quoted string constant.
    Literal,
    /// A bracketed character class.
    CharClass,
    /// A slash-delimited regular expression.
    Pattern,
    /// An upper-case token name.
    Token,
}

impl SymbolKind {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SymbolKind::Nonterminal)
    }
}

/// Immutable rule table. Iteration follows definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grammar {
    rules: IndexMap<String, Vec<Alternative>>,
}

impl Grammar {
    /// Builds a grammar from `(name, alternatives)` pairs, rejecting duplicates.
    pub fn from_rules<I, N>(rules: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (N, Vec<Alternative>)>,
        N: Into<String>,
    {
        let mut table = IndexMap::new();
        for (name, alternatives) in rules {
            let name = name.into();
            if table.contains_key(&name) {
                return Err(GrammarError::DuplicateRule { name });
            }
            table.insert(name, alternatives);
        }
        if table.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }
        Ok(Self { rules: table })
    }

    /// Reads a rule table serialized as `{"rule": [["sym", ...], ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, GrammarError> {
        let grammar: Grammar = serde_json::from_str(json)?;
        if grammar.rules.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }
        Ok(grammar)
    }

    pub fn alternatives(&self, name: &str) -> Option<&[Alternative]> {
        self.rules.get(name).map(Vec::as_slice)
    }

    pub fn contains_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &[Alternative])> {
        self.rules
            .iter()
            .map(|(name, alternatives)| (name.as_str(), alternatives.as_slice()))
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classifies `symbol`; `None` when it is neither a rule nor a terminal.
    pub fn classify(&self, symbol: &str) -> Option<SymbolKind> {
        if self.contains_rule(symbol) {
            return Some(SymbolKind::Nonterminal);
        }
        classify_terminal(symbol)
    }
}

/// Classifies a symbol by its terminal surface syntax alone.
pub fn classify_terminal(symbol: &str) -> Option<SymbolKind> {
    match symbol.chars().next()? {
        '"' | '\'' => Some(SymbolKind::Literal),
        '[' => Some(SymbolKind::CharClass),
        '/' => Some(SymbolKind::Pattern),
        _ if TOKEN_NAME.is_match(symbol) => Some(SymbolKind::Token),
        _ => None,
    }
}
