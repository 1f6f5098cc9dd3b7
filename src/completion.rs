//! # Completion Engine
//!
//! Answers "what may come next?" for a cursor inside a parse tree.
//!
//! ## Pipeline
//! 1. [`context::resolve`] collects the nodes that close at the cursor.
//! 2. [`matcher::RuleMatcher`] finds, for each of them, the productions of
//!    their possible parents that agree with the siblings already parsed,
//!    and reads off the symbol after the node.
//! 3. [`expander::TerminalExpander`] turns each candidate symbol into the
//!    literal strings it can start with or contain.
//!
//! The engine holds only immutable data and can serve concurrent analyses.

pub mod context;
pub mod expander;
pub mod matcher;

use log::debug;
use serde::Serialize;

use crate::errors::{CompletionError, GrammarError};
use crate::grammar::{Grammar, GrammarIndex};
use crate::syntax::{NodeId, SyntaxTree};

pub use context::LeafSelection;
pub use expander::{OpaqueTerminal, TerminalExpander, TerminalExpansion};
pub use matcher::{AlternativeMatch, RuleMatcher};

/// Tunables for an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionOptions {
    pub leaf_selection: LeafSelection,
}

/// A candidate continuation and what it can be spelled as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub symbol: String,
    pub literals: Vec<String>,
    pub opaque: Vec<OpaqueTerminal>,
}

/// Grammar index plus options; one engine serves any number of trees.
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    index: GrammarIndex,
    options: CompletionOptions,
}

impl CompletionEngine {
    pub fn new(grammar: Grammar) -> Result<Self, GrammarError> {
        Ok(Self::from_index(GrammarIndex::build(grammar)?))
    }

    pub fn from_index(index: GrammarIndex) -> Self {
        Self {
            index,
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn index(&self) -> &GrammarIndex {
        &self.index
    }

    pub fn options(&self) -> CompletionOptions {
        self.options
    }

    /// Nodes closing at `cursor`, innermost first.
    pub fn context(&self, tree: &SyntaxTree, cursor: usize) -> Result<Vec<NodeId>, CompletionError> {
        context::resolve(tree, cursor, self.options.leaf_selection)
    }

    /// Deduplicated candidate symbols for `cursor`, in first-seen order.
    pub fn next_symbols(&self, tree: &SyntaxTree, cursor: usize) -> Result<Vec<String>, CompletionError> {
        let context = self.context(tree, cursor)?;
        let candidates = RuleMatcher::new(&self.index).candidate_symbols(tree, &context);
        debug!("cursor {cursor}: {} candidate symbols", candidates.len());
        Ok(candidates.into_iter().map(str::to_string).collect())
    }

    pub fn expand(&self, symbol: &str) -> Result<TerminalExpansion, CompletionError> {
        TerminalExpander::new(&self.index).expand(symbol)
    }

    /// Candidate symbols for `cursor`, each with its terminal expansion.
    pub fn suggest(&self, tree: &SyntaxTree, cursor: usize) -> Result<Vec<Suggestion>, CompletionError> {
        let expander = TerminalExpander::new(&self.index);
        self.next_symbols(tree, cursor)?
            .into_iter()
            .map(|symbol| -> Result<Suggestion, CompletionError> {
                let expansion = expander.expand(&symbol)?;
                Ok(Suggestion {
                    literals: expansion.literals.into_iter().collect(),
                    opaque: expansion.opaque,
                    symbol,
                })
            })
            .collect()
    }
}
