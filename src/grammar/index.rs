//! Grammar index: rule lookup plus the reverse (child to parent) index.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::errors::GrammarError;
use crate::grammar::{Alternative, Grammar, SymbolKind};

/// A validated grammar together with its reverse index.
///
/// Built once per grammar and shared read-only by any number of analyses.
#[derive(Debug, Clone)]
pub struct GrammarIndex {
    grammar: Grammar,
    parents: IndexMap<String, IndexSet<String>>,
}

impl GrammarIndex {
    /// Validates every symbol reference and builds the reverse index.
    ///
    /// For each rule `A` and each symbol `B != A` in one of its alternatives,
    /// `A` is recorded as a parent of `B`. Terminal symbols are indexed too,
    /// since parse-tree leaves carry the terminal's surface form as their type.
    pub fn build(grammar: Grammar) -> Result<Self, GrammarError> {
        let mut parents: IndexMap<String, IndexSet<String>> = IndexMap::new();

        for (rule, alternatives) in grammar.rules() {
            for symbol in alternatives.iter().flatten() {
                if grammar.classify(symbol).is_none() {
                    return Err(GrammarError::UnknownRule {
                        rule: rule.to_string(),
                        symbol: symbol.clone(),
                    });
                }
                if symbol == rule {
                    continue;
                }
                parents
                    .entry(symbol.clone())
                    .or_default()
                    .insert(rule.to_string());
            }
        }

        debug!(
            "indexed {} rules, {} referenced symbols",
            grammar.len(),
            parents.len()
        );
        Ok(Self { grammar, parents })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn alternatives(&self, rule: &str) -> Option<&[Alternative]> {
        self.grammar.alternatives(rule)
    }

    pub fn is_rule(&self, name: &str) -> bool {
        self.grammar.contains_rule(name)
    }

    pub fn classify(&self, symbol: &str) -> Option<SymbolKind> {
        self.grammar.classify(symbol)
    }

    /// Rules referencing `symbol`, in grammar order. Empty for roots.
    pub fn parents_of(&self, symbol: &str) -> impl Iterator<Item = &str> {
        self.parents
            .get(symbol)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// The whole reverse index, keyed by referenced symbol.
    pub fn reverse_index(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.parents
    }
}
