//! Expansion of candidate symbols into concrete terminal strings.

use indexmap::{IndexMap, IndexSet};
use log::trace;
use serde::Serialize;

use crate::errors::{CompletionError, LiteralError};
use crate::grammar::literal::decode_terminal;
use crate::grammar::{GrammarIndex, SymbolKind};

/// A reachable terminal that has no finite spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueTerminal {
    pub symbol: String,
    pub reason: LiteralError,
}

/// Everything a symbol can expand to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TerminalExpansion {
    /// Concrete strings, deduplicated in discovery order.
    pub literals: IndexSet<String>,
    /// Terminals reported as suggested but not enumerable.
    pub opaque: Vec<OpaqueTerminal>,
}

impl TerminalExpansion {
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.opaque.is_empty()
    }
}

/// Walks nonterminals down to their terminals, breaking cycles.
pub struct TerminalExpander<'g> {
    index: &'g GrammarIndex,
}

impl<'g> TerminalExpander<'g> {
    pub fn new(index: &'g GrammarIndex) -> Self {
        Self { index }
    }

    /// Expands `symbol` through every alternative of every reachable rule.
    ///
    /// Each rule is expanded at most once per call, so recursive grammars
    /// terminate. Terminals that cannot be enumerated land in `opaque`
    /// instead of failing the expansion.
    pub fn expand(&self, symbol: &str) -> Result<TerminalExpansion, CompletionError> {
        if self.index.classify(symbol).is_none() {
            return Err(CompletionError::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }

        let mut visited = IndexSet::new();
        let mut terminals = IndexMap::new();
        self.collect(symbol, &mut visited, &mut terminals);

        let mut expansion = TerminalExpansion::default();
        for (terminal, kind) in terminals {
            match decode_terminal(terminal, kind) {
                Ok(values) => expansion.literals.extend(values),
                Err(reason) => expansion.opaque.push(OpaqueTerminal {
                    symbol: terminal.to_string(),
                    reason,
                }),
            }
        }
        trace!(
            "expanded '{symbol}' to {} literals, {} opaque",
            expansion.literals.len(),
            expansion.opaque.len()
        );
        Ok(expansion)
    }

    fn collect<'a>(
        &self,
        symbol: &'a str,
        visited: &mut IndexSet<&'a str>,
        terminals: &mut IndexMap<&'a str, SymbolKind>,
    ) where
        'g: 'a,
    {
        let Some(kind) = self.index.classify(symbol) else {
            return;
        };
        let first_visit = visited.insert(symbol);

        if kind.is_terminal() {
            terminals.insert(symbol, kind);
            return;
        }
        if !first_visit {
            return;
        }

        trace!("expanding rule '{symbol}'");
        for alternative in self.index.alternatives(symbol).unwrap_or_default() {
            for next in alternative {
                self.collect(next, visited, terminals);
            }
        }
    }
}
