//! Grammar-aware autocompletion.
//!
//! Given a grammar as named production rules and the parse tree of an input,
//! computes which grammar symbols may follow the token ending at a cursor and
//! which concrete strings those symbols can expand to.

pub mod cli;
pub mod completion;
pub mod errors;
pub mod grammar;
pub mod syntax;

// Re-exports for concise imports
pub use completion::{CompletionEngine, CompletionOptions, LeafSelection, Suggestion};
pub use errors::{CompletionError, GrammarError, LiteralError, SourceContext};
pub use grammar::parser::{parse_grammar, parse_grammar_source};
pub use grammar::{Grammar, GrammarIndex, SymbolKind};
pub use syntax::{NodeId, RawNode, Span, SyntaxTree};
