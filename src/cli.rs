//! The `bnf-complete` command-line interface.
//!
//! Loads a grammar (and, for `suggest`, a JSON parse tree), runs the
//! completion engine and hands results to [`output`].

use std::fs;
use std::path::Path;

use clap::Parser;
use log::info;
use miette::{IntoDiagnostic, WrapErr};

use crate::cli::args::{Command, CompleteArgs};
use crate::completion::{CompletionEngine, CompletionOptions};
use crate::errors::SourceContext;
use crate::grammar::parser::parse_grammar_source;
use crate::grammar::Grammar;
use crate::syntax::SyntaxTree;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<()> {
    let args = CompleteArgs::parse();
    init_logging(args.verbose);
    let mode = output::Mode::new(args.json);

    match args.command {
        Command::Suggest {
            grammar,
            tree,
            cursor,
            leaf_selection,
        } => {
            let options = CompletionOptions {
                leaf_selection: leaf_selection.into(),
            };
            let engine = CompletionEngine::new(load_grammar(&grammar.grammar)?)?.with_options(options);
            let tree = load_tree(&tree)?;
            let suggestions = engine.suggest(&tree, cursor)?;
            info!("{} suggestions at offset {cursor}", suggestions.len());
            output::print_suggestions(mode, &suggestions)
        }
        Command::Rules { grammar } => output::print_rules(mode, &load_grammar(&grammar.grammar)?),
        Command::Parents { grammar } => {
            let engine = CompletionEngine::new(load_grammar(&grammar.grammar)?)?;
            output::print_parents(mode, engine.index())
        }
        Command::Expand { grammar, symbol } => {
            let engine = CompletionEngine::new(load_grammar(&grammar.grammar)?)?;
            let expansion = engine.expand(&symbol)?;
            output::print_expansion(mode, &symbol, &expansion)
        }
    }
}

/// Reads a grammar file: `.json` files are rule tables, anything else is BNF.
pub fn load_grammar(path: &Path) -> miette::Result<Grammar> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read grammar '{}'", path.display()))?;

    let grammar = if path.extension().is_some_and(|ext| ext == "json") {
        Grammar::from_json_str(&content)?
    } else {
        parse_grammar_source(&SourceContext::from_file(path.display().to_string(), content))?
    };
    info!("loaded {} rules from {}", grammar.len(), path.display());
    Ok(grammar)
}

/// Reads a JSON parse tree.
pub fn load_tree(path: &Path) -> miette::Result<SyntaxTree> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read parse tree '{}'", path.display()))?;
    Ok(SyntaxTree::from_json_str(&content)?)
}

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default()
        .filter_or("BNF_COMPLETE_LOG", if verbose { "debug" } else { "warn" });
    // A second initialization (e.g. from tests) keeps the first logger.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(verbose)
        .try_init();
}
