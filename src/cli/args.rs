//! Command-line arguments and subcommands for `bnf-complete`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::completion::LeafSelection;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "bnf-complete",
    version,
    about = "Grammar-aware completion: what may follow the token at a cursor."
)]
pub struct CompleteArgs {
    /// Log analysis steps to stderr (overridden by BNF_COMPLETE_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON instead of colored text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the grammar comes from. Files ending in `.json` are rule tables,
/// anything else is BNF text.
#[derive(Debug, Args)]
pub struct GrammarArg {
    #[arg(short, long, value_name = "FILE")]
    pub grammar: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Suggest next symbols and their literals for a cursor in a parse tree.
    Suggest {
        #[command(flatten)]
        grammar: GrammarArg,
        /// JSON parse tree: {"type", "text", "start", "end", "children"}.
        #[arg(short, long, value_name = "FILE")]
        tree: PathBuf,
        /// Offset into the parsed input.
        #[arg(short, long)]
        cursor: usize,
        /// Which leaves ending at the cursor seed the context.
        #[arg(long, value_enum, default_value_t = LeafArg::Union)]
        leaf_selection: LeafArg,
    },
    /// Print the normalized rule table.
    Rules {
        #[command(flatten)]
        grammar: GrammarArg,
    },
    /// Print the reverse index: each symbol with the rules that reference it.
    Parents {
        #[command(flatten)]
        grammar: GrammarArg,
    },
    /// Expand a symbol into the terminal strings it can produce.
    Expand {
        #[command(flatten)]
        grammar: GrammarArg,
        /// Rule name or terminal specifier.
        symbol: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LeafArg {
    Union,
    Rightmost,
    First,
}

impl From<LeafArg> for LeafSelection {
    fn from(arg: LeafArg) -> Self {
        match arg {
            LeafArg::Union => LeafSelection::Union,
            LeafArg::Rightmost => LeafSelection::Rightmost,
            LeafArg::First => LeafSelection::FirstInPreOrder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        CompleteArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_suggest() {
        let args = CompleteArgs::try_parse_from([
            "bnf-complete",
            "suggest",
            "-g",
            "g.bnf",
            "-t",
            "tree.json",
            "-c",
            "3",
            "--leaf-selection",
            "first",
            "--json",
        ])
        .unwrap();
        assert!(args.json);
        match args.command {
            Command::Suggest {
                cursor,
                leaf_selection,
                ..
            } => {
                assert_eq!(cursor, 3);
                assert_eq!(LeafSelection::from(leaf_selection), LeafSelection::FirstInPreOrder);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
