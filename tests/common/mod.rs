//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use bnf_complete::{parse_grammar_source, CompletionEngine, Grammar, SourceContext, SyntaxTree};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture(name)).unwrap_or_else(|e| panic!("fixture {name}: {e}"))
}

/// Loads a `.bnf` grammar or a `.json` rule table from the fixtures.
pub fn load_grammar(name: &str) -> Grammar {
    let content = read_fixture(name);
    if name.ends_with(".json") {
        Grammar::from_json_str(&content).unwrap()
    } else {
        parse_grammar_source(&SourceContext::from_file(name, content)).unwrap()
    }
}

pub fn load_engine(name: &str) -> CompletionEngine {
    CompletionEngine::new(load_grammar(name)).unwrap()
}

pub fn load_tree(name: &str) -> SyntaxTree {
    SyntaxTree::from_json_str(&read_fixture(name)).unwrap()
}

/// Builds a grammar from string slices.
pub fn grammar(rules: &[(&str, &[&[&str]])]) -> Grammar {
    Grammar::from_rules(rules.iter().map(|(name, alts)| {
        (
            name.to_string(),
            alts.iter()
                .map(|alt| alt.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }))
    .unwrap()
}
