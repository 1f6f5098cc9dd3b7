//! Grammar-file reader.
//!
//! Reads BNF text (with EBNF groups and repetition operators) into a flat
//! rule table. Groups and repetitions become synthetic rules named
//! `%<rule>[<n>]`, so every alternative is a plain symbol sequence.

use pest::error::{Error, InputLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{to_source_span, GrammarError, SourceContext};
use crate::grammar::{Alternative, Grammar};

#[derive(Parser)]
#[grammar = "grammar/bnf.pest"]
struct BnfParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses grammar text that did not come from a named file.
pub fn parse_grammar(text: &str) -> Result<Grammar, GrammarError> {
    parse_grammar_source(&SourceContext::inline(text))
}

/// Parses grammar text, attributing syntax errors to `source`.
pub fn parse_grammar_source(source: &SourceContext) -> Result<Grammar, GrammarError> {
    let mut pairs = BnfParser::parse(Rule::grammar, &source.content)
        .map_err(|e| convert_parse_error(e, source))?;
    let grammar = pairs
        .next()
        .ok_or_else(|| syntax_error(source, "empty parse", 0, 0))?;

    let mut rules = Vec::new();
    for rule in grammar.into_inner().filter(|p| p.as_rule() == Rule::rule) {
        let mut lowering = RuleLowering::new(rule_name(&rule, source)?);
        let alternatives = lowering.lower_rule(rule, source)?;
        rules.push((lowering.owner.clone(), alternatives));
        rules.extend(lowering.synthetic);
    }

    Grammar::from_rules(rules)
}

// ============================================================================
// LOWERING
// ============================================================================

/// Flattens one rule definition, collecting the synthetic rules it needs.
struct RuleLowering {
    owner: String,
    counter: usize,
    synthetic: Vec<(String, Vec<Alternative>)>,
}

impl RuleLowering {
    fn new(owner: String) -> Self {
        Self {
            owner,
            counter: 0,
            synthetic: Vec::new(),
        }
    }

    fn lower_rule(
        &mut self,
        rule: Pair<Rule>,
        source: &SourceContext,
    ) -> Result<Vec<Alternative>, GrammarError> {
        let alternation = rule
            .into_inner()
            .find(|p| p.as_rule() == Rule::alternation)
            .ok_or_else(|| syntax_error(source, "rule without body", 0, 0))?;
        self.lower_alternation(alternation, source)
    }

    fn lower_alternation(
        &mut self,
        pair: Pair<Rule>,
        source: &SourceContext,
    ) -> Result<Vec<Alternative>, GrammarError> {
        pair.into_inner()
            .map(|sequence| self.lower_sequence(sequence, source))
            .collect()
    }

    fn lower_sequence(
        &mut self,
        pair: Pair<Rule>,
        source: &SourceContext,
    ) -> Result<Alternative, GrammarError> {
        pair.into_inner()
            .map(|item| self.lower_item(item, source))
            .collect()
    }

    fn lower_item(&mut self, pair: Pair<Rule>, source: &SourceContext) -> Result<String, GrammarError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let primary = inner
            .next()
            .ok_or_else(|| syntax_error(source, "empty item", span.start(), span.end()))?;

        let symbol = match primary.as_rule() {
            Rule::group => {
                let alternation = primary.into_inner().next().ok_or_else(|| {
                    syntax_error(source, "empty group", span.start(), span.end())
                })?;
                let alternatives = self.lower_alternation(alternation, source)?;
                self.synthesize(alternatives)
            }
            Rule::reference => identifier_text(primary),
            _ => primary.as_str().to_string(),
        };

        Ok(match inner.next().map(|p| p.as_str()) {
            Some("?") => self.synthesize(vec![vec![symbol], vec![]]),
            Some("*") => {
                let name = self.next_name();
                self.push(name, |name| vec![vec![symbol, name.to_string()], vec![]])
            }
            Some("+") => {
                let name = self.next_name();
                self.push(name, |name| {
                    vec![vec![symbol.clone(), name.to_string()], vec![symbol]]
                })
            }
            _ => symbol,
        })
    }

    fn synthesize(&mut self, alternatives: Vec<Alternative>) -> String {
        let name = self.next_name();
        self.push(name, |_| alternatives)
    }

    fn push(&mut self, name: String, build: impl FnOnce(&str) -> Vec<Alternative>) -> String {
        let alternatives = build(&name);
        self.synthetic.push((name.clone(), alternatives));
        name
    }

    fn next_name(&mut self) -> String {
        self.counter += 1;
        format!("%{}[{}]", self.owner, self.counter)
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn rule_name(rule: &Pair<Rule>, source: &SourceContext) -> Result<String, GrammarError> {
    let span = rule.as_span();
    rule.clone()
        .into_inner()
        .find(|p| p.as_rule() == Rule::rule_name)
        .map(identifier_text)
        .ok_or_else(|| syntax_error(source, "rule without name", span.start(), span.end()))
}

/// Text of the identifier inside a `name` or `<name>` pair.
fn identifier_text(pair: Pair<Rule>) -> String {
    let text = pair.as_str();
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::identifier)
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| text.to_string())
}

fn syntax_error(source: &SourceContext, message: &str, start: usize, end: usize) -> GrammarError {
    GrammarError::Syntax {
        message: message.to_string(),
        src: source.to_named_source(),
        span: to_source_span(start, end),
    }
}

fn convert_parse_error(error: Error<Rule>, source: &SourceContext) -> GrammarError {
    let (start, end) = match &error.location {
        InputLocation::Pos(pos) => (*pos, *pos),
        InputLocation::Span((start, end)) => (*start, *end),
    };
    syntax_error(source, &error.variant.message(), start, end)
}
