//! Rule matching and next-symbol resolution.
//!
//! A node's real parent has already committed to some production by the
//! children it holds. Only alternatives of the node's possible parent rules
//! whose prefix agrees with those children can say what may follow.

use indexmap::IndexSet;
use log::debug;

use crate::grammar::{Alternative, GrammarIndex};
use crate::syntax::{NodeId, SyntaxTree};

/// A parent-rule alternative consistent with the realized siblings of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternativeMatch<'g> {
    /// Name of the parent rule.
    pub rule: &'g str,
    pub alternative: &'g Alternative,
    /// Position of the node's type within `alternative`.
    pub index: usize,
}

impl<'g> AlternativeMatch<'g> {
    /// The symbol right after the node, or `None` when the alternative is complete.
    pub fn next_symbol(&self) -> Option<&'g str> {
        self.alternative.get(self.index + 1).map(String::as_str)
    }
}

/// Matches parse-tree nodes against the productions of their possible parents.
pub struct RuleMatcher<'g> {
    index: &'g GrammarIndex,
}

impl<'g> RuleMatcher<'g> {
    pub fn new(index: &'g GrammarIndex) -> Self {
        Self { index }
    }

    /// Alternatives of `node`'s potential parent rules that agree with the
    /// children its real parent has realized so far.
    ///
    /// Single-symbol wrapper alternatives (`P := T`) are skipped. A root node
    /// has no realized siblings and yields nothing.
    pub fn matching_alternatives(&self, tree: &SyntaxTree, node: NodeId) -> Vec<AlternativeMatch<'g>> {
        let current = tree.node(node);
        let kind = current.kind();
        let Some(parent) = current.parent() else {
            return Vec::new();
        };
        let siblings = tree.node(parent).children();

        let mut matches = Vec::new();
        for rule in self.index.parents_of(kind) {
            let Some(alternatives) = self.index.alternatives(rule) else {
                continue;
            };
            for alternative in alternatives {
                if alternative.len() == 1 {
                    continue;
                }
                for (index, _) in alternative.iter().enumerate().filter(|(_, s)| *s == kind) {
                    if self.prefix_agrees(tree, alternative, siblings, index, node) {
                        matches.push(AlternativeMatch {
                            rule,
                            alternative,
                            index,
                        });
                    }
                }
            }
        }
        matches
    }

    /// `alternative[..=index]` must equal the sibling types as far as both
    /// exist, and the sibling at `index`, if realized, must be `node` itself.
    fn prefix_agrees(
        &self,
        tree: &SyntaxTree,
        alternative: &Alternative,
        siblings: &[NodeId],
        index: usize,
        node: NodeId,
    ) -> bool {
        if siblings.get(index).is_some_and(|&s| s != node) {
            return false;
        }
        let realized = &siblings[..siblings.len().min(index + 1)];
        alternative
            .iter()
            .zip(realized)
            .all(|(symbol, &sibling)| tree.node(sibling).kind() == symbol)
    }

    /// Symbols that may directly follow `node`, in first-seen order.
    pub fn next_symbols(&self, tree: &SyntaxTree, node: NodeId) -> IndexSet<&'g str> {
        let symbols: IndexSet<&'g str> = self
            .matching_alternatives(tree, node)
            .iter()
            .filter_map(AlternativeMatch::next_symbol)
            .collect();
        debug!(
            "node '{}' at {:?}: next {:?}",
            tree.node(node).kind(),
            tree.node(node).span(),
            symbols
        );
        symbols
    }

    /// Union of [`Self::next_symbols`] over a cursor context, in first-seen order.
    pub fn candidate_symbols(&self, tree: &SyntaxTree, context: &[NodeId]) -> IndexSet<&'g str> {
        context
            .iter()
            .flat_map(|&node| self.next_symbols(tree, node))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::syntax::RawNode;

    fn index(rules: &[(&str, &[&[&str]])]) -> GrammarIndex {
        let grammar = Grammar::from_rules(rules.iter().map(|(name, alts)| {
            (
                name.to_string(),
                alts.iter()
                    .map(|alt| alt.iter().map(|s| s.to_string()).collect())
                    .collect(),
            )
        }))
        .unwrap();
        GrammarIndex::build(grammar).unwrap()
    }

    fn find(tree: &SyntaxTree, kind: &str) -> NodeId {
        tree.preorder()
            .find(|&id| tree.node(id).kind() == kind)
            .unwrap()
    }

    #[test]
    fn test_matching_alternative_carries_index() {
        let index = index(&[
            ("expr", &[&["term", "\"+\"", "term"], &["term", "\"-\"", "term"], &["term"]]),
            ("term", &[&["NUMBER"]]),
        ]);
        let tree = SyntaxTree::from_raw(RawNode::branch(
            "expr",
            vec![
                RawNode::branch("term", vec![RawNode::leaf("NUMBER", "12", 0, 2)]),
                RawNode::leaf("\"+\"", "+", 2, 3),
            ],
        ))
        .unwrap();
        let matcher = RuleMatcher::new(&index);

        let plus = find(&tree, "\"+\"");
        let matches = matcher.matching_alternatives(&tree, plus);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rule, "expr");
        assert_eq!(matches[0].index, 1);
        assert_eq!(matches[0].next_symbol(), Some("term"));
    }

    #[test]
    fn test_prefix_mismatch_excludes_alternative() {
        let index = index(&[
            ("stmt", &[&["\"let\"", "ID", "\"=\"", "expr"], &["ID", "\"=\"", "expr"]]),
            ("expr", &[&["ID"]]),
        ]);
        // x = ...  : the "let" alternative disagrees with the first sibling.
        let tree = SyntaxTree::from_raw(RawNode::branch(
            "stmt",
            vec![RawNode::leaf("ID", "x", 0, 1), RawNode::leaf("\"=\"", "=", 2, 3)],
        ))
        .unwrap();
        let matcher = RuleMatcher::new(&index);

        let eq = find(&tree, "\"=\"");
        let next: Vec<_> = matcher.next_symbols(&tree, eq).into_iter().collect();
        assert_eq!(next, vec!["expr"]);
    }

    #[test]
    fn test_occurrence_must_be_the_node_itself() {
        let index = index(&[
            ("sum", &[&["term", "\"+\"", "term", "\";\""]]),
            ("term", &[&["NUMBER"]]),
        ]);
        let tree = SyntaxTree::from_raw(RawNode::branch(
            "sum",
            vec![
                RawNode::branch("term", vec![RawNode::leaf("NUMBER", "1", 0, 1)]),
                RawNode::leaf("\"+\"", "+", 1, 2),
                RawNode::branch("term", vec![RawNode::leaf("NUMBER", "2", 2, 3)]),
            ],
        ))
        .unwrap();
        let matcher = RuleMatcher::new(&index);

        // Position 2 decides, so the answer is ";" and not the "+" after position 0.
        let second_term = tree.node(tree.root()).children()[2];
        let next: Vec<_> = matcher.next_symbols(&tree, second_term).into_iter().collect();
        assert_eq!(next, vec!["\";\""]);
    }

    #[test]
    fn test_trivial_wrapper_is_excluded() {
        let index = index(&[
            ("paren", &[&["\"(\"", "expr", "\")\""]]),
            ("expr", &[&["paren"], &["term"]]),
            ("term", &[&["NUMBER"]]),
        ]);
        // ( 1   : term is wrapped by expr := term, which must not match.
        let tree = SyntaxTree::from_raw(RawNode::branch(
            "paren",
            vec![
                RawNode::leaf("\"(\"", "(", 0, 1),
                RawNode::branch(
                    "expr",
                    vec![RawNode::branch("term", vec![RawNode::leaf("NUMBER", "1", 1, 2)])],
                ),
            ],
        ))
        .unwrap();
        let matcher = RuleMatcher::new(&index);

        let term = find(&tree, "term");
        assert!(matcher.matching_alternatives(&tree, term).is_empty());

        let expr = find(&tree, "expr");
        let next: Vec<_> = matcher.next_symbols(&tree, expr).into_iter().collect();
        assert_eq!(next, vec!["\")\""]);
    }

    #[test]
    fn test_root_has_no_alternatives() {
        let index = index(&[("expr", &[&["NUMBER", "\"!\""]])]);
        let tree = SyntaxTree::from_raw(RawNode::branch(
            "expr",
            vec![RawNode::leaf("NUMBER", "1", 0, 1)],
        ))
        .unwrap();
        let matcher = RuleMatcher::new(&index);
        assert!(matcher.matching_alternatives(&tree, tree.root()).is_empty());
    }

    #[test]
    fn test_exhausted_alternative_contributes_nothing() {
        let index = index(&[
            ("pair", &[&["ID", "\":\"", "ID"]]),
        ]);
        let tree = SyntaxTree::from_raw(RawNode::branch(
            "pair",
            vec![
                RawNode::leaf("ID", "a", 0, 1),
                RawNode::leaf("\":\"", ":", 1, 2),
                RawNode::leaf("ID", "b", 2, 3),
            ],
        ))
        .unwrap();
        let matcher = RuleMatcher::new(&index);

        let last = tree.node(tree.root()).children()[2];
        assert_eq!(matcher.matching_alternatives(&tree, last).len(), 1);
        assert!(matcher.next_symbols(&tree, last).is_empty());
    }

    #[test]
    fn test_candidates_are_deduplicated_in_order() {
        let index = index(&[
            ("block", &[&["stmt", "\";\"", "block"], &["stmt", "\";\""]]),
            ("stmt", &[&["ID"]]),
        ]);
        let tree = SyntaxTree::from_raw(RawNode::branch(
            "block",
            vec![RawNode::branch("stmt", vec![RawNode::leaf("ID", "x", 0, 1)])],
        ))
        .unwrap();
        let matcher = RuleMatcher::new(&index);

        let stmt = find(&tree, "stmt");
        let id = find(&tree, "ID");
        let candidates: Vec<_> = matcher.candidate_symbols(&tree, &[id, stmt]).into_iter().collect();
        assert_eq!(candidates, vec!["\";\""]);
    }
}
