//! Cursor context resolution: which nodes close exactly at the cursor.

use indexmap::IndexSet;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::CompletionError;
use crate::syntax::{NodeId, SyntaxTree};

/// Which leaves ending at the cursor seed the context when there are several
/// (zero-width nodes or adjacent tokens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafSelection {
    /// Every such leaf, rightmost-starting first.
    #[default]
    Union,
    /// Only the leaf with the greatest start offset.
    Rightmost,
    /// Only the first leaf met in pre-order.
    FirstInPreOrder,
}

/// Returns every node whose span ends at `cursor`, innermost first.
///
/// Each selected leaf contributes itself followed by its ancestors for as
/// long as they also end at the cursor. A node reached from two leaves is
/// listed once, at its first position.
///
/// The root's span is taken as the extent of the input text, so the parser
/// must let it cover trailing whitespace. A cursor inside that whitespace is
/// in range but has no token ending at it.
pub fn resolve(
    tree: &SyntaxTree,
    cursor: usize,
    selection: LeafSelection,
) -> Result<Vec<NodeId>, CompletionError> {
    let len = tree.node(tree.root()).span().end;
    if cursor > len {
        return Err(CompletionError::CursorOutOfRange { cursor, len });
    }

    let mut leaves: Vec<NodeId> = tree
        .preorder()
        .filter(|&id| {
            let node = tree.node(id);
            node.is_leaf() && node.span().end == cursor
        })
        .collect();
    if leaves.is_empty() {
        return Err(CompletionError::NoAtomicNodeAtCursor { cursor });
    }

    // Stable: pre-order breaks ties between leaves with the same start.
    leaves.sort_by(|a, b| tree.node(*b).span().start.cmp(&tree.node(*a).span().start));
    match selection {
        LeafSelection::Union => {}
        LeafSelection::Rightmost => leaves.truncate(1),
        LeafSelection::FirstInPreOrder => {
            leaves = leaves.iter().copied().min().into_iter().collect();
        }
    }

    let mut context = IndexSet::new();
    for leaf in leaves {
        context.insert(leaf);
        for ancestor in tree.ancestors(leaf) {
            if tree.node(ancestor).span().end != cursor {
                break;
            }
            context.insert(ancestor);
        }
    }

    debug!(
        "cursor {cursor}: context [{}]",
        context
            .iter()
            .map(|&id| tree.node(id).kind())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(context.into_iter().collect())
}
