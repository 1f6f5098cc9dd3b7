//! Parse-tree input for completion.
//!
//! The external parser hands over a nested [`RawNode`] tree. [`SyntaxTree`]
//! flattens it into an arena where children are owned top-down and each node
//! keeps a plain index back to its parent for upward navigation.

use serde::{Deserialize, Serialize};

use crate::errors::CompletionError;

/// Half-open range of offsets into the parsed input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Nested node as produced by an external parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    /// Rule name, or the terminal's surface form for terminal leaves.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn leaf(kind: impl Into<String>, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            start,
            end,
            children: Vec::new(),
        }
    }

    /// A node spanning from its first child's start to its last child's end.
    pub fn branch(kind: impl Into<String>, children: Vec<RawNode>) -> Self {
        let start = children.first().map_or(0, |c| c.start);
        let end = children.last().map_or(start, |c| c.end);
        let text = children.iter().map(|c| c.text.as_str()).collect();
        Self {
            kind: kind.into(),
            text,
            start,
            end,
            children,
        }
    }
}

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: String,
    text: String,
    span: Span,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Read-only parse tree with synthesized parent links. Nodes are stored in
/// pre-order, so the root is always the first node.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Flattens `raw` into an arena, linking every child to its parent.
    pub fn from_raw(raw: RawNode) -> Result<Self, CompletionError> {
        let mut nodes = Vec::new();
        let mut pending = vec![(raw, None::<NodeId>)];

        while let Some((raw, parent)) = pending.pop() {
            if raw.start > raw.end {
                return Err(CompletionError::MalformedTree {
                    reason: format!(
                        "node '{}' starts at {} after its end {}",
                        raw.kind, raw.start, raw.end
                    ),
                });
            }

            let id = NodeId(nodes.len());
            nodes.push(Node {
                kind: raw.kind,
                text: raw.text,
                span: Span::new(raw.start, raw.end),
                children: Vec::with_capacity(raw.children.len()),
                parent,
            });
            if let Some(NodeId(p)) = parent {
                nodes[p].children.push(id);
            }
            // Reverse so that children are visited, and numbered, left to right.
            pending.extend(raw.children.into_iter().rev().map(|child| (child, Some(id))));
        }

        Ok(Self { nodes })
    }

    /// Parses the JSON form of a [`RawNode`] tree.
    ///
    /// Nesting depth is unbounded: right-recursive repetition rules nest one
    /// level per repeated item, so the stack grows on demand instead.
    pub fn from_json_str(json: &str) -> Result<Self, CompletionError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let raw = RawNode::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
            .and_then(|raw| deserializer.end().map(|()| raw))
            .map_err(|e| CompletionError::MalformedTree {
                reason: e.to_string(),
            })?;
        Self::from_raw(raw)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in pre-order.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Ancestors of `id`, nearest first, ending with the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |&p| self.node(p).parent)
    }

    /// Position of `id` among its parent's children.
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        self.node(parent).children.iter().position(|&c| c == id)
    }
}
