//! Generic syntax-tree nodes for the rill language.
//!
//! The interpreter works on a uniform tree shape rather than typed
//! per-construct structs: every node carries a [`NodeTag`], the literal
//! source text (meaningful for identifiers and literals, empty
//! otherwise), a [`Span`], and ordered children. Both interpreter passes
//! dispatch on the tag.

use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of construct a [`Node`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeTag {
    /// A whole program unit (top-level statement sequence).
    Unit,
    /// A single statement wrapper.
    Statement,
    /// A `{ ... }` statement sequence (function and control-flow bodies).
    StatementList,
    /// Ordered function parameters; each child is a `VarRef` leaf.
    ParamList,
    /// Ordered call arguments.
    ArgList,

    /// Identifier leaf. Also used for binder positions (the name child of
    /// `VarDef`, `Func`, and `FnCall`), where only its text is consulted.
    VarRef,
    /// `var NAME;` — child 0 is the name leaf.
    VarDef,
    /// `NAME = expr` — child 0 is the target `VarRef`, child 1 the value.
    Assign,
    /// Integer literal leaf; the text holds the digits.
    IntLiteral,
    /// String literal leaf; the text holds the (unquoted) contents.
    StrLiteral,

    Add,
    Sub,
    Mul,
    Div,
    LogicalAnd,
    LogicalOr,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    NotEq,

    /// `if (cond) { .. }` with an optional third else-branch child.
    If,
    /// `while (cond) { .. }`.
    While,
    /// `function NAME (params) { body }` — children are the name leaf, an
    /// optional `ParamList`, and the body `StatementList`.
    Func,
    /// `NAME(args)` — children are the callee name leaf and an optional
    /// `ArgList`.
    FnCall,
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub tag: NodeTag,
    /// Literal source text; empty for interior nodes.
    pub text: String,
    pub span: Span,
    pub children: Vec<Node>,
}

impl Node {
    /// Create an interior node with no text and no children yet.
    pub fn new(tag: NodeTag, span: Span) -> Self {
        Self {
            tag,
            text: String::new(),
            span,
            children: Vec::new(),
        }
    }

    /// Create a leaf node carrying literal text.
    pub fn leaf(tag: NodeTag, text: impl Into<String>, span: Span) -> Self {
        Self {
            tag,
            text: text.into(),
            span,
            children: Vec::new(),
        }
    }

    /// Create an interior node with the given children.
    pub fn with_children(tag: NodeTag, span: Span, children: Vec<Node>) -> Self {
        Self {
            tag,
            text: String::new(),
            span,
            children,
        }
    }

    /// Append a child, returning `self` for builder-style construction.
    pub fn push(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Indexed child access. Panics if out of range; the tree shape for
    /// each tag is a parser guarantee.
    pub fn child(&self, index: usize) -> &Node {
        &self.children[index]
    }

    /// The last child. Panics on a childless node.
    pub fn last_child(&self) -> &Node {
        &self.children[self.children.len() - 1]
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }
}
