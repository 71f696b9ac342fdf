//! Semantic pre-pass — walks a tree and validates every name.
//!
//! The walk mirrors the evaluator's per-tag dispatch and scoping rules
//! exactly, but only registers declarations; it never executes a side
//! effect. Two violations are rejected: referencing a name no enclosing
//! scope declares, and redeclaring a name already present in the
//! *current* scope (shadowing in a nested scope is fine). The first
//! violation aborts the pass with a [`RillError::Semantic`]; there is no
//! recovery and no multi-error collection.

use crate::error::{RillError, RillResult};
use crate::intrinsics;
use log::debug;
use rill_types::ast::{Node, NodeTag};
use std::collections::HashSet;

/// Walks a syntax tree and checks declarations and references.
///
/// Scopes are a plain stack of name sets here: unlike execution, nothing
/// outlives the walk, so no scope needs shared ownership.
pub struct Analyzer {
    scopes: Vec<HashSet<String>>,
}

impl Analyzer {
    /// Create an analyzer whose root scope pre-declares every intrinsic
    /// from the shared registry.
    pub fn new() -> Self {
        let globals = intrinsics::REGISTRY
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect();
        Self {
            scopes: vec![globals],
        }
    }

    /// Validate a whole tree. Returns the first violation, if any.
    pub fn analyze(&mut self, tree: &Node) -> RillResult<()> {
        debug!("analyzing program unit");
        self.check(tree)
    }

    fn check(&mut self, node: &Node) -> RillResult<()> {
        match node.tag {
            NodeTag::Unit
            | NodeTag::Statement
            | NodeTag::StatementList
            | NodeTag::ArgList
            | NodeTag::Assign
            | NodeTag::Add
            | NodeTag::Sub
            | NodeTag::Mul
            | NodeTag::Div
            | NodeTag::LogicalAnd
            | NodeTag::LogicalOr
            | NodeTag::Lt
            | NodeTag::Lte
            | NodeTag::Gt
            | NodeTag::Gte
            | NodeTag::Eq
            | NodeTag::NotEq => self.check_children(node),

            NodeTag::IntLiteral | NodeTag::StrLiteral | NodeTag::ParamList => Ok(()),

            NodeTag::VarRef => {
                if !self.resolves(&node.text) {
                    return Err(RillError::semantic(
                        node.span,
                        format!("undefined reference to '{}'", node.text),
                    ));
                }
                Ok(())
            }

            NodeTag::VarDef => {
                let name_node = node.child(0);
                if !self.declare(&name_node.text) {
                    return Err(RillError::semantic(
                        node.span,
                        format!("'{}' is already declared in this scope", name_node.text),
                    ));
                }
                Ok(())
            }

            NodeTag::FnCall => {
                let callee = node.child(0);
                if !self.resolves(&callee.text) {
                    return Err(RillError::semantic(
                        node.span,
                        format!("undefined reference to '{}'", callee.text),
                    ));
                }
                if node.num_children() == 2 {
                    self.check(node.child(1))?;
                }
                Ok(())
            }

            NodeTag::Func => self.check_func(node),

            // One nested scope covers the condition and every branch or
            // iteration, matching the evaluator.
            NodeTag::If | NodeTag::While => {
                self.push_scope();
                self.check_children(node)?;
                self.pop_scope();
                Ok(())
            }
        }
    }

    fn check_func(&mut self, node: &Node) -> RillResult<()> {
        // The function's name lands in the defining scope before the body
        // is analyzed, so the body can refer to it recursively. Functions
        // are rebindable values; redeclaring the name is not an error.
        let name = &node.child(0).text;
        self.bind(name);

        // Parameters live one scope in, the body one further — the same
        // two-level nesting the evaluator builds per call, so shadowing
        // behaves identically in both passes.
        self.push_scope();
        if node.num_children() == 3 {
            for param in &node.child(1).children {
                if !self.declare(&param.text) {
                    return Err(RillError::semantic(
                        param.span,
                        format!("duplicate parameter '{}'", param.text),
                    ));
                }
            }
        }
        self.push_scope();
        self.check(node.last_child())?;
        self.pop_scope();
        self.pop_scope();
        Ok(())
    }

    fn check_children(&mut self, node: &Node) -> RillResult<()> {
        for child in &node.children {
            self.check(child)?;
        }
        Ok(())
    }

    // ── Scope bookkeeping ────────────────────────────────────────────────

    fn push_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot pop the root scope");
        self.scopes.pop();
    }

    /// Declare in the current scope; `false` on a same-scope duplicate.
    fn declare(&mut self, name: &str) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => scope.insert(name.to_string()),
            None => false,
        }
    }

    /// Bind in the current scope, duplicates allowed.
    fn bind(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    /// Whether any enclosing scope declares the name, innermost first.
    fn resolves(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_types::Span;

    fn sp() -> Span {
        Span::point(1, 1)
    }

    #[test]
    fn test_intrinsics_predeclared() {
        let analyzer = Analyzer::new();
        for (name, _) in intrinsics::REGISTRY {
            assert!(analyzer.resolves(name), "intrinsic '{name}' not declared");
        }
    }

    #[test]
    fn test_declare_rejects_same_scope_duplicate() {
        let mut analyzer = Analyzer::new();
        assert!(analyzer.declare("x"));
        assert!(!analyzer.declare("x"));
    }

    #[test]
    fn test_shadowing_in_nested_scope_allowed() {
        let mut analyzer = Analyzer::new();
        assert!(analyzer.declare("x"));
        analyzer.push_scope();
        assert!(analyzer.declare("x"));
        assert!(analyzer.resolves("x"));
        analyzer.pop_scope();
    }

    #[test]
    fn test_undefined_reference_rejected() {
        let tree = Node::leaf(NodeTag::VarRef, "ghost", sp());
        let err = Analyzer::new().analyze(&tree).unwrap_err();
        assert!(matches!(err, RillError::Semantic { .. }));
        assert!(format!("{err}").contains("undefined reference to 'ghost'"));
    }
}
