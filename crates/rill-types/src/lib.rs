//! Shared types for the rill interpreter.
//!
//! This crate defines the generic syntax-tree node and source span types
//! that form the boundary between the (external) parser and the
//! interpreter core. A parser produces a [`ast::Node`] tree; the
//! `rill-eval` crate analyzes and executes it.

pub mod ast;
mod span;

pub use span::Span;
