//! Shared helpers for the integration tests: tree builders (the tests
//! construct syntax trees directly; no parser exists in this workspace)
//! and runners wiring the interpreter to in-memory I/O.

#![allow(dead_code)]

use rill_eval::{Interpreter, RillError, Value};
use rill_types::ast::{Node, NodeTag};
use rill_types::Span;
use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

pub fn sp() -> Span {
    Span::point(1, 1)
}

// ══════════════════════════════════════════════════════════════════════════════
// Tree builders
// ══════════════════════════════════════════════════════════════════════════════

pub fn unit(stmts: Vec<Node>) -> Node {
    Node::with_children(NodeTag::Unit, sp(), stmts)
}

pub fn stmt(expr: Node) -> Node {
    Node::with_children(NodeTag::Statement, sp(), vec![expr])
}

pub fn stmt_list(stmts: Vec<Node>) -> Node {
    Node::with_children(NodeTag::StatementList, sp(), stmts)
}

pub fn int(n: i64) -> Node {
    Node::leaf(NodeTag::IntLiteral, n.to_string(), sp())
}

pub fn str_lit(text: &str) -> Node {
    Node::leaf(NodeTag::StrLiteral, text, sp())
}

pub fn var(name: &str) -> Node {
    Node::leaf(NodeTag::VarRef, name, sp())
}

pub fn var_def(name: &str) -> Node {
    Node::with_children(NodeTag::VarDef, sp(), vec![var(name)])
}

pub fn assign(name: &str, value: Node) -> Node {
    Node::with_children(NodeTag::Assign, sp(), vec![var(name), value])
}

pub fn binary(tag: NodeTag, left: Node, right: Node) -> Node {
    Node::with_children(tag, sp(), vec![left, right])
}

pub fn add(left: Node, right: Node) -> Node {
    binary(NodeTag::Add, left, right)
}

pub fn sub(left: Node, right: Node) -> Node {
    binary(NodeTag::Sub, left, right)
}

pub fn mul(left: Node, right: Node) -> Node {
    binary(NodeTag::Mul, left, right)
}

pub fn div(left: Node, right: Node) -> Node {
    binary(NodeTag::Div, left, right)
}

pub fn if_stmt(cond: Node, then: Node) -> Node {
    Node::with_children(NodeTag::If, sp(), vec![cond, then])
}

pub fn if_else(cond: Node, then: Node, other: Node) -> Node {
    Node::with_children(NodeTag::If, sp(), vec![cond, then, other])
}

pub fn while_stmt(cond: Node, body: Node) -> Node {
    Node::with_children(NodeTag::While, sp(), vec![cond, body])
}

pub fn func(name: &str, params: &[&str], body: Node) -> Node {
    let param_list = Node::with_children(
        NodeTag::ParamList,
        sp(),
        params.iter().map(|p| var(p)).collect(),
    );
    Node::with_children(NodeTag::Func, sp(), vec![var(name), param_list, body])
}

pub fn call(name: &str, args: Vec<Node>) -> Node {
    let arg_list = Node::with_children(NodeTag::ArgList, sp(), args);
    Node::with_children(NodeTag::FnCall, sp(), vec![var(name), arg_list])
}

// ══════════════════════════════════════════════════════════════════════════════
// Runners
// ══════════════════════════════════════════════════════════════════════════════

/// A writer backed by a shared buffer, so a test keeps a handle to the
/// output after handing the writer to the interpreter.
pub struct SharedBuf(pub Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn interpreter(tree: Node, input: &str) -> (Interpreter, Rc<RefCell<Vec<u8>>>) {
    let out = Rc::new(RefCell::new(Vec::new()));
    let interp = Interpreter::with_io(
        tree,
        Box::new(Cursor::new(input.to_string())),
        Box::new(SharedBuf(Rc::clone(&out))),
    );
    (interp, out)
}

/// Analyze and execute, discarding output.
pub fn run(tree: Node) -> Result<Value, RillError> {
    let (mut interp, _out) = interpreter(tree, "");
    interp.analyze()?;
    interp.execute()
}

/// Analyze and execute, returning the result alongside captured output.
pub fn run_capture(tree: Node, input: &str) -> (Result<Value, RillError>, String) {
    let (mut interp, out) = interpreter(tree, input);
    let result = interp.analyze().and_then(|()| interp.execute());
    let text = String::from_utf8(out.borrow().clone()).expect("output was not UTF-8");
    (result, text)
}

/// Execute without the pre-pass, for exercising the evaluator's own
/// name checks.
pub fn run_unchecked(tree: Node) -> Result<Value, RillError> {
    let (mut interp, _out) = interpreter(tree, "");
    interp.execute()
}

/// Analyze only.
pub fn analyze(tree: Node) -> Result<(), RillError> {
    let (interp, _out) = interpreter(tree, "");
    interp.analyze()
}
