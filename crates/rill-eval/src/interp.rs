//! Tree-walking evaluator and the `Interpreter` driver facade.

use crate::analyzer::Analyzer;
use crate::env::Environment;
use crate::error::{RillError, RillResult};
use crate::intrinsics;
use crate::value::{Function, Value};
use log::{debug, trace};
use rill_types::ast::{Node, NodeTag};
use rill_types::Span;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Write};
use std::rc::Rc;

/// Drives both passes over one adopted syntax tree.
///
/// The two public operations are [`analyze`](Interpreter::analyze), the
/// side-effect-free semantic pre-pass, and [`execute`](Interpreter::execute),
/// which runs the program. Callers normally run them in that order;
/// `execute` does not re-check names, it trusts the pre-pass and reports
/// anything that still slips through as an evaluation error.
///
/// All program I/O funnels through the two handles held here, so tests
/// inject an in-memory reader and writer instead of touching stdin/stdout.
pub struct Interpreter {
    ast: Rc<Node>,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    // Whitespace-delimited tokens already read but not yet consumed.
    pending: VecDeque<String>,
}

impl Interpreter {
    /// Adopt a tree, wired to stdin/stdout.
    pub fn new(tree: Node) -> Self {
        Self::with_io(
            tree,
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Adopt a tree with caller-supplied I/O handles.
    pub fn with_io(tree: Node, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self {
            ast: Rc::new(tree),
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Run the semantic pre-pass over the adopted tree.
    pub fn analyze(&self) -> RillResult<()> {
        Analyzer::new().analyze(&self.ast)
    }

    /// Evaluate the adopted tree and return the program's result value.
    ///
    /// Builds a fresh root environment on every call, with each registry
    /// intrinsic bound under its name.
    pub fn execute(&mut self) -> RillResult<Value> {
        debug!("executing program unit");
        let globals = Rc::new(RefCell::new(Environment::new()));
        for (name, func) in intrinsics::REGISTRY {
            globals.borrow_mut().bind(name, Value::Intrinsic(*func));
        }
        let tree = Rc::clone(&self.ast);
        self.eval(&tree, &globals)
    }

    fn eval(&mut self, node: &Node, env: &Rc<RefCell<Environment>>) -> RillResult<Value> {
        match node.tag {
            NodeTag::Unit
            | NodeTag::Statement
            | NodeTag::StatementList
            | NodeTag::ParamList
            | NodeTag::ArgList => {
                let mut result = Value::Int(0);
                for child in &node.children {
                    result = self.eval(child, env)?;
                }
                Ok(result)
            }

            NodeTag::IntLiteral => match node.text.parse::<i64>() {
                Ok(n) => Ok(Value::Int(n)),
                Err(_) => Err(RillError::evaluation(
                    node.span,
                    format!("malformed integer literal '{}'", node.text),
                )),
            },

            // A fresh heap allocation per evaluation, no interning.
            NodeTag::StrLiteral => Ok(Value::str(node.text.clone())),

            NodeTag::VarRef => self.lookup(&node.text, node.span, env),

            NodeTag::VarDef => {
                let name = &node.child(0).text;
                if !env.borrow_mut().declare(name) {
                    return Err(RillError::evaluation(
                        node.span,
                        format!("'{name}' is already declared in this scope"),
                    ));
                }
                Ok(Value::Int(0))
            }

            NodeTag::Assign => {
                let value = self.eval(node.child(1), env)?;
                let target = node.child(0);
                if !env.borrow_mut().assign(&target.text, value.clone()) {
                    return Err(RillError::evaluation(
                        node.span,
                        format!("assignment to undeclared variable '{}'", target.text),
                    ));
                }
                Ok(value)
            }

            NodeTag::Add | NodeTag::Sub | NodeTag::Mul | NodeTag::Div => {
                self.eval_arith(node, env)
            }

            NodeTag::LogicalAnd => {
                let left = self.eval_int_operand(node.child(0), env)?;
                if left == 0 {
                    return Ok(Value::Int(0));
                }
                let right = self.eval_int_operand(node.child(1), env)?;
                Ok(Value::Int(i64::from(right != 0)))
            }

            // Any non-zero left short-circuits to 1.
            NodeTag::LogicalOr => {
                let left = self.eval_int_operand(node.child(0), env)?;
                if left != 0 {
                    return Ok(Value::Int(1));
                }
                let right = self.eval_int_operand(node.child(1), env)?;
                Ok(Value::Int(i64::from(right != 0)))
            }

            NodeTag::Lt
            | NodeTag::Lte
            | NodeTag::Gt
            | NodeTag::Gte
            | NodeTag::Eq
            | NodeTag::NotEq => self.eval_compare(node, env),

            NodeTag::If => {
                let scope = Self::child_scope(env);
                let cond_node = node.child(0);
                let cond = self.eval(cond_node, &scope)?.expect_int(cond_node.span)?;
                if cond != 0 {
                    self.eval(node.child(1), &scope)?;
                } else if node.num_children() == 3 {
                    self.eval(node.child(2), &scope)?;
                }
                Ok(Value::Int(0))
            }

            // One scope shared by every condition check and iteration, so
            // a variable declared in the body survives across iterations.
            NodeTag::While => {
                let scope = Self::child_scope(env);
                let cond_node = node.child(0);
                loop {
                    let cond = self.eval(cond_node, &scope)?.expect_int(cond_node.span)?;
                    if cond == 0 {
                        break;
                    }
                    self.eval(node.child(1), &scope)?;
                }
                Ok(Value::Int(0))
            }

            NodeTag::Func => {
                let name = node.child(0).text.clone();
                let params = if node.num_children() == 3 {
                    node.child(1)
                        .children
                        .iter()
                        .map(|p| p.text.clone())
                        .collect()
                } else {
                    Vec::new()
                };
                let closure = Value::Function(Rc::new(Function {
                    name: name.clone(),
                    params,
                    env: Rc::clone(env),
                    body: node.last_child().clone(),
                }));
                env.borrow_mut().bind(&name, closure.clone());
                Ok(closure)
            }

            NodeTag::FnCall => self.eval_call(node, env),
        }
    }

    fn eval_arith(&mut self, node: &Node, env: &Rc<RefCell<Environment>>) -> RillResult<Value> {
        let left = self.eval_int_operand(node.child(0), env)?;
        let right = self.eval_int_operand(node.child(1), env)?;
        let result = match node.tag {
            NodeTag::Add => left.wrapping_add(right),
            NodeTag::Sub => left.wrapping_sub(right),
            NodeTag::Mul => left.wrapping_mul(right),
            NodeTag::Div => {
                if right == 0 {
                    return Err(RillError::evaluation(node.span, "division by zero"));
                }
                // Truncates toward zero; wrapping covers i64::MIN / -1.
                left.wrapping_div(right)
            }
            _ => unreachable!("eval_arith called on {:?}", node.tag),
        };
        Ok(Value::Int(result))
    }

    fn eval_compare(&mut self, node: &Node, env: &Rc<RefCell<Environment>>) -> RillResult<Value> {
        let left = self.eval_int_operand(node.child(0), env)?;
        let right = self.eval_int_operand(node.child(1), env)?;
        let holds = match node.tag {
            NodeTag::Lt => left < right,
            NodeTag::Lte => left <= right,
            NodeTag::Gt => left > right,
            NodeTag::Gte => left >= right,
            NodeTag::Eq => left == right,
            NodeTag::NotEq => left != right,
            _ => unreachable!("eval_compare called on {:?}", node.tag),
        };
        Ok(Value::Int(i64::from(holds)))
    }

    /// Evaluate one operand and require an integer, reporting a kind
    /// mismatch at the operand's own span.
    fn eval_int_operand(
        &mut self,
        operand: &Node,
        env: &Rc<RefCell<Environment>>,
    ) -> RillResult<i64> {
        self.eval(operand, env)?.expect_int(operand.span)
    }

    fn eval_call(&mut self, node: &Node, env: &Rc<RefCell<Environment>>) -> RillResult<Value> {
        // Resolve the callee before touching the arguments, so calling an
        // unknown name never runs argument side effects.
        let callee_node = node.child(0);
        let callee = self.lookup(&callee_node.text, callee_node.span, env)?;

        let mut args = Vec::new();
        if node.num_children() == 2 {
            for arg in &node.child(1).children {
                args.push(self.eval(arg, env)?);
            }
        }

        match callee {
            Value::Intrinsic(func) => func(self, &args, node.span),
            Value::Function(func) => {
                trace!("calling function '{}' with {} arg(s)", func.name, args.len());
                if args.len() != func.params.len() {
                    return Err(RillError::evaluation(
                        node.span,
                        format!(
                            "function '{}' expects {} argument(s), {} given",
                            func.name,
                            func.params.len(),
                            args.len()
                        ),
                    ));
                }
                // Parameters chain to the *captured* environment, and the
                // body runs one scope further in, so body declarations may
                // shadow parameters.
                let param_env = Self::child_scope(&func.env);
                for (param, arg) in func.params.iter().zip(args) {
                    param_env.borrow_mut().bind(param, arg);
                }
                let body_env = Self::child_scope(&param_env);
                self.eval(&func.body, &body_env)
            }
            other => Err(RillError::evaluation(
                node.span,
                format!(
                    "'{}' is not callable (found {})",
                    callee_node.text,
                    other.kind_name()
                ),
            )),
        }
    }

    fn lookup(
        &self,
        name: &str,
        span: Span,
        env: &Rc<RefCell<Environment>>,
    ) -> RillResult<Value> {
        env.borrow().get(name).ok_or_else(|| {
            RillError::evaluation(span, format!("undefined reference to '{name}'"))
        })
    }

    fn child_scope(parent: &Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::with_parent(Rc::clone(parent))))
    }

    // ── I/O, reachable only through the intrinsics ───────────────────────

    pub(crate) fn write_text(&mut self, text: &str, span: Span) -> RillResult<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(|e| RillError::evaluation(span, format!("output error: {e}")))
    }

    /// Read one whitespace-delimited integer token, buffering the rest of
    /// the line for later reads.
    pub(crate) fn read_int(&mut self, span: Span) -> RillResult<i64> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token.parse::<i64>().map_err(|_| {
                    RillError::evaluation(
                        span,
                        format!("readint: expected an integer, found '{token}'"),
                    )
                });
            }
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| RillError::evaluation(span, format!("input error: {e}")))?;
            if read == 0 {
                return Err(RillError::evaluation(span, "readint: end of input"));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}
