//! Runtime values.
//!
//! Atomic kinds (integers, intrinsic references) are stored inline; heap
//! kinds (strings, arrays, closures) are behind [`Rc`], so every copy of
//! a value bumps the shared count and every drop releases it. The
//! count-maintenance protocol the language needs is exactly `Rc`'s
//! clone/drop, with nothing left to convention.

use crate::env::Environment;
use crate::error::RillResult;
use crate::intrinsics::IntrinsicFn;
use crate::RillError;
use rill_types::ast::Node;
use rill_types::Span;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A user-defined function paired with its defining environment.
#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    /// The environment that was current at the point of definition,
    /// captured by reference. Calls chain fresh scopes onto this, never
    /// onto the caller's environment.
    pub env: Rc<RefCell<Environment>>,
    /// The body statement sequence.
    pub body: Node,
}

/// A runtime value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Unit,
    Int(i64),
    Str(Rc<String>),
    Array(Rc<RefCell<Vec<Value>>>),
    Function(Rc<Function>),
    Intrinsic(IntrinsicFn),
}

impl Value {
    /// Allocate a fresh heap string.
    pub fn str(text: impl Into<String>) -> Self {
        Value::Str(Rc::new(text.into()))
    }

    /// Allocate a fresh heap array holding `elems`.
    pub fn array(elems: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elems)))
    }

    /// Kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Function(_) => "function",
            Value::Intrinsic(_) => "intrinsic function",
        }
    }

    /// The integer payload, or a kind-mismatch error at `span`.
    pub fn expect_int(&self, span: Span) -> RillResult<i64> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(RillError::evaluation(
                span,
                format!("expected integer, found {}", other.kind_name()),
            )),
        }
    }

    /// The string payload, or a kind-mismatch error at `span`.
    pub fn expect_str(&self, span: Span) -> RillResult<&Rc<String>> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(RillError::evaluation(
                span,
                format!("expected string, found {}", other.kind_name()),
            )),
        }
    }

    /// The array payload, or a kind-mismatch error at `span`.
    pub fn expect_array(&self, span: Span) -> RillResult<&Rc<RefCell<Vec<Value>>>> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(RillError::evaluation(
                span,
                format!("expected array, found {}", other.kind_name()),
            )),
        }
    }
}

impl PartialEq for Value {
    /// Atomic values and strings compare structurally; heap containers
    /// and callables compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Intrinsic(a), Value::Intrinsic(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "<unit>"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(elems) => {
                write!(f, "[")?;
                for (i, elem) in elems.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, "]")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::Intrinsic(_) => write!(f, "<intrinsic function>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Int(42)), "42");
        assert_eq!(format!("{}", Value::str("hi")), "hi");
        assert_eq!(format!("{}", Value::Unit), "<unit>");
        assert_eq!(
            format!("{}", Value::array(vec![Value::Int(1), Value::str("a")])),
            "[1, a]"
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Int(0).kind_name(), "integer");
        assert_eq!(Value::str("").kind_name(), "string");
        assert_eq!(Value::array(vec![]).kind_name(), "array");
        assert_eq!(Value::Unit.kind_name(), "unit");
    }

    #[test]
    fn test_expect_int_mismatch() {
        let err = Value::str("five").expect_int(Span::point(1, 2)).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "1:2: evaluation error: expected integer, found string"
        );
    }

    #[test]
    fn test_array_equality_is_identity() {
        let a = Value::array(vec![Value::Int(1)]);
        let b = Value::array(vec![Value::Int(1)]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_clone_shares_heap_object() {
        let a = Value::array(vec![]);
        let b = a.clone();
        if let (Value::Array(ra), Value::Array(rb)) = (&a, &b) {
            assert!(Rc::ptr_eq(ra, rb));
            assert_eq!(Rc::strong_count(ra), 2);
            ra.borrow_mut().push(Value::Int(5));
            assert_eq!(rb.borrow().len(), 1);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_drop_releases_shared_count() {
        let a = Value::str("shared");
        let count_before = {
            let _b = a.clone();
            if let Value::Str(s) = &a {
                Rc::strong_count(s)
            } else {
                unreachable!()
            }
        };
        assert_eq!(count_before, 2);
        if let Value::Str(s) = &a {
            assert_eq!(Rc::strong_count(s), 1);
        }
    }
}
