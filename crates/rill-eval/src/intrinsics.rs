//! Built-in functions.
//!
//! Intrinsics are ordinary first-class values: [`REGISTRY`] is built once
//! as an immutable table, and both interpreter passes consume it — the
//! analyzer pre-declares the names, the evaluator binds the function
//! pointers into the root scope. There is deliberately no second list
//! anywhere that could drift out of sync.
//!
//! Every intrinsic validates its own argument count and kinds, raising a
//! span-tagged evaluation error on mismatch. `print`, `println`, and
//! `readint` are the only I/O boundary in the interpreter core.

use crate::error::{RillError, RillResult};
use crate::interp::Interpreter;
use crate::value::Value;
use rill_types::Span;

/// Signature shared by all intrinsics: argument values, the call-site
/// span for error reporting, and the interpreter handle for I/O and
/// re-entrant evaluation.
pub type IntrinsicFn = fn(&mut Interpreter, &[Value], Span) -> RillResult<Value>;

/// The one immutable intrinsic table.
pub const REGISTRY: &[(&str, IntrinsicFn)] = &[
    ("print", print),
    ("println", println),
    ("readint", readint),
    ("mkarr", mkarr),
    ("len", len),
    ("get", get),
    ("set", set),
    ("push", push),
    ("pop", pop),
    ("strlen", strlen),
    ("strcat", strcat),
    ("substr", substr),
];

fn expect_arity(name: &str, args: &[Value], count: usize, span: Span) -> RillResult<()> {
    if args.len() != count {
        return Err(RillError::evaluation(
            span,
            format!(
                "wrong number of arguments to '{name}': expected {count}, got {}",
                args.len()
            ),
        ));
    }
    Ok(())
}

// ── I/O ──────────────────────────────────────────────────────────────────

fn print(interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("print", args, 1, span)?;
    interp.write_text(&args[0].to_string(), span)?;
    Ok(Value::Unit)
}

fn println(interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("println", args, 1, span)?;
    interp.write_text(&format!("{}\n", args[0]), span)?;
    Ok(Value::Unit)
}

fn readint(interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("readint", args, 0, span)?;
    interp.read_int(span).map(Value::Int)
}

// ── Arrays ───────────────────────────────────────────────────────────────

fn mkarr(_interp: &mut Interpreter, args: &[Value], _span: Span) -> RillResult<Value> {
    Ok(Value::array(args.to_vec()))
}

fn len(_interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("len", args, 1, span)?;
    let arr = args[0].expect_array(span)?;
    Ok(Value::Int(arr.borrow().len() as i64))
}

fn check_index(index: i64, len: usize, span: Span) -> RillResult<usize> {
    if index < 0 || index as usize >= len {
        return Err(RillError::evaluation(
            span,
            format!("array index {index} out of bounds (length {len})"),
        ));
    }
    Ok(index as usize)
}

fn get(_interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("get", args, 2, span)?;
    let arr = args[0].expect_array(span)?.borrow();
    let index = check_index(args[1].expect_int(span)?, arr.len(), span)?;
    Ok(arr[index].clone())
}

fn set(_interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("set", args, 3, span)?;
    let mut arr = args[0].expect_array(span)?.borrow_mut();
    let index = check_index(args[1].expect_int(span)?, arr.len(), span)?;
    arr[index] = args[2].clone();
    Ok(args[2].clone())
}

fn push(_interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("push", args, 2, span)?;
    args[0].expect_array(span)?.borrow_mut().push(args[1].clone());
    Ok(args[1].clone())
}

fn pop(_interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("pop", args, 1, span)?;
    let popped = args[0].expect_array(span)?.borrow_mut().pop();
    if popped.is_none() {
        return Err(RillError::evaluation(span, "pop from an empty array"));
    }
    Ok(Value::Int(0))
}

// ── Strings ──────────────────────────────────────────────────────────────

fn strlen(_interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("strlen", args, 1, span)?;
    let text = args[0].expect_str(span)?;
    Ok(Value::Int(text.len() as i64))
}

fn strcat(_interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("strcat", args, 2, span)?;
    let left = args[0].expect_str(span)?;
    let right = args[1].expect_str(span)?;
    Ok(Value::str(format!("{left}{right}")))
}

fn substr(_interp: &mut Interpreter, args: &[Value], span: Span) -> RillResult<Value> {
    expect_arity("substr", args, 3, span)?;
    let text = args[0].expect_str(span)?;
    let start = args[1].expect_int(span)?;
    let count = args[2].expect_int(span)?;
    Ok(Value::str(lenient_substr(text, start, count)))
}

/// Bounds-checked but lenient substring: any out-of-range request yields
/// empty text. In-range data is never truncated, out-of-range requests
/// never error; this is deliberate policy, not an oversight.
///
/// Offsets are byte positions; a slice that would split a multi-byte
/// character is treated as out of range.
fn lenient_substr(text: &str, start: i64, count: i64) -> &str {
    if start < 0 || count < 0 {
        return "";
    }
    let (start, count) = (start as usize, count as usize);
    match start.checked_add(count) {
        Some(end) => text.get(start..end).unwrap_or(""),
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_no_duplicate_names() {
        for (i, (name, _)) in REGISTRY.iter().enumerate() {
            assert!(
                !REGISTRY[i + 1..].iter().any(|(other, _)| other == name),
                "duplicate intrinsic '{name}'"
            );
        }
    }

    #[test]
    fn test_lenient_substr_in_range() {
        assert_eq!(lenient_substr("hello", 1, 3), "ell");
        assert_eq!(lenient_substr("hello", 0, 5), "hello");
        assert_eq!(lenient_substr("hello", 5, 0), "");
    }

    #[test]
    fn test_lenient_substr_out_of_range_is_empty() {
        assert_eq!(lenient_substr("hello", 2, 10), "");
        assert_eq!(lenient_substr("hello", 6, 1), "");
        assert_eq!(lenient_substr("hello", -1, 2), "");
        assert_eq!(lenient_substr("hello", 0, -1), "");
        assert_eq!(lenient_substr("hello", i64::MAX, 1), "");
    }

    #[test]
    fn test_check_index_bounds() {
        assert_eq!(check_index(0, 3, Span::point(1, 1)).unwrap(), 0);
        assert_eq!(check_index(2, 3, Span::point(1, 1)).unwrap(), 2);
        assert!(check_index(3, 3, Span::point(1, 1)).is_err());
        assert!(check_index(-1, 3, Span::point(1, 1)).is_err());
    }
}
