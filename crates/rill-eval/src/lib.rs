//! rill tree-walking interpreter.
//!
//! Two passes over the same syntax tree, sharing one intrinsic registry
//! and one set of scoping rules:
//!
//! ```text
//! parser (external) → Node tree → Analyzer (names only) → Interpreter → Value
//! ```
//!
//! [`Interpreter::analyze`] rejects undefined references and duplicate
//! declarations without executing anything; [`Interpreter::execute`] then
//! evaluates the tree against a chain of lexical scopes. Closures keep
//! their defining environment alive through shared ownership, so the
//! chain routinely outlives the call frames that created it.

mod analyzer;
mod env;
mod error;
mod interp;
mod intrinsics;
mod value;

pub use analyzer::Analyzer;
pub use env::Environment;
pub use error::{RillError, RillResult};
pub use interp::Interpreter;
pub use value::{Function, Value};
