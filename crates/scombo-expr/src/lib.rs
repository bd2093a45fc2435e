//! Skip-expression language for shader combo enumeration.
//!
//! A skip expression is a small integer expression over the preprocessor
//! variables of one shader entry: integer literals, `$NAME` variable
//! references, `defined`, `!`, parentheses, and the binary operators
//! `&& || == != < <= > >=`. When the expression evaluates non-zero for a
//! variable assignment, that combo is omitted from the enumeration.
//!
//! The language is deliberately forgiving: malformed input collapses to the
//! constant `0` ("never skip") and unknown variables evaluate to `0`, so a
//! bad expression widens the build instead of breaking it.

mod ast;
mod parse;

pub use ast::{BinaryOp, DisplayExpr, EvalContext, Expr, UNRESOLVED_SLOT};
pub use parse::parse;
