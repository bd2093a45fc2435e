//! Public API facade for ShaderCombo.
//!
//! Most callers should hold a [`Registry`] directly. The [`compat`] module
//! reproduces the handle-based surface of the original tooling over a
//! process-global default registry for drivers ported from it.

pub use scombo_core::{
    format_command, format_command_human, ComboCursor, ComboGenerator, Define, DefineTable,
    EntryInfo, Registry,
};
pub use scombo_error::{ComboError, Result};
pub use scombo_expr::{parse, BinaryOp, EvalContext, Expr};

pub mod compat;
