//! Combo enumeration core of the shader build pipeline.
//!
//! A configuration describes a set of shader programs, each parameterised
//! by named integer preprocessor variables ("defines") and a skip
//! expression over them. This crate enumerates every admissible variable
//! assignment (a "combo"), assigns each a dense 64-bit command number
//! across all entries, and reconstructs the assignment and compiler
//! command line for any command number in sublinear time via a sparse
//! checkpoint directory.
//!
//! Entry point is [`Registry`]: load one or more configuration files, then
//! stream combos with [`Registry::combo_get_next`] or jump directly with
//! [`Registry::combo_get_combo`].

pub mod command;
mod config;
pub mod cursor;
pub mod define;
pub mod entry;
pub mod generator;
pub mod registry;

pub use command::{format_command, format_command_human};
pub use cursor::ComboCursor;
pub use define::{Define, DefineTable};
pub use entry::{CfgEntry, EntryInfo};
pub use generator::ComboGenerator;
pub use registry::Registry;
