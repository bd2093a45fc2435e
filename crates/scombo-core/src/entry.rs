//! Configured shader entries and their public descriptors.

use scombo_expr::Expr;

use crate::generator::ComboGenerator;

/// Public descriptor for one configured shader program.
///
/// `command_start..command_end` is the entry's half-open range within the
/// global command space; ranges are assigned when the registry is built.
/// A zero-filled descriptor with an empty range at the total command count
/// terminates `describe_configuration` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub shader_file_name: String,
    pub shader_version: String,
    pub centroid_mask: i32,
    pub num_combos: u64,
    pub num_static_combos: u64,
    pub num_dynamic_combos: u64,
    pub command_start: u64,
    pub command_end: u64,
}

/// One configured shader program: its define table (owned by the
/// generator), its parsed skip expression, and its descriptor.
///
/// Entries are shared behind `Arc` once registered, so live cursors keep
/// their entry alive without back-pointers.
#[derive(Debug, Clone)]
pub struct CfgEntry {
    generator: ComboGenerator,
    skip: Expr,
    info: EntryInfo,
}

impl CfgEntry {
    pub(crate) fn new(generator: ComboGenerator, skip: Expr, info: EntryInfo) -> Self {
        Self {
            generator,
            skip,
            info,
        }
    }

    /// Terminator entry bounding the command space at `total`: no defines,
    /// a single combo, never skipped.
    pub(crate) fn terminator(total: u64) -> Self {
        Self {
            generator: ComboGenerator::default(),
            skip: Expr::Const(0),
            info: EntryInfo {
                num_combos: 1,
                num_static_combos: 1,
                num_dynamic_combos: 1,
                command_start: total,
                command_end: total,
                ..EntryInfo::default()
            },
        }
    }

    pub(crate) fn set_command_range(&mut self, start: u64, end: u64) {
        self.info.command_start = start;
        self.info.command_end = end;
    }

    #[must_use]
    pub fn info(&self) -> &EntryInfo {
        &self.info
    }

    #[must_use]
    pub fn generator(&self) -> &ComboGenerator {
        &self.generator
    }

    #[must_use]
    pub fn skip(&self) -> &Expr {
        &self.skip
    }
}
