//! Handle-based surface over a process-global default registry.
//!
//! Mirrors the original C-style combo API: an opaque nullable handle, a
//! stream function that reuses and re-seeds the handle in place, and
//! explicit alloc/assign/free lifecycle calls (which in Rust reduce to
//! `Clone` and `Drop`). New code should construct a [`Registry`] and use
//! its methods; this module exists for drivers ported from the original
//! surface.

use std::path::Path;
use std::sync::OnceLock;

use parking_lot::RwLock;

use scombo_core::{ComboCursor, EntryInfo, Registry};
use scombo_error::Result;

/// Owned cursor handle; `None` is the null sentinel.
pub type ComboHandle = Option<Box<ComboCursor>>;

fn default_registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Registry::new()))
}

/// Load `path` into the default registry, appending to any entries already
/// registered.
pub fn read_configuration(path: impl AsRef<Path>) -> Result<()> {
    default_registry().write().read_configuration(path)
}

/// Entry descriptors in registry order plus the zero-filled terminator.
#[must_use]
pub fn describe_configuration() -> Vec<EntryInfo> {
    default_registry().read().describe_configuration()
}

/// Owned cursor at exactly `command`, skip predicate not applied.
#[must_use]
pub fn combo_get_combo(command: u64) -> ComboHandle {
    default_registry()
        .read()
        .combo_get_combo(command)
        .map(Box::new)
}

/// Stream the next unskipped combo in `[*command, end)` into `handle`.
pub fn combo_get_next(command: &mut u64, handle: &mut ComboHandle, end: u64) -> bool {
    let registry = default_registry().read();
    let mut cursor = handle.take().map(|boxed| *boxed);
    let advanced = registry.combo_get_next(command, &mut cursor, end);
    *handle = cursor.map(Box::new);
    advanced
}

/// Append the token-stream command for `handle` to `buffer`. A null handle
/// writes nothing.
pub fn combo_format_command(handle: &ComboHandle, buffer: &mut Vec<u8>) {
    if let Some(cursor) = handle.as_deref() {
        scombo_core::format_command(cursor, buffer);
    }
}

/// Human-readable command line for `handle`; empty for a null handle.
#[must_use]
pub fn combo_format_command_human(handle: &ComboHandle) -> String {
    handle
        .as_deref()
        .map(scombo_core::format_command_human)
        .unwrap_or_default()
}

/// Global command number of `handle`, or `u64::MAX` for a null handle.
#[must_use]
pub fn combo_get_command_num(handle: &ComboHandle) -> u64 {
    handle.as_deref().map_or(u64::MAX, ComboCursor::total_command)
}

/// Per-entry combo number of `handle`, or `u64::MAX` for a null handle.
#[must_use]
pub fn combo_get_combo_num(handle: &ComboHandle) -> u64 {
    handle.as_deref().map_or(u64::MAX, ComboCursor::combo_number)
}

/// Descriptor of the entry `handle` is positioned in.
#[must_use]
pub fn combo_get_entry_info(handle: &ComboHandle) -> Option<&EntryInfo> {
    handle.as_deref().map(ComboCursor::entry_info)
}

/// Independent copy of `copy_from` (null stays null).
#[must_use]
pub fn combo_alloc(copy_from: &ComboHandle) -> ComboHandle {
    copy_from.clone()
}

/// Overwrite `dst` with a copy of `src`.
pub fn combo_assign(dst: &mut ComboHandle, src: &ComboHandle) {
    dst.clone_from(src);
}

/// Release `handle`, leaving the null sentinel behind.
pub fn combo_free(handle: &mut ComboHandle) {
    *handle = None;
}
