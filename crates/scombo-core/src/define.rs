//! Preprocessor define domains and the per-entry define table.

use std::collections::HashMap;

/// One named integer preprocessor variable with an inclusive value range.
///
/// The static flag partitions an entry's defines into static and dynamic
/// subsets for aggregate counting; it does not affect enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    name: String,
    min: i32,
    max: i32,
    is_static: bool,
}

impl Define {
    /// Requires `min <= max`; the configuration loader validates this
    /// before construction.
    #[must_use]
    pub fn new(name: impl Into<String>, min: i32, max: i32, is_static: bool) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            is_static,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn min(&self) -> i32 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> i32 {
        self.max
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Number of values in the domain `min..=max`.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn interval(&self) -> u64 {
        (i64::from(self.max) - i64::from(self.min) + 1) as u64
    }
}

/// Ordered define list with name-to-slot lookup.
///
/// Slot order is registration order. On a duplicate name the define is
/// still appended (it keeps contributing a radix position) but the name
/// keeps resolving to the first slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineTable {
    defines: Vec<Define>,
    by_name: HashMap<String, usize>,
}

impl DefineTable {
    pub fn add(&mut self, define: Define) {
        let slot = self.defines.len();
        self.by_name.entry(define.name().to_owned()).or_insert(slot);
        self.defines.push(define);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Define> {
        self.defines.get(slot)
    }

    /// Slot for `name`, if registered.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Define> {
        self.defines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_counts_inclusive_range() {
        assert_eq!(Define::new("A", 0, 0, false).interval(), 1);
        assert_eq!(Define::new("A", 0, 3, false).interval(), 4);
        assert_eq!(Define::new("A", -2, 2, true).interval(), 5);
    }

    #[test]
    fn test_slot_lookup_follows_registration_order() {
        let mut table = DefineTable::default();
        table.add(Define::new("DYNAMIC0", 0, 1, false));
        table.add(Define::new("STATIC0", 0, 2, true));
        assert_eq!(table.slot("DYNAMIC0"), Some(0));
        assert_eq!(table.slot("STATIC0"), Some(1));
        assert_eq!(table.slot("MISSING"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_name_keeps_first_slot() {
        let mut table = DefineTable::default();
        table.add(Define::new("A", 0, 1, false));
        table.add(Define::new("A", 0, 5, true));
        assert_eq!(table.slot("A"), Some(0));
        assert_eq!(table.len(), 2);
    }
}
