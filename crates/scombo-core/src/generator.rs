//! Combo counting and the parse-time evaluation context.

use scombo_expr::{EvalContext, UNRESOLVED_SLOT};

use crate::define::{Define, DefineTable};

/// Owns one entry's define table, counts its combos, and serves as the
/// evaluation context while the entry's skip expression is parsed.
///
/// Every registered define also gets a current-value slot, initialised
/// to 1; `defined` subexpressions read these at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboGenerator {
    defines: DefineTable,
    var_slots: Vec<i32>,
}

impl ComboGenerator {
    pub fn add_define(&mut self, define: Define) {
        self.defines.add(define);
        self.var_slots.push(1);
    }

    #[must_use]
    pub fn defines(&self) -> &DefineTable {
        &self.defines
    }

    /// Total combos: the product of every define's domain size.
    ///
    /// 64-bit unsigned; configurations whose product overflows are
    /// invalid input.
    #[must_use]
    pub fn num_combos(&self) -> u64 {
        self.defines.iter().map(Define::interval).product()
    }

    /// Product over only the defines whose static flag matches.
    #[must_use]
    pub fn num_combos_matching(&self, is_static: bool) -> u64 {
        self.defines
            .iter()
            .filter(|d| d.is_static() == is_static)
            .map(Define::interval)
            .product()
    }
}

impl EvalContext for ComboGenerator {
    fn variable_value(&self, slot: i32) -> i32 {
        usize::try_from(slot)
            .ok()
            .and_then(|s| self.var_slots.get(s))
            .copied()
            .unwrap_or(0)
    }

    fn variable_name(&self, slot: i32) -> Option<&str> {
        usize::try_from(slot)
            .ok()
            .and_then(|s| self.defines.get(s))
            .map(Define::name)
    }

    fn variable_slot(&self, name: &str) -> i32 {
        self.defines
            .slot(name)
            .and_then(|s| i32::try_from(s).ok())
            .unwrap_or(UNRESOLVED_SLOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(defines: &[(&str, i32, i32, bool)]) -> ComboGenerator {
        let mut generator = ComboGenerator::default();
        for (name, min, max, is_static) in defines {
            generator.add_define(Define::new(*name, *min, *max, *is_static));
        }
        generator
    }

    #[test]
    fn test_num_combos_is_product_of_intervals() {
        let g = generator(&[("A", 0, 2, false), ("B", 0, 1, false)]);
        assert_eq!(g.num_combos(), 6);
        assert_eq!(generator(&[]).num_combos(), 1);
    }

    #[test]
    fn test_static_dynamic_split_multiplies_back() {
        let g = generator(&[
            ("DYN0", 0, 2, false),
            ("DYN1", 0, 1, false),
            ("STAT0", 0, 3, true),
        ]);
        assert_eq!(g.num_combos_matching(false), 6);
        assert_eq!(g.num_combos_matching(true), 4);
        assert_eq!(
            g.num_combos_matching(false) * g.num_combos_matching(true),
            g.num_combos()
        );
    }

    #[test]
    fn test_parse_time_variable_value_is_one() {
        let g = generator(&[("A", 0, 3, false)]);
        assert_eq!(g.variable_slot("A"), 0);
        assert_eq!(g.variable_value(0), 1);
        assert_eq!(g.variable_slot("NOPE"), UNRESOLVED_SLOT);
        assert_eq!(g.variable_name(0), Some("A"));
        assert_eq!(g.variable_name(-1), None);
    }
}
