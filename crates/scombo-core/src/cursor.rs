//! Mixed-radix combo cursor.
//!
//! A cursor is the mutable enumeration state for one entry: a global
//! command number, the per-entry combo number (which counts *down* as the
//! command number grows), and the current variable tuple. Variables are
//! ordered least-significant first; as the cursor moves forward each
//! variable cycles `max, max-1, .., min, max, ..`, carrying into the next
//! slot on wrap.
//!
//! Cursors are value types: checkpoint copies and caller-facing copies are
//! independent, and a cursor may be dropped at any point of the iteration.

use std::sync::Arc;

use scombo_expr::EvalContext;

use crate::define::Define;
use crate::entry::{CfgEntry, EntryInfo};

/// Enumeration state for one entry, positioned on a single combo.
#[derive(Debug, Clone)]
pub struct ComboCursor {
    entry: Arc<CfgEntry>,
    total_command: u64,
    combo_number: u64,
    num_combos: u64,
    var_slots: Vec<i32>,
}

impl ComboCursor {
    /// Seed a cursor at `total_command`, positioned on the entry's first
    /// combo: every variable at its maximum, combo number `n - 1`.
    #[must_use]
    pub(crate) fn new(entry: Arc<CfgEntry>, total_command: u64) -> Self {
        let num_combos = entry.generator().num_combos();
        let var_slots = entry.generator().defines().iter().map(Define::max).collect();
        Self {
            entry,
            total_command,
            combo_number: num_combos.saturating_sub(1),
            num_combos,
            var_slots,
        }
    }

    #[must_use]
    pub fn total_command(&self) -> u64 {
        self.total_command
    }

    #[must_use]
    pub fn combo_number(&self) -> u64 {
        self.combo_number
    }

    #[must_use]
    pub fn num_combos(&self) -> u64 {
        self.num_combos
    }

    #[must_use]
    pub fn entry_info(&self) -> &EntryInfo {
        self.entry.info()
    }

    /// Pairs of define and current value, in slot order.
    pub fn variables(&self) -> impl Iterator<Item = (&Define, i32)> {
        self.entry
            .generator()
            .defines()
            .iter()
            .zip(self.var_slots.iter().copied())
    }

    /// Current variable tuple, least-significant slot first.
    #[must_use]
    pub fn var_slots(&self) -> &[i32] {
        &self.var_slots
    }

    /// Move the cursor `n` commands forward within its entry.
    ///
    /// On success the tuple equals the mixed-radix decoding of
    /// `combo_number - n`. When fewer than `n` combos remain the cursor is
    /// left untouched and the unconsumed advance is returned as the error;
    /// the caller owes it to the next entry's cursor.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn advance(&mut self, n: u64) -> Result<(), u64> {
        if n == 0 {
            return Ok(());
        }
        if self.combo_number < n {
            return Err(n - self.combo_number);
        }

        self.total_command += n;
        self.combo_number -= n;

        let entry = Arc::clone(&self.entry);
        let mut carry = n;
        for (slot, define) in entry.generator().defines().iter().enumerate() {
            if carry == 0 {
                break;
            }
            // Distance from the current value up to max joins the carry,
            // then the slot is rebuilt from the low-order digit.
            carry += (i64::from(define.max()) - i64::from(self.var_slots[slot])) as u64;
            let interval = define.interval();
            self.var_slots[slot] = define.max() - (carry % interval) as i32;
            carry /= interval;
        }
        Ok(())
    }

    /// Step forward to the next combo whose skip predicate is false while
    /// staying below `limit`. Returns false when the range or the entry is
    /// exhausted; the cursor then still sits on the last combo visited.
    pub fn next_not_skipped(&mut self, limit: u64) -> bool {
        let entry = Arc::clone(&self.entry);
        let defines = entry.generator().defines();
        loop {
            if self.total_command + 1 >= limit || self.combo_number == 0 {
                return false;
            }
            self.combo_number -= 1;
            self.total_command += 1;

            let mut carried_out = true;
            for (slot, define) in defines.iter().enumerate() {
                self.var_slots[slot] -= 1;
                if self.var_slots[slot] >= define.min() {
                    carried_out = false;
                    break;
                }
                self.var_slots[slot] = define.max();
            }
            if carried_out {
                return false;
            }

            if !self.is_skipped() {
                return true;
            }
        }
    }

    /// Whether the entry's skip predicate rejects the current tuple.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.entry.skip().evaluate(self) != 0
    }
}

impl EvalContext for ComboCursor {
    fn variable_value(&self, slot: i32) -> i32 {
        usize::try_from(slot)
            .ok()
            .and_then(|s| self.var_slots.get(s))
            .copied()
            .unwrap_or(0)
    }

    fn variable_name(&self, slot: i32) -> Option<&str> {
        self.entry.generator().variable_name(slot)
    }

    fn variable_slot(&self, name: &str) -> i32 {
        self.entry.generator().variable_slot(name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scombo_expr::parse;

    use super::*;
    use crate::define::Define;
    use crate::entry::{CfgEntry, EntryInfo};
    use crate::generator::ComboGenerator;

    fn entry(defines: &[(&str, i32, i32)], skip: &str) -> Arc<CfgEntry> {
        let mut generator = ComboGenerator::default();
        for (name, min, max) in defines {
            generator.add_define(Define::new(*name, *min, *max, false));
        }
        let skip = parse(skip, &generator);
        let info = EntryInfo {
            num_combos: generator.num_combos(),
            command_end: generator.num_combos(),
            ..EntryInfo::default()
        };
        Arc::new(CfgEntry::new(generator, skip, info))
    }

    fn tuples(defines: &[(&str, i32, i32)], skip: &str) -> Vec<Vec<i32>> {
        let entry = entry(defines, skip);
        let end = entry.generator().num_combos();
        let mut cursor = ComboCursor::new(entry, 0);
        let mut out = Vec::new();
        if !cursor.is_skipped() {
            out.push(cursor.var_slots().to_vec());
        }
        while cursor.next_not_skipped(end) {
            out.push(cursor.var_slots().to_vec());
        }
        out
    }

    #[test]
    fn test_seed_positions_on_maximum_tuple() {
        let cursor = ComboCursor::new(entry(&[("A", 0, 2), ("B", 0, 1)], ""), 0);
        assert_eq!(cursor.var_slots(), &[2, 1]);
        assert_eq!(cursor.combo_number(), 5);
        assert_eq!(cursor.num_combos(), 6);
    }

    #[test]
    fn test_single_define_order() {
        assert_eq!(tuples(&[("X", 0, 1)], ""), vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_mixed_radix_order() {
        // (A, B) with A in [0,2] (low-order) and B in [0,1].
        assert_eq!(
            tuples(&[("A", 0, 2), ("B", 0, 1)], ""),
            vec![
                vec![2, 1],
                vec![1, 1],
                vec![0, 1],
                vec![2, 0],
                vec![1, 0],
                vec![0, 0],
            ]
        );
    }

    #[test]
    fn test_skip_expression_omits_tuples() {
        let visited = tuples(&[("A", 0, 2), ("B", 0, 1)], "$A == 1 && $B == 0");
        assert_eq!(visited.len(), 5);
        assert!(!visited.contains(&vec![1, 0]));
    }

    #[test]
    fn test_advance_matches_stepping() {
        let e = entry(&[("A", 0, 2), ("B", 0, 1), ("C", -1, 1)], "");
        let total = e.generator().num_combos();
        for k in 0..total {
            let mut jumped = ComboCursor::new(Arc::clone(&e), 0);
            jumped.advance(k).unwrap();

            let mut stepped = ComboCursor::new(Arc::clone(&e), 0);
            for _ in 0..k {
                assert!(stepped.next_not_skipped(total));
            }
            assert_eq!(jumped.var_slots(), stepped.var_slots(), "k = {k}");
            assert_eq!(jumped.combo_number(), stepped.combo_number());
            assert_eq!(jumped.total_command(), k);
        }
    }

    #[test]
    fn test_advance_past_end_reports_residual() {
        let mut cursor = ComboCursor::new(entry(&[("A", 0, 2)], ""), 0);
        assert_eq!(cursor.advance(5), Err(3));
        // Cursor untouched on failure.
        assert_eq!(cursor.combo_number(), 2);
        assert_eq!(cursor.total_command(), 0);
        assert_eq!(cursor.var_slots(), &[2]);
    }

    #[test]
    fn test_advance_in_hops_equals_one_jump() {
        let e = entry(&[("A", 0, 3), ("B", 1, 4), ("C", 0, 1)], "");
        let mut hops = ComboCursor::new(Arc::clone(&e), 0);
        hops.advance(7).unwrap();
        hops.advance(11).unwrap();
        let mut jump = ComboCursor::new(e, 0);
        jump.advance(18).unwrap();
        assert_eq!(hops.var_slots(), jump.var_slots());
        assert_eq!(hops.total_command(), jump.total_command());
    }

    #[test]
    fn test_next_not_skipped_respects_limit() {
        let e = entry(&[("A", 0, 5)], "");
        let mut cursor = ComboCursor::new(e, 0);
        assert!(cursor.next_not_skipped(3));
        assert!(cursor.next_not_skipped(3));
        assert!(!cursor.next_not_skipped(3));
        assert_eq!(cursor.total_command(), 2);
    }

    #[test]
    fn test_all_skipped_entry_exhausts() {
        let e = entry(&[("A", 0, 3)], "$A || !$A");
        let end = e.generator().num_combos();
        let mut cursor = ComboCursor::new(e, 0);
        assert!(cursor.is_skipped());
        assert!(!cursor.next_not_skipped(end));
    }

    #[test]
    fn test_empty_define_table_has_single_combo() {
        let e = entry(&[], "");
        let mut cursor = ComboCursor::new(Arc::clone(&e), 0);
        assert_eq!(cursor.num_combos(), 1);
        assert_eq!(cursor.combo_number(), 0);
        assert!(!cursor.next_not_skipped(10));
        assert_eq!(cursor.advance(1), Err(1));
    }
}
