//! Entry registry, checkpoint directory, and the combo stream API.
//!
//! The registry owns the configured entry set. Entries are ordered by
//! descending combo count and packed into contiguous command ranges
//! starting at 0, so the biggest shaders occupy the low command numbers.
//! A sparse directory of pre-advanced cursors (one per entry start, plus
//! one every `max(1000, num_combos / 500)` commands) turns random access
//! into a map lookup followed by a bounded advance.
//!
//! The registry is mutated only while configurations load; afterwards it
//! is read-only and can be shared across threads. Cursors handed out are
//! independent copies.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use scombo_error::Result;

use crate::config;
use crate::cursor::ComboCursor;
use crate::entry::{CfgEntry, EntryInfo};

/// Checkpoint stride floor.
const MIN_CHECKPOINT_STEP: u64 = 1000;
/// Target number of checkpoints per entry above the stride floor.
const CHECKPOINT_SPLITS: u64 = 500;

/// The configured entry set and its command-space index.
#[derive(Debug, Default)]
pub struct Registry {
    /// Largest combo count first; command ranges are contiguous in this
    /// order starting at 0.
    entries: Vec<Arc<CfgEntry>>,
    checkpoints: BTreeMap<u64, ComboCursor>,
    total_commands: u64,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the configuration file at `path` and append its entries, then
    /// rebuild command ranges and the checkpoint directory. May be called
    /// repeatedly; each call appends to the registry.
    pub fn read_configuration(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let entries = config::load_entries(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            entries = entries.len(),
            "configuration loaded"
        );
        self.rebuild(entries);
        Ok(())
    }

    /// Same as [`Registry::read_configuration`] for an in-memory JSON
    /// document.
    pub fn read_configuration_str(&mut self, json: &str) -> Result<()> {
        let entries = config::parse_entries(json)?;
        self.rebuild(entries);
        Ok(())
    }

    /// Total command count across all entries.
    #[must_use]
    pub fn total_commands(&self) -> u64 {
        self.total_commands
    }

    /// Descriptors in registry order (largest combo count first) followed
    /// by a zero-filled terminator whose empty command range sits at the
    /// total command count.
    #[must_use]
    pub fn describe_configuration(&self) -> Vec<EntryInfo> {
        let mut infos: Vec<EntryInfo> =
            self.entries.iter().map(|e| e.info().clone()).collect();
        infos.push(EntryInfo {
            command_start: self.total_commands,
            command_end: self.total_commands,
            ..EntryInfo::default()
        });
        infos
    }

    /// Owned cursor positioned exactly at `command`, without applying the
    /// skip predicate. `None` when `command` is outside `[0, total)`.
    #[must_use]
    pub fn combo_get_combo(&self, command: u64) -> Option<ComboCursor> {
        if command >= self.total_commands {
            return None;
        }
        let (key, checkpoint) = self.checkpoint_at_or_before(command)?;
        let mut cursor = checkpoint.clone();
        cursor.advance(command - key).ok()?;
        Some(cursor)
    }

    /// Stream interface over `[*command, end)`.
    ///
    /// With no live cursor, seeds one at `*command` from the checkpoint
    /// directory and returns immediately when that combo is not skipped.
    /// Otherwise advances past skipped combos, hopping across entry
    /// boundaries through their seed checkpoints. On every successful
    /// return `*command` is the cursor's command number; at exhaustion the
    /// cursor is dropped, `*command` is set to `end`, and false is
    /// returned.
    pub fn combo_get_next(
        &self,
        command: &mut u64,
        cursor: &mut Option<ComboCursor>,
        end: u64,
    ) -> bool {
        let mut live = match cursor.take() {
            Some(live) => live,
            None => {
                if *command >= end {
                    *command = end;
                    return false;
                }
                let Some(seeded) = self.combo_get_combo(*command) else {
                    *command = end;
                    return false;
                };
                if !seeded.is_skipped() {
                    *command = seeded.total_command();
                    *cursor = Some(seeded);
                    return true;
                }
                seeded
            }
        };

        loop {
            if live.next_not_skipped(end) {
                *command = live.total_command();
                *cursor = Some(live);
                return true;
            }

            if live.total_command() + 1 >= end {
                *command = end;
                return false;
            }

            // Entry exhausted below `end`: hop to the next entry through
            // its seed checkpoint.
            let next_command = live.total_command() + 1;
            let Some(seeded) = self.combo_get_combo(next_command) else {
                *command = end;
                return false;
            };
            *command = next_command;
            live = seeded;
            if !live.is_skipped() {
                *cursor = Some(live);
                return true;
            }
        }
    }

    /// Greatest checkpoint key at or before `command`, with its cursor.
    fn checkpoint_at_or_before(&self, command: u64) -> Option<(u64, &ComboCursor)> {
        self.checkpoints
            .range(..=command)
            .next_back()
            .map(|(key, cursor)| (*key, cursor))
    }

    /// Re-sort all entries, reassign command ranges largest-first, and
    /// reseed the checkpoint directory.
    fn rebuild(&mut self, new_entries: Vec<CfgEntry>) {
        let mut all: Vec<CfgEntry> = self
            .entries
            .iter()
            .map(|entry| CfgEntry::clone(entry))
            .collect();
        all.extend(new_entries);
        // Stable ascending sort; reverse iteration below hands the low
        // command range to the biggest entry.
        all.sort_by_key(|entry| entry.generator().num_combos());

        self.entries.clear();
        self.checkpoints.clear();

        let mut current = 0u64;
        for mut entry in all.into_iter().rev() {
            let num_combos = entry.generator().num_combos();
            entry.set_command_range(current, current + num_combos);
            debug!(
                name = %entry.info().name,
                num_combos,
                command_start = current,
                skip = %entry.skip().display(entry.generator()),
                "registered entry"
            );
            let entry = Arc::new(entry);
            self.seed_checkpoints(&entry);
            self.entries.push(entry);
            current += num_combos;
        }
        self.total_commands = current;

        // Terminator cursor bounds lookups from above.
        let terminator = Arc::new(CfgEntry::terminator(current));
        self.checkpoints
            .insert(current, ComboCursor::new(terminator, current));

        debug!(
            total_commands = self.total_commands,
            checkpoints = self.checkpoints.len(),
            "registry rebuilt"
        );
    }

    /// Seed one cursor at the entry start and one every stride within the
    /// entry, each derived from the previous by a single stride advance.
    fn seed_checkpoints(&mut self, entry: &Arc<CfgEntry>) {
        let start = entry.info().command_start;
        let num_combos = entry.info().num_combos;
        let mut cursor = ComboCursor::new(Arc::clone(entry), start);
        self.checkpoints.insert(start, cursor.clone());

        let step = MIN_CHECKPOINT_STEP.max(num_combos / CHECKPOINT_SPLITS);
        let mut offset = step;
        while offset < num_combos {
            if cursor.advance(step).is_err() {
                break;
            }
            self.checkpoints.insert(start + offset, cursor.clone());
            offset += step;
        }
    }
}
