//! Cumulative battle log

use rotom_protocol::TurnLogEntry;

/// Append-only turn log
///
/// Turn numbers are unique and strictly increasing; turn 0 (the pre-battle
/// preamble) can only be the first entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    entries: Vec<TurnLogEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a freshly parsed full log, returning how many lines were added
    ///
    /// Turns newer than the last recorded one are appended. When the last
    /// recorded turn has grown (its known lines are a prefix of the parsed
    /// ones), only the new lines are appended. Older turns are left alone.
    pub fn merge(&mut self, parsed: Vec<TurnLogEntry>) -> usize {
        let mut added = 0;

        for entry in parsed {
            match self.entries.last_mut() {
                Some(last) if entry.turn == last.turn => {
                    if entry.actions.len() > last.actions.len()
                        && entry.actions.starts_with(&last.actions)
                    {
                        let new_lines = entry.actions[last.actions.len()..].to_vec();
                        added += new_lines.len();
                        last.actions.extend(new_lines);
                    }
                }
                Some(last) if entry.turn < last.turn => {}
                _ => {
                    added += entry.actions.len();
                    self.entries.push(entry);
                }
            }
        }

        added
    }

    pub fn entries(&self) -> &[TurnLogEntry] {
        &self.entries
    }

    /// Latest turn number seen, 0 before the first header
    pub fn current_turn(&self) -> u32 {
        self.entries.last().map(|e| e.turn).unwrap_or(0)
    }

    pub fn last(&self) -> Option<&TurnLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
