//! Row pinning ("locking")
//!
//! Pinned rows are moved out of the paginated working set and rendered above
//! it. Pinned and working rows always partition the loaded records.

use lazygrid_core::{Record, RecordId};

/// Default number of rows that can be pinned at once
pub const DEFAULT_PIN_CAP: usize = 2;

/// Result of a pin toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned,
    Unpinned,
    /// The pin set is full; nothing changed
    Refused,
    /// The record is not where the toggle expected it; nothing changed
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinSet {
    rows: Vec<Record>,
    cap: usize,
}

impl Default for PinSet {
    fn default() -> Self {
        Self::new(DEFAULT_PIN_CAP)
    }
}

impl PinSet {
    pub fn new(cap: usize) -> Self {
        Self {
            rows: Vec::new(),
            cap,
        }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Whether an unpinned row may be pinned right now
    pub fn can_pin(&self) -> bool {
        self.rows.len() < self.cap
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.rows.iter().any(|row| row.id == id)
    }

    /// Pin or unpin `record`.
    ///
    /// `position_hint` is the row index in the list the record currently
    /// lives in (the working set when pinning, the pin set when unpinning).
    /// If the hint points at another record, the record is looked up by id.
    pub fn toggle(
        &mut self,
        working: &mut Vec<Record>,
        record: &Record,
        is_currently_pinned: bool,
        position_hint: usize,
    ) -> PinOutcome {
        if is_currently_pinned {
            let Some(index) = locate(&self.rows, record.id, position_hint) else {
                return PinOutcome::NotFound;
            };
            let unpinned = self.rows.remove(index);
            working.push(unpinned);
            working.sort_by(|a, b| a.id.cmp(&b.id));
            tracing::debug!(id = record.id, pinned = self.rows.len(), "row unpinned");
            PinOutcome::Unpinned
        } else {
            if !self.can_pin() {
                tracing::debug!(id = record.id, cap = self.cap, "pin refused, pin set full");
                return PinOutcome::Refused;
            }
            let Some(index) = locate(working, record.id, position_hint) else {
                return PinOutcome::NotFound;
            };
            let pinned = working.remove(index);
            self.rows.push(pinned);
            tracing::debug!(id = record.id, pinned = self.rows.len(), "row pinned");
            PinOutcome::Pinned
        }
    }

    /// Drop records that are already pinned from a freshly fetched page
    pub fn exclude_pinned(&self, records: Vec<Record>) -> Vec<Record> {
        records
            .into_iter()
            .filter(|record| !self.contains(record.id))
            .collect()
    }
}

fn locate(rows: &[Record], id: RecordId, hint: usize) -> Option<usize> {
    match rows.get(hint) {
        Some(row) if row.id == id => Some(hint),
        _ => rows.iter().position(|row| row.id == id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(ids: &[i64]) -> Vec<Record> {
        ids.iter()
            .map(|id| Record::new(*id, format!("todo {}", id), false, 1))
            .collect()
    }

    fn ids(rows: &[Record]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn pin_moves_row_to_tail_of_pin_set() {
        let mut pins = PinSet::default();
        let mut working = rows(&[1, 2, 3]);
        let record = working[1].clone();

        assert_eq!(pins.toggle(&mut working, &record, false, 1), PinOutcome::Pinned);
        assert_eq!(ids(&working), vec![1, 3]);
        assert_eq!(ids(pins.rows()), vec![2]);
    }

    #[test]
    fn third_pin_is_refused_at_default_cap() {
        let mut pins = PinSet::default();
        let mut working = rows(&[1, 2, 3, 4]);
        for _ in 0..2 {
            let record = working[0].clone();
            assert_eq!(pins.toggle(&mut working, &record, false, 0), PinOutcome::Pinned);
        }
        let record = working[0].clone();
        assert_eq!(pins.toggle(&mut working, &record, false, 0), PinOutcome::Refused);
        assert_eq!(pins.len(), 2);
        assert_eq!(ids(&working), vec![3, 4]);
        assert!(!pins.can_pin());
    }

    #[test]
    fn unpin_resorts_working_set_by_id() {
        let mut pins = PinSet::default();
        let mut working = rows(&[5, 2, 8, 10]);
        let five = working[0].clone();
        pins.toggle(&mut working, &five, false, 0);
        assert_eq!(ids(&working), vec![2, 8, 10]);

        assert_eq!(pins.toggle(&mut working, &five, true, 0), PinOutcome::Unpinned);
        assert_eq!(ids(&working), vec![2, 5, 8, 10]);
        assert!(pins.is_empty());
    }

    #[test]
    fn stale_position_hint_falls_back_to_id() {
        let mut pins = PinSet::default();
        let mut working = rows(&[1, 2, 3]);
        let three = working[2].clone();
        assert_eq!(pins.toggle(&mut working, &three, false, 0), PinOutcome::Pinned);
        assert_eq!(ids(&working), vec![1, 2]);
    }

    #[test]
    fn unknown_record_changes_nothing() {
        let mut pins = PinSet::default();
        let mut working = rows(&[1, 2]);
        let stranger = Record::new(99, "nope", false, 1);
        assert_eq!(pins.toggle(&mut working, &stranger, false, 0), PinOutcome::NotFound);
        assert_eq!(pins.toggle(&mut working, &stranger, true, 0), PinOutcome::NotFound);
        assert_eq!(ids(&working), vec![1, 2]);
    }

    #[test]
    fn exclude_pinned_keeps_partition_on_reload() {
        let mut pins = PinSet::default();
        let mut working = rows(&[1, 2, 3]);
        let two = working[1].clone();
        pins.toggle(&mut working, &two, false, 1);

        let reloaded = pins.exclude_pinned(rows(&[1, 2, 3, 4]));
        assert_eq!(ids(&reloaded), vec![1, 3, 4]);
    }
}
