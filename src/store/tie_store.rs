//! Tie and bend relations, anchored per string at their origin
//!
//! Each (string, position) holds at most one relation. Relations refer to
//! notes by position only, so every structural edit on the note index must
//! be mirrored here: [`TieStore::shift_from`], [`TieStore::move_range`] and
//! [`TieStore::delete_at`] keep both endpoints in step with the notes.

use super::position_index::PositionIndex;
use crate::models::serde_helpers::nested_pairs;
use crate::models::{Bend, GuitarNote, NotePosition, Position, Tie, TieData, TieSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TieStore {
    #[serde(with = "nested_pairs")]
    ties: BTreeMap<usize, BTreeMap<Position, TieSlot>>,
}

impl TieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the relation anchored at (string, from)
    pub fn set_tie(&mut self, string: usize, from: Position, slot: TieSlot) {
        log::debug!("set_tie: string {} from {} to {}", string, from, slot.to());
        self.ties.entry(string).or_default().insert(from, slot);
    }

    pub fn get_starts_at(&self, at: NotePosition) -> Option<&TieSlot> {
        self.ties.get(&at.string).and_then(|m| m.get(&at.position))
    }

    pub fn delete_tie(&mut self, string: usize, from: Position) -> Option<TieSlot> {
        let row = self.ties.get_mut(&string)?;
        let removed = row.remove(&from);
        if row.is_empty() {
            self.ties.remove(&string);
        }
        removed
    }

    /// Remove every relation touching (string, position) at either end
    pub fn delete_at(&mut self, string: usize, position: Position) {
        if let Some(row) = self.ties.get_mut(&string) {
            row.remove(&position);
            row.retain(|_, slot| slot.to() != position);
            if row.is_empty() {
                self.ties.remove(&string);
            }
        }
    }

    /// Upsert from a flattened tie view
    pub fn update_tie(&mut self, tie: &Tie) {
        self.set_tie(tie.string, tie.from, TieSlot::Tie(tie.data()));
    }

    /// Upsert from a flattened bend view
    pub fn update_bend(&mut self, bend: &Bend) {
        self.set_tie(bend.string, bend.from, TieSlot::Bend(bend.data()));
    }

    /// Every tie (not bend), with the pitches at both ends
    ///
    /// A tie whose note has gone missing is still listed, with a `None`
    /// pitch on that end.
    pub fn get_ties(&self, notes: &PositionIndex<GuitarNote>) -> Vec<Tie> {
        let midi_at = |position: Position, string: usize| {
            notes.get_note(position, string).and_then(|n| n.note.midi())
        };
        self.entries()
            .filter_map(|(string, from, slot)| match slot {
                TieSlot::Tie(TieData { kind, to }) => Some(Tie {
                    string,
                    from,
                    kind: *kind,
                    to: *to,
                    midi_from: midi_at(from, string),
                    midi_to: midi_at(*to, string),
                }),
                TieSlot::Bend(_) => None,
            })
            .collect()
    }

    pub fn get_bends(&self) -> Vec<Bend> {
        self.entries()
            .filter_map(|(string, from, slot)| match slot {
                TieSlot::Bend(b) => Some(Bend {
                    string,
                    from,
                    amount: b.amount,
                    through: b.through.clone(),
                    release_type: b.release_type,
                    to: b.to,
                }),
                TieSlot::Tie(_) => None,
            })
            .collect()
    }

    pub fn has_bend(&self, at: NotePosition) -> bool {
        self.get_starts_at(at).map_or(false, TieSlot::is_bend)
    }

    /// A tie leaves this note and another tie arrives at it
    pub fn has_tie_both_sides(&self, at: NotePosition) -> bool {
        match self.get_starts_at(at) {
            Some(TieSlot::Tie(_)) => {}
            _ => return false,
        }
        self.ties.get(&at.string).map_or(false, |row| {
            row.values()
                .any(|slot| !slot.is_bend() && slot.to() == at.position)
        })
    }

    /// Any bend with an endpoint in `[start, end]`
    pub fn has_bends_within(&self, start: Position, end: Position) -> bool {
        let within = |p: Position| p >= start && p <= end;
        self.entries().any(|(_, from, slot)| slot.is_bend() && (within(from) || within(slot.to())))
    }

    /// Shift relations with `from >= position` by `by`
    ///
    /// Relations entirely before `position` stay put. A relation spanning
    /// the boundary (`from < position <= to`) is deleted.
    pub fn shift_from(&mut self, position: Position, by: Position) {
        if by == Position::ZERO {
            return;
        }
        for row in self.ties.values_mut() {
            let straddling = row
                .iter()
                .filter(|(from, slot)| **from < position && position <= slot.to())
                .count();
            if straddling > 0 {
                log::debug!("TieStore::shift_from: dropping {} relations across {}", straddling, position);
            }
            row.retain(|from, slot| !(*from < position && position <= slot.to()));

            let tail = row.split_off(&position);
            for (from, slot) in tail {
                let target = from + by;
                if target.is_negative() {
                    log::warn!("TieStore::shift_from: relation at {} would move to {}, dropping", from, target);
                    continue;
                }
                row.insert(target, slot.shifted(by));
            }
        }
        self.ties.retain(|_, row| !row.is_empty());
    }

    /// Move relations lying wholly inside `[start, end)` by `delta`
    ///
    /// Relations with exactly one endpoint inside the range are deleted.
    pub fn move_range(&mut self, start: Position, end: Position, delta: Position) {
        let inside = |p: Position| p >= start && p < end;
        for row in self.ties.values_mut() {
            let mut moved = Vec::new();
            row.retain(|from, slot| match (inside(*from), inside(slot.to())) {
                (true, true) => {
                    moved.push((*from + delta, slot.shifted(delta)));
                    false
                }
                (false, false) => true,
                _ => false,
            });
            for (from, slot) in moved {
                if row.insert(from, slot).is_some() {
                    log::warn!("TieStore::move_range: relation at {} overwrote an existing one", from);
                }
            }
        }
        self.ties.retain(|_, row| !row.is_empty());
    }

    /// Delete every relation with an endpoint in `[start, end)`
    pub fn delete_range(&mut self, start: Position, end: Position) {
        let inside = |p: Position| p >= start && p < end;
        for row in self.ties.values_mut() {
            row.retain(|from, slot| !inside(*from) && !inside(slot.to()));
        }
        self.ties.retain(|_, row| !row.is_empty());
    }

    pub fn insert_string(&mut self, index: usize) {
        let moved = self.ties.split_off(&index);
        self.ties.extend(moved.into_iter().map(|(s, row)| (s + 1, row)));
    }

    /// Drop the relations on string `index` and renumber the rest
    pub fn remove_string(&mut self, index: usize) {
        let mut moved = self.ties.split_off(&index);
        moved.remove(&index);
        self.ties.extend(moved.into_iter().map(|(s, row)| (s - 1, row)));
    }

    pub fn is_empty(&self) -> bool {
        self.ties.is_empty()
    }

    /// Strings that carry at least one relation
    pub fn strings(&self) -> impl Iterator<Item = usize> + '_ {
        self.ties.keys().copied()
    }

    fn entries(&self) -> impl Iterator<Item = (usize, Position, &TieSlot)> {
        self.ties
            .iter()
            .flat_map(|(string, row)| row.iter().map(move |(from, slot)| (*string, *from, slot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BendData, ReleaseType, TieKind};

    fn p(b: i32) -> Position {
        Position::beats(b)
    }

    fn hammer(to: i32) -> TieSlot {
        TieSlot::Tie(TieData { kind: TieKind::Hammer, to: p(to) })
    }

    fn bend(to: i32) -> TieSlot {
        TieSlot::Bend(BendData {
            amount: 1.0,
            through: None,
            release_type: ReleaseType::Connect,
            to: p(to),
        })
    }

    #[test]
    fn test_set_is_idempotent_upsert() {
        let mut ties = TieStore::new();
        ties.set_tie(0, p(1), hammer(2));
        ties.set_tie(0, p(1), hammer(2));
        ties.set_tie(0, p(1), hammer(3));
        assert_eq!(ties.get_starts_at(NotePosition::new(0, p(1))), Some(&hammer(3)));
        assert_eq!(ties.get_ties(&PositionIndex::new()).len(), 1);
    }

    #[test]
    fn test_delete_tie() {
        let mut ties = TieStore::new();
        ties.set_tie(2, p(0), hammer(1));
        ties.delete_tie(2, p(0));
        assert_eq!(ties.get_starts_at(NotePosition::new(2, p(0))), None);
        assert!(ties.is_empty());
    }

    #[test]
    fn test_delete_at_removes_incoming_relations() {
        let mut ties = TieStore::new();
        ties.set_tie(0, p(0), hammer(2));
        ties.set_tie(0, p(2), hammer(3));
        ties.set_tie(1, p(0), hammer(2));
        ties.delete_at(0, p(2));
        assert_eq!(ties.get_starts_at(NotePosition::new(0, p(0))), None);
        assert_eq!(ties.get_starts_at(NotePosition::new(0, p(2))), None);
        assert!(ties.get_starts_at(NotePosition::new(1, p(0))).is_some());
    }

    #[test]
    fn test_shift_from_policy() {
        let mut ties = TieStore::new();
        ties.set_tie(0, p(0), hammer(1)); // before
        ties.set_tie(0, p(3), hammer(5)); // straddles 4
        ties.set_tie(0, p(4), hammer(6)); // after
        ties.shift_from(p(4), p(4));

        assert_eq!(ties.get_starts_at(NotePosition::new(0, p(0))), Some(&hammer(1)));
        assert_eq!(ties.get_starts_at(NotePosition::new(0, p(3))), None);
        assert_eq!(ties.get_starts_at(NotePosition::new(0, p(8))), Some(&hammer(10)));
    }

    #[test]
    fn test_move_range_drops_half_inside() {
        let mut ties = TieStore::new();
        ties.set_tie(0, p(4), hammer(5)); // inside
        ties.set_tie(0, p(6), hammer(8)); // leaves the range
        ties.set_tie(1, p(2), hammer(4)); // enters the range
        ties.set_tie(1, p(10), hammer(11)); // outside
        ties.move_range(p(4), p(8), p(8));

        assert_eq!(ties.get_starts_at(NotePosition::new(0, p(12))), Some(&hammer(13)));
        assert_eq!(ties.get_starts_at(NotePosition::new(0, p(6))), None);
        assert_eq!(ties.get_starts_at(NotePosition::new(1, p(2))), None);
        assert_eq!(ties.get_starts_at(NotePosition::new(1, p(10))), Some(&hammer(11)));
    }

    #[test]
    fn test_display_join_tolerates_missing_notes() {
        let mut notes = PositionIndex::new();
        notes.set_note(p(0), 0, GuitarNote::midi(64)).unwrap();
        let mut ties = TieStore::new();
        ties.set_tie(0, p(0), hammer(1));

        let joined = ties.get_ties(&notes);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].midi_from, Some(64));
        assert_eq!(joined[0].midi_to, None);
    }

    #[test]
    fn test_bend_queries() {
        let mut ties = TieStore::new();
        ties.set_tie(0, p(2), bend(3));
        ties.set_tie(1, p(0), hammer(1));
        ties.set_tie(1, p(1), hammer(2));

        assert!(ties.has_bend(NotePosition::new(0, p(2))));
        assert!(!ties.has_bend(NotePosition::new(1, p(0))));
        assert!(ties.has_tie_both_sides(NotePosition::new(1, p(1))));
        assert!(!ties.has_tie_both_sides(NotePosition::new(1, p(0))));
        assert!(ties.has_bends_within(p(3), p(5)));
        assert!(!ties.has_bends_within(p(4), p(5)));
        assert_eq!(ties.get_bends().len(), 1);
        assert_eq!(ties.get_ties(&PositionIndex::new()).len(), 2);
    }

    #[test]
    fn test_string_renumbering() {
        let mut ties = TieStore::new();
        ties.set_tie(0, p(0), hammer(1));
        ties.set_tie(2, p(0), hammer(1));
        ties.insert_string(1);
        assert!(ties.get_starts_at(NotePosition::new(3, p(0))).is_some());
        ties.remove_string(0);
        assert!(ties.get_starts_at(NotePosition::new(0, p(0))).is_none());
        assert!(ties.get_starts_at(NotePosition::new(2, p(0))).is_some());
    }

    #[test]
    fn test_persisted_layout() {
        let mut ties = TieStore::new();
        ties.set_tie(1, p(0), hammer(2));
        let json = serde_json::to_string(&ties).unwrap();
        assert_eq!(json, r#"[[1,[[0,{"type":"hammer","to":2}]]]]"#);
        let parsed: TieStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ties);
    }
}
