//! Sparse position → note stack index
//!
//! The tab is a two-dimensional grid (string × position) stored sparsely:
//! only positions with at least one note have a stack, and a stack only
//! holds the strings that sound. Everything else is a rest.

use super::shift;
use crate::error::{EditorError, Result};
use crate::models::serde_helpers::pairs;
use crate::models::{largest_spacing_divisor, NoteStack, Position, Spacing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "N: Serialize", deserialize = "N: Deserialize<'de>"))]
#[serde(transparent)]
pub struct PositionIndex<N> {
    #[serde(with = "pairs")]
    stacks: BTreeMap<Position, NoteStack<N>>,
}

impl<N> PositionIndex<N> {
    pub fn new() -> Self {
        Self {
            stacks: BTreeMap::new(),
        }
    }

    /// Stacks in `[start, end)`, in position order
    pub fn get_stacks(&self, start: Position, end: Position) -> Vec<(Position, &NoteStack<N>)> {
        if end <= start {
            return Vec::new();
        }
        self.stacks.range(start..end).map(|(p, s)| (*p, s)).collect()
    }

    pub fn get_stack(&self, position: Position) -> Option<&NoteStack<N>> {
        self.stacks.get(&position)
    }

    pub fn get_note(&self, position: Position, string: usize) -> Option<&N> {
        self.stacks.get(&position).and_then(|s| s.get(string))
    }

    pub fn has_note(&self, position: Position, string: usize) -> bool {
        self.get_note(position, string).is_some()
    }

    /// Put a note on the grid, replacing whatever was there
    pub fn set_note(&mut self, position: Position, string: usize, note: N) -> Result<Option<N>> {
        if position.is_negative() {
            return Err(EditorError::InvariantViolation(format!(
                "note position {} is before the start of the piece",
                position
            )));
        }
        Ok(self.stacks.entry(position).or_default().insert(string, note))
    }

    /// Remove a note; the stack goes with it once it is empty
    pub fn delete_note(&mut self, position: Position, string: usize) -> Option<N> {
        let stack = self.stacks.get_mut(&position)?;
        let removed = stack.remove(string);
        if stack.is_empty() {
            self.stacks.remove(&position);
        }
        removed
    }

    /// Replace the whole stack at a position; an empty stack clears it
    pub fn set_stack(&mut self, position: Position, stack: NoteStack<N>) {
        if stack.is_empty() {
            self.stacks.remove(&position);
        } else {
            self.stacks.insert(position, stack);
        }
    }

    /// Relocate every stack at or after `position` by `by`
    pub fn shift_from(&mut self, position: Position, by: Position) {
        let dropped = shift::shift_from(&mut self.stacks, position, by);
        if !dropped.is_empty() {
            log::warn!("PositionIndex::shift_from dropped {} stacks", dropped.len());
        }
    }

    /// Relocate the stacks in `[start, end)` by `delta`
    pub fn move_range(&mut self, start: Position, end: Position, delta: Position) {
        shift::move_range(&mut self.stacks, start, end, delta);
    }

    /// Remove and return the stacks in `[start, end)`
    pub fn delete_range(&mut self, start: Position, end: Position) -> Vec<(Position, NoteStack<N>)> {
        shift::take_range(&mut self.stacks, start, end)
    }

    /// Highest occupied position, or 0 for an empty tab
    pub fn last_position(&self) -> Position {
        self.stacks
            .keys()
            .next_back()
            .copied()
            .unwrap_or(Position::ZERO)
    }

    /// Finest grid any occupied position needs
    ///
    /// `None` when the tab is empty or a position is off every named grid.
    pub fn min_spacing(&self) -> Option<Spacing> {
        self.stacks
            .keys()
            .map(|p| largest_spacing_divisor(*p))
            .try_fold(None::<Spacing>, |finest, spacing| {
                let spacing = spacing?;
                Some(match finest {
                    Some(f) if f.beats() <= spacing.beats() => Some(f),
                    _ => Some(spacing),
                })
            })
            .flatten()
    }

    /// Make room for a new string at `index` in every stack
    pub fn insert_string(&mut self, index: usize) {
        for stack in self.stacks.values_mut() {
            stack.insert_string(index);
        }
    }

    /// Drop string `index` from every stack
    pub fn remove_string(&mut self, index: usize) {
        for stack in self.stacks.values_mut() {
            stack.remove_string(index);
        }
        self.stacks.retain(|_, stack| !stack.is_empty());
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.stacks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &NoteStack<N>)> {
        self.stacks.iter().map(|(p, s)| (*p, s))
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

impl<N> Default for PositionIndex<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> FromIterator<(Position, NoteStack<N>)> for PositionIndex<N> {
    fn from_iter<I: IntoIterator<Item = (Position, NoteStack<N>)>>(iter: I) -> Self {
        Self {
            stacks: iter.into_iter().filter(|(_, s)| !s.is_empty()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GuitarNote;

    fn index_with(positions: &[Position]) -> PositionIndex<GuitarNote> {
        let mut index = PositionIndex::new();
        for p in positions {
            index.set_note(*p, 0, GuitarNote::midi(64)).unwrap();
        }
        index
    }

    fn beats(values: &[i32]) -> Vec<Position> {
        values.iter().map(|b| Position::beats(*b)).collect()
    }

    #[test]
    fn test_set_and_delete_note() {
        let mut index = PositionIndex::new();
        index.set_note(Position::beats(2), 1, GuitarNote::midi(60)).unwrap();
        index.set_note(Position::beats(2), 3, GuitarNote::muted()).unwrap();
        assert_eq!(index.get_note(Position::beats(2), 1), Some(&GuitarNote::midi(60)));
        assert_eq!(index.get_note(Position::beats(2), 2), None);

        index.delete_note(Position::beats(2), 1);
        assert_eq!(index.len(), 1);
        index.delete_note(Position::beats(2), 3);
        assert!(index.is_empty());
        assert!(index.get_stack(Position::beats(2)).is_none());
    }

    #[test]
    fn test_set_note_rejects_negative_position() {
        let mut index = PositionIndex::new();
        let result = index.set_note(Position::beats(-1), 0, GuitarNote::midi(60));
        assert!(matches!(result, Err(EditorError::InvariantViolation(_))));
    }

    #[test]
    fn test_get_stacks_half_open() {
        let index = index_with(&beats(&[0, 1, 2, 3, 4]));
        let found: Vec<Position> = index
            .get_stacks(Position::beats(1), Position::beats(4))
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(found, beats(&[1, 2, 3]));
        assert!(index.get_stacks(Position::beats(4), Position::beats(1)).is_empty());
    }

    #[test]
    fn test_shift_from_round_trip() {
        let original = index_with(&beats(&[0, 1, 2, 3, 4, 5]));
        let mut index = original.clone();
        let p = Position::beats(2);
        let s = Position::new(1, 2);
        index.shift_from(p, s);
        assert_eq!(
            index.positions().collect::<Vec<_>>(),
            vec![
                Position::beats(0),
                Position::beats(1),
                Position::new(5, 2),
                Position::new(7, 2),
                Position::new(9, 2),
                Position::new(11, 2),
            ]
        );
        index.shift_from(p + s, -s);
        assert_eq!(index, original);
    }

    #[test]
    fn test_last_position() {
        assert_eq!(PositionIndex::<GuitarNote>::new().last_position(), Position::ZERO);
        let index = index_with(&[Position::beats(1), Position::new(13, 4)]);
        assert_eq!(index.last_position(), Position::new(13, 4));
    }

    #[test]
    fn test_delete_range() {
        let mut index = index_with(&beats(&[0, 4, 5, 8]));
        let removed = index.delete_range(Position::beats(4), Position::beats(8));
        assert_eq!(removed.len(), 2);
        assert_eq!(index.positions().collect::<Vec<_>>(), beats(&[0, 8]));
    }

    #[test]
    fn test_min_spacing() {
        assert_eq!(PositionIndex::<GuitarNote>::new().min_spacing(), None);
        let index = index_with(&[Position::beats(1), Position::new(1, 2), Position::new(3, 4)]);
        assert_eq!(index.min_spacing(), Some(Spacing::Sixteenth));
        let triplets = index_with(&[Position::beats(1), Position::new(1, 3)]);
        assert_eq!(triplets.min_spacing(), None);
    }

    #[test]
    fn test_remove_string_drops_empty_stacks() {
        let mut index = PositionIndex::new();
        index.set_note(Position::beats(0), 2, GuitarNote::midi(55)).unwrap();
        index.set_note(Position::beats(1), 3, GuitarNote::midi(50)).unwrap();
        index.remove_string(2);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get_note(Position::beats(1), 2), Some(&GuitarNote::midi(50)));
    }

    #[test]
    fn test_persisted_layout() {
        let mut index = PositionIndex::new();
        index.set_note(Position::new(1, 2), 0, GuitarNote::midi(64)).unwrap();
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"[[0.5,[[0,{"note":64}]]]]"#);
        let parsed: PositionIndex<GuitarNote> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, index);
    }
}
