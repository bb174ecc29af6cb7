//! Note selection and the drag-to-move gesture

use crate::models::{NotePosition, Position};
use crate::store::{GuitarStore, MovedNote};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Rectangle of cells, inclusive on every side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionBounds {
    pub min_position: Position,
    pub max_position: Position,
    pub min_string: usize,
    pub max_string: usize,
}

impl RegionBounds {
    pub fn spanning(a: NotePosition, b: NotePosition) -> Self {
        Self {
            min_position: a.position.min(b.position),
            max_position: a.position.max(b.position),
            min_string: a.string.min(b.string),
            max_string: a.string.max(b.string),
        }
    }

    /// Smallest rectangle holding every cell, `None` for no cells
    pub fn enclosing(cells: impl IntoIterator<Item = NotePosition>) -> Option<Self> {
        cells.into_iter().fold(None, |bounds, cell| {
            let single = Self::spanning(cell, cell);
            Some(match bounds {
                None => single,
                Some(b) => Self {
                    min_position: b.min_position.min(single.min_position),
                    max_position: b.max_position.max(single.max_position),
                    min_string: b.min_string.min(single.min_string),
                    max_string: b.max_string.max(single.max_string),
                },
            })
        })
    }

    pub fn contains(&self, at: NotePosition) -> bool {
        at.string >= self.min_string
            && at.string <= self.max_string
            && at.position >= self.min_position
            && at.position <= self.max_position
    }

    /// Every grid cell in the rectangle
    fn cells(&self, subunit: Position) -> Vec<NotePosition> {
        let mut cells = Vec::new();
        if !subunit.is_positive() {
            return cells;
        }
        for string in self.min_string..=self.max_string {
            let mut position = self.min_position;
            while position <= self.max_position {
                cells.push(NotePosition::new(string, position));
                position += subunit;
            }
        }
        cells
    }
}

/// What a pointer press on the selection is expected to turn into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionAction {
    MightDelete,
    MightMove,
    Moving,
    #[default]
    None,
}

/// Pending move of the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOffset {
    pub delta_string: i32,
    pub delta_position: Position,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selections: BTreeSet<NotePosition>,
    rectangle: Option<(NotePosition, NotePosition)>,
    action: SelectionAction,
    offset: MoveOffset,
    last_move_to: Option<NotePosition>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_note(&mut self, at: NotePosition) {
        self.selections.insert(at);
    }

    pub fn unselect_note(&mut self, at: NotePosition) {
        self.selections.remove(&at);
    }

    pub fn is_selected(&self, at: NotePosition) -> bool {
        self.selections.contains(&at)
    }

    pub fn selections(&self) -> impl Iterator<Item = NotePosition> + '_ {
        self.selections.iter().copied()
    }

    pub fn clear_selections(&mut self) {
        self.selections.clear();
    }

    /// No selected cell holds a note
    pub fn is_empty(&self, guitar: &GuitarStore) -> bool {
        self.selections.iter().all(|at| guitar.get_note(*at).is_none())
    }

    pub fn start_selection(&mut self, at: NotePosition) {
        self.rectangle = Some((at, at));
    }

    /// Stretch the rectangle being drawn so its far corner is `at`
    pub fn grow_selection(&mut self, at: NotePosition, subunit: Position) {
        let Some((anchor, corner)) = self.rectangle else {
            return;
        };
        for cell in RegionBounds::spanning(anchor, corner).cells(subunit) {
            self.selections.remove(&cell);
        }
        self.selections
            .extend(RegionBounds::spanning(anchor, at).cells(subunit));
        self.rectangle = Some((anchor, at));
    }

    pub fn end_selection(&mut self) {
        self.rectangle = None;
    }

    /// Delete the notes under the selection and clear it
    pub fn delete_selected_notes(&mut self, guitar: &mut GuitarStore) {
        for at in &self.selections {
            guitar.delete_note(*at);
        }
        self.selections.clear();
        self.action = SelectionAction::None;
    }

    /// Connected groups of selected cells
    ///
    /// Cells are connected when they are at most one string and one
    /// `subunit` apart and sit in the same bar.
    pub fn regions(&self, subunit: Position, bar_index: impl Fn(Position) -> usize) -> Vec<RegionBounds> {
        let selected: Vec<NotePosition> = self.selections.iter().copied().collect();
        let adjacent = |a: NotePosition, b: NotePosition| {
            a.string.abs_diff(b.string) <= 1
                && a.position - b.position <= subunit
                && b.position - a.position <= subunit
                && bar_index(a.position) == bar_index(b.position)
        };

        let mut visited = BTreeSet::new();
        let mut regions = Vec::new();
        for seed in &selected {
            if visited.contains(seed) {
                continue;
            }
            let mut region = Vec::new();
            let mut pending = vec![*seed];
            while let Some(current) = pending.pop() {
                if !visited.insert(current) {
                    continue;
                }
                region.push(current);
                pending.extend(
                    selected
                        .iter()
                        .copied()
                        .filter(|other| !visited.contains(other) && adjacent(current, *other)),
                );
            }
            regions.extend(RegionBounds::enclosing(region));
        }
        regions
    }

    pub fn action(&self) -> SelectionAction {
        self.action
    }

    pub fn set_action(&mut self, action: SelectionAction) {
        self.action = action;
    }

    pub fn offset(&self) -> MoveOffset {
        self.offset
    }

    /// Start dragging the selection from `origin`
    pub fn start_move(&mut self, origin: NotePosition, guitar: &GuitarStore) {
        if self.filled_bounds(guitar).is_none() {
            return;
        }
        self.offset = MoveOffset::default();
        self.last_move_to = Some(origin);
        self.action = SelectionAction::Moving;
    }

    /// Follow the pointer; a step that would push a note off the tuning
    /// or before 0 is ignored
    pub fn move_over(&mut self, to: NotePosition, guitar: &GuitarStore) {
        if self.action != SelectionAction::Moving {
            return;
        }
        let (Some(bounds), Some(last)) = (self.filled_bounds(guitar), self.last_move_to) else {
            return;
        };

        let delta_string = self.offset.delta_string + to.string as i32 - last.string as i32;
        let delta_position = self.offset.delta_position + to.position - last.position;
        if bounds.min_string as i32 + delta_string < 0
            || bounds.max_string as i32 + delta_string >= guitar.string_count() as i32
            || (bounds.min_position + delta_position).is_negative()
        {
            return;
        }

        self.offset = MoveOffset {
            delta_string,
            delta_position,
        };
        self.last_move_to = Some(to);
    }

    /// Where the selected notes would land; empty unless moving
    pub fn preview(&self, guitar: &GuitarStore) -> Vec<MovedNote> {
        if self.action != SelectionAction::Moving {
            return Vec::new();
        }
        let selected: Vec<NotePosition> = self.selections.iter().copied().collect();
        guitar
            .get_moved_notes(&selected, self.offset.delta_string, self.offset.delta_position)
            .unwrap_or_default()
    }

    /// Commit the move; the selection follows the notes
    pub fn end_move(&mut self, guitar: &mut GuitarStore, copy: bool) -> Option<Vec<NotePosition>> {
        if self.action != SelectionAction::Moving {
            return None;
        }
        self.action = SelectionAction::None;
        self.last_move_to = None;
        let offset = std::mem::take(&mut self.offset);

        let selected: Vec<NotePosition> = self.selections.iter().copied().collect();
        let moved = guitar.move_notes(&selected, offset.delta_string, offset.delta_position, copy)?;
        self.selections = moved.iter().copied().collect();
        Some(moved)
    }

    pub fn cancel_move(&mut self) {
        self.action = SelectionAction::None;
        self.offset = MoveOffset::default();
        self.last_move_to = None;
    }

    fn filled_bounds(&self, guitar: &GuitarStore) -> Option<RegionBounds> {
        RegionBounds::enclosing(
            self.selections
                .iter()
                .copied()
                .filter(|at| guitar.get_note(*at).is_some()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GuitarNote;

    fn at(string: usize, beats: i32) -> NotePosition {
        NotePosition::new(string, Position::beats(beats))
    }

    fn quarter() -> Position {
        Position::beats(1)
    }

    #[test]
    fn test_grow_selection_replaces_rectangle() {
        let mut selection = SelectionState::new();
        selection.start_selection(at(0, 0));
        selection.grow_selection(at(1, 2), quarter());
        assert_eq!(selection.selections().count(), 6);

        selection.grow_selection(at(0, 1), quarter());
        assert_eq!(selection.selections().collect::<Vec<_>>(), vec![at(0, 0), at(0, 1)]);
        selection.end_selection();

        selection.grow_selection(at(5, 5), quarter());
        assert_eq!(selection.selections().count(), 2);
    }

    #[test]
    fn test_regions_split_on_gaps_and_bars() {
        let mut selection = SelectionState::new();
        for cell in [at(0, 0), at(1, 1), at(0, 3), at(0, 4)] {
            selection.select_note(cell);
        }
        let bar_of = |p: Position| (p.numer() / 4) as usize;
        let regions = selection.regions(quarter(), bar_of);
        assert_eq!(regions.len(), 3);
        assert_eq!(
            regions[0],
            RegionBounds {
                min_position: Position::beats(0),
                max_position: Position::beats(1),
                min_string: 0,
                max_string: 1,
            }
        );
    }

    #[test]
    fn test_move_gesture() {
        let mut guitar = GuitarStore::default();
        guitar.set_note(at(0, 0), GuitarNote::midi(64)).unwrap();
        guitar.set_note(at(1, 1), GuitarNote::midi(60)).unwrap();

        let mut selection = SelectionState::new();
        selection.select_note(at(0, 0));
        selection.select_note(at(1, 1));
        selection.start_move(at(0, 0), &guitar);
        selection.move_over(at(2, 2), &guitar);
        assert_eq!(
            selection.offset(),
            MoveOffset { delta_string: 2, delta_position: Position::beats(2) }
        );
        // drag previews only
        assert_eq!(selection.preview(&guitar).len(), 2);
        assert!(guitar.get_note(at(2, 2)).is_none());

        // string 7 does not exist, so this step is ignored
        selection.move_over(at(6, 2), &guitar);
        assert_eq!(selection.offset().delta_string, 2);

        let moved = selection.end_move(&mut guitar, false).unwrap();
        assert_eq!(moved, vec![at(2, 2), at(3, 3)]);
        assert!(guitar.get_note(at(0, 0)).is_none());
        assert!(selection.is_selected(at(3, 3)));
        assert_eq!(selection.action(), SelectionAction::None);
        assert!(selection.preview(&guitar).is_empty());
    }

    #[test]
    fn test_cancel_move_leaves_notes() {
        let mut guitar = GuitarStore::default();
        guitar.set_note(at(0, 0), GuitarNote::midi(64)).unwrap();
        let mut selection = SelectionState::new();
        selection.select_note(at(0, 0));
        selection.start_move(at(0, 0), &guitar);
        selection.move_over(at(0, 3), &guitar);
        selection.cancel_move();
        assert_eq!(selection.end_move(&mut guitar, false), None);
        assert!(guitar.get_note(at(0, 0)).is_some());
    }

    #[test]
    fn test_delete_selected_notes() {
        let mut guitar = GuitarStore::default();
        guitar.set_note(at(0, 0), GuitarNote::midi(64)).unwrap();
        let mut selection = SelectionState::new();
        selection.select_note(at(0, 0));
        assert!(!selection.is_empty(&guitar));
        selection.delete_selected_notes(&mut guitar);
        assert!(guitar.notes().is_empty());
        assert_eq!(selection.selections().count(), 0);
    }
}
