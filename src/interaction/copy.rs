//! Copy and paste of selected cells

use super::selection::SelectionState;
use crate::models::NotePosition;
use crate::store::GuitarStore;

#[derive(Debug, Clone, Default)]
pub struct CopyState {
    copied: Vec<NotePosition>,
}

impl CopyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the currently selected cells
    pub fn copy(&mut self, selection: &SelectionState) {
        self.copied = selection.selections().collect();
    }

    pub fn has_copied(&self) -> bool {
        !self.copied.is_empty()
    }

    /// Copy the remembered notes so their top-left cell lands on `target`
    ///
    /// Pasting reads the notes as they are now, not as they were when copied.
    pub fn paste(&self, target: NotePosition, guitar: &mut GuitarStore) -> Option<Vec<NotePosition>> {
        let min_string = self.copied.iter().map(|at| at.string).min()?;
        let min_position = self.copied.iter().map(|at| at.position).min()?;
        let delta_string = target.string as i32 - min_string as i32;
        let delta_position = target.position - min_position;
        guitar.move_notes(&self.copied, delta_string, delta_position, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuitarNote, Position};

    fn at(string: usize, beats: i32) -> NotePosition {
        NotePosition::new(string, Position::beats(beats))
    }

    #[test]
    fn test_paste_anchors_top_left() {
        let mut guitar = GuitarStore::default();
        guitar.set_note(at(1, 1), GuitarNote::midi(60)).unwrap();
        guitar.set_note(at(2, 2), GuitarNote::midi(57)).unwrap();

        let mut selection = SelectionState::new();
        selection.select_note(at(1, 1));
        selection.select_note(at(2, 2));
        let mut copy = CopyState::new();
        assert!(copy.paste(at(0, 0), &mut guitar).is_none());
        copy.copy(&selection);
        assert!(copy.has_copied());

        let pasted = copy.paste(at(1, 8), &mut guitar).unwrap();
        assert_eq!(pasted, vec![at(1, 8), at(2, 9)]);
        assert_eq!(guitar.get_note(at(1, 1)), Some(&GuitarNote::midi(60)));
        assert_eq!(guitar.get_note(at(2, 9)), Some(&GuitarNote::midi(57)));
    }

    #[test]
    fn test_paste_off_the_tuning_is_refused() {
        let mut guitar = GuitarStore::default();
        guitar.set_note(at(0, 0), GuitarNote::midi(64)).unwrap();
        guitar.set_note(at(2, 0), GuitarNote::midi(55)).unwrap();
        let mut selection = SelectionState::new();
        selection.select_note(at(0, 0));
        selection.select_note(at(2, 0));
        let mut copy = CopyState::new();
        copy.copy(&selection);

        assert!(copy.paste(at(4, 4), &mut guitar).is_none());
        assert_eq!(guitar.notes().len(), 1);
    }
}
