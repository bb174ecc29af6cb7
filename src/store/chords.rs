//! Chord diagrams with their own tuning

use super::guitar::new_tuning_note;
use crate::error::{EditorError, Result};
use crate::models::theory::{Midi, DEFAULT_TUNING};
use crate::models::Chord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordStore {
    pub tuning: Vec<Midi>,
    pub chords: Vec<Chord>,
}

impl ChordStore {
    pub fn new(tuning: Vec<Midi>) -> Self {
        Self {
            tuning,
            chords: vec![Chord::default()],
        }
    }

    pub fn add_chord(&mut self) {
        self.chords.push(Chord::default());
    }

    pub fn delete_chord(&mut self, index: usize) -> Option<Chord> {
        if index < self.chords.len() {
            Some(self.chords.remove(index))
        } else {
            None
        }
    }

    pub fn move_chord(&mut self, from: usize, to: usize) {
        if from >= self.chords.len() {
            return;
        }
        let chord = self.chords.remove(from);
        let to = to.min(self.chords.len());
        self.chords.insert(to, chord);
    }

    pub fn set_tuning_note(&mut self, string: usize, note: Midi) -> Result<()> {
        match self.tuning.get_mut(string) {
            Some(slot) => {
                *slot = note;
                Ok(())
            }
            None => Err(EditorError::InvariantViolation(format!(
                "no chord string {} to tune",
                string
            ))),
        }
    }

    /// Add a string at `index` (the bottom when `None`), renumbering chord notes
    pub fn insert_string(&mut self, index: Option<usize>) {
        let len = self.tuning.len();
        let index = index.unwrap_or(len).min(len);
        let note = new_tuning_note(&self.tuning, index);
        self.tuning.insert(index, note);
        for chord in &mut self.chords {
            chord.notes.insert_string(index);
        }
    }

    /// Remove string `index` (the bottom when `None`); the last string stays
    pub fn remove_string(&mut self, index: Option<usize>) -> bool {
        if self.tuning.len() <= 1 {
            return false;
        }
        let index = index.unwrap_or(self.tuning.len() - 1);
        if index >= self.tuning.len() {
            return false;
        }
        self.tuning.remove(index);
        for chord in &mut self.chords {
            chord.notes.remove_string(index);
        }
        true
    }

    /// Replace the tuning outright; chord notes no longer line up, so they go
    pub(crate) fn reset_tuning(&mut self, tuning: &[Midi]) {
        self.tuning = tuning.to_vec();
        for chord in &mut self.chords {
            chord.notes = Default::default();
        }
    }
}

impl Default for ChordStore {
    fn default() -> Self {
        Self::new(DEFAULT_TUNING.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChordNote;

    fn chord_note(note: Midi) -> ChordNote {
        ChordNote { note, finger: None }
    }

    #[test]
    fn test_chord_list_edits() {
        let mut store = ChordStore::default();
        store.chords[0].title = "A".to_string();
        store.add_chord();
        store.chords[1].title = "B".to_string();
        store.add_chord();
        store.chords[2].title = "C".to_string();

        store.move_chord(0, 2);
        let titles: Vec<&str> = store.chords.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);

        store.delete_chord(1);
        assert_eq!(store.chords.len(), 2);
        assert!(store.delete_chord(5).is_none());
    }

    #[test]
    fn test_strings_renumber_chord_notes() {
        let mut store = ChordStore::default();
        store.chords[0].notes.insert(0, chord_note(64));
        store.chords[0].notes.insert(3, chord_note(52));

        store.insert_string(Some(0));
        assert_eq!(store.tuning.len(), 7);
        assert_eq!(store.chords[0].notes.get(1), Some(&chord_note(64)));

        store.remove_string(Some(1));
        assert_eq!(store.chords[0].notes.len(), 1);
        assert_eq!(store.chords[0].notes.get(3), Some(&chord_note(52)));
    }
}
