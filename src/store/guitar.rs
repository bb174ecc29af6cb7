//! Guitar tab: tuning, notes and their tie relations
//!
//! `GuitarStore` is the only way notes and ties are edited together, so
//! deleting or moving a note can never leave a relation pointing at an
//! empty cell.

use super::position_index::PositionIndex;
use super::tie_store::TieStore;
use crate::error::{EditorError, Result};
use crate::models::theory::{valid_midi, Midi, DEFAULT_FRETS, DEFAULT_TUNING, MIDI_MAX};
use crate::models::{largest_spacing_divisor, GuitarNote, NotePosition, Pitch, Position, Spacing};
use serde::{Deserialize, Serialize};

/// One grid column of the tab, with a slot per string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuitarStack {
    pub position: Position,
    pub notes: Vec<Option<GuitarNote>>,
}

/// A note and the cell it would occupy after a move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovedNote {
    pub position: NotePosition,
    pub note: GuitarNote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuitarStore {
    /// Base pitch of each string, highest string first
    pub tuning: Vec<Midi>,
    #[serde(rename = "fretCount", alias = "frets", default = "default_frets")]
    pub frets: u32,
    #[serde(default)]
    stacks: PositionIndex<GuitarNote>,
    #[serde(default)]
    ties: TieStore,
}

fn default_frets() -> u32 {
    DEFAULT_FRETS
}

impl GuitarStore {
    pub fn new(tuning: Vec<Midi>, frets: u32) -> Self {
        Self {
            tuning,
            frets,
            stacks: PositionIndex::new(),
            ties: TieStore::new(),
        }
    }

    pub fn string_count(&self) -> usize {
        self.tuning.len()
    }

    pub fn notes(&self) -> &PositionIndex<GuitarNote> {
        &self.stacks
    }

    pub fn ties(&self) -> &TieStore {
        &self.ties
    }

    pub fn ties_mut(&mut self) -> &mut TieStore {
        &mut self.ties
    }

    pub fn get_note(&self, at: NotePosition) -> Option<&GuitarNote> {
        self.stacks.get_note(at.position, at.string)
    }

    /// Check that every note and relation sits on a string of the tuning
    pub fn validate(&self) -> Result<()> {
        if self.tuning.is_empty() {
            return Err(EditorError::InvariantViolation("tuning has no strings".to_string()));
        }
        let strings = self.string_count();
        let outside = self
            .stacks
            .iter()
            .flat_map(|(_, stack)| stack.strings())
            .chain(self.ties.strings())
            .find(|string| *string >= strings);
        if let Some(string) = outside {
            return Err(EditorError::InvariantViolation(format!(
                "string {} outside tuning of {} strings",
                string, strings
            )));
        }
        Ok(())
    }

    pub fn set_note(&mut self, at: NotePosition, note: GuitarNote) -> Result<()> {
        if at.string >= self.string_count() {
            return Err(EditorError::InvariantViolation(format!(
                "string {} outside tuning of {} strings",
                at.string,
                self.string_count()
            )));
        }
        self.stacks.set_note(at.position, at.string, note)?;
        Ok(())
    }

    /// Remove a note together with any tie or bend touching it
    pub fn delete_note(&mut self, at: NotePosition) -> Option<GuitarNote> {
        let removed = self.stacks.delete_note(at.position, at.string);
        self.ties.delete_at(at.string, at.position);
        removed
    }

    /// Where the given notes would land after a move, without moving them
    ///
    /// Fretted pitches are re-expressed for the new string so the fret
    /// number stays the same. Fails with `InvalidEdit` if any note would
    /// leave the tuning, land before 0 or leave the MIDI range.
    pub fn get_moved_notes(
        &self,
        positions: &[NotePosition],
        delta_string: i32,
        delta_position: Position,
    ) -> Result<Vec<MovedNote>> {
        let mut moved = Vec::with_capacity(positions.len());
        for at in positions {
            let Some(note) = self.get_note(*at) else {
                continue;
            };

            let string = at.string as i32 + delta_string;
            if string < 0 || string >= self.string_count() as i32 {
                return Err(EditorError::InvalidEdit(format!(
                    "string {} outside tuning of {} strings",
                    string,
                    self.string_count()
                )));
            }
            let string = string as usize;

            let position = at.position + delta_position;
            if position.is_negative() {
                return Err(EditorError::InvalidEdit(format!(
                    "position {} is before the start of the piece",
                    position
                )));
            }

            let pitch = match note.note {
                Pitch::Muted => Pitch::Muted,
                Pitch::Midi(midi) => {
                    let (Some(&to), Some(&from)) = (self.tuning.get(string), self.tuning.get(at.string)) else {
                        return Err(EditorError::InvariantViolation(format!(
                            "note on string {} outside tuning of {} strings",
                            at.string,
                            self.string_count()
                        )));
                    };
                    let shifted = midi as i32 + to as i32 - from as i32;
                    if !valid_midi(shifted) {
                        return Err(EditorError::InvalidEdit(format!(
                            "pitch {} outside 0..={}",
                            shifted, MIDI_MAX
                        )));
                    }
                    Pitch::Midi(shifted as Midi)
                }
            };

            moved.push(MovedNote {
                position: NotePosition::new(string, position),
                note: GuitarNote { note: pitch },
            });
        }
        Ok(moved)
    }

    /// Move (or copy) notes; all-or-nothing
    ///
    /// Returns the new cells, or `None` when the move was refused and
    /// nothing changed.
    pub fn move_notes(
        &mut self,
        positions: &[NotePosition],
        delta_string: i32,
        delta_position: Position,
        copy: bool,
    ) -> Option<Vec<NotePosition>> {
        let moved = match self.get_moved_notes(positions, delta_string, delta_position) {
            Ok(moved) => moved,
            Err(err) => {
                log::warn!("move_notes rejected: {}", err);
                return None;
            }
        };

        if !copy {
            for at in positions {
                self.delete_note(*at);
            }
        }
        for m in &moved {
            // targets were validated above
            if let Err(err) = self.set_note(m.position, m.note) {
                log::error!("move_notes: {}", err);
            }
        }
        Some(moved.into_iter().map(|m| m.position).collect())
    }

    /// Delete every note in `[start, end)`
    pub fn delete_stacks(&mut self, start: Position, end: Position) {
        let cells: Vec<NotePosition> = self
            .stacks
            .get_stacks(start, end)
            .into_iter()
            .flat_map(|(position, stack)| {
                stack.strings().map(move |string| NotePosition::new(string, position)).collect::<Vec<_>>()
            })
            .collect();
        for at in cells {
            self.delete_note(at);
        }
    }

    /// Grid columns in `[start, end)` on a `subunit` grid
    ///
    /// Every grid point gets a column, occupied or not. Occupied positions
    /// off the grid are left out.
    pub fn stacks_in(&self, start: Position, end: Position, subunit: Position) -> Vec<GuitarStack> {
        if !subunit.is_positive() {
            return Vec::new();
        }

        let mut positions: Vec<Position> = self.stacks.get_stacks(start, end).into_iter().map(|(p, _)| p).collect();
        let mut grid = start;
        while grid < end {
            positions.push(grid);
            grid += subunit;
        }
        positions.sort();
        positions.dedup();

        positions
            .into_iter()
            .filter(|p| p.is_multiple_of(subunit))
            .map(|position| GuitarStack {
                position,
                notes: (0..self.string_count())
                    .map(|string| self.stacks.get_note(position, string).copied())
                    .collect(),
            })
            .collect()
    }

    /// Shift notes and relations at or after `position`
    pub fn shift_from(&mut self, position: Position, by: Position) {
        self.stacks.shift_from(position, by);
        self.ties.shift_from(position, by);
    }

    /// Move the notes and relations in `[start, end)` by `delta`
    pub fn move_range(&mut self, start: Position, end: Position, delta: Position) {
        self.stacks.move_range(start, end, delta);
        self.ties.move_range(start, end, delta);
    }

    pub fn last_position(&self) -> Position {
        self.stacks.last_position()
    }

    /// Finest grid needed by any note or bend point
    pub fn min_spacing(&self) -> Option<Spacing> {
        let mut finest = self.stacks.min_spacing();
        if !self.stacks.is_empty() && finest.is_none() {
            return None;
        }
        for bend in self.ties.get_bends() {
            let points = bend.release_point().into_iter().chain(std::iter::once(bend.to));
            for point in points {
                if let Some(divisor) = largest_spacing_divisor(point) {
                    finest = match finest {
                        Some(f) if f.beats() <= divisor.beats() => Some(f),
                        _ => Some(divisor),
                    };
                }
            }
        }
        finest
    }

    /// Add a string at `index` (the bottom when `None`)
    ///
    /// A new top string is tuned a fourth above the old top, a new bottom
    /// string a fourth below the old bottom, and an inner string copies the
    /// string it displaces.
    pub fn insert_string(&mut self, index: Option<usize>) {
        let len = self.tuning.len();
        let index = index.unwrap_or(len).min(len);
        let note = new_tuning_note(&self.tuning, index);
        self.tuning.insert(index, note);
        self.stacks.insert_string(index);
        self.ties.insert_string(index);
        log::debug!("insert_string: {} tuned to {}", index, note);
    }

    /// Remove string `index` (the bottom when `None`) with its notes and relations
    ///
    /// The last remaining string stays.
    pub fn remove_string(&mut self, index: Option<usize>) -> bool {
        if self.tuning.len() <= 1 {
            log::warn!("remove_string: refusing to remove the last string");
            return false;
        }
        let index = index.unwrap_or(self.tuning.len() - 1);
        if index >= self.tuning.len() {
            log::warn!("remove_string: no string {}", index);
            return false;
        }
        self.tuning.remove(index);
        self.stacks.remove_string(index);
        self.ties.remove_string(index);
        true
    }

    pub fn set_tuning_note(&mut self, string: usize, note: Midi) -> Result<()> {
        match self.tuning.get_mut(string) {
            Some(slot) => {
                *slot = note;
                Ok(())
            }
            None => Err(EditorError::InvariantViolation(format!(
                "no string {} to tune",
                string
            ))),
        }
    }
}

impl Default for GuitarStore {
    fn default() -> Self {
        Self::new(DEFAULT_TUNING.to_vec(), DEFAULT_FRETS)
    }
}

/// Tuning for a string inserted at `index`
pub(crate) fn new_tuning_note(tuning: &[Midi], index: usize) -> Midi {
    let clamp = |value: i32| value.clamp(0, MIDI_MAX) as Midi;
    match (tuning.first(), tuning.last()) {
        (None, _) | (_, None) => DEFAULT_TUNING[0],
        (_, Some(bottom)) if index >= tuning.len() => clamp(*bottom as i32 - 5),
        (Some(top), _) if index == 0 => clamp(*top as i32 + 5),
        _ => tuning[index],
    }
}
