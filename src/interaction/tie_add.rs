//! Drawing a new tie or bend by dragging along a string

use crate::models::{Bend, NotePosition, Position, ReleaseType, Tie, TieKind};
use crate::store::GuitarStore;
use serde::{Deserialize, Serialize};

/// Kind of relation being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieAddMode {
    Tie,
    Bend,
}

const DEFAULT_TIE_KIND: TieKind = TieKind::Hammer;
const DEFAULT_BEND_AMOUNT: f32 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct TieAddState {
    mode: Option<TieAddMode>,
    string: usize,
    raw_from: Position,
    raw_to: Position,
    subunit: Position,
}

impl TieAddState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> bool {
        self.mode.is_some()
    }

    pub fn start(&mut self, string: usize, position: Position, mode: TieAddMode, subunit: Position) {
        self.mode = Some(mode);
        self.string = string;
        self.raw_from = position;
        self.raw_to = position;
        self.subunit = subunit;
    }

    pub fn drag(&mut self, position: Position) {
        if self.mode.is_some() {
            self.raw_to = position;
        }
    }

    pub fn cancel(&mut self) {
        self.mode = None;
    }

    /// Endpoints of the relation as drawn so far
    ///
    /// Bends never point left, and the end stops at the first note met on
    /// the way from the origin to the pointer.
    pub fn valid_positions(&self, guitar: &GuitarStore) -> (Position, Position) {
        let from = self.raw_from;
        let mut to = self.raw_to;
        if self.mode == Some(TieAddMode::Bend) && to < from {
            to = from;
        }

        if to != from && self.subunit.is_positive() {
            let step = if to < from { -self.subunit } else { self.subunit };
            let mut cell = from + step;
            while (step.is_positive() && cell <= to) || (step.is_negative() && cell >= to) {
                if guitar.get_note(NotePosition::new(self.string, cell)).is_some() {
                    to = cell;
                    break;
                }
                cell += step;
            }
        }
        (from, to)
    }

    /// "left" or "right" while dragging
    pub fn drag_direction(&self, guitar: &GuitarStore) -> Option<&'static str> {
        self.mode?;
        let (from, to) = self.valid_positions(guitar);
        Some(if from > to { "left" } else { "right" })
    }

    /// Preview of the tie being drawn
    pub fn new_tie(&self, guitar: &GuitarStore) -> Option<Tie> {
        if self.mode != Some(TieAddMode::Tie) {
            return None;
        }
        let (from, to) = self.valid_positions(guitar);
        let midi = |p: Position| {
            guitar
                .get_note(NotePosition::new(self.string, p))
                .and_then(|n| n.note.midi())
        };
        Some(Tie {
            string: self.string,
            from,
            kind: DEFAULT_TIE_KIND,
            to,
            midi_from: midi(from),
            midi_to: midi(to),
        })
    }

    /// Preview of the bend being drawn
    pub fn new_bend(&self, guitar: &GuitarStore) -> Option<Bend> {
        if self.mode != Some(TieAddMode::Bend) {
            return None;
        }
        let (from, to) = self.valid_positions(guitar);
        Some(Bend {
            string: self.string,
            from,
            amount: DEFAULT_BEND_AMOUNT,
            through: None,
            release_type: ReleaseType::Connect,
            to,
        })
    }

    /// Commit the drawn relation; returns whether anything was written
    pub fn end(&mut self, guitar: &mut GuitarStore) -> bool {
        let Some(mode) = self.mode else {
            return false;
        };
        let (a, b) = self.valid_positions(guitar);
        self.mode = None;
        let (from, to) = (a.min(b), a.max(b));

        match mode {
            TieAddMode::Bend => {
                guitar.ties_mut().update_bend(&Bend {
                    string: self.string,
                    from,
                    amount: DEFAULT_BEND_AMOUNT,
                    through: None,
                    release_type: ReleaseType::Connect,
                    to,
                });
                true
            }
            TieAddMode::Tie if from != to => {
                guitar.ties_mut().update_tie(&Tie {
                    string: self.string,
                    from,
                    kind: DEFAULT_TIE_KIND,
                    to,
                    midi_from: None,
                    midi_to: None,
                });
                true
            }
            TieAddMode::Tie => false,
        }
    }

    /// Any bend, stored or being drawn, with an endpoint in `[start, end]`
    pub fn has_bends_within(&self, guitar: &GuitarStore, start: Position, end: Position) -> bool {
        let within = |p: Position| p >= start && p <= end;
        let adding = self.mode == Some(TieAddMode::Bend) && {
            let (from, to) = self.valid_positions(guitar);
            within(from) || within(to)
        };
        adding || guitar.ties().has_bends_within(start, end)
    }
}
