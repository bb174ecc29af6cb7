//! Text annotations above the tab, and chord diagrams

use super::note::{ChordNote, NoteStack};
use super::position::Position;
use serde::{Deserialize, Serialize};

/// Text spanning `[start, end]` on one annotation row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub start: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Annotation {
    pub fn new(start: Position, end: Position, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: Some(text.into()),
        }
    }

    /// Same span, ignoring the text
    pub fn same_span(&self, other: &Annotation) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// A named chord diagram
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Chord {
    pub title: String,
    pub notes: NoteStack<ChordNote>,
}
