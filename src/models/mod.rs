//! Models module for the tab editor
//!
//! Plain data types shared by the stores: exact positions, notes, tie
//! relations, time signatures and annotations, plus the serde helpers for
//! the persisted layout.

pub mod position;
pub mod spacing;
pub mod theory;
pub mod note;
pub mod tie;
pub mod time_signature;
pub mod annotation;
pub mod serde_helpers;

// Re-export commonly used types
pub use position::Position;
pub use spacing::{largest_spacing_divisor, Spacing};
pub use theory::{Midi, DEFAULT_FRETS, DEFAULT_TUNING};
pub use note::{ChordNote, GuitarNote, NotePosition, NoteStack, Pitch};
pub use tie::{Bend, BendData, ReleaseType, Tie, TieData, TieKind, TieSlot};
pub use time_signature::TimeSignature;
pub use annotation::{Annotation, Chord};
