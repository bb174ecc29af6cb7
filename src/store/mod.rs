//! Document stores
//!
//! Leaf stores (`PositionIndex`, `TieStore`, `TimeSignatureTimeline`) know
//! nothing of each other. `GuitarStore` keeps notes and ties in step and
//! `TabStore` ties the whole document together. Structural edits spanning
//! several stores live in `crate::bars`.

pub mod shift;
pub mod position_index;
pub mod tie_store;
pub mod timeline;
pub mod guitar;
pub mod chords;
pub mod annotations;
pub mod sync_tuning;
pub mod tab;

pub use position_index::PositionIndex;
pub use tie_store::TieStore;
pub use timeline::TimeSignatureTimeline;
pub use guitar::{GuitarStack, GuitarStore, MovedNote};
pub use chords::ChordStore;
pub use annotations::AnnotationStore;
pub use sync_tuning::sync_tuning;
pub use tab::{TabStore, TuningEdit, TuningView};
