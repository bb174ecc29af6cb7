//! Pointer gestures over the tab
//!
//! Each gesture follows start → drag → end. Dragging only updates a
//! preview held by the gesture state; the store is touched once, on end,
//! through the same commands as any other edit.

pub mod selection;
pub mod copy;
pub mod tie_add;
pub mod bend_edit;
pub mod annotation_add;

pub use selection::{MoveOffset, RegionBounds, SelectionAction, SelectionState};
pub use copy::CopyState;
pub use tie_add::{TieAddMode, TieAddState};
pub use bend_edit::{BendEditState, BendHandle};
pub use annotation_add::{AnnotationAddState, NewAnnotation};
