//! Tab editor WASM API
//!
//! JavaScript-facing entry points. Every export forwards to the single
//! `EditorSession` held in `helpers`.
//!
//! # Module Structure
//!
//! - `helpers`: logging macros, value conversion, session access
//! - `document`: create, load, save and configure
//! - `notes`: note queries and edits
//! - `bars`: bar layout and structural edits, time signatures, line breaks
//! - `ties`: ties and bends
//! - `gestures`: selection, move, copy/paste, tie drawing, bend editing,
//!   annotation drawing

pub mod helpers;
pub mod document;
pub mod notes;
pub mod bars;
pub mod ties;
pub mod gestures;

pub use document::*;
pub use notes::*;
pub use bars::*;
pub use ties::*;
pub use gestures::*;
