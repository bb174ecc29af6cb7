//! Bar segmentation and structural bar edits
//!
//! Bars are never stored. They are derived by walking the time signature
//! timeline from 0, and every structural edit (insert, delete, reorder)
//! is applied to notes, ties, annotations and the timeline together.

pub mod bar_manager;

pub use bar_manager::{Bar, BarManager};
