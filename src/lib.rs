//! Guitar Tablature Editor WASM Module
//!
//! Position-indexed tab document with bar-level structural editing
//! (insert, delete and reorder bars under mixed time signatures), ties and
//! bends, chord diagrams, annotations and the pointer gestures that edit
//! them.

pub mod error;
pub mod models;
pub mod store;
pub mod bars;
pub mod interaction;
pub mod config;
pub mod session;
pub mod api;

// Re-export commonly used types
pub use bars::{Bar, BarManager};
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use models::*;
pub use session::{BarView, EditorSession};
pub use store::{GuitarStore, PositionIndex, TabStore, TieStore, TimeSignatureTimeline};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        crate::wasm_warn!("logger already initialized: {}", e);
    }

    log::info!("Tab editor WASM module initialized");
}
