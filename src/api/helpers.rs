//! Shared helpers for WASM API operations
//!
//! Console logging, JS value conversion and access to the running session.

use crate::error::EditorError;
use crate::models::{NotePosition, Position};
use crate::session::EditorSession;
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Mutex;
use wasm_bindgen::prelude::*;

// WASM-owned editing session (canonical source of truth)
lazy_static! {
    static ref SESSION: Mutex<Option<EditorSession>> = Mutex::new(None);
}

// ============================================================================
// Console Logging Functions
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// ============================================================================
// Logging Macros
// ============================================================================

/// Log a debug message with [WASM] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_debug(&format!($($arg)*))
    };
}

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log a warning message with [WASM] ⚠️ prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Log an error message with [WASM] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

pub fn log_debug(msg: &str) {
    log(&format!("[WASM] {}", msg));
}

pub fn log_info(msg: &str) {
    info(&format!("[WASM] {}", msg));
}

pub fn log_warn(msg: &str) {
    warn(&format!("[WASM] ⚠️ {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[WASM] ❌ {}", msg));
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        JsValue::from_str(&msg)
    })
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        JsValue::from_str(&msg)
    })
}

/// Positions arrive as a number of beats or as a `[numer, denom]` pair
pub fn position(value: JsValue, error_context: &str) -> Result<Position, JsValue> {
    deserialize(value, error_context)
}

pub fn note_position(string: usize, value: JsValue, error_context: &str) -> Result<NotePosition, JsValue> {
    Ok(NotePosition::new(string, position(value, error_context)?))
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Convert a validation error to a JsValue
pub fn validation_error(msg: impl Into<String>) -> JsValue {
    let msg = msg.into();
    log_error(&msg);
    JsValue::from_str(&msg)
}

/// Map an editor error to a JsValue, prefixed with the calling operation
pub fn editor_error(error_context: &str) -> impl FnOnce(EditorError) -> JsValue + '_ {
    move |e| validation_error(format!("{}: {}", error_context, e))
}

// ============================================================================
// Session Access
// ============================================================================

/// Run `f` against the loaded session
pub fn with_session<T>(
    error_context: &str,
    f: impl FnOnce(&mut EditorSession) -> Result<T, JsValue>,
) -> Result<T, JsValue> {
    let mut guard = SESSION
        .lock()
        .map_err(|e| validation_error(format!("{}: session lock poisoned: {}", error_context, e)))?;
    let session = guard
        .as_mut()
        .ok_or_else(|| validation_error(format!("{}: no tab loaded", error_context)))?;
    f(session)
}

/// Replace the running session
pub fn install_session(session: EditorSession) -> Result<(), JsValue> {
    let mut guard = SESSION
        .lock()
        .map_err(|e| validation_error(format!("session lock poisoned: {}", e)))?;
    *guard = Some(session);
    Ok(())
}
