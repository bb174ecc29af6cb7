//! Note queries and edits

use super::helpers::{deserialize, editor_error, note_position, position, serialize, with_session};
use crate::models::{GuitarNote, NotePosition};
use crate::{wasm_log, wasm_warn};
use wasm_bindgen::prelude::*;

/// Note at (string, position), or `undefined` for a rest
#[wasm_bindgen(js_name = getNote)]
pub fn get_note(string: usize, position_js: JsValue) -> Result<JsValue, JsValue> {
    let at = note_position(string, position_js, "getNote: invalid position")?;
    with_session("getNote", |session| match session.get_note(at) {
        Some(note) => serialize(&note, "Failed to serialize note"),
        None => Ok(JsValue::UNDEFINED),
    })
}

/// Write a note; `note_js` is `{note: 64}` or `{note: "muted"}`
#[wasm_bindgen(js_name = setNote)]
pub fn set_note(string: usize, position_js: JsValue, note_js: JsValue) -> Result<(), JsValue> {
    let at = note_position(string, position_js, "setNote: invalid position")?;
    let note: GuitarNote = deserialize(note_js, "setNote: invalid note")?;
    with_session("setNote", |session| {
        session.set_note(at, note).map_err(editor_error("setNote"))
    })
}

#[wasm_bindgen(js_name = deleteNote)]
pub fn delete_note(string: usize, position_js: JsValue) -> Result<bool, JsValue> {
    let at = note_position(string, position_js, "deleteNote: invalid position")?;
    with_session("deleteNote", |session| Ok(session.delete_note(at).is_some()))
}

/// Move or copy notes
///
/// # Returns
/// New addresses of the moved notes, or `null` when the move was refused
/// (a note would leave the fretboard, the tuning or the MIDI range).
#[wasm_bindgen(js_name = moveNotes)]
pub fn move_notes(
    positions_js: JsValue,
    delta_string: i32,
    delta_position_js: JsValue,
    copy: bool,
) -> Result<JsValue, JsValue> {
    let positions: Vec<NotePosition> = deserialize(positions_js, "moveNotes: invalid positions")?;
    let delta = position(delta_position_js, "moveNotes: invalid offset")?;
    with_session("moveNotes", |session| {
        match session.move_notes(&positions, delta_string, delta, copy) {
            Some(moved) => serialize(&moved, "Failed to serialize moved notes"),
            None => {
                wasm_warn!("moveNotes: refused");
                Ok(JsValue::NULL)
            }
        }
    })
}

/// Padded grid columns in `[start, end)`
#[wasm_bindgen(js_name = getStacks)]
pub fn get_stacks(start_js: JsValue, end_js: JsValue) -> Result<JsValue, JsValue> {
    let start = position(start_js, "getStacks: invalid start")?;
    let end = position(end_js, "getStacks: invalid end")?;
    with_session("getStacks", |session| {
        let stacks = session.get_stacks(start, end).map_err(editor_error("getStacks"))?;
        wasm_log!("getStacks: {} columns in {}..{}", stacks.len(), start, end);
        serialize(&stacks, "Failed to serialize stacks")
    })
}

#[wasm_bindgen(js_name = getLastPosition)]
pub fn get_last_position() -> Result<JsValue, JsValue> {
    with_session("getLastPosition", |session| {
        serialize(&session.get_last_position(), "Failed to serialize position")
    })
}

/// Shortest note value that lands every note, tie end and release point
/// on its grid, or `null`
#[wasm_bindgen(js_name = getMinSpacing)]
pub fn get_min_spacing() -> Result<JsValue, JsValue> {
    with_session("getMinSpacing", |session| {
        serialize(&session.min_spacing(), "Failed to serialize spacing")
    })
}
