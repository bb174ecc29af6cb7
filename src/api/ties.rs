//! Ties and bends

use super::helpers::{deserialize, editor_error, note_position, position, serialize, with_session};
use crate::models::{Bend, Tie, TieSlot};
use crate::wasm_log;
use wasm_bindgen::prelude::*;

/// Anchor a relation at (string, from)
///
/// `slot_js` is `{type: "hammer", to}` or
/// `{type: "bend", bend, through?, releaseType?, to}`.
#[wasm_bindgen(js_name = setTie)]
pub fn set_tie(string: usize, from_js: JsValue, slot_js: JsValue) -> Result<(), JsValue> {
    let from = position(from_js, "setTie: invalid position")?;
    let slot: TieSlot = deserialize(slot_js, "setTie: invalid tie")?;
    with_session("setTie", |session| {
        wasm_log!("setTie: string {} at {} -> {}", string, from, slot.to());
        session.set_tie(string, from, slot).map_err(editor_error("setTie"))
    })
}

#[wasm_bindgen(js_name = updateTie)]
pub fn update_tie(tie_js: JsValue) -> Result<(), JsValue> {
    let tie: Tie = deserialize(tie_js, "updateTie: invalid tie")?;
    with_session("updateTie", |session| {
        session.update_tie(&tie).map_err(editor_error("updateTie"))
    })
}

#[wasm_bindgen(js_name = updateBend)]
pub fn update_bend(bend_js: JsValue) -> Result<(), JsValue> {
    let bend: Bend = deserialize(bend_js, "updateBend: invalid bend")?;
    with_session("updateBend", |session| {
        session.update_bend(&bend).map_err(editor_error("updateBend"))
    })
}

#[wasm_bindgen(js_name = deleteTie)]
pub fn delete_tie(string: usize, from_js: JsValue) -> Result<bool, JsValue> {
    let from = position(from_js, "deleteTie: invalid position")?;
    with_session("deleteTie", |session| Ok(session.delete_tie(string, from).is_some()))
}

/// All ties with the pitches at both ends
#[wasm_bindgen(js_name = getTies)]
pub fn get_ties() -> Result<JsValue, JsValue> {
    with_session("getTies", |session| {
        serialize(&session.get_ties(), "Failed to serialize ties")
    })
}

#[wasm_bindgen(js_name = getBends)]
pub fn get_bends() -> Result<JsValue, JsValue> {
    with_session("getBends", |session| {
        serialize(&session.get_bends(), "Failed to serialize bends")
    })
}

#[wasm_bindgen(js_name = getStartsAt)]
pub fn get_starts_at(string: usize, position_js: JsValue) -> Result<JsValue, JsValue> {
    let at = note_position(string, position_js, "getStartsAt: invalid position")?;
    with_session("getStartsAt", |session| match session.get_starts_at(at) {
        Some(slot) => serialize(&slot, "Failed to serialize tie"),
        None => Ok(JsValue::UNDEFINED),
    })
}

#[wasm_bindgen(js_name = hasBend)]
pub fn has_bend(string: usize, position_js: JsValue) -> Result<bool, JsValue> {
    let at = note_position(string, position_js, "hasBend: invalid position")?;
    with_session("hasBend", |session| Ok(session.has_bend(at)))
}

#[wasm_bindgen(js_name = hasTieBothSides)]
pub fn has_tie_both_sides(string: usize, position_js: JsValue) -> Result<bool, JsValue> {
    let at = note_position(string, position_js, "hasTieBothSides: invalid position")?;
    with_session("hasTieBothSides", |session| Ok(session.has_tie_both_sides(at)))
}

#[wasm_bindgen(js_name = hasBendsWithin)]
pub fn has_bends_within(start_js: JsValue, end_js: JsValue) -> Result<bool, JsValue> {
    let start = position(start_js, "hasBendsWithin: invalid start")?;
    let end = position(end_js, "hasBendsWithin: invalid end")?;
    with_session("hasBendsWithin", |session| Ok(session.has_bends_within(start, end)))
}
