//! Bars, time signatures and line breaks

use super::helpers::{deserialize, editor_error, position, serialize, with_session};
use crate::models::TimeSignature;
use crate::{wasm_info, wasm_log};
use wasm_bindgen::prelude::*;

/// Every bar with its padded grid columns
#[wasm_bindgen(js_name = getBars)]
pub fn get_bars() -> Result<JsValue, JsValue> {
    with_session("getBars", |session| {
        let bars = session.bar_views().map_err(editor_error("getBars"))?;
        serialize(&bars, "Failed to serialize bars")
    })
}

#[wasm_bindgen(js_name = getBarIndexAt)]
pub fn get_bar_index_at(position_js: JsValue) -> Result<usize, JsValue> {
    let at = position(position_js, "getBarIndexAt: invalid position")?;
    with_session("getBarIndexAt", |session| {
        session.get_bar_index_at(at).map_err(editor_error("getBarIndexAt"))
    })
}

/// Insert an empty bar at `start`; returns the start of the new bar
#[wasm_bindgen(js_name = insertBar)]
pub fn insert_bar(start_js: JsValue) -> Result<JsValue, JsValue> {
    let start = position(start_js, "insertBar: invalid position")?;
    with_session("insertBar", |session| {
        wasm_info!("insertBar at {}", start);
        let at = session.insert_bar(start).map_err(editor_error("insertBar"))?;
        serialize(&at, "Failed to serialize position")
    })
}

#[wasm_bindgen(js_name = deleteBar)]
pub fn delete_bar(start_js: JsValue) -> Result<(), JsValue> {
    let start = position(start_js, "deleteBar: invalid position")?;
    with_session("deleteBar", |session| {
        wasm_info!("deleteBar at {}", start);
        session.delete_bar(start).map_err(editor_error("deleteBar"))?;
        Ok(())
    })
}

/// Move the bar starting at `from` so that it lands at the bar starting
/// at `to`; returns where the moved bar starts now
#[wasm_bindgen(js_name = reorderBar)]
pub fn reorder_bar(from_js: JsValue, to_js: JsValue) -> Result<JsValue, JsValue> {
    let from = position(from_js, "reorderBar: invalid source")?;
    let to = position(to_js, "reorderBar: invalid target")?;
    with_session("reorderBar", |session| {
        wasm_info!("reorderBar {} -> {}", from, to);
        let at = session.reorder_bar(from, to).map_err(editor_error("reorderBar"))?;
        serialize(&at, "Failed to serialize position")
    })
}

/// Extend the piece by one empty bar
#[wasm_bindgen(js_name = newBarClick)]
pub fn new_bar_click() -> Result<(), JsValue> {
    with_session("newBarClick", |session| {
        session.new_bar_click().map_err(editor_error("newBarClick"))?;
        wasm_log!("newBarClick: piece now ends at {}", session.new_bar_start());
        Ok(())
    })
}

#[wasm_bindgen(js_name = insertBreak)]
pub fn insert_break(start_js: JsValue) -> Result<(), JsValue> {
    let start = position(start_js, "insertBreak: invalid position")?;
    with_session("insertBreak", |session| {
        session.insert_break(start);
        Ok(())
    })
}

#[wasm_bindgen(js_name = joinBreak)]
pub fn join_break(start_js: JsValue) -> Result<(), JsValue> {
    let start = position(start_js, "joinBreak: invalid position")?;
    with_session("joinBreak", |session| {
        session.join_break(start);
        Ok(())
    })
}

#[wasm_bindgen(js_name = getLineBreaks)]
pub fn get_line_breaks() -> Result<JsValue, JsValue> {
    with_session("getLineBreaks", |session| {
        serialize(&session.tab().line_breaks, "Failed to serialize line breaks")
    })
}

/// Signature in force at a position; with `before`, the one in force just
/// before it
#[wasm_bindgen(js_name = getTimeSignatureAt)]
pub fn get_time_signature_at(position_js: JsValue, before: bool) -> Result<JsValue, JsValue> {
    let at = position(position_js, "getTimeSignatureAt: invalid position")?;
    with_session("getTimeSignatureAt", |session| {
        let sig = session
            .get_time_signature_at(at, before)
            .map_err(editor_error("getTimeSignatureAt"))?;
        serialize(&sig, "Failed to serialize time signature")
    })
}

/// `sig_js` is `{beatsPerBar, beatUnit}`
#[wasm_bindgen(js_name = insertTimeChange)]
pub fn insert_time_change(position_js: JsValue, sig_js: JsValue) -> Result<(), JsValue> {
    let at = position(position_js, "insertTimeChange: invalid position")?;
    let sig: TimeSignature = deserialize(sig_js, "insertTimeChange: invalid time signature")?;
    with_session("insertTimeChange", |session| {
        wasm_info!("insertTimeChange {} at {}", sig, at);
        session
            .insert_time_change(at, sig)
            .map_err(editor_error("insertTimeChange"))
    })
}

#[wasm_bindgen(js_name = deleteTimeChange)]
pub fn delete_time_change(position_js: JsValue) -> Result<bool, JsValue> {
    let at = position(position_js, "deleteTimeChange: invalid position")?;
    with_session("deleteTimeChange", |session| {
        Ok(session.delete_time_change(at).is_some())
    })
}

#[wasm_bindgen(js_name = getSubunitAt)]
pub fn get_subunit_at(position_js: JsValue) -> Result<JsValue, JsValue> {
    let at = position(position_js, "getSubunitAt: invalid position")?;
    with_session("getSubunitAt", |session| {
        let subunit = session.subunit_at(at).map_err(editor_error("getSubunitAt"))?;
        serialize(&subunit, "Failed to serialize position")
    })
}

#[wasm_bindgen(js_name = getPreviousPosition)]
pub fn get_previous_position(position_js: JsValue) -> Result<JsValue, JsValue> {
    let at = position(position_js, "getPreviousPosition: invalid position")?;
    with_session("getPreviousPosition", |session| {
        let prev = session
            .previous_position(at)
            .map_err(editor_error("getPreviousPosition"))?;
        serialize(&prev, "Failed to serialize position")
    })
}
