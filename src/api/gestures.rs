//! Pointer gestures
//!
//! Each gesture follows start → drag → end. Drags only change the preview
//! returned to the page; the document changes on end.

use super::helpers::{deserialize, editor_error, note_position, position, serialize, with_session};
use crate::interaction::{BendHandle, SelectionAction, TieAddMode};
use crate::models::Bend;
use crate::{wasm_log, wasm_warn};
use wasm_bindgen::prelude::*;

// ============================================================================
// Selection
// ============================================================================

#[wasm_bindgen(js_name = selectNote)]
pub fn select_note(string: usize, position_js: JsValue) -> Result<(), JsValue> {
    let at = note_position(string, position_js, "selectNote: invalid position")?;
    with_session("selectNote", |session| {
        session.select_note(at);
        Ok(())
    })
}

#[wasm_bindgen(js_name = unselectNote)]
pub fn unselect_note(string: usize, position_js: JsValue) -> Result<(), JsValue> {
    let at = note_position(string, position_js, "unselectNote: invalid position")?;
    with_session("unselectNote", |session| {
        session.unselect_note(at);
        Ok(())
    })
}

#[wasm_bindgen(js_name = clearSelections)]
pub fn clear_selections() -> Result<(), JsValue> {
    with_session("clearSelections", |session| {
        session.clear_selections();
        Ok(())
    })
}

#[wasm_bindgen(js_name = startSelection)]
pub fn start_selection(string: usize, position_js: JsValue) -> Result<(), JsValue> {
    let at = note_position(string, position_js, "startSelection: invalid position")?;
    with_session("startSelection", |session| {
        session.start_selection(at);
        Ok(())
    })
}

#[wasm_bindgen(js_name = growSelection)]
pub fn grow_selection(string: usize, position_js: JsValue) -> Result<(), JsValue> {
    let at = note_position(string, position_js, "growSelection: invalid position")?;
    with_session("growSelection", |session| {
        session.grow_selection(at).map_err(editor_error("growSelection"))
    })
}

#[wasm_bindgen(js_name = endSelection)]
pub fn end_selection() -> Result<(), JsValue> {
    with_session("endSelection", |session| {
        session.end_selection();
        Ok(())
    })
}

/// Outline rectangles of the selection, one per bar it touches
#[wasm_bindgen(js_name = getSelectionRegions)]
pub fn get_selection_regions() -> Result<JsValue, JsValue> {
    with_session("getSelectionRegions", |session| {
        let regions = session.regions().map_err(editor_error("getSelectionRegions"))?;
        serialize(&regions, "Failed to serialize regions")
    })
}

#[wasm_bindgen(js_name = getSelections)]
pub fn get_selections() -> Result<JsValue, JsValue> {
    with_session("getSelections", |session| {
        let selected: Vec<_> = session.selection().selections().collect();
        serialize(&selected, "Failed to serialize selections")
    })
}

#[wasm_bindgen(js_name = deleteSelectedNotes)]
pub fn delete_selected_notes() -> Result<(), JsValue> {
    with_session("deleteSelectedNotes", |session| {
        session.delete_selected_notes();
        Ok(())
    })
}

// ============================================================================
// Moving the selection
// ============================================================================

/// `action_js` is one of "might-delete", "might-move", "moving", "none"
#[wasm_bindgen(js_name = setSelectionAction)]
pub fn set_selection_action(action_js: JsValue) -> Result<(), JsValue> {
    let action: SelectionAction = deserialize(action_js, "setSelectionAction: invalid action")?;
    with_session("setSelectionAction", |session| {
        session.set_selection_action(action);
        Ok(())
    })
}

#[wasm_bindgen(js_name = startMove)]
pub fn start_move(string: usize, position_js: JsValue) -> Result<(), JsValue> {
    let at = note_position(string, position_js, "startMove: invalid position")?;
    with_session("startMove", |session| {
        session.start_move(at);
        Ok(())
    })
}

/// Update the move offset; returns the preview of the moved notes
#[wasm_bindgen(js_name = moveOver)]
pub fn move_over(string: usize, position_js: JsValue) -> Result<JsValue, JsValue> {
    let at = note_position(string, position_js, "moveOver: invalid position")?;
    with_session("moveOver", |session| {
        session.move_over(at);
        serialize(&session.move_preview(), "Failed to serialize move preview")
    })
}

#[wasm_bindgen(js_name = getMoveOffset)]
pub fn get_move_offset() -> Result<JsValue, JsValue> {
    with_session("getMoveOffset", |session| {
        serialize(&session.move_offset(), "Failed to serialize move offset")
    })
}

/// Commit the move; `null` when it was refused
#[wasm_bindgen(js_name = endMove)]
pub fn end_move(copy: bool) -> Result<JsValue, JsValue> {
    with_session("endMove", |session| match session.end_move(copy) {
        Some(moved) => serialize(&moved, "Failed to serialize moved notes"),
        None => {
            wasm_warn!("endMove: refused");
            Ok(JsValue::NULL)
        }
    })
}

#[wasm_bindgen(js_name = cancelMove)]
pub fn cancel_move() -> Result<(), JsValue> {
    with_session("cancelMove", |session| {
        session.cancel_move();
        Ok(())
    })
}

// ============================================================================
// Copy and paste
// ============================================================================

#[wasm_bindgen(js_name = copySelection)]
pub fn copy_selection() -> Result<(), JsValue> {
    with_session("copySelection", |session| {
        session.copy();
        Ok(())
    })
}

#[wasm_bindgen(js_name = hasCopied)]
pub fn has_copied() -> Result<bool, JsValue> {
    with_session("hasCopied", |session| Ok(session.has_copied()))
}

/// Paste with the top-left copied note landing on (string, position)
#[wasm_bindgen(js_name = paste)]
pub fn paste(string: usize, position_js: JsValue) -> Result<JsValue, JsValue> {
    let at = note_position(string, position_js, "paste: invalid position")?;
    with_session("paste", |session| match session.paste(at) {
        Some(pasted) => serialize(&pasted, "Failed to serialize pasted notes"),
        None => Ok(JsValue::NULL),
    })
}

// ============================================================================
// Drawing ties and bends
// ============================================================================

/// `mode_js` is "tie" or "bend"
#[wasm_bindgen(js_name = startTieAdd)]
pub fn start_tie_add(string: usize, position_js: JsValue, mode_js: JsValue) -> Result<(), JsValue> {
    let at = position(position_js, "startTieAdd: invalid position")?;
    let mode: TieAddMode = deserialize(mode_js, "startTieAdd: invalid mode")?;
    with_session("startTieAdd", |session| {
        session
            .start_tie_add(string, at, mode)
            .map_err(editor_error("startTieAdd"))
    })
}

/// Returns the tie or bend being drawn
#[wasm_bindgen(js_name = dragTieAdd)]
pub fn drag_tie_add(position_js: JsValue) -> Result<JsValue, JsValue> {
    let at = position(position_js, "dragTieAdd: invalid position")?;
    with_session("dragTieAdd", |session| {
        session.drag_tie_add(at);
        if let Some(bend) = session.new_bend_preview() {
            return serialize(&bend, "Failed to serialize bend");
        }
        match session.new_tie_preview() {
            Some(tie) => serialize(&tie, "Failed to serialize tie"),
            None => Ok(JsValue::NULL),
        }
    })
}

#[wasm_bindgen(js_name = endTieAdd)]
pub fn end_tie_add() -> Result<bool, JsValue> {
    with_session("endTieAdd", |session| {
        let created = session.end_tie_add();
        wasm_log!("endTieAdd: {}", if created { "created" } else { "nothing to add" });
        Ok(created)
    })
}

#[wasm_bindgen(js_name = cancelTieAdd)]
pub fn cancel_tie_add() -> Result<(), JsValue> {
    with_session("cancelTieAdd", |session| {
        session.cancel_tie_add();
        Ok(())
    })
}

#[wasm_bindgen(js_name = getTieDragDirection)]
pub fn get_tie_drag_direction() -> Result<Option<String>, JsValue> {
    with_session("getTieDragDirection", |session| {
        Ok(session.tie_drag_direction().map(str::to_string))
    })
}

// ============================================================================
// Reshaping bends
// ============================================================================

/// `handle_js` is "upswing" or "release"
#[wasm_bindgen(js_name = startBendEdit)]
pub fn start_bend_edit(handle_js: JsValue, bend_js: JsValue) -> Result<(), JsValue> {
    let handle: BendHandle = deserialize(handle_js, "startBendEdit: invalid handle")?;
    let bend: Bend = deserialize(bend_js, "startBendEdit: invalid bend")?;
    with_session("startBendEdit", |session| {
        session.start_bend_edit(handle, bend);
        Ok(())
    })
}

/// Returns the reshaped bend as it would be committed
#[wasm_bindgen(js_name = dragBendEdit)]
pub fn drag_bend_edit(position_js: JsValue, on_string_row: bool) -> Result<JsValue, JsValue> {
    let at = position(position_js, "dragBendEdit: invalid position")?;
    with_session("dragBendEdit", |session| {
        session.drag_bend_edit(at, on_string_row);
        match session.bend_edit_preview() {
            Some(bend) => serialize(&bend, "Failed to serialize bend"),
            None => Ok(JsValue::NULL),
        }
    })
}

#[wasm_bindgen(js_name = bendLabelHover)]
pub fn bend_label_hover() -> Result<(), JsValue> {
    with_session("bendLabelHover", |session| {
        session.bend_label_hover();
        Ok(())
    })
}

#[wasm_bindgen(js_name = endBendEdit)]
pub fn end_bend_edit() -> Result<bool, JsValue> {
    with_session("endBendEdit", |session| Ok(session.end_bend_edit()))
}

#[wasm_bindgen(js_name = cancelBendEdit)]
pub fn cancel_bend_edit() -> Result<(), JsValue> {
    with_session("cancelBendEdit", |session| {
        session.cancel_bend_edit();
        Ok(())
    })
}

#[wasm_bindgen(js_name = releaseGrabberClick)]
pub fn release_grabber_click(bend_js: JsValue, grabber_js: JsValue) -> Result<(), JsValue> {
    let bend: Bend = deserialize(bend_js, "releaseGrabberClick: invalid bend")?;
    let grabber = position(grabber_js, "releaseGrabberClick: invalid position")?;
    with_session("releaseGrabberClick", |session| {
        session.release_grabber_click(&bend, grabber);
        Ok(())
    })
}

#[wasm_bindgen(js_name = setBendValue)]
pub fn set_bend_value(bend_js: JsValue, amount: f32) -> Result<(), JsValue> {
    let bend: Bend = deserialize(bend_js, "setBendValue: invalid bend")?;
    with_session("setBendValue", |session| {
        session.set_bend_value(&bend, amount);
        Ok(())
    })
}

#[wasm_bindgen(js_name = deleteBend)]
pub fn delete_bend(bend_js: JsValue) -> Result<(), JsValue> {
    let bend: Bend = deserialize(bend_js, "deleteBend: invalid bend")?;
    with_session("deleteBend", |session| {
        session.delete_bend(&bend);
        Ok(())
    })
}

// ============================================================================
// Drawing annotations
// ============================================================================

#[wasm_bindgen(js_name = annotationDragStart)]
pub fn annotation_drag_start(row: usize, position_js: JsValue) -> Result<(), JsValue> {
    let at = position(position_js, "annotationDragStart: invalid position")?;
    with_session("annotationDragStart", |session| {
        session.annotation_drag_start(row, at);
        Ok(())
    })
}

/// Returns the span being drawn
#[wasm_bindgen(js_name = annotationDragMove)]
pub fn annotation_drag_move(position_js: JsValue) -> Result<JsValue, JsValue> {
    let at = position(position_js, "annotationDragMove: invalid position")?;
    with_session("annotationDragMove", |session| {
        session.annotation_drag_move(at);
        match session.new_annotation_preview() {
            Some(span) => serialize(&span, "Failed to serialize annotation"),
            None => Ok(JsValue::NULL),
        }
    })
}

#[wasm_bindgen(js_name = annotationDragEnd)]
pub fn annotation_drag_end() -> Result<JsValue, JsValue> {
    with_session("annotationDragEnd", |session| match session.annotation_drag_end() {
        Some(created) => serialize(&created, "Failed to serialize annotation"),
        None => Ok(JsValue::NULL),
    })
}
