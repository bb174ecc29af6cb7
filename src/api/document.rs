//! Document lifecycle: create, load, save, settings and metadata

use super::helpers::{deserialize, editor_error, install_session, serialize, with_session};
use crate::config::EditorConfig;
use crate::models::{Annotation, Midi};
use crate::session::EditorSession;
use crate::store::{TuningEdit, TuningView};
use crate::{wasm_info, wasm_log};
use wasm_bindgen::prelude::*;

fn config_from(config_js: JsValue) -> Result<EditorConfig, JsValue> {
    if config_js.is_undefined() || config_js.is_null() {
        return Ok(EditorConfig::default());
    }
    let config: EditorConfig = deserialize(config_js, "Invalid editor settings")?;
    config.validate().map_err(editor_error("Invalid editor settings"))?;
    Ok(config)
}

/// Start a new, empty tab
///
/// # Parameters
/// - `tuning_js`: MIDI notes, highest string first; standard tuning if omitted
/// - `frets`: fret count; taken from the settings if omitted
/// - `config_js`: editor settings object, all fields optional
#[wasm_bindgen(js_name = createTab)]
pub fn create_tab(tuning_js: JsValue, frets: Option<u32>, config_js: JsValue) -> Result<(), JsValue> {
    let config = config_from(config_js)?;
    let tuning: Option<Vec<Midi>> = if tuning_js.is_undefined() || tuning_js.is_null() {
        None
    } else {
        Some(deserialize(tuning_js, "Invalid tuning")?)
    };

    let mut session = EditorSession::new(config);
    session.create_guitar_tab(tuning, frets);
    wasm_info!(
        "createTab: {} strings, {} frets",
        session.tab().guitar.string_count(),
        session.tab().guitar.frets
    );
    install_session(session)
}

/// Load a persisted tab
#[wasm_bindgen(js_name = loadTab)]
pub fn load_tab(json: &str, config_js: JsValue) -> Result<(), JsValue> {
    let config = config_from(config_js)?;
    let session = EditorSession::load(json, config).map_err(editor_error("loadTab"))?;
    wasm_info!("loadTab: '{}'", session.tab().title);
    install_session(session)
}

/// Persisted form of the current tab
#[wasm_bindgen(js_name = serializeTab)]
pub fn serialize_tab() -> Result<String, JsValue> {
    with_session("serializeTab", |session| {
        session.serialize().map_err(editor_error("serializeTab"))
    })
}

#[wasm_bindgen(js_name = configure)]
pub fn configure(config_js: JsValue) -> Result<(), JsValue> {
    let config = config_from(config_js)?;
    with_session("configure", |session| {
        wasm_log!("configure: {} subdivisions", config.subdivisions);
        session.configure(config).map_err(editor_error("configure"))
    })
}

#[wasm_bindgen(js_name = getTitle)]
pub fn get_title() -> Result<String, JsValue> {
    with_session("getTitle", |session| Ok(session.tab().title.clone()))
}

#[wasm_bindgen(js_name = setTitle)]
pub fn set_title(title: &str) -> Result<(), JsValue> {
    with_session("setTitle", |session| {
        session.set_title(title);
        Ok(())
    })
}

/// Apply a tuning edit to the guitar or chord view
///
/// `edit_js` is `{op: "setTuningNote", string, note}` or one of
/// `{op: "addTop" | "addBottom" | "removeTop" | "removeBottom"}`.
#[wasm_bindgen(js_name = updateTuning)]
pub fn update_tuning(view_js: JsValue, edit_js: JsValue) -> Result<(), JsValue> {
    let view: TuningView = deserialize(view_js, "Invalid tuning view")?;
    let edit: TuningEdit = deserialize(edit_js, "Invalid tuning edit")?;
    with_session("updateTuning", |session| {
        wasm_log!("updateTuning: {:?} {:?}", view, edit);
        session.update_tuning(view, edit).map_err(editor_error("updateTuning"))
    })
}

#[wasm_bindgen(js_name = getTuning)]
pub fn get_tuning() -> Result<JsValue, JsValue> {
    with_session("getTuning", |session| {
        serialize(&session.tab().guitar.tuning, "Failed to serialize tuning")
    })
}

#[wasm_bindgen(js_name = setDoesSyncTuning)]
pub fn set_does_sync_tuning(sync: bool) -> Result<(), JsValue> {
    with_session("setDoesSyncTuning", |session| {
        session.set_does_sync_tuning(sync);
        Ok(())
    })
}

#[wasm_bindgen(js_name = getChords)]
pub fn get_chords() -> Result<JsValue, JsValue> {
    with_session("getChords", |session| {
        serialize(&session.tab().chords, "Failed to serialize chords")
    })
}

#[wasm_bindgen(js_name = addChord)]
pub fn add_chord() -> Result<(), JsValue> {
    with_session("addChord", |session| {
        session.add_chord();
        Ok(())
    })
}

#[wasm_bindgen(js_name = deleteChord)]
pub fn delete_chord(index: usize) -> Result<bool, JsValue> {
    with_session("deleteChord", |session| Ok(session.delete_chord(index).is_some()))
}

#[wasm_bindgen(js_name = moveChord)]
pub fn move_chord(from: usize, to: usize) -> Result<(), JsValue> {
    with_session("moveChord", |session| {
        session.move_chord(from, to);
        Ok(())
    })
}

#[wasm_bindgen(js_name = getAnnotations)]
pub fn get_annotations(row: usize) -> Result<JsValue, JsValue> {
    with_session("getAnnotations", |session| {
        serialize(
            &session.tab().annotations.get_annotations(row),
            "Failed to serialize annotations",
        )
    })
}

#[wasm_bindgen(js_name = getAnnotationRows)]
pub fn get_annotation_rows() -> Result<JsValue, JsValue> {
    with_session("getAnnotationRows", |session| {
        serialize(&session.tab().annotations.get_rows(), "Failed to serialize rows")
    })
}

#[wasm_bindgen(js_name = createAnnotation)]
pub fn create_annotation(row: usize, annotation_js: JsValue) -> Result<(), JsValue> {
    let annotation: Annotation = deserialize(annotation_js, "Invalid annotation")?;
    with_session("createAnnotation", |session| {
        session.create_annotation(row, annotation);
        Ok(())
    })
}

#[wasm_bindgen(js_name = deleteAnnotation)]
pub fn delete_annotation(row: usize, annotation_js: JsValue) -> Result<bool, JsValue> {
    let annotation: Annotation = deserialize(annotation_js, "Invalid annotation")?;
    with_session("deleteAnnotation", |session| {
        Ok(session.delete_annotation(row, &annotation))
    })
}

#[wasm_bindgen(js_name = createNextRow)]
pub fn create_next_row() -> Result<usize, JsValue> {
    with_session("createNextRow", |session| Ok(session.create_next_row()))
}
