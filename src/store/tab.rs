//! The whole document: metadata, guitar tab, timeline, annotations, chords
//!
//! `TabStore` also owns the persisted layout. Every map is written as an
//! array of pairs and rebuilt on hydration.

use super::annotations::AnnotationStore;
use super::chords::ChordStore;
use super::guitar::GuitarStore;
use super::sync_tuning::sync_tuning;
use super::timeline::TimeSignatureTimeline;
use crate::error::Result;
use crate::models::theory::{Midi, DEFAULT_FRETS, DEFAULT_TUNING};
use crate::models::serde_helpers::pairs;
use crate::models::{Position, TimeSignature};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which tuning a tuning edit is made on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TuningView {
    Guitar,
    Chords,
}

/// A single tuning edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum TuningEdit {
    SetTuningNote { string: usize, note: Midi },
    AddTop,
    AddBottom,
    RemoveTop,
    RemoveBottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabStore {
    pub title: String,
    /// Signature used to seed the timeline when a document has none at 0
    pub time: TimeSignature,
    does_sync_tuning: bool,
    pub line_breaks: BTreeSet<Position>,
    pub timeline: TimeSignatureTimeline,
    pub guitar: GuitarStore,
    pub annotations: AnnotationStore,
    pub chords: ChordStore,
}

impl TabStore {
    pub fn new() -> Self {
        let time = TimeSignature::default();
        let mut tab = Self {
            title: default_title(),
            time,
            does_sync_tuning: true,
            line_breaks: BTreeSet::new(),
            timeline: TimeSignatureTimeline::new(time),
            guitar: GuitarStore::default(),
            annotations: AnnotationStore::new(),
            chords: ChordStore::default(),
        };
        tab.sync_if_enabled();
        tab
    }

    /// Replace the guitar tab with an empty one
    pub fn create_guitar_tab(&mut self, tuning: Option<Vec<Midi>>, frets: Option<u32>) -> &mut GuitarStore {
        let tuning = tuning
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TUNING.to_vec());
        self.guitar = GuitarStore::new(tuning, frets.unwrap_or(DEFAULT_FRETS));
        self.sync_if_enabled();
        &mut self.guitar
    }

    pub fn does_sync_tuning(&self) -> bool {
        self.does_sync_tuning
    }

    /// Turning sync on brings the chord tuning in line immediately
    pub fn set_does_sync_tuning(&mut self, sync: bool) {
        self.does_sync_tuning = sync;
        self.sync_if_enabled();
    }

    /// Apply a tuning edit to one view, mirrored to the other while synced
    pub fn update_tuning(&mut self, view: TuningView, edit: TuningEdit) -> Result<()> {
        log::debug!("update_tuning: {:?} {:?}", view, edit);
        match view {
            TuningView::Guitar => apply_to_guitar(&mut self.guitar, edit)?,
            TuningView::Chords => apply_to_chords(&mut self.chords, edit)?,
        }
        if self.does_sync_tuning {
            match view {
                TuningView::Guitar => apply_to_chords(&mut self.chords, edit)?,
                TuningView::Chords => apply_to_guitar(&mut self.guitar, edit)?,
            }
        }
        Ok(())
    }

    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&TabDataRef::from(self))?)
    }

    /// Rebuild a document from its persisted form
    pub fn hydrate(json: &str) -> Result<Self> {
        let data: TabData = serde_json::from_str(json)?;
        data.guitar_data.validate()?;
        let mut tab = Self {
            timeline: TimeSignatureTimeline::from_changes(data.time_changes, data.time),
            title: data.title,
            time: data.time,
            does_sync_tuning: data.does_sync_tuning,
            line_breaks: data.line_breaks.into_iter().collect(),
            guitar: data.guitar_data,
            annotations: data.annotations,
            chords: data.chords_data,
        };
        tab.sync_if_enabled();
        Ok(tab)
    }

    fn sync_if_enabled(&mut self) {
        if self.does_sync_tuning {
            sync_tuning(&mut self.chords, &self.guitar.tuning);
        }
    }
}

impl Default for TabStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_to_guitar(guitar: &mut GuitarStore, edit: TuningEdit) -> Result<()> {
    match edit {
        TuningEdit::SetTuningNote { string, note } => guitar.set_tuning_note(string, note)?,
        TuningEdit::AddTop => guitar.insert_string(Some(0)),
        TuningEdit::AddBottom => guitar.insert_string(None),
        TuningEdit::RemoveTop => {
            guitar.remove_string(Some(0));
        }
        TuningEdit::RemoveBottom => {
            guitar.remove_string(None);
        }
    }
    Ok(())
}

fn apply_to_chords(chords: &mut ChordStore, edit: TuningEdit) -> Result<()> {
    match edit {
        TuningEdit::SetTuningNote { string, note } => chords.set_tuning_note(string, note)?,
        TuningEdit::AddTop => chords.insert_string(Some(0)),
        TuningEdit::AddBottom => chords.insert_string(None),
        TuningEdit::RemoveTop => {
            chords.remove_string(Some(0));
        }
        TuningEdit::RemoveBottom => {
            chords.remove_string(None);
        }
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

fn default_title() -> String {
    "New Song".to_string()
}

/// Persisted document, as read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TabData {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    time: TimeSignature,
    #[serde(default = "default_true")]
    does_sync_tuning: bool,
    #[serde(default)]
    line_breaks: Vec<Position>,
    #[serde(default, with = "pairs")]
    time_changes: BTreeMap<Position, TimeSignature>,
    #[serde(default)]
    guitar_data: GuitarStore,
    #[serde(default)]
    annotations: AnnotationStore,
    #[serde(default)]
    chords_data: ChordStore,
}

/// Persisted document, as written
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TabDataRef<'a> {
    title: &'a str,
    time: &'a TimeSignature,
    does_sync_tuning: bool,
    line_breaks: &'a BTreeSet<Position>,
    time_changes: &'a TimeSignatureTimeline,
    guitar_data: &'a GuitarStore,
    annotations: &'a AnnotationStore,
    chords_data: &'a ChordStore,
}

impl<'a> From<&'a TabStore> for TabDataRef<'a> {
    fn from(tab: &'a TabStore) -> Self {
        Self {
            title: &tab.title,
            time: &tab.time,
            does_sync_tuning: tab.does_sync_tuning,
            line_breaks: &tab.line_breaks,
            time_changes: &tab.timeline,
            guitar_data: &tab.guitar,
            annotations: &tab.annotations,
            chords_data: &tab.chords,
        }
    }
}
