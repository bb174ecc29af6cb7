//! Editing session: the document plus everything the UI is in the middle of
//!
//! `EditorSession` is the single owner of editor state and the only path
//! through which it changes. The WASM layer holds one session and forwards
//! to it; everything here is plain Rust.

use crate::bars::{Bar, BarManager};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::interaction::{
    AnnotationAddState, BendEditState, BendHandle, CopyState, MoveOffset, NewAnnotation,
    RegionBounds, SelectionAction, SelectionState, TieAddMode, TieAddState,
};
use crate::models::{
    Annotation, Bend, Chord, GuitarNote, Midi, NotePosition, Position, Spacing, Tie, TieSlot, TimeSignature,
};
use crate::store::{GuitarStack, MovedNote, TabStore, TimeSignatureTimeline, TuningEdit, TuningView};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A bar with its padded grid columns, as the layout layer wants it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarView {
    pub start: Position,
    pub end: Position,
    pub time_signature: TimeSignature,
    pub stacks: Vec<GuitarStack>,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    tab: TabStore,
    bars: BarManager,
    config: EditorConfig,
    selection: SelectionState,
    copy: CopyState,
    tie_add: TieAddState,
    bend_edit: BendEditState,
    annotation_add: AnnotationAddState,
}

/// Grid step at `position`: one beat unit split into `subdivisions`
fn subunit_for(timeline: &TimeSignatureTimeline, subdivisions: u32, position: Position) -> Result<Position> {
    let sig = timeline.get_time_signature_at(position, false)?;
    Ok(sig.beat_unit / subdivisions as i32)
}

impl EditorSession {
    /// Session over a fresh document
    pub fn new(config: EditorConfig) -> Self {
        let mut tab = TabStore::new();
        tab.create_guitar_tab(None, Some(config.default_frets));
        Self::with_tab(tab, config)
    }

    pub fn with_tab(tab: TabStore, config: EditorConfig) -> Self {
        Self {
            tab,
            bars: BarManager::new(),
            config,
            selection: SelectionState::new(),
            copy: CopyState::new(),
            tie_add: TieAddState::new(),
            bend_edit: BendEditState::new(),
            annotation_add: AnnotationAddState::new(),
        }
    }

    /// Session over a persisted document
    pub fn load(json: &str, config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let tab = TabStore::hydrate(json)?;
        log::info!("Loaded tab '{}'", tab.title);
        Ok(Self::with_tab(tab, config))
    }

    pub fn serialize(&self) -> Result<String> {
        self.tab.serialize()
    }

    pub fn configure(&mut self, config: EditorConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tab(&self) -> &TabStore {
        &self.tab
    }

    /// Replace the guitar part with an empty one; `None` keeps the defaults
    pub fn create_guitar_tab(&mut self, tuning: Option<Vec<Midi>>, frets: Option<u32>) {
        let frets = frets.unwrap_or(self.config.default_frets);
        let guitar = self.tab.create_guitar_tab(tuning, Some(frets));
        log::info!("New guitar tab: {} strings, {} frets", guitar.string_count(), guitar.frets);
        self.selection.clear_selections();
    }

    // ------------------------------------------------------------------
    // Grid
    // ------------------------------------------------------------------

    pub fn subunit_at(&self, position: Position) -> Result<Position> {
        subunit_for(&self.tab.timeline, self.config.subdivisions, position)
    }

    /// The grid cell before `position`, using the grid of the bar that
    /// ends there when `position` starts a bar with a new signature
    pub fn previous_position(&self, position: Position) -> Result<Position> {
        let sig = self.tab.timeline.get_time_signature_at(position, true)?;
        Ok(position - sig.beat_unit / self.config.subdivisions as i32)
    }

    fn fallback_subunit(&self) -> Position {
        Position::new(1, self.config.subdivisions as i32)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get_note(&self, at: NotePosition) -> Option<GuitarNote> {
        self.tab.guitar.get_note(at).copied()
    }

    /// Padded grid columns in `[start, end)`
    pub fn get_stacks(&self, start: Position, end: Position) -> Result<Vec<GuitarStack>> {
        let subunit = self.subunit_at(start)?;
        Ok(self.tab.guitar.stacks_in(start, end, subunit))
    }

    pub fn bars(&self) -> Result<Vec<Bar>> {
        self.bars.bars(&self.tab)
    }

    pub fn bar_views(&self) -> Result<Vec<BarView>> {
        self.bars
            .bars(&self.tab)?
            .into_iter()
            .map(|bar| {
                let subunit = self.subunit_at(bar.start)?;
                Ok(BarView {
                    start: bar.start,
                    end: bar.end,
                    time_signature: bar.time_signature,
                    stacks: self.bars.bar_stacks(&self.tab, &bar, subunit),
                })
            })
            .collect()
    }

    pub fn get_bar_index_at(&self, position: Position) -> Result<usize> {
        self.bars.get_bar_index_at(&self.tab, position)
    }

    pub fn get_ties(&self) -> Vec<Tie> {
        self.tab.guitar.ties().get_ties(self.tab.guitar.notes())
    }

    pub fn get_bends(&self) -> Vec<Bend> {
        self.tab.guitar.ties().get_bends()
    }

    pub fn get_starts_at(&self, at: NotePosition) -> Option<TieSlot> {
        self.tab.guitar.ties().get_starts_at(at).cloned()
    }

    pub fn has_bend(&self, at: NotePosition) -> bool {
        self.tab.guitar.ties().has_bend(at)
    }

    pub fn has_tie_both_sides(&self, at: NotePosition) -> bool {
        self.tab.guitar.ties().has_tie_both_sides(at)
    }

    pub fn has_bends_within(&self, start: Position, end: Position) -> bool {
        self.tie_add.has_bends_within(&self.tab.guitar, start, end)
    }

    pub fn get_time_signature_at(&self, position: Position, before: bool) -> Result<TimeSignature> {
        self.tab.timeline.get_time_signature_at(position, before)
    }

    pub fn get_last_position(&self) -> Position {
        self.tab.guitar.last_position()
    }

    pub fn min_spacing(&self) -> Option<Spacing> {
        self.tab.guitar.min_spacing()
    }

    // ------------------------------------------------------------------
    // Note commands
    // ------------------------------------------------------------------

    pub fn set_note(&mut self, at: NotePosition, note: GuitarNote) -> Result<()> {
        log::debug!("set_note: string {} at {}", at.string, at.position);
        self.tab.guitar.set_note(at, note)
    }

    pub fn delete_note(&mut self, at: NotePosition) -> Option<GuitarNote> {
        log::debug!("delete_note: string {} at {}", at.string, at.position);
        self.tab.guitar.delete_note(at)
    }

    /// Move notes; `None` when the move was refused and nothing changed
    pub fn move_notes(
        &mut self,
        positions: &[NotePosition],
        delta_string: i32,
        delta_position: Position,
        copy: bool,
    ) -> Option<Vec<NotePosition>> {
        log::debug!(
            "move_notes: {} notes by {} strings, {} beats{}",
            positions.len(),
            delta_string,
            delta_position,
            if copy { " (copy)" } else { "" }
        );
        self.tab.guitar.move_notes(positions, delta_string, delta_position, copy)
    }

    // ------------------------------------------------------------------
    // Bar commands
    // ------------------------------------------------------------------

    pub fn insert_bar(&mut self, start: Position) -> Result<Position> {
        self.bars.insert_bar(&mut self.tab, start)
    }

    pub fn delete_bar(&mut self, start: Position) -> Result<Position> {
        self.bars.delete_bar(&mut self.tab, start)
    }

    pub fn reorder_bar(&mut self, from_start: Position, to: Position) -> Result<Position> {
        self.bars.reorder_bar(&mut self.tab, from_start, to)
    }

    pub fn new_bar_click(&mut self) -> Result<()> {
        self.bars.new_bar_click(&self.tab)
    }

    pub fn new_bar_start(&self) -> Position {
        self.bars.new_bar_start()
    }

    pub fn insert_break(&mut self, start: Position) {
        self.bars.insert_break(&mut self.tab, start);
    }

    pub fn join_break(&mut self, start: Position) {
        self.bars.join_break(&mut self.tab, start);
    }

    // ------------------------------------------------------------------
    // Tie commands
    // ------------------------------------------------------------------

    pub fn set_tie(&mut self, string: usize, from: Position, slot: TieSlot) -> Result<()> {
        if string >= self.tab.guitar.string_count() {
            return Err(EditorError::InvariantViolation(format!(
                "tie on string {} outside tuning",
                string
            )));
        }
        self.tab.guitar.ties_mut().set_tie(string, from, slot);
        Ok(())
    }

    pub fn update_tie(&mut self, tie: &Tie) -> Result<()> {
        self.set_tie(tie.string, tie.from, TieSlot::Tie(tie.data()))
    }

    pub fn update_bend(&mut self, bend: &Bend) -> Result<()> {
        self.set_tie(bend.string, bend.from, TieSlot::Bend(bend.data()))
    }

    pub fn delete_tie(&mut self, string: usize, from: Position) -> Option<TieSlot> {
        self.tab.guitar.ties_mut().delete_tie(string, from)
    }

    // ------------------------------------------------------------------
    // Timeline, tuning, metadata
    // ------------------------------------------------------------------

    pub fn insert_time_change(&mut self, position: Position, sig: TimeSignature) -> Result<()> {
        if sig.beats_per_bar == 0 || !sig.beat_unit.is_positive() {
            return Err(EditorError::InvariantViolation(format!("empty time signature {}", sig)));
        }
        self.tab.timeline.insert_time_change(position, sig)
    }

    pub fn delete_time_change(&mut self, position: Position) -> Option<TimeSignature> {
        self.tab.timeline.delete_time_change(position)
    }

    pub fn update_tuning(&mut self, view: TuningView, edit: TuningEdit) -> Result<()> {
        self.tab.update_tuning(view, edit)
    }

    pub fn set_does_sync_tuning(&mut self, sync: bool) {
        self.tab.set_does_sync_tuning(sync);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.tab.title = title.into();
    }

    pub fn create_annotation(&mut self, row: usize, annotation: Annotation) {
        self.tab.annotations.create_annotation(row, annotation);
    }

    pub fn delete_annotation(&mut self, row: usize, annotation: &Annotation) -> bool {
        self.tab.annotations.delete_annotation(row, annotation)
    }

    pub fn create_next_row(&mut self) -> usize {
        self.tab.annotations.create_next_row()
    }

    pub fn add_chord(&mut self) {
        self.tab.chords.add_chord();
    }

    pub fn delete_chord(&mut self, index: usize) -> Option<Chord> {
        self.tab.chords.delete_chord(index)
    }

    pub fn move_chord(&mut self, from: usize, to: usize) {
        self.tab.chords.move_chord(from, to);
    }

    // ------------------------------------------------------------------
    // Selection and move gesture
    // ------------------------------------------------------------------

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn select_note(&mut self, at: NotePosition) {
        self.selection.select_note(at);
    }

    pub fn unselect_note(&mut self, at: NotePosition) {
        self.selection.unselect_note(at);
    }

    pub fn clear_selections(&mut self) {
        self.selection.clear_selections();
    }

    pub fn start_selection(&mut self, at: NotePosition) {
        self.selection.start_selection(at);
    }

    pub fn grow_selection(&mut self, at: NotePosition) -> Result<()> {
        let subunit = self.subunit_at(at.position)?;
        self.selection.grow_selection(at, subunit);
        Ok(())
    }

    pub fn end_selection(&mut self) {
        self.selection.end_selection();
    }

    pub fn delete_selected_notes(&mut self) {
        self.selection.delete_selected_notes(&mut self.tab.guitar);
    }

    pub fn regions(&self) -> Result<Vec<RegionBounds>> {
        let mut bar_of = BTreeMap::new();
        for at in self.selection.selections() {
            if let Entry::Vacant(slot) = bar_of.entry(at.position) {
                slot.insert(self.bars.get_bar_index_at(&self.tab, at.position)?);
            }
        }
        let subunit = self.fallback_subunit();
        // every selected position is in `bar_of`
        Ok(self
            .selection
            .regions(subunit, |p| bar_of.get(&p).copied().unwrap_or_default()))
    }

    pub fn set_selection_action(&mut self, action: SelectionAction) {
        self.selection.set_action(action);
    }

    pub fn start_move(&mut self, origin: NotePosition) {
        self.selection.start_move(origin, &self.tab.guitar);
    }

    pub fn move_over(&mut self, to: NotePosition) {
        self.selection.move_over(to, &self.tab.guitar);
    }

    pub fn move_offset(&self) -> MoveOffset {
        self.selection.offset()
    }

    pub fn move_preview(&self) -> Vec<MovedNote> {
        self.selection.preview(&self.tab.guitar)
    }

    pub fn end_move(&mut self, copy: bool) -> Option<Vec<NotePosition>> {
        self.selection.end_move(&mut self.tab.guitar, copy)
    }

    pub fn cancel_move(&mut self) {
        self.selection.cancel_move();
    }

    // ------------------------------------------------------------------
    // Copy and paste
    // ------------------------------------------------------------------

    pub fn copy(&mut self) {
        self.copy.copy(&self.selection);
    }

    pub fn has_copied(&self) -> bool {
        self.copy.has_copied()
    }

    pub fn paste(&mut self, target: NotePosition) -> Option<Vec<NotePosition>> {
        self.copy.paste(target, &mut self.tab.guitar)
    }

    // ------------------------------------------------------------------
    // Tie and bend drawing
    // ------------------------------------------------------------------

    pub fn start_tie_add(&mut self, string: usize, position: Position, mode: TieAddMode) -> Result<()> {
        let subunit = self.subunit_at(position)?;
        self.tie_add.start(string, position, mode, subunit);
        Ok(())
    }

    pub fn drag_tie_add(&mut self, position: Position) {
        self.tie_add.drag(position);
    }

    pub fn end_tie_add(&mut self) -> bool {
        self.tie_add.end(&mut self.tab.guitar)
    }

    pub fn cancel_tie_add(&mut self) {
        self.tie_add.cancel();
    }

    /// "left" or "right" while a tie or bend is being drawn
    pub fn tie_drag_direction(&self) -> Option<&'static str> {
        self.tie_add.drag_direction(&self.tab.guitar)
    }

    pub fn new_tie_preview(&self) -> Option<Tie> {
        self.tie_add.new_tie(&self.tab.guitar)
    }

    pub fn new_bend_preview(&self) -> Option<Bend> {
        self.tie_add.new_bend(&self.tab.guitar)
    }

    // ------------------------------------------------------------------
    // Bend reshaping
    // ------------------------------------------------------------------

    pub fn start_bend_edit(&mut self, handle: BendHandle, bend: Bend) {
        self.bend_edit.start(handle, bend);
    }

    /// Ignored while a new tie or bend is being drawn
    pub fn drag_bend_edit(&mut self, position: Position, on_string_row: bool) {
        if self.tie_add.dragging() {
            return;
        }
        self.bend_edit.drag(position, on_string_row);
    }

    pub fn bend_label_hover(&mut self) {
        self.bend_edit.label_hover();
    }

    pub fn end_bend_edit(&mut self) -> bool {
        self.bend_edit.end(self.tab.guitar.ties_mut())
    }

    pub fn cancel_bend_edit(&mut self) {
        self.bend_edit.cancel();
    }

    pub fn bend_edit_preview(&self) -> Option<Bend> {
        self.bend_edit.preview().cloned()
    }

    pub fn release_grabber_click(&mut self, bend: &Bend, grabber: Position) {
        self.bend_edit.release_grabber_click(self.tab.guitar.ties_mut(), bend, grabber);
    }

    pub fn set_bend_value(&mut self, bend: &Bend, amount: f32) {
        self.bend_edit.set_bend_value(self.tab.guitar.ties_mut(), bend, amount);
    }

    pub fn delete_bend(&mut self, bend: &Bend) {
        self.bend_edit.delete_bend(self.tab.guitar.ties_mut(), bend);
    }

    // ------------------------------------------------------------------
    // Annotation drawing
    // ------------------------------------------------------------------

    pub fn annotation_drag_start(&mut self, row: usize, position: Position) {
        self.annotation_add.drag_start(row, position);
    }

    pub fn annotation_drag_move(&mut self, position: Position) {
        self.annotation_add.drag_move(position);
    }

    pub fn new_annotation_preview(&self) -> Option<NewAnnotation> {
        let fallback = self.fallback_subunit();
        self.annotation_add.new_annotation(&self.tab.annotations, |p| {
            self.subunit_at(p).unwrap_or(fallback)
        })
    }

    pub fn annotation_drag_end(&mut self) -> Option<NewAnnotation> {
        let fallback = self.fallback_subunit();
        let timeline = &self.tab.timeline;
        let subdivisions = self.config.subdivisions;
        self.annotation_add.drag_end(&mut self.tab.annotations, |p| {
            subunit_for(timeline, subdivisions, p).unwrap_or(fallback)
        })
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TieKind;

    fn at(string: usize, beats: i32) -> NotePosition {
        NotePosition::new(string, Position::beats(beats))
    }

    #[test]
    fn test_subunit_follows_time_signature() {
        let mut session = EditorSession::default();
        session
            .insert_time_change(Position::beats(4), TimeSignature::new(6, Spacing::Eighth))
            .unwrap();
        assert_eq!(session.subunit_at(Position::ZERO).unwrap(), Position::new(1, 4));
        assert_eq!(session.subunit_at(Position::beats(4)).unwrap(), Position::new(1, 8));
        assert_eq!(session.previous_position(Position::beats(4)).unwrap(), Position::new(15, 4));
    }

    #[test]
    fn test_empty_signature_rejected() {
        let mut session = EditorSession::default();
        let sig = TimeSignature { beats_per_bar: 0, beat_unit: Position::beats(1) };
        assert!(session.insert_time_change(Position::beats(4), sig).is_err());
    }

    #[test]
    fn test_bar_views_pad_grid() {
        let mut session = EditorSession::new(EditorConfig { subdivisions: 1, default_frets: 24 });
        session.set_note(at(0, 1), GuitarNote::midi(65)).unwrap();
        let views = session.bar_views().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].stacks.len(), 4);
        assert_eq!(views[0].stacks[1].notes[0], Some(GuitarNote::midi(65)));
    }

    #[test]
    fn test_tie_commands_check_string() {
        let mut session = EditorSession::default();
        let slot = TieSlot::Tie(crate::models::TieData { kind: TieKind::Tap, to: Position::beats(1) });
        assert!(session.set_tie(9, Position::ZERO, slot.clone()).is_err());
        session.set_tie(0, Position::ZERO, slot).unwrap();
        assert_eq!(session.get_ties().len(), 1);
        assert!(session.delete_tie(0, Position::ZERO).is_some());
    }

    #[test]
    fn test_bend_drag_ignored_while_drawing_tie() {
        let mut session = EditorSession::default();
        session.set_note(at(0, 0), GuitarNote::midi(64)).unwrap();
        let bend = Bend {
            string: 0,
            from: Position::ZERO,
            amount: 1.0,
            through: None,
            release_type: crate::models::ReleaseType::Connect,
            to: Position::beats(1),
        };
        session.update_bend(&bend).unwrap();
        session.start_bend_edit(BendHandle::Upswing, bend);
        session.start_tie_add(1, Position::ZERO, TieAddMode::Tie).unwrap();
        session.drag_bend_edit(Position::beats(3), false);
        assert_eq!(session.bend_edit_preview().map(|b| b.to), Some(Position::beats(1)));
    }

    #[test]
    fn test_regions_split_by_bar() {
        let mut session = EditorSession::default();
        session.select_note(at(0, 3));
        session.select_note(at(0, 4));
        session.select_note(at(1, 4));
        let regions = session.regions().unwrap();
        assert_eq!(regions.len(), 2);

        session.select_note(NotePosition::new(0, Position::beats(-1)));
        assert!(session.regions().is_err());
    }

    #[test]
    fn test_create_guitar_tab_uses_config_frets() {
        let mut session = EditorSession::new(EditorConfig { subdivisions: 4, default_frets: 19 });
        session.select_note(at(0, 0));
        session.create_guitar_tab(Some(vec![43, 38, 33, 28]), None);
        assert_eq!(session.tab().guitar.string_count(), 4);
        assert_eq!(session.tab().guitar.frets, 19);
        assert_eq!(session.selection().selections().count(), 0);
    }

    #[test]
    fn test_annotation_gesture() {
        let mut session = EditorSession::default();
        session.annotation_drag_start(0, Position::ZERO);
        session.annotation_drag_move(Position::beats(2));
        assert!(session.new_annotation_preview().is_some());
        let created = session.annotation_drag_end().unwrap();
        assert_eq!(created.end, Position::beats(2));
        assert_eq!(session.tab().annotations.get_annotations(0).len(), 1);
    }
}
