//! Drawing a new annotation on an annotation row

use crate::models::{Annotation, Position};
use crate::store::AnnotationStore;
use serde::{Deserialize, Serialize};

/// Span being drawn, clipped against annotations already on the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnnotation {
    pub row: usize,
    pub start: Position,
    pub end: Position,
}

const PLACEHOLDER_TEXT: &str = "...";

#[derive(Debug, Clone, Default)]
pub struct AnnotationAddState {
    raw: Option<NewAnnotation>,
}

impl AnnotationAddState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> bool {
        self.raw.is_some()
    }

    pub fn drag_start(&mut self, row: usize, position: Position) {
        self.raw = Some(NewAnnotation {
            row,
            start: position,
            end: position,
        });
    }

    pub fn drag_move(&mut self, position: Position) {
        if let Some(raw) = &mut self.raw {
            raw.end = position;
        }
    }

    /// The span as it would be created, start before end
    ///
    /// `subunit_at` gives the grid step at a position; a span is stopped
    /// one step short of the annotation it runs into.
    pub fn new_annotation(
        &self,
        store: &AnnotationStore,
        subunit_at: impl Fn(Position) -> Position,
    ) -> Option<NewAnnotation> {
        let NewAnnotation { row, start, end } = self.raw?;
        let existing = store.get_annotations(row);
        if end >= start {
            let blocking = existing.iter().find(|a| a.start > start && a.end < end);
            Some(NewAnnotation {
                row,
                start,
                end: blocking.map_or(end, |a| a.start - subunit_at(start)),
            })
        } else {
            let blocking = existing.iter().find(|a| a.start < start && a.end >= end);
            Some(NewAnnotation {
                row,
                start: blocking.map_or(end, |a| a.end + subunit_at(end)),
                end: start,
            })
        }
    }

    /// Create the annotation with placeholder text
    pub fn drag_end(
        &mut self,
        store: &mut AnnotationStore,
        subunit_at: impl Fn(Position) -> Position,
    ) -> Option<NewAnnotation> {
        let created = self.new_annotation(store, subunit_at)?;
        store.create_annotation(
            created.row,
            Annotation::new(created.start, created.end, PLACEHOLDER_TEXT),
        );
        self.raw = None;
        Some(created)
    }
}
