//! Text annotations above the tab, grouped in rows

use crate::models::serde_helpers::pairs;
use crate::models::{Annotation, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationStore {
    #[serde(with = "pairs")]
    rows: BTreeMap<usize, Vec<Annotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_annotation(&mut self, row: usize, annotation: Annotation) {
        self.rows.entry(row).or_default().push(annotation);
    }

    /// Delete the annotation with the same span
    ///
    /// An emptied last row is dropped as well.
    pub fn delete_annotation(&mut self, row: usize, annotation: &Annotation) -> bool {
        let Some(of_row) = self.rows.get_mut(&row) else {
            return false;
        };
        let Some(index) = of_row.iter().position(|a| a.same_span(annotation)) else {
            return false;
        };
        of_row.remove(index);
        if of_row.is_empty() && row + 1 == self.rows.len() {
            self.rows.remove(&row);
        }
        true
    }

    pub fn get_annotations(&self, row: usize) -> &[Annotation] {
        self.rows.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_rows(&self) -> Vec<usize> {
        self.rows.keys().copied().collect()
    }

    pub fn create_next_row(&mut self) -> usize {
        let row = self.rows.len();
        self.rows.insert(row, Vec::new());
        row
    }

    /// Move annotations at or after `position` by `by`
    ///
    /// An annotation spanning `position` keeps its start and has its end
    /// moved; it is removed if that would put its end before its start.
    /// Shifting back removes `[position, position - by)`, so a start inside
    /// that range lands on `position`.
    pub fn shift_from(&mut self, position: Position, by: Position) {
        for annotations in self.rows.values_mut() {
            annotations.retain_mut(|a| {
                if a.start >= position {
                    a.start = (a.start + by).max(position);
                    a.end += by;
                } else if a.end >= position {
                    a.end += by;
                }
                a.start <= a.end && !a.start.is_negative()
            });
        }
    }

    /// Remove the annotations lying wholly inside `[start, end)`
    pub fn delete_range(&mut self, start: Position, end: Position) {
        for annotations in self.rows.values_mut() {
            annotations.retain(|a| !(a.start >= start && a.end < end));
        }
    }

    /// Move the annotations lying wholly inside `[start, end)` by `delta`
    pub fn move_range(&mut self, start: Position, end: Position, delta: Position) {
        for annotations in self.rows.values_mut() {
            for a in annotations.iter_mut().filter(|a| a.start >= start && a.end < end) {
                a.start += delta;
                a.end += delta;
            }
        }
    }
}
