//! Insert, delete and reorder whole bars

use crate::error::{EditorError, Result};
use crate::models::{Position, TimeSignature};
use crate::store::{GuitarStack, TabStore, TimeSignatureTimeline};
use serde::{Deserialize, Serialize};

/// A derived bar: `[start, end)` under one time signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub start: Position,
    pub end: Position,
    pub time_signature: TimeSignature,
}

impl Bar {
    pub fn size(&self) -> Position {
        self.end - self.start
    }

    pub fn contains(&self, position: Position) -> bool {
        position >= self.start && position < self.end
    }
}

/// Bar-level editing over a `TabStore`
///
/// The only state kept here is the new-bar watermark, which lets the
/// document grow one empty bar at a time past its last note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarManager {
    new_bar_start: Position,
}

impl BarManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_bar_start(&self) -> Position {
        self.new_bar_start
    }

    /// Every bar up to the last note or the watermark, whichever is later
    pub fn bars(&self, tab: &TabStore) -> Result<Vec<Bar>> {
        let limit = self.new_bar_start.max(tab.guitar.last_position());
        let mut bars = Vec::new();
        let mut start = Position::ZERO;
        while start <= limit {
            let bar = bar_at(&tab.timeline, start)?;
            start = bar.end;
            bars.push(bar);
        }
        Ok(bars)
    }

    /// Padded grid columns of one bar
    pub fn bar_stacks(&self, tab: &TabStore, bar: &Bar, subunit: Position) -> Vec<GuitarStack> {
        tab.guitar.stacks_in(bar.start, bar.end, subunit)
    }

    /// Index of the bar containing `position`
    ///
    /// Positions past the last derived bar are counted as if the piece
    /// carried on in its last signature.
    pub fn get_bar_index_at(&self, tab: &TabStore, position: Position) -> Result<usize> {
        if position.is_negative() {
            return Err(EditorError::InvariantViolation(format!(
                "no bar at negative position {}",
                position
            )));
        }
        let mut index = 0;
        let mut start = Position::ZERO;
        loop {
            let bar = bar_at(&tab.timeline, start)?;
            if bar.contains(position) {
                return Ok(index);
            }
            start = bar.end;
            index += 1;
        }
    }

    /// Move the watermark past the last bar, adding one empty bar
    pub fn new_bar_click(&mut self, tab: &TabStore) -> Result<()> {
        if let Some(last) = self.bars(tab)?.last() {
            self.new_bar_start = last.end;
            log::debug!("new_bar_click: watermark at {}", self.new_bar_start);
        }
        Ok(())
    }

    /// Open an empty bar at `start`; returns its size
    ///
    /// The gap is sized by the signature in force just before `start`, so
    /// that a change anchored at `start` stays with the bar it introduces.
    pub fn insert_bar(&mut self, tab: &mut TabStore, start: Position) -> Result<Position> {
        check_position(start)?;
        let size = bar_size(&tab.timeline, start, true)?;
        log::debug!("insert_bar: {} beats at {}", size, start);
        self.open_gap(tab, start, size);
        Ok(size)
    }

    /// Remove the bar starting at `start` and close the gap; returns its size
    pub fn delete_bar(&mut self, tab: &mut TabStore, start: Position) -> Result<Position> {
        check_position(start)?;
        let size = bar_size(&tab.timeline, start, false)?;
        let end = start + size;
        let previous_size = if start.is_positive() {
            bar_size(&tab.timeline, start, true)?
        } else {
            Position::ZERO
        };
        log::debug!("delete_bar: [{}, {})", start, end);

        tab.guitar.delete_stacks(start, end);
        tab.guitar.ties_mut().delete_range(start, end);
        tab.annotations.delete_range(start, end);

        // a change at `start` gives way to one at `end`; without one it now
        // governs whatever moves up from `end`
        if tab.timeline.explicit_at(start).is_some() && tab.timeline.explicit_at(end).is_some() {
            tab.timeline.take_change(start);
        }
        tab.timeline.clear_between(start, end);

        tab.guitar.shift_from(start, -size);
        tab.annotations.shift_from(start, -size);
        tab.timeline.shift_time_changes(end, -size);
        dedupe_change(&mut tab.timeline, start)?;

        // an empty trailing bar that was deleted takes the watermark back
        // to the bar before it
        if self.new_bar_start >= end {
            self.new_bar_start -= size;
        } else if self.new_bar_start >= start {
            self.new_bar_start = (start - previous_size).max(Position::ZERO);
        }
        Ok(size)
    }

    /// Move the bar starting at `from_start` to `to`; returns its new start
    ///
    /// Moving forward places the bar after the bar at `to`, moving backward
    /// places it before. The bar keeps its own time signature and every
    /// other bar keeps its signature and content. Ties crossing the moved
    /// bar's edges are dropped.
    pub fn reorder_bar(&mut self, tab: &mut TabStore, from_start: Position, to: Position) -> Result<Position> {
        check_position(from_start)?;
        check_position(to)?;
        if to == from_start {
            return Ok(from_start);
        }

        let from_size = bar_size(&tab.timeline, from_start, false)?;
        let to_size = bar_size(&tab.timeline, to, false)?;
        let moving_forward = to > from_start;
        let insertion = if moving_forward { to + to_size } else { to };
        log::debug!(
            "reorder_bar: [{}, {}) to {} (insert at {})",
            from_start,
            from_start + from_size,
            to,
            insertion
        );

        let moved_sig = tab.timeline.get_time_signature_at(from_start, false)?;
        let displaced_sig = tab.timeline.get_time_signature_at(insertion, false)?;

        self.open_gap(tab, insertion, from_size);

        let after = insertion + from_size;
        if tab.timeline.get_time_signature_at(insertion, false)? != moved_sig {
            tab.timeline.insert_time_change(insertion, moved_sig)?;
            if tab.timeline.explicit_at(after).is_none() {
                tab.timeline.insert_time_change(after, displaced_sig)?;
            }
        }
        dedupe_change(&mut tab.timeline, after)?;

        let source = if moving_forward { from_start } else { from_start + from_size };
        let delta = insertion - source;
        tab.guitar.move_range(source, source + from_size, delta);
        tab.annotations.move_range(source, source + from_size, delta);

        self.delete_bar(tab, source)?;
        dedupe_change(&mut tab.timeline, source)?;

        Ok(if moving_forward { insertion - from_size } else { to })
    }

    pub fn insert_break(&self, tab: &mut TabStore, start: Position) {
        tab.line_breaks.insert(start);
    }

    pub fn join_break(&self, tab: &mut TabStore, start: Position) {
        tab.line_breaks.remove(&start);
    }

    fn open_gap(&mut self, tab: &mut TabStore, at: Position, size: Position) {
        tab.guitar.shift_from(at, size);
        tab.annotations.shift_from(at, size);
        tab.timeline.shift_time_changes(at, size);
        if self.new_bar_start >= at && self.new_bar_start > Position::ZERO {
            self.new_bar_start += size;
        }
    }
}

fn check_position(position: Position) -> Result<()> {
    if position.is_negative() {
        return Err(EditorError::InvariantViolation(format!(
            "bar edit at negative position {}",
            position
        )));
    }
    Ok(())
}

fn bar_size(timeline: &TimeSignatureTimeline, position: Position, before: bool) -> Result<Position> {
    let size = timeline.get_bar_size_at(position, before)?;
    if !size.is_positive() {
        return Err(EditorError::InvariantViolation(format!(
            "time signature at {} has an empty bar",
            position
        )));
    }
    Ok(size)
}

fn bar_at(timeline: &TimeSignatureTimeline, start: Position) -> Result<Bar> {
    let time_signature = timeline.get_time_signature_at(start, false)?;
    let size = bar_size(timeline, start, false)?;
    Ok(Bar {
        start,
        end: start + size,
        time_signature,
    })
}

/// Drop a change that repeats the signature already in force
fn dedupe_change(timeline: &mut TimeSignatureTimeline, position: Position) -> Result<()> {
    if position == Position::ZERO {
        return Ok(());
    }
    if let Some(explicit) = timeline.explicit_at(position) {
        if timeline.get_time_signature_at(position, true)? == explicit {
            timeline.delete_time_change(position);
        }
    }
    Ok(())
}
