//! Time signature timeline
//!
//! Ordered map from position to the time signature that takes effect
//! there. An entry at position 0 must always exist; every command that can
//! remove it puts one back.

use super::shift;
use crate::error::{EditorError, Result};
use crate::models::serde_helpers::pairs;
use crate::models::{Position, TimeSignature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSignatureTimeline {
    #[serde(with = "pairs")]
    changes: BTreeMap<Position, TimeSignature>,
}

impl TimeSignatureTimeline {
    /// Timeline with a single signature seeded at 0
    pub fn new(initial: TimeSignature) -> Self {
        let mut changes = BTreeMap::new();
        changes.insert(Position::ZERO, initial);
        Self { changes }
    }

    /// Rebuild from persisted changes, seeding 0 with `default` if absent
    pub fn from_changes(
        changes: impl IntoIterator<Item = (Position, TimeSignature)>,
        default: TimeSignature,
    ) -> Self {
        let mut changes: BTreeMap<_, _> = changes
            .into_iter()
            .filter(|(p, _)| !p.is_negative())
            .collect();
        changes.entry(Position::ZERO).or_insert(default);
        Self { changes }
    }

    /// Signature in effect at `position`
    ///
    /// With `before`, a change exactly at `position` is ignored, so an edit
    /// at a bar boundary can see the signature of the bar before it.
    pub fn get_time_signature_at(&self, position: Position, before: bool) -> Result<TimeSignature> {
        let fallback = self
            .changes
            .get(&Position::ZERO)
            .or_else(|| self.changes.values().next())
            .copied()
            .ok_or_else(|| {
                EditorError::InvariantViolation("time signature timeline is empty".to_string())
            })?;

        let found = if before {
            self.changes.range(..position).next_back()
        } else {
            self.changes.range(..=position).next_back()
        };
        Ok(found.map(|(_, sig)| *sig).unwrap_or(fallback))
    }

    pub fn get_bar_size_at(&self, position: Position, before: bool) -> Result<Position> {
        Ok(self.get_time_signature_at(position, before)?.bar_size())
    }

    /// Relocate every change at or after `start` by `by`
    ///
    /// If the entry at 0 moved away or was dropped, the signature that was
    /// there is seeded again.
    pub fn shift_time_changes(&mut self, start: Position, by: Position) {
        let seed = self.changes.get(&Position::ZERO).copied();
        shift::shift_from(&mut self.changes, start, by);
        if let Some(seed) = seed {
            self.changes.entry(Position::ZERO).or_insert(seed);
        }
    }

    /// Insert or replace a change; at 0 this replaces the seed
    pub fn insert_time_change(&mut self, position: Position, sig: TimeSignature) -> Result<()> {
        if position.is_negative() {
            return Err(EditorError::InvariantViolation(format!(
                "time change at negative position {}",
                position
            )));
        }
        log::debug!("insert_time_change: {} at {}", sig, position);
        self.changes.insert(position, sig);
        Ok(())
    }

    /// Remove an explicit change; the seed at 0 cannot be removed
    pub fn delete_time_change(&mut self, position: Position) -> Option<TimeSignature> {
        if position == Position::ZERO {
            log::warn!("delete_time_change: refusing to remove the signature at 0");
            return None;
        }
        self.changes.remove(&position)
    }

    /// Remove a change without protecting the seed
    ///
    /// Callers must leave an entry at 0 behind before the next query.
    pub(crate) fn take_change(&mut self, position: Position) -> Option<TimeSignature> {
        self.changes.remove(&position)
    }

    /// Remove the changes strictly between `start` and `end`
    pub(crate) fn clear_between(&mut self, start: Position, end: Position) {
        let inner: Vec<Position> = self
            .changes
            .range(start..end)
            .map(|(p, _)| *p)
            .filter(|p| *p > start)
            .collect();
        for p in inner {
            self.changes.remove(&p);
        }
    }

    /// The explicit change at exactly `position`, if there is one
    pub fn explicit_at(&self, position: Position) -> Option<TimeSignature> {
        self.changes.get(&position).copied()
    }

    pub fn changes(&self) -> impl Iterator<Item = (Position, TimeSignature)> + '_ {
        self.changes.iter().map(|(p, s)| (*p, *s))
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl Default for TimeSignatureTimeline {
    fn default() -> Self {
        Self::new(TimeSignature::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Spacing;

    fn three_four() -> TimeSignature {
        TimeSignature::new(3, Spacing::Quarter)
    }

    fn p(b: i32) -> Position {
        Position::beats(b)
    }

    #[test]
    fn test_lookup_inclusive_and_before() {
        let mut timeline = TimeSignatureTimeline::default();
        timeline.insert_time_change(p(4), three_four()).unwrap();

        assert_eq!(timeline.get_time_signature_at(p(0), false).unwrap(), TimeSignature::default());
        assert_eq!(timeline.get_time_signature_at(p(4), false).unwrap(), three_four());
        assert_eq!(timeline.get_time_signature_at(p(4), true).unwrap(), TimeSignature::default());
        assert_eq!(timeline.get_time_signature_at(p(6), true).unwrap(), three_four());
        // nothing precedes 0, so the seed answers
        assert_eq!(timeline.get_time_signature_at(p(0), true).unwrap(), TimeSignature::default());
        assert_eq!(timeline.get_bar_size_at(p(5), false).unwrap(), p(3));
    }

    #[test]
    fn test_empty_timeline_is_an_invariant_violation() {
        let mut timeline = TimeSignatureTimeline::default();
        timeline.take_change(p(0));
        assert!(matches!(
            timeline.get_time_signature_at(p(0), false),
            Err(EditorError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_shift_reseeds_zero() {
        let mut timeline = TimeSignatureTimeline::new(three_four());
        timeline.shift_time_changes(p(0), p(4));
        assert_eq!(timeline.explicit_at(p(0)), Some(three_four()));
        assert_eq!(timeline.explicit_at(p(4)), Some(three_four()));
    }

    #[test]
    fn test_delete_refuses_seed() {
        let mut timeline = TimeSignatureTimeline::default();
        timeline.insert_time_change(p(8), three_four()).unwrap();
        assert_eq!(timeline.delete_time_change(p(0)), None);
        assert_eq!(timeline.delete_time_change(p(8)), Some(three_four()));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_from_changes_seeds_default() {
        let timeline = TimeSignatureTimeline::from_changes(vec![(p(4), three_four())], TimeSignature::default());
        assert_eq!(timeline.explicit_at(p(0)), Some(TimeSignature::default()));
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_clear_between() {
        let mut timeline = TimeSignatureTimeline::default();
        for b in [4, 5, 8] {
            timeline.insert_time_change(p(b), three_four()).unwrap();
        }
        timeline.clear_between(p(4), p(8));
        let positions: Vec<Position> = timeline.changes().map(|(p, _)| p).collect();
        assert_eq!(positions, vec![p(0), p(4), p(8)]);
    }
}
