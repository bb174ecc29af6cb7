//! Reshaping an existing bend by dragging its handles
//!
//! The bend in the store is left alone while dragging; `end` writes the
//! reshaped bend back in one step.

use crate::models::{Bend, Position, ReleaseType};
use crate::store::TieStore;
use serde::{Deserialize, Serialize};

/// Which part of the bend is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BendHandle {
    Upswing,
    Release,
}

#[derive(Debug, Clone, Default)]
pub struct BendEditState {
    handle: Option<BendHandle>,
    origin: Option<Bend>,
    preview: Option<Bend>,
}

impl BendEditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> bool {
        self.handle.is_some()
    }

    /// The reshaped bend while a drag is in progress
    pub fn preview(&self) -> Option<&Bend> {
        self.preview.as_ref()
    }

    pub fn start(&mut self, handle: BendHandle, bend: Bend) {
        self.handle = Some(handle);
        self.preview = Some(bend.clone());
        self.origin = Some(bend);
    }

    /// Follow the pointer
    ///
    /// Releasing onto a string row connects to the next note, releasing on
    /// the bend row holds.
    pub fn drag(&mut self, position: Position, on_string_row: bool) {
        let (Some(handle), Some(origin)) = (self.handle, self.origin.as_ref()) else {
            return;
        };
        self.preview = Some(match handle {
            BendHandle::Upswing => drag_upswing(origin, position),
            BendHandle::Release => drag_release(origin, position, on_string_row),
        });
    }

    /// Pointer over the bend label: dragging the release there removes it
    pub fn label_hover(&mut self) {
        if self.handle != Some(BendHandle::Release) {
            return;
        }
        if let Some(origin) = &self.origin {
            self.preview = Some(without_release(origin));
        }
    }

    /// Write the reshaped bend; returns whether anything was written
    pub fn end(&mut self, ties: &mut TieStore) -> bool {
        self.handle = None;
        self.origin = None;
        match self.preview.take() {
            Some(bend) => {
                ties.update_bend(&bend);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.handle = None;
        self.origin = None;
        self.preview = None;
    }

    /// Add a release point to a bend that has none
    pub fn release_grabber_click(&self, ties: &mut TieStore, bend: &Bend, grabber: Position) {
        if bend.through.as_ref().map_or(false, |t| !t.is_empty()) {
            return;
        }
        ties.update_bend(&Bend {
            through: Some(vec![bend.to - bend.from]),
            to: grabber,
            release_type: ReleaseType::Hold,
            ..bend.clone()
        });
    }

    pub fn set_bend_value(&self, ties: &mut TieStore, bend: &Bend, amount: f32) {
        ties.update_bend(&Bend {
            amount,
            ..bend.clone()
        });
    }

    pub fn delete_bend(&self, ties: &mut TieStore, bend: &Bend) {
        ties.delete_tie(bend.string, bend.from);
    }
}

fn drag_upswing(origin: &Bend, position: Position) -> Bend {
    let mut bend = origin.clone();
    if position < bend.from {
        return bend;
    }
    if bend.through.is_some() {
        if position >= bend.to {
            bend.through = None;
            bend.to = position;
        } else {
            bend.through = Some(vec![position - bend.from]);
        }
    } else {
        bend.to = position;
    }
    bend
}

fn drag_release(origin: &Bend, position: Position, on_string_row: bool) -> Bend {
    let release_point = origin.release_point().unwrap_or(origin.to);
    if position <= release_point {
        return without_release(origin);
    }
    Bend {
        through: Some(vec![release_point - origin.from]),
        to: position,
        release_type: if on_string_row {
            ReleaseType::Connect
        } else {
            ReleaseType::Hold
        },
        ..origin.clone()
    }
}

fn without_release(origin: &Bend) -> Bend {
    Bend {
        to: origin.release_point().unwrap_or(origin.to),
        through: None,
        ..origin.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotePosition;

    fn p(b: i32) -> Position {
        Position::beats(b)
    }

    fn bend(to: i32, through: Option<i32>) -> Bend {
        Bend {
            string: 2,
            from: p(0),
            amount: 1.0,
            through: through.map(|t| vec![p(t)]),
            release_type: ReleaseType::Connect,
            to: p(to),
        }
    }

    fn stored(ties: &TieStore) -> Bend {
        ties.get_bends().into_iter().next().expect("a stored bend")
    }

    #[test]
    fn test_drag_previews_without_writing() {
        let mut ties = TieStore::new();
        ties.update_bend(&bend(1, None));
        let mut state = BendEditState::new();
        state.start(BendHandle::Upswing, bend(1, None));
        state.drag(p(3), false);
        assert_eq!(state.preview().map(|b| b.to), Some(p(3)));
        assert_eq!(stored(&ties).to, p(1));

        assert!(state.end(&mut ties));
        assert_eq!(stored(&ties).to, p(3));
        assert!(!state.dragging());
        assert!(!state.end(&mut ties));
    }

    #[test]
    fn test_release_drag() {
        let mut state = BendEditState::new();
        state.start(BendHandle::Release, bend(1, None));
        state.drag(p(3), true);
        let preview = state.preview().cloned().unwrap();
        assert_eq!(preview.through, Some(vec![p(1)]));
        assert_eq!(preview.to, p(3));
        assert_eq!(preview.release_type, ReleaseType::Connect);

        state.drag(p(4), false);
        assert_eq!(state.preview().map(|b| b.release_type), Some(ReleaseType::Hold));

        // back past the release point: the release goes
        state.drag(p(1), false);
        assert_eq!(state.preview().map(|b| b.through.clone()), Some(None));
    }

    #[test]
    fn test_upswing_moves_release_point() {
        let mut state = BendEditState::new();
        state.start(BendHandle::Upswing, bend(4, Some(1)));
        state.drag(p(2), false);
        assert_eq!(state.preview().and_then(|b| b.release_point()), Some(p(2)));
        state.drag(p(5), false);
        assert_eq!(state.preview().map(|b| (b.to, b.through.is_none())), Some((p(5), true)));
    }

    #[test]
    fn test_label_hover_drops_release() {
        let mut state = BendEditState::new();
        state.start(BendHandle::Release, bend(4, Some(1)));
        state.label_hover();
        assert_eq!(state.preview().map(|b| (b.to, b.through.is_none())), Some((p(1), true)));
    }

    #[test]
    fn test_direct_edits() {
        let mut ties = TieStore::new();
        let original = bend(1, None);
        ties.update_bend(&original);
        let state = BendEditState::new();

        state.release_grabber_click(&mut ties, &original, p(2));
        let with_release = stored(&ties);
        assert_eq!(with_release.release_point(), Some(p(1)));
        assert_eq!(with_release.release_type, ReleaseType::Hold);

        state.set_bend_value(&mut ties, &with_release, 0.5);
        assert_eq!(stored(&ties).amount, 0.5);

        state.delete_bend(&mut ties, &with_release);
        assert!(ties.get_starts_at(NotePosition::new(2, p(0))).is_none());
    }
}
