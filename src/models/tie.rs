//! Tie and bend relations between two positions on one string

use super::position::Position;
use super::theory::Midi;
use serde::{Deserialize, Serialize};

/// Articulation connecting two notes on a string
///
/// `Hammer` means hammer-on going up, pull-off going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieKind {
    Plain,
    Hammer,
    Tap,
    Slide,
    TieSlide,
}

/// Whether a bend with a release point returns to the `to` note or holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Hold,
    Connect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieData {
    pub kind: TieKind,
    pub to: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BendData {
    /// Bend amount in whole steps
    pub amount: f32,
    /// Release points, as offsets from the bend's origin
    pub through: Option<Vec<Position>>,
    /// Ignored when there is no release point
    pub release_type: ReleaseType,
    pub to: Position,
}

/// The relation anchored at one (string, position)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTieSlot", into = "RawTieSlot")]
pub enum TieSlot {
    Tie(TieData),
    Bend(BendData),
}

impl TieSlot {
    pub fn to(&self) -> Position {
        match self {
            TieSlot::Tie(t) => t.to,
            TieSlot::Bend(b) => b.to,
        }
    }

    pub fn is_bend(&self) -> bool {
        matches!(self, TieSlot::Bend(_))
    }

    /// Copy of this relation whose target moved by `by`; release offsets
    /// are relative to the origin and stay as they are
    pub fn shifted(&self, by: Position) -> TieSlot {
        match self {
            TieSlot::Tie(t) => TieSlot::Tie(TieData { kind: t.kind, to: t.to + by }),
            TieSlot::Bend(b) => TieSlot::Bend(BendData { to: b.to + by, ..b.clone() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum SlotType {
    Plain,
    Hammer,
    Tap,
    Slide,
    TieSlide,
    Bend,
}

/// Flat wire form: `{"type": "hammer", "to": 4}` or
/// `{"type": "bend", "bend": 1, "releaseType": "connect", "to": 4}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTieSlot {
    #[serde(rename = "type")]
    slot_type: SlotType,
    to: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bend: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    through: Option<Vec<Position>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    release_type: Option<ReleaseType>,
}

impl From<RawTieSlot> for TieSlot {
    fn from(raw: RawTieSlot) -> Self {
        let kind = match raw.slot_type {
            SlotType::Plain => TieKind::Plain,
            SlotType::Hammer => TieKind::Hammer,
            SlotType::Tap => TieKind::Tap,
            SlotType::Slide => TieKind::Slide,
            SlotType::TieSlide => TieKind::TieSlide,
            SlotType::Bend => {
                return TieSlot::Bend(BendData {
                    amount: raw.bend.unwrap_or(1.0),
                    through: raw.through,
                    release_type: raw.release_type.unwrap_or(ReleaseType::Connect),
                    to: raw.to,
                })
            }
        };
        TieSlot::Tie(TieData { kind, to: raw.to })
    }
}

impl From<TieSlot> for RawTieSlot {
    fn from(slot: TieSlot) -> Self {
        match slot {
            TieSlot::Tie(t) => RawTieSlot {
                slot_type: match t.kind {
                    TieKind::Plain => SlotType::Plain,
                    TieKind::Hammer => SlotType::Hammer,
                    TieKind::Tap => SlotType::Tap,
                    TieKind::Slide => SlotType::Slide,
                    TieKind::TieSlide => SlotType::TieSlide,
                },
                to: t.to,
                bend: None,
                through: None,
                release_type: None,
            },
            TieSlot::Bend(b) => RawTieSlot {
                slot_type: SlotType::Bend,
                to: b.to,
                bend: Some(b.amount),
                through: b.through,
                release_type: Some(b.release_type),
            },
        }
    }
}

/// Tie joined with its anchor and the pitches at both ends, for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tie {
    pub string: usize,
    pub from: Position,
    #[serde(rename = "type")]
    pub kind: TieKind,
    pub to: Position,
    /// `None` when the note is muted or missing
    #[serde(default)]
    pub midi_from: Option<Midi>,
    #[serde(default)]
    pub midi_to: Option<Midi>,
}

impl Tie {
    pub fn data(&self) -> TieData {
        TieData { kind: self.kind, to: self.to }
    }
}

/// Bend joined with its anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bend {
    pub string: usize,
    pub from: Position,
    #[serde(rename = "bend")]
    pub amount: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<Vec<Position>>,
    pub release_type: ReleaseType,
    pub to: Position,
}

impl Bend {
    pub fn data(&self) -> BendData {
        BendData {
            amount: self.amount,
            through: self.through.clone(),
            release_type: self.release_type,
            to: self.to,
        }
    }

    /// First release point as an absolute position
    pub fn release_point(&self) -> Option<Position> {
        self.through
            .as_ref()
            .and_then(|t| t.first())
            .map(|offset| self.from + *offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_wire_format() {
        let slot = TieSlot::Tie(TieData { kind: TieKind::TieSlide, to: Position::beats(4) });
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, r#"{"type":"tie-slide","to":4}"#);
        let parsed: TieSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, slot);
    }

    #[test]
    fn test_bend_wire_format() {
        let json = r#"{"type":"bend","to":2.5,"bend":0.5,"through":[1],"releaseType":"hold"}"#;
        let parsed: TieSlot = serde_json::from_str(json).unwrap();
        match &parsed {
            TieSlot::Bend(b) => {
                assert_eq!(b.amount, 0.5);
                assert_eq!(b.through, Some(vec![Position::beats(1)]));
                assert_eq!(b.release_type, ReleaseType::Hold);
                assert_eq!(b.to, Position::new(5, 2));
            }
            _ => panic!("expected a bend"),
        }
        assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
    }

    #[test]
    fn test_shifted_keeps_release_offsets() {
        let slot = TieSlot::Bend(BendData {
            amount: 1.0,
            through: Some(vec![Position::beats(1)]),
            release_type: ReleaseType::Connect,
            to: Position::beats(3),
        });
        match slot.shifted(Position::beats(4)) {
            TieSlot::Bend(b) => {
                assert_eq!(b.to, Position::beats(7));
                assert_eq!(b.through, Some(vec![Position::beats(1)]));
            }
            _ => panic!("expected a bend"),
        }
    }
}
