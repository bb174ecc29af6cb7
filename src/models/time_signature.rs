//! Time signatures

use super::position::Position;
use super::spacing::Spacing;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Beats per bar and the length of one beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSignature {
    pub beats_per_bar: u32,
    /// Length of one beat, 1 = quarter note
    #[serde(alias = "beatSize")]
    pub beat_unit: Position,
}

impl TimeSignature {
    pub fn new(beats_per_bar: u32, beat_unit: Spacing) -> Self {
        Self {
            beats_per_bar,
            beat_unit: beat_unit.beats(),
        }
    }

    /// Length of a bar in this signature
    pub fn bar_size(&self) -> Position {
        self.beat_unit * self.beats_per_bar as i32
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, Spacing::Quarter)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // beat unit 1 is a quarter note, so the lower number is 4 / unit
        let lower = Position::beats(4).as_f64() / self.beat_unit.as_f64();
        write!(f, "{}/{}", self.beats_per_bar, lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_size() {
        assert_eq!(TimeSignature::default().bar_size(), Position::beats(4));
        assert_eq!(TimeSignature::new(3, Spacing::Quarter).bar_size(), Position::beats(3));
        assert_eq!(TimeSignature::new(6, Spacing::Eighth).bar_size(), Position::beats(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeSignature::default().to_string(), "4/4");
        assert_eq!(TimeSignature::new(6, Spacing::Eighth).to_string(), "6/8");
    }

    #[test]
    fn test_legacy_beat_size_field() {
        let sig: TimeSignature = serde_json::from_str(r#"{"beatsPerBar":3,"beatSize":1}"#).unwrap();
        assert_eq!(sig, TimeSignature::new(3, Spacing::Quarter));
        assert_eq!(
            serde_json::to_string(&sig).unwrap(),
            r#"{"beatsPerBar":3,"beatUnit":1}"#
        );
    }
}
