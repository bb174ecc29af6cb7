//! Note values measured in beats

use super::position::Position;
use serde::{Deserialize, Serialize};

/// Named note values; a quarter note is one beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spacing {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    OneTwentyEighth,
}

impl Spacing {
    /// All spacings, longest first
    pub const ALL: [Spacing; 8] = [
        Spacing::Whole,
        Spacing::Half,
        Spacing::Quarter,
        Spacing::Eighth,
        Spacing::Sixteenth,
        Spacing::ThirtySecond,
        Spacing::SixtyFourth,
        Spacing::OneTwentyEighth,
    ];

    /// Length of this note value in beats
    pub fn beats(self) -> Position {
        match self {
            Spacing::Whole => Position::beats(4),
            Spacing::Half => Position::beats(2),
            Spacing::Quarter => Position::beats(1),
            Spacing::Eighth => Position::new(1, 2),
            Spacing::Sixteenth => Position::new(1, 4),
            Spacing::ThirtySecond => Position::new(1, 8),
            Spacing::SixtyFourth => Position::new(1, 16),
            Spacing::OneTwentyEighth => Position::new(1, 32),
        }
    }

    /// Look up the named spacing of a beat length, if it has one
    pub fn from_beats(beats: Position) -> Option<Spacing> {
        Self::ALL.into_iter().find(|s| s.beats() == beats)
    }
}

/// Largest note value (quarter or shorter) whose grid contains `position`
///
/// Whole and half notes are never reported.
pub fn largest_spacing_divisor(position: Position) -> Option<Spacing> {
    Spacing::ALL
        .into_iter()
        .skip(2)
        .find(|s| position.is_multiple_of(s.beats()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats() {
        assert_eq!(Spacing::Quarter.beats(), Position::beats(1));
        assert_eq!(Spacing::Sixteenth.beats(), Position::new(1, 4));
        assert_eq!(Spacing::from_beats(Position::new(1, 2)), Some(Spacing::Eighth));
        assert_eq!(Spacing::from_beats(Position::new(1, 3)), None);
    }

    #[test]
    fn test_largest_spacing_divisor() {
        assert_eq!(largest_spacing_divisor(Position::beats(3)), Some(Spacing::Quarter));
        assert_eq!(largest_spacing_divisor(Position::new(3, 2)), Some(Spacing::Eighth));
        assert_eq!(largest_spacing_divisor(Position::new(5, 4)), Some(Spacing::Sixteenth));
        assert_eq!(largest_spacing_divisor(Position::new(1, 3)), None);
    }
}
