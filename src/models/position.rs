//! Exact beat positions
//!
//! A `Position` is a rational beat offset from the start of the piece.
//! Subdivided grids (1/4, 1/16 of a beat, triplets) are represented exactly,
//! so positions can be used as map keys without float drift.

use num_rational::Rational32;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops;

/// Rational beat offset from the start of the piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(Rational32);

impl Position {
    pub const ZERO: Position = Position(Rational32::new_raw(0, 1));

    /// Create a position `numer / denom` beats from the start
    ///
    /// Panics if `denom` is zero.
    pub fn new(numer: i32, denom: i32) -> Self {
        Self(Rational32::new(numer, denom))
    }

    /// Create a whole-beat position
    pub fn beats(beats: i32) -> Self {
        Self(Rational32::from_integer(beats))
    }

    /// Rational approximation of a float, exact for any binary fraction
    /// the editor produces (halves, quarters, sixteenths...)
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Rational32::approximate_float(value).map(Self)
    }

    pub fn as_f64(&self) -> f64 {
        *self.0.numer() as f64 / *self.0.denom() as f64
    }

    pub fn numer(&self) -> i32 {
        *self.0.numer()
    }

    pub fn denom(&self) -> i32 {
        *self.0.denom()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Rational32::from_integer(0)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Rational32::from_integer(0)
    }

    /// Check whether this position lies on a grid of the given step
    pub fn is_multiple_of(&self, step: Position) -> bool {
        if step == Position::ZERO {
            return false;
        }
        (self.0 / step.0).is_integer()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl From<i32> for Position {
    fn from(beats: i32) -> Self {
        Self::beats(beats)
    }
}

impl ops::Neg for Position {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl ops::Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl ops::AddAssign for Position {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl ops::Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl ops::SubAssign for Position {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl ops::Mul<i32> for Position {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self(self.0 * rhs)
    }
}

impl ops::Div<i32> for Position {
    type Output = Self;

    fn div(self, rhs: i32) -> Self {
        Self(self.0 / rhs)
    }
}

// Positions are plain numbers in the persisted document
impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.is_integer() {
            serializer.serialize_i64(*self.0.numer() as i64)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(PositionVisitor)
    }
}

struct PositionVisitor;

impl<'de> Visitor<'de> for PositionVisitor {
    type Value = Position;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a beat offset as a number or a [numerator, denominator] pair")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i32::try_from(v)
            .map(Position::beats)
            .map_err(|_| E::custom(format!("position {} out of range", v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i32::try_from(v)
            .map(Position::beats)
            .map_err(|_| E::custom(format!("position {} out of range", v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Position::from_f64(v).ok_or_else(|| E::custom(format!("position {} is not representable", v)))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let n: i32 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let d: i32 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        if d == 0 {
            return Err(de::Error::custom("position denominator is zero"));
        }
        Ok(Position::new(n, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let quarter = Position::new(1, 4);
        assert_eq!(quarter + quarter, Position::new(1, 2));
        assert_eq!(Position::beats(1) - quarter, Position::new(3, 4));
        assert_eq!(quarter * 4, Position::beats(1));
        assert_eq!(Position::beats(1) / 4, quarter);
        assert_eq!(-quarter + quarter, Position::ZERO);
    }

    #[test]
    fn test_ordering() {
        assert!(Position::new(1, 3) < Position::new(1, 2));
        assert!(Position::beats(-1).is_negative());
        assert!(!Position::ZERO.is_positive());
    }

    #[test]
    fn test_is_multiple_of() {
        assert!(Position::new(3, 4).is_multiple_of(Position::new(1, 4)));
        assert!(!Position::new(3, 4).is_multiple_of(Position::new(1, 2)));
        assert!(!Position::beats(1).is_multiple_of(Position::ZERO));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&Position::beats(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Position::new(5, 4)).unwrap(), "1.25");
    }

    #[test]
    fn test_deserialize_forms() {
        let p: Position = serde_json::from_str("2").unwrap();
        assert_eq!(p, Position::beats(2));
        let p: Position = serde_json::from_str("0.0625").unwrap();
        assert_eq!(p, Position::new(1, 16));
        let p: Position = serde_json::from_str("[1, 3]").unwrap();
        assert_eq!(p, Position::new(1, 3));
        assert!(serde_json::from_str::<Position>("[1, 0]").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::beats(4).to_string(), "4");
        assert_eq!(Position::new(3, 8).to_string(), "3/8");
    }
}
