//! Notes, note stacks and note addresses

use super::position::Position;
use super::serde_helpers::pairs;
use super::theory::Midi;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// What a string plays at a position: a pitch or a dead note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pitch {
    Midi(Midi),
    Muted,
}

impl Pitch {
    /// MIDI value, if the note is pitched
    pub fn midi(&self) -> Option<Midi> {
        match self {
            Pitch::Midi(m) => Some(*m),
            Pitch::Muted => None,
        }
    }
}

impl Serialize for Pitch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Pitch::Midi(m) => serializer.serialize_u8(*m),
            Pitch::Muted => serializer.serialize_str("muted"),
        }
    }
}

impl<'de> Deserialize<'de> for Pitch {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(PitchVisitor)
    }
}

struct PitchVisitor;

impl<'de> Visitor<'de> for PitchVisitor {
    type Value = Pitch;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a MIDI note number or \"muted\"")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v <= 127 {
            Ok(Pitch::Midi(v as Midi))
        } else {
            Err(E::custom(format!("MIDI note {} out of range", v)))
        }
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v < 0 {
            return Err(E::custom(format!("MIDI note {} out of range", v)));
        }
        self.visit_u64(v as u64)
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v.fract() != 0.0 || v < 0.0 {
            return Err(E::custom(format!("MIDI note {} is not an integer", v)));
        }
        self.visit_u64(v as u64)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match v {
            "muted" => Ok(Pitch::Muted),
            other => Err(E::unknown_variant(other, &["muted"])),
        }
    }
}

/// A note on the tab staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuitarNote {
    pub note: Pitch,
}

impl GuitarNote {
    pub fn midi(midi: Midi) -> Self {
        Self { note: Pitch::Midi(midi) }
    }

    pub fn muted() -> Self {
        Self { note: Pitch::Muted }
    }
}

/// A note in a chord diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordNote {
    pub note: Midi,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finger: Option<u8>,
}

/// Address of a single cell on the tab: string index and position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotePosition {
    pub string: usize,
    pub position: Position,
}

impl NotePosition {
    pub fn new(string: usize, position: Position) -> Self {
        Self { string, position }
    }
}

/// Sparse string → note map; a missing string is a rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "N: Serialize", deserialize = "N: Deserialize<'de>"))]
pub struct NoteStack<N>(#[serde(with = "pairs")] BTreeMap<usize, N>);

impl<N> NoteStack<N> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, string: usize) -> Option<&N> {
        self.0.get(&string)
    }

    pub fn insert(&mut self, string: usize, note: N) -> Option<N> {
        self.0.insert(string, note)
    }

    pub fn remove(&mut self, string: usize) -> Option<N> {
        self.0.remove(&string)
    }

    pub fn contains(&self, string: usize) -> bool {
        self.0.contains_key(&string)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &N)> {
        self.0.iter().map(|(s, n)| (*s, n))
    }

    pub fn strings(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    /// Renumber strings so that a new string can sit at `index`
    pub fn insert_string(&mut self, index: usize) {
        let moved = self.0.split_off(&index);
        self.0.extend(moved.into_iter().map(|(s, n)| (s + 1, n)));
    }

    /// Drop the note on `index` and close the gap it leaves
    pub fn remove_string(&mut self, index: usize) {
        let mut moved = self.0.split_off(&index);
        moved.remove(&index);
        self.0.extend(moved.into_iter().map(|(s, n)| (s - 1, n)));
    }
}

impl<N> Default for NoteStack<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> FromIterator<(usize, N)> for NoteStack<N> {
    fn from_iter<I: IntoIterator<Item = (usize, N)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
