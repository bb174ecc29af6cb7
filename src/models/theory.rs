//! Minimal pitch helpers for tablature
//!
//! Pitches are MIDI note numbers. Anything beyond naming and validating
//! them (chord detection, voicing lookup) is left to the host application.

/// MIDI note number, 0..=127
pub type Midi = u8;

pub const MIDI_MAX: i32 = 127;

/// Standard guitar tuning, highest string first: E4 B3 G3 D3 A2 E2
pub const DEFAULT_TUNING: [Midi; 6] = [64, 59, 55, 50, 45, 40];

pub const DEFAULT_FRETS: u32 = 24;

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// Check that a value is a valid MIDI note number
pub fn valid_midi(value: i32) -> bool {
    (0..=MIDI_MAX).contains(&value)
}

/// Pitch class of a MIDI note (C = 0)
pub fn chroma(midi: Midi) -> u8 {
    midi % 12
}

/// Scientific pitch name, e.g. 64 → "E4"
pub fn note_name(midi: Midi) -> String {
    let octave = midi as i32 / 12 - 1;
    format!("{}{}", PITCH_CLASSES[chroma(midi) as usize], octave)
}
