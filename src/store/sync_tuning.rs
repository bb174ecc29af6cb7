//! Keeping the chord diagram tuning in line with the guitar tuning

use super::chords::ChordStore;
use crate::models::theory::Midi;

/// Longest run of equal notes shared by two tunings
///
/// Returns `(start in a, start in b, length)`; the length is 0 when the
/// tunings have no note in common.
fn longest_common_run(a: &[Midi], b: &[Midi]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let len = a[i..].iter().zip(&b[j..]).take_while(|(x, y)| x == y).count();
            if len > best.2 {
                best = (i, j, len);
            }
        }
    }
    best
}

/// Make the chord tuning match `guitar`
///
/// The longest shared run of strings is used as an anchor so that chord
/// notes on those strings survive; strings are added or removed at the top
/// and bottom around it. Without a shared run the chord tuning is replaced.
pub fn sync_tuning(chords: &mut ChordStore, guitar: &[Midi]) {
    if guitar.is_empty() {
        return;
    }
    let (chord_start, guitar_start, len) = longest_common_run(&chords.tuning, guitar);
    if len == 0 {
        log::debug!("sync_tuning: no shared strings, replacing chord tuning");
        chords.reset_tuning(guitar);
        return;
    }

    for _ in 0..chord_start {
        chords.remove_string(Some(0));
    }
    for _ in 0..guitar_start {
        chords.insert_string(Some(0));
    }
    while chords.tuning.len() > guitar.len() {
        chords.remove_string(None);
    }
    while chords.tuning.len() < guitar.len() {
        chords.insert_string(None);
    }
    chords.tuning.copy_from_slice(guitar);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChordNote;

    #[test]
    fn test_longest_common_run() {
        assert_eq!(longest_common_run(&[64, 59, 55], &[59, 55, 50]), (1, 0, 2));
        assert_eq!(longest_common_run(&[1, 2], &[3, 4]), (0, 0, 0));
    }

    #[test]
    fn test_sync_adds_missing_strings() {
        let mut chords = ChordStore::new(vec![59, 55, 50]);
        chords.chords[0].notes.insert(0, ChordNote { note: 60, finger: Some(1) });
        let guitar = [64, 59, 55, 50, 45, 40];
        sync_tuning(&mut chords, &guitar);
        assert_eq!(chords.tuning, guitar.to_vec());
        // the note on B3 followed its string
        assert_eq!(chords.chords[0].notes.get(1).map(|n| n.note), Some(60));
    }

    #[test]
    fn test_sync_removes_extra_strings() {
        let mut chords = ChordStore::new(vec![69, 64, 59, 55, 50, 45, 40, 35]);
        let guitar = [64, 59, 55, 50, 45, 40];
        sync_tuning(&mut chords, &guitar);
        assert_eq!(chords.tuning, guitar.to_vec());
    }

    #[test]
    fn test_sync_without_shared_strings() {
        let mut chords = ChordStore::new(vec![1, 2]);
        chords.chords[0].notes.insert(0, ChordNote { note: 3, finger: None });
        sync_tuning(&mut chords, &[64, 59]);
        assert_eq!(chords.tuning, vec![64, 59]);
        assert!(chords.chords[0].notes.is_empty());
    }
}
