//! Relocating entries of a position-keyed map
//!
//! Every structure keyed by position (note stacks, tie anchors, time
//! signature changes) is shifted with these two routines.

use crate::models::Position;
use std::collections::BTreeMap;

/// Move every entry at or after `from` by `by`
///
/// Entries move highest-first when `by > 0` and lowest-first when `by < 0`,
/// so a moved entry never lands on one that has not moved yet. An entry
/// that would land before position 0 is dropped and returned.
pub fn shift_from<V>(
    map: &mut BTreeMap<Position, V>,
    from: Position,
    by: Position,
) -> Vec<(Position, V)> {
    let mut dropped = Vec::new();
    if by == Position::ZERO {
        return dropped;
    }

    let mut keys: Vec<Position> = map.range(from..).map(|(k, _)| *k).collect();
    if by.is_positive() {
        keys.reverse();
    }

    for key in keys {
        if let Some(value) = map.remove(&key) {
            let target = key + by;
            if target.is_negative() {
                log::warn!("shift_from: entry at {} would move to {}, dropping", key, target);
                dropped.push((key, value));
                continue;
            }
            if map.insert(target, value).is_some() {
                log::warn!("shift_from: entry at {} overwrote existing entry at {}", key, target);
            }
        }
    }
    dropped
}

/// Move the entries in `[start, end)` by `delta`
///
/// The range is lifted out before anything is reinserted, so the source
/// and destination may overlap.
pub fn move_range<V>(map: &mut BTreeMap<Position, V>, start: Position, end: Position, delta: Position) {
    if delta == Position::ZERO {
        return;
    }
    for (key, value) in take_range(map, start, end) {
        let target = key + delta;
        if target.is_negative() {
            log::warn!("move_range: entry at {} would move to {}, dropping", key, target);
            continue;
        }
        if map.insert(target, value).is_some() {
            log::warn!("move_range: entry at {} overwrote existing entry at {}", key, target);
        }
    }
}

/// Remove and return the entries in `[start, end)`, in position order
pub fn take_range<V>(map: &mut BTreeMap<Position, V>, start: Position, end: Position) -> Vec<(Position, V)> {
    if end <= start {
        return Vec::new();
    }
    let keys: Vec<Position> = map.range(start..end).map(|(k, _)| *k).collect();
    keys.into_iter()
        .filter_map(|k| map.remove(&k).map(|v| (k, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(keys: &[i32]) -> BTreeMap<Position, i32> {
        keys.iter().map(|k| (Position::beats(*k), *k)).collect()
    }

    fn keys(map: &BTreeMap<Position, i32>) -> Vec<i32> {
        map.keys().map(|k| k.numer()).collect()
    }

    #[test]
    fn test_shift_forward_by_less_than_spacing() {
        // each entry moves onto the key of its neighbour
        let mut map = map_of(&[0, 1, 2, 3]);
        shift_from(&mut map, Position::beats(1), Position::beats(1));
        assert_eq!(keys(&map), vec![0, 2, 3, 4]);
        assert_eq!(map[&Position::beats(4)], 3);
        assert_eq!(map[&Position::beats(2)], 1);
    }

    #[test]
    fn test_shift_backward_by_less_than_spacing() {
        let mut map = map_of(&[0, 2, 3, 4]);
        shift_from(&mut map, Position::beats(2), Position::beats(-1));
        assert_eq!(keys(&map), vec![0, 1, 2, 3]);
        assert_eq!(map[&Position::beats(1)], 2);
        assert_eq!(map[&Position::beats(3)], 4);
    }

    #[test]
    fn test_shift_round_trip() {
        let original = map_of(&[0, 1, 5, 6, 9]);
        let mut map = original.clone();
        let p = Position::beats(5);
        let s = Position::new(3, 2);
        shift_from(&mut map, p, s);
        shift_from(&mut map, p + s, -s);
        assert_eq!(map, original);
    }

    #[test]
    fn test_shift_drops_negative_targets() {
        let mut map = map_of(&[1, 2]);
        let dropped = shift_from(&mut map, Position::ZERO, Position::beats(-2));
        assert_eq!(dropped.len(), 1);
        assert_eq!(keys(&map), vec![0]);
    }

    #[test]
    fn test_move_range_overlapping() {
        let mut map = map_of(&[0, 4, 5, 6, 8]);
        move_range(&mut map, Position::beats(4), Position::beats(7), Position::beats(1));
        assert_eq!(keys(&map), vec![0, 5, 6, 7, 8]);
        assert_eq!(map[&Position::beats(7)], 6);
    }

    #[test]
    fn test_take_range() {
        let mut map = map_of(&[0, 4, 5, 8]);
        let taken = take_range(&mut map, Position::beats(4), Position::beats(8));
        assert_eq!(taken.len(), 2);
        assert_eq!(keys(&map), vec![0, 8]);
        assert!(take_range(&mut map, Position::beats(8), Position::beats(4)).is_empty());
    }
}
