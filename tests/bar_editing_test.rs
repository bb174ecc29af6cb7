// Bar-level structural edits through the editing session

use tab_editor_wasm::models::{GuitarNote, NotePosition, Position, Spacing, TieData, TieKind, TieSlot, TimeSignature};
use tab_editor_wasm::{EditorConfig, EditorSession};

fn p(beats: i32) -> Position {
    Position::beats(beats)
}

fn session_with_notes(beats: impl IntoIterator<Item = i32>) -> EditorSession {
    let mut session = EditorSession::new(EditorConfig::default());
    for b in beats {
        session
            .set_note(NotePosition::new(0, p(b)), GuitarNote::midi(60 + b as u8))
            .expect("note should be writable");
    }
    session
}

fn occupied(session: &EditorSession) -> Vec<i32> {
    session.tab().guitar.notes().positions().map(|p| p.numer()).collect()
}

fn bar_spans(session: &EditorSession) -> Vec<(i32, i32, TimeSignature)> {
    session
        .bars()
        .expect("bars should derive")
        .iter()
        .map(|b| (b.start.numer(), b.end.numer(), b.time_signature))
        .collect()
}

#[test]
fn test_insert_bar_opens_empty_bar() {
    let mut session = session_with_notes(0..10);

    let size = session.insert_bar(p(4)).expect("insert should succeed");

    assert_eq!(size, p(4));
    assert_eq!(occupied(&session), vec![0, 1, 2, 3, 8, 9, 10, 11, 12, 13]);
    assert!(session.get_stacks(p(4), p(8)).unwrap().iter().all(|s| s.notes.iter().all(Option::is_none)));
}

#[test]
fn test_reorder_keeps_each_bar_signature() {
    let three_four = TimeSignature::new(3, Spacing::Quarter);
    let mut session = session_with_notes(0..11);
    session.insert_time_change(p(4), three_four).unwrap();
    session.insert_time_change(p(7), TimeSignature::default()).unwrap();

    let new_start = session.reorder_bar(p(4), p(7)).expect("reorder should succeed");

    assert_eq!(new_start, p(8));
    assert_eq!(
        bar_spans(&session),
        vec![
            (0, 4, TimeSignature::default()),
            (4, 8, TimeSignature::default()),
            (8, 11, three_four),
        ]
    );
    // the 3/4 bar's first note (was at 4) now opens the last bar
    assert_eq!(session.get_note(NotePosition::new(0, p(8))), Some(GuitarNote::midi(64)));
    assert_eq!(session.get_note(NotePosition::new(0, p(4))), Some(GuitarNote::midi(67)));
}

#[test]
fn test_reorder_round_trip_restores_document() {
    let mut session = session_with_notes(0..12);
    session
        .insert_time_change(p(4), TimeSignature::new(6, Spacing::Eighth))
        .unwrap();
    let before = session.serialize().unwrap();

    let moved_to = session.reorder_bar(p(0), p(4)).unwrap();
    assert_eq!(moved_to, p(3));
    session.reorder_bar(moved_to, Position::ZERO).unwrap();

    assert_eq!(session.serialize().unwrap(), before);
}

#[test]
fn test_delete_bar_closes_gap() {
    let mut session = session_with_notes(0..12);

    session.delete_bar(p(4)).expect("delete should succeed");

    assert_eq!(occupied(&session), (0..8).collect::<Vec<_>>());
    assert_eq!(session.get_note(NotePosition::new(0, p(4))), Some(GuitarNote::midi(68)));
    assert_eq!(session.get_last_position(), p(7));
}

#[test]
fn test_insert_bar_drops_straddling_tie() {
    let mut session = session_with_notes(0..8);
    let slide = TieSlot::Tie(TieData { kind: TieKind::Slide, to: p(5) });
    session.set_tie(0, p(3), slide).unwrap();
    let hammer = TieSlot::Tie(TieData { kind: TieKind::Hammer, to: p(7) });
    session.set_tie(0, p(6), hammer).unwrap();

    session.insert_bar(p(4)).unwrap();

    let ties = session.get_ties();
    assert_eq!(ties.len(), 1);
    assert_eq!((ties[0].from, ties[0].to), (p(10), p(11)));
    assert_eq!((ties[0].midi_from, ties[0].midi_to), (Some(66), Some(67)));
}

#[test]
fn test_new_bar_click_grows_piece() {
    let mut session = session_with_notes([0]);
    assert_eq!(session.bars().unwrap().len(), 1);

    session.new_bar_click().unwrap();
    session.new_bar_click().unwrap();

    assert_eq!(session.bars().unwrap().len(), 3);
    assert_eq!(session.get_bar_index_at(p(9)).unwrap(), 2);
}

#[test]
fn test_bar_edits_reject_negative_positions() {
    let mut session = session_with_notes(0..4);
    assert!(session.insert_bar(p(-4)).is_err());
    assert!(session.delete_bar(p(-4)).is_err());
    assert!(session.reorder_bar(p(0), p(-4)).is_err());
    assert_eq!(occupied(&session), vec![0, 1, 2, 3]);
}
