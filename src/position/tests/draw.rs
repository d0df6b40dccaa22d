//! Repetition draw detection and halfmove-clock bookkeeping.

use super::{play_all, pos};

const KNIGHT_SHUFFLE: [&str; 4] = ["g1f3", "g8f6", "f3g1", "f6g8"];

#[test]
fn test_first_repetition_has_positive_distance() {
    let mut p = pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    play_all(&mut p, &KNIGHT_SHUFFLE);
    assert_eq!(p.st().repetition, 4);
}

#[test]
fn test_second_repetition_is_negative() {
    let mut p = pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    play_all(&mut p, &KNIGHT_SHUFFLE);
    play_all(&mut p, &KNIGHT_SHUFFLE);
    assert_eq!(p.st().repetition, -8);
}

#[test]
fn test_is_draw_rules_on_search_ply() {
    let mut p = pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    play_all(&mut p, &KNIGHT_SHUFFLE);

    // One repeat counts as a draw only when it happened after the root
    assert!(!p.is_draw(3));
    assert!(p.is_draw(5));

    play_all(&mut p, &KNIGHT_SHUFFLE);
    // Two repeats draw regardless of where the root sits
    assert!(p.is_draw(0));
    assert!(p.is_draw(100));
}

#[test]
fn test_has_repeated() {
    let mut p = pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    assert!(!p.has_repeated());
    play_all(&mut p, &KNIGHT_SHUFFLE);
    assert!(p.has_repeated());

    // An irreversible move forgets the history
    play_all(&mut p, &["e2e4"]);
    assert!(!p.has_repeated());
}

#[test]
fn test_repetition_not_found_across_null_move() {
    let mut p = pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    play_all(&mut p, &["g1f3", "g8f6"]);
    p.do_null_move();
    p.do_null_move();
    play_all(&mut p, &["f3g1", "f6g8"]);
    // The position repeats, but the scan must not cross the null moves
    assert_eq!(p.st().repetition, 0);
}

#[test]
fn test_is_draw_ignores_halfmove_clock() {
    // is_draw only rules on repetition; fifty-move adjudication is the
    // caller's concern
    let p = pos("8/8/8/8/8/4k3/8/K7 w - - 100 1");
    assert_eq!(p.rule50_count(), 100);
    assert!(!p.is_draw(1));
}

#[test]
fn test_rule50_resets_on_pawn_move_and_capture() {
    let mut p = pos("4k3/8/8/3p4/4P3/8/8/4K3 w - - 42 1");
    assert_eq!(p.rule50_count(), 42);
    play_all(&mut p, &["e4d5"]);
    assert_eq!(p.rule50_count(), 0);
}
