//! Chess960 castling and Shredder-FEN handling.

use super::super::state::Position;
use super::super::types::{MoveType, PieceType, Square};

#[test]
fn test_overlapping_queenside_castle() {
    // King b1, rook a1: castling lands king c1, rook d1 even though the
    // paths overlap the starting squares
    let mut p = Position::from_fen_chess960("7k/8/8/8/8/8/8/RK6 w A - 0 1").unwrap();
    let m = p.find_move("b1a1").unwrap();
    assert_eq!(m.move_type(), MoveType::Castling);

    p.do_move(m, p.gives_check(m));
    assert_eq!(p.piece_on(Square::C1).piece_type(), PieceType::King);
    assert_eq!(p.piece_on(Square::D1).piece_type(), PieceType::Rook);
    assert!(p.empty_square(Square::A1));
    assert!(p.empty_square(Square::B1));

    p.undo_move(m);
    assert_eq!(p.piece_on(Square::B1).piece_type(), PieceType::King);
    assert_eq!(p.piece_on(Square::A1).piece_type(), PieceType::Rook);
}

#[test]
fn test_shredder_fen_roundtrip() {
    let fen = "7k/8/8/8/8/8/8/RK6 w A - 0 1";
    let p = Position::from_fen_chess960(fen).unwrap();
    assert_eq!(p.fen(), fen);
    assert!(p.is_chess960());
}

#[test]
fn test_chess960_rook_move_may_not_uncover_check() {
    // King c1, own rook b1, enemy queen a1. Queenside castling keeps the
    // king on c1 but lifts the rook to d1, unveiling the queen
    let p = Position::from_fen_chess960("7k/8/8/8/8/8/8/qRK5 w B - 0 1").unwrap();
    assert!(p.find_move("c1b1").is_none());

    // The same castle is fine once the queen is gone
    let mut p = Position::from_fen_chess960("7k/8/8/8/8/8/8/1RK5 w B - 0 1").unwrap();
    let m = p.find_move("c1b1").unwrap();
    assert_eq!(m.move_type(), MoveType::Castling);
    p.do_move(m, p.gives_check(m));
    assert_eq!(p.piece_on(Square::C1).piece_type(), PieceType::King);
    assert_eq!(p.piece_on(Square::D1).piece_type(), PieceType::Rook);
}

#[test]
fn test_chess960_castle_blocked_by_second_rook() {
    // King g1, rooks f1 and h1: the h-rook's destination f1 is taken, so
    // the kingside castle may not be generated
    let p = Position::from_fen_chess960("2k5/8/8/8/8/8/8/5RKR w H - 0 1").unwrap();
    assert!(p.find_move("g1h1").is_none());
}

#[test]
fn test_chess960_castle_with_stationary_king() {
    // King already on g1: castling only moves the rook
    let mut p = Position::from_fen_chess960("2k5/8/8/8/8/8/8/6KR w H - 0 1").unwrap();
    let m = p.find_move("g1h1").unwrap();
    assert_eq!(m.move_type(), MoveType::Castling);
    p.do_move(m, p.gives_check(m));
    assert_eq!(p.piece_on(Square::G1).piece_type(), PieceType::King);
    assert_eq!(p.piece_on(Square::F1).piece_type(), PieceType::Rook);
    assert!(p.empty_square(Square::H1));
}
