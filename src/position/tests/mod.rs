//! Position module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generation and make/unmake node counts
//! - `make_unmake.rs` - do_move/undo_move reversibility
//! - `draw.rs` - Repetition detection and halfmove-clock bookkeeping
//! - `see.rs` - Static exchange evaluation
//! - `legality.rs` - legal/pseudo_legal/gives_check consistency
//! - `chess960.rs` - Chess960 castling and Shredder-FEN
//! - `edge_cases.rs` - Special positions
//! - `proptest.rs` - Property-based tests

mod chess960;
mod draw;
mod perft;
mod proptest;

use super::state::Position;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid fen")
}

fn play_all(position: &mut Position, moves: &[&str]) {
    for notation in moves {
        position
            .play(notation)
            .unwrap_or_else(|| panic!("move {notation} not legal in {}", position.fen()));
    }
}
