//! Position representation and move execution.

mod attacks;
mod display;
mod error;
mod fen;
mod legality;
mod make_unmake;
mod movegen;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, SquareParseError};
pub use state::Position;
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, MoveType, Piece, PieceType,
    Square, Value, VALUE_INFINITE, VALUE_MATE, VALUE_ZERO,
};
