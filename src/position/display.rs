//! ASCII board dump for debugging and the UCI `d` command.

use std::fmt;

use super::state::Position;
use super::types::Square;

/// Piece glyphs indexed by the 4-bit piece encoding; slots 0, 7 and 8 are
/// unused and print as spaces.
const PIECE_TO_CHAR: &[u8] = b" PNBRQK  pnbrqk";

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, " +---+---+---+---+---+---+---+---+")?;
        for rank in (0..8).rev() {
            for file in 0..8 {
                let glyph = PIECE_TO_CHAR[self.piece_on(Square::new(rank, file)).index()] as char;
                write!(f, " | {glyph}")?;
            }
            writeln!(f, " |")?;
            writeln!(f, " +---+---+---+---+---+---+---+---+")?;
        }

        writeln!(f)?;
        writeln!(f, "Fen: {}", self.fen())?;
        writeln!(f, "PositionKey: {:016X}", self.key())?;
        writeln!(f, "MaterialKey: {:016X}", self.material_key())?;
        writeln!(f, "PawnKey:     {:016X}", self.pawn_key())?;

        write!(f, "Checkers:")?;
        for sq in self.checkers().iter() {
            write!(f, " {sq}")?;
        }
        writeln!(f)?;

        write!(f, "Legal moves: {}", self.legal_moves().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_contains_fen_and_keys() {
        let pos = Position::new();
        let dump = pos.to_string();
        assert!(dump.contains("Fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(dump.contains("PositionKey:"));
        assert!(dump.contains("Legal moves: 20"));
        // Sixteen hex digits, zero padded
        let key_line = dump
            .lines()
            .find(|l| l.starts_with("PositionKey: "))
            .unwrap();
        assert_eq!(key_line.len(), "PositionKey: ".len() + 16);
    }

    #[test]
    fn test_dump_lists_checkers() {
        let pos = Position::from_fen("4r2k/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let dump = pos.to_string();
        assert!(dump.contains("Checkers: e8"));
    }

    #[test]
    fn test_dump_grid_glyphs() {
        let pos = Position::new();
        let dump = pos.to_string();
        assert!(dump.contains("| r | n | b | q | k | b | n | r |"));
        assert!(dump.contains("| P | P | P | P | P | P | P | P |"));
    }
}
