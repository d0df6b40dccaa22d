//! Error types for position construction.

use std::fmt;

/// Error type for FEN parsing failures.
///
/// Parsing is deliberately tolerant: unknown castling tokens are skipped and
/// an invalid en-passant field degrades to "none". Only structural problems
/// are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs at least 4)
    TooFewFields { found: usize },
    /// Invalid piece character in the placement field
    InvalidPiece { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// A side is missing its king
    MissingKing { white: bool },
    /// Endgame code is not of the form "K...K..."
    InvalidEndgameCode { code: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewFields { found } => {
                write!(f, "FEN must have at least 4 fields, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::MissingKing { white } => {
                write!(
                    f,
                    "Missing {} king in FEN",
                    if *white { "white" } else { "black" }
                )
            }
            FenError::InvalidEndgameCode { code } => {
                write!(f, "Invalid endgame code '{code}'")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for square notation parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareParseError {
    pub notation: String,
}

impl fmt::Display for SquareParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid square notation '{}'", self.notation)
    }
}

impl std::error::Error for SquareParseError {}
