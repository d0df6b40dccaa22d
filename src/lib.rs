//! Chess position core for a UCI engine.
//!
//! Provides the state layer a search stack is built on:
//! - Bitboard-based position with incremental Zobrist hashing
//! - Fully reversible move execution (`do_move`/`undo_move`, null moves)
//! - Legality, pseudo-legality and check-detection predicates
//! - Static exchange evaluation (`see_ge`)
//! - Repetition tracking and draw detection
//! - A concurrent, cluster-bucketed transposition table
//!
//! # Quick Start
//!
//! ```
//! use chess_core::position::Position;
//!
//! // Start position has exactly twenty legal moves
//! let mut pos = Position::new();
//! let moves = pos.legal_moves();
//! assert_eq!(moves.len(), 20);
//!
//! // Make and take back a move; the position is restored exactly
//! let key = pos.key();
//! let m = moves[0];
//! let gives_check = pos.gives_check(m);
//! pos.do_move(m, gives_check);
//! pos.undo_move(m);
//! assert_eq!(pos.key(), key);
//! ```
//!
//! # Building Positions
//!
//! ```
//! use chess_core::position::Position;
//!
//! // From FEN notation
//! let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
//!     .unwrap();
//! assert!(pos.ep_square().is_none()); // no black pawn can capture on e3
//! ```
//!
//! # Transposition Table
//!
//! ```
//! use chess_core::position::Position;
//! use chess_core::tt::{Bound, TranspositionTable};
//!
//! let tt = TranspositionTable::new(16);
//! let pos = Position::new();
//!
//! let (entry, found) = tt.probe(pos.key());
//! assert!(!found);
//! entry.save(pos.key(), 12, false, Bound::Exact, 5, pos.legal_moves()[0], 8);
//!
//! let (entry, found) = tt.probe(pos.key());
//! assert!(found);
//! assert_eq!(entry.depth(), 5);
//! ```
//!
//! # Features
//!
//! - `serde` - Enable serialization for the small value types (`Square`,
//!   `Color`, `PieceType`, `Piece`, `Move`, `CastlingRights`)

// Enable pedantic lints with sensible domain-specific exceptions
#![warn(clippy::pedantic)]
// Bitboard hex literals are clearer without separators (bit patterns visible)
#![allow(clippy::unreadable_literal)]
// Chess engines have intentionally similar names (pawn_key/material_key, etc.)
#![allow(clippy::similar_names)]
// Index casts are ubiquitous and safe in chess (board indices, square indices)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Large arrays are needed for move lists and attack tables
#![allow(clippy::large_stack_arrays)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod position;
pub mod sync;
pub mod tt;
pub mod zobrist;
