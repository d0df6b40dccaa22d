//! FEN parsing and emission.
//!
//! Accepts the three castling-field conventions: standard `KQkq`,
//! Shredder-FEN rook-file letters, and X-FEN inner-rook letters. Emits
//! Shredder-FEN when the position was set up for Chess960.

use std::fmt::Write as _;
use std::str::FromStr;

use super::attacks;
use super::error::FenError;
use super::state::Position;
use super::types::{
    bit_for_square, file_to_index, rank_to_index, Bitboard, CastlingRights, Color, Piece,
    PieceType, Square,
};

impl Position {
    /// Parse a position from FEN notation with standard castling rules.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::parse_fen(fen, false)
    }

    /// Parse a position from FEN notation with Chess960 castling rules.
    /// Castling rights may use Shredder-FEN rook-file letters.
    pub fn from_fen_chess960(fen: &str) -> Result<Self, FenError> {
        Self::parse_fen(fen, true)
    }

    fn parse_fen(fen: &str, chess960: bool) -> Result<Self, FenError> {
        let mut pos = Position::empty();
        pos.chess960 = chess960;

        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::TooFewFields {
                found: fields.len(),
            });
        }

        // 1. Piece placement, rank 8 down to rank 1; digits advance files
        let mut rank = 7usize;
        let mut file = 0usize;
        for c in fields[0].chars() {
            if let Some(d) = c.to_digit(10) {
                file += d as usize;
            } else if c == '/' {
                rank = rank.saturating_sub(1);
                file = 0;
            } else {
                let pc = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file < 8 {
                    pos.put_piece(pc, Square::new(rank, file));
                }
                file += 1;
            }
        }
        for color in Color::BOTH {
            if pos.pieces(color, PieceType::King).is_empty() {
                return Err(FenError::MissingKing {
                    white: color == Color::White,
                });
            }
        }

        // 2. Active color
        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        // 3. Castling availability; unrecognized tokens are skipped
        for c in fields[2].chars() {
            let color = if c.is_ascii_lowercase() {
                Color::Black
            } else {
                Color::White
            };
            let rook = Piece::make(color, PieceType::Rook);
            let ksq = pos.king_square(color);
            let back_rank = if color == Color::White { 0 } else { 7 };

            let rsq = match c.to_ascii_uppercase() {
                // Scan inward from the corner to the rook on the king's side
                'K' => (ksq.file() + 1..8)
                    .rev()
                    .map(|f| Square::new(back_rank, f))
                    .find(|&s| pos.piece_on(s) == rook),
                'Q' => (0..ksq.file())
                    .map(|f| Square::new(back_rank, f))
                    .find(|&s| pos.piece_on(s) == rook),
                f @ 'A'..='H' => {
                    let s = Square::new(back_rank, file_to_index(f.to_ascii_lowercase()));
                    (pos.piece_on(s) == rook).then_some(s)
                }
                _ => None,
            };
            if let Some(rsq) = rsq {
                pos.set_castling_right(color, rsq);
            }
        }

        // 4. En passant target; kept only if a capture is actually possible
        pos.st_mut().ep_square = None;
        let mut ep_chars = fields[3].chars();
        if let (Some(col @ 'a'..='h'), Some(row @ ('3' | '6'))) =
            (ep_chars.next(), ep_chars.next())
        {
            let ep = Square::new(rank_to_index(row), file_to_index(col));
            let us = pos.side_to_move;
            let them = us.opponent();
            let our_pawn_attackers =
                pos.attackers_to(ep).0 & pos.pieces(us, PieceType::Pawn).0;
            let pushed_pawn = ep.offset(them.pawn_push());
            if our_pawn_attackers != 0
                && pos.pieces(them, PieceType::Pawn).contains(pushed_pawn)
            {
                pos.st_mut().ep_square = Some(ep);
            }
        }

        // 5-6. Halfmove clock and fullmove number; tolerate truncated FENs
        // and the common incorrect fullmove = 0
        let rule50: i32 = fields.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove: i32 = fields.get(5).and_then(|s| s.parse().ok()).unwrap_or(0);
        pos.st_mut().rule50 = rule50;
        pos.game_ply = (2 * (fullmove.max(rule50 / 2 + 1) - 1)).max(0)
            + i32::from(pos.side_to_move == Color::Black);

        pos.set_state();
        debug_assert!(pos.is_consistent());
        Ok(pos)
    }

    /// Register a castling right given the rook's starting square, and
    /// precompute the path that must be empty to castle.
    fn set_castling_right(&mut self, color: Color, rfrom: Square) {
        let kfrom = self.king_square(color);
        let cr = if kfrom < rfrom {
            CastlingRights::kingside(color)
        } else {
            CastlingRights::queenside(color)
        };

        self.st_mut().castling_rights.insert(cr);
        self.castling_rights_mask[kfrom.index()] |= cr.as_u8();
        self.castling_rights_mask[rfrom.index()] |= cr.as_u8();
        self.castling_rook_square[cr.index()] = Some(rfrom);

        let kingside = kfrom < rfrom;
        let kto = if kingside { Square::G1 } else { Square::C1 }.relative(color);
        let rto = if kingside { Square::F1 } else { Square::D1 }.relative(color);

        self.castling_path[cr.index()] = Bitboard(
            (attacks::between(rfrom, rto).0
                | attacks::between(kfrom, kto).0
                | bit_for_square(rto).0
                | bit_for_square(kto).0)
                & !(bit_for_square(kfrom).0 | bit_for_square(rfrom).0),
        );
    }

    /// FEN representation of the position. Shredder-FEN castling letters
    /// are used for Chess960.
    #[must_use]
    pub fn fen(&self) -> String {
        let mut out = String::new();

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let pc = self.piece_on(Square::new(rank, file));
                if pc.is_none() {
                    empty += 1;
                } else {
                    if empty > 0 {
                        let _ = write!(out, "{empty}");
                        empty = 0;
                    }
                    out.push(pc.to_char());
                }
            }
            if empty > 0 {
                let _ = write!(out, "{empty}");
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side_to_move == Color::White {
            'w'
        } else {
            'b'
        });
        out.push(' ');

        let rights = self.castling_rights();
        let mut any = false;
        for (cr, standard) in [
            (CastlingRights::WHITE_OO, 'K'),
            (CastlingRights::WHITE_OOO, 'Q'),
            (CastlingRights::BLACK_OO, 'k'),
            (CastlingRights::BLACK_OOO, 'q'),
        ] {
            if !rights.has(cr) {
                continue;
            }
            any = true;
            if self.chess960 {
                let rsq = self.castling_rook_square(cr).expect("right implies rook");
                let letter = (b'a' + rsq.file() as u8) as char;
                out.push(if standard.is_ascii_uppercase() {
                    letter.to_ascii_uppercase()
                } else {
                    letter
                });
            } else {
                out.push(standard);
            }
        }
        if !any {
            out.push('-');
        }

        match self.ep_square() {
            Some(ep) => {
                let _ = write!(out, " {ep} ");
            }
            None => out.push_str(" - "),
        }

        let fullmove = 1 + (self.game_ply - i32::from(self.side_to_move == Color::Black)) / 2;
        let _ = write!(out, "{} {}", self.rule50_count(), fullmove);
        out
    }

    /// Build a position from an endgame code like `"KBPKN"`, with `strong`
    /// choosing the side holding the first group. Only the material keys of
    /// the result are meaningful; the synthesized placement is canonical.
    pub fn from_endgame_code(code: &str, strong: Color) -> Result<Self, FenError> {
        let err = || FenError::InvalidEndgameCode {
            code: code.to_string(),
        };

        if !code.starts_with('K') || code.len() < 2 {
            return Err(err());
        }
        let weak_at = code[1..].find('K').map(|i| i + 1).ok_or_else(err)?;
        let strong_part = &code[..weak_at];
        let weak_part = &code[weak_at..];
        if weak_part.is_empty() || strong_part.len() + weak_part.len() >= 8 {
            return Err(err());
        }

        let mut sides = [weak_part.to_string(), strong_part.to_string()];
        sides[strong.index()] = sides[strong.index()].to_ascii_lowercase();

        let fen = format!(
            "8/{}{}/8/8/8/8/{}{}/8 w - - 0 1",
            sides[0],
            8 - sides[0].len(),
            sides[1],
            8 - sides[1].len()
        );
        Self::parse_fen(&fen, false)
    }

    /// Flip the position: white and black sides reversed, as if the board
    /// were mirrored. Useful for finding evaluation symmetry bugs.
    pub fn flip(&mut self) {
        fn swap_case(s: &str) -> String {
            s.chars()
                .map(|c| {
                    if c.is_ascii_uppercase() {
                        c.to_ascii_lowercase()
                    } else {
                        c.to_ascii_uppercase()
                    }
                })
                .collect()
        }

        let fen = self.fen();
        let fields: Vec<&str> = fen.split(' ').collect();

        let placement: Vec<String> = fields[0].split('/').rev().map(swap_case).collect();
        let side = if fields[1] == "w" { "b" } else { "w" };
        let castling = swap_case(fields[2]);
        let ep = if fields[3] == "-" {
            "-".to_string()
        } else {
            let mut chars = fields[3].chars();
            let file = chars.next().unwrap_or('-');
            let rank = if chars.next() == Some('3') { '6' } else { '3' };
            format!("{file}{rank}")
        };

        let flipped = format!(
            "{} {} {} {} {} {}",
            placement.join("/"),
            side,
            castling,
            ep,
            fields[4],
            fields[5]
        );

        let nodes = self.nodes.clone();
        let mut new = Self::parse_fen(&flipped, self.chess960).expect("flipped FEN is valid");
        new.nodes = nodes;
        *self = new;
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
