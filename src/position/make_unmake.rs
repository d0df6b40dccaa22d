//! Reversible move execution.
//!
//! `do_move` pushes a new state onto the undo stack and patches the board,
//! bitboards and hash keys incrementally; `undo_move` restores everything
//! exactly. Null moves flip the side to move without touching pieces.

use crate::zobrist::ZOBRIST;

use super::attacks;
use super::state::Position;
use super::types::{Bitboard, Color, Move, MoveType, Piece, PieceType, Square};

impl Position {
    /// Make a move. `m` must be legal; `gives_check` must be the value of
    /// `self.gives_check(m)` (the caller usually knows it already).
    pub fn do_move(&mut self, m: Move, gives_check: bool) {
        self.nodes.increment();

        let us = self.side_to_move;
        let them = us.opponent();
        let from = m.from_sq();
        let mut to = m.to_sq();
        let pc = self.piece_on(from);
        let mut captured = if m.move_type() == MoveType::EnPassant {
            Piece::make(them, PieceType::Pawn)
        } else {
            self.piece_on(to)
        };

        debug_assert!(!pc.is_none() && pc.color() == us);
        debug_assert!(captured.is_none() || captured.piece_type() != PieceType::King);

        let mut k = self.st().key ^ ZOBRIST.side;

        // Push a copy of the incrementally maintained fields; the rest is
        // recomputed below.
        let mut new_st = self.st().clone();
        new_st.repetition = 0;
        self.states.push(new_st);
        self.game_ply += 1;
        {
            let st = self.st_mut();
            st.rule50 += 1;
            st.plies_from_null += 1;
        }

        if m.move_type() == MoveType::Castling {
            debug_assert!(pc == Piece::make(us, PieceType::King));
            debug_assert!(captured == Piece::make(us, PieceType::Rook));

            let (rfrom, rto, kto) = self.do_castling(us, from, to);
            k ^= ZOBRIST.psq[captured.index()][rfrom.index()]
                ^ ZOBRIST.psq[captured.index()][rto.index()];
            captured = Piece::NONE;
            to = kto;
        }

        if !captured.is_none() {
            let mut capsq = to;

            if captured.piece_type() == PieceType::Pawn {
                if m.move_type() == MoveType::EnPassant {
                    capsq = to.offset(-us.pawn_push());
                    debug_assert!(pc == Piece::make(us, PieceType::Pawn));
                    debug_assert!(self.piece_on(to).is_none());
                }
                self.st_mut().pawn_key ^= ZOBRIST.psq[captured.index()][capsq.index()];
            } else {
                self.st_mut().non_pawn_material[them.index()] -=
                    captured.piece_type().value_mg();
            }

            self.remove_piece(captured, capsq);
            k ^= ZOBRIST.psq[captured.index()][capsq.index()];
            // Material key buckets are indexed by the piece count left
            let mk = ZOBRIST.psq[captured.index()][self.piece_count[captured.index()] as usize];
            self.st_mut().material_key ^= mk;

            self.st_mut().rule50 = 0;
        }

        k ^= ZOBRIST.psq[pc.index()][from.index()] ^ ZOBRIST.psq[pc.index()][to.index()];

        if let Some(ep) = self.st().ep_square {
            k ^= ZOBRIST.enpassant[ep.file()];
            self.st_mut().ep_square = None;
        }

        // Castling rights are dropped when the king or rook square is
        // touched; the key update is one XOR because subset keys compose.
        let cr_mask =
            self.castling_rights_mask[from.index()] | self.castling_rights_mask[to.index()];
        if self.st().castling_rights.as_u8() & cr_mask != 0 {
            let dropped = self.st().castling_rights.as_u8() & cr_mask;
            k ^= ZOBRIST.castling[dropped as usize];
            self.st_mut().castling_rights.remove_mask(cr_mask);
        }

        // The tricky Chess960 castling relocation happened earlier
        if m.move_type() != MoveType::Castling {
            self.move_piece(pc, from, to);
        }

        if pc.piece_type() == PieceType::Pawn {
            // A double push sets the en-passant square, but only when an
            // enemy pawn could actually capture there
            if to.index() ^ from.index() == 16
                && !Bitboard(
                    attacks::pawn_attacks(us, to.offset(-us.pawn_push())).0
                        & self.pieces(them, PieceType::Pawn).0,
                )
                .is_empty()
            {
                let ep = to.offset(-us.pawn_push());
                self.st_mut().ep_square = Some(ep);
                k ^= ZOBRIST.enpassant[ep.file()];
            } else if m.move_type() == MoveType::Promotion {
                let promotion = Piece::make(us, m.promotion_type());
                debug_assert!(to.relative_rank(us) == 7);

                self.remove_piece(pc, to);
                self.put_piece(promotion, to);

                k ^= ZOBRIST.psq[pc.index()][to.index()]
                    ^ ZOBRIST.psq[promotion.index()][to.index()];
                self.st_mut().pawn_key ^= ZOBRIST.psq[pc.index()][to.index()];
                let mk = ZOBRIST.psq[promotion.index()]
                    [self.piece_count[promotion.index()] as usize - 1]
                    ^ ZOBRIST.psq[pc.index()][self.piece_count[pc.index()] as usize];
                self.st_mut().material_key ^= mk;
                self.st_mut().non_pawn_material[us.index()] +=
                    m.promotion_type().value_mg();
            }

            self.st_mut().pawn_key ^=
                ZOBRIST.psq[pc.index()][from.index()] ^ ZOBRIST.psq[pc.index()][to.index()];
            self.st_mut().rule50 = 0;
        }

        self.st_mut().captured_piece = captured;
        self.st_mut().key = k;

        let checkers = if gives_check {
            Bitboard(self.attackers_to(self.king_square(them)).0 & self.pieces_of_color(us).0)
        } else {
            Bitboard::EMPTY
        };
        self.st_mut().checkers = checkers;

        self.side_to_move = them;
        self.set_check_info();

        // Repetition distance: scan same-side positions back to the last
        // irreversible move or null move
        let end = self.st().rule50.min(self.st().plies_from_null);
        if end >= 4 {
            let cur = self.states.len() - 1;
            let key = self.st().key;
            let mut i = 4;
            while i <= end {
                let stp = &self.states[cur - i as usize];
                if stp.key == key {
                    let rep = if stp.repetition != 0 { -i } else { i };
                    self.st_mut().repetition = rep;
                    break;
                }
                i += 2;
            }
        }

        debug_assert!(self.is_consistent());
    }

    /// Take back a move. Must be the last move made on this position.
    pub fn undo_move(&mut self, m: Move) {
        self.side_to_move = self.side_to_move.opponent();

        let us = self.side_to_move;
        let from = m.from_sq();
        let to = m.to_sq();
        let mut pc = self.piece_on(to);

        debug_assert!(self.empty_square(from) || m.move_type() == MoveType::Castling);

        if m.move_type() == MoveType::Promotion {
            debug_assert!(to.relative_rank(us) == 7);
            debug_assert!(pc.piece_type() == m.promotion_type());

            self.remove_piece(pc, to);
            pc = Piece::make(us, PieceType::Pawn);
            self.put_piece(pc, to);
        }

        if m.move_type() == MoveType::Castling {
            self.undo_castling(us, from, to);
        } else {
            self.move_piece(pc, to, from);

            let captured = self.st().captured_piece;
            if !captured.is_none() {
                let mut capsq = to;
                if m.move_type() == MoveType::EnPassant {
                    capsq = to.offset(-us.pawn_push());
                }
                self.put_piece(captured, capsq);
            }
        }

        self.states.pop();
        self.game_ply -= 1;

        debug_assert!(self.is_consistent());
    }

    /// Relocate king and rook for castling. Removing both pieces before
    /// placing either handles the Chess960 cases where the squares overlap.
    /// Returns (rook from, rook to, king to).
    pub(crate) fn do_castling(
        &mut self,
        us: Color,
        from: Square,
        rfrom: Square,
    ) -> (Square, Square, Square) {
        let kingside = rfrom > from;
        let rto = if kingside { Square::F1 } else { Square::D1 }.relative(us);
        let kto = if kingside { Square::G1 } else { Square::C1 }.relative(us);
        let king = Piece::make(us, PieceType::King);
        let rook = Piece::make(us, PieceType::Rook);

        self.remove_piece(king, from);
        self.remove_piece(rook, rfrom);
        self.put_piece(king, kto);
        self.put_piece(rook, rto);

        (rfrom, rto, kto)
    }

    fn undo_castling(&mut self, us: Color, from: Square, rfrom: Square) {
        let kingside = rfrom > from;
        let rto = if kingside { Square::F1 } else { Square::D1 }.relative(us);
        let kto = if kingside { Square::G1 } else { Square::C1 }.relative(us);
        let king = Piece::make(us, PieceType::King);
        let rook = Piece::make(us, PieceType::Rook);

        self.remove_piece(king, kto);
        self.remove_piece(rook, rto);
        self.put_piece(king, from);
        self.put_piece(rook, rfrom);
    }

    /// Flip the side to move without moving a piece. The position must not
    /// be in check. Repetition detection never crosses a null move.
    pub fn do_null_move(&mut self) {
        debug_assert!(self.checkers().is_empty());
        self.nodes.increment();

        let new_st = self.st().clone();
        self.states.push(new_st);

        {
            let st = self.st_mut();
            if let Some(ep) = st.ep_square {
                st.key ^= ZOBRIST.enpassant[ep.file()];
                st.ep_square = None;
            }
            st.key ^= ZOBRIST.side;
            st.rule50 += 1;
            st.plies_from_null = 0;
            st.repetition = 0;
        }

        self.side_to_move = self.side_to_move.opponent();
        self.set_check_info();
    }

    /// Take back a null move.
    pub fn undo_null_move(&mut self) {
        debug_assert!(self.checkers().is_empty());
        self.states.pop();
        self.side_to_move = self.side_to_move.opponent();
    }
}
