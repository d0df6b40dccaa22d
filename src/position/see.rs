//! Static Exchange Evaluation.
//!
//! Resolves the capture/recapture sequence on one square as a null-window
//! negamax over material, without touching the position.

use super::attacks;
use super::state::Position;
use super::types::{bit_for_square, Bitboard, Move, MoveType, Piece, PieceType, Value};

fn piece_value(pc: Piece) -> Value {
    if pc.is_none() {
        0
    } else {
        pc.piece_type().value_mg()
    }
}

impl Position {
    /// Test whether the static exchange evaluation of `m` meets
    /// `threshold`: the side to move cannot end up worse than `threshold`
    /// centipawns on the destination square, assuming both sides capture
    /// only while it pays.
    #[must_use]
    pub fn see_ge(&self, m: Move, threshold: Value) -> bool {
        // Castling, promotions and en passant pass a trivial judgment
        if m.move_type() != MoveType::Normal {
            return threshold <= 0;
        }

        let from = m.from_sq();
        let to = m.to_sq();

        // Winning the target piece alone must meet the threshold; the
        // opponent is not forced to recapture
        let mut balance = piece_value(self.piece_on(to)) - threshold;
        if balance < 0 {
            return false;
        }

        // If losing the moved piece still leaves us ahead (PxQ), done.
        // A capturing king has value zero here, so it always returns now.
        balance -= piece_value(self.piece_on(from));
        if balance >= 0 {
            return true;
        }

        let mut stm = self.piece_on(from).color();
        let mut occupied =
            Bitboard(self.all_pieces().0 ^ bit_for_square(from).0 ^ bit_for_square(to).0);
        let mut attackers = self.attackers_to_occ(to, occupied);
        let mut result = true;

        loop {
            stm = stm.opponent();

            // X-ray reveals may have re-added pieces already consumed
            attackers.0 &= occupied.0;

            let mut stm_attackers = Bitboard(attackers.0 & self.pieces_of_color(stm).0);
            if stm_attackers.is_empty() {
                break;
            }

            // Pinned pieces may not capture while the pinner still stands
            if self.pinners(stm.opponent()).0 & occupied.0 != 0 {
                stm_attackers.0 &= !self.blockers_for_king(stm).0;
                if stm_attackers.is_empty() {
                    break;
                }
            }

            result = !result;

            // Least valuable attacker first
            let mut next_pt = PieceType::King;
            let mut next_bb = Bitboard::EMPTY;
            for pt in [
                PieceType::Pawn,
                PieceType::Knight,
                PieceType::Bishop,
                PieceType::Rook,
                PieceType::Queen,
            ] {
                let b = Bitboard(stm_attackers.0 & self.pieces_of_type(pt).0);
                if !b.is_empty() {
                    next_pt = pt;
                    next_bb = b;
                    break;
                }
            }

            if next_pt == PieceType::King {
                // Capturing with the king loses it right back if the
                // opponent still has attackers
                if attackers.0 & self.pieces_of_color(stm.opponent()).0 != 0 {
                    result = !result;
                }
                break;
            }

            // Null-window negamax step: (balance, balance+1) becomes
            // (-balance-1, -balance)
            balance = -balance - next_pt.value_mg() - 1;
            if balance >= 0 {
                break;
            }

            occupied.0 ^= bit_for_square(next_bb.lsb()).0;

            // Reveal x-ray attackers behind the consumed piece
            if matches!(
                next_pt,
                PieceType::Pawn | PieceType::Bishop | PieceType::Queen
            ) {
                attackers.0 |= attacks::bishop_attacks(to, occupied).0 & self.diagonal_sliders().0;
            }
            if matches!(next_pt, PieceType::Rook | PieceType::Queen) {
                attackers.0 |= attacks::rook_attacks(to, occupied).0 & self.orthogonal_sliders().0;
            }
        }

        result
    }
}
