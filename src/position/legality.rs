//! Move legality predicates: `legal`, `pseudo_legal` and `gives_check`.

use super::attacks;
use super::state::Position;
use super::types::{bit_for_square, Bitboard, Move, MoveType, Piece, PieceType, Square, EAST, WEST};

impl Position {
    /// Test whether a pseudo-legal move is legal in the current position.
    #[must_use]
    pub fn legal(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let from = m.from_sq();
        let to = m.to_sq();

        debug_assert!(!self.piece_on(from).is_none() && self.piece_on(from).color() == us);

        // En passant: simulate the two-square occupancy change and make
        // sure no slider attacks the king along the opened rays
        if m.move_type() == MoveType::EnPassant {
            let ksq = self.king_square(us);
            let capsq = to.offset(-us.pawn_push());
            let occupied = Bitboard(
                (self.all_pieces().0 ^ bit_for_square(from).0 ^ bit_for_square(capsq).0)
                    | bit_for_square(to).0,
            );

            debug_assert!(Some(to) == self.ep_square());
            debug_assert!(self.piece_on(capsq) == Piece::make(them, PieceType::Pawn));

            return attacks::rook_attacks(ksq, occupied).0
                & (self.pieces(them, PieceType::Rook).0 | self.pieces(them, PieceType::Queen).0)
                == 0
                && attacks::bishop_attacks(ksq, occupied).0
                    & (self.pieces(them, PieceType::Bishop).0
                        | self.pieces(them, PieceType::Queen).0)
                    == 0;
        }

        // Castling: every square the king crosses must be unattacked. The
        // path-is-empty condition was already checked at generation time.
        if m.move_type() == MoveType::Castling {
            let kingside = to > from;
            let kto = if kingside { Square::G1 } else { Square::C1 }.relative(us);
            let enemies = self.pieces_of_color(them);

            // Walk from the destination back toward the king's origin,
            // destination included, origin excluded
            let step = if kto > from { WEST } else { EAST };
            let mut sq = kto;
            while sq != from {
                if self.attackers_to(sq).0 & enemies.0 != 0 {
                    return false;
                }
                sq = sq.offset(step);
            }

            // In Chess960 the rook move itself can uncover a slider on the
            // king's back rank
            return !self.chess960
                || attacks::rook_attacks(
                    kto,
                    Bitboard(self.all_pieces().0 ^ bit_for_square(to).0),
                )
                .0 & (self.pieces(them, PieceType::Rook).0
                    | self.pieces(them, PieceType::Queen).0)
                    == 0;
        }

        // King steps: the destination must be safe with the king itself
        // removed, so slider rays extend through its old square
        if self.piece_on(from).piece_type() == PieceType::King {
            return self
                .attackers_to_occ(to, Bitboard(self.all_pieces().0 ^ bit_for_square(from).0))
                .0
                & self.pieces_of_color(them).0
                == 0;
        }

        // Everything else: not pinned, or moving along the pin ray
        !self.blockers_for_king(us).contains(from)
            || attacks::aligned(from, to, self.king_square(us))
    }

    /// Test whether a move is pseudo-legal in the current position. Used to
    /// validate moves read from the transposition table, which can be
    /// corrupted by data races or key collisions.
    #[must_use]
    pub fn pseudo_legal(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let from = m.from_sq();
        let to = m.to_sq();
        let pc = self.piece_on(from);

        // Uncommon move types take the slow generator-backed path
        if m.move_type() != MoveType::Normal {
            return self.legal_moves().contains(m);
        }

        if pc.is_none() || pc.color() != us {
            return false;
        }

        if self.pieces_of_color(us).contains(to) {
            return false;
        }

        if pc.piece_type() == PieceType::Pawn {
            // Promotions were handled above, so the destination cannot be
            // on the last rank
            if Bitboard::RANK_1.contains(to) || Bitboard::RANK_8.contains(to) {
                return false;
            }

            let push = us.pawn_push();
            let is_capture = attacks::pawn_attacks(us, from).0
                & self.pieces_of_color(us.opponent()).0
                & bit_for_square(to).0
                != 0;
            let is_single_push =
                from.index() as i32 + i32::from(push) == to.index() as i32
                    && self.empty_square(to);
            let is_double_push = from.index() as i32 + 2 * i32::from(push) == to.index() as i32
                && from.relative_rank(us) == 1
                && self.empty_square(to)
                && self.empty_square(to.offset(-push));

            if !is_capture && !is_single_push && !is_double_push {
                return false;
            }
        } else if !attacks::attacks_bb(pc.piece_type(), from, self.all_pieces()).contains(to) {
            return false;
        }

        // Under check, only evasions are pseudo-legal: the generator
        // guarantees this shape and legal() relies on it
        if !self.checkers().is_empty() {
            if pc.piece_type() != PieceType::King {
                if self.checkers().more_than_one() {
                    return false;
                }
                let checker = self.checkers().lsb();
                let target = attacks::between(checker, self.king_square(us)).0
                    | self.checkers().0;
                if target & bit_for_square(to).0 == 0 {
                    return false;
                }
            } else if self
                .attackers_to_occ(to, Bitboard(self.all_pieces().0 ^ bit_for_square(from).0))
                .0
                & self.pieces_of_color(us.opponent()).0
                != 0
            {
                return false;
            }
        }

        true
    }

    /// Test whether a pseudo-legal move gives check, using the cached
    /// check squares and discovered-check candidates.
    #[must_use]
    pub fn gives_check(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let from = m.from_sq();
        let to = m.to_sq();

        debug_assert!(self.piece_on(from).color() == us);

        // Direct check
        if self
            .check_squares(self.piece_on(from).piece_type())
            .contains(to)
        {
            return true;
        }

        // Discovered check: a blocker leaves the ray to the enemy king
        let opp_ksq = self.king_square(them);
        if self.blockers_for_king(them).contains(from) && !attacks::aligned(from, to, opp_ksq) {
            return true;
        }

        match m.move_type() {
            MoveType::Normal => false,

            MoveType::Promotion => attacks::attacks_bb(
                m.promotion_type(),
                to,
                Bitboard(self.all_pieces().0 ^ bit_for_square(from).0),
            )
            .contains(opp_ksq),

            // Direct and ordinary discovered checks were handled above, so
            // only the discovery through the captured pawn remains
            MoveType::EnPassant => {
                let capsq = Square::new(from.rank(), to.file());
                let occupied = Bitboard(
                    (self.all_pieces().0 ^ bit_for_square(from).0 ^ bit_for_square(capsq).0)
                        | bit_for_square(to).0,
                );

                attacks::rook_attacks(opp_ksq, occupied).0
                    & (self.pieces(us, PieceType::Rook).0 | self.pieces(us, PieceType::Queen).0)
                    != 0
                    || attacks::bishop_attacks(opp_ksq, occupied).0
                        & (self.pieces(us, PieceType::Bishop).0
                            | self.pieces(us, PieceType::Queen).0)
                        != 0
            }

            MoveType::Castling => {
                let kfrom = from;
                let rfrom = to; // castling is encoded as "king captures rook"
                let kingside = rfrom > kfrom;
                let kto = if kingside { Square::G1 } else { Square::C1 }.relative(us);
                let rto = if kingside { Square::F1 } else { Square::D1 }.relative(us);

                attacks::pseudo_attacks(PieceType::Rook, rto).contains(opp_ksq)
                    && attacks::rook_attacks(
                        rto,
                        Bitboard(
                            (self.all_pieces().0
                                ^ bit_for_square(kfrom).0
                                ^ bit_for_square(rfrom).0)
                                | bit_for_square(rto).0
                                | bit_for_square(kto).0,
                        ),
                    )
                    .contains(opp_ksq)
            }
        }
    }
}
