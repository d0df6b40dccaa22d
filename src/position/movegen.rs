//! Reference legal move generation.
//!
//! Generates the full pseudo-legal move set and filters it down to legal
//! moves. The search's staged generator lives elsewhere; this one backs
//! `pseudo_legal`'s slow path, perft and the board dump.

use super::attacks;
use super::state::Position;
use super::types::{
    bit_for_square, Bitboard, CastlingRights, Move, MoveList, MoveType, PieceType,
};

const PROMOTION_TYPES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

impl Position {
    /// All legal moves in the current position.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let mut pseudo = MoveList::new();
        self.generate_pseudo_legal(&mut pseudo);

        let mut list = MoveList::new();
        for &m in &pseudo {
            if self.resolves_check(m) && self.legal(m) {
                list.push(m);
            }
        }
        list
    }

    /// Number of legal moves to a given depth, via full make/unmake. The
    /// standard correctness workout for move execution.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for &m in moves.as_slice() {
            let gives_check = self.gives_check(m);
            self.do_move(m, gives_check);
            nodes += self.perft(depth - 1);
            self.undo_move(m);
        }
        nodes
    }

    /// When in check, pseudo-legal moves must block the check, capture the
    /// checker, or move the king; `legal` assumes its input has this shape.
    fn resolves_check(&self, m: Move) -> bool {
        if self.checkers().is_empty() {
            return true;
        }

        let us = self.side_to_move();
        if self.piece_on(m.from_sq()).piece_type() == PieceType::King {
            return true; // legal() checks the destination
        }
        if self.checkers().more_than_one() {
            return false;
        }

        let checker = self.checkers().lsb();
        let ksq = self.king_square(us);

        if m.move_type() == MoveType::EnPassant {
            // The captured pawn may itself be the checker
            let capsq = m.to_sq().offset(-us.pawn_push());
            return capsq == checker || attacks::between(checker, ksq).contains(m.to_sq());
        }

        (attacks::between(checker, ksq).0 | bit_for_square(checker).0)
            & bit_for_square(m.to_sq()).0
            != 0
    }

    fn generate_pseudo_legal(&self, list: &mut MoveList) {
        let us = self.side_to_move();
        let them = us.opponent();
        let occupied = self.all_pieces();
        let own = self.pieces_of_color(us);
        let enemies = self.pieces_of_color(them);
        let push = us.pawn_push();

        for from in self.pieces(us, PieceType::Pawn).iter() {
            let single = from.offset(push);
            if self.empty_square(single) {
                if single.relative_rank(us) == 7 {
                    for pt in PROMOTION_TYPES {
                        list.push(Move::promotion(from, single, pt));
                    }
                } else {
                    list.push(Move::new(from, single));
                    if from.relative_rank(us) == 1 {
                        let double = single.offset(push);
                        if self.empty_square(double) {
                            list.push(Move::new(from, double));
                        }
                    }
                }
            }

            let attacks_from = attacks::pawn_attacks(us, from);
            for to in Bitboard(attacks_from.0 & enemies.0).iter() {
                if to.relative_rank(us) == 7 {
                    for pt in PROMOTION_TYPES {
                        list.push(Move::promotion(from, to, pt));
                    }
                } else {
                    list.push(Move::new(from, to));
                }
            }

            if let Some(ep) = self.ep_square() {
                if attacks_from.contains(ep) {
                    list.push(Move::en_passant(from, ep));
                }
            }
        }

        for pt in [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
            PieceType::King,
        ] {
            for from in self.pieces(us, pt).iter() {
                let targets = Bitboard(attacks::attacks_bb(pt, from, occupied).0 & !own.0);
                for to in targets.iter() {
                    list.push(Move::new(from, to));
                }
            }
        }

        if self.checkers().is_empty() {
            for cr in [
                CastlingRights::kingside(us),
                CastlingRights::queenside(us),
            ] {
                if self.castling_rights().has(cr)
                    && self.castling_path[cr.index()].0 & occupied.0 == 0
                {
                    if let Some(rsq) = self.castling_rook_square(cr) {
                        list.push(Move::castling(self.king_square(us), rsq));
                    }
                }
            }
        }
    }

    /// Find a legal move by its coordinate notation (castling written as
    /// king-takes-rook, e.g. `e1h1`).
    #[must_use]
    pub fn find_move(&self, notation: &str) -> Option<Move> {
        self.legal_moves()
            .iter()
            .copied()
            .find(|m| m.to_string() == notation)
    }

    /// Convenience used by tests and the UCI `position` handler: find and
    /// play a move given in coordinate notation.
    pub fn play(&mut self, notation: &str) -> Option<Move> {
        let m = self.find_move(notation)?;
        let gives_check = self.gives_check(m);
        self.do_move(m, gives_check);
        Some(m)
    }
}
