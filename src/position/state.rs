//! Position state: piece placement, per-ply state stack, attack queries.

use crate::sync::NodeCounter;
use crate::zobrist::{Key, ZOBRIST};

use super::attacks;
use super::types::{
    bit_for_square, Bitboard, CastlingRights, Color, Move, Piece, PieceType, Square, Value,
    ALL_PIECES,
};

/// Per-ply state, one entry per move made. The fields above `key` are
/// carried over on `do_move` and patched incrementally; the rest are
/// recomputed for the new ply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StateInfo {
    // Incrementally maintained
    pub pawn_key: Key,
    pub material_key: Key,
    pub non_pawn_material: [Value; 2],
    pub castling_rights: CastlingRights,
    pub rule50: i32,
    pub plies_from_null: i32,
    pub ep_square: Option<Square>,

    // Recomputed each ply
    pub key: Key,
    pub checkers: Bitboard,
    pub blockers_for_king: [Bitboard; 2],
    pub pinners: [Bitboard; 2],
    pub check_squares: [Bitboard; 6],
    pub captured_piece: Piece,
    pub repetition: i32,
}

impl StateInfo {
    pub(crate) fn new() -> Self {
        StateInfo {
            pawn_key: 0,
            material_key: 0,
            non_pawn_material: [0; 2],
            castling_rights: CastlingRights::NONE,
            rule50: 0,
            plies_from_null: 0,
            ep_square: None,
            key: 0,
            checkers: Bitboard::EMPTY,
            blockers_for_king: [Bitboard::EMPTY; 2],
            pinners: [Bitboard::EMPTY; 2],
            check_squares: [Bitboard::EMPTY; 6],
            captured_piece: Piece::NONE,
            repetition: 0,
        }
    }
}

/// A chess position with its undo stack.
///
/// One instance is owned by one search thread; `do_move`/`undo_move` are not
/// safe to call concurrently. The embedded [`NodeCounter`] is the only state
/// shared across threads.
#[derive(Clone, Debug)]
pub struct Position {
    pub(crate) board: [Piece; 64],
    pub(crate) by_type: [Bitboard; 6],
    pub(crate) by_color: [Bitboard; 2],
    pub(crate) occupied: Bitboard,
    pub(crate) piece_count: [u8; 16],

    pub(crate) castling_rights_mask: [u8; 64],
    pub(crate) castling_rook_square: [Option<Square>; 16],
    pub(crate) castling_path: [Bitboard; 16],

    pub(crate) side_to_move: Color,
    pub(crate) game_ply: i32,
    pub(crate) chess960: bool,
    pub(crate) nodes: NodeCounter,

    pub(crate) states: Vec<StateInfo>,
}

impl Position {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("start position FEN is valid")
    }

    pub(crate) fn empty() -> Self {
        Position {
            board: [Piece::NONE; 64],
            by_type: [Bitboard::EMPTY; 6],
            by_color: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            piece_count: [0; 16],
            castling_rights_mask: [0; 64],
            castling_rook_square: [None; 16],
            castling_path: [Bitboard::EMPTY; 16],
            side_to_move: Color::White,
            game_ply: 0,
            chess960: false,
            nodes: NodeCounter::new(),
            states: vec![StateInfo::new()],
        }
    }

    // --- state stack ---

    #[inline]
    pub(crate) fn st(&self) -> &StateInfo {
        self.states.last().expect("state stack is never empty")
    }

    #[inline]
    pub(crate) fn st_mut(&mut self) -> &mut StateInfo {
        self.states.last_mut().expect("state stack is never empty")
    }

    // --- accessors ---

    /// Side to move
    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Ply counter since the start of the game
    #[inline]
    #[must_use]
    pub fn game_ply(&self) -> i32 {
        self.game_ply
    }

    /// Returns true when set up with Chess960 castling rules
    #[inline]
    #[must_use]
    pub fn is_chess960(&self) -> bool {
        self.chess960
    }

    /// Zobrist hash of the position
    #[inline]
    #[must_use]
    pub fn key(&self) -> Key {
        self.st().key
    }

    /// Zobrist hash of the pawn structure only
    #[inline]
    #[must_use]
    pub fn pawn_key(&self) -> Key {
        self.st().pawn_key
    }

    /// Zobrist hash of the material configuration
    #[inline]
    #[must_use]
    pub fn material_key(&self) -> Key {
        self.st().material_key
    }

    /// Pieces currently giving check
    #[inline]
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.st().checkers
    }

    /// Pieces of either color shielding `color`'s king from a slider
    #[inline]
    #[must_use]
    pub fn blockers_for_king(&self, color: Color) -> Bitboard {
        self.st().blockers_for_king[color.index()]
    }

    /// `color`'s sliders that pin an enemy blocker to the enemy king
    #[inline]
    #[must_use]
    pub fn pinners(&self, color: Color) -> Bitboard {
        self.st().pinners[color.index()]
    }

    /// Squares from which a piece of `pt` would check the enemy king
    #[inline]
    #[must_use]
    pub fn check_squares(&self, pt: PieceType) -> Bitboard {
        self.st().check_squares[pt.index()]
    }

    /// En-passant target square, if a double push just happened and a
    /// capture is actually possible
    #[inline]
    #[must_use]
    pub fn ep_square(&self) -> Option<Square> {
        self.st().ep_square
    }

    /// Halfmove clock for the fifty-move rule
    #[inline]
    #[must_use]
    pub fn rule50_count(&self) -> i32 {
        self.st().rule50
    }

    /// Current castling rights
    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.st().castling_rights
    }

    /// Non-pawn material value for a color
    #[inline]
    #[must_use]
    pub fn non_pawn_material(&self, color: Color) -> Value {
        self.st().non_pawn_material[color.index()]
    }

    /// Piece captured by the last move
    #[inline]
    #[must_use]
    pub fn captured_piece(&self) -> Piece {
        self.st().captured_piece
    }

    /// Total nodes counted by this position's shared counter
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes.get()
    }

    /// Attach a shared node counter (one per worker thread).
    pub fn set_node_counter(&mut self, nodes: NodeCounter) {
        self.nodes = nodes;
    }

    /// Piece on a square, `Piece::NONE` when empty
    #[inline]
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    /// Returns true if the square is empty
    #[inline]
    #[must_use]
    pub fn empty_square(&self, sq: Square) -> bool {
        self.board[sq.index()].is_none()
    }

    /// All occupied squares
    #[inline]
    #[must_use]
    pub fn all_pieces(&self) -> Bitboard {
        self.occupied
    }

    /// All pieces of one type, both colors
    #[inline]
    #[must_use]
    pub fn pieces_of_type(&self, pt: PieceType) -> Bitboard {
        self.by_type[pt.index()]
    }

    /// All pieces of one color
    #[inline]
    #[must_use]
    pub fn pieces_of_color(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    /// Pieces of one color and type
    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, pt: PieceType) -> Bitboard {
        Bitboard(self.by_color[color.index()].0 & self.by_type[pt.index()].0)
    }

    /// Number of pieces of one color and type
    #[inline]
    #[must_use]
    pub fn count(&self, color: Color, pt: PieceType) -> u8 {
        self.piece_count[Piece::make(color, pt).index()]
    }

    /// The king square of a color
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, PieceType::King).lsb()
    }

    /// Rook square associated with a castling right
    #[inline]
    #[must_use]
    pub fn castling_rook_square(&self, cr: CastlingRights) -> Option<Square> {
        self.castling_rook_square[cr.index()]
    }

    /// Bishops, queens of both colors
    #[inline]
    pub(crate) fn diagonal_sliders(&self) -> Bitboard {
        Bitboard(self.by_type[PieceType::Bishop.index()].0 | self.by_type[PieceType::Queen.index()].0)
    }

    /// Rooks, queens of both colors
    #[inline]
    pub(crate) fn orthogonal_sliders(&self) -> Bitboard {
        Bitboard(self.by_type[PieceType::Rook.index()].0 | self.by_type[PieceType::Queen.index()].0)
    }

    // --- board editing ---

    pub(crate) fn put_piece(&mut self, pc: Piece, sq: Square) {
        let bit = bit_for_square(sq).0;
        self.board[sq.index()] = pc;
        self.by_type[pc.piece_type().index()].0 |= bit;
        self.by_color[pc.color().index()].0 |= bit;
        self.occupied.0 |= bit;
        self.piece_count[pc.index()] += 1;
    }

    pub(crate) fn remove_piece(&mut self, pc: Piece, sq: Square) {
        let bit = bit_for_square(sq).0;
        self.board[sq.index()] = Piece::NONE;
        self.by_type[pc.piece_type().index()].0 &= !bit;
        self.by_color[pc.color().index()].0 &= !bit;
        self.occupied.0 &= !bit;
        self.piece_count[pc.index()] -= 1;
    }

    pub(crate) fn move_piece(&mut self, pc: Piece, from: Square, to: Square) {
        let from_to = bit_for_square(from).0 | bit_for_square(to).0;
        self.board[from.index()] = Piece::NONE;
        self.board[to.index()] = pc;
        self.by_type[pc.piece_type().index()].0 ^= from_to;
        self.by_color[pc.color().index()].0 ^= from_to;
        self.occupied.0 ^= from_to;
    }

    // --- attack queries ---

    /// All pieces of both colors attacking `sq` with the current occupancy.
    #[inline]
    #[must_use]
    pub fn attackers_to(&self, sq: Square) -> Bitboard {
        self.attackers_to_occ(sq, self.occupied)
    }

    /// All pieces of both colors attacking `sq`, with sliders seeing
    /// through the given occupancy.
    #[must_use]
    pub fn attackers_to_occ(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        Bitboard(
            (attacks::pawn_attacks(Color::Black, sq).0
                & self.pieces(Color::White, PieceType::Pawn).0)
                | (attacks::pawn_attacks(Color::White, sq).0
                    & self.pieces(Color::Black, PieceType::Pawn).0)
                | (attacks::knight_attacks(sq).0 & self.by_type[PieceType::Knight.index()].0)
                | (attacks::rook_attacks(sq, occupied).0 & self.orthogonal_sliders().0)
                | (attacks::bishop_attacks(sq, occupied).0 & self.diagonal_sliders().0)
                | (attacks::king_attacks(sq).0 & self.by_type[PieceType::King.index()].0),
        )
    }

    /// Pieces of both colors blocking slider attacks from `sliders` onto
    /// `sq`, plus the subset of `sliders` that pin a blocker of the same
    /// color as the piece on `sq`.
    #[must_use]
    pub fn slider_blockers(&self, sliders: Bitboard, sq: Square) -> (Bitboard, Bitboard) {
        let mut blockers = 0u64;
        let mut pinners = 0u64;

        // Snipers: sliders that would attack sq over an otherwise empty board
        let snipers = ((attacks::pseudo_attacks(PieceType::Rook, sq).0
            & self.orthogonal_sliders().0)
            | (attacks::pseudo_attacks(PieceType::Bishop, sq).0 & self.diagonal_sliders().0))
            & sliders.0;
        let occupancy = self.occupied.0 ^ snipers;

        let sq_color_bb = if self.board[sq.index()].is_none() {
            0
        } else {
            self.by_color[self.board[sq.index()].color().index()].0
        };

        for sniper in Bitboard(snipers).iter() {
            let b = attacks::between(sq, sniper).0 & occupancy;
            if b != 0 && !Bitboard(b).more_than_one() {
                blockers |= b;
                if b & sq_color_bb != 0 {
                    pinners |= bit_for_square(sniper).0;
                }
            }
        }
        (Bitboard(blockers), Bitboard(pinners))
    }

    // --- derived state ---

    /// Recompute the check-related caches of the top state: blockers and
    /// pinners for both kings, and the squares from which each piece type
    /// would check the opponent of the side to move.
    pub(crate) fn set_check_info(&mut self) {
        let (blockers_w, pinners_b) =
            self.slider_blockers(self.by_color[Color::Black.index()], self.king_square(Color::White));
        let (blockers_b, pinners_w) =
            self.slider_blockers(self.by_color[Color::White.index()], self.king_square(Color::Black));

        let them = self.side_to_move.opponent();
        let ksq = self.king_square(them);
        let occ = self.occupied;

        let bishop = attacks::bishop_attacks(ksq, occ);
        let rook = attacks::rook_attacks(ksq, occ);
        let check_squares = [
            attacks::pawn_attacks(them, ksq),
            attacks::knight_attacks(ksq),
            bishop,
            rook,
            Bitboard(bishop.0 | rook.0),
            Bitboard::EMPTY,
        ];

        let st = self.st_mut();
        st.blockers_for_king = [blockers_w, blockers_b];
        st.pinners = [pinners_w, pinners_b];
        st.check_squares = check_squares;
    }

    /// Recompute every hash key and derived field of the top state from
    /// scratch. Used at setup time and by the debug consistency check.
    pub(crate) fn set_state(&mut self) {
        let (key, pawn_key, material_key, non_pawn_material) = self.compute_keys();
        let checkers = Bitboard(
            self.attackers_to(self.king_square(self.side_to_move)).0
                & self.by_color[self.side_to_move.opponent().index()].0,
        );

        let st = self.st_mut();
        st.key = key;
        st.pawn_key = pawn_key;
        st.material_key = material_key;
        st.non_pawn_material = non_pawn_material;
        st.checkers = checkers;

        self.set_check_info();
    }

    /// From-scratch computation of (key, pawn_key, material_key,
    /// non_pawn_material), using the top state's side/ep/castling fields.
    pub(crate) fn compute_keys(&self) -> (Key, Key, Key, [Value; 2]) {
        let mut key: Key = 0;
        let mut pawn_key: Key = ZOBRIST.no_pawns;
        let mut material_key: Key = 0;
        let mut npm = [0; 2];

        for sq in self.occupied.iter() {
            let pc = self.piece_on(sq);
            key ^= ZOBRIST.psq[pc.index()][sq.index()];
            match pc.piece_type() {
                PieceType::Pawn => pawn_key ^= ZOBRIST.psq[pc.index()][sq.index()],
                PieceType::King => {}
                pt => npm[pc.color().index()] += pt.value_mg(),
            }
        }

        if let Some(ep) = self.st().ep_square {
            key ^= ZOBRIST.enpassant[ep.file()];
        }
        if self.side_to_move == Color::Black {
            key ^= ZOBRIST.side;
        }
        key ^= ZOBRIST.castling[self.st().castling_rights.index()];

        for pc in ALL_PIECES {
            for cnt in 0..self.piece_count[pc.index()] {
                material_key ^= ZOBRIST.psq[pc.index()][cnt as usize];
            }
        }

        (key, pawn_key, material_key, npm)
    }

    /// Hash key after a normal move, for speculative transposition table
    /// prefetch. Does not handle castling, en passant or promotions.
    #[must_use]
    pub fn key_after(&self, m: Move) -> Key {
        let from = m.from_sq();
        let to = m.to_sq();
        let pc = self.piece_on(from);
        let captured = self.piece_on(to);
        let mut k = self.st().key ^ ZOBRIST.side;

        if !captured.is_none() {
            k ^= ZOBRIST.psq[captured.index()][to.index()];
        }
        k ^ ZOBRIST.psq[pc.index()][to.index()] ^ ZOBRIST.psq[pc.index()][from.index()]
    }

    // --- draws ---

    /// Whether the position is drawn by repetition: one repeat strictly
    /// after the root (`ply`), or a position already repeated before the
    /// root. Does not detect stalemates.
    #[must_use]
    pub fn is_draw(&self, ply: i32) -> bool {
        self.st().repetition != 0 && self.st().repetition < ply
    }

    /// Whether any position since the last irreversible move has repeated.
    #[must_use]
    pub fn has_repeated(&self) -> bool {
        let mut end = self.st().rule50.min(self.st().plies_from_null);
        let mut idx = self.states.len() - 1;
        while end >= 4 {
            if self.states[idx].repetition != 0 {
                return true;
            }
            idx -= 1;
            end -= 1;
        }
        false
    }

    // --- debug validation ---

    /// Expensive consistency check, asserted after `set`, `do_move` and
    /// `undo_move` in debug builds only.
    pub(crate) fn is_consistent(&self) -> bool {
        use super::types::Bitboard as BB;

        // Exactly one king each, and the side that just moved must not have
        // left its king attacked.
        if self.count(Color::White, PieceType::King) != 1
            || self.count(Color::Black, PieceType::King) != 1
        {
            return false;
        }
        let them = self.side_to_move.opponent();
        if self.attackers_to(self.king_square(them)).0 & self.pieces_of_color(self.side_to_move).0
            != 0
        {
            return false;
        }

        // Pawns stay off the back ranks and within count limits
        let pawns = self.by_type[PieceType::Pawn.index()];
        if pawns.0 & (BB::RANK_1.0 | BB::RANK_8.0) != 0
            || self.count(Color::White, PieceType::Pawn) > 8
            || self.count(Color::Black, PieceType::Pawn) > 8
        {
            return false;
        }

        // Bitboard sets partition the occupancy
        if self.by_color[0].0 & self.by_color[1].0 != 0
            || self.by_color[0].0 | self.by_color[1].0 != self.occupied.0
        {
            return false;
        }
        let mut union = 0u64;
        for (i, a) in self.by_type.iter().enumerate() {
            for b in &self.by_type[i + 1..] {
                if a.0 & b.0 != 0 {
                    return false;
                }
            }
            union |= a.0;
        }
        if union != self.occupied.0 {
            return false;
        }

        // Board array, bitboards and counts agree
        for pc in ALL_PIECES {
            let bb = self.pieces(pc.color(), pc.piece_type());
            if bb.popcount() != u32::from(self.piece_count[pc.index()]) {
                return false;
            }
            for sq in bb.iter() {
                if self.board[sq.index()] != pc {
                    return false;
                }
            }
        }

        // En passant square sits on the relative sixth rank
        if let Some(ep) = self.st().ep_square {
            if ep.relative_rank(self.side_to_move) != 5 {
                return false;
            }
        }

        // Incremental keys match a from-scratch recomputation
        let (key, pawn_key, material_key, npm) = self.compute_keys();
        if key != self.st().key
            || pawn_key != self.st().pawn_key
            || material_key != self.st().material_key
            || npm != self.st().non_pawn_material
        {
            return false;
        }

        // Castling bookkeeping is self-consistent
        for color in Color::BOTH {
            for cr in [
                CastlingRights::kingside(color),
                CastlingRights::queenside(color),
            ] {
                if !self.st().castling_rights.has(cr) {
                    continue;
                }
                let Some(rsq) = self.castling_rook_square[cr.index()] else {
                    return false;
                };
                if self.piece_on(rsq) != Piece::make(color, PieceType::Rook)
                    || self.castling_rights_mask[rsq.index()] & cr.as_u8() != cr.as_u8()
                    || self.castling_rights_mask[self.king_square(color).index()] & cr.as_u8()
                        != cr.as_u8()
                {
                    return false;
                }
            }
        }

        true
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
