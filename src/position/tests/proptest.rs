//! Property-based tests over random legal move sequences.

use proptest::prelude::*;

use super::super::state::Position;
use super::super::types::Move;

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Drive a reproducible random game from the start position.
fn random_walk(seed: u64, num_moves: usize, mut visit: impl FnMut(&mut Position, Move)) {
    use rand::prelude::*;

    let mut pos = Position::new();
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..num_moves {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            break;
        }
        let m = moves[rng.gen_range(0..moves.len())];
        visit(&mut pos, m);
    }
}

proptest! {
    /// do_move followed by undo_move restores the position exactly
    #[test]
    fn prop_do_undo_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut pos = Position::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let initial_fen = pos.fen();
        let initial_key = pos.key();

        let mut history = Vec::new();
        for _ in 0..num_moves {
            let moves = pos.legal_moves();
            if moves.is_empty() {
                break;
            }
            let m = moves[rng.gen_range(0..moves.len())];
            let st_before = pos.st().clone();
            pos.do_move(m, pos.gives_check(m));
            history.push((m, st_before));
        }

        while let Some((m, st_before)) = history.pop() {
            pos.undo_move(m);
            prop_assert_eq!(pos.st(), &st_before);
        }

        prop_assert_eq!(pos.fen(), initial_fen);
        prop_assert_eq!(pos.key(), initial_key);
    }

    /// Incrementally maintained keys always match a recomputation
    #[test]
    fn prop_incremental_keys_match_recomputed(seed in seed_strategy(), num_moves in move_count_strategy()) {
        random_walk(seed, num_moves, |pos, m| {
            pos.do_move(m, pos.gives_check(m));
            let (key, pawn_key, material_key, npm) = pos.compute_keys();
            assert_eq!(pos.key(), key);
            assert_eq!(pos.pawn_key(), pawn_key);
            assert_eq!(pos.material_key(), material_key);
            assert_eq!(pos.st().non_pawn_material, npm);
        });
    }

    /// FEN round-trips through parse and emit
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        random_walk(seed, num_moves, |pos, m| {
            pos.do_move(m, pos.gives_check(m));
            let fen = pos.fen();
            let restored = Position::from_fen(&fen).expect("emitted FEN parses");
            assert_eq!(restored.fen(), fen);
            assert_eq!(restored.key(), pos.key());
            assert_eq!(restored.material_key(), pos.material_key());
        });
    }

    /// Legal moves never leave the mover's king attacked
    #[test]
    fn prop_legal_moves_keep_king_safe(seed in seed_strategy(), num_moves in move_count_strategy()) {
        random_walk(seed, num_moves, |pos, m| {
            let us = pos.side_to_move();
            pos.do_move(m, pos.gives_check(m));
            let ksq = pos.king_square(us);
            assert!(
                (pos.attackers_to(ksq).0 & pos.pieces_of_color(us.opponent()).0) == 0,
                "king left en prise by {m:?}"
            );
        });
    }

    /// gives_check agrees with the checkers bitboard after the move
    #[test]
    fn prop_gives_check_matches(seed in seed_strategy(), num_moves in move_count_strategy()) {
        random_walk(seed, num_moves, |pos, m| {
            let announced = pos.gives_check(m);
            pos.do_move(m, announced);
            assert_eq!(announced, !pos.checkers().is_empty());
        });
    }

    /// Every generated legal move passes pseudo_legal
    #[test]
    fn prop_legal_implies_pseudo_legal(seed in seed_strategy(), num_moves in move_count_strategy()) {
        random_walk(seed, num_moves, |pos, m| {
            for &candidate in &pos.legal_moves() {
                assert!(pos.pseudo_legal(candidate));
            }
            pos.do_move(m, pos.gives_check(m));
        });
    }

    /// see_ge is monotone in the threshold
    #[test]
    fn prop_see_ge_monotone(seed in seed_strategy(), num_moves in move_count_strategy()) {
        random_walk(seed, num_moves, |pos, m| {
            let thresholds = [-900, -330, -100, -1, 0, 1, 100, 330, 900];
            let mut prev = true;
            // Walking thresholds upward, pass can only flip to fail once
            for &t in &thresholds {
                let now = pos.see_ge(m, t);
                assert!(prev || !now, "see_ge not monotone for {m:?} at {t}");
                prev = now;
            }
            pos.do_move(m, pos.gives_check(m));
        });
    }
}
