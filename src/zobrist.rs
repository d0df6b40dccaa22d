//! Zobrist hashing key tables.
//!
//! Keys are drawn from a fixed-seed xorshift generator so every process
//! computes identical hashes for identical positions.

use once_cell::sync::Lazy;

/// 64-bit Zobrist hash of a position.
pub type Key = u64;

/// xorshift64* generator. Deterministic: the tables must reproduce exactly
/// across builds so that stored hashes stay comparable.
struct Prng(u64);

impl Prng {
    fn new(seed: u64) -> Self {
        Prng(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(2685821657736338717)
    }
}

const SEED: u64 = 1070372;

/// Indices into `psq` follow the piece encoding: white pieces 1-6,
/// black pieces 9-14, slots 0, 7, 8 and 15 unused.
pub(crate) struct ZobristKeys {
    pub psq: [[Key; 64]; 16],
    pub enpassant: [Key; 8],
    pub castling: [Key; 16],
    pub side: Key,
    pub no_pawns: Key,
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = Prng::new(SEED);

    let mut psq = [[0u64; 64]; 16];
    for piece in [1usize, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 14] {
        for sq in 0..64 {
            psq[piece][sq] = rng.next();
        }
    }

    let mut enpassant = [0u64; 8];
    for file in &mut enpassant {
        *file = rng.next();
    }

    // One atom per castling-right bit; a subset's key is the XOR of its
    // atoms, so castling[a | b] == castling[a] ^ castling[b].
    let mut castling = [0u64; 16];
    let atoms = [rng.next(), rng.next(), rng.next(), rng.next()];
    for (subset, slot) in castling.iter_mut().enumerate() {
        for (bit, atom) in atoms.iter().enumerate() {
            if subset & (1 << bit) != 0 {
                *slot ^= atom;
            }
        }
    }

    ZobristKeys {
        psq,
        enpassant,
        castling,
        no_pawns: rng.next(),
        side: rng.next(),
    }
});
