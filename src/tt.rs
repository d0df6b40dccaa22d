//! Shared transposition table.
//!
//! One table serves every search worker. Entries are updated without locks;
//! a reader validates the 16-bit key tag before trusting a payload, and a
//! lost or torn update is only a cache miss, never an error. Moves pulled
//! from the table must still pass `pseudo_legal`/`legal` before use.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::thread;

use crate::position::{Move, Value};
use crate::zobrist::Key;

/// Search depth in plies.
pub type Depth = i32;

/// Kind of score bound stored with a search result.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bound {
    None = 0,
    Upper = 1,
    Lower = 2,
    Exact = 3,
}

impl Bound {
    fn from_bits(bits: u8) -> Bound {
        match bits & 3 {
            0 => Bound::None,
            1 => Bound::Upper,
            2 => Bound::Lower,
            _ => Bound::Exact,
        }
    }
}

const CLUSTER_SIZE: usize = 3;

/// Generations advance in steps of 8 so the low three bits of `gen_bound8`
/// stay free for the PV flag and the bound.
const GENERATION_DELTA: u8 = 8;

/// One 10-byte logical record, split across two atomic words so that no
/// reader can observe a torn record:
///
/// ```text
/// word0 = key16 | move16 << 16 | value16 << 32 | eval16 << 48
/// word1 = depth8 | gen_bound8 << 8
/// ```
///
/// `gen_bound8` packs `generation | (pv << 2) | bound`.
#[derive(Default)]
struct Entry {
    word0: AtomicU64,
    word1: AtomicU64,
}

impl Entry {
    #[inline]
    fn key16(&self) -> u16 {
        self.word0.load(Ordering::Relaxed) as u16
    }

    #[inline]
    fn gen_bound8(&self) -> u8 {
        (self.word1.load(Ordering::Relaxed) >> 8) as u8
    }

    #[inline]
    fn depth8(&self) -> i8 {
        self.word1.load(Ordering::Relaxed) as u8 as i8
    }

    /// Replacement value: stored depth discounted by 8 per generation of
    /// age. The 263 (= 256 + 7) keeps the packed low bits from affecting
    /// the result and handles generation wraparound.
    fn replace_score(&self, generation: u8) -> i32 {
        i32::from(self.depth8())
            - ((263 + i32::from(generation) - i32::from(self.gen_bound8())) & 0xF8)
    }
}

#[repr(align(64))]
#[derive(Default)]
struct Cluster {
    entries: [Entry; CLUSTER_SIZE],
}

/// Handle to one table slot, as returned by [`TranspositionTable::probe`].
///
/// Accessors decode whatever currently sits in the slot; `save` writes a
/// new record subject to the replacement policy.
pub struct TTEntry<'a> {
    entry: &'a Entry,
    generation: u8,
}

impl TTEntry<'_> {
    /// Stored move, `Move::NONE` when absent. May be stale or corrupted;
    /// validate with `pseudo_legal` before playing it.
    #[must_use]
    pub fn mv(&self) -> Move {
        Move::from_raw((self.entry.word0.load(Ordering::Relaxed) >> 16) as u16)
    }

    /// Stored search value
    #[must_use]
    pub fn value(&self) -> Value {
        Value::from((self.entry.word0.load(Ordering::Relaxed) >> 32) as u16 as i16)
    }

    /// Stored static evaluation
    #[must_use]
    pub fn eval(&self) -> Value {
        Value::from((self.entry.word0.load(Ordering::Relaxed) >> 48) as u16 as i16)
    }

    /// Stored search depth
    #[must_use]
    pub fn depth(&self) -> Depth {
        Depth::from(self.entry.depth8())
    }

    /// Stored bound kind
    #[must_use]
    pub fn bound(&self) -> Bound {
        Bound::from_bits(self.entry.gen_bound8())
    }

    /// Whether the entry was stored on a principal-variation node
    #[must_use]
    pub fn is_pv(&self) -> bool {
        self.entry.gen_bound8() & 4 != 0
    }

    /// Store a search result. An existing move for the same position is
    /// preserved when `mv` is `NONE`; the rest of the record is only
    /// overwritten when the key changed, the new depth is close enough, or
    /// the new bound is exact.
    pub fn save(
        &self,
        key: Key,
        value: Value,
        pv: bool,
        bound: Bound,
        depth: Depth,
        mv: Move,
        eval: Value,
    ) {
        let tag = (key >> 48) as u16;
        let word0 = self.entry.word0.load(Ordering::Relaxed);
        let old_tag = word0 as u16;
        let mut move16 = (word0 >> 16) as u16;

        if !mv.is_none() || tag != old_tag {
            move16 = mv.raw();
        }

        if tag != old_tag
            || depth > Depth::from(self.entry.depth8()) - 4
            || bound == Bound::Exact
        {
            let gen_bound = self.generation | (u8::from(pv) << 2) | bound as u8;
            let new_word0 = u64::from(tag)
                | (u64::from(move16) << 16)
                | (u64::from(value as i16 as u16) << 32)
                | (u64::from(eval as i16 as u16) << 48);
            let new_word1 = u64::from(depth as i8 as u8) | (u64::from(gen_bound) << 8);
            self.entry.word0.store(new_word0, Ordering::Relaxed);
            self.entry.word1.store(new_word1, Ordering::Relaxed);
        } else if move16 != (word0 >> 16) as u16 {
            self.entry
                .word0
                .store((word0 & !0xFFFF_0000) | (u64::from(move16) << 16), Ordering::Relaxed);
        }
    }
}

/// Cluster-bucketed hash table of prior search results, keyed by position
/// Zobrist hash.
///
/// `probe`/`save` may be called concurrently from any number of threads.
/// `clear` and `resize` take `&mut self`: callers must wait for searches to
/// finish first.
pub struct TranspositionTable {
    clusters: Vec<Cluster>,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Allocate a table of roughly `mb_size` megabytes.
    #[must_use]
    pub fn new(mb_size: usize) -> Self {
        TranspositionTable {
            clusters: Self::allocate(mb_size),
            generation: AtomicU8::new(0),
        }
    }

    fn allocate(mb_size: usize) -> Vec<Cluster> {
        let count = (mb_size * 1024 * 1024 / std::mem::size_of::<Cluster>()).max(1);
        let mut clusters = Vec::with_capacity(count);
        clusters.resize_with(count, Cluster::default);
        clusters
    }

    /// Throw away the current table and allocate a new one. A
    /// serialization point: no search may be in progress.
    pub fn resize(&mut self, mb_size: usize) {
        self.clusters = Self::allocate(mb_size);
    }

    /// Zero every entry, sharding the work over `threads` workers. A
    /// serialization point: no search may be in progress.
    pub fn clear(&mut self, threads: usize) {
        let threads = threads.max(1);
        let total = self.clusters.len();
        let stride = total / threads;

        thread::scope(|s| {
            for idx in 0..threads {
                let start = stride * idx;
                let len = if idx == threads - 1 {
                    total - start
                } else {
                    stride
                };
                let shard = &self.clusters[start..start + len];
                s.spawn(move || {
                    for cluster in shard {
                        for entry in &cluster.entries {
                            entry.word0.store(0, Ordering::Relaxed);
                            entry.word1.store(0, Ordering::Relaxed);
                        }
                    }
                });
            }
        });
    }

    /// Step the generation counter. Called once at the start of each root
    /// search so older entries age out of the replacement policy.
    pub fn new_search(&self) {
        self.generation
            .fetch_add(GENERATION_DELTA, Ordering::Relaxed);
    }

    /// Current generation bits.
    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Number of clusters in the table.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    // Multiply-shift maps the high key bits onto [0, cluster_count)
    // without requiring a power-of-two table size.
    fn cluster_index(&self, key: Key) -> usize {
        (((key >> 32) * self.clusters.len() as u64) >> 32) as usize
    }

    /// Look up `key`. Returns a handle to the matching or empty entry and
    /// whether the lookup hit; on a miss with a full cluster, the handle
    /// points at the entry the replacement policy gives up.
    pub fn probe(&self, key: Key) -> (TTEntry<'_>, bool) {
        let cluster = &self.clusters[self.cluster_index(key)];
        let tag = (key >> 48) as u16;
        let generation = self.generation();

        for entry in &cluster.entries {
            let key16 = entry.key16();
            if key16 == 0 || key16 == tag {
                // Refresh the generation, preserving the pv and bound bits
                let word1 = entry.word1.load(Ordering::Relaxed);
                let gen_bound = (word1 >> 8) as u8;
                let refreshed = generation | (gen_bound & 0x7);
                entry.word1.store(
                    (word1 & 0xFF) | (u64::from(refreshed) << 8),
                    Ordering::Relaxed,
                );

                return (TTEntry { entry, generation }, key16 != 0);
            }
        }

        let mut replace = &cluster.entries[0];
        for entry in &cluster.entries[1..] {
            if replace.replace_score(generation) > entry.replace_score(generation) {
                replace = entry;
            }
        }
        (
            TTEntry {
                entry: replace,
                generation,
            },
            false,
        )
    }

    /// Approximate table occupancy in permille, sampled over equispaced
    /// clusters. Counts only entries stored by the current search.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        let samples = if self.clusters.len() > 64_000_000 {
            10_000usize
        } else {
            1_000usize
        };
        let samples = samples.min(self.clusters.len());
        let stride = self.clusters.len() / samples;
        let generation = self.generation();

        let mut count = 0u32;
        for i in 0..samples {
            for entry in &self.clusters[i * stride].entries {
                if entry.gen_bound8() & 0xF8 == generation {
                    count += 1;
                }
            }
        }
        count * 1000 / (samples as u32 * CLUSTER_SIZE as u32)
    }
}
