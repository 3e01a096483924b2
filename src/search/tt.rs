//! Transposition table for caching search results
//!
//! Results are keyed by position signature (stones, capture counters and side
//! to move). Slots are grouped in two-way buckets; on a full bucket the entry
//! from an older search is evicted first, then the shallower one.
//!
//! # Example
//!
//! ```
//! use gomoku::board::Pos;
//! use gomoku::search::{Bound, TranspositionTable, TtEntry};
//!
//! let mut tt = TranspositionTable::new(1);
//! let key = 0x1234_5678_9ABC_DEF0;
//! tt.store(key, TtEntry::new(key, Some(Pos::new(9, 9)), 100, 5, Bound::Exact));
//!
//! let entry = tt.lookup(key).unwrap();
//! assert_eq!(entry.cutoff(5, -1000, 1000), Some(100));
//! assert_eq!(entry.best_move, Some(Pos::new(9, 9)));
//! ```

use crate::board::Pos;

use super::MATE_BOUND;

const BUCKET_WAYS: usize = 2;

/// How a stored score relates to the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window.
    Exact,
    /// Failed high: true score >= stored.
    Lower,
    /// Failed low: true score <= stored.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u64,
    pub best_move: Option<Pos>,
    pub score: i32,
    pub depth: u8,
    pub bound: Bound,
    /// Search that wrote the entry. Set by the table on store.
    pub generation: u8,
}

impl TtEntry {
    pub fn new(key: u64, best_move: Option<Pos>, score: i32, depth: u8, bound: Bound) -> Self {
        Self {
            key,
            best_move,
            score,
            depth,
            bound,
            generation: 0,
        }
    }

    /// The stored score if it settles a node searched to `depth` with the
    /// window `[alpha, beta]`.
    #[inline]
    pub fn cutoff(&self, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

/// Convert a score found `ply` plies from the root into a position-relative
/// one for storage. Win scores carry the distance to the win.
#[inline]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
#[inline]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

type Bucket = [Option<TtEntry>; BUCKET_WAYS];

/// Bounded, position-keyed cache of search results.
pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: usize,
    generation: u8,
    probes: u64,
    hits: u64,
    stores: u64,
}

impl TranspositionTable {
    /// Table sized to at most `size_mb` megabytes, rounded down to a power of
    /// two buckets.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let fit = (bytes / std::mem::size_of::<Bucket>()).max(1024);
        // Largest power of two not above the budget
        let count = 1usize << (usize::BITS - 1 - fit.leading_zeros());
        log::trace!("transposition table: {count} buckets for {size_mb} MB");
        Self {
            buckets: vec![[None; BUCKET_WAYS]; count],
            mask: count - 1,
            generation: 0,
            probes: 0,
            hits: 0,
            stores: 0,
        }
    }

    #[inline]
    fn bucket_index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    pub fn lookup(&mut self, key: u64) -> Option<&TtEntry> {
        self.probes += 1;
        let idx = self.bucket_index(key);
        let found = self.buckets[idx].iter().flatten().find(|e| e.key == key);
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    /// Store `entry` under `key`, stamping it with the current generation.
    pub fn store(&mut self, key: u64, mut entry: TtEntry) {
        entry.key = key;
        entry.generation = self.generation;
        let generation = self.generation;
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];

        let slot = if let Some(i) = bucket.iter().position(|e| e.is_some_and(|e| e.key == key)) {
            i
        } else if let Some(i) = bucket.iter().position(|e| e.is_none()) {
            i
        } else if let Some(i) = bucket
            .iter()
            .position(|e| e.is_some_and(|e| e.generation != generation))
        {
            i
        } else {
            // Both current: evict the shallower
            let depth = |i: usize| bucket[i].map_or(0, |e| e.depth);
            if depth(0) <= depth(1) {
                0
            } else {
                1
            }
        };
        bucket[slot] = Some(entry);
        self.stores += 1;
    }

    /// Start a new search. Entries from earlier searches become preferred
    /// victims but stay usable.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.buckets.fill([None; BUCKET_WAYS]);
        self.generation = 0;
        self.probes = 0;
        self.hits = 0;
        self.stores = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_WAYS
    }

    #[must_use]
    pub fn stats(&self) -> TtStats {
        let used = self.buckets.iter().flatten().filter(|e| e.is_some()).count();
        TtStats {
            capacity: self.capacity(),
            used,
            probes: self.probes,
            hits: self.hits,
            stores: self.stores,
        }
    }
}

/// Table occupancy and traffic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtStats {
    pub capacity: usize,
    pub used: usize,
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

impl TtStats {
    pub fn usage_percent(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.used as f64 / self.capacity as f64 * 100.0
        }
    }

    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64 * 100.0
        }
    }
}
