//! Zobrist keys for position signatures
//!
//! Keys are drawn once from a fixed-seed generator, so a position hashes to the
//! same signature in every run. The table is immutable after initialisation.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Stone, TOTAL_CELLS};

const SEED: u64 = 0x1234_5678_9ABC_DEF0;

/// Capture counters above this share a key; a pair count this high never
/// survives past a capture win anyway.
pub const MAX_HASHED_PAIRS: usize = 32;

pub struct ZobristKeys {
    stones: [[u64; TOTAL_CELLS]; 2],
    captures: [[u64; MAX_HASHED_PAIRS]; 2],
    white_to_move: u64,
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// The process-wide key table.
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(ZobristKeys::generate)
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut stones = [[0u64; TOTAL_CELLS]; 2];
        for side in stones.iter_mut() {
            for key in side.iter_mut() {
                *key = rng.random();
            }
        }
        let mut captures = [[0u64; MAX_HASHED_PAIRS]; 2];
        for side in captures.iter_mut() {
            for key in side.iter_mut() {
                *key = rng.random();
            }
        }
        Self {
            stones,
            captures,
            white_to_move: rng.random(),
        }
    }

    /// Key for `stone` on cell `idx`; zero for `Empty`.
    #[inline]
    pub fn stone(&self, idx: usize, stone: Stone) -> u64 {
        match stone.side_index() {
            Some(side) => self.stones[side][idx],
            None => 0,
        }
    }

    /// Key for `side` having captured `pairs` pairs.
    #[inline]
    pub fn captures(&self, side: Stone, pairs: u8) -> u64 {
        match side.side_index() {
            Some(s) => self.captures[s][(pairs as usize).min(MAX_HASHED_PAIRS - 1)],
            None => 0,
        }
    }

    /// Mixed into search keys so the same stones with a different side to move
    /// never share a table slot.
    #[inline]
    pub fn side_to_move(&self, side: Stone) -> u64 {
        if side == Stone::White {
            self.white_to_move
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_stable() {
        let a = keys().stone(180, Stone::Black);
        let b = ZobristKeys::generate().stone(180, Stone::Black);
        assert_eq!(a, b);
    }

    #[test]
    fn test_keys_distinct() {
        let k = keys();
        assert_ne!(k.stone(0, Stone::Black), k.stone(0, Stone::White));
        assert_ne!(k.stone(0, Stone::Black), k.stone(1, Stone::Black));
        assert_ne!(k.captures(Stone::Black, 1), k.captures(Stone::Black, 2));
        assert_eq!(k.stone(5, Stone::Empty), 0);
        assert_eq!(k.side_to_move(Stone::Black), 0);
        assert_ne!(k.side_to_move(Stone::White), 0);
    }
}
