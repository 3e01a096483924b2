//! Fixed-size bit set over the 361 board cells

use std::ops::{BitAnd, BitOr, Not};

use super::{Pos, TOTAL_CELLS};

const WORDS: usize = 6; // 6 * 64 = 384 >= 361

/// Mask of valid bits in the last word (361 - 5 * 64 = 41 cells).
const LAST_WORD_MASK: u64 = (1u64 << (TOTAL_CELLS - 5 * 64)) - 1;

/// One bit per cell, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    words: [u64; WORDS],
}

impl Bitboard {
    pub const fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    /// Every cell of the board.
    pub const fn full() -> Self {
        Self {
            words: [u64::MAX, u64::MAX, u64::MAX, u64::MAX, u64::MAX, LAST_WORD_MASK],
        }
    }

    #[inline]
    fn locate(pos: Pos) -> (usize, u64) {
        let idx = pos.to_index();
        (idx / 64, 1u64 << (idx % 64))
    }

    #[inline]
    pub fn insert(&mut self, pos: Pos) {
        let (word, mask) = Self::locate(pos);
        self.words[word] |= mask;
    }

    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        let (word, mask) = Self::locate(pos);
        self.words[word] &= !mask;
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        let (word, mask) = Self::locate(pos);
        self.words[word] & mask != 0
    }

    /// Number of set cells.
    #[inline]
    pub fn len(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Set cells in ascending index order.
    pub fn iter(&self) -> Cells {
        Cells {
            words: self.words,
            word_idx: 0,
        }
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(mut self, rhs: Bitboard) -> Bitboard {
        for (a, b) in self.words.iter_mut().zip(rhs.words) {
            *a |= b;
        }
        self
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(mut self, rhs: Bitboard) -> Bitboard {
        for (a, b) in self.words.iter_mut().zip(rhs.words) {
            *a &= b;
        }
        self
    }
}

impl Not for Bitboard {
    type Output = Bitboard;

    /// Complement restricted to the board.
    fn not(self) -> Bitboard {
        let mut out = Bitboard::full();
        for (a, b) in out.words.iter_mut().zip(self.words) {
            *a &= !b;
        }
        out
    }
}

impl<'a> IntoIterator for &'a Bitboard {
    type Item = Pos;
    type IntoIter = Cells;

    fn into_iter(self) -> Cells {
        self.iter()
    }
}

/// Iterator over the set cells of a [`Bitboard`].
pub struct Cells {
    words: [u64; WORDS],
    word_idx: usize,
}

impl Iterator for Cells {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        while self.word_idx < WORDS {
            let word = &mut self.words[self.word_idx];
            if *word == 0 {
                self.word_idx += 1;
                continue;
            }
            let bit = word.trailing_zeros() as usize;
            *word &= *word - 1;
            let idx = self.word_idx * 64 + bit;
            if idx < TOTAL_CELLS {
                return Some(Pos::from_index(idx));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut bb = Bitboard::new();
        let pos = Pos::new(18, 18);
        bb.insert(pos);
        assert!(bb.contains(pos));
        assert_eq!(bb.len(), 1);
        bb.remove(pos);
        assert!(bb.is_empty());
    }

    #[test]
    fn test_iter_ascending() {
        let mut bb = Bitboard::new();
        for pos in [Pos::new(18, 18), Pos::new(0, 0), Pos::new(9, 9), Pos::new(3, 17)] {
            bb.insert(pos);
        }
        let cells: Vec<Pos> = bb.iter().collect();
        assert_eq!(
            cells,
            vec![Pos::new(0, 0), Pos::new(3, 17), Pos::new(9, 9), Pos::new(18, 18)]
        );
    }

    #[test]
    fn test_full_and_complement() {
        assert_eq!(Bitboard::full().len() as usize, TOTAL_CELLS);
        let mut bb = Bitboard::new();
        bb.insert(Pos::new(4, 4));
        let rest = !bb;
        assert_eq!(rest.len() as usize, TOTAL_CELLS - 1);
        assert!(!rest.contains(Pos::new(4, 4)));
        assert!((rest & bb).is_empty());
        assert_eq!((rest | bb), Bitboard::full());
    }
}
