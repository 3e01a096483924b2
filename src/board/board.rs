//! Board structure with capture counters and an incremental signature

use std::fmt;

use super::bitboard::Bitboard;
use super::zobrist;
use super::{Move, Pos, Stone, BOARD_SIZE, TOTAL_CELLS};
use crate::error::{GomokuError, Result};

/// One stone can flank at most one pair per ray.
pub const MAX_CAPTURE_PAIRS: usize = 8;

/// Pairs removed by a single move. Enough to undo the move exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureRecord {
    pairs: [[Pos; 2]; MAX_CAPTURE_PAIRS],
    len: u8,
}

impl CaptureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a captured pair. Extra pairs past the ray limit are ignored.
    pub fn push(&mut self, a: Pos, b: Pos) {
        if (self.len as usize) < MAX_CAPTURE_PAIRS {
            self.pairs[self.len as usize] = [a, b];
            self.len += 1;
        }
    }

    #[inline]
    pub fn pairs(&self) -> &[[Pos; 2]] {
        &self.pairs[..self.len as usize]
    }

    #[inline]
    pub fn pair_count(&self) -> u8 {
        self.len
    }

    #[inline]
    pub fn stone_count(&self) -> u8 {
        self.len * 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every captured stone position.
    pub fn stones(&self) -> impl Iterator<Item = Pos> + '_ {
        self.pairs().iter().flatten().copied()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.stones().any(|p| p == pos)
    }
}

/// Game board: stones, per-side captured pair counts and a Zobrist signature.
///
/// The board knows nothing about legality. Rule checks live in
/// [`crate::rules`]; the board only applies and reverts what it is told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    black: Bitboard,
    white: Bitboard,
    /// Pairs captured by each side.
    black_captures: u8,
    white_captures: u8,
    hash: u64,
}

impl Board {
    pub fn new() -> Self {
        let keys = zobrist::keys();
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
            black_captures: 0,
            white_captures: 0,
            hash: keys.captures(Stone::Black, 0) ^ keys.captures(Stone::White, 0),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Stone at a cell.
    #[inline]
    pub fn at(&self, pos: Pos) -> Stone {
        if self.black.contains(pos) {
            Stone::Black
        } else if self.white.contains(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Stone at host-supplied coordinates.
    pub fn at_coord(&self, row: i32, col: i32) -> Result<Stone> {
        Pos::try_new(row, col).map(|pos| self.at(pos))
    }

    /// Stone at signed coordinates, `None` off the board. Used by line scans.
    #[inline]
    pub fn cell(&self, row: i32, col: i32) -> Option<Stone> {
        if Pos::is_valid(row, col) {
            Some(self.at(Pos::new(row as u8, col as u8)))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.contains(pos) && !self.white.contains(pos)
    }

    /// Put a stone down without any capture processing. For setting up
    /// positions; game moves go through [`crate::rules::Rules::apply_move`].
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        debug_assert!(self.is_empty(pos), "place_stone on occupied {pos}");
        match stone {
            Stone::Black => self.black.insert(pos),
            Stone::White => self.white.insert(pos),
            Stone::Empty => return,
        }
        self.hash ^= zobrist::keys().stone(pos.to_index(), stone);
    }

    #[inline]
    pub fn remove_stone(&mut self, pos: Pos) {
        let stone = self.at(pos);
        match stone {
            Stone::Black => self.black.remove(pos),
            Stone::White => self.white.remove(pos),
            Stone::Empty => return,
        }
        self.hash ^= zobrist::keys().stone(pos.to_index(), stone);
    }

    /// Bitboard for a side (`None` for `Empty`).
    #[inline]
    pub fn stones(&self, side: Stone) -> Option<&Bitboard> {
        match side {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.black | self.white
    }

    /// Pairs captured by a side.
    #[inline]
    pub fn captures(&self, side: Stone) -> u8 {
        match side {
            Stone::Black => self.black_captures,
            Stone::White => self.white_captures,
            Stone::Empty => 0,
        }
    }

    /// Opponent stones removed by a side.
    #[inline]
    pub fn captured_stones(&self, side: Stone) -> u8 {
        self.captures(side).saturating_mul(2)
    }

    /// Overwrite a side's pair count. For setting up positions.
    pub fn set_captures(&mut self, side: Stone, pairs: u8) {
        let keys = zobrist::keys();
        let slot = match side {
            Stone::Black => &mut self.black_captures,
            Stone::White => &mut self.white_captures,
            Stone::Empty => return,
        };
        self.hash ^= keys.captures(side, *slot) ^ keys.captures(side, pairs);
        *slot = pairs;
    }

    #[inline]
    pub fn count(&self, side: Stone) -> u32 {
        self.stones(side).map_or(0, Bitboard::len)
    }

    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.len() + self.white.len()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == TOTAL_CELLS
    }

    /// Zobrist signature of stones and capture counters.
    #[inline]
    pub fn signature(&self) -> u64 {
        self.hash
    }

    /// Place `mv`, remove the recorded pairs and credit the mover.
    ///
    /// No legality checking: the rule engine computes `captures` and vouches
    /// for the move.
    pub fn apply(&mut self, mv: Move, captures: &CaptureRecord) {
        self.place_stone(mv.pos, mv.side);
        for pos in captures.stones() {
            self.remove_stone(pos);
        }
        if !captures.is_empty() {
            let pairs = self.captures(mv.side).saturating_add(captures.pair_count());
            self.set_captures(mv.side, pairs);
        }
    }

    /// Revert [`Board::apply`]. Fails without touching the board if the current
    /// position could not have come from applying `mv` with `captures`.
    pub fn undo(&mut self, mv: Move, captures: &CaptureRecord) -> Result<()> {
        if !mv.side.is_player() {
            return Err(GomokuError::InvariantViolation(format!(
                "undo of a move without a side at {}",
                mv.pos
            )));
        }
        if self.at(mv.pos) != mv.side {
            return Err(GomokuError::InvariantViolation(format!(
                "undo {mv}: cell holds {}",
                self.at(mv.pos)
            )));
        }
        if let Some(pos) = captures.stones().find(|&p| !self.is_empty(p)) {
            return Err(GomokuError::InvariantViolation(format!(
                "undo {mv}: captured cell {pos} is occupied"
            )));
        }
        let pairs = self.captures(mv.side);
        if pairs < captures.pair_count() {
            return Err(GomokuError::InvariantViolation(format!(
                "undo {mv}: {} pairs recorded but counter is {pairs}",
                captures.pair_count()
            )));
        }

        let victim = mv.side.opponent();
        for pos in captures.stones() {
            self.place_stone(pos, victim);
        }
        if !captures.is_empty() {
            self.set_captures(mv.side, pairs - captures.pair_count());
        }
        self.remove_stone(mv.pos);
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, "{:>2}", col % 10)?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{row:>2} ")?;
            for col in 0..BOARD_SIZE {
                write!(f, " {}", self.at(Pos::new(row as u8, col as u8)).symbol())?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "captures: X {} / O {}",
            self.captured_stones(Stone::Black),
            self.captured_stones(Stone::White)
        )
    }
}
