//! Double-three detection
//!
//! A free three is three stones in a line that become an open four
//! (`_XXXX_`) with one more stone, e.g. `_XXX_`, `_XX_X_`, `_X_XX_`. A move
//! that makes two free threes in different directions at once is a
//! double-three.
//!
//! The capture exception is applied by [`Rules`](super::Rules), not here.

use crate::board::{Board, Pos, Stone, DIRECTIONS};

/// Cells scanned each side of the move.
const REACH: i32 = 5;
const LINE_LEN: usize = (2 * REACH + 1) as usize;
const CENTER: usize = REACH as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Own,
    Empty,
    /// Opponent stone or off the board.
    Blocked,
}

/// The line through `pos` along `(dr, dc)`, with `pos` counted as `side`'s.
fn read_line(board: &Board, pos: Pos, side: Stone, dr: i32, dc: i32) -> [Cell; LINE_LEN] {
    let mut line = [Cell::Blocked; LINE_LEN];
    for (i, cell) in line.iter_mut().enumerate() {
        let step = i as i32 - REACH;
        *cell = if step == 0 {
            Cell::Own
        } else {
            match board.cell(pos.row as i32 + dr * step, pos.col as i32 + dc * step) {
                Some(s) if s == side => Cell::Own,
                Some(Stone::Empty) => Cell::Empty,
                _ => Cell::Blocked,
            }
        };
    }
    line
}

/// Whether one more stone in this line makes an open four through the centre.
fn has_free_three(line: &[Cell; LINE_LEN]) -> bool {
    for fill in 1..LINE_LEN - 1 {
        if line[fill] != Cell::Empty {
            continue;
        }
        let mut next = *line;
        next[fill] = Cell::Own;

        let mut lo = CENTER;
        while lo > 0 && next[lo - 1] == Cell::Own {
            lo -= 1;
        }
        let mut hi = CENTER;
        while hi + 1 < LINE_LEN && next[hi + 1] == Cell::Own {
            hi += 1;
        }
        // The filled cell must be part of the four, or the four was already there
        let is_four = hi - lo + 1 == 4 && (lo..=hi).contains(&fill);
        let open = lo > 0 && hi + 1 < LINE_LEN && next[lo - 1] == Cell::Empty && next[hi + 1] == Cell::Empty;
        if is_four && open {
            return true;
        }
    }
    false
}

/// Number of directions in which placing `side` at `pos` forms a free three.
///
/// Stops counting at two, which is all a double-three check needs.
pub fn count_free_threes(board: &Board, pos: Pos, side: Stone) -> usize {
    if !side.is_player() {
        return 0;
    }
    let mut count = 0;
    for (dr, dc) in DIRECTIONS {
        if has_free_three(&read_line(board, pos, side, dr, dc)) {
            count += 1;
            if count >= 2 {
                break;
            }
        }
    }
    count
}

/// Whether the move makes two or more free threes at once.
#[inline]
pub fn is_double_three(board: &Board, pos: Pos, side: Stone) -> bool {
    count_free_threes(board, pos, side) >= 2
}
