//! Five-in-a-row detection and the endgame capture override
//!
//! A five (overlines count) only wins if the opponent cannot break it by
//! capturing a pair that includes one of its stones.

use crate::board::{Board, Pos, Stone, DIRECTIONS};

use super::capture::{capture_count, capture_moves};

/// A maximal run of at least five same-coloured stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiveLine {
    pub start: Pos,
    pub dir: (i32, i32),
    pub len: u8,
}

impl FiveLine {
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        let (dr, dc) = self.dir;
        (0..self.len as i32).filter_map(move |k| self.start.offset(dr, dc, k))
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells().any(|p| p == pos)
    }
}

#[inline]
fn holds(board: &Board, pos: Pos, dr: i32, dc: i32, k: i32, side: Stone) -> bool {
    pos.offset(dr, dc, k).is_some_and(|p| board.at(p) == side)
}

/// The run of `side` through `pos` along one direction, if five or longer.
fn run_through(board: &Board, pos: Pos, side: Stone, dr: i32, dc: i32) -> Option<FiveLine> {
    let mut back = 0;
    while holds(board, pos, dr, dc, -(back + 1), side) {
        back += 1;
    }
    let mut fwd = 0;
    while holds(board, pos, dr, dc, fwd + 1, side) {
        fwd += 1;
    }
    let len = back + fwd + 1;
    if len >= 5 {
        Some(FiveLine {
            start: pos.offset(dr, dc, -back)?,
            dir: (dr, dc),
            len: len as u8,
        })
    } else {
        None
    }
}

/// A five of `side` passing through `pos`. Checks only the four lines through
/// the cell, so it is the cheap test after a move.
pub fn five_through(board: &Board, pos: Pos, side: Stone) -> Option<FiveLine> {
    if !side.is_player() || board.at(pos) != side {
        return None;
    }
    DIRECTIONS
        .iter()
        .find_map(|&(dr, dc)| run_through(board, pos, side, dr, dc))
}

/// Every five `side` has on the board, each reported once.
pub fn find_fives(board: &Board, side: Stone) -> Vec<FiveLine> {
    let Some(stones) = board.stones(side) else {
        return Vec::new();
    };
    let mut fives = Vec::new();
    for pos in stones {
        for (dr, dc) in DIRECTIONS {
            // Only start counting from the first stone of a run
            if holds(board, pos, dr, dc, -1, side) {
                continue;
            }
            if let Some(line) = run_through(board, pos, side, dr, dc) {
                fives.push(line);
            }
        }
    }
    fives
}

/// The first five `side` has, scanning in board order.
pub fn find_five(board: &Board, side: Stone) -> Option<FiveLine> {
    find_fives(board, side).into_iter().next()
}

#[inline]
pub fn has_five(board: &Board, side: Stone) -> bool {
    find_five(board, side).is_some()
}

/// Whether the opponent of `side` can capture a pair containing a stone of
/// `line` with its next move.
pub fn can_break_five(board: &Board, line: &FiveLine, side: Stone) -> bool {
    let opp = side.opponent();
    for stone in line.cells() {
        for (dr, dc) in super::capture::RAYS {
            // Pair (stone, mate) flanked by opp at one end and empty at the other
            let Some(mate) = stone.offset(dr, dc, 1) else {
                continue;
            };
            if board.at(mate) != side {
                continue;
            }
            let (Some(before), Some(after)) = (stone.offset(dr, dc, -1), mate.offset(dr, dc, 1))
            else {
                continue;
            };
            let (before, after) = (board.at(before), board.at(after));
            if (before == opp && after == Stone::Empty) || (before == Stone::Empty && after == opp)
            {
                return true;
            }
        }
    }
    false
}

/// Whether the opponent of `side` has any capture that brings it to
/// `threshold` captured stones.
pub fn opponent_can_win_by_capture(board: &Board, side: Stone, threshold: u8) -> bool {
    let opp = side.opponent();
    let have = board.captured_stones(opp) as u32;
    capture_moves(board, opp)
        .into_iter()
        .any(|pos| have + 2 * capture_count(board, pos, opp) as u32 >= threshold as u32)
}
