//! Candidate move generation and ordering
//!
//! Candidates are the empty cells near existing stones. Each gets a cheap
//! threat score and a [`MovePicker`] hands them out best-first, selecting
//! lazily so a cutoff after the first move costs no full sort. The
//! double-three check runs only on moves the picker actually hands out.

use crate::board::{Bitboard, Board, Move, Pos, Stone, DIRECTIONS, TOTAL_CELLS};
use crate::rules::capture::RAYS;
use crate::rules::{capture_count, Rules};

// Ordering ladder. Higher is searched first.
const TT_MOVE: i32 = 10_000_000;
const WIN_NOW: i32 = 9_000_000;
const BLOCK_FIVE: i32 = 8_900_000;
const CAPTURE_WIN: i32 = 8_800_000;
const BLOCK_CAPTURE_WIN: i32 = 8_700_000;
const FOUR_FORK: i32 = 8_600_000;
const LIVE_FOUR: i32 = 8_500_000;
const BLOCK_FOUR_FORK: i32 = 8_400_000;
const BLOCK_LIVE_FOUR: i32 = 8_300_000;
const THREE_FORK: i32 = 8_200_000;
const BLOCK_THREE_FORK: i32 = 8_100_000;
const BROKEN_FOUR: i32 = 8_000_000;
const BLOCK_BROKEN_FOUR: i32 = 7_900_000;
const CAPTURE: i32 = 7_600_000;
const BLOCK_CAPTURE: i32 = 7_500_000;
const LIVE_THREE: i32 = 7_400_000;
const BLOCK_LIVE_THREE: i32 = 7_300_000;
const KILLER_1: i32 = 6_000_000;
const KILLER_2: i32 = 5_900_000;

/// Scores at or above this mean the position has a forcing threat in it.
pub const TACTICAL_SCORE: i32 = BLOCK_LIVE_THREE;

/// Extra ordering information from the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderingHints<'a> {
    pub tt_move: Option<Pos>,
    pub killers: [Option<Pos>; 2],
    pub history: Option<&'a [i32; TOTAL_CELLS]>,
}

/// A candidate and its ordering score. `order` is its generation index and
/// breaks ties so ordering is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub pos: Pos,
    pub score: i32,
    order: u16,
    /// Passed the full legality check
    verified: bool,
}

impl ScoredMove {
    #[inline]
    fn beats(&self, other: &ScoredMove) -> bool {
        self.score > other.score || (self.score == other.score && self.order < other.order)
    }
}

/// Lazy best-first iterator over scored candidates.
///
/// Each `next` swaps the best remaining move into place, so the prefix already
/// handed out is sorted and [`MovePicker::restart`] replays the same sequence.
/// A candidate is checked against the double-three rule when it first comes
/// up and dropped if it fails.
#[derive(Debug, Clone, Default)]
pub struct MovePicker {
    moves: Vec<ScoredMove>,
    cursor: usize,
    board: Board,
    rules: Rules,
    side: Stone,
}

impl MovePicker {
    /// Candidates not yet ruled out. Forbidden moves still waiting behind the
    /// cursor are counted until they come up.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Best ordering score among the remaining candidates.
    pub fn top_score(&self) -> i32 {
        self.moves.iter().map(|m| m.score).max().unwrap_or(i32::MIN)
    }

    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// Next legal candidate with its score.
    pub fn next_scored(&mut self) -> Option<ScoredMove> {
        while self.cursor < self.moves.len() {
            let mut best = self.cursor;
            for i in self.cursor + 1..self.moves.len() {
                if self.moves[i].beats(&self.moves[best]) {
                    best = i;
                }
            }
            self.moves.swap(self.cursor, best);

            let ScoredMove { pos, verified, .. } = self.moves[self.cursor];
            if !verified {
                if !self.rules.is_legal(&self.board, Move::new(pos, self.side)) {
                    // Tail order does not matter, selection is by score
                    self.moves.swap_remove(self.cursor);
                    continue;
                }
                self.moves[self.cursor].verified = true;
            }
            let picked = self.moves[self.cursor];
            self.cursor += 1;
            return Some(picked);
        }
        None
    }
}

impl Iterator for MovePicker {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        self.next_scored().map(|m| m.pos)
    }
}

/// Shape of the line through a cell, counting the cell as the side's stone.
#[derive(Debug, Clone, Copy, Default)]
struct LineShape {
    /// Own stones including one gap's worth of extension.
    stones: u8,
    /// Unbroken run through the cell.
    contiguous: u8,
    open: u8,
    gap: bool,
}

fn line_shape(board: &Board, pos: Pos, side: Stone, dr: i32, dc: i32) -> LineShape {
    let mut shape = LineShape {
        stones: 1,
        contiguous: 1,
        ..LineShape::default()
    };
    for sign in [1, -1] {
        let (sdr, sdc) = (dr * sign, dc * sign);
        let mut unbroken = true;
        let mut k = 1;
        while let Some(p) = pos.offset(sdr, sdc, k) {
            match board.at(p) {
                s if s == side => {
                    shape.stones += 1;
                    if unbroken {
                        shape.contiguous += 1;
                    }
                }
                Stone::Empty => {
                    let resumes = pos
                        .offset(sdr, sdc, k + 1)
                        .is_some_and(|q| board.at(q) == side);
                    if !shape.gap && resumes {
                        shape.gap = true;
                        unbroken = false;
                    } else {
                        shape.open += 1;
                        break;
                    }
                }
                _ => break,
            }
            k += 1;
        }
    }
    shape
}

/// Threat counts a stone at one cell would create for one side.
#[derive(Debug, Clone, Copy, Default)]
struct Threats {
    five: bool,
    live_fours: u8,
    broken_fours: u8,
    live_threes: u8,
    twos: i32,
}

impl Threats {
    fn at(board: &Board, pos: Pos, side: Stone) -> Self {
        let mut t = Threats::default();
        for (dr, dc) in DIRECTIONS {
            let shape = line_shape(board, pos, side, dr, dc);
            if shape.contiguous >= 5 {
                t.five = true;
            } else if shape.stones >= 4 && shape.gap {
                // Filling the gap makes five
                t.broken_fours += 1;
            } else if shape.stones == 4 && shape.open == 2 {
                t.live_fours += 1;
            } else if shape.stones == 4 && shape.open == 1 {
                t.broken_fours += 1;
            } else if shape.stones == 3 && shape.open == 2 {
                t.live_threes += 1;
            } else if shape.stones == 2 {
                t.twos += 200 * shape.open as i32;
            }
        }
        t
    }

    fn fours(&self) -> u8 {
        self.live_fours + self.broken_fours
    }
}

/// Number of rays on which a stone at `pos` would form a pair the opponent
/// can take next move.
fn self_exposure(board: &Board, pos: Pos, side: Stone) -> i32 {
    let opp = side.opponent();
    RAYS.iter()
        .filter(|&&(dr, dc)| {
            let cell = |k: i32| pos.offset(dr, dc, k).map(|p| board.at(p));
            let (Some(before), Some(mate), Some(after)) = (cell(-1), cell(1), cell(2)) else {
                return false;
            };
            mate == side
                && ((before == opp && after == Stone::Empty)
                    || (before == Stone::Empty && after == opp))
        })
        .count() as i32
}

/// Produces ordered candidate moves for one position.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator {
    rules: Rules,
    radius: u8,
}

impl MoveGenerator {
    pub fn new(rules: Rules, radius: u8) -> Self {
        Self { rules, radius }
    }

    /// Empty cells within the radius of any stone, ascending by index.
    fn neighborhood(&self, board: &Board) -> Bitboard {
        let occupied = board.occupied();
        let r = self.radius as i32;
        let mut zone = Bitboard::new();
        for stone in &occupied {
            for dr in -r..=r {
                for dc in -r..=r {
                    let (row, col) = (stone.row as i32 + dr, stone.col as i32 + dc);
                    if Pos::is_valid(row, col) {
                        zone.insert(Pos::new(row as u8, col as u8));
                    }
                }
            }
        }
        zone & !occupied
    }

    /// Legal candidate cells for `side`, unordered. An empty board yields
    /// only the centre.
    pub fn candidates(&self, board: &Board, side: Stone) -> Vec<Pos> {
        if board.is_board_empty() {
            return vec![Pos::center()];
        }
        self.neighborhood(board)
            .iter()
            .filter(|&pos| self.rules.is_legal(board, Move::new(pos, side)))
            .collect()
    }

    /// Candidates with plain ordering (no search hints).
    pub fn ordered(&self, board: &Board, side: Stone) -> MovePicker {
        self.picker(board, side, &OrderingHints::default())
    }

    /// Scored candidates for `side`. Only occupancy is checked up front; the
    /// double-three rule is applied as the picker hands moves out.
    pub fn picker(&self, board: &Board, side: Stone, hints: &OrderingHints<'_>) -> MovePicker {
        let cells: Vec<Pos> = if board.is_board_empty() {
            vec![Pos::center()]
        } else {
            self.neighborhood(board).iter().collect()
        };
        let verified = !self.rules.config().enforce_double_three;
        let moves = cells
            .into_iter()
            .enumerate()
            .map(|(i, pos)| ScoredMove {
                pos,
                score: self.score_move(board, pos, side, hints),
                order: i as u16,
                verified,
            })
            .collect();
        MovePicker {
            moves,
            cursor: 0,
            board: board.clone(),
            rules: self.rules,
            side,
        }
    }

    /// Cheap local estimate of how urgent a move is.
    pub fn score_move(
        &self,
        board: &Board,
        pos: Pos,
        side: Stone,
        hints: &OrderingHints<'_>,
    ) -> i32 {
        if hints.tt_move == Some(pos) {
            return TT_MOVE;
        }
        let opp = side.opponent();
        let win_pairs = self.rules.config().capture_win_stones / 2;

        let mine = Threats::at(board, pos, side);
        let theirs = Threats::at(board, pos, opp);
        let my_caps = capture_count(board, pos, side);
        let their_caps = capture_count(board, pos, opp);

        if mine.five {
            return WIN_NOW;
        }
        if theirs.five {
            return BLOCK_FIVE;
        }
        if my_caps > 0 && board.captures(side).saturating_add(my_caps) >= win_pairs {
            return CAPTURE_WIN;
        }
        if their_caps > 0 && board.captures(opp).saturating_add(their_caps) >= win_pairs {
            return BLOCK_CAPTURE_WIN;
        }
        if mine.fours() >= 2 || (mine.fours() >= 1 && mine.live_threes >= 1) {
            return FOUR_FORK;
        }
        if mine.live_fours >= 1 {
            return LIVE_FOUR;
        }
        if theirs.fours() >= 2 || (theirs.fours() >= 1 && theirs.live_threes >= 1) {
            return BLOCK_FOUR_FORK;
        }
        if theirs.live_fours >= 1 {
            return BLOCK_LIVE_FOUR;
        }
        if mine.live_threes >= 2 {
            return THREE_FORK;
        }
        if theirs.live_threes >= 2 {
            return BLOCK_THREE_FORK;
        }
        if mine.broken_fours >= 1 {
            return BROKEN_FOUR;
        }
        if theirs.broken_fours >= 1 {
            return BLOCK_BROKEN_FOUR;
        }
        if my_caps > 0 {
            // Bonuses stay below the next tier up
            let bonus = my_caps.min(4) as i32 * 40_000;
            return CAPTURE + bonus + board.captures(side).min(8) as i32 * 10_000;
        }
        if their_caps > 0 {
            return BLOCK_CAPTURE + board.captures(opp).min(8) as i32 * 10_000;
        }
        if mine.live_threes >= 1 {
            return LIVE_THREE;
        }
        if theirs.live_threes >= 1 {
            return BLOCK_LIVE_THREE;
        }
        if hints.killers[0] == Some(pos) {
            return KILLER_1;
        }
        if hints.killers[1] == Some(pos) {
            return KILLER_2;
        }

        let history = hints
            .history
            .map_or(0, |h| h[pos.to_index()].min(1_000_000));
        let center = Pos::center();
        let dist = pos.row.abs_diff(center.row) as i32 + pos.col.abs_diff(center.col) as i32;
        let adjacency = RAYS
            .iter()
            .filter(|&&(dr, dc)| pos.offset(dr, dc, 1).is_some_and(|p| board.at(p) == side))
            .count() as i32;

        history + (18 - dist) * 25 + adjacency * 200 + mine.twos + theirs.twos / 2
            - self_exposure(board, pos, side) * 20_000
    }
}
