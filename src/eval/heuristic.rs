//! Static evaluation of board positions
//!
//! The score is the difference between both sides' line patterns, capture
//! standing, capture chances and centre control. Every term is computed the
//! same way for each side and subtracted, so
//! `evaluate(b, Black) == -evaluate(b, White)`, which negamax relies on.

use crate::board::{Board, Pos, Stone, DIRECTIONS};
use crate::rules::{capture_moves, RuleConfig};

use super::patterns::{PatternKind, PatternWeights};

/// Largest Manhattan distance from the centre on a 19x19 board.
const MAX_CENTER_DIST: i32 = 18;

/// How many lines of each kind a side has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternCounts {
    counts: [u32; PatternKind::ALL.len()],
}

impl PatternCounts {
    #[inline]
    pub fn get(&self, kind: PatternKind) -> u32 {
        self.counts[kind.index()]
    }

    fn add(&mut self, kind: PatternKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Per-side pattern breakdown of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternAnalysis {
    pub black: PatternCounts,
    pub white: PatternCounts,
}

impl PatternAnalysis {
    pub fn for_side(&self, side: Stone) -> PatternCounts {
        match side {
            Stone::Black => self.black,
            Stone::White => self.white,
            Stone::Empty => PatternCounts::default(),
        }
    }
}

/// Classify the run of `side` stones starting at `start` along `(dr, dc)`.
///
/// Returns `None` unless `start` is the first stone of the run, so every run
/// is seen once. One internal gap is allowed (`XX_XX`, `X_XX`).
pub fn classify_run(board: &Board, start: Pos, side: Stone, dr: i32, dc: i32) -> Option<PatternKind> {
    let (r, c) = (start.row as i32, start.col as i32);
    let before = board.cell(r - dr, c - dc);
    if before == Some(side) {
        return None;
    }

    let mut open = u8::from(before == Some(Stone::Empty));
    let mut stones = 1;
    let mut gap = false;
    let mut k = 1;
    loop {
        match board.cell(r + dr * k, c + dc * k) {
            Some(s) if s == side => stones += 1,
            Some(Stone::Empty) => {
                if !gap && stones < 5 && board.cell(r + dr * (k + 1), c + dc * (k + 1)) == Some(side) {
                    gap = true;
                } else {
                    open += 1;
                    break;
                }
            }
            _ => break,
        }
        k += 1;
    }

    // A split line is never a five yet; filling the gap is still a move away
    let kind = if gap {
        match (stones, open) {
            (4.., _) => PatternKind::BrokenFour,
            (3, 2) => PatternKind::LiveThree,
            (3, 1) => PatternKind::BrokenThree,
            _ => return None,
        }
    } else {
        match (stones, open) {
            (5.., _) => PatternKind::Five,
            (4, 2) => PatternKind::LiveFour,
            (4, 1) => PatternKind::BrokenFour,
            (3, 2) => PatternKind::LiveThree,
            (3, 1) => PatternKind::BrokenThree,
            (2, 2) => PatternKind::LiveTwo,
            _ => return None,
        }
    };
    Some(kind)
}

/// Count every pattern `side` has on the board.
pub fn count_patterns(board: &Board, side: Stone) -> PatternCounts {
    let mut counts = PatternCounts::default();
    let Some(stones) = board.stones(side) else {
        return counts;
    };
    for pos in stones {
        for (dr, dc) in DIRECTIONS {
            if let Some(kind) = classify_run(board, pos, side, dr, dc) {
                counts.add(kind);
            }
        }
    }
    counts
}

fn center_control(board: &Board, side: Stone) -> i32 {
    let center = Pos::center();
    board.stones(side).map_or(0, |stones| {
        stones
            .iter()
            .map(|p| {
                let dist = p.row.abs_diff(center.row) as i32 + p.col.abs_diff(center.col) as i32;
                MAX_CENTER_DIST - dist
            })
            .sum()
    })
}

/// Position scorer configured with weights and the capture-win threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    weights: PatternWeights,
    win_pairs: u8,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(PatternWeights::default(), &RuleConfig::default())
    }
}

impl Evaluator {
    pub fn new(weights: PatternWeights, rules: &RuleConfig) -> Self {
        Self {
            weights,
            win_pairs: rules.capture_win_stones / 2,
        }
    }

    #[inline]
    pub fn weights(&self) -> &PatternWeights {
        &self.weights
    }

    /// Score of `side`'s patterns, including bonuses for threat combinations
    /// the opponent cannot block all at once.
    fn pattern_score(&self, counts: &PatternCounts) -> i32 {
        let w = &self.weights;
        let mut score: i32 = PatternKind::ALL
            .iter()
            .map(|&kind| w.weight(kind).saturating_mul(counts.get(kind) as i32))
            .fold(0, i32::saturating_add);

        let live_fours = counts.get(PatternKind::LiveFour);
        let broken_fours = counts.get(PatternKind::BrokenFour);
        let live_threes = counts.get(PatternKind::LiveThree);
        if live_fours >= 1 && (broken_fours >= 1 || live_threes >= 1) {
            score = score.saturating_add(w.live_four);
        }
        if broken_fours >= 2 {
            score = score.saturating_add(w.live_four);
        }
        if broken_fours >= 1 && live_threes >= 1 {
            score = score.saturating_add(w.live_four);
        }
        if live_threes >= 2 {
            score = score.saturating_add(w.live_four);
        }
        score
    }

    /// Score the board from `side`'s point of view. Positive is good for
    /// `side`.
    pub fn evaluate(&self, board: &Board, side: Stone) -> i32 {
        if !side.is_player() {
            return 0;
        }
        let opp = side.opponent();
        let w = &self.weights;

        let mine = board.captures(side);
        let theirs = board.captures(opp);
        match (mine >= self.win_pairs, theirs >= self.win_pairs) {
            (true, false) => return w.five,
            (false, true) => return -w.five,
            _ => {}
        }

        let patterns = self.pattern_score(&count_patterns(board, side))
            - self.pattern_score(&count_patterns(board, opp));
        let captures = w.capture_score(mine, theirs, self.win_pairs);
        let threats = (capture_moves(board, side).len() as i32
            - capture_moves(board, opp).len() as i32)
            * w.capture_threat;
        let center = (center_control(board, side) - center_control(board, opp)) * w.center;

        patterns + captures + threats + center
    }

    /// Pattern counts for both sides.
    pub fn analyze(&self, board: &Board) -> PatternAnalysis {
        PatternAnalysis {
            black: count_patterns(board, Stone::Black),
            white: count_patterns(board, Stone::White),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(stones: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(r, c, s) in stones {
            board.place_stone(Pos::new(r, c), s);
        }
        board
    }

    #[test]
    fn test_empty_board_is_even() {
        let eval = Evaluator::default();
        assert_eq!(eval.evaluate(&Board::new(), Stone::Black), 0);
        assert_eq!(eval.evaluate(&Board::new(), Stone::White), 0);
    }

    #[test]
    fn test_symmetry() {
        let eval = Evaluator::default();
        let boards = [
            board_with(&[(9, 9, Stone::Black)]),
            board_with(&[(9, 9, Stone::Black), (9, 10, Stone::White), (8, 8, Stone::Black)]),
            board_with(&[
                (9, 7, Stone::Black),
                (9, 8, Stone::Black),
                (9, 9, Stone::Black),
                (9, 10, Stone::White),
                (8, 9, Stone::White),
                (7, 9, Stone::White),
                (0, 0, Stone::Black),
            ]),
        ];
        for mut board in boards {
            board.set_captures(Stone::Black, 2);
            board.set_captures(Stone::White, 1);
            assert_eq!(
                eval.evaluate(&board, Stone::Black),
                -eval.evaluate(&board, Stone::White)
            );
        }
    }

    #[test]
    fn test_classify_runs() {
        let board = board_with(&[(9, 5, Stone::Black), (9, 6, Stone::Black), (9, 7, Stone::Black)]);
        assert_eq!(
            classify_run(&board, Pos::new(9, 5), Stone::Black, 0, 1),
            Some(PatternKind::LiveThree)
        );
        // Not the run start
        assert_eq!(classify_run(&board, Pos::new(9, 6), Stone::Black, 0, 1), None);

        let board = board_with(&[
            (9, 4, Stone::White),
            (9, 5, Stone::Black),
            (9, 6, Stone::Black),
            (9, 7, Stone::Black),
            (9, 8, Stone::Black),
        ]);
        assert_eq!(
            classify_run(&board, Pos::new(9, 5), Stone::Black, 0, 1),
            Some(PatternKind::BrokenFour)
        );

        let board = board_with(&[
            (9, 5, Stone::Black),
            (9, 6, Stone::Black),
            (9, 8, Stone::Black),
            (9, 9, Stone::Black),
        ]);
        assert_eq!(
            classify_run(&board, Pos::new(9, 5), Stone::Black, 0, 1),
            Some(PatternKind::BrokenFour)
        );
    }

    #[test]
    fn test_dead_four_scores_nothing() {
        let board = board_with(&[
            (9, 4, Stone::White),
            (9, 5, Stone::Black),
            (9, 6, Stone::Black),
            (9, 7, Stone::Black),
            (9, 8, Stone::Black),
            (9, 9, Stone::White),
        ]);
        assert_eq!(classify_run(&board, Pos::new(9, 5), Stone::Black, 0, 1), None);
    }

    #[test]
    fn test_live_four_beats_broken_four() {
        let eval = Evaluator::default();
        let live = board_with(&[
            (9, 5, Stone::Black),
            (9, 6, Stone::Black),
            (9, 7, Stone::Black),
            (9, 8, Stone::Black),
        ]);
        let mut broken = live.clone();
        broken.place_stone(Pos::new(9, 4), Stone::White);
        // Give the live side's opponent a matching stone elsewhere
        let mut live = live;
        live.place_stone(Pos::new(0, 18), Stone::White);
        assert!(eval.evaluate(&live, Stone::Black) > eval.evaluate(&broken, Stone::Black));
    }

    #[test]
    fn test_capture_win_is_terminal() {
        let eval = Evaluator::default();
        let mut board = Board::new();
        board.set_captures(Stone::White, 5);
        assert_eq!(eval.evaluate(&board, Stone::White), eval.weights().five);
        assert_eq!(eval.evaluate(&board, Stone::Black), -eval.weights().five);
    }

    #[test]
    fn test_center_preferred() {
        let eval = Evaluator::default();
        let center = board_with(&[(9, 9, Stone::Black)]);
        let corner = board_with(&[(0, 0, Stone::Black)]);
        assert!(eval.evaluate(&center, Stone::Black) > eval.evaluate(&corner, Stone::Black));
    }

    #[test]
    fn test_capture_chance_counts() {
        let eval = Evaluator::default();
        // Black can take the White pair; White has nothing comparable
        let board = board_with(&[
            (9, 9, Stone::Black),
            (9, 10, Stone::White),
            (9, 11, Stone::White),
        ]);
        let quiet = board_with(&[
            (9, 9, Stone::Black),
            (3, 3, Stone::White),
            (3, 4, Stone::White),
        ]);
        assert!(eval.evaluate(&board, Stone::Black) > eval.evaluate(&quiet, Stone::Black));
    }

    #[test]
    fn test_analyze_counts_both_sides() {
        let eval = Evaluator::default();
        let board = board_with(&[
            (9, 5, Stone::Black),
            (9, 6, Stone::Black),
            (9, 7, Stone::Black),
            (3, 3, Stone::White),
            (4, 3, Stone::White),
        ]);
        let analysis = eval.analyze(&board);
        assert_eq!(analysis.black.get(PatternKind::LiveThree), 1);
        assert_eq!(analysis.white.get(PatternKind::LiveTwo), 1);
        assert_eq!(analysis.for_side(Stone::White).total(), 1);
        assert_eq!(analysis.for_side(Stone::Empty).total(), 0);
    }
}
