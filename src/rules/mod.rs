//! Game rules for Gomoku with Ninuki-renju variant
//!
//! - Pair capture: X-O-O-X removes the O-O pair
//! - Five or more in a row wins, unless the opponent can break it by capture
//! - Capturing enough stones (10 by default) wins
//! - A move making two free threes at once is forbidden, unless it captures

pub mod capture;
pub mod forbidden;
pub mod win;

use serde::{Deserialize, Serialize};

use crate::board::{Board, CaptureRecord, Move, Pos, Stone};
use crate::error::{ConfigError, GomokuError, Result};

pub use capture::{capture_count, capture_moves, find_captures, has_capture, is_capturable};
pub use forbidden::{count_free_threes, is_double_three};
pub use win::{can_break_five, find_five, find_fives, five_through, has_five, FiveLine};

/// How a five interacts with the opponent's capture chances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndgameCapture {
    /// Any five wins immediately.
    Off,
    /// A five does not win while the opponent can capture a pair out of it.
    #[default]
    BreakLine,
    /// As `BreakLine`, and a five also waits while the opponent has a capture
    /// that would win the game outright.
    BreakLineOrCaptureWin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Captured stones needed to win. Always even; a pair is two stones.
    pub capture_win_stones: u8,
    pub enforce_double_three: bool,
    pub endgame_capture: EndgameCapture,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            capture_win_stones: 10,
            enforce_double_three: true,
            endgame_capture: EndgameCapture::BreakLine,
        }
    }
}

impl RuleConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.capture_win_stones == 0 || self.capture_win_stones % 2 != 0 {
            return Err(ConfigError::Invalid(format!(
                "capture_win_stones must be a positive even number, got {}",
                self.capture_win_stones
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinKind {
    FiveInRow,
    CaptureWin,
}

/// A decided game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Win {
    pub winner: Stone,
    pub kind: WinKind,
}

/// What applying a move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub captures: CaptureRecord,
    /// Set when the mover has now won.
    pub creates_win: Option<WinKind>,
    /// The move formed two free threes but was allowed (it captured, or the
    /// restriction is off).
    pub creates_double_three: bool,
}

/// Stateless rule service. Cheap to copy into every component that needs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rules {
    config: RuleConfig,
}

impl Rules {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Validate a move without applying it.
    pub fn check_move(&self, board: &Board, mv: Move) -> Result<()> {
        if !mv.side.is_player() {
            return Err(GomokuError::IllegalMove("no side to move"));
        }
        if !board.is_empty(mv.pos) {
            return Err(GomokuError::CellOccupied(mv.pos));
        }
        if self.config.enforce_double_three
            && is_double_three(board, mv.pos, mv.side)
            && !has_capture(board, mv.pos, mv.side)
        {
            return Err(GomokuError::DoubleThreeViolation(mv.pos));
        }
        Ok(())
    }

    #[inline]
    pub fn is_legal(&self, board: &Board, mv: Move) -> bool {
        self.check_move(board, mv).is_ok()
    }

    /// Validate and apply a move, removing captured pairs.
    pub fn apply_move(&self, board: &mut Board, mv: Move) -> Result<MoveResult> {
        self.check_move(board, mv)?;
        let creates_double_three = is_double_three(board, mv.pos, mv.side);
        let mut result = self.apply_unchecked(board, mv);
        result.creates_double_three = creates_double_three;
        Ok(result)
    }

    /// Apply a move already known to be legal. Used on the search path.
    #[inline]
    pub fn apply_unchecked(&self, board: &mut Board, mv: Move) -> MoveResult {
        let captures = find_captures(board, mv.pos, mv.side);
        board.apply(mv, &captures);
        let creates_win = self.mover_wins(board, mv);
        MoveResult {
            captures,
            creates_win,
            creates_double_three: false,
        }
    }

    /// Revert a move applied with [`Rules::apply_move`].
    #[inline]
    pub fn undo_move(&self, board: &mut Board, mv: Move, result: &MoveResult) -> Result<()> {
        board.undo(mv, &result.captures)
    }

    #[inline]
    fn capture_win(&self, board: &Board, side: Stone) -> bool {
        board.captured_stones(side) >= self.config.capture_win_stones
    }

    /// Whether a five of `side` stands under the endgame capture policy.
    fn five_stands(&self, board: &Board, line: &FiveLine, side: Stone) -> bool {
        match self.config.endgame_capture {
            EndgameCapture::Off => true,
            EndgameCapture::BreakLine => !can_break_five(board, line, side),
            EndgameCapture::BreakLineOrCaptureWin => {
                !can_break_five(board, line, side)
                    && !win::opponent_can_win_by_capture(
                        board,
                        side,
                        self.config.capture_win_stones,
                    )
            }
        }
    }

    /// Has `side` won in this position? Pure; calling it twice gives the same
    /// answer.
    pub fn is_win(&self, board: &Board, side: Stone) -> Option<WinKind> {
        if !side.is_player() {
            return None;
        }
        if self.capture_win(board, side) {
            return Some(WinKind::CaptureWin);
        }
        find_fives(board, side)
            .iter()
            .any(|line| self.five_stands(board, line, side))
            .then_some(WinKind::FiveInRow)
    }

    /// Win for the mover caused by `mv` itself: a capture win, or a five
    /// through the new stone that the opponent cannot break.
    pub fn mover_wins(&self, board: &Board, mv: Move) -> Option<WinKind> {
        if self.capture_win(board, mv.side) {
            return Some(WinKind::CaptureWin);
        }
        let line = five_through(board, mv.pos, mv.side)?;
        self.five_stands(board, &line, mv.side)
            .then_some(WinKind::FiveInRow)
    }

    /// Resolve the position after `last` was played.
    ///
    /// Capture wins come first. Then the mover's new five. Then any five the
    /// other side already had: the mover had one move to break it and did not.
    pub fn winner(&self, board: &Board, last: Move) -> Option<Win> {
        let mover = last.side;
        let other = mover.opponent();
        for side in [mover, other] {
            if self.capture_win(board, side) {
                return Some(Win {
                    winner: side,
                    kind: WinKind::CaptureWin,
                });
            }
        }
        if let Some(line) = five_through(board, last.pos, mover) {
            if self.five_stands(board, &line, mover) {
                return Some(Win {
                    winner: mover,
                    kind: WinKind::FiveInRow,
                });
            }
        }
        if has_five(board, other) {
            return Some(Win {
                winner: other,
                kind: WinKind::FiveInRow,
            });
        }
        None
    }

    /// Every legal move for `side`.
    pub fn legal_moves(&self, board: &Board, side: Stone) -> Vec<Pos> {
        (!board.occupied())
            .iter()
            .filter(|&pos| self.is_legal(board, Move::new(pos, side)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(r: u8, c: u8, side: Stone) -> Move {
        Move::new(Pos::new(r, c), side)
    }

    #[test]
    fn test_flank_capture_scenario() {
        // B W W _ : Black closes the flank
        let rules = Rules::default();
        let mut board = Board::new();
        board.place_stone(Pos::new(9, 9), Stone::Black);
        board.place_stone(Pos::new(9, 10), Stone::White);
        board.place_stone(Pos::new(9, 11), Stone::White);

        let result = rules.apply_move(&mut board, mv(9, 12, Stone::Black)).unwrap();
        assert_eq!(result.captures.pair_count(), 1);
        assert!(board.is_empty(Pos::new(9, 10)));
        assert!(board.is_empty(Pos::new(9, 11)));
        assert_eq!(board.captures(Stone::Black), 1);
        assert_eq!(board.captures(Stone::White), 0);
        assert_eq!(result.creates_win, None);
    }

    #[test]
    fn test_check_move_rejections() {
        let rules = Rules::default();
        let mut board = Board::new();
        board.place_stone(Pos::new(9, 9), Stone::Black);

        assert_eq!(
            rules.check_move(&board, mv(9, 9, Stone::White)),
            Err(GomokuError::CellOccupied(Pos::new(9, 9)))
        );
        assert!(matches!(
            rules.check_move(&board, mv(0, 0, Stone::Empty)),
            Err(GomokuError::IllegalMove(_))
        ));
        assert!(rules.is_legal(&board, mv(0, 0, Stone::White)));
    }

    #[test]
    fn test_double_three_rejected() {
        let rules = Rules::default();
        let mut board = Board::new();
        for (r, c) in [(9, 7), (9, 8), (7, 9), (8, 9)] {
            board.place_stone(Pos::new(r, c), Stone::Black);
        }
        let before = board.clone();
        assert_eq!(
            rules.apply_move(&mut board, mv(9, 9, Stone::Black)).unwrap_err(),
            GomokuError::DoubleThreeViolation(Pos::new(9, 9))
        );
        assert_eq!(board, before);

        let relaxed = Rules::new(RuleConfig {
            enforce_double_three: false,
            ..RuleConfig::default()
        });
        let result = relaxed.apply_move(&mut board, mv(9, 9, Stone::Black)).unwrap();
        assert!(result.creates_double_three);
    }

    #[test]
    fn test_double_three_allowed_when_capturing() {
        let rules = Rules::default();
        let mut board = Board::new();
        for (r, c) in [(9, 7), (9, 8), (7, 9), (8, 9)] {
            board.place_stone(Pos::new(r, c), Stone::Black);
        }
        // Diagonal B W W [ ] so that (9,9) also captures
        board.place_stone(Pos::new(6, 6), Stone::Black);
        board.place_stone(Pos::new(7, 7), Stone::White);
        board.place_stone(Pos::new(8, 8), Stone::White);

        assert!(is_double_three(&board, Pos::new(9, 9), Stone::Black));
        let result = rules.apply_move(&mut board, mv(9, 9, Stone::Black)).unwrap();
        assert!(result.creates_double_three);
        assert_eq!(result.captures.pair_count(), 1);
    }

    #[test]
    fn test_five_wins_when_unbreakable() {
        let rules = Rules::default();
        let mut board = Board::new();
        for c in 5..9 {
            board.place_stone(Pos::new(9, c), Stone::Black);
        }
        let result = rules.apply_move(&mut board, mv(9, 9, Stone::Black)).unwrap();
        assert_eq!(result.creates_win, Some(WinKind::FiveInRow));
        assert_eq!(rules.is_win(&board, Stone::Black), Some(WinKind::FiveInRow));
        assert_eq!(rules.is_win(&board, Stone::White), None);
    }

    #[test]
    fn test_breakable_five_is_not_a_win() {
        let rules = Rules::default();
        let mut board = Board::new();
        for c in 5..10 {
            board.place_stone(Pos::new(9, c), Stone::Black);
        }
        board.place_stone(Pos::new(8, 7), Stone::White);
        board.place_stone(Pos::new(10, 7), Stone::Black);

        assert_eq!(rules.is_win(&board, Stone::Black), None);
        // Idempotent
        assert_eq!(rules.is_win(&board, Stone::Black), None);

        let lenient = Rules::new(RuleConfig {
            endgame_capture: EndgameCapture::Off,
            ..RuleConfig::default()
        });
        assert_eq!(lenient.is_win(&board, Stone::Black), Some(WinKind::FiveInRow));
    }

    #[test]
    fn test_breaking_capture_then_unbroken_five() {
        let rules = Rules::default();
        let mut board = Board::new();
        for c in 5..9 {
            board.place_stone(Pos::new(9, c), Stone::Black);
        }
        board.place_stone(Pos::new(8, 7), Stone::White);
        board.place_stone(Pos::new(10, 7), Stone::Black);

        // Black completes a breakable five: not yet a win
        let five = mv(9, 9, Stone::Black);
        let result = rules.apply_move(&mut board, five).unwrap();
        assert_eq!(result.creates_win, None);
        assert_eq!(rules.winner(&board, five), None);

        // White breaks it
        let mut broken = board.clone();
        let capture = mv(11, 7, Stone::White);
        rules.apply_move(&mut broken, capture).unwrap();
        assert!(broken.is_empty(Pos::new(9, 7)));
        assert_eq!(rules.winner(&broken, capture), None);

        // White ignores it: the five stands
        let elsewhere = mv(0, 0, Stone::White);
        rules.apply_move(&mut board, elsewhere).unwrap();
        assert_eq!(
            rules.winner(&board, elsewhere),
            Some(Win {
                winner: Stone::Black,
                kind: WinKind::FiveInRow
            })
        );
    }

    #[test]
    fn test_capture_win_threshold() {
        let rules = Rules::default();
        let mut board = Board::new();
        board.set_captures(Stone::White, 4);
        board.place_stone(Pos::new(5, 5), Stone::White);
        board.place_stone(Pos::new(5, 6), Stone::Black);
        board.place_stone(Pos::new(5, 7), Stone::Black);

        let capture = mv(5, 8, Stone::White);
        let result = rules.apply_move(&mut board, capture).unwrap();
        assert_eq!(board.captured_stones(Stone::White), 10);
        assert_eq!(result.creates_win, Some(WinKind::CaptureWin));
        assert_eq!(rules.is_win(&board, Stone::White), Some(WinKind::CaptureWin));
    }

    #[test]
    fn test_capture_win_beats_five() {
        let rules = Rules::default();
        let mut board = Board::new();
        board.set_captures(Stone::White, 5);
        for c in 0..5 {
            board.place_stone(Pos::new(9, c), Stone::Black);
        }
        let last = mv(9, 4, Stone::Black);
        assert_eq!(
            rules.winner(&board, last),
            Some(Win {
                winner: Stone::White,
                kind: WinKind::CaptureWin
            })
        );
        assert_eq!(rules.is_win(&board, Stone::White), Some(WinKind::CaptureWin));
    }

    #[test]
    fn test_five_waits_on_capture_win_threat() {
        let strict = Rules::new(RuleConfig {
            endgame_capture: EndgameCapture::BreakLineOrCaptureWin,
            ..RuleConfig::default()
        });
        let mut board = Board::new();
        for c in 5..10 {
            board.place_stone(Pos::new(9, c), Stone::Black);
        }
        board.set_captures(Stone::White, 4);
        board.place_stone(Pos::new(2, 2), Stone::White);
        board.place_stone(Pos::new(2, 3), Stone::Black);
        board.place_stone(Pos::new(2, 4), Stone::Black);

        assert_eq!(strict.is_win(&board, Stone::Black), None);
        assert_eq!(
            Rules::default().is_win(&board, Stone::Black),
            Some(WinKind::FiveInRow)
        );
    }

    #[test]
    fn test_undo_restores_board() {
        let rules = Rules::default();
        let mut board = Board::new();
        board.place_stone(Pos::new(9, 9), Stone::Black);
        board.place_stone(Pos::new(9, 10), Stone::White);
        board.place_stone(Pos::new(9, 11), Stone::White);
        let before = board.clone();

        let m = mv(9, 12, Stone::Black);
        let result = rules.apply_move(&mut board, m).unwrap();
        rules.undo_move(&mut board, m, &result).unwrap();
        assert_eq!(board, before);
        assert_eq!(board.signature(), before.signature());
    }

    #[test]
    fn test_legal_moves_empty_board() {
        let rules = Rules::default();
        let board = Board::new();
        assert_eq!(rules.legal_moves(&board, Stone::Black).len(), 361);
    }

    #[test]
    fn test_rule_config_validation() {
        assert!(RuleConfig::default().validate().is_ok());
        let odd = RuleConfig {
            capture_win_stones: 9,
            ..RuleConfig::default()
        };
        assert!(odd.validate().is_err());
    }
}
