//! Game record: board, side to move, move history and result
//!
//! Hosts that track a whole game (the self-play binary, a GUI) use [`Game`];
//! hosts that keep their own board call [`Engine`](crate::engine::Engine)
//! directly.

use crate::board::{Board, Move, Pos, Stone};
use crate::error::{GomokuError, Result};
use crate::rules::{MoveResult, Rules, Win};

#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    board: Board,
    to_move: Stone,
    history: Vec<(Move, MoveResult)>,
    outcome: Option<Win>,
}

impl Game {
    /// Empty board, no captures, Black to move.
    pub fn new(rules: Rules) -> Self {
        Self::from_position(rules, Board::new(), Stone::Black)
    }

    /// Continue from an arbitrary position. The history starts empty, so
    /// moves before this point cannot be undone.
    pub fn from_position(rules: Rules, board: Board, to_move: Stone) -> Self {
        Self {
            rules,
            board,
            to_move,
            history: Vec::new(),
            outcome: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn to_move(&self) -> Stone {
        self.to_move
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The winner, once the game is decided.
    #[inline]
    pub fn outcome(&self) -> Option<Win> {
        self.outcome
    }

    /// No winner and nowhere left to play.
    pub fn is_draw(&self) -> bool {
        self.outcome.is_none() && self.board.is_full()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some() || self.board.is_full()
    }

    pub fn history(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|(mv, _)| *mv)
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|(mv, _)| *mv)
    }

    /// Play `pos` for the side to move.
    ///
    /// On rejection nothing changes. After a winning move the turn does not
    /// pass and further moves fail with [`GomokuError::GameOver`].
    pub fn play(&mut self, pos: Pos) -> Result<MoveResult> {
        if self.is_over() {
            return Err(GomokuError::GameOver);
        }
        let mv = Move::new(pos, self.to_move);
        let result = self.rules.apply_move(&mut self.board, mv)?;
        self.history.push((mv, result));

        self.outcome = self.rules.winner(&self.board, mv);
        match self.outcome {
            Some(win) => log::info!(
                "{} wins by {:?} after {} moves",
                win.winner,
                win.kind,
                self.history.len()
            ),
            None => self.to_move = self.to_move.opponent(),
        }
        Ok(result)
    }

    /// Play at raw coordinates, rejecting anything off the board.
    pub fn play_at(&mut self, row: i32, col: i32) -> Result<MoveResult> {
        self.play(Pos::try_new(row, col)?)
    }

    /// Take back the last move, restoring captured stones and counters.
    pub fn undo(&mut self) -> Result<Move> {
        let (mv, result) = self
            .history
            .pop()
            .ok_or(GomokuError::IllegalMove("no move to undo"))?;
        self.rules.undo_move(&mut self.board, mv, &result)?;
        self.to_move = mv.side;
        // Play refuses moves once decided, so the position before was open
        self.outcome = None;
        Ok(mv)
    }

    /// Legal moves for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Pos> {
        if self.is_over() {
            return Vec::new();
        }
        self.rules.legal_moves(&self.board, self.to_move)
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.to_move = Stone::Black;
        self.history.clear();
        self.outcome = None;
    }
}
