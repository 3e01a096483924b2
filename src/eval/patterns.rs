//! Pattern kinds and their weights

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Line shapes the evaluator recognises, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Five or more in a row
    Five,
    /// `_XXXX_`
    LiveFour,
    /// Four with one open completion point: `XXXX_` blocked on one side, or
    /// a split four like `XX_XX`
    BrokenFour,
    /// `_XXX_` or a split three open on both ends
    LiveThree,
    /// Three open on one end only
    BrokenThree,
    /// `_XX_`
    LiveTwo,
}

impl PatternKind {
    pub const ALL: [PatternKind; 6] = [
        PatternKind::Five,
        PatternKind::LiveFour,
        PatternKind::BrokenFour,
        PatternKind::LiveThree,
        PatternKind::BrokenThree,
        PatternKind::LiveTwo,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Evaluation weights. All values are from the owning side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternWeights {
    pub five: i32,
    pub live_four: i32,
    pub broken_four: i32,
    pub live_three: i32,
    pub broken_three: i32,
    pub live_two: i32,
    /// Base value of one captured pair; grows with each further pair.
    pub capture_pair: i32,
    /// Bonus once a side is one capture away from winning.
    pub near_capture_win: i32,
    /// Per capture the side could make right now.
    pub capture_threat: i32,
    /// Per step closer to the centre, per stone.
    pub center: i32,
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            five: 1_000_000,
            live_four: 100_000,
            broken_four: 50_000,
            live_three: 10_000,
            broken_three: 1_500,
            live_two: 1_000,
            capture_pair: 2_000,
            near_capture_win: 80_000,
            capture_threat: 4_000,
            center: 3,
        }
    }
}

impl PatternWeights {
    #[inline]
    pub fn weight(&self, kind: PatternKind) -> i32 {
        match kind {
            PatternKind::Five => self.five,
            PatternKind::LiveFour => self.live_four,
            PatternKind::BrokenFour => self.broken_four,
            PatternKind::LiveThree => self.live_three,
            PatternKind::BrokenThree => self.broken_three,
            PatternKind::LiveTwo => self.live_two,
        }
    }

    /// Weights must be strictly ordered and a five must dwarf everything else.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ladder = PatternKind::ALL.map(|kind| self.weight(kind));
        if ladder.windows(2).any(|w| w[0] <= w[1]) || self.live_two <= 0 {
            return Err(ConfigError::Invalid(format!(
                "pattern weights must be positive and strictly decreasing from five to live_two: {ladder:?}"
            )));
        }
        if self.five < 10 * self.live_four {
            return Err(ConfigError::Invalid(
                "five must be at least ten times live_four".into(),
            ));
        }
        if self.near_capture_win >= self.five || self.capture_pair < 0 || self.capture_threat < 0 {
            return Err(ConfigError::Invalid(
                "capture weights must be non-negative and below five".into(),
            ));
        }
        if self.center < 0 {
            return Err(ConfigError::Invalid("center weight must be non-negative".into()));
        }
        Ok(())
    }

    /// Value of holding `pairs` captured pairs when `win_pairs` wins.
    ///
    /// Grows triangularly so each extra pair is worth more than the last,
    /// with a jump one pair short of the win.
    pub fn capture_value(&self, pairs: u8, win_pairs: u8) -> i32 {
        let p = pairs.min(win_pairs) as i32;
        let mut value = self.capture_pair * p * (p + 1) / 2;
        if win_pairs > 0 && pairs.saturating_add(1) >= win_pairs {
            value += self.near_capture_win;
        }
        value
    }

    /// Capture differential from `my` side's view. Antisymmetric in its
    /// arguments.
    #[inline]
    pub fn capture_score(&self, my_pairs: u8, opp_pairs: u8, win_pairs: u8) -> i32 {
        self.capture_value(my_pairs, win_pairs) - self.capture_value(opp_pairs, win_pairs)
    }
}
