//! Display-only score state fed by the score store.
//!
//! Nothing in here influences gameplay; store replies may land at any
//! time (including after a reset) and simply overwrite what is shown.

use crate::entities::{GameState, GameStatus};
use crate::store::{StoreReply, StoreWorker};

/// How many leaderboard rows the store serves and we show.
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    /// Best persisted score as last reported by the store (or beaten locally).
    pub high_score: u32,
    /// Top scores, descending.
    pub leaderboard: Vec<u32>,
    /// Set when a session ends, cleared on reset.
    pub final_score: Option<u32>,
    /// The final score beat the cached high score.
    pub new_best: bool,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a store reply into the displayed values.
    pub fn apply(&mut self, reply: StoreReply) {
        match reply {
            StoreReply::HighScore(score) => self.high_score = score,
            StoreReply::Leaderboard(mut scores) => {
                scores.truncate(LEADERBOARD_SIZE);
                self.leaderboard = scores;
            }
            // Follow-up fetches carry the refreshed values.
            StoreReply::Submitted(_) => {}
        }
    }

    /// Remember the final score and raise the cached high score if beaten.
    /// Returns true when this is a new best.
    pub fn record_game_over(&mut self, score: u32) -> bool {
        self.final_score = Some(score);
        self.new_best = score > self.high_score;
        if self.new_best {
            self.high_score = score;
        }
        self.new_best
    }

    pub fn clear_final(&mut self) {
        self.final_score = None;
        self.new_best = false;
    }

    /// Compare two consecutive frames and, on the RUNNING → OVER edge,
    /// submit the score and record the final line.  Returns true when the
    /// edge fired; any other pair of states is a no-op.
    pub fn observe_frame(
        &mut self,
        before: &GameState,
        after: &GameState,
        worker: &StoreWorker,
    ) -> bool {
        if before.status != GameStatus::Running || after.status != GameStatus::Over {
            return false;
        }
        log::info!("game over at frame {} with score {}", after.frame, after.score);
        worker.submit_score(after.score);
        if self.record_game_over(after.score) {
            log::info!("new high score {}", after.score);
        }
        true
    }

    /// Ranked lines: `"1. 50"`, `"2. 30"`, ...
    pub fn leaderboard_lines(&self) -> Vec<String> {
        self.leaderboard
            .iter()
            .enumerate()
            .map(|(i, score)| format!("{}. {}", i + 1, score))
            .collect()
    }
}
