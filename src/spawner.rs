/// Enemy spawning on a wall-clock timer.
///
/// The timer runs independently of the frame rate: the host polls it once
/// per frame and spawns however many enemies came due since the last poll.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::entities::{Entity, GameState, GameStatus, ENEMY_SIZE};

pub const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Clone, Debug)]
pub struct Spawner {
    interval: Duration,
    next_due: Instant,
}

impl Spawner {
    /// First enemy arrives one full interval after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of spawns due at `now`.  Advances the schedule by whole
    /// intervals so a stalled host catches up instead of drifting.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        let mut due = 0;
        while now >= self.next_due {
            due += 1;
            self.next_due += self.interval;
        }
        due
    }

    /// Restart the schedule, e.g. after a reset.
    pub fn restart(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }
}

/// Add one enemy at the top edge with a uniformly random x in
/// `[0, width - enemy_w)`.  Does nothing once the game is over.
pub fn spawn_enemy(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::Over {
        return state.clone();
    }
    let span = state.width - ENEMY_SIZE.0;
    let x = if span > 0.0 { rng.gen_range(0.0..span) } else { 0.0 };

    let mut enemies = state.enemies.clone();
    enemies.push(Entity::enemy(x, 0.0));
    GameState {
        enemies,
        ..state.clone()
    }
}
