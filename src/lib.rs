//! Space Impact: a small terminal arcade shooter.
//!
//! - `entities`: pure data (entity, input snapshot, session state)
//! - `compute`: movement, collisions, scoring, game over, per-frame tick
//! - `spawner`: wall-clock enemy spawning
//! - `scoreboard`: high score / leaderboard as shown to the player
//! - `store`: score persistence (HTTP service, local file, memory)
//! - `config`: command line and environment settings

pub mod compute;
pub mod config;
pub mod entities;
pub mod scoreboard;
pub mod spawner;
pub mod store;

pub use config::Config;
pub use scoreboard::Scoreboard;
