//! Score persistence.
//!
//! The game only ever needs three things from a store: append a final
//! score, read the best score, read the top ten.  `ScoreStore` captures
//! that; `HttpStore` talks to the remote leaderboard service, `LocalStore`
//! keeps an append-only file, `MemoryStore` lives and dies with the process.
//!
//! Store calls block, so the game never makes them directly: it hands
//! requests to a `StoreWorker` and picks up replies between frames.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub mod http;
pub mod local;
pub mod worker;

pub use http::HttpStore;
pub use local::LocalStore;
pub use worker::{StoreReply, StoreRequest, StoreWorker};

use crate::scoreboard::LEADERBOARD_SIZE;

pub trait ScoreStore {
    /// Append one final score.
    fn submit_score(&self, score: u32) -> Result<(), StoreError>;
    /// Best persisted score, 0 when nothing has been stored yet.
    fn fetch_high_score(&self) -> Result<u32, StoreError>;
    /// At most ten scores, best first.
    fn fetch_leaderboard(&self) -> Result<Vec<u32>, StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    Transport(reqwest::Error),
    Upstream {
        status: reqwest::StatusCode,
        message: Option<String>,
    },
    Decode(String),
    /// The store answered but did not accept the score.
    Rejected(String),
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(err) => write!(f, "store transport error: {err}"),
            StoreError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "store upstream error {status}: {message}")
                } else {
                    write!(f, "store upstream error {status}")
                }
            }
            StoreError::Decode(msg) => write!(f, "store response decode error: {msg}"),
            StoreError::Rejected(body) => write!(f, "store rejected score: {body}"),
            StoreError::Io(err) => write!(f, "score file error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Transport(err) => Some(err),
            StoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Which store a session should use.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreBackend {
    Http {
        url: String,
        timeout: Option<Duration>,
    },
    Local {
        path: PathBuf,
    },
    Memory,
}

pub fn open_store(backend: &StoreBackend) -> Result<Box<dyn ScoreStore + Send>, StoreError> {
    let store: Box<dyn ScoreStore + Send> = match backend {
        StoreBackend::Http { url, timeout } => {
            Box::new(HttpStore::new(url.clone(), *timeout).map_err(StoreError::Transport)?)
        }
        StoreBackend::Local { path } => Box::new(LocalStore::new(path.clone())),
        StoreBackend::Memory => Box::new(MemoryStore::new()),
    };
    Ok(store)
}

/// Best `LEADERBOARD_SIZE` scores, descending.
pub fn top_scores(scores: &[u32]) -> Vec<u32> {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.truncate(LEADERBOARD_SIZE);
    sorted
}

// ── In-memory store ──────────────────────────────────────────────────────────

/// Scores kept for the lifetime of the process.  Clones share storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    scores: Arc<Mutex<Vec<u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: impl IntoIterator<Item = u32>) -> Self {
        Self {
            scores: Arc::new(Mutex::new(scores.into_iter().collect())),
        }
    }

    /// Everything submitted so far, in submission order.
    pub fn scores(&self) -> Vec<u32> {
        self.scores.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ScoreStore for MemoryStore {
    fn submit_score(&self, score: u32) -> Result<(), StoreError> {
        self.scores
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(score);
        Ok(())
    }

    fn fetch_high_score(&self) -> Result<u32, StoreError> {
        Ok(self.scores().into_iter().max().unwrap_or(0))
    }

    fn fetch_leaderboard(&self) -> Result<Vec<u32>, StoreError> {
        Ok(top_scores(&self.scores()))
    }
}
