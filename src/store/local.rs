/// Append-only score file: one decimal score per line.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{top_scores, ScoreStore, StoreError};

const FILE_NAME: &str = ".space_impact_scores";

/// `$HOME/.space_impact_scores`, or the working directory without a HOME.
pub fn default_scores_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(FILE_NAME)
}

#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored scores in file order.  A missing file is an empty store;
    /// unreadable lines are skipped.
    pub fn read_scores(&self) -> Result<Vec<u32>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let scores: Vec<u32> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(i, line)| match line.trim().parse() {
                Ok(score) => Some(score),
                Err(_) => {
                    log::warn!("{}:{}: skipping bad score {:?}", self.path.display(), i + 1, line);
                    None
                }
            })
            .collect();
        Ok(scores)
    }
}

impl ScoreStore for LocalStore {
    fn submit_score(&self, score: u32) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{score}")?;
        Ok(())
    }

    fn fetch_high_score(&self) -> Result<u32, StoreError> {
        Ok(self.read_scores()?.into_iter().max().unwrap_or(0))
    }

    fn fetch_leaderboard(&self) -> Result<Vec<u32>, StoreError> {
        Ok(top_scores(&self.read_scores()?))
    }
}
