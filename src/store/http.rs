use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{ScoreStore, StoreError};

pub const SUBMIT_PATH: &str = "save_score.php";
pub const HIGH_SCORE_PATH: &str = "get_high_score.php";
pub const LEADERBOARD_PATH: &str = "get_leaderboard.php";

/// Plain-text body older store deployments send on a successful insert.
pub const LEGACY_SUBMIT_OK: &str = "New record created successfully";

// Thin blocking reqwest client for the leaderboard service.
#[derive(Clone, Debug)]
pub struct HttpStore {
    http: Client,
    base_url: String,
}

impl HttpStore {
    /// `timeout: None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get_text(&self, path: &str) -> Result<String, StoreError> {
        let res = self
            .http
            .get(self.url(path))
            .send()
            .map_err(StoreError::Transport)?;
        let status = res.status();
        let body = res.text().map_err(StoreError::Transport)?;
        if !status.is_success() {
            return Err(upstream(status, &body));
        }
        Ok(body)
    }
}

impl ScoreStore for HttpStore {
    fn submit_score(&self, score: u32) -> Result<(), StoreError> {
        // Form-encoded, matching what the service's insert endpoint reads.
        let res = self
            .http
            .post(self.url(SUBMIT_PATH))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!("score={score}"))
            .send()
            .map_err(StoreError::Transport)?;
        let status = res.status();
        let body = res.text().map_err(StoreError::Transport)?;
        interpret_submit(status, &body)
    }

    fn fetch_high_score(&self) -> Result<u32, StoreError> {
        parse_high_score(&self.get_text(HIGH_SCORE_PATH)?)
    }

    fn fetch_leaderboard(&self) -> Result<Vec<u32>, StoreError> {
        parse_leaderboard(&self.get_text(LEADERBOARD_PATH)?)
    }
}

fn upstream(status: StatusCode, body: &str) -> StoreError {
    let body = body.trim();
    StoreError::Upstream {
        status,
        message: (!body.is_empty()).then(|| body.to_string()),
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

/// Scores arrive as JSON numbers or, from MySQL-backed endpoints, as
/// numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireScore {
    Number(u64),
    Text(String),
}

impl WireScore {
    fn value(&self) -> Result<u32, StoreError> {
        match self {
            WireScore::Number(n) => u32::try_from(*n)
                .map_err(|_| StoreError::Decode(format!("score {n} out of range"))),
            WireScore::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| StoreError::Decode(format!("score {s:?} is not a number"))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HighScoreResponse {
    // MAX() over an empty table comes back as null.
    #[serde(rename = "highScore")]
    high_score: Option<WireScore>,
}

#[derive(Debug, Deserialize)]
struct LeaderboardRow {
    score: WireScore,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

fn decode<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|err| StoreError::Decode(err.to_string()))
}

/// `{ "highScore": 50 }` → 50; a null or missing value means no records.
pub fn parse_high_score(body: &str) -> Result<u32, StoreError> {
    let res: HighScoreResponse = decode(body)?;
    match res.high_score {
        Some(score) => score.value(),
        None => Ok(0),
    }
}

/// `[{ "score": 50 }, { "score": 30 }]` → `[50, 30]`, in served order.
pub fn parse_leaderboard(body: &str) -> Result<Vec<u32>, StoreError> {
    let rows: Vec<LeaderboardRow> = decode(body)?;
    rows.iter().map(|row| row.score.value()).collect()
}

/// Decide whether a submit succeeded.
///
/// A 2xx with `{ "success": true }` is success, `{ "success": false, .. }`
/// is a rejection.  Bodies that are not that object are accepted only if
/// they are exactly the legacy success sentence.
pub fn interpret_submit(status: StatusCode, body: &str) -> Result<(), StoreError> {
    if !status.is_success() {
        return Err(upstream(status, body));
    }
    match serde_json::from_str::<SubmitResponse>(body) {
        Ok(SubmitResponse { success: true, .. }) => Ok(()),
        Ok(SubmitResponse { message, .. }) => Err(StoreError::Rejected(
            message.unwrap_or_else(|| "success=false".to_string()),
        )),
        Err(_) if body.trim() == LEGACY_SUBMIT_OK => Ok(()),
        Err(_) => Err(StoreError::Rejected(body.trim().to_string())),
    }
}
