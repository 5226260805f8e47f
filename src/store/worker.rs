/// Background thread that runs store calls off the game thread.
///
/// Requests are fire-and-forget: `send` never blocks and nothing is retried.
/// Failures are logged and produce no reply, so whatever the scoreboard
/// already shows stays on screen.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::ScoreStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreRequest {
    SubmitScore(u32),
    FetchHighScore,
    FetchLeaderboard,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreReply {
    HighScore(u32),
    Leaderboard(Vec<u32>),
    /// The store accepted this score.  Fresh `HighScore` and
    /// `Leaderboard` replies follow.
    Submitted(u32),
}

pub struct StoreWorker {
    tx: Option<Sender<StoreRequest>>,
    rx: Receiver<StoreReply>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWorker {
    pub fn spawn(store: Box<dyn ScoreStore + Send>) -> Self {
        let (tx, requests) = mpsc::channel::<StoreRequest>();
        let (replies, rx) = mpsc::channel::<StoreReply>();

        let handle = thread::spawn(move || {
            // Ends once every sender is gone or the game stops listening.
            for request in requests {
                if !serve(store.as_ref(), request, &replies) {
                    break;
                }
            }
            log::debug!("store worker stopped");
        });

        Self {
            tx: Some(tx),
            rx,
            handle: Some(handle),
        }
    }

    pub fn send(&self, request: StoreRequest) {
        let delivered = self
            .tx
            .as_ref()
            .map(|tx| tx.send(request.clone()).is_ok())
            .unwrap_or(false);
        if !delivered {
            log::warn!("store worker gone, dropping {request:?}");
        }
    }

    pub fn submit_score(&self, score: u32) {
        self.send(StoreRequest::SubmitScore(score));
    }

    pub fn fetch_high_score(&self) {
        self.send(StoreRequest::FetchHighScore);
    }

    pub fn fetch_leaderboard(&self) {
        self.send(StoreRequest::FetchLeaderboard);
    }

    /// Every reply that has arrived so far, without waiting.
    pub fn drain(&self) -> Vec<StoreReply> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next reply.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<StoreReply> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Let queued requests finish, join the thread and hand back any
    /// replies nobody drained yet.
    pub fn shutdown(mut self) -> Vec<StoreReply> {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("store worker panicked");
            }
        }
        self.drain()
    }

    /// Like `shutdown`, but gives up after `timeout` if a request is still
    /// in flight.  Whatever has not run by then is dropped and logged.
    pub fn shutdown_within(mut self, timeout: Duration) -> Vec<StoreReply> {
        self.tx.take();
        let deadline = Instant::now() + timeout;
        if let Some(handle) = self.handle.take() {
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            if handle.is_finished() {
                if handle.join().is_err() {
                    log::error!("store worker panicked");
                }
            } else {
                log::warn!("store worker still busy after {timeout:?}, abandoning pending requests");
            }
        }
        self.drain()
    }
}

impl Drop for StoreWorker {
    // Does not join: an in-flight request may still be waiting on the network.
    fn drop(&mut self) {
        self.tx.take();
    }
}

/// Run one request.  Returns false once the reply channel is closed.
fn serve(store: &dyn ScoreStore, request: StoreRequest, replies: &Sender<StoreReply>) -> bool {
    match request {
        StoreRequest::SubmitScore(score) => match store.submit_score(score) {
            Ok(()) => {
                log::info!("score {score} submitted");
                replies.send(StoreReply::Submitted(score)).is_ok()
                    && serve(store, StoreRequest::FetchHighScore, replies)
                    && serve(store, StoreRequest::FetchLeaderboard, replies)
            }
            Err(err) => {
                log::warn!("submitting score {score} failed: {err}");
                true
            }
        },
        StoreRequest::FetchHighScore => match store.fetch_high_score() {
            Ok(score) => replies.send(StoreReply::HighScore(score)).is_ok(),
            Err(err) => {
                log::warn!("fetching high score failed: {err}");
                true
            }
        },
        StoreRequest::FetchLeaderboard => match store.fetch_leaderboard() {
            Ok(scores) => replies.send(StoreReply::Leaderboard(scores)).is_ok(),
            Err(err) => {
                log::warn!("fetching leaderboard failed: {err}");
                true
            }
        },
    }
}
