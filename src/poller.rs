//! Poll tick logic.
//!
//! Each live tick spawns one fetch tagged with a monotonic sequence number.
//! Completions come back over a channel to the driver loop, which applies
//! them to the session state in order and drops anything stale.

use crate::error::FetchError;
use crate::source::SummarySource;
use crate::summary::SensorSummary;
use crate::ui::App;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// In-flight completions buffered before spawned fetches wait on the driver.
const OUTCOME_QUEUE: usize = 64;

/// Result of one spawned fetch
#[derive(Debug)]
pub struct PollOutcome {
    pub seq: u64,
    pub result: Result<SensorSummary, FetchError>,
}

/// What applying an outcome did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// Sample rendered into every view
    Rendered,
    /// Fetch or decode failed; nothing changed
    Failed,
    /// A newer sample was already applied
    Stale,
    /// Polling was paused before the response arrived
    Paused,
}

pub struct Poller {
    source: Arc<dyn SummarySource>,
    timeout: Duration,
    next_seq: u64,
    last_applied: Option<u64>,
    outcomes: mpsc::Sender<PollOutcome>,
}

impl Poller {
    /// Create a poller and the receiver its fetch results arrive on
    pub fn new(
        source: Arc<dyn SummarySource>,
        timeout: Duration,
    ) -> (Self, mpsc::Receiver<PollOutcome>) {
        let (tx, rx) = mpsc::channel(OUTCOME_QUEUE);
        let poller = Self {
            source,
            timeout,
            next_seq: 0,
            last_applied: None,
            outcomes: tx,
        };
        (poller, rx)
    }

    /// Start one poll tick. Returns the sequence number of the spawned
    /// fetch, or `None` when polling is paused.
    pub fn tick(&mut self, app: &App) -> Option<u64> {
        if !app.is_live() {
            trace!("Polling paused, skipping tick");
            return None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let source = Arc::clone(&self.source);
        let outcomes = self.outcomes.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            let result = fetch_with_timeout(source.as_ref(), timeout).await;
            // Receiver only goes away at shutdown
            let _ = outcomes.send(PollOutcome { seq, result }).await;
        });

        Some(seq)
    }

    /// Apply a finished fetch to the session state.
    pub fn apply(&mut self, app: &mut App, outcome: PollOutcome, now: DateTime<Local>) -> TickReport {
        let PollOutcome { seq, result } = outcome;

        if !app.is_live() {
            debug!(seq, "Dropping response that arrived while paused");
            return TickReport::Paused;
        }

        if self.last_applied.is_some_and(|last| seq <= last) {
            debug!(seq, last_applied = ?self.last_applied, "Dropping stale response");
            return TickReport::Stale;
        }

        match result {
            Ok(summary) => {
                app.apply_summary(&summary, now);
                self.last_applied = Some(seq);
                trace!(seq, motion = %summary.motion, "Applied sensor summary");
                TickReport::Rendered
            }
            Err(e) => {
                warn!(seq, error = %e, "Sensor summary fetch failed");
                TickReport::Failed
            }
        }
    }
}

/// One fetch bounded by the configured request timeout
pub async fn fetch_with_timeout(
    source: &dyn SummarySource,
    timeout: Duration,
) -> Result<SensorSummary, FetchError> {
    tokio::time::timeout(timeout, source.fetch())
        .await
        .map_err(|_| FetchError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSummarySource;
    use crate::ui::app::tests::{at, new_app, sample};
    use std::io;

    fn poller_with(mock: MockSummarySource) -> (Poller, mpsc::Receiver<PollOutcome>) {
        Poller::new(Arc::new(mock), Duration::from_millis(500))
    }

    fn ok(seq: u64, motion: &str, behavior: &str) -> PollOutcome {
        PollOutcome {
            seq,
            result: Ok(sample(motion, behavior)),
        }
    }

    #[tokio::test]
    async fn test_tick_fetches_and_renders() {
        let mut mock = MockSummarySource::new();
        mock.expect_fetch()
            .times(1)
            .returning(|| Ok(sample("X-axis movement", "walking")));
        let (mut poller, mut rx) = poller_with(mock);
        let mut app = new_app();

        assert_eq!(poller.tick(&app), Some(0));
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.seq, 0);

        assert_eq!(poller.apply(&mut app, outcome, at(12, 0, 0)), TickReport::Rendered);
        assert_eq!(app.fields.accel[0], "1.23");
        assert_eq!(app.accel.len(), 1);
        assert_eq!(app.log.len(), 1);
        assert_eq!(app.tally.count("walking"), Some(1));
    }

    #[tokio::test]
    async fn test_paused_tick_never_fetches() {
        let mut mock = MockSummarySource::new();
        mock.expect_fetch().times(0);
        let (mut poller, mut rx) = poller_with(mock);
        let mut app = new_app();
        app.toggle_live();

        for _ in 0..5 {
            assert_eq!(poller.tick(&app), None);
        }
        assert!(rx.try_recv().is_err());
        assert!(app.accel.is_empty());
        assert!(app.log.is_empty());
        assert!(app.tally.is_empty());
        assert_eq!(app.fields.motion, "--");
    }

    #[tokio::test]
    async fn test_network_error_mutates_nothing() {
        let mut mock = MockSummarySource::new();
        let mut calls = 0;
        mock.expect_fetch().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(FetchError::Io(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )))
            } else {
                Ok(sample("Stable", "stable"))
            }
        });
        let (mut poller, mut rx) = poller_with(mock);
        let mut app = new_app();
        app.apply_summary(&sample("Y-axis movement", "moving"), at(6, 0, 0));
        let fields = app.fields.clone();

        poller.tick(&app);
        let failed = rx.recv().await.unwrap();
        assert_eq!(poller.apply(&mut app, failed, at(6, 0, 1)), TickReport::Failed);
        assert_eq!(app.fields, fields);
        assert_eq!(app.accel.len(), 1);
        assert_eq!(app.log.len(), 1);
        assert_eq!(app.tally.count("moving"), Some(1));

        // Next tick proceeds normally
        poller.tick(&app);
        let next = rx.recv().await.unwrap();
        assert_eq!(next.seq, 1);
        assert_eq!(poller.apply(&mut app, next, at(6, 0, 2)), TickReport::Rendered);
        assert_eq!(app.accel.len(), 2);
        assert_eq!(app.fields.last_moved, "06:00:00");
    }

    #[tokio::test]
    async fn test_stale_response_dropped() {
        let (mut poller, _rx) = poller_with(MockSummarySource::new());
        let mut app = new_app();

        assert_eq!(poller.apply(&mut app, ok(3, "Stable", "a"), at(5, 0, 0)), TickReport::Rendered);
        assert_eq!(poller.apply(&mut app, ok(2, "Stable", "b"), at(5, 0, 1)), TickReport::Stale);
        assert_eq!(poller.apply(&mut app, ok(3, "Stable", "c"), at(5, 0, 1)), TickReport::Stale);
        assert_eq!(poller.apply(&mut app, ok(4, "Stable", "d"), at(5, 0, 2)), TickReport::Rendered);

        let labels: Vec<&str> = app.accel.labels().iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["05:00:00", "05:00:02"]);
        assert_eq!(app.tally.count("b"), None);
    }

    #[tokio::test]
    async fn test_response_after_pause_dropped() {
        let (mut poller, _rx) = poller_with(MockSummarySource::new());
        let mut app = new_app();
        app.toggle_live();

        assert_eq!(poller.apply(&mut app, ok(0, "Stable", "idle"), at(1, 0, 0)), TickReport::Paused);
        assert!(app.log.is_empty());
        assert!(app.tally.is_empty());
    }

    #[tokio::test]
    async fn test_behavior_sequence_tally() {
        let (mut poller, _rx) = poller_with(MockSummarySource::new());
        let mut app = new_app();
        for (seq, behavior) in ["walk", "walk", "idle", "walk"].into_iter().enumerate() {
            poller.apply(&mut app, ok(seq as u64, "Stable", behavior), at(2, 0, seq as u32));
        }
        let tally: Vec<(&str, u64)> = app.tally.iter().collect();
        assert_eq!(tally, vec![("walk", 3), ("idle", 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_times_out() {
        struct Hanging;

        #[async_trait::async_trait]
        impl SummarySource for Hanging {
            async fn fetch(&self) -> Result<SensorSummary, FetchError> {
                std::future::pending().await
            }

            fn describe(&self) -> String {
                "hanging".to_string()
            }
        }

        let result = fetch_with_timeout(&Hanging, Duration::from_millis(250)).await;
        assert!(matches!(result, Err(FetchError::Timeout(_))));
    }
}
