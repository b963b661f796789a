//! Service layer driving the poll and clock timers.
//!
//! The service can run in either interactive (terminal dashboard) or
//! headless (log only) mode. Both modes run one cooperative loop that owns
//! the session state; fetches run as spawned tasks and report back through
//! the poller's channel.

use crate::config::AppConfig;
use crate::error::{Result, ServiceError, UiError};
use crate::poller::{Poller, TickReport};
use crate::source::{self, SummarySource};
use crate::ui::{self, App, InputAction, Tui};
use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Redraw cadence of the interactive dashboard (~30 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Run mode for the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive mode with TUI
    Interactive,
    /// Background mode, samples go to the log
    Headless,
}

/// Owns the configuration, the summary source and the shutdown signal
pub struct DashboardService {
    config: Arc<AppConfig>,
    source: Arc<dyn SummarySource>,
    shutdown: CancellationToken,
}

impl DashboardService {
    /// Create a new dashboard service
    pub fn new(config: Arc<AppConfig>, simulate: bool) -> Result<Self> {
        let source = source::from_config(&config.source, simulate)?;
        Ok(Self::with_source(config, source))
    }

    /// Create a service around an already built source
    pub fn with_source(config: Arc<AppConfig>, source: Arc<dyn SummarySource>) -> Self {
        Self {
            config,
            source,
            shutdown: CancellationToken::new(),
        }
    }

    /// Get the shutdown token
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    fn new_app(&self) -> App {
        App::new(&self.config.dashboard, self.source.describe())
    }

    fn new_poller(&self) -> (Poller, tokio::sync::mpsc::Receiver<crate::poller::PollOutcome>) {
        Poller::new(
            Arc::clone(&self.source),
            Duration::from_millis(self.config.source.request_timeout_ms),
        )
    }

    fn timers(&self) -> (Interval, Interval) {
        let mut poll = interval(Duration::from_millis(self.config.dashboard.poll_interval_ms));
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut clock = interval(Duration::from_millis(self.config.dashboard.clock_interval_ms));
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
        (poll, clock)
    }

    /// Run the terminal dashboard until the user quits or shutdown is signalled
    pub async fn run_interactive(&self) -> Result<()> {
        info!("Starting dashboard in interactive mode");
        let mut app = self.new_app();
        let (mut poller, mut outcomes) = self.new_poller();
        let (mut poll_timer, mut clock_timer) = self.timers();
        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut events = EventStream::new();

        let mut tui = Tui::enter()?;

        while !app.should_quit {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = poll_timer.tick() => on_timer(&mut app, &mut poller, Timer::Poll, Local::now()),
                _ = clock_timer.tick() => on_timer(&mut app, &mut poller, Timer::Clock, Local::now()),
                Some(outcome) = outcomes.recv() => {
                    poller.apply(&mut app, outcome, Local::now());
                }
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) => handle_action(&mut app, ui::map_key_to_action(key)),
                    Some(Ok(Event::Resize(..))) => app.request_redraw(),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(UiError::InputError(e.to_string()).into()),
                    None => break,
                },
                _ = frame_timer.tick() => {
                    if app.take_redraw() {
                        tui.draw(&app)?;
                    }
                }
            }
        }

        drop(tui);
        self.shutdown.cancel();
        info!("Dashboard stopped");
        Ok(())
    }

    /// Run without a terminal UI, logging every rendered sample
    pub async fn run_headless(&self) -> Result<()> {
        info!(source = %self.source.describe(), "Starting dashboard in headless mode");
        let mut app = self.new_app();
        self.drive_headless(&mut app).await;

        if app.tally.is_empty() {
            info!("Dashboard stopped before any sample was rendered");
            return Ok(());
        }

        let tally = app
            .tally
            .iter()
            .map(|(behavior, count)| format!("{}={}", behavior, count))
            .collect::<Vec<_>>()
            .join(", ");
        info!(tally = %tally, "Dashboard stopped");
        Ok(())
    }

    async fn drive_headless(&self, app: &mut App) {
        let (mut poller, mut outcomes) = self.new_poller();
        let (mut poll_timer, mut clock_timer) = self.timers();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = poll_timer.tick() => on_timer(app, &mut poller, Timer::Poll, Local::now()),
                _ = clock_timer.tick() => on_timer(app, &mut poller, Timer::Clock, Local::now()),
                Some(outcome) = outcomes.recv() => {
                    if poller.apply(app, outcome, Local::now()) == TickReport::Rendered {
                        log_newest_row(app);
                    }
                }
            }
        }
    }
}

/// Periodic timers shared by both driver loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Poll,
    Clock,
}

// The clock is stamped whether or not polling is live.
fn on_timer(app: &mut App, poller: &mut Poller, timer: Timer, now: DateTime<Local>) {
    match timer {
        Timer::Poll => {
            poller.tick(app);
        }
        Timer::Clock => app.stamp_clock(now),
    }
}

fn handle_action(app: &mut App, action: InputAction) {
    match action {
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleLive => app.toggle_live(),
        InputAction::CycleChartKind => app.cycle_chart_kind(),
        InputAction::ToggleHelp => app.toggle_help(),
        InputAction::None => {}
    }
}

fn log_newest_row(app: &App) {
    if let Some(row) = app.log.newest() {
        info!(
            time = %row.time,
            motion = %row.motion,
            behavior = %row.behavior,
            walking = %row.walking,
            variance_z = %row.variance,
            accel = ?app.fields.accel,
            gyro = ?app.fields.gyro,
            "Sensor sample"
        );
    }
}

/// Cancel the shutdown token on SIGINT or SIGTERM
#[cfg(unix)]
pub fn setup_signal_handler(shutdown: CancellationToken) -> Result<()> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook_tokio::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| ServiceError::SignalError(e.to_string()))?;
    let handle = signals.handle();

    tokio::spawn(async move {
        tokio::select! {
            signal = signals.next() => {
                if let Some(signal) = signal {
                    info!(signal, "Received shutdown signal");
                }
                shutdown.cancel();
            }
            _ = shutdown.cancelled() => {}
        }
        handle.close();
        debug!("Signal handler stopped");
    });

    Ok(())
}

/// Cancel the shutdown token on Ctrl-C
#[cfg(not(unix))]
pub fn setup_signal_handler(shutdown: CancellationToken) -> Result<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
        }
        shutdown.cancel();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSummarySource;
    use crate::summary::{Axes, BehaviorSummary, SensorSummary};
    use crate::ui::app::tests::at;

    fn fast_config() -> Arc<AppConfig> {
        let mut config = AppConfig::default();
        config.dashboard.poll_interval_ms = 10;
        config.dashboard.clock_interval_ms = 20;
        Arc::new(config)
    }

    #[test]
    fn test_run_mode() {
        assert_eq!(RunMode::Interactive, RunMode::Interactive);
        assert_ne!(RunMode::Interactive, RunMode::Headless);
    }

    #[test]
    fn test_handle_action() {
        let mut app = App::new(&AppConfig::default().dashboard, "test".to_string());
        handle_action(&mut app, InputAction::ToggleLive);
        assert!(!app.is_live());
        handle_action(&mut app, InputAction::ToggleHelp);
        assert!(app.show_help);
        handle_action(&mut app, InputAction::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_timers_while_paused() {
        let mut mock = MockSummarySource::new();
        mock.expect_fetch().never();
        let (mut poller, _outcomes) = Poller::new(Arc::new(mock), Duration::from_secs(1));
        let mut app = App::new(&AppConfig::default().dashboard, "test".to_string());
        app.toggle_live();

        on_timer(&mut app, &mut poller, Timer::Poll, at(8, 30, 0));
        assert!(app.fields.status_time.is_empty());

        on_timer(&mut app, &mut poller, Timer::Clock, at(8, 30, 1));
        assert_eq!(app.fields.status_time, "08:30:01");
        on_timer(&mut app, &mut poller, Timer::Clock, at(8, 30, 2));
        assert_eq!(app.fields.status_time, "08:30:02");
        assert!(app.log.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_headless_loop_keeps_clock_running_while_paused() {
        let mut mock = MockSummarySource::new();
        mock.expect_describe().returning(|| "mock".to_string());
        mock.expect_fetch().never();

        let service = DashboardService::with_source(fast_config(), Arc::new(mock));
        let mut app = service.new_app();
        app.toggle_live();

        let shutdown = service.shutdown_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            shutdown.cancel();
        });

        service.drive_headless(&mut app).await;
        assert!(!app.fields.status_time.is_empty());
        assert!(app.accel.is_empty());
        assert!(app.log.is_empty());
        assert!(app.tally.is_empty());
    }

    #[tokio::test]
    async fn test_headless_polls_until_shutdown() {
        let mut mock = MockSummarySource::new();
        mock.expect_describe().returning(|| "mock".to_string());
        mock.expect_fetch().times(1..).returning(|| {
            Ok(SensorSummary {
                motion: "Stable".to_string(),
                summary: BehaviorSummary {
                    behavior: "stable".to_string(),
                    walking: false,
                    variance_z: 0.0,
                    intensity: None,
                    tilt: None,
                },
                accel: Axes::new(0.0, 0.0, 1.0),
                gyro: Axes::default(),
                timestamp: None,
            })
        });

        let service = DashboardService::with_source(fast_config(), Arc::new(mock));
        let shutdown = service.shutdown_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            shutdown.cancel();
        });

        service.run_headless().await.unwrap();
    }
}
