//! Built-in sensor simulator.
//!
//! Cycles through rest, tilt, walk and shake phases and runs each synthetic
//! sample through the same classifier the sensor firmware uses, so the
//! dashboard can be exercised without hardware.

use super::SummarySource;
use crate::analysis::BehaviorClassifier;
use crate::error::FetchError;
use crate::summary::{Axes, SensorSummary};
use async_trait::async_trait;
use std::f64::consts::PI;
use std::sync::Mutex;
use std::time::Instant;

/// Samples spent in each phase before moving on.
const PHASE_LEN: u64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Rest,
    Tilt,
    Walk,
    Shake,
}

impl Phase {
    fn at(step: u64) -> Self {
        match (step / PHASE_LEN) % 4 {
            0 => Phase::Rest,
            1 => Phase::Tilt,
            2 => Phase::Walk,
            _ => Phase::Shake,
        }
    }
}

struct SimState {
    step: u64,
    classifier: BehaviorClassifier,
}

/// Summary source backed by a deterministic signal generator
pub struct SimulatedSource {
    state: Mutex<SimState>,
    started: Instant,
}

impl SimulatedSource {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                step: 0,
                classifier: BehaviorClassifier::new(),
            }),
            started: Instant::now(),
        }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Small deterministic jitter in roughly [-amp, amp]
fn jitter(step: u64, salt: f64, amp: f64) -> f64 {
    let t = step as f64;
    amp * ((t * 1.7 + salt).sin() * 0.6 + (t * 0.31 + salt * 2.0).sin() * 0.4)
}

fn sample(step: u64) -> (Axes, Axes) {
    let t = step as f64;
    let accel = match Phase::at(step) {
        Phase::Rest => Axes::new(jitter(step, 0.1, 0.02), jitter(step, 0.2, 0.02), 1.0 + jitter(step, 0.3, 0.01)),
        Phase::Tilt => Axes::new(
            1.1 + jitter(step, 0.4, 0.05),
            0.2 + jitter(step, 0.5, 0.05),
            0.6 + jitter(step, 0.6, 0.05),
        ),
        // One stride every four samples, +-0.25g around 1g
        Phase::Walk => Axes::new(
            0.1 + jitter(step, 0.7, 0.05),
            0.15 + jitter(step, 0.8, 0.05),
            1.0 + 0.25 * (PI / 2.0 * t + PI / 4.0).sin().signum(),
        ),
        Phase::Shake => Axes::new(
            1.2 * (t * 2.3).sin(),
            3.8 * (t * 1.9).sin().signum(),
            1.0 + 0.8 * (t * 2.9).cos(),
        ),
    };

    let spin = match Phase::at(step) {
        Phase::Rest => 0.5,
        Phase::Tilt => 5.0,
        Phase::Walk => 20.0,
        Phase::Shake => 150.0,
    };
    let gyro = Axes::new(
        spin * (t * 0.9).sin() + jitter(step, 1.1, 0.3),
        spin * (t * 1.3).cos() + jitter(step, 1.2, 0.3),
        spin * 0.5 * (t * 0.7).sin() + jitter(step, 1.3, 0.3),
    );

    (accel, gyro)
}

#[async_trait]
impl SummarySource for SimulatedSource {
    async fn fetch(&self) -> Result<SensorSummary, FetchError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| FetchError::MalformedResponse("simulator state poisoned".to_string()))?;

        let step = state.step;
        state.step += 1;

        let (accel, gyro) = sample(step);
        let (motion, summary) = state.classifier.classify(accel);

        Ok(SensorSummary {
            motion,
            summary,
            accel,
            gyro,
            timestamp: Some(self.started.elapsed().as_secs_f64()),
        })
    }

    fn describe(&self) -> String {
        "simulator".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_fetch_initializes() {
        let source = SimulatedSource::new();
        let summary = source.fetch().await.unwrap();
        assert_eq!(summary.motion, "Initializing");
        assert_eq!(summary.summary.behavior, "stable");
        assert!(summary.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_phases_produce_distinct_behaviors() {
        let source = SimulatedSource::new();
        let mut behaviors = Vec::new();
        for _ in 0..(PHASE_LEN * 4) {
            let summary = source.fetch().await.unwrap();
            if !behaviors.contains(&summary.summary.behavior) {
                behaviors.push(summary.summary.behavior);
            }
        }
        assert!(behaviors.contains(&"stable".to_string()));
        assert!(behaviors.contains(&"tilting".to_string()));
        assert!(behaviors.contains(&"walking".to_string()));
        assert!(behaviors.contains(&"shaking".to_string()));
    }
}
