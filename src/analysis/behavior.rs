//! Motion and behavior classification from accelerometer samples.
//!
//! Mirrors the rules the sensor firmware applies before serving `/data`, so
//! the simulated source produces summaries shaped like the real ones.

use crate::summary::{Axes, BehaviorSummary};
use std::collections::VecDeque;

/// Z samples kept for variance and oscillation checks (~2 seconds at 10Hz).
pub const WINDOW_SIZE: usize = 20;

/// Motion value reported when no axis moved past the threshold.
pub const STABLE: &str = "Stable";

/// Classifies raw accelerometer samples into motion and behavior labels.
#[derive(Debug, Clone, Default)]
pub struct BehaviorClassifier {
    last_accel: Option<Axes>,
    window: VecDeque<f64>,
}

impl BehaviorClassifier {
    pub fn new() -> Self {
        Self {
            last_accel: None,
            window: VecDeque::with_capacity(WINDOW_SIZE + 1),
        }
    }

    /// Classify one sample, returning the motion label and behavior summary.
    pub fn classify(&mut self, accel: Axes) -> (String, BehaviorSummary) {
        // Motion uses the window as it was before this sample
        let motion = self.detect_motion(accel);
        let summary = self.analyze_behavior(accel);
        (motion.to_string(), summary)
    }

    fn detect_motion(&mut self, accel: Axes) -> &'static str {
        let Some(last) = self.last_accel.replace(accel) else {
            return "Initializing";
        };

        let threshold = (variance(&self.window) * 20.0).clamp(0.2, 1.0);

        if (accel.x - last.x).abs() > threshold {
            "X-axis movement"
        } else if (accel.y - last.y).abs() > threshold {
            "Y-axis movement"
        } else if (accel.z - last.z).abs() > threshold {
            "Z-axis movement"
        } else {
            STABLE
        }
    }

    fn analyze_behavior(&mut self, accel: Axes) -> BehaviorSummary {
        let abs_x = accel.x.abs();
        let abs_y = accel.y.abs();
        let abs_z = accel.z.abs();
        let total = abs_x + abs_y + abs_z;

        self.window.push_back(accel.z);
        if self.window.len() > WINDOW_SIZE {
            self.window.pop_front();
        }

        let var_z = variance(&self.window);
        let crossings = self.crossings_around_one_g();

        let walking = self.window.len() == WINDOW_SIZE
            && var_z > 0.01
            && var_z < 0.12
            && (3..=12).contains(&crossings)
            && abs_x < 2.5
            && abs_y < 2.5;

        let (behavior, intensity) = if walking {
            ("walking", "moderate")
        } else if abs_y > 3.5 || total > 4.5 {
            ("shaking", "high")
        } else if total > 3.0 {
            ("moving", "medium")
        } else if total > 1.5 {
            ("tilting", "low")
        } else {
            ("stable", "low")
        };

        BehaviorSummary {
            behavior: behavior.to_string(),
            walking,
            variance_z: (var_z * 10_000.0).round() / 10_000.0,
            intensity: Some(intensity.to_string()),
            tilt: Some(dominant_tilt(abs_x, abs_y, abs_z).to_string()),
        }
    }

    fn crossings_around_one_g(&self) -> usize {
        self.window
            .iter()
            .zip(self.window.iter().skip(1))
            .filter(|(prev, next)| (*prev - 1.0) * (*next - 1.0) < 0.0)
            .count()
    }
}

/// Population variance; zero for an empty window.
pub fn variance(values: &VecDeque<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

// Ties go to z, then y.
fn dominant_tilt(abs_x: f64, abs_y: f64, abs_z: f64) -> &'static str {
    if abs_z >= abs_x && abs_z >= abs_y {
        "flat"
    } else if abs_y >= abs_x {
        "upright"
    } else {
        "side"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_initializing() {
        let mut classifier = BehaviorClassifier::new();
        let (motion, summary) = classifier.classify(Axes::new(0.0, 0.0, 1.0));
        assert_eq!(motion, "Initializing");
        assert_eq!(summary.behavior, "stable");
        assert_eq!(summary.tilt.as_deref(), Some("flat"));
    }

    #[test]
    fn test_rest_is_stable() {
        let mut classifier = BehaviorClassifier::new();
        for _ in 0..5 {
            classifier.classify(Axes::new(0.02, -0.01, 1.0));
        }
        let (motion, summary) = classifier.classify(Axes::new(0.03, -0.02, 1.01));
        assert_eq!(motion, STABLE);
        assert_eq!(summary.behavior, "stable");
        assert!(!summary.walking);
        assert_eq!(summary.variance_z, 0.0);
    }

    #[test]
    fn test_axis_jump_reports_axis() {
        let mut classifier = BehaviorClassifier::new();
        classifier.classify(Axes::new(0.0, 0.0, 1.0));
        let (motion, _) = classifier.classify(Axes::new(0.0, 0.9, 1.0));
        assert_eq!(motion, "Y-axis movement");
    }

    #[test]
    fn test_large_y_is_shaking() {
        let mut classifier = BehaviorClassifier::new();
        let (_, summary) = classifier.classify(Axes::new(0.1, 3.8, 0.2));
        assert_eq!(summary.behavior, "shaking");
        assert_eq!(summary.intensity.as_deref(), Some("high"));
        assert_eq!(summary.tilt.as_deref(), Some("upright"));
    }

    #[test]
    fn test_side_tilt() {
        let mut classifier = BehaviorClassifier::new();
        let (_, summary) = classifier.classify(Axes::new(1.2, 0.1, 0.4));
        assert_eq!(summary.behavior, "tilting");
        assert_eq!(summary.tilt.as_deref(), Some("side"));
    }

    #[test]
    fn test_oscillating_z_is_walking() {
        let mut classifier = BehaviorClassifier::new();
        let mut last = None;
        for i in 0..WINDOW_SIZE {
            // +-0.25g around 1g, sign flips every 2 samples
            let z = if (i / 2) % 2 == 0 { 1.25 } else { 0.75 };
            last = Some(classifier.classify(Axes::new(0.1, 0.1, z)));
        }
        let (_, summary) = last.unwrap();
        assert!(summary.walking);
        assert_eq!(summary.behavior, "walking");
        assert_eq!(summary.variance_z, 0.0625);
    }

    #[test]
    fn test_variance() {
        let values: VecDeque<f64> = vec![1.0, 2.0, 3.0, 4.0].into();
        assert_eq!(variance(&values), 1.25);
        assert_eq!(variance(&VecDeque::new()), 0.0);
    }
}
