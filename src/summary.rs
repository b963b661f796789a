//! Sensor summary payload as served by the sensor's `/data` endpoint.

use serde::{Deserialize, Serialize};

/// One three-axis reading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Axes {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Behavior analysis computed on the sensor side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSummary {
    pub behavior: String,
    pub walking: bool,
    pub variance_z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<String>,
}

/// A single poll result. Fields the dashboard does not use are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSummary {
    pub motion: String,
    pub summary: BehaviorSummary,
    pub accel: Axes,
    pub gyro: Axes,
    /// Seconds since the sensor booted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Fixed-point rendering used by every numeric display field.
///
/// Exact halves round away from zero (`0.125` shows as `0.13`); `format!`
/// alone would round them to even.
pub fn fixed(value: f64, places: usize) -> String {
    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;
    // Only a tie when the scaled product carried no rounding error
    let exact = scaled.is_finite() && value.mul_add(scale, -scaled) == 0.0;
    if exact && scaled.fract().abs() == 0.5 {
        format!("{:.*}", places, scaled.round() / scale)
    } else {
        format!("{:.*}", places, value)
    }
}

pub fn walking_label(walking: bool) -> &'static str {
    if walking { "Yes" } else { "No" }
}
