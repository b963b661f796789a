//! Sensor-side signal analysis, used by the simulated source.

pub mod behavior;

pub use behavior::BehaviorClassifier;
