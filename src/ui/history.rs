//! Bounded chart history.
//!
//! A `SeriesView` backs one chart panel: a shared label sequence plus one or
//! more value series, all trimmed together so every series always has the
//! same length as the labels.

use std::collections::VecDeque;

/// One named line within a view
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub points: VecDeque<f64>,
}

/// Backing data for one chart panel
#[derive(Debug, Clone)]
pub struct SeriesView {
    title: String,
    capacity: usize,
    labels: VecDeque<String>,
    series: Vec<Series>,
}

impl SeriesView {
    /// Create an empty view holding at most `capacity` points per series
    pub fn new(title: &str, series_names: &[&str], capacity: usize) -> Self {
        Self {
            title: title.to_string(),
            capacity,
            labels: VecDeque::with_capacity(capacity + 1),
            series: series_names
                .iter()
                .map(|name| Series {
                    name: name.to_string(),
                    points: VecDeque::with_capacity(capacity + 1),
                })
                .collect(),
        }
    }

    /// Append one label and one value per series, evicting the oldest
    /// label and point of every series once over capacity.
    pub fn push(&mut self, label: String, values: &[f64]) {
        debug_assert_eq!(values.len(), self.series.len());

        self.labels.push_back(label);
        for (idx, series) in self.series.iter_mut().enumerate() {
            series.points.push_back(values.get(idx).copied().unwrap_or(f64::NAN));
        }

        while self.labels.len() > self.capacity {
            self.labels.pop_front();
            for series in &mut self.series {
                series.points.pop_front();
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &VecDeque<String> {
        &self.labels
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Min and max over every finite point in the view
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }
}
