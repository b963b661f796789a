//! Running count of behavior labels.
//!
//! Nothing on screen reads this yet; headless mode reports it on shutdown.

/// Occurrences per behavior label, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct BehaviorTally {
    entries: Vec<(String, u64)>,
}

impl BehaviorTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence and return the new total for that label
    pub fn record(&mut self, behavior: &str) -> u64 {
        match self.entries.iter_mut().find(|(label, _)| label == behavior) {
            Some((_, count)) => {
                *count += 1;
                *count
            }
            None => {
                self.entries.push((behavior.to_string(), 1));
                1
            }
        }
    }

    #[cfg(test)]
    pub fn count(&self, behavior: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(label, _)| label == behavior)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
