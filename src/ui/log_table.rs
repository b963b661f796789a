//! Newest-first event log with a fixed row limit.

use std::collections::VecDeque;

/// One rendered log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub time: String,
    pub motion: String,
    pub behavior: String,
    pub walking: String,
    pub variance: String,
}

/// Bounded table of log rows, newest first
#[derive(Debug, Clone)]
pub struct LogTable {
    capacity: usize,
    rows: VecDeque<LogRow>,
}

impl LogTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rows: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Insert at the top; drops the bottom (oldest) row once over capacity.
    pub fn insert(&mut self, row: LogRow) {
        self.rows.push_front(row);
        while self.rows.len() > self.capacity {
            self.rows.pop_back();
        }
    }

    /// Rows in display order (newest first)
    pub fn rows(&self) -> impl Iterator<Item = &LogRow> {
        self.rows.iter()
    }

    pub fn newest(&self) -> Option<&LogRow> {
        self.rows.front()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: usize) -> LogRow {
        LogRow {
            time: format!("12:00:{:02}", n),
            motion: "Stable".to_string(),
            behavior: "stable".to_string(),
            walking: "No".to_string(),
            variance: "0.0000".to_string(),
        }
    }

    #[test]
    fn test_size_and_newest_first() {
        let mut table = LogTable::new(10);
        for n in 0..7 {
            table.insert(row(n));
            assert_eq!(table.len(), n + 1);
        }
        let times: Vec<&str> = table.rows().map(|r| r.time.as_str()).collect();
        assert_eq!(times.first(), Some(&"12:00:06"));
        assert_eq!(times.last(), Some(&"12:00:00"));
    }

    #[test]
    fn test_eleventh_insert_evicts_oldest() {
        let mut table = LogTable::new(10);
        for n in 0..11 {
            table.insert(row(n));
        }
        assert_eq!(table.len(), 10);
        assert_eq!(table.newest(), Some(&row(10)));
        assert!(table.rows().all(|r| r != &row(0)));
        assert_eq!(table.rows().last(), Some(&row(1)));
    }
}
