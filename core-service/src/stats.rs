use chrono::{DateTime, Duration, Utc};
use core_traversal::TraversalStats;
use serde::{Deserialize, Serialize};

/// Summary of one export run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Root folder that was exported
    pub root: String,
    pub traversal: TraversalStats,
    /// Batches handed to the sink
    pub batches_written: u64,
    /// File IDs handed to the sink
    pub files_written: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExportStats {
    pub(crate) fn start(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            traversal: TraversalStats::default(),
            batches_written: 0,
            files_written: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub(crate) fn record_batch(&mut self, size: usize) {
        self.batches_written += 1;
        self.files_written += size as u64;
    }

    pub(crate) fn finish(&mut self, traversal: TraversalStats) {
        self.traversal = traversal;
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the run, if it has finished
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut stats = ExportStats::start("ROOT");
        assert!(!stats.is_finished());
        assert!(stats.duration().is_none());

        stats.record_batch(3);
        stats.record_batch(2);
        stats.finish(TraversalStats {
            rounds: 2,
            files_emitted: 5,
            batches_emitted: 2,
            ..TraversalStats::default()
        });

        assert_eq!(stats.batches_written, 2);
        assert_eq!(stats.files_written, 5);
        assert_eq!(stats.traversal.rounds, 2);
        assert!(stats.duration().unwrap() >= Duration::zero());
    }

    #[test]
    fn test_serializes_timestamps() {
        let mut stats = ExportStats::start("ROOT");
        stats.finish(TraversalStats::default());

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["root"], "ROOT");
        assert!(json["started_at"].is_string());
        assert!(json["finished_at"].is_string());
    }
}
