//! Bounded in-memory log of recent score events, for the debug endpoint.
//! No persistence; a process restart starts the log empty.

use chrono::{DateTime, Utc};
use std::sync::Mutex;

use crate::request::GameType;
use crate::scorecard::ScoreResult;
use crate::tier;

#[derive(Debug, Clone)]
pub struct ScoreEvent {
    pub ts: DateTime<Utc>,
    pub game_type: GameType,
    pub score: i32,
    pub label: &'static str,
}

#[derive(Debug)]
pub struct ScoreHistory {
    inner: Mutex<Vec<ScoreEvent>>,
    cap: usize,
}

impl ScoreHistory {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, game_type: GameType, result: &ScoreResult) {
        let entry = ScoreEvent {
            ts: Utc::now(),
            game_type,
            score: result.score,
            label: tier::score_label(result.score),
        };

        let mut guard = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.len() == self.cap && self.cap > 0 {
            guard.remove(0);
        }
        guard.push(entry);
    }

    /// Newest-last snapshot of the most recent `n` events.
    pub fn snapshot_last_n(&self, n: usize) -> Vec<ScoreEvent> {
        let guard = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let start = guard.len().saturating_sub(n);
        guard[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecard::{AwarenessBreakdown, Breakdown};

    fn result(score: i32) -> ScoreResult {
        ScoreResult {
            score,
            breakdown: Breakdown::Awareness(AwarenessBreakdown::from_values(&[15, 15, 15, 15])),
            strengths: vec![],
            next_steps: vec![],
        }
    }

    #[test]
    fn keeps_only_the_most_recent_entries() {
        let h = ScoreHistory::with_capacity(3);
        for score in [60, 65, 70, 90] {
            h.push(GameType::Awareness, &result(score));
        }
        let snap = h.snapshot_last_n(10);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0].score, 65);
        assert_eq!(snap[2].score, 90);
        assert_eq!(snap[2].label, "Ready to win!");
    }

    #[test]
    fn snapshot_smaller_than_history() {
        let h = ScoreHistory::with_capacity(100);
        for score in 0..5 {
            h.push(GameType::Conversion, &result(score));
        }
        let snap = h.snapshot_last_n(2);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[1].score, 4);
    }
}
