//! Output contract: the overall G-Score, the sub-score breakdown matching
//! the selected game type, and the human-readable feedback lists.
//!
//! Field names serialize in camelCase to preserve the wire contract the
//! original frontend consumes.

use serde::{Deserialize, Serialize};

use crate::request::GameType;

/// Awareness breakdown: four sub-scores, each in [0, 25], summing to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwarenessBreakdown {
    pub curiosity_score: i32,
    pub emotional_score: i32,
    pub shareworthy_score: i32,
    pub appeal_score: i32,
}

impl AwarenessBreakdown {
    /// Number of sub-scores; profile validation keeps config in sync.
    pub const FIELD_COUNT: usize = 4;

    pub fn from_values(values: &[i32]) -> Self {
        let v = |i: usize| values.get(i).copied().unwrap_or(0);
        Self {
            curiosity_score: v(0),
            emotional_score: v(1),
            shareworthy_score: v(2),
            appeal_score: v(3),
        }
    }

    pub fn total(&self) -> i32 {
        self.curiosity_score + self.emotional_score + self.shareworthy_score + self.appeal_score
    }
}

/// Conversion breakdown: five sub-scores, each in [0, 20], summing to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionBreakdown {
    pub problem_clarity: i32,
    pub solution_clarity: i32,
    pub tactical_value: i32,
    pub audience_fit: i32,
    pub niche_shareworthy: i32,
}

impl ConversionBreakdown {
    pub const FIELD_COUNT: usize = 5;

    pub fn from_values(values: &[i32]) -> Self {
        let v = |i: usize| values.get(i).copied().unwrap_or(0);
        Self {
            problem_clarity: v(0),
            solution_clarity: v(1),
            tactical_value: v(2),
            audience_fit: v(3),
            niche_shareworthy: v(4),
        }
    }

    pub fn total(&self) -> i32 {
        self.problem_clarity
            + self.solution_clarity
            + self.tactical_value
            + self.audience_fit
            + self.niche_shareworthy
    }
}

/// One of the two breakdown shapes, matching the game type of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Breakdown {
    Awareness(AwarenessBreakdown),
    Conversion(ConversionBreakdown),
}

impl Breakdown {
    pub fn from_values(game_type: GameType, values: &[i32]) -> Self {
        match game_type {
            GameType::Awareness => Breakdown::Awareness(AwarenessBreakdown::from_values(values)),
            GameType::Conversion => Breakdown::Conversion(ConversionBreakdown::from_values(values)),
        }
    }

    pub fn total(&self) -> i32 {
        match self {
            Breakdown::Awareness(b) => b.total(),
            Breakdown::Conversion(b) => b.total(),
        }
    }
}

/// Complete scoring result for one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Total G-Score, always in [0, 100], equal to the breakdown sum.
    pub score: i32,
    pub breakdown: Breakdown,
    /// One observation per sub-score above its strong cutoff.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// One suggestion per sub-score below its weak cutoff; never empty —
    /// a generic fallback fills in when nothing specific fired.
    #[serde(default)]
    pub next_steps: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_result_shape_matches_contract() {
        let r = ScoreResult {
            score: 73,
            breakdown: Breakdown::Awareness(AwarenessBreakdown {
                curiosity_score: 23,
                emotional_score: 15,
                shareworthy_score: 15,
                appeal_score: 20,
            }),
            strengths: vec!["Strong curiosity gap".into()],
            next_steps: vec!["Test a different thumbnail or posting time.".into()],
        };

        let v: serde_json::Value = serde_json::to_value(&r).unwrap();
        assert_eq!(v["score"], serde_json::json!(73));
        // camelCase wire names, untagged breakdown
        assert_eq!(v["breakdown"]["curiosityScore"], serde_json::json!(23));
        assert_eq!(v["breakdown"]["appealScore"], serde_json::json!(20));
        assert!(v["strengths"].is_array());
        assert!(v["nextSteps"].is_array());
    }

    #[test]
    fn breakdown_totals_agree_with_from_values() {
        let b = Breakdown::from_values(GameType::Conversion, &[12, 20, 14, 15, 12]);
        assert_eq!(b.total(), 73);
        match b {
            Breakdown::Conversion(c) => {
                assert_eq!(c.solution_clarity, 20);
                assert_eq!(c.niche_shareworthy, 12);
            }
            _ => panic!("expected conversion breakdown"),
        }
    }
}
