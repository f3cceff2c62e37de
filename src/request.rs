//! Input contract for the scoring engine: game type, free-text fields,
//! checklist flags, and observed performance metrics.
//!
//! Absence of any field means "no signal", never an error. The only caller
//! error in the whole engine is an unrecognized game type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which evaluator scores the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Awareness,
    Conversion,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Awareness => "awareness",
            GameType::Conversion => "conversion",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ScoreError;

    /// Strict: anything other than the two supported values is a caller
    /// error. Silently defaulting would produce misleading scores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "awareness" => Ok(GameType::Awareness),
            "conversion" => Ok(GameType::Conversion),
            other => Err(ScoreError::UnsupportedContentType(other.to_string())),
        }
    }
}

/// The engine's one contract violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    UnsupportedContentType(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::UnsupportedContentType(s) => {
                write!(f, "unsupported content type: {s:?}")
            }
        }
    }
}

impl std::error::Error for ScoreError {}

/// Everything a caller may hand to `calculate_score`. All fields optional.
///
/// `title` and `description` are accepted but currently unscored — they are
/// part of the input contract and reserved for future signal sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreInput {
    pub hook: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub checklist: Option<Checklist>,
    pub actual_metrics: Option<ActualMetrics>,
}

impl ScoreInput {
    /// Convenience for tests and library callers: just a hook.
    pub fn with_hook(hook: impl Into<String>) -> Self {
        Self {
            hook: Some(hook.into()),
            ..Self::default()
        }
    }
}

/// Externally supplied editorial flags, keyed by name (e.g.
/// `shareworthy_score`, `curiosity_hook`). Permissive by design: unknown
/// flags are carried but ignored by scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist(pub HashMap<String, Flag>);

/// A checklist value is either a boolean or a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Num(f64),
}

impl Checklist {
    /// Numeric magnitude of a flag: `true` counts as 1.0, numbers are
    /// sanitized (negative or non-finite → 0). Absent flags are 0.
    pub fn signal(&self, flag: &str) -> f64 {
        match self.0.get(flag) {
            Some(Flag::Bool(true)) => 1.0,
            Some(Flag::Num(v)) => sanitize(Some(*v)),
            _ => 0.0,
        }
    }

    /// "Present and truthy" in the editorial sense.
    pub fn truthy(&self, flag: &str) -> bool {
        self.signal(flag) > 0.0
    }
}

/// Keys of the observed performance counters, used by performance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    Views,
    Engagement,
    Shares,
    Conversions,
}

/// Observed performance counters. Individually absent counters default
/// to 0; all values are treated as untrusted input.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActualMetrics {
    pub views: Option<f64>,
    pub engagement: Option<f64>,
    pub shares: Option<f64>,
    pub conversions: Option<f64>,
}

impl ActualMetrics {
    /// Sanitized read: negative and non-finite values count as absent so
    /// the total score invariant (0..=100) holds for arbitrary input.
    pub fn get(&self, key: MetricKey) -> f64 {
        let raw = match key {
            MetricKey::Views => self.views,
            MetricKey::Engagement => self.engagement,
            MetricKey::Shares => self.shares,
            MetricKey::Conversions => self.conversions,
        };
        sanitize(raw)
    }
}

fn sanitize(x: Option<f64>) -> f64 {
    match x {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
