//! Presentation tiers for a total G-Score.
//!
//! One four-band boundary set, three views of it (color category, emoji,
//! text label). The bands must stay consistent across all three, so the
//! boundaries are defined once here and nowhere else.

use serde::{Deserialize, Serialize};

/// Band boundaries (inclusive lower edges).
pub const TIER_TOP_MIN: i32 = 85;
pub const TIER_HIGH_MIN: i32 = 70;
pub const TIER_MID_MIN: i32 = 55;

/// The four presentation bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Top,
    High,
    Mid,
    Low,
}

impl Tier {
    pub fn for_score(score: i32) -> Self {
        if score >= TIER_TOP_MIN {
            Tier::Top
        } else if score >= TIER_HIGH_MIN {
            Tier::High
        } else if score >= TIER_MID_MIN {
            Tier::Mid
        } else {
            Tier::Low
        }
    }
}

/// UI color category for a score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    Success,
    Info,
    Warning,
    Danger,
}

impl ColorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorCategory::Success => "success",
            ColorCategory::Info => "info",
            ColorCategory::Warning => "warning",
            ColorCategory::Danger => "danger",
        }
    }
}

pub fn score_color_category(score: i32) -> ColorCategory {
    match Tier::for_score(score) {
        Tier::Top => ColorCategory::Success,
        Tier::High => ColorCategory::Info,
        Tier::Mid => ColorCategory::Warning,
        Tier::Low => ColorCategory::Danger,
    }
}

pub fn score_emoji(score: i32) -> &'static str {
    match Tier::for_score(score) {
        Tier::Top => "🔥",
        Tier::High => "💪",
        Tier::Mid => "📈",
        Tier::Low => "💡",
    }
}

pub fn score_label(score: i32) -> &'static str {
    match Tier::for_score(score) {
        Tier::Top => "Ready to win!",
        Tier::High => "Strong potential",
        Tier::Mid => "Needs polish",
        Tier::Low => "Keep improving",
    }
}
