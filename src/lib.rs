// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod engine;
pub mod history;
pub mod metrics;
pub mod profile;
pub mod request;
pub mod scorecard;
pub mod tier;

// ---- Re-exports for stable public API ----
pub use crate::api::{app, create_router, AppState};
pub use crate::engine::{calculate_score, score_with_profile};
pub use crate::request::{ActualMetrics, Checklist, Flag, GameType, ScoreError, ScoreInput};
pub use crate::scorecard::{AwarenessBreakdown, Breakdown, ConversionBreakdown, ScoreResult};
pub use crate::tier::{score_color_category, score_emoji, score_label, ColorCategory, Tier};
