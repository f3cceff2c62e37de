//! # G-Score Engine
//! Pure, testable logic that maps `(game_type, input)` → `ScoreResult`.
//! No I/O, suitable for unit tests and offline evaluation.
//!
//! Policy: every pass only ever raises sub-scores from the profile's
//! baseline; sub-scores are clamped to the ceiling after all passes, so the
//! total always lands in [0, 100]. "Average" content scores as average, not
//! as a failure — there is no cold-start penalty and no penalizing rule.

use std::sync::OnceLock;

use crate::profile::{Boost, ChecklistBoost, HotReloadProfiles, Profile};
use crate::request::{GameType, ScoreInput};
use crate::scorecard::{Breakdown, ScoreResult};

static HOT_PROFILES: OnceLock<HotReloadProfiles> = OnceLock::new();

/// Process-wide profile handle (embedded defaults, env-var override).
pub fn profiles() -> &'static HotReloadProfiles {
    HOT_PROFILES.get_or_init(HotReloadProfiles::from_env)
}

/// Score one piece of content. Total, pure for a fixed profile set, and
/// idempotent: identical input yields an identical result.
pub fn calculate_score(game_type: GameType, input: &ScoreInput) -> ScoreResult {
    let book = profiles().current();
    score_with_profile(game_type, book.profile(game_type), input)
}

/// The evaluator pipeline against an explicit profile (offline evaluation,
/// tests with synthetic rule tables).
pub fn score_with_profile(game_type: GameType, p: &Profile, input: &ScoreInput) -> ScoreResult {
    // 1) Baseline
    let mut values = vec![p.baseline; p.subscores.len()];

    // 2) Lexical pass — each trigger is independent and additive.
    if let Some(hook) = input.hook.as_deref() {
        let hook_norm = crate::profile::normalize(hook);
        for rule in &p.lexical {
            if rule.trigger.matches(hook, &hook_norm) {
                values[rule.target] += rule.add;
            }
        }
    }

    // 3) Checklist pass
    if let Some(checklist) = &input.checklist {
        for rule in &p.checklist {
            if !checklist.truthy(&rule.flag) {
                continue;
            }
            values[rule.target] += match rule.boost {
                ChecklistBoost::Add(n) => n,
                ChecklistBoost::Scaled(scale) => {
                    (checklist.signal(&rule.flag) * scale).round() as i32
                }
            };
        }
    }

    // 4) Performance pass — thresholds over sanitized counters; the
    //    set-to-ceiling kind overrides instead of incrementing.
    if let Some(metrics) = &input.actual_metrics {
        for rule in &p.performance {
            if metrics.get(rule.metric) > rule.gt {
                match rule.boost {
                    Boost::Add(n) => values[rule.target] += n,
                    Boost::SetToCeiling => values[rule.target] = p.ceiling,
                }
            }
        }
    }

    // 5) Clamp every sub-score to the ceiling (increments are non-negative,
    //    so no floor clamp is needed).
    for v in &mut values {
        *v = (*v).clamp(0, p.ceiling);
    }

    // 6) Aggregate
    let score: i32 = values.iter().sum();

    // 7) Feedback
    let (strengths, next_steps) = feedback(p, &values);

    ScoreResult {
        score,
        breakdown: Breakdown::from_values(game_type, &values),
        strengths,
        next_steps,
    }
}

/// Derive strengths / next steps from the per-sub-score cutoffs. A
/// sub-score between the cutoffs emits neither; if nothing specific fired,
/// exactly one generic fallback suggestion is returned.
fn feedback(p: &Profile, values: &[i32]) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut next_steps = Vec::new();

    for (def, &value) in p.subscores.iter().zip(values) {
        if value > p.strong_above {
            strengths.push(def.strength.clone());
        } else if value < p.weak_below {
            next_steps.push(def.next_step.clone());
        }
    }

    if next_steps.is_empty() {
        next_steps.push(p.fallback_next_step.clone());
    }

    (strengths, next_steps)
}
