//! Declarative score profiles (loaded from `config/gscore.toml`).
//!
//! Both evaluators are the same generic weighted-rule scorer parameterized
//! by a profile. A profile declares, as data:
//! - `subscores`:   ordered sub-score definitions (order defines the
//!                  breakdown shape) with their feedback messages
//! - `lexical`:     trigger rules over the hook text
//! - `checklist`:   rules over editorial flags
//! - `performance`: threshold rules over observed metrics
//!
//! Minimal TOML DSL for lexical triggers (case-insensitive, whitespace
//! condensed on both sides):
//! - `any_contains`:  match if ANY of the phrases appears in the hook
//! - `any_digit`:     match if the hook contains a digit character
//! - `shorter_than`:  match if the hook is shorter than N characters
//!
//! Rule actions only ever raise sub-scores: `add` increments, `scale`
//! (checklist only) adds `round(flag value x scale)`, and `set_to_ceiling`
//! (performance only) is the one hard-override kind.
//!
//! The default profile set is embedded in the binary; `GSCORE_CONFIG_PATH`
//! may point at an override file, reloaded on mtime change per lookup.
//! Invalid override files are ignored and the last good set is kept.

use anyhow::{anyhow, bail, Context};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{
    fs,
    path::PathBuf,
    sync::{Arc, RwLock},
    time::SystemTime,
};

use crate::request::{GameType, MetricKey};
use crate::scorecard::{AwarenessBreakdown, ConversionBreakdown};

pub const ENV_CONFIG_PATH: &str = "GSCORE_CONFIG_PATH";

const DEFAULT_PROFILE_TOML: &str = include_str!("../config/gscore.toml");

static EMBEDDED: Lazy<Arc<ScoreBook>> = Lazy::new(|| {
    Arc::new(ScoreBook::from_toml_str(DEFAULT_PROFILE_TOML).expect("valid embedded score profiles"))
});

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSetDef {
    pub awareness: ProfileDef,
    pub conversion: ProfileDef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDef {
    pub baseline: i32,
    pub ceiling: i32,
    pub weak_below: i32,
    pub strong_above: i32,
    pub fallback_next_step: String,
    pub subscores: Vec<SubScoreDef>,
    #[serde(default)]
    pub lexical: Vec<LexicalRuleDef>,
    #[serde(default)]
    pub checklist: Vec<ChecklistRuleDef>,
    #[serde(default)]
    pub performance: Vec<PerformanceRuleDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubScoreDef {
    pub id: String,
    pub strength: String,
    pub next_step: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexicalRuleDef {
    pub target: String,
    pub any_contains: Option<Vec<String>>,
    pub any_digit: Option<bool>,
    pub shorter_than: Option<usize>,
    #[serde(default)]
    pub add: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistRuleDef {
    pub flag: String,
    pub target: String,
    pub add: Option<i32>,
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceRuleDef {
    pub metric: MetricKey,
    pub gt: f64,
    pub target: String,
    pub add: Option<i32>,
    #[serde(default)]
    pub set_to_ceiling: bool,
}

/* ----------------------------
Compiled engine structures
---------------------------- */

/// A lexical trigger with patterns pre-normalized at compile time.
#[derive(Debug, Clone)]
pub enum Trigger {
    AnyContains(Vec<String>),
    AnyDigit,
    ShorterThan(usize),
}

impl Trigger {
    /// `hook_norm` must come from [`normalize`]; length and digit checks
    /// run against the raw hook text as the caller supplied it.
    pub fn matches(&self, hook_raw: &str, hook_norm: &str) -> bool {
        match self {
            Trigger::AnyContains(pats) => pats.iter().any(|p| hook_norm.contains(p.as_str())),
            Trigger::AnyDigit => hook_raw.chars().any(|c| c.is_ascii_digit()),
            Trigger::ShorterThan(n) => hook_raw.chars().count() < *n,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Boost {
    Add(i32),
    SetToCeiling,
}

#[derive(Debug, Clone, Copy)]
pub enum ChecklistBoost {
    Add(i32),
    /// Adds `round(flag value x scale)`; fractional flag values round to
    /// nearest so sub-scores stay integers.
    Scaled(f64),
}

#[derive(Debug, Clone)]
pub struct LexicalRule {
    pub target: usize,
    pub trigger: Trigger,
    pub add: i32,
}

#[derive(Debug, Clone)]
pub struct ChecklistRule {
    pub flag: String,
    pub target: usize,
    pub boost: ChecklistBoost,
}

#[derive(Debug, Clone)]
pub struct PerformanceRule {
    pub metric: MetricKey,
    pub gt: f64,
    pub target: usize,
    pub boost: Boost,
}

/// One compiled evaluator: rule targets resolved to sub-score indexes,
/// patterns normalized, bounds validated.
#[derive(Debug)]
pub struct Profile {
    pub baseline: i32,
    pub ceiling: i32,
    pub weak_below: i32,
    pub strong_above: i32,
    pub fallback_next_step: String,
    pub subscores: Vec<SubScoreDef>,
    pub lexical: Vec<LexicalRule>,
    pub checklist: Vec<ChecklistRule>,
    pub performance: Vec<PerformanceRule>,
}

/// Both compiled evaluators, keyed by game type.
#[derive(Debug)]
pub struct ScoreBook {
    pub awareness: Profile,
    pub conversion: Profile,
}

impl ScoreBook {
    pub fn profile(&self, game_type: GameType) -> &Profile {
        match game_type {
            GameType::Awareness => &self.awareness,
            GameType::Conversion => &self.conversion,
        }
    }

    /// Parse and compile a profile set from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let def: ProfileSetDef = toml::from_str(toml_str).context("parse score profiles")?;
        Ok(Self {
            awareness: compile_profile("awareness", &def.awareness, AwarenessBreakdown::FIELD_COUNT)?,
            conversion: compile_profile(
                "conversion",
                &def.conversion,
                ConversionBreakdown::FIELD_COUNT,
            )?,
        })
    }

    /// The profile set compiled into the binary.
    pub fn embedded() -> Arc<ScoreBook> {
        EMBEDDED.clone()
    }

    pub fn lexical_rule_count(&self) -> usize {
        self.awareness.lexical.len() + self.conversion.lexical.len()
    }
}

fn compile_profile(name: &str, def: &ProfileDef, expected: usize) -> anyhow::Result<Profile> {
    if def.subscores.len() != expected {
        bail!(
            "profile `{}` must declare {} subscores to match its breakdown shape, got {}",
            name,
            expected,
            def.subscores.len()
        );
    }
    for (i, s) in def.subscores.iter().enumerate() {
        if def.subscores[..i].iter().any(|other| other.id == s.id) {
            bail!("profile `{}` declares subscore `{}` twice", name, s.id);
        }
    }
    if def.ceiling <= 0 || def.baseline < 0 || def.baseline > def.ceiling {
        bail!(
            "profile `{}` has unusable bounds: baseline {} / ceiling {}",
            name,
            def.baseline,
            def.ceiling
        );
    }
    if def.weak_below > def.ceiling || def.strong_above > def.ceiling {
        bail!("profile `{}` feedback cutoffs exceed the ceiling", name);
    }

    let resolve = |target: &str| -> anyhow::Result<usize> {
        def.subscores
            .iter()
            .position(|s| s.id == target)
            .ok_or_else(|| anyhow!("profile `{}` rule targets unknown subscore `{}`", name, target))
    };

    let mut lexical = Vec::with_capacity(def.lexical.len());
    for r in &def.lexical {
        if r.add <= 0 {
            bail!(
                "profile `{}` lexical rule for `{}` must add a positive amount",
                name,
                r.target
            );
        }
        let trigger = match (&r.any_contains, r.any_digit, r.shorter_than) {
            (Some(pats), None, None) if !pats.is_empty() => {
                Trigger::AnyContains(pats.iter().map(|p| normalize(p)).collect())
            }
            (None, Some(true), None) => Trigger::AnyDigit,
            (None, None, Some(n)) if n > 0 => Trigger::ShorterThan(n),
            _ => bail!(
                "profile `{}` lexical rule for `{}` needs exactly one of \
                 any_contains / any_digit / shorter_than",
                name,
                r.target
            ),
        };
        lexical.push(LexicalRule {
            target: resolve(&r.target)?,
            trigger,
            add: r.add,
        });
    }

    let mut checklist = Vec::with_capacity(def.checklist.len());
    for r in &def.checklist {
        let boost = match (r.add, r.scale) {
            (Some(n), None) if n > 0 => ChecklistBoost::Add(n),
            (None, Some(s)) if s.is_finite() && s > 0.0 => ChecklistBoost::Scaled(s),
            _ => bail!(
                "profile `{}` checklist rule for flag `{}` needs exactly one of add / scale",
                name,
                r.flag
            ),
        };
        checklist.push(ChecklistRule {
            flag: r.flag.clone(),
            target: resolve(&r.target)?,
            boost,
        });
    }

    let mut performance = Vec::with_capacity(def.performance.len());
    for r in &def.performance {
        if !r.gt.is_finite() || r.gt < 0.0 {
            bail!(
                "profile `{}` performance rule on {:?} has an unusable threshold",
                name,
                r.metric
            );
        }
        let boost = match (r.add, r.set_to_ceiling) {
            (Some(n), false) if n > 0 => Boost::Add(n),
            (None, true) => Boost::SetToCeiling,
            _ => bail!(
                "profile `{}` performance rule on {:?} needs exactly one of add / set_to_ceiling",
                name,
                r.metric
            ),
        };
        performance.push(PerformanceRule {
            metric: r.metric,
            gt: r.gt,
            target: resolve(&r.target)?,
            boost,
        });
    }

    Ok(Profile {
        baseline: def.baseline,
        ceiling: def.ceiling,
        weak_below: def.weak_below,
        strong_above: def.strong_above,
        fallback_next_step: def.fallback_next_step.clone(),
        subscores: def.subscores.clone(),
        lexical,
        checklist,
        performance,
    })
}

/// Lowercase and condense whitespace so matching is insensitive to both.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        let lc = ch.to_ascii_lowercase();
        if lc.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(lc);
            last_space = false;
        }
    }
    out.trim().to_string()
}

/* ----------------------------
Hot reload
---------------------------- */

/// Serves the embedded profile set, or an override file reloaded on mtime
/// change at each `current()` call.
#[derive(Debug)]
pub struct HotReloadProfiles {
    path: Option<PathBuf>,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    book: Arc<ScoreBook>,
    last_modified: Option<SystemTime>,
}

impl HotReloadProfiles {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            inner: RwLock::new(State {
                book: ScoreBook::embedded(),
                last_modified: None,
            }),
        }
    }

    /// Resolve the override path from `GSCORE_CONFIG_PATH`, if set.
    pub fn from_env() -> Self {
        Self::new(std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
    }

    /// Get the latest profile set, reloading the override if it changed.
    pub fn current(&self) -> Arc<ScoreBook> {
        let Some(path) = &self.path else {
            return self.inner.read().map(|g| g.book.clone()).unwrap_or_else(|_| ScoreBook::embedded());
        };

        let needs_reload = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().map(|g| g.last_modified).unwrap_or(None);
                guard != Some(mtime)
            }
            Err(_) => false,
        };

        if needs_reload {
            if let Ok(mut guard) = self.inner.write() {
                if let Ok(mtime) = fs::metadata(path).and_then(|m| m.modified()) {
                    if guard.last_modified != Some(mtime) {
                        match fs::read_to_string(path)
                            .map_err(anyhow::Error::from)
                            .and_then(|s| ScoreBook::from_toml_str(&s))
                        {
                            Ok(book) => {
                                guard.book = Arc::new(book);
                                guard.last_modified = Some(mtime);
                            }
                            Err(err) => {
                                // Keep the last good set; mark the mtime so a
                                // broken file isn't re-parsed on every call.
                                tracing::warn!(error = %err, path = %path.display(),
                                    "ignoring invalid score profile override");
                                guard.last_modified = Some(mtime);
                            }
                        }
                    }
                }
            }
        }

        self.inner
            .read()
            .map(|g| g.book.clone())
            .unwrap_or_else(|_| ScoreBook::embedded())
    }
}

/* ----------------------------
Tests
---------------------------- */
