use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::engine;
use crate::history::ScoreHistory;
use crate::request::{GameType, ScoreError, ScoreInput};
use crate::scorecard::ScoreResult;
use crate::tier::{self, ColorCategory};

#[derive(Clone)]
pub struct AppState {
    history: Arc<ScoreHistory>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            history: Arc::new(ScoreHistory::with_capacity(2000)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/score", post(score))
        .route("/score/batch", post(score_batch))
        .route("/tier", get(tier_for_score))
        .route("/debug/history", get(debug_history))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Router with a fresh default state (tests, local runs).
pub fn app() -> Router {
    create_router(AppState::new())
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreReq {
    /// Kept as a string so unrecognized values become an explicit 422
    /// instead of a generic deserialization error.
    game_type: String,
    #[serde(flatten)]
    input: ScoreInput,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TierInfo {
    color: ColorCategory,
    emoji: &'static str,
    label: &'static str,
}

impl TierInfo {
    fn for_score(score: i32) -> Self {
        Self {
            color: tier::score_color_category(score),
            emoji: tier::score_emoji(score),
            label: tier::score_label(score),
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResp {
    game_type: GameType,
    #[serde(flatten)]
    result: ScoreResult,
    tier: TierInfo,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn unsupported(err: ScoreError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

fn score_one(state: &AppState, req: ScoreReq) -> Result<ScoreResp, ApiError> {
    let game_type: GameType = req.game_type.parse().map_err(unsupported)?;
    let result = engine::calculate_score(game_type, &req.input);

    metrics::counter!("gscore_requests_total", "game_type" => game_type.as_str()).increment(1);
    state.history.push(game_type, &result);
    dev_log_score(game_type, req.input.hook.as_deref(), result.score);

    Ok(ScoreResp {
        game_type,
        tier: TierInfo::for_score(result.score),
        result,
    })
}

async fn score(
    State(state): State<AppState>,
    Json(body): Json<ScoreReq>,
) -> Result<Json<ScoreResp>, ApiError> {
    score_one(&state, body).map(Json)
}

async fn score_batch(
    State(state): State<AppState>,
    Json(items): Json<Vec<ScoreReq>>,
) -> Result<Json<Vec<ScoreResp>>, ApiError> {
    let mut out = Vec::with_capacity(items.len());
    for req in items {
        out.push(score_one(&state, req)?);
    }
    Ok(Json(out))
}

#[derive(serde::Deserialize)]
struct TierQuery {
    score: i32,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TierResp {
    score: i32,
    #[serde(flatten)]
    tier: TierInfo,
}

async fn tier_for_score(Query(q): Query<TierQuery>) -> Json<TierResp> {
    Json(TierResp {
        score: q.score,
        tier: TierInfo::for_score(q.score),
    })
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryOut {
    ts: String,
    game_type: GameType,
    score: i32,
    label: &'static str,
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryOut>> {
    let rows = state.history.snapshot_last_n(10);
    let out = rows
        .into_iter()
        .map(|e| HistoryOut {
            ts: e.ts.to_rfc3339(),
            game_type: e.game_type,
            score: e.score,
            label: e.label,
        })
        .collect::<Vec<_>>();
    Json(out)
}

// --- dev-only diagnostics ---

// Dev logging gate: GSCORE_DEV_LOG=1 AND dev env (debug or SHUTTLE_ENV in {local,development,dev})
fn dev_logging_enabled() -> bool {
    let on = std::env::var("GSCORE_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Minimal, anonymized dev logger for score events.
fn dev_log_score(game_type: GameType, hook: Option<&str>, score: i32) {
    if !dev_logging_enabled() {
        return;
    }
    let id = hook.map(anon_hash).unwrap_or_else(|| "-".to_string());
    // Never log raw hook text. Only hashed id + score + tier label.
    info!(
        target: "gscore",
        %id,
        game_type = %game_type,
        score,
        label = tier::score_label(score),
    );
}
