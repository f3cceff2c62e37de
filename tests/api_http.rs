// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /score        (happy path + unsupported content type)
// - POST /score/batch
// - GET /tier
// - GET /debug/history

use serde_json::{json, Value as Json};
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use gscore_analyzer::api;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses (minus /metrics).
fn test_router() -> Router {
    api::app()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Json) {
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, v)
}

fn post_json(uri: &str, payload: &Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build request")
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "ok");
}

#[tokio::test]
async fn score_returns_full_contract_shape() {
    let app = test_router();

    let payload = json!({
        "gameType": "awareness",
        "hook": "How I found the secret",
        "title": "unused but accepted"
    });
    let (status, v) = call(app, post_json("/score", &payload)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(v["gameType"], json!("awareness"));
    assert!(v["score"].is_number(), "missing 'score': {v}");
    assert!(v["breakdown"]["curiosityScore"].is_number(), "{v}");
    assert!(v["strengths"].is_array());
    assert!(v["nextSteps"].is_array());
    // The attached presentation tier agrees with the score.
    let score = v["score"].as_i64().expect("score");
    let expected_label = gscore_analyzer::score_label(score as i32);
    assert_eq!(v["tier"]["label"], json!(expected_label));
    assert!(v["tier"]["color"].is_string());
    assert!(v["tier"]["emoji"].is_string());
}

#[tokio::test]
async fn empty_awareness_body_scores_the_baseline() {
    let app = test_router();

    let (status, v) = call(app, post_json("/score", &json!({ "gameType": "awareness" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["score"], json!(60));
    assert_eq!(v["breakdown"]["curiosityScore"], json!(15));
    assert_eq!(v["breakdown"]["appealScore"], json!(15));
    assert_eq!(v["strengths"].as_array().map(Vec::len), Some(0));
    assert_eq!(v["nextSteps"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unsupported_content_type_is_a_422() {
    let app = test_router();

    let (status, v) = call(app, post_json("/score", &json!({ "gameType": "viral" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let msg = v["error"].as_str().expect("error body");
    assert!(msg.contains("unsupported content type"), "{msg}");
    assert!(msg.contains("viral"), "{msg}");
}

#[tokio::test]
async fn batch_scores_every_item() {
    let app = test_router();

    let payload = json!([
        { "gameType": "awareness", "hook": "Why nobody tells the truth" },
        { "gameType": "conversion", "hook": "A framework for developers" }
    ]);
    let (status, v) = call(app, post_json("/score/batch", &payload)).await;
    assert_eq!(status, StatusCode::OK);

    let items = v.as_array().expect("array response");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["gameType"], json!("awareness"));
    assert_eq!(items[1]["gameType"], json!("conversion"));
    assert!(items[1]["breakdown"]["audienceFit"].is_number());
}

#[tokio::test]
async fn tier_endpoint_matches_the_band_helpers() {
    let app = test_router();

    for (score, label) in [(85, "Ready to win!"), (70, "Strong potential"), (54, "Keep improving")]
    {
        let req = Request::builder()
            .method("GET")
            .uri(format!("/tier?score={score}"))
            .body(Body::empty())
            .expect("build GET /tier");
        let (status, v) = call(app.clone(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["score"], json!(score));
        assert_eq!(v["label"], json!(label));
    }
}

#[tokio::test]
async fn history_records_scored_items() {
    let app = test_router();

    let payload = json!({ "gameType": "conversion", "hook": "3 steps, exactly" });
    let (status, _) = call(app.clone(), post_json("/score", &payload)).await;
    assert_eq!(status, StatusCode::OK);

    let req = Request::builder()
        .method("GET")
        .uri("/debug/history")
        .body(Body::empty())
        .expect("build GET /debug/history");
    let (status, v) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);

    let rows = v.as_array().expect("history array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["gameType"], json!("conversion"));
    assert!(rows[0]["score"].is_number());
    assert!(rows[0]["ts"].is_string());
    assert!(rows[0]["label"].is_string());
}
