//! End-to-end tests driving the router in-process.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio_test::{assert_err, assert_ok};
use tower::ServiceExt;

use saferound_api::api::build_router;
use saferound_api::app_state::AppState;
use saferound_api::config::SobrietyConfig;
use saferound_api::domain::{BiologicalSex, User};
use saferound_api::persistence::{DrinkStore, InMemoryStore};
use saferound_api::upstream::{
    GenerateContentRequest, GenerativeClient, TransportError, UpstreamResponse,
};

#[derive(Debug, Default)]
struct ScriptedClient {
    replies: Mutex<VecDeque<UpstreamResponse>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GenerativeClient for ScriptedClient {
    async fn generate_content(
        &self,
        model: &str,
        _api_key: &str,
        _request: &GenerateContentRequest,
    ) -> Result<UpstreamResponse, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(model.to_string());
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .ok_or_else(|| TransportError("no scripted reply".to_string()))
    }
}

struct Harness {
    app: Router,
    store: Arc<InMemoryStore>,
    client: Arc<ScriptedClient>,
    state: AppState,
}

async fn harness(api_key: Option<&str>, replies: Vec<UpstreamResponse>) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    for (id, cut_off) in [("alice@example.com", false), ("bob@example.com", true)] {
        let Ok(user) = User::new(id, BiologicalSex::Female, 60.0) else {
            panic!("valid user");
        };
        store.upsert_user(user.with_cut_off(cut_off)).await;
    }
    let client = Arc::new(ScriptedClient {
        replies: Mutex::new(replies.into()),
        calls: Mutex::new(Vec::new()),
    });
    let config = SobrietyConfig {
        api_key: api_key.map(ToString::to_string),
        models: vec!["primary".to_string(), "secondary".to_string()],
        ..SobrietyConfig::default()
    };
    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn DrinkStore>,
        Arc::clone(&client) as Arc<dyn GenerativeClient>,
        &config,
        120,
    );
    let app = build_router().with_state(state.clone());
    Harness {
        app,
        store,
        client,
        state,
    }
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()));
    let Ok(request) = request else {
        panic!("request builds");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router is infallible");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body readable");
    };
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn answer(text: &str) -> UpstreamResponse {
    UpstreamResponse {
        status: 200,
        body: json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string(),
    }
}

#[tokio::test]
async fn bac_estimate_for_one_standard_drink() {
    let h = harness(None, vec![]).await;
    let (status, body) = post(
        &h.app,
        "/bac/estimate",
        json!({"user_id": "alice@example.com", "weight_kg": 70.0, "sex": "male",
               "alcohol_grams": 14.0, "time_elapsed_minutes": 0.0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bac"], 0.0294);
    assert_eq!(body["status"], "green");
    assert_eq!(body["notify_guardian"], false);
    assert_eq!(h.state.guardian.sent(), 0);
}

#[tokio::test]
async fn red_tier_counts_a_guardian_notification() {
    let h = harness(None, vec![]).await;
    let (status, body) = post(
        &h.app,
        "/bac/estimate",
        json!({"weight_kg": 50.0, "sex": "FEMALE", "alcohol_grams": 70.0,
               "time_elapsed_minutes": 30.0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "red");
    assert_eq!(body["notify_guardian"], true);
    assert_eq!(h.state.guardian.sent(), 1);
}

#[tokio::test]
async fn bac_rejects_non_positive_weight_with_field_detail() {
    let h = harness(None, vec![]).await;
    let (status, body) = post(
        &h.app,
        "/bac/estimate",
        json!({"weight_kg": 0.0, "sex": "male", "alcohol_grams": 14.0,
               "time_elapsed_minutes": 0.0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);
    assert_eq!(body["error"]["details"], "weight_kg");
}

#[tokio::test]
async fn undecodable_body_gets_structured_error() {
    let h = harness(None, vec![]).await;
    let (status, body) = post(
        &h.app,
        "/bac/estimate",
        json!({"weight_kg": 70.0, "sex": "other", "alcohol_grams": 14.0,
               "time_elapsed_minutes": 0.0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1000);

    let (status, body) = post(&h.app, "/validate-drink", json!({"user_id": "alice@example.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1000);
}

#[tokio::test]
async fn validate_drink_cooldown_then_allowed() {
    let h = harness(None, vec![]).await;
    let scan = |drink: &str, at: &str| {
        json!({"user_id": "alice@example.com", "drink_id": drink, "alcohol_grams": 14.0,
               "scanned_at": at})
    };

    let (status, first) = post(&h.app, "/validate-drink", scan("d1", "2025-06-01T22:00:00Z")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["allowed"], true);
    assert_eq!(first["reason"], "OK");

    let (_, second) = post(&h.app, "/validate-drink", scan("d2", "2025-06-01T22:01:00Z")).await;
    assert_eq!(second["allowed"], false);
    assert_eq!(second["reason"], "COOLDOWN");
    assert_eq!(second["last_drink_at"], "2025-06-01T22:00:00Z");

    let (_, third) = post(&h.app, "/validate-drink", scan("d3", "2025-06-01T22:02:01Z")).await;
    assert_eq!(third["allowed"], true);
    assert!(third.get("last_drink_at").is_none());

    assert_eq!(h.store.drinks_for("alice@example.com").await.len(), 2);
}

#[tokio::test]
async fn validate_drink_denials_are_not_errors() {
    let h = harness(None, vec![]).await;
    let (status, cut) = post(
        &h.app,
        "/validate-drink",
        json!({"user_id": "bob@example.com", "drink_id": "d1", "alcohol_grams": 14.0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cut["reason"], "SERVICE_DENIED");
    assert_eq!(cut["message"], "Service denied. You are cut off.");

    let (status, unknown) = post(
        &h.app,
        "/validate-drink",
        json!({"user_id": "carol@example.com", "drink_id": "d1", "alcohol_grams": 14.0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown["reason"], "SERVICE_DENIED");
    assert_eq!(unknown["message"], "User not found.");
    assert_eq!(h.store.drink_count().await, 0);
}

#[tokio::test]
async fn validate_drink_rejects_negative_grams() {
    let h = harness(None, vec![]).await;
    let (status, body) = post(
        &h.app,
        "/validate-drink",
        json!({"user_id": "alice@example.com", "drink_id": "d1", "alcohol_grams": -1.0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"], "alcohol_grams");
}

#[tokio::test]
async fn assess_without_credential_returns_neutral_default() {
    let h = harness(None, vec![answer("{}")]).await;
    let (status, body) = post(&h.app, "/sobriety/assess", json!({"bac": 0.11})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sobriety_score"], 50);
    assert_eq!(body["is_emergency"], false);
    assert!(h.client.calls().is_empty());
}

#[tokio::test]
async fn assess_falls_back_past_rate_limited_model() {
    let limited = UpstreamResponse {
        status: 429,
        body: "{\"error\":{\"code\":429}}".to_string(),
    };
    let h = harness(
        Some("test-key"),
        vec![
            limited,
            answer("```json\n{\"sobriety_score\":10,\"recommendation\":\"stop\",\"is_emergency\":true}\n```"),
        ],
    )
    .await;
    let (status, body) = post(
        &h.app,
        "/sobriety/assess",
        json!({
            "straight_line_jitter": [{"x": 0.1, "y": -0.4, "z": 9.8}],
            "reaction_latencies_ms": [410.0, 520.0, 480.0, 600.0, 455.0],
            "typing_test": {"typo_count": 7, "speed_wpm": 18.0, "text_entered": "teh quikc"},
            "bac": 0.14
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sobriety_score"], 10);
    assert_eq!(body["recommendation"], "stop");
    assert_eq!(body["is_emergency"], true);
    assert_eq!(h.client.calls(), vec!["primary", "secondary"]);
}

#[tokio::test]
async fn recommend_uses_bac_fallback_when_models_exhausted() {
    let status_reply = |status: u16| UpstreamResponse {
        status,
        body: format!("{{\"error\":{{\"code\":{status}}}}}"),
    };
    let h = harness(Some("test-key"), vec![status_reply(429), status_reply(404)]).await;
    let (status, body) = post(&h.app, "/sobriety/recommend", json!({"bac": 0.1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sobriety_score"], 50);
    assert_eq!(body["recommendation"], "BAC at or above legal limit. Do not drive.");
    assert_eq!(body["is_emergency"], false);
    assert_eq!(h.client.calls(), vec!["primary", "secondary"]);
}

#[tokio::test]
async fn recommend_stops_on_transport_failure() {
    let h = harness(Some("test-key"), vec![]).await;
    let (status, body) = post(&h.app, "/sobriety/recommend", json!({"bac": 0.2})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sobriety_score"], 0);
    assert_eq!(h.client.calls(), vec!["primary"]);
}

#[tokio::test]
async fn assess_rejects_negative_bac() {
    let h = harness(Some("test-key"), vec![]).await;
    let (status, body) = post(&h.app, "/sobriety/assess", json!({"bac": -0.2})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"], "bac");
    assert!(h.client.calls().is_empty());
}

#[tokio::test]
async fn health_and_banner() {
    let h = harness(None, vec![]).await;
    for uri in ["/health", "/"] {
        let Ok(request) = Request::get(uri).body(Body::empty()) else {
            panic!("request builds");
        };
        let response = h.app.clone().oneshot(request).await;
        let response = assert_ok!(response);
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn recommend_without_credential_and_invalid_bac() {
    let h = harness(None, vec![]).await;
    let direct = assert_ok!(h.state.sobriety.recommend(0.0, None).await);
    assert_eq!(direct.sobriety_score, 50);
    assert_err!(h.state.sobriety.recommend(f64::NAN, None).await);
}
