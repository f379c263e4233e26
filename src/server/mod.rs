//! HTTP server for the gatekeeper bot.
//!
//! This module implements the HTTP server that:
//! - Accepts gateway dispatches from the relay, verifies their signatures and
//!   hands them to the tribunal
//! - Provides case inspection endpoints for observability
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `POST /events` - Accepts a relayed dispatch (returns 200 once handled)
//! - `GET /cases` - Lists pending cases as JSON
//! - `GET /cases/{subject}` - Returns one pending case as JSON
//! - `GET /health` - Returns 200 if server is running

use std::sync::Arc;

use crate::effects::{MembershipInterpreter, MessagingInterpreter};
use crate::vote::Tribunal;

pub mod cases;
pub mod health;
pub mod relay;

pub use cases::{case_handler, cases_handler};
pub use health::health_handler;
pub use relay::relay_handler;

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. It owns the
/// tribunal, so every request sees the same pending cases.
pub struct AppState<I> {
    inner: Arc<AppStateInner<I>>,
}

struct AppStateInner<I> {
    tribunal: Tribunal<I>,

    /// Relay secret for HMAC-SHA256 signature verification.
    relay_secret: Vec<u8>,
}

// Manual impl: cloning the handle must not require `I: Clone`.
impl<I> Clone for AppState<I> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I> AppState<I>
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync + 'static,
{
    pub fn new(tribunal: Tribunal<I>, relay_secret: impl Into<Vec<u8>>) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                tribunal,
                relay_secret: relay_secret.into(),
            }),
        }
    }

    pub fn tribunal(&self) -> &Tribunal<I> {
        &self.inner.tribunal
    }

    pub fn relay_secret(&self) -> &[u8] {
        &self.inner.relay_secret
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<I>(app_state: AppState<I>) -> axum::Router
where
    I: MembershipInterpreter + MessagingInterpreter + Send + Sync + 'static,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/events", post(relay_handler::<I>))
        .route("/cases", get(cases_handler::<I>))
        .route("/cases/{subject}", get(case_handler::<I>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::time::Duration;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::gateway::{SIGNATURE_HEADER, sign};
    use crate::test_utils::{
        GENERAL_CHANNEL, MEMBER_ROLE, PROBATION_ROLE, RecordingInterpreter, VOTING_CHANNEL,
        is_add_role, is_kick, is_post_to, is_remove_role, settings, tribunal,
    };
    use crate::types::UserId;

    const SECRET: &[u8] = b"relay-secret";

    fn test_app() -> (Router, AppState<RecordingInterpreter>) {
        let state = AppState::new(tribunal(), SECRET.to_vec());
        (build_router(state.clone()), state)
    }

    /// Creates a relay request signed with `secret`.
    fn signed_request(secret: &[u8], body: &serde_json::Value) -> Request<Body> {
        let body_bytes = serde_json::to_vec(body).unwrap();
        Request::builder()
            .method("POST")
            .uri("/events")
            .header("content-type", "application/json")
            .header(SIGNATURE_HEADER, sign(&body_bytes, secret).unwrap())
            .body(Body::from(body_bytes))
            .unwrap()
    }

    fn member_add(user: u64) -> serde_json::Value {
        serde_json::json!({
            "t": "GUILD_MEMBER_ADD",
            "d": { "guild_id": "9", "user": { "id": user.to_string(), "username": "newbie" } }
        })
    }

    fn reaction(t: &str, emoji: &str, message: u64, user: u64) -> serde_json::Value {
        serde_json::json!({
            "t": t,
            "d": {
                "user_id": user.to_string(),
                "channel_id": VOTING_CHANNEL.to_string(),
                "message_id": message.to_string(),
                "emoji": { "name": emoji },
            }
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    // ─── Health endpoint tests ───

    #[tokio::test]
    async fn health_returns_200() {
        let (app, _) = test_app();
        assert_eq!(get(&app, "/health").await, (StatusCode::OK, "OK".to_string()));
    }

    // ─── Relay endpoint tests ───

    #[tokio::test]
    async fn member_add_opens_case() {
        let (app, state) = test_app();

        let (status, body) = send(&app, signed_request(SECRET, &member_add(50))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "opened");
        let record = state.tribunal().store().get(UserId(50)).await.unwrap();
        assert_eq!(record.subject_tag, "newbie");
        assert!(record.prompt.is_some());
    }

    #[tokio::test]
    async fn repeated_join_reports_duplicate() {
        let (app, _) = test_app();
        send(&app, signed_request(SECRET, &member_add(50))).await;

        let (status, body) = send(&app, signed_request(SECRET, &member_add(50))).await;

        assert_eq!((status, body.as_str()), (StatusCode::OK, "duplicate"));
    }

    #[tokio::test]
    async fn reactions_decide_a_case_end_to_end() {
        let (app, state) = test_app();
        send(&app, signed_request(SECRET, &member_add(50))).await;
        let prompt = state
            .tribunal()
            .store()
            .get(UserId(50))
            .await
            .unwrap()
            .prompt
            .unwrap()
            .message
            .get();

        let mut labels = Vec::new();
        for voter in [10, 11, 12] {
            let event = reaction("MESSAGE_REACTION_ADD", "👍", prompt, voter);
            labels.push(send(&app, signed_request(SECRET, &event)).await.1);
        }
        let late = reaction("MESSAGE_REACTION_REMOVE", "👎", prompt, 13);
        labels.push(send(&app, signed_request(SECRET, &late)).await.1);

        assert_eq!(labels, ["pending", "pending", "promoted", "ignored"]);
        let interpreter = state.tribunal().interpreter();
        assert_eq!(interpreter.count(is_add_role(MEMBER_ROLE)), 1);
        assert_eq!(interpreter.count(is_kick), 0);
    }

    #[tokio::test]
    async fn withdrawn_reject_kicks_end_to_end() {
        let (app, state) = test_app();
        send(&app, signed_request(SECRET, &member_add(50))).await;
        let prompt = state.tribunal().store().pending().await[0]
            .prompt
            .unwrap()
            .message
            .get();

        let add = reaction("MESSAGE_REACTION_ADD", "👎", prompt, 10);
        let remove = reaction("MESSAGE_REACTION_REMOVE", "👎", prompt, 10);

        assert_eq!(send(&app, signed_request(SECRET, &add)).await.1, "pending");
        assert_eq!(send(&app, signed_request(SECRET, &remove)).await.1, "rejected");
        assert_eq!(state.tribunal().interpreter().count(is_kick), 1);
    }

    #[tokio::test]
    async fn dropped_request_still_completes_the_outcome() {
        // Every interpreter call suspends, so the request is still in flight
        // after the case has been claimed.
        let state = AppState::new(
            Tribunal::new(RecordingInterpreter::yielding(), settings()),
            SECRET.to_vec(),
        );
        let app = build_router(state.clone());
        send(&app, signed_request(SECRET, &member_add(50))).await;
        let prompt = state.tribunal().store().pending().await[0]
            .prompt
            .unwrap()
            .message
            .get();
        for voter in [10, 11] {
            let event = reaction("MESSAGE_REACTION_ADD", "👍", prompt, voter);
            send(&app, signed_request(SECRET, &event)).await;
        }

        // Poll the deciding request once, then abandon it.
        let deciding = reaction("MESSAGE_REACTION_ADD", "👍", prompt, 12);
        let abandoned = tokio::select! {
            biased;
            _ = app.clone().oneshot(signed_request(SECRET, &deciding)) => false,
            _ = std::future::ready(()) => true,
        };
        assert!(abandoned);

        let interpreter = state.tribunal().interpreter();
        tokio::time::timeout(Duration::from_secs(5), async {
            while interpreter.count(is_post_to(GENERAL_CHANNEL)) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("promotion should finish without the request");

        assert!(state.tribunal().store().get(UserId(50)).await.is_none());
        assert_eq!(interpreter.count(is_remove_role(PROBATION_ROLE)), 1);
        assert_eq!(interpreter.count(is_add_role(MEMBER_ROLE)), 1);
    }

    #[tokio::test]
    async fn unknown_dispatch_is_ignored() {
        let (app, state) = test_app();
        let body = serde_json::json!({ "t": "TYPING_START", "d": { "user_id": "10" } });

        let (status, body) = send(&app, signed_request(SECRET, &body)).await;

        assert_eq!((status, body.as_str()), (StatusCode::OK, "ignored"));
        assert!(state.tribunal().interpreter().effects().is_empty());
    }

    #[tokio::test]
    async fn invalid_signature_returns_401_and_does_nothing() {
        let (app, state) = test_app();

        let (status, _) = send(&app, signed_request(b"wrong-secret", &member_add(50))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(state.tribunal().store().is_empty().await);
        assert!(state.tribunal().interpreter().effects().is_empty());
    }

    #[tokio::test]
    async fn missing_signature_returns_400() {
        let (app, state) = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/events")
            .body(Body::from(serde_json::to_vec(&member_add(50)).unwrap()))
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(SIGNATURE_HEADER));
        assert!(state.tribunal().store().is_empty().await);
    }

    #[tokio::test]
    async fn malformed_dispatch_returns_400() {
        let (app, _) = test_app();
        let body = serde_json::json!({ "t": "GUILD_MEMBER_ADD", "d": { "user": {} } });

        let (status, _) = send(&app, signed_request(SECRET, &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ─── Case endpoint tests ───

    #[tokio::test]
    async fn cases_lists_pending_cases() {
        let (app, _) = test_app();
        send(&app, signed_request(SECRET, &member_add(50))).await;

        let (status, body) = get(&app, "/cases").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["required_approvals"], 3);
        assert_eq!(json["pending"][0]["subject"], "50");
        assert_eq!(json["pending"][0]["approval_count"], 0);
    }

    #[tokio::test]
    async fn case_returns_one_case_or_404() {
        let (app, _) = test_app();
        send(&app, signed_request(SECRET, &member_add(50))).await;

        let (status, body) = get(&app, "/cases/50").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["subject_tag"], "newbie");

        assert_eq!(get(&app, "/cases/51").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&app, "/cases/not-a-snowflake").await.0, StatusCode::BAD_REQUEST);
    }
}
