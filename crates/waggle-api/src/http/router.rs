//! Axum router configuration with middleware.
//!
//! Routes: POST /check, /complete, /register and GET /status, /health.
//! Middleware: CORS (permissive) and request tracing.
//!
//! Unknown paths and known paths hit with the wrong method both answer
//! plain 404, so probing clients cannot tell them apart.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/check", post(handlers::coordination::check))
        .route("/complete", post(handlers::coordination::complete))
        .route("/register", post(handlers::coordination::register))
        .route("/status", get(handlers::status::status))
        .route("/health", get(handlers::status::health))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use waggle_core::alert::AlertBus;
    use waggle_core::coordinator::Coordinator;
    use waggle_core::repository::memory::{MemoryBotRepository, MemoryClaimRepository};
    use waggle_types::config::CoordinationConfig;

    fn test_router() -> Router {
        let alerts = AlertBus::new(16);
        let coordinator = Arc::new(Coordinator::new(
            CoordinationConfig::default(),
            MemoryClaimRepository::new(),
            MemoryBotRepository::new(),
            alerts.clone(),
        ));
        build_router(AppState {
            coordinator,
            alerts,
            started_at: Instant::now(),
        })
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        }
    }

    async fn send(
        router: &Router,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, read_json(response).await)
    }

    async fn register_bot(router: &Router, id: &str, name: &str) {
        let (status, body) = send(
            router,
            Method::POST,
            "/register",
            Some(json!({ "bot_id": id, "bot_name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
    }

    #[tokio::test]
    async fn register_then_status_shows_the_bot() {
        let router = test_router();
        register_bot(&router, "b1", "Worker Bee").await;

        let (status, body) = send(&router, Method::GET, "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bots"][0]["id"], json!("b1"));
        assert_eq!(body["bots"][0]["name"], json!("Worker Bee"));
        assert_eq!(body["bots"][0]["status"], json!("online"));
        assert_eq!(body["bots"][0]["responseCount"], json!(0));
        assert_eq!(body["stats"]["totalResponses"], json!(0));
        assert_eq!(body["activeClaims"], json!(0));
    }

    #[tokio::test]
    async fn register_without_name_is_rejected() {
        let router = test_router();
        let (status, body) = send(
            &router,
            Method::POST,
            "/register",
            Some(json!({ "bot_id": "b1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Missing required fields"));
    }

    #[tokio::test]
    async fn register_with_out_of_range_weight_is_rejected() {
        let router = test_router();
        let (status, body) = send(
            &router,
            Method::POST,
            "/register",
            Some(json!({ "bot_id": "b1", "bot_name": "Bee", "weight": 99 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("bot weight 99 out of range (1-10)"));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let router = test_router();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{this is not json"))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], json!("Invalid JSON"));
    }

    #[tokio::test]
    async fn first_check_claims_the_message() {
        let router = test_router();
        register_bot(&router, "b1", "Bee One").await;
        register_bot(&router, "b2", "Bee Two").await;

        let (status, body) = send(
            &router,
            Method::POST,
            "/check",
            Some(json!({
                "chat_id": "c1",
                "message_id": "m1",
                "bot_id": "b1",
                "message_text": "hello there",
                "is_mention": false,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["should_respond"], json!(true));
        assert_eq!(body["reason"], json!("claimed"));
        assert_eq!(body["priority"], json!("normal"));

        // The second bot asking about the same message is refused
        let (status, body) = send(
            &router,
            Method::POST,
            "/check",
            Some(json!({
                "chat_id": "c1",
                "message_id": "m1",
                "bot_id": "b2",
                "message_text": "hello there",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["should_respond"], json!(false));
        assert_eq!(body["reason"], json!("already-claimed"));
        assert_eq!(body["priority"], json!("normal"));
    }

    #[tokio::test]
    async fn unregistered_bot_is_refused_with_classified_priority() {
        let router = test_router();
        let (status, body) = send(
            &router,
            Method::POST,
            "/check",
            Some(json!({
                "chat_id": "c1",
                "message_id": "m1",
                "bot_id": "ghost",
                "message_text": "what time is it?",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["should_respond"], json!(false));
        assert_eq!(body["reason"], json!("bot-not-registered"));
        // The refusal happens before classification; the wire format still
        // carries the classified priority
        assert_eq!(body["priority"], json!("high"));
    }

    #[tokio::test]
    async fn mention_is_urgent_on_the_wire() {
        let router = test_router();
        register_bot(&router, "b1", "Bee").await;

        let (status, body) = send(
            &router,
            Method::POST,
            "/check",
            Some(json!({
                "chat_id": "c1",
                "message_id": "m1",
                "bot_id": "b1",
                "message_text": "ping",
                "is_mention": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reason"], json!("claimed"));
        assert_eq!(body["priority"], json!("urgent"));
    }

    #[tokio::test]
    async fn check_without_required_fields_is_rejected() {
        let router = test_router();
        let (status, body) = send(
            &router,
            Method::POST,
            "/check",
            Some(json!({ "chat_id": "c1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Missing required fields"));
    }

    #[tokio::test]
    async fn complete_updates_counters_and_roster() {
        let router = test_router();
        register_bot(&router, "b1", "Bee").await;
        let (_, body) = send(
            &router,
            Method::POST,
            "/check",
            Some(json!({
                "chat_id": "c1",
                "message_id": "m1",
                "bot_id": "b1",
                "message_text": "hi",
            })),
        )
        .await;
        assert_eq!(body["should_respond"], json!(true));

        let (status, body) = send(
            &router,
            Method::POST,
            "/complete",
            Some(json!({
                "bot_id": "b1",
                "chat_id": "c1",
                "message_id": "m1",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let (_, body) = send(&router, Method::GET, "/status", None).await;
        assert_eq!(body["stats"]["totalResponses"], json!(1));
        assert_eq!(body["bots"][0]["responseCount"], json!(1));
        assert_eq!(body["bots"][0]["status"], json!("online"));
        // Completed claims stay visible until the sweeper removes them
        assert_eq!(body["activeClaims"], json!(1));
    }

    #[tokio::test]
    async fn complete_without_required_fields_is_rejected() {
        let router = test_router();
        let (status, body) = send(
            &router,
            Method::POST,
            "/complete",
            Some(json!({ "bot_id": "b1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Missing required fields"));
    }

    #[tokio::test]
    async fn health_reports_ok_and_uptime() {
        let router = test_router();
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
        assert!(body["uptime"].is_u64());
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let router = test_router();
        let (status, _) = send(&router, Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_method_is_also_404() {
        let router = test_router();
        let (status, _) = send(&router, Method::GET, "/check", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, Method::POST, "/health", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
