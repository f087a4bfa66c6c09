//! HTTP surface of the planner.
//!
//! Endpoints:
//! - POST   /api/detect        upload an image, get product details and ideas
//! - POST   /api/plan          shot prompts for one idea of a session
//! - DELETE /api/sessions/:id  drop a session early
//! - GET    /api/styles        available style presets
//! - GET    /api/health        liveness plus live session count

pub mod error;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::state::AppState;
use routes::{delete_session_handler, detect_handler, health_handler, plan_handler, styles_handler};

/// Room for multipart boundaries and the small text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Browser frontends may be served from any origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    Router::new()
        .route("/api/detect", post(detect_handler))
        .route("/api/plan", post(plan_handler))
        .route("/api/sessions/:id", delete(delete_session_handler))
        .route("/api/styles", get(styles_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer())
        .with_state(state)
}

/// Serves until Ctrl-C. In-flight requests finish before this returns.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_addr;
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("Product photo agent listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Shutting down HTTP server...");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm::testing::ScriptedBackend;
    use crate::llm::Dispatcher;
    use crate::media::sample_png;
    use crate::pipeline::types::Idea;
    use crate::pipeline::{PlanningSession, ShootPlanner};
    use crate::session::SessionStore;

    const BOUNDARY: &str = "photo-agent-test-boundary";

    fn app_state(backend: ScriptedBackend) -> AppState {
        let config = Arc::new(Config::for_tests());
        let dispatcher = Dispatcher::new(Arc::new(backend), &config);
        let sessions = Arc::new(SessionStore::new(config.session_ttl));
        AppState::new(config, ShootPlanner::new(dispatcher, sessions))
    }

    fn seeded_session(state: &AppState) -> String {
        state.planner.sessions().create(PlanningSession {
            product: "ceramic mug".to_string(),
            category: "home_decor".to_string(),
            attributes: vec!["matte".to_string()],
            ideas: vec![Idea {
                id: "I1".to_string(),
                title: "Slow morning".to_string(),
                summary: "Mug by a window".to_string(),
                why_it_works: "Warm".to_string(),
                shot_keywords: vec!["steam".to_string()],
            }],
            style: Some("lifestyle".to_string()),
            platform: None,
            include_model: None,
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(filename: &str, file: &[u8], fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(b"\r\n");
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/detect")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_live_sessions() {
        let state = app_state(ScriptedBackend::new());
        seeded_session(&state);
        let app = build_router(state);

        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["sessions"], 1);
    }

    #[tokio::test]
    async fn cross_origin_requests_are_allowed() {
        let app = build_router(app_state(ScriptedBackend::new()));

        let request = Request::builder()
            .uri("/api/health")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let preflight = Request::builder()
            .method("OPTIONS")
            .uri("/api/plan")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(preflight).await.unwrap();
        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key("access-control-allow-methods"));
    }

    #[tokio::test]
    async fn styles_lists_every_preset() {
        let app = build_router(app_state(ScriptedBackend::new()));
        let request = Request::builder()
            .uri("/api/styles")
            .body(Body::empty())
            .unwrap();
        let body = read_json(app.oneshot(request).await.unwrap()).await;

        let styles = body.as_array().unwrap();
        assert_eq!(styles.len(), crate::prompts::STYLE_TEMPLATES.len());
        assert!(styles.iter().any(|style| style["key"] == "minimal"));
    }

    #[tokio::test]
    async fn plan_rejects_out_of_range_count() {
        let state = app_state(ScriptedBackend::new());
        let session_id = seeded_session(&state);
        let app = build_router(state);

        for count in [0, 13] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/plan",
                    json!({"session_id": session_id, "idea_id": "I1", "count": count}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(read_json(response).await["kind"], "bad_request");
        }
    }

    #[tokio::test]
    async fn plan_for_unknown_session_is_not_found() {
        let app = build_router(app_state(ScriptedBackend::new()));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/plan",
                json!({"session_id": "missing", "idea_id": "I1", "count": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["kind"], "not_found");
    }

    #[tokio::test]
    async fn plan_returns_shots_for_stored_idea() {
        let state = app_state(ScriptedBackend::new().reply(
            r#"{"shots": [{"index": 1, "title": "Window", "prompt": "matte mug by a window"}]}"#,
        ));
        let session_id = seeded_session(&state);
        let app = build_router(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/plan",
                json!({"session_id": session_id, "idea_id": "I1", "count": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["shots"][0]["prompt"], "matte mug by a window");
        assert_eq!(body["shots"][0]["index"], 1);
    }

    #[tokio::test]
    async fn empty_model_output_maps_to_service_unavailable() {
        let state = app_state(ScriptedBackend::new().reply("").reply("  "));
        let session_id = seeded_session(&state);
        let app = build_router(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/plan",
                json!({"session_id": session_id, "idea_id": "I1", "count": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json(response).await["kind"], "empty_response");
    }

    #[tokio::test]
    async fn delete_reports_whether_session_existed() {
        let state = app_state(ScriptedBackend::new());
        let session_id = seeded_session(&state);
        let app = build_router(state.clone());

        let uri = format!("/api/sessions/{session_id}");
        let request = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let body = read_json(app.clone().oneshot(request).await.unwrap()).await;
        assert_eq!(body["deleted"], true);
        assert_eq!(state.planner.sessions().count(), 0);

        let request = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let body = read_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(body["deleted"], false);
    }

    #[tokio::test]
    async fn detect_creates_session_from_upload() {
        let backend = ScriptedBackend::new()
            .reply(r#"{"product": "ceramic mug", "category": "home_decor", "attributes": ["matte"], "confidence": 88}"#)
            .reply(r#"{"ideas": [{"id": "I1", "title": "Slow morning", "summary": "s", "why_it_works": "w", "shot_keywords": []}]}"#);
        let state = app_state(backend);
        let app = build_router(state.clone());

        let png = sample_png(16, 16);
        let response = app
            .oneshot(multipart_request(
                "mug.png",
                &png,
                &[("style", "lifestyle"), ("platform", "instagram")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["product"], "ceramic mug");
        assert_eq!(body["confidence"].to_string(), "88");
        assert_eq!(body["ideas"][0]["id"], "I1");
        let session_id = body["session_id"].as_str().unwrap();
        let stored = state.planner.sessions().get(session_id).unwrap();
        assert_eq!(stored.style.as_deref(), Some("lifestyle"));
        assert_eq!(stored.platform.as_deref(), Some("instagram"));
    }

    #[tokio::test]
    async fn detect_rejects_unsupported_file_type() {
        let state = app_state(ScriptedBackend::new());
        let app = build_router(state.clone());

        let response = app
            .oneshot(multipart_request("notes.txt", b"hello", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["kind"], "invalid_image");
        assert_eq!(state.planner.sessions().count(), 0);
    }
}
