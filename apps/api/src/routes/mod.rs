pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::cover_letter::handlers as cover_letter;
use crate::editor::handlers as editor;
use crate::export::handlers as export;
use crate::identity::middleware::auth_middleware;
use crate::render::handlers as render;
use crate::state::AppState;

/// Multipart framing on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let image_body_limit = state.config.max_image_bytes + MULTIPART_OVERHEAD_BYTES;

    let api = Router::new()
        // Stored profile
        .route(
            "/profile",
            get(editor::handle_get_profile).put(editor::handle_put_profile),
        )
        // Editor session
        .route(
            "/editor/session",
            post(editor::handle_open_session)
                .get(editor::handle_get_session)
                .delete(editor::handle_close_session),
        )
        .route("/editor/commands", post(editor::handle_apply_commands))
        .route("/editor/section/next", post(editor::handle_next_section))
        .route(
            "/editor/section/previous",
            post(editor::handle_previous_section),
        )
        .route(
            "/editor/section/restart",
            post(editor::handle_restart_sections),
        )
        .route("/editor/section/go-to", post(editor::handle_go_to_section))
        .route("/editor/save", post(editor::handle_save))
        .route(
            "/editor/image",
            post(editor::handle_upload_image).layer(DefaultBodyLimit::max(image_body_limit)),
        )
        // Preview and export
        .route("/templates", get(render::handle_list_templates))
        .route("/render", get(render::handle_render_query))
        .route("/render/:template_id", get(render::handle_render))
        .route("/export/pdf", get(export::handle_export_pdf))
        .route("/export/pdf/fit", get(export::handle_page_fit))
        // Cover letters
        .route("/cover-letter", post(cover_letter::handle_draft_cover_letter))
        // Identity
        .route("/auth/sign-out", post(editor::handle_sign_out))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1", api)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, DEFAULT_MAX_IMAGE_BYTES};
    use crate::editor::registry::SessionRegistry;
    use crate::identity::jwt::JwtIdentityGateway;
    use crate::identity::{AuthUser, UserId};
    use crate::storage::blob::MemoryBlobStore;
    use crate::storage::memory::MemoryProfileStore;

    fn test_app() -> (Router, String) {
        test_app_with(Arc::new(MemoryProfileStore::new()))
    }

    fn test_app_with(profiles: Arc<MemoryProfileStore>) -> (Router, String) {
        let identity = Arc::new(JwtIdentityGateway::new("test-secret"));
        let user = AuthUser {
            id: UserId::new("u1"),
            email: "jane@example.com".to_string(),
        };
        let token = identity.issue(&user, 3600).unwrap();
        let state = AppState {
            config: Config {
                database_url: None,
                s3: None,
                jwt_secret: "test-secret".to_string(),
                anthropic_api_key: None,
                port: 0,
                rust_log: "info".to_string(),
                max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            },
            profiles,
            blobs: Arc::new(MemoryBlobStore::new()),
            identity,
            sessions: Arc::new(SessionRegistry::new()),
            llm: None,
            http: reqwest::Client::new(),
        };
        (build_router(state), token)
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, req).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let (app, _) = test_app();
        let (status, body) = send_json(&app, request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "vitae-api");
        assert_eq!(body["database"], false);
    }

    #[tokio::test]
    async fn test_api_requires_bearer_token() {
        let (app, _) = test_app();
        let (status, body) = send_json(&app, request("GET", "/api/v1/profile", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, body) =
            send_json(&app, request("GET", "/api/v1/profile", Some("garbage"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_unreadable_stored_profile_serves_blank_document() {
        let profiles = Arc::new(MemoryProfileStore::new());
        profiles
            .put_raw(&UserId::new("u1"), json!({"basics": 42}))
            .await;
        let (app, token) = test_app_with(profiles);
        let token = Some(token.as_str());

        let (status, doc) = send_json(&app, request("GET", "/api/v1/profile", token, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["basics"]["email"], "jane@example.com");

        let (status, _) = send(&app, request("GET", "/api/v1/render/macchiato", token, None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_edit_preview_save_flow() {
        let (app, token) = test_app();
        let token = Some(token.as_str());

        let (status, snapshot) =
            send_json(&app, request("POST", "/api/v1/editor/session", token, None)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(snapshot["document"]["basics"]["email"], "jane@example.com");
        assert_eq!(snapshot["section"], "personal");

        let commands = json!({"commands": [
            {"op": "set_field", "field": "basics.name", "value": "Jane Doe"},
            {"op": "set_field", "field": "basics.summary", "value": "Builds reliable services."}
        ]});
        let (status, snapshot) = send_json(
            &app,
            request("POST", "/api/v1/editor/commands", token, Some(commands)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["document"]["basics"]["name"], "Jane Doe");

        let (status, html) = send(&app, request("GET", "/api/v1/render/macchiato", token, None)).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("data-section=\"summary\""));
        assert!(!html.contains("data-section=\"experience\""));

        let (status, _) = send_json(&app, request("POST", "/api/v1/editor/save", token, None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send_json(&app, request("DELETE", "/api/v1/editor/session", token, None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, stored) = send_json(&app, request("GET", "/api/v1/profile", token, None)).await;
        assert_eq!(stored["basics"]["name"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_out_of_range_command_is_bad_request() {
        let (app, token) = test_app();
        let token = Some(token.as_str());
        send_json(&app, request("POST", "/api/v1/editor/session", token, None)).await;

        let commands = json!({"commands": [{"op": "remove_entry", "collection": "work", "index": 4}]});
        let (status, body) = send_json(
            &app,
            request("POST", "/api/v1/editor/commands", token, Some(commands)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_section_navigation() {
        let (app, token) = test_app();
        let token = Some(token.as_str());
        send_json(&app, request("POST", "/api/v1/editor/session", token, None)).await;

        let (_, snapshot) =
            send_json(&app, request("POST", "/api/v1/editor/section/next", token, None)).await;
        assert_eq!(snapshot["section"], "summary");
        let (_, snapshot) =
            send_json(&app, request("POST", "/api/v1/editor/section/restart", token, None)).await;
        assert_eq!(snapshot["section"], "personal");
    }

    #[tokio::test]
    async fn test_unknown_template_is_bad_request() {
        let (app, token) = test_app();
        let (status, _) = send_json(
            &app,
            request("GET", "/api/v1/render/fancy", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_render_accepts_template_query_string() {
        let (app, token) = test_app();
        let token = Some(token.as_str());

        let (status, html) = send(
            &app,
            request("GET", "/api/v1/render?templateId=one-page-plus&disableLinks=true", token, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(html).unwrap().contains("jane@example.com"));

        let (status, _) = send_json(&app, request("GET", "/api/v1/render?templateId=fancy", token, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send_json(&app, request("GET", "/api/v1/render", token, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pdf_export_returns_pdf_bytes() {
        let (app, token) = test_app();
        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/export/pdf", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[tokio::test]
    async fn test_cover_letter_unavailable_without_key() {
        let (app, token) = test_app();
        let (status, body) = send_json(
            &app,
            request(
                "POST",
                "/api/v1/cover-letter",
                Some(&token),
                Some(json!({"jobDescription": "Rust engineer"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token_and_closes_session() {
        let (app, token) = test_app();
        let token = Some(token.as_str());
        send_json(&app, request("POST", "/api/v1/editor/session", token, None)).await;

        let (status, _) = send_json(&app, request("POST", "/api/v1/auth/sign-out", token, None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(&app, request("GET", "/api/v1/editor/session", token, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
