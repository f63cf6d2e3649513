pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_upload_resume),
        )
        .route(
            "/api/v1/sessions/:id/job-description",
            put(handlers::handle_set_job_description),
        )
        .route(
            "/api/v1/sessions/:id/analyze",
            post(handlers::handle_analyze),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(handlers::handle_generate),
        )
        .route(
            "/api/v1/sessions/:id/document",
            get(handlers::handle_download_document),
        )
        .layer(upload_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::extraction::tests::{make_pdf, make_pdf_without_font_selection};
    use crate::llm_client::fake::ScriptedGenerator;
    use crate::llm_client::GenerationError;
    use crate::render::{DOCX_FILE_NAME, DOCX_MIME};
    use crate::session::SessionStore;

    const BOUNDARY: &str = "resume-enhancer-test-boundary";

    fn app(llm: Arc<ScriptedGenerator>) -> Router {
        app_with_store(llm).0
    }

    fn app_with_store(llm: Arc<ScriptedGenerator>) -> (Router, SessionStore) {
        let sessions = SessionStore::default();
        let router = build_router(AppState {
            config: Config::default(),
            llm,
            sessions: sessions.clone(),
        });
        (router, sessions)
    }

    fn multipart_body(content_type: &str, bytes: &[u8]) -> Body {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        Body::from(body)
    }

    fn upload(uri: String, content_type: &str, bytes: &[u8]) -> Request<Body> {
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart_body(content_type, bytes))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_session(app: &Router) -> Uuid {
        let response = send(app, Request::post("/api/v1/sessions").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        body["session_id"].as_str().unwrap().parse().unwrap()
    }

    async fn set_job_description(app: &Router, id: Uuid, text: &str) -> Response {
        send(
            app,
            Request::put(format!("/api/v1/sessions/{id}/job-description"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "job_description": text }).to_string()))
                .unwrap(),
        )
        .await
    }

    async fn post_empty(app: &Router, uri: String) -> Response {
        send(app, Request::post(uri).body(Body::empty()).unwrap()).await
    }

    async fn get(app: &Router, uri: String) -> Response {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn test_full_pipeline_produces_download() {
        let llm = Arc::new(ScriptedGenerator::new(vec![
            Ok(json!({
                "overall_score": 72,
                "ats_friendliness_score": 90,
                "matching_keywords": ["Rust"],
                "missing_keywords": ["Terraform"],
                "skill_gap_analysis": "No IaC."
            })),
            Ok(json!({
                "contact": {"name": "Jane Doe", "email": "jane@example.com"},
                "skills": ["Rust", "Terraform"]
            })),
        ]));
        let app = app(llm.clone());
        let id = create_session(&app).await;

        let response = send(
            &app,
            upload(format!("/api/v1/sessions/{id}/resume"), "application/pdf", &make_pdf(&["Jane Doe"])),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["resume_text"].as_str().unwrap().contains("Jane Doe"));

        let response = set_job_description(&app, id, "Platform engineer with Terraform").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["has_job_description"], true);

        let response = post_empty(&app, format!("/api/v1/sessions/{id}/analyze")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let analysis = json_body(response).await;
        assert_eq!(analysis["overall_score"], 72);
        assert_eq!(analysis["missing_keywords"], json!(["Terraform"]));
        assert_eq!(analysis["summary_and_suggestions"], "N/A");

        let response = send(
            &app,
            upload(format!("/api/v1/sessions/{id}/generate"), "application/pdf", &make_pdf(&["SKILLS"])),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let generated = json_body(response).await;
        assert_eq!(generated["resume"]["contact"]["name"], "Jane Doe");
        assert_eq!(generated["blocks"][0], json!({"kind": "title", "text": "Jane Doe"}));

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Platform engineer with Terraform"));
        assert!(prompts[1].contains(r#"Missing Keywords: ["Terraform"]"#));
        assert!(prompts[1].contains("SKILLS"));

        let response = get(&app, format!("/api/v1/sessions/{id}/document")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], DOCX_MIME);
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains(DOCX_FILE_NAME));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_analyze_requires_resume_and_job_description() {
        let llm = Arc::new(ScriptedGenerator::default());
        let app = app(llm.clone());
        let id = create_session(&app).await;

        let response = post_empty(&app, format!("/api/v1/sessions/{id}/analyze")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        set_job_description(&app, id, "Rust engineer").await;
        let response = post_empty(&app, format!("/api/v1/sessions/{id}/analyze")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_failed_analysis_leaves_result_unset() {
        let llm = Arc::new(ScriptedGenerator::new(vec![Err(GenerationError::Timeout {
            model: "llama3".to_string(),
        })]));
        let (app, sessions) = app_with_store(llm);
        let id = create_session(&app).await;

        sessions
            .update(id, |s| s.set_resume_text("Jane Doe\nRust engineer".to_string()))
            .await
            .unwrap();
        set_job_description(&app, id, "Rust engineer").await;

        let response = post_empty(&app, format!("/api/v1/sessions/{id}/analyze")).await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "LLM_TIMEOUT");
        assert!(body["error"]["message"].as_str().unwrap().contains("llama3"));

        let summary = json_body(get(&app, format!("/api/v1/sessions/{id}")).await).await;
        assert_eq!(summary["analyzed"], false);

        let response = send(
            &app,
            upload(format!("/api/v1/sessions/{id}/generate"), "application/pdf", &make_pdf(&["SKILLS"])),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_before_generation_is_not_found() {
        let app = app(Arc::new(ScriptedGenerator::default()));
        let id = create_session(&app).await;

        let response = get(&app, format!("/api/v1/sessions/{id}/document")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreadable_upload_is_unprocessable() {
        let app = app(Arc::new(ScriptedGenerator::default()));
        let id = create_session(&app).await;

        let response = send(
            &app,
            upload(format!("/api/v1/sessions/{id}/resume"), "application/pdf", b"not a pdf"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let summary = json_body(get(&app, format!("/api/v1/sessions/{id}")).await).await;
        assert_eq!(summary["resume_characters"], Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_pdf_content_is_unprocessable() {
        let app = app(Arc::new(ScriptedGenerator::default()));
        let id = create_session(&app).await;

        let pdf = make_pdf_without_font_selection(&["Jane Doe"]);
        let response = send(
            &app,
            upload(format!("/api/v1/sessions/{id}/resume"), "application/pdf", &pdf),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "EXTRACTION_ERROR");
    }

    #[tokio::test]
    async fn test_non_pdf_content_type_is_rejected() {
        let app = app(Arc::new(ScriptedGenerator::default()));
        let id = create_session(&app).await;

        let response = send(
            &app,
            upload(format!("/api/v1/sessions/{id}/resume"), "image/png", b"\x89PNG"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app(Arc::new(ScriptedGenerator::default()));
        let id = Uuid::new_v4();

        assert_eq!(get(&app, format!("/api/v1/sessions/{id}")).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            post_empty(&app, format!("/api/v1/sessions/{id}/analyze")).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_delete_session() {
        let app = app(Arc::new(ScriptedGenerator::default()));
        let id = create_session(&app).await;

        let response = send(
            &app,
            Request::delete(format!("/api/v1/sessions/{id}")).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(get(&app, format!("/api/v1/sessions/{id}")).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let app = app(Arc::new(ScriptedGenerator::default()));
        let body = json_body(get(&app, "/health".to_string()).await).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "scripted");
        assert_eq!(body["backend"], crate::config::DEFAULT_OLLAMA_API_URL);
    }
}
