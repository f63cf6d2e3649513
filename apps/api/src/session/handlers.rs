//! Axum route handlers for the session pipeline.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analyze_resume;
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::generation::regenerate_resume;
use crate::models::analysis::{score_fraction, AnalysisResult, NOT_AVAILABLE};
use crate::render::{assemble, layout, Block, DOCX_FILE_NAME, DOCX_MIME};
use crate::session::SessionSummary;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub characters: usize,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub job_description: String,
}

/// Analysis with display defaults applied.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub model: String,
    pub overall_score: i64,
    pub overall_progress: f64,
    pub ats_friendliness_score: i64,
    pub ats_progress: f64,
    pub ats_friendliness_feedback: String,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub skill_gap_analysis: String,
    pub summary_and_suggestions: String,
}

impl AnalyzeResponse {
    fn new(model: &str, result: &AnalysisResult) -> Self {
        let or_na = |s: &Option<String>| s.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self {
            model: model.to_string(),
            overall_score: result.overall_score(),
            overall_progress: score_fraction(result.overall_score()),
            ats_friendliness_score: result.ats_friendliness_score(),
            ats_progress: score_fraction(result.ats_friendliness_score()),
            ats_friendliness_feedback: or_na(&result.ats_friendliness_feedback),
            matching_keywords: result.matching_keywords().to_vec(),
            missing_keywords: result.missing_keywords().to_vec(),
            skill_gap_analysis: or_na(&result.skill_gap_analysis),
            summary_and_suggestions: or_na(&result.summary_and_suggestions),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// The backend's reply as returned, for preview.
    pub resume: Value,
    /// The document outline that was rendered.
    pub blocks: Vec<Block>,
    pub download_path: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    info!("Created session {session_id}");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    Ok(Json(state.sessions.get(id).await?.summary(id)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload of the resume PDF in field `file`. Replaces any previous
/// resume and drops results derived from it.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    state.sessions.get(id).await?;
    let pdf = read_pdf_field(multipart).await?;
    let text = extract_blocking(pdf).await?;

    let characters = text.chars().count();
    state
        .sessions
        .update(id, |s| s.set_resume_text(text.clone()))
        .await?;
    info!("Session {id}: stored resume text ({characters} chars)");

    Ok(Json(UploadResumeResponse {
        characters,
        resume_text: text,
    }))
}

/// PUT /api/v1/sessions/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = state
        .sessions
        .update(id, |s| {
            s.set_job_description(request.job_description);
            s.summary(id)
        })
        .await?;
    Ok(Json(summary))
}

/// POST /api/v1/sessions/:id/analyze
///
/// Scores the stored resume against the stored job description. On failure
/// the session's analysis is left unset.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let resume_text = session.resume_text.as_deref().unwrap_or_default();
    if resume_text.is_empty() || session.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please upload a resume and paste a job description.".to_string(),
        ));
    }

    info!("Session {id}: analyzing with {}", state.llm.model());
    let outcome = analyze_resume(state.llm.as_ref(), &session.job_description, resume_text).await;

    let stored = state
        .sessions
        .update(id, |s| {
            if s.revision != session.revision {
                return false;
            }
            s.analysis = outcome.as_ref().ok().cloned();
            s.clear_generated();
            true
        })
        .await?;

    let result = outcome?;
    if !stored {
        warn!("Session {id}: inputs changed during analysis; result discarded");
        return Err(AppError::Validation(
            "The resume or job description changed during analysis. Please analyze again."
                .to_string(),
        ));
    }

    Ok(Json(AnalyzeResponse::new(state.llm.model(), &result)))
}

/// POST /api/v1/sessions/:id/generate
///
/// Multipart upload of a template PDF in field `file`. Rewrites the resume to
/// the template's structure and renders the DOCX for download.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let analysis = session.analysis.as_ref().ok_or_else(|| {
        AppError::Validation("Analyze the resume before generating a new one.".to_string())
    })?;
    let resume_text = session.resume_text.as_deref().unwrap_or_default();

    let template_pdf = read_pdf_field(multipart).await?;
    let template_text = extract_blocking(template_pdf).await?;

    info!("Session {id}: re-drafting resume with {}", state.llm.model());
    let outcome = regenerate_resume(
        state.llm.as_ref(),
        resume_text,
        &session.job_description,
        analysis,
        &template_text,
    )
    .await;

    let regenerated = match outcome {
        Ok(regenerated) => regenerated,
        Err(e) => {
            clear_generated_if_current(&state, id, session.revision).await?;
            return Err(e.into());
        }
    };

    let blocks = layout(&regenerated.resume);
    let document = match assemble(&regenerated.resume) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            clear_generated_if_current(&state, id, session.revision).await?;
            return Err(e.into());
        }
    };
    let raw = regenerated.raw;

    let stored = state
        .sessions
        .update(id, |s| {
            if s.revision != session.revision {
                return false;
            }
            s.generated = Some(raw.clone());
            s.document = Some(document);
            true
        })
        .await?;
    if !stored {
        warn!("Session {id}: inputs changed during generation; result discarded");
        return Err(AppError::Validation(
            "The resume or job description changed during generation. Please generate again."
                .to_string(),
        ));
    }

    Ok(Json(GenerateResponse {
        resume: raw,
        blocks,
        download_path: format!("/api/v1/sessions/{id}/document"),
    }))
}

/// GET /api/v1/sessions/:id/document
pub async fn handle_download_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let document = state
        .sessions
        .get(id)
        .await?
        .document
        .ok_or_else(|| AppError::NotFound("No generated resume for this session".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOCX_FILE_NAME}\""),
            ),
        ],
        document,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Reads the `file` field of a multipart body. Only PDF uploads are accepted
/// when the client declares a content type.
async fn read_pdf_field(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if let Some(content_type) = field.content_type() {
            if !matches!(content_type, "application/pdf" | "application/octet-stream") {
                return Err(AppError::Validation(format!(
                    "Only PDF uploads are supported (got {content_type})"
                )));
            }
        }
        return field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")));
    }

    Err(AppError::Validation(format!(
        "Expected a multipart field named '{FILE_FIELD}'"
    )))
}

/// Drops the previous generated resume after a failed generation, unless the
/// inputs changed in the meantime.
async fn clear_generated_if_current(state: &AppState, id: Uuid, revision: u64) -> Result<(), AppError> {
    state
        .sessions
        .update(id, |s| {
            if s.revision == revision {
                s.clear_generated();
            }
        })
        .await
}

/// PDF parsing is CPU-bound; keep it off the async workers.
async fn extract_blocking(pdf: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || extract_text(&pdf))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))??;
    Ok(text)
}
