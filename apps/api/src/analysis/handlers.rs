//! Axum route handlers for the Analysis API.

use axum::{
    extract::{FromRequest, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::catalog::Field;
use crate::analysis::matcher::MatchPolicy;
use crate::analysis::report::Report;
use crate::errors::AppError;
use crate::extraction::extract_document;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// `Json` whose rejections (bad body, missing field, over the size limit) come
/// back as `AppError` bodies instead of axum's plain-text responses.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub version: String,
    pub match_policy: MatchPolicy,
    pub fields: Vec<Field>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub field: String,
    pub jobs: Vec<String>,
    pub courses: Vec<String>,
}

/// Multipart part carrying the résumé.
const FILE_PART: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload (part `file`, PDF or plain text). Extracts the text and
/// returns the analysis report. The upload itself is not stored.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Report>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_PART) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let text = extract_document(bytes, content_type.as_deref()).await?;
        let report = state.analyzer.assemble(&text);
        info!(
            "Analyzed '{}' ({} bytes): top field '{}', {} skills",
            file_name,
            text.len(),
            report.top_field,
            report.skills.len()
        );
        return Ok(Json(report));
    }

    Err(AppError::Validation(format!(
        "multipart body must contain a '{FILE_PART}' part"
    )))
}

/// POST /api/v1/analyze/text
///
/// Analyzes already-extracted text. Empty text is valid and yields the empty report.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeTextRequest>,
) -> Result<Json<Report>, AppError> {
    let report = state.analyzer.assemble(&request.text);
    info!(
        "Analyzed text ({} bytes): top field '{}'",
        request.text.len(),
        report.top_field
    );
    Ok(Json(report))
}

/// GET /api/v1/catalog
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let engine = state.analyzer.engine();
    Json(CatalogResponse {
        version: engine.catalog().version().to_string(),
        match_policy: engine.policy(),
        fields: engine.catalog().fields().to_vec(),
    })
}

/// GET /api/v1/recommendations/:field
///
/// Unknown fields return empty lists, not 404.
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Json<RecommendationResponse> {
    let recommendation = state.analyzer.recommender().recommend(&field);
    Json(RecommendationResponse {
        field,
        jobs: recommendation.jobs,
        courses: recommendation.courses,
    })
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}
