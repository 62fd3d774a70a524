use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::resume::extract::{extract_text, MAX_UPLOAD_BYTES};
use crate::resume::score::{analyze_response, AtsAnalysis};
use crate::state::AppState;

/// Multipart field the SPA uploads the résumé under.
pub const RESUME_FIELD: &str = "resumeFile";

struct Upload {
    filename: Option<String>,
    content_type: Option<String>,
    bytes: bytes::Bytes,
}

/// POST /resume-api/ats-score
///
/// Extracts text from the uploaded résumé, asks the AI service for an ATS
/// assessment, and post-processes the score. AI failures come back as a
/// 200 with `notice` set.
pub async fn handle_ats_score(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AtsAnalysis>, AppError> {
    let upload = read_resume_field(multipart).await?;
    info!(
        "Received resume upload {:?} ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );

    // PDF parsing is CPU-bound and can panic on malformed input.
    let resume_text = tokio::task::spawn_blocking(move || {
        extract_text(
            upload.filename.as_deref(),
            upload.content_type.as_deref(),
            &upload.bytes,
        )
    })
    .await
    .map_err(|e| {
        tracing::warn!("Resume text extraction aborted: {e}");
        AppError::Validation("Could not read text from the uploaded resume".to_string())
    })??;

    let raw = state.analyzer.analyze(&resume_text).await;
    Ok(Json(analyze_response(&raw)))
}

async fn read_resume_field(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let filename = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation(format!(
                "Resume file exceeds the {} MB limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        return Ok(Upload {
            filename,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation(format!(
        "Missing '{RESUME_FIELD}' file field"
    )))
}
