//! Axum route handlers for the CV extraction API.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::extractor::WorkExperience;
use crate::state::AppState;

/// Multipart field name carrying the CV file.
const CV_FIELD: &str = "cv";

#[derive(Debug, Deserialize)]
pub struct ParseCvRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseCvResponse {
    pub success: bool,
    pub data: ParseCvData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseCvData {
    pub work_experiences: Vec<WorkExperience>,
}

/// POST /api/v1/cv/parse
///
/// Parses raw CV text and returns the extracted work experiences.
pub async fn handle_parse_cv(
    State(state): State<AppState>,
    Json(request): Json<ParseCvRequest>,
) -> Result<Json<ParseCvResponse>, AppError> {
    let text = request
        .text
        .ok_or_else(|| AppError::InvalidInput("No text provided".to_string()))?;

    let work_experiences = state.extractor.extract(&text).await?;

    Ok(Json(ParseCvResponse {
        success: true,
        data: ParseCvData { work_experiences },
    }))
}

/// POST /api/v1/cv/upload
///
/// Accepts a multipart CV upload (`cv` field, PDF or plain text), extracts
/// the text, and runs the same extraction pipeline as `/cv/parse`.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseCvResponse>, AppError> {
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(CV_FIELD) {
            continue;
        }

        let is_pdf = field.content_type() == Some("application/pdf")
            || field
                .file_name()
                .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
                .unwrap_or(false);

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {e}")))?;

        text = Some(if is_pdf {
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| AppError::InvalidInput(format!("Could not read PDF: {e}")))?
        } else {
            String::from_utf8(bytes.to_vec())
                .map_err(|_| AppError::InvalidInput("CV file is not valid UTF-8".to_string()))?
        });
        break;
    }

    let text =
        text.ok_or_else(|| AppError::InvalidInput(format!("Missing '{CV_FIELD}' file field")))?;

    let work_experiences = state.extractor.extract(&text).await?;

    Ok(Json(ParseCvResponse {
        success: true,
        data: ParseCvData { work_experiences },
    }))
}
