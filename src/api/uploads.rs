//! File upload endpoint

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::{multipart::MultipartError, Multipart};

use crate::{
    error::{AppError, AppResult},
    models::upload::UploadResult,
    services::media::UploadKind,
};

use super::AuthenticatedUser;

/// A file read from a multipart body
pub struct SubmittedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Read the first part named `field`, skipping any others
pub async fn read_file_field(multipart: &mut Multipart, field: &'static str) -> AppResult<SubmittedFile> {
    while let Some(part) = multipart.next_field().await.map_err(multipart_error)? {
        if part.name() != Some(field) {
            continue;
        }

        let file_name = part.file_name().unwrap_or(field).to_string();
        let content_type = part.content_type().map(str::to_string);
        let data = part.bytes().await.map_err(multipart_error)?;

        return Ok(SubmittedFile {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    Err(AppError::field(field, "required", "No file was submitted"))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

/// Upload a file (multipart field `file`)
#[utoipa::path(
    post,
    path = "/uploads",
    tag = "uploads",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data", description = "Field `file`, at most 10 MiB by default"),
    responses(
        (status = 201, description = "File stored", body = UploadResult),
        (status = 400, description = "Missing, empty or oversized file", body = crate::error::ErrorResponse),
        (status = 413, description = "Request body over the hard limit")
    )
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResult>)> {
    let file = read_file_field(&mut multipart, "file").await?;
    let stored = state
        .services
        .media
        .store(UploadKind::File, &file.file_name, file.content_type.as_deref(), &file.data)
        .await?;

    tracing::debug!(user_id = claims.user_id, name = %stored.name, "upload stored");
    Ok((StatusCode::CREATED, Json(stored)))
}
