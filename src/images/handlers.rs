use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection}, DefaultBodyLimit, Multipart,
        State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{instrument, warn};

use super::services::{upload_profile_image, UploadItem};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub profile_image: String,
}

pub fn write_routes(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload_profile_pic", post(upload_profile_pic))
        .layer(DefaultBodyLimit::max(max_bytes))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::bad_request(e.body_text())
    }
}

/// POST /upload_profile_pic (multipart)
/// Fields: `image` (file), optional `userId` which must match the token.
#[instrument(skip(state, mp), fields(user_id = %auth.user_id))]
pub async fn upload_profile_pic(
    State(state): State<AppState>,
    auth: AuthUser,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut mp = mp.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let mut image: Option<UploadItem> = None;
    let mut form_user_id: Option<String> = None;

    while let Some(field) = mp.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let body = field.bytes().await.map_err(multipart_error)?;
                image = Some(UploadItem {
                    body,
                    file_name,
                    content_type,
                });
            }
            Some("userId") => {
                form_user_id = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    if let Some(claimed) = form_user_id.as_deref().map(str::trim) {
        if !claimed.is_empty() && claimed != auth.user_id {
            warn!(claimed, "userId field does not match token");
            return Err(AppError::Forbidden {
                message: "userId does not match the authenticated user".into(),
            });
        }
    }

    let image = match image {
        Some(img) if !img.body.is_empty() => img,
        Some(_) => return Err(AppError::bad_request("image is empty")),
        None => return Err(AppError::bad_request("image file is required")),
    };

    let url = upload_profile_image(&state, &auth.user_id, image).await?;
    Ok(Json(UploadResponse {
        success: true,
        message: "Profile image uploaded successfully".into(),
        profile_image: url,
    }))
}
