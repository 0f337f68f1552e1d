use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use super::{
    dto::{CreateUserRequest, SuccessMessage, UserListResponse, UserResponse},
    services,
    validation::ValidJson,
};
use crate::{error::AppResult, state::AppState};

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UserListResponse>> {
    let users = services::list_users(&state).await?;
    Ok(Json(UserListResponse {
        success: true,
        users,
    }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = services::find_user(&state, &user_id).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

#[instrument(skip_all, fields(user_id = %payload.user_id))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<SuccessMessage>)> {
    services::create_user(&state, payload, None).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessMessage {
            success: true,
            message: "User created successfully".into(),
        }),
    ))
}
