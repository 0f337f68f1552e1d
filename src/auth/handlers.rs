use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{LoginRequest, MessageResponse, SignupRequest, TokenResponse},
    extractors::AuthUser,
    services,
};
use crate::{
    error::AppResult,
    state::AppState,
    users::{dto::UserResponse, services::find_user, validation::ValidJson},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip_all, fields(user_id = %payload.user.user_id))]
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    services::signup(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip_all, fields(user_id = %payload.user_id))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = services::login(&state, payload).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, &auth.user_id).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}
