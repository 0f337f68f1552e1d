use tracing::{info, warn};

use super::{
    dto::{Login, Signup},
    password::{hash_password, verify_password},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{repo_types::User, services::create_user},
};

/// Hashes the password and stores the full record (overwrites an existing
/// record with the same `userId`).
pub async fn signup(st: &AppState, req: Signup) -> AppResult<User> {
    let password = req.password;
    // argon2 is CPU bound; keep it off the async workers.
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal { source: e.into() })??;
    create_user(st, req.user, Some(hash)).await
}

/// Returns a signed token for valid credentials.
pub async fn login(st: &AppState, req: Login) -> AppResult<String> {
    let user = st
        .users
        .get(&req.user_id)
        .await
        .map_err(|e| AppError::database("get_item", e))?
        .ok_or_else(|| {
            warn!(user_id = %req.user_id, "login for unknown user");
            AppError::unauthorized("User not found")
        })?;

    // Records created through POST /users have no password.
    let Some(stored) = user.password_hash.clone() else {
        warn!(user_id = %user.user_id, "login for user without password");
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    let password = req.password;
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal { source: e.into() })??;
    if !ok {
        warn!(user_id = %user.user_id, "login invalid password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = st.jwt.sign(&user.user_id, user.email.as_deref())?;
    info!(user_id = %user.user_id, "user logged in");
    Ok(token)
}
