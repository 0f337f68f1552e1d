use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys};
use crate::{error::AppError, state::AppState};

/// Authenticated caller, taken from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// `Authorization: Bearer <token>`, scheme matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization header"))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AppError::unauthorized("Invalid Authorization header"));
    }
    Ok(token)
}

fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers)?;
    keys.verify(token).map(AuthUser::from).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::unauthorized("Invalid or expired token")
    })
}

/// Rejects the request with 401 unless it carries a valid bearer token.
/// The caller is stored in request extensions for [`AuthUser`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(req.headers(), &state.jwt)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        authenticate(&parts.headers, &JwtKeys::from_ref(state))
    }
}
