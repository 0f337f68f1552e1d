//! Request body validation.
//!
//! Request DTOs deserialize with every field optional, then [`Validate`]
//! turns them into a typed payload or an [`AppError::Validation`]. Handlers
//! take [`ValidJson<T>`] so nothing downstream runs on a bad payload.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, AppError>;
}

/// JSON body of type `T` that has passed [`Validate`]; holds `T::Valid`.
pub struct ValidJson<T: Validate>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Send,
    T::Valid: Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state).await?;
        raw.validate().map(ValidJson)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Present and not blank. The value is returned as sent.
pub fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(AppError::validation(field, "must not be blank")),
        None => Err(AppError::validation(field, "is required")),
    }
}

/// Present and non-empty, kept verbatim. For secrets, where whitespace counts.
pub fn required_raw(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(AppError::validation(field, "must not be empty")),
        None => Err(AppError::validation(field, "is required")),
    }
}

pub fn required_email(field: &str, value: Option<String>) -> Result<String, AppError> {
    let email = required(field, value)?;
    if !is_valid_email(&email) {
        return Err(AppError::validation(field, "is not a valid email address"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
    }

    #[test]
    fn required_keeps_value_and_rejects_blank() {
        assert_eq!(required("name", Some("  Ada ".into())).unwrap(), "  Ada ");
        assert!(matches!(
            required("name", Some("   ".into())),
            Err(AppError::Validation { field, .. }) if field == "name"
        ));
        assert!(matches!(
            required("name", None),
            Err(AppError::Validation { reason, .. }) if reason == "is required"
        ));
    }

    #[test]
    fn raw_keeps_whitespace() {
        assert_eq!(required_raw("password", Some(" pw ".into())).unwrap(), " pw ");
        assert!(required_raw("password", Some(String::new())).is_err());
    }

    #[test]
    fn email_keeps_case() {
        assert_eq!(
            required_email("email", Some("Ada@Example.COM".into())).unwrap(),
            "Ada@Example.COM"
        );
        assert!(required_email("email", Some(" ada@example.com ".into())).is_err());
        assert!(required_email("email", Some("nope".into())).is_err());
    }
}
