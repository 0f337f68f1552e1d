use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    users::{
        dto::NewUser,
        validation::{required, required_email, required_raw, Validate},
    },
};

/// Request body for `POST /signup`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct Signup {
    pub user: NewUser,
    pub password: String,
}

impl Validate for SignupRequest {
    type Valid = Signup;

    fn validate(self) -> Result<Signup, AppError> {
        Ok(Signup {
            user: NewUser {
                user_id: required("userId", self.user_id)?,
                name: required("name", self.name)?,
                email: required_email("email", self.email)?,
            },
            password: required_raw("password", self.password)?,
        })
    }
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: Option<String>,
    pub password: Option<String>,
}

pub struct Login {
    pub user_id: String,
    pub password: String,
}

impl Validate for LoginRequest {
    type Valid = Login;

    fn validate(self) -> Result<Login, AppError> {
        Ok(Login {
            user_id: required("userId", self.user_id)?,
            password: required_raw("password", self.password)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_requires_password() {
        let raw: SignupRequest = serde_json::from_str(
            r#"{"userId":"u1","name":"Ada","email":"ada@example.com"}"#,
        )
        .unwrap();
        match raw.validate() {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "password"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("signup without password accepted"),
        }
    }

    #[test]
    fn login_ignores_unknown_fields() {
        let raw: LoginRequest =
            serde_json::from_str(r#"{"userId":"u1","password":"pw","remember":true}"#).unwrap();
        let login = raw.validate().unwrap();
        assert_eq!(login.user_id, "u1");
        assert_eq!(login.password, "pw");
    }
}
