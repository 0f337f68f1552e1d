use serde::{Deserialize, Serialize};

use super::{
    repo_types::User,
    validation::{required, required_email, Validate},
};
use crate::error::AppError;

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl Validate for CreateUserRequest {
    type Valid = NewUser;

    fn validate(self) -> Result<NewUser, AppError> {
        Ok(NewUser {
            user_id: required("userId", self.user_id)?,
            name: required("name", self.name)?,
            email: required_email("email", self.email)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: String,
}
