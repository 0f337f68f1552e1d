use serde::{Deserialize, Serialize};

/// JWT payload issued on login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // userId
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}
