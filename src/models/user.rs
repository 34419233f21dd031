use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Body for POST /users
#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body for POST /auth
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub email: String,
    pub password: String,
}

/// Response from POST /auth
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Id of the authenticated user
    pub id: String,
}
