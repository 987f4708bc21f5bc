//! Authentication seam and wire types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use novashop_core::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl RegisterRequest {
    /// Self-registration always creates a customer account.
    pub fn customer(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: "CUSTOMER".to_string(),
        }
    }
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// The signed-in user, as kept under `user_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<&AuthResponse> for User {
    fn from(auth: &AuthResponse) -> Self {
        Self {
            name: auth.name.clone(),
            email: auth.email.clone(),
            role: auth.role.clone(),
        }
    }
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
}
