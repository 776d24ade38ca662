//! Per-request identity context

use crate::{auth::jwt::Claims, error::AppError};
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;

/// Identity attached to a request by the authentication gate
///
/// Each slot is independent; `None` means the slot was never attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    user_id: Option<i64>,
    email: Option<String>,
    role_id: Option<i64>,
}

impl AuthContext {
    /// Build a context carrying every identity field from validated claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self::default()
            .with_user_id(claims.user_id)
            .with_email(&claims.email)
            .with_optional_role_id(claims.role_id)
    }

    pub fn with_user_id(&self, user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..self.clone()
        }
    }

    pub fn with_email(&self, email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..self.clone()
        }
    }

    pub fn with_role_id(&self, role_id: i64) -> Self {
        self.with_optional_role_id(Some(role_id))
    }

    fn with_optional_role_id(&self, role_id: Option<i64>) -> Self {
        Self {
            role_id,
            ..self.clone()
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role_id(&self) -> Option<i64> {
        self.role_id
    }

    /// User ID, or 401 when the gate did not attach one
    pub fn require_user_id(&self) -> Result<i64, AppError> {
        self.user_id
            .ok_or_else(|| AppError::unauthorized("missing user identity"))
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("missing authorization header"))
    }
}
