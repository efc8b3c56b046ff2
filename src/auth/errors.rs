use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::repo_types::StoreError;

/// Request-level failures of the register and login flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email and password are required")]
    InvalidRequest,
    // Same message for unknown email and wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("registration failed")]
    RegistrationFailed(#[source] StoreError),
    #[error("user lookup failed")]
    LookupFailed(#[source] StoreError),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidRequest => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::RegistrationFailed(_)
            | AuthError::LookupFailed(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
