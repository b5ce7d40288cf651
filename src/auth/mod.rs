//! Bearer-token authentication against the Auth0 tenant.
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub mod verifier;

/// Authentication and authorization failures, each with a stable code.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,
    #[error("Authorization header must be bearer token.")]
    NotBearer,
    #[error("Authorization malformed.")]
    Malformed,
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    #[error("Unable to parse authentication token.")]
    Unparsable,
    #[error("Unable to find the appropriate key.")]
    UnknownKey,
    #[error("Signing keys are unavailable.")]
    KeysUnavailable,
    #[error("Permissions missing")]
    PermissionsMissing,
    #[error("Not permitted")]
    NotPermitted,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::NotBearer
            | AuthError::Malformed
            | AuthError::Unparsable
            | AuthError::UnknownKey => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::KeysUnavailable => "jwks_unavailable",
            AuthError::PermissionsMissing => "missing_permissions",
            AuthError::NotPermitted => "not_permitted",
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::HeaderMissing
            | AuthError::NotBearer
            | AuthError::Malformed
            | AuthError::TokenExpired
            | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
            AuthError::Unparsable | AuthError::UnknownKey => StatusCode::BAD_REQUEST,
            AuthError::KeysUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::PermissionsMissing | AuthError::NotPermitted => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(json!({
            "success": false,
            "error": status.as_u16(),
            "message": {
                "code": self.code(),
                "description": self.to_string(),
            },
        }))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::HeaderMissing)?;
    let value = value.to_str().map_err(|_| AuthError::NotBearer)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok((*token).to_string())
        }
        _ => Err(AuthError::NotBearer),
    }
}

/// Require `permission` in the token's `permissions` claim.
pub fn check_permission(permission: &str, granted: Option<&[String]>) -> Result<(), AuthError> {
    let granted = granted.ok_or(AuthError::PermissionsMissing)?;
    if granted.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::NotPermitted)
    }
}
