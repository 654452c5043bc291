/// Error handling for the API server
///
/// A unified error type mapped to HTTP responses. Handlers return
/// `Result<T, ApiError>`; the error converts to a JSON body carrying a
/// `success` flag and a human-readable message, per the response contract.
///
/// # Taxonomy
///
/// | Variant              | Status | Meaning                                   |
/// |----------------------|--------|-------------------------------------------|
/// | `ValidationError`    | 400    | malformed or missing input                |
/// | `InvalidCredentials` | 400    | email/password pair did not verify        |
/// | `Unauthorized`       | 401    | no or invalid session proof               |
/// | `Forbidden`          | 403    | authenticated but insufficient role       |
/// | `NotFound`           | 404    | referenced entity absent                  |
/// | `Internal`           | 500    | unexpected persistence/infra failure      |
///
/// Internal details are logged and never serialized into a 500 body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use opsboard_shared::auth::identity::IdentityError;
use opsboard_shared::auth::oauth::OAuthError;
use opsboard_shared::auth::password::PasswordError;
use opsboard_shared::auth::policy::PolicyError;
use opsboard_shared::auth::session::SessionError;
use opsboard_shared::auth::token::TokenError;
use opsboard_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input (400)
    ValidationError(String),

    /// Credential verification failed (400)
    InvalidCredentials(String),

    /// No or invalid session proof (401)
    Unauthorized(String),

    /// Authenticated but insufficient role (403)
    Forbidden(String),

    /// Referenced entity absent (404)
    NotFound(String),

    /// Unexpected persistence/infrastructure failure (500)
    Internal(String),
}

/// Error response format
///
/// Every error body carries `success: false` and a human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false for errors
    pub success: bool,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation failed: {}", msg),
            ApiError::InvalidCredentials(msg) => write!(f, "Invalid credentials: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidCredentials(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                // Log internals but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
        });

        (status, body).into_response()
    }
}

/// Maps request-body validation failures to a 400 with a field-by-field message
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    let details: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string())
                )
            })
        })
        .collect();

    ApiError::ValidationError(details.join("; "))
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => {
                ApiError::ValidationError("Email already registered".to_string())
            }
            StoreError::Backend(msg) => ApiError::Internal(format!("Store error: {}", msg)),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => {
                ApiError::InvalidCredentials("Invalid email or password".to_string())
            }
            IdentityError::Password(e) => {
                ApiError::Internal(format!("Password operation failed: {}", e))
            }
            IdentityError::Store(e) => e.into(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unauthorized(msg) => {
                ApiError::Unauthorized(format!("Unauthorized - {}", msg))
            }
            SessionError::Store(e) => e.into(),
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Forbidden { .. } => ApiError::Forbidden(
                "Forbidden - You do not have the necessary permissions".to_string(),
            ),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            TokenError::CreateError(msg) => {
                ApiError::Internal(format!("Token issuance failed: {}", msg))
            }
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        ApiError::Unauthorized(format!("Authentication failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");

        let err = ApiError::ValidationError("Invalid role".to_string());
        assert_eq!(err.to_string(), "Validation failed: Invalid role");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::ValidationError("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::InvalidCredentials("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ApiError = StoreError::DuplicateEmail.into();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let err: ApiError = StoreError::Backend("connection refused".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_internal_error_body_is_generic() {
        let response = ApiError::Internal("password hash column corrupt".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The detail stays in the logs; the body only says "Server error"
    }
}
