//! Bearer-token authentication.
//!
//! Every conversion request must carry `Authorization: Bearer <token>`
//! matching the single process-wide shared secret, injected at startup.
//! The comparison is byte-for-byte in constant time.
//!
//! Missing or malformed headers are a 401; a well-formed header with the
//! wrong token is a 403. Authentication runs before any multipart parsing
//! or conversion work.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::handlers::ErrorResponse;

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No Authorization header on the request
    MissingHeader,

    /// Authorization header present but not `Bearer <token>`
    MalformedHeader,

    /// Presented token does not match the shared secret
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingHeader | AuthError::MalformedHeader => {
                write!(f, "Missing or invalid Authorization header")
            }
            AuthError::InvalidToken => write!(f, "Invalid token"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MissingHeader | AuthError::MalformedHeader => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::FORBIDDEN,
        };

        // A wrong token could indicate probing, log at warn; absent
        // headers are routine.
        match &self {
            AuthError::InvalidToken => {
                warn!(status = status.as_u16(), "Authentication failed: {}", self);
            }
            _ => {
                debug!(status = status.as_u16(), "Authentication failed: {}", self);
            }
        }

        let body = ErrorResponse::new(self.to_string());
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Bearer Authentication
// =============================================================================

/// Shared-secret bearer-token authenticator.
#[derive(Clone)]
pub struct BearerAuth {
    token: Vec<u8>,
}

impl BearerAuth {
    /// Create an authenticator holding the shared secret.
    pub fn new(token: impl AsRef<[u8]>) -> Self {
        Self {
            token: token.as_ref().to_vec(),
        }
    }

    /// Verify an Authorization header value.
    ///
    /// `None` and values without the `Bearer ` prefix are rejected as
    /// 401-class errors; a mismatched token is a 403-class error.
    pub fn verify_header(&self, header: Option<&str>) -> Result<(), AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let presented = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedHeader)?;

        if presented.as_bytes().ct_eq(&self.token).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware enforcing bearer-token authentication.
///
/// Rejects before the request body is touched, so unauthenticated calls
/// never reach multipart parsing or the conversion pipeline.
pub async fn auth_middleware(
    State(auth): State<BearerAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    auth.verify_header(header)?;

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
