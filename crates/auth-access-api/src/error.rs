// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP rejection type and JSON error bodies.
//!
//! Every rejection renders as
//! `{ "success": false, "error": <category>, "message": <text> }`.

use auth_access_core::{AuthError, Rejection, RejectionKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential absent, malformed, invalid, or expired (401).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Credential verified but insufficient (403).
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Error message.
        message: String,
    },

    /// The auth subsystem is not configured (500).
    #[error("Server misconfigured: {message}")]
    ServerMisconfigured {
        /// Error message.
        message: String,
    },

    /// Bad request (400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (500).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },
}

impl ApiError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a server misconfigured error.
    pub fn server_misconfigured(message: impl Into<String>) -> Self {
        Self::ServerMisconfigured {
            message: message.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ServerMisconfigured { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the category written to the `error` field.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "Unauthorized",
            ApiError::Forbidden { .. } => "Forbidden",
            ApiError::ServerMisconfigured { .. } => "ServerMisconfigured",
            ApiError::BadRequest { .. } => "BadRequest",
            ApiError::Internal { .. } => "InternalError",
        }
    }

    /// Returns a message that is safe to show to clients.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Forbidden { message }
            | ApiError::ServerMisconfigured { message }
            | ApiError::BadRequest { message } => message.clone(),
            ApiError::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ApiError::ServerMisconfigured { .. } | ApiError::Internal { .. }
        )
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.category();

        if self.is_server_error() {
            tracing::error!(
                error = %self,
                category = category,
                status = %status,
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                category = category,
                status = %status,
                "Client error occurred"
            );
        }

        let body = ErrorResponseBody {
            success: false,
            error: category.to_string(),
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Error Response Body
// =============================================================================

/// Error response body structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    /// Always `false`.
    pub success: bool,
    /// Error category.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

// =============================================================================
// From Implementations
// =============================================================================

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        let message = rejection.message();
        match rejection.kind {
            RejectionKind::Unauthorized => ApiError::unauthorized(message),
            RejectionKind::Forbidden => ApiError::forbidden(message),
            RejectionKind::ServerMisconfigured => ApiError::server_misconfigured(message),
            RejectionKind::Internal => ApiError::internal(rejection.reason.code()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingField { field: "token" } => {
                Rejection::missing_credential().into()
            }
            AuthError::MissingField { .. } | AuthError::InvalidArgument { .. } => {
                ApiError::bad_request(err.to_string())
            }
            AuthError::Internal { message } => ApiError::internal(message),
            other => Rejection::from(&other).into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
