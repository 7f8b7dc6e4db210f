// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error taxonomy for token issuance, verification, and authorization.
//!
//! The managers never catch their own errors. Transport adapters classify an
//! [`AuthError`] into a rejection and format the response.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// CredentialFailure
// =============================================================================

/// Why a credential failed verification.
///
/// Only the adapter layer and server-side logs see this value. Client-facing
/// messages treat every failure alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialFailure {
    /// The `exp` claim has elapsed.
    Expired,
    /// The `nbf` claim lies in the future.
    NotYetValid,
    /// The signature does not match the verification key.
    InvalidSignature,
    /// The `iss` claim does not name the configured issuer.
    InvalidIssuer,
    /// The `aud` claim does not contain the expected audience.
    InvalidAudience,
    /// The header names an algorithm outside the allow-list.
    InvalidAlgorithm,
    /// The credential is not a well-formed signed token.
    Malformed,
}

impl CredentialFailure {
    /// Returns a stable label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialFailure::Expired => "expired",
            CredentialFailure::NotYetValid => "not_yet_valid",
            CredentialFailure::InvalidSignature => "invalid_signature",
            CredentialFailure::InvalidIssuer => "invalid_issuer",
            CredentialFailure::InvalidAudience => "invalid_audience",
            CredentialFailure::InvalidAlgorithm => "invalid_algorithm",
            CredentialFailure::Malformed => "malformed",
        }
    }
}

impl fmt::Display for CredentialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ErrorKind> for CredentialFailure {
    fn from(kind: &ErrorKind) -> Self {
        match kind {
            ErrorKind::ExpiredSignature => CredentialFailure::Expired,
            ErrorKind::ImmatureSignature => CredentialFailure::NotYetValid,
            ErrorKind::InvalidSignature => CredentialFailure::InvalidSignature,
            ErrorKind::InvalidIssuer => CredentialFailure::InvalidIssuer,
            ErrorKind::InvalidAudience => CredentialFailure::InvalidAudience,
            ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
                CredentialFailure::InvalidAlgorithm
            }
            ErrorKind::MissingRequiredClaim(claim) => match claim.as_str() {
                "aud" => CredentialFailure::InvalidAudience,
                "iss" => CredentialFailure::InvalidIssuer,
                _ => CredentialFailure::Malformed,
            },
            _ => CredentialFailure::Malformed,
        }
    }
}

// =============================================================================
// AuthError
// =============================================================================

/// Errors raised by the token and scope managers.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required payload field or argument is absent.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Key material or initialization is missing for the requested operation.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message (for logging, not user-facing).
        message: String,
    },

    /// The credential failed cryptographic or temporal verification.
    #[error("Invalid credential: {failure}")]
    InvalidCredential {
        /// Verification failure cause.
        failure: CredentialFailure,
    },

    /// The credential lacks one or more required scopes.
    #[error("Insufficient scope: requires {}", required.join(" "))]
    InsufficientScope {
        /// Scopes that were required but not granted.
        required: Vec<String>,
    },

    /// The credential's role ranks below the required role.
    #[error("Insufficient role: requires {required}")]
    InsufficientRole {
        /// The role that was required.
        required: String,
    },

    /// A caller-supplied argument is malformed.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message.
        message: String,
    },

    /// Unexpected failure inside a cryptographic primitive.
    #[error("Internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },
}

impl AuthError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an invalid credential error.
    pub fn invalid_credential(failure: CredentialFailure) -> Self {
        Self::InvalidCredential { failure }
    }

    /// Creates an insufficient scope error.
    pub fn insufficient_scope(required: Vec<String>) -> Self {
        Self::InsufficientScope { required }
    }

    /// Creates an insufficient role error.
    pub fn insufficient_role(required: impl Into<String>) -> Self {
        Self::InsufficientRole {
            required: required.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
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

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingField { .. } => "MISSING_FIELD",
            AuthError::Configuration { .. } => "CONFIGURATION_ERROR",
            AuthError::InvalidCredential { .. } => "INVALID_CREDENTIAL",
            AuthError::InsufficientScope { .. } => "INSUFFICIENT_SCOPE",
            AuthError::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            AuthError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            AuthError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the verification failure, if this is a credential error.
    pub fn credential_failure(&self) -> Option<CredentialFailure> {
        match self {
            AuthError::InvalidCredential { failure } => Some(*failure),
            _ => None,
        }
    }

    /// Returns `true` if the credential was rejected only because it expired.
    pub fn is_expired(&self) -> bool {
        self.credential_failure() == Some(CredentialFailure::Expired)
    }

    /// Returns `true` if this error indicates a deployment problem rather
    /// than a client mistake.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AuthError::Configuration { .. } | AuthError::Internal { .. }
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidKeyFormat
            | ErrorKind::RsaFailedSigning => AuthError::internal(err.to_string()),
            ErrorKind::Json(_) | ErrorKind::Utf8(_) | ErrorKind::Base64(_) => {
                AuthError::invalid_credential(CredentialFailure::Malformed)
            }
            kind => AuthError::invalid_credential(CredentialFailure::from(kind)),
        }
    }
}

impl From<ConfigError> for AuthError {
    fn from(err: ConfigError) -> Self {
        AuthError::configuration(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
