// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! GraphQL context resolution.
//!
//! Independent of any GraphQL server crate: the resolver reads HTTP headers
//! for queries and the connection-init payload for subscriptions, and returns
//! a [`GraphQlContext`] the schema's resolvers consult.

use std::fmt;

use auth_access_core::{
    extract_bearer, AccessSource, AuthIdentity, Rejection, RejectionKind, Requirement,
};
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Connection-init keys searched for a subscription credential, in order.
pub const CONNECTION_PARAM_KEYS: &[&str] = &["Authorization", "authorization", "authToken"];

// =============================================================================
// GraphQlAuth
// =============================================================================

/// Builds GraphQL contexts from request credentials.
#[derive(Debug, Clone)]
pub struct GraphQlAuth {
    source: AccessSource,
}

impl GraphQlAuth {
    /// Creates a resolver over an access source.
    pub fn new(source: impl Into<AccessSource>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Creates a resolver over the process-wide registry.
    pub fn global() -> Self {
        Self::new(AccessSource::Global)
    }

    /// Resolves the context for an HTTP query or mutation.
    ///
    /// No Authorization header yields an anonymous context; authorization is
    /// then left to the resolvers. A header that is present but malformed or
    /// invalid is rejected.
    pub fn context_from_headers(&self, headers: &HeaderMap) -> Result<GraphQlContext, GraphQlError> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(GraphQlContext::anonymous());
        };

        let token = value
            .to_str()
            .ok()
            .and_then(extract_bearer)
            .ok_or_else(Rejection::missing_credential)?;

        self.authenticate(token)
    }

    /// Resolves the context for a subscription connection.
    ///
    /// A credential is required. It is read from the first of
    /// [`CONNECTION_PARAM_KEYS`] holding a string, either as `Bearer <token>`
    /// or as the raw token.
    pub fn context_from_connection_params(
        &self,
        params: &Map<String, Value>,
    ) -> Result<GraphQlContext, GraphQlError> {
        let token = CONNECTION_PARAM_KEYS
            .iter()
            .find_map(|key| params.get(*key).and_then(Value::as_str))
            .and_then(|value| extract_bearer(value).or_else(|| raw_token(value)))
            .ok_or_else(|| {
                tracing::debug!("Subscription connection without credential");
                Rejection::missing_credential()
            })?;

        self.authenticate(token)
    }

    fn authenticate(&self, token: &str) -> Result<GraphQlContext, GraphQlError> {
        let access = self.source.resolve()?;
        let identity = access
            .authorizer()
            .authorize(Some(token), &Requirement::none())?;
        Ok(GraphQlContext::authenticated(identity))
    }
}

fn raw_token(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && !value.contains(' ')).then_some(value)
}

// =============================================================================
// GraphQlContext
// =============================================================================

/// Per-operation auth context handed to resolvers.
#[derive(Debug, Clone, Default)]
pub struct GraphQlContext {
    identity: Option<AuthIdentity>,
}

impl GraphQlContext {
    /// Creates a context with no caller.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Creates a context for a verified caller.
    pub fn authenticated(identity: AuthIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Returns the caller, if any.
    pub fn identity(&self) -> Option<&AuthIdentity> {
        self.identity.as_ref()
    }

    /// Returns `true` if a caller is attached.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Returns the caller or an `UNAUTHENTICATED` error.
    pub fn require_auth(&self) -> Result<&AuthIdentity, GraphQlError> {
        self.identity
            .as_ref()
            .ok_or_else(|| Rejection::missing_credential().into())
    }

    /// Returns the caller if it holds every listed scope.
    pub fn require_scopes<I, S>(&self, required: I) -> Result<&AuthIdentity, GraphQlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identity = self.require_auth()?;
        identity.require_scopes(required)?;
        Ok(identity)
    }

    /// Returns the caller if its role ranks at or above `required`.
    pub fn require_role(&self, required: &str) -> Result<&AuthIdentity, GraphQlError> {
        let identity = self.require_auth()?;
        identity.require_role(required)?;
        Ok(identity)
    }
}

// =============================================================================
// GraphQlError
// =============================================================================

/// A GraphQL error object carrying `extensions.code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Human-readable message.
    pub message: String,
    /// Error extensions.
    pub extensions: GraphQlErrorExtensions,
}

/// Extensions of a [`GraphQlError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlErrorExtensions {
    /// `UNAUTHENTICATED`, `FORBIDDEN`, or `INTERNAL_SERVER_ERROR`.
    pub code: String,
}

impl GraphQlError {
    /// Returns the extension code.
    pub fn code(&self) -> &str {
        &self.extensions.code
    }
}

impl From<Rejection> for GraphQlError {
    fn from(rejection: Rejection) -> Self {
        let code = match rejection.kind {
            RejectionKind::Unauthorized => "UNAUTHENTICATED",
            RejectionKind::Forbidden => "FORBIDDEN",
            RejectionKind::ServerMisconfigured | RejectionKind::Internal => {
                "INTERNAL_SERVER_ERROR"
            }
        };

        Self {
            message: rejection.message().to_string(),
            extensions: GraphQlErrorExtensions {
                code: code.to_string(),
            },
        }
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.extensions.code)
    }
}

impl std::error::Error for GraphQlError {}

// =============================================================================
// Tests
// =============================================================================
