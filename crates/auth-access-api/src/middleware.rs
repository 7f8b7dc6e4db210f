// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer authentication middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use auth_access_core::{extract_bearer, AccessSource, Rejection, Requirement};
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::error::ApiError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer that authenticates and authorizes every request it wraps.
///
/// On success the [`AuthIdentity`](auth_access_core::AuthIdentity) is stored
/// in the request extensions.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/analytics", get(handler))
///     .layer(AuthLayer::new(access).require_scopes(["read:analytics"]));
/// ```
#[derive(Clone)]
pub struct AuthLayer {
    source: AccessSource,
    requirement: Arc<Requirement>,
}

impl AuthLayer {
    /// Creates a layer requiring authentication only.
    pub fn new(source: impl Into<AccessSource>) -> Self {
        Self {
            source: source.into(),
            requirement: Arc::new(Requirement::none()),
        }
    }

    /// Creates a layer that resolves the process-wide registry per request.
    pub fn global() -> Self {
        Self::new(AccessSource::Global)
    }

    /// Adds required scopes.
    pub fn require_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requirement = (*self.requirement).clone().and_scopes(scopes);
        self.requirement = Arc::new(requirement);
        self
    }

    /// Sets the minimum role.
    pub fn require_role(mut self, role: impl Into<String>) -> Self {
        let requirement = (*self.requirement).clone().and_role(role);
        self.requirement = Arc::new(requirement);
        self
    }

    /// Returns the configured requirement.
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            source: self.source.clone(),
            requirement: self.requirement.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware produced by [`AuthLayer`].
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    source: AccessSource,
    requirement: Arc<Requirement>,
}

impl<S> AuthMiddleware<S> {
    fn authorize(&self, req: &mut Request<Body>) -> Result<(), Rejection> {
        let token = bearer_token(req).ok_or_else(|| {
            tracing::debug!(path = %req.uri().path(), "No bearer credential provided");
            Rejection::missing_credential()
        })?;

        let access = self.source.resolve()?;
        let identity = access
            .authorizer()
            .authorize(Some(token), &self.requirement)?;

        req.extensions_mut().insert(identity);
        Ok(())
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let decision = self.authorize(&mut req);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match decision {
                Ok(()) => inner.call(req).await,
                Err(rejection) => {
                    tracing::debug!(
                        reason = rejection.reason.code(),
                        path = %req.uri().path(),
                        "Request rejected"
                    );
                    Ok(ApiError::from(rejection).into_response())
                }
            }
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the bearer token from the Authorization header.
pub(crate) fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer)
}

// =============================================================================
// Tests
// =============================================================================
