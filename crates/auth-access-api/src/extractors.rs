// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Router-state extractors.
//!
//! These resolve the [`AuthAccess`] handle from router state through
//! [`FromRef`], so routes can opt into authentication per handler instead of
//! per layer. An identity already attached by
//! [`AuthLayer`](crate::middleware::AuthLayer) is reused.

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use auth_access_core::{
    extract_bearer, AuthAccess, AuthIdentity, Rejection, Requirement, Role,
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::error::ApiError;

// =============================================================================
// RouteRequirement
// =============================================================================

/// A compile-time requirement for [`Authorized`].
///
/// # Example
///
/// ```rust,ignore
/// struct AnalyticsReader;
///
/// impl RouteRequirement for AnalyticsReader {
///     fn requirement() -> Requirement {
///         Requirement::scopes(["read:analytics"])
///     }
/// }
///
/// async fn handler(auth: Authorized<AnalyticsReader>) -> String {
///     auth.partner_id.clone()
/// }
/// ```
pub trait RouteRequirement: Send + Sync + 'static {
    /// Returns the requirement to enforce.
    fn requirement() -> Requirement;
}

macro_rules! role_requirement {
    ($(#[$doc:meta] $name:ident => $role:expr;)*) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl RouteRequirement for $name {
                fn requirement() -> Requirement {
                    Requirement::role($role.as_str())
                }
            }
        )*
    };
}

role_requirement! {
    /// Requires at least the `client` role.
    RequireClient => Role::Client;
    /// Requires at least the `partner:basic` role.
    RequirePartnerBasic => Role::PartnerBasic;
    /// Requires at least the `partner:premium` role.
    RequirePartnerPremium => Role::PartnerPremium;
    /// Requires the `admin` role.
    RequireAdmin => Role::Admin;
}

// =============================================================================
// Authenticated
// =============================================================================

/// Extractor for authenticated requests. Rejects with 401 when no valid
/// bearer credential is present.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthIdentity);

impl Deref for Authenticated {
    type Target = AuthIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    Arc<AuthAccess>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, state, &Requirement::none())
            .map(Authenticated)
            .map_err(ApiError::from)
    }
}

// =============================================================================
// Authorized
// =============================================================================

/// Extractor enforcing the requirement `R`. Rejects with 401 or 403.
pub struct Authorized<R: RouteRequirement> {
    identity: AuthIdentity,
    _requirement: PhantomData<fn() -> R>,
}

impl<R: RouteRequirement> Authorized<R> {
    /// Returns the verified identity.
    pub fn into_inner(self) -> AuthIdentity {
        self.identity
    }
}

impl<R: RouteRequirement> Deref for Authorized<R> {
    type Target = AuthIdentity;

    fn deref(&self) -> &Self::Target {
        &self.identity
    }
}

impl<R: RouteRequirement> std::fmt::Debug for Authorized<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorized")
            .field("identity", &self.identity)
            .finish()
    }
}

impl<S, R> FromRequestParts<S> for Authorized<R>
where
    Arc<AuthAccess>: FromRef<S>,
    S: Send + Sync,
    R: RouteRequirement,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = authorize_parts(parts, state, &R::requirement()).map_err(ApiError::from)?;
        Ok(Self {
            identity,
            _requirement: PhantomData,
        })
    }
}

// =============================================================================
// MaybeAuthenticated
// =============================================================================

/// Extractor for optionally authenticated requests.
///
/// Yields `None` when no Authorization header is sent. A header that is
/// present but invalid is still rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<AuthIdentity>);

impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    Arc<AuthAccess>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if parts.extensions.get::<AuthIdentity>().is_none()
            && !parts.headers.contains_key(header::AUTHORIZATION)
        {
            return Ok(MaybeAuthenticated(None));
        }

        authorize_parts(parts, state, &Requirement::none())
            .map(|identity| MaybeAuthenticated(Some(identity)))
            .map_err(ApiError::from)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn authorize_parts<S>(
    parts: &Parts,
    state: &S,
    requirement: &Requirement,
) -> Result<AuthIdentity, Rejection>
where
    Arc<AuthAccess>: FromRef<S>,
{
    let access = Arc::<AuthAccess>::from_ref(state);

    // Reuse an identity verified by an outer AuthLayer.
    if let Some(identity) = parts.extensions.get::<AuthIdentity>() {
        if !requirement.scopes.is_empty() {
            identity.require_scopes(&requirement.scopes)?;
        }
        if let Some(role) = &requirement.role {
            identity.require_role(role)?;
        }
        return Ok(identity.clone());
    }

    let token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer)
        .ok_or_else(Rejection::missing_credential)?;

    access.authorizer().authorize(Some(token), requirement)
}

// =============================================================================
// Tests
// =============================================================================
