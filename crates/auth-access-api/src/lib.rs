// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # auth-access-api
//!
//! Transport adapters for auth-access.
//!
//! Each adapter extracts a bearer credential and formats the outcome; the
//! decision itself is [`auth_access_core::Authorizer::authorize`].
//!
//! - [`middleware::AuthLayer`] - tower layer for axum routers
//! - [`extractors`] - per-handler extractors reading the handle from router state
//! - [`graphql::GraphQlAuth`] - context resolution for queries and subscriptions

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod extractors;
pub mod graphql;
pub mod middleware;

pub use error::{ApiError, ApiResult, ErrorResponseBody};
pub use extractors::{
    Authenticated, Authorized, MaybeAuthenticated, RequireAdmin, RequireClient,
    RequirePartnerBasic, RequirePartnerPremium, RouteRequirement,
};
pub use graphql::{GraphQlAuth, GraphQlContext, GraphQlError};
pub use middleware::{AuthLayer, AuthMiddleware};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
