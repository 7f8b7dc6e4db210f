// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! An axum router protected by both the layer and the extractors, driven
//! in-process with `tower::ServiceExt::oneshot`.
//!
//! | Route | Guard |
//! |-------|-------|
//! | `/health` | none |
//! | `/bookings` | layer, `read:bookings` |
//! | `/analytics` | layer, `read:analytics` |
//! | `/admin/stats` | layer, role `admin` |
//! | `/me` | `Authenticated` |
//! | `/partner` | `Authorized<RequirePartnerBasic>` |
//! | `/maybe` | `MaybeAuthenticated` |

use std::sync::Arc;

use auth_access_api::{
    AuthLayer, Authenticated, Authorized, MaybeAuthenticated, RequirePartnerBasic,
};
use auth_access_core::{AuthAccess, AuthConfig, AuthIdentity, IssueOptions, TokenPayload};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get,
    Extension, Router,
};
use serde_json::Value;
use tower::ServiceExt;

use super::fixtures::ConfigFixtures;

// =============================================================================
// TestApp
// =============================================================================

/// A configured handle plus the router built on it.
#[derive(Clone)]
pub struct TestApp {
    /// The handle shared by every route.
    pub access: Arc<AuthAccess>,
}

impl TestApp {
    /// Creates an app over a configuration.
    pub fn new(config: AuthConfig) -> Self {
        Self {
            access: ConfigFixtures::access(config),
        }
    }

    /// RS256 app.
    pub fn rsa() -> Self {
        Self::new(ConfigFixtures::rsa())
    }

    /// HS256 app.
    pub fn hmac() -> Self {
        Self::new(ConfigFixtures::hmac())
    }

    /// Issues a credential with default options.
    pub fn issue(&self, payload: TokenPayload) -> String {
        self.issue_with(payload, &IssueOptions::new())
    }

    /// Issues a credential.
    pub fn issue_with(&self, payload: TokenPayload, options: &IssueOptions) -> String {
        self.access
            .token_manager
            .issue_token(payload, options)
            .expect("fixture payload must be issuable")
    }

    /// Builds the routed application.
    pub fn router(&self) -> Router {
        protected_routes(AuthLayer::new(self.access.clone()))
            .merge(extractor_routes())
            .with_state(self.access.clone())
    }

    /// Sends `GET uri` with an optional bearer credential.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, String) {
        let authorization = token.map(|t| format!("Bearer {t}"));
        self.get_raw(uri, authorization.as_deref()).await
    }

    /// Sends `GET uri` with an optional raw `Authorization` value.
    pub async fn get_raw(&self, uri: &str, authorization: Option<&str>) -> (StatusCode, String) {
        send(self.router(), uri, authorization).await
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Routes guarded by [`AuthLayer`] clones built from `layer`.
pub fn protected_routes(layer: AuthLayer) -> Router<Arc<AuthAccess>> {
    let bookings = Router::new()
        .route("/bookings", get(partner_id))
        .route_layer(layer.clone().require_scopes(["read:bookings"]));

    let analytics = Router::new()
        .route("/analytics", get(partner_id))
        .route_layer(layer.clone().require_scopes(["read:analytics"]));

    let admin = Router::new()
        .route("/admin/stats", get(partner_id))
        .route_layer(layer.require_role("admin"));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(bookings)
        .merge(analytics)
        .merge(admin)
}

fn extractor_routes() -> Router<Arc<AuthAccess>> {
    Router::new()
        .route(
            "/me",
            get(|auth: Authenticated| async move { auth.partner_id.clone() }),
        )
        .route(
            "/partner",
            get(|auth: Authorized<RequirePartnerBasic>| async move { auth.into_inner().role }),
        )
        .route(
            "/maybe",
            get(|MaybeAuthenticated(identity): MaybeAuthenticated| async move {
                identity
                    .map(|i| i.partner_id)
                    .unwrap_or_else(|| "anonymous".to_string())
            }),
        )
}

async fn partner_id(Extension(identity): Extension<AuthIdentity>) -> String {
    identity.partner_id
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Sends `GET uri` to a router and returns status and body text.
pub async fn send(router: Router, uri: &str, authorization: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let response = router
        .oneshot(builder.body(Body::empty()).expect("request must build"))
        .await
        .expect("router is infallible");

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must be readable");
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// Parses an error body.
pub fn error_body(body: &str) -> Value {
    serde_json::from_str(body).expect("error body must be JSON")
}
