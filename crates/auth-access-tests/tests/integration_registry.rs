// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Registry Integration Tests
//!
//! Runs in its own process; the single test walks the process-wide handle
//! through its whole lifecycle so ordering is deterministic.

use std::sync::Arc;

use auth_access_api::{AuthLayer, GraphQlAuth};
use auth_access_core::{registry, AuthError};
use auth_access_tests::prelude::*;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

#[tokio::test]
async fn test_registry_lifecycle() {
    init_test_logging();

    // Before initialization: adapters report a server-side fault.
    assert!(!registry::is_initialized());
    assert!(matches!(
        registry::auth_access(),
        Err(AuthError::Configuration { .. })
    ));

    let router = protected_routes(AuthLayer::global()).with_state(Arc::new(
        auth_access_core::AuthAccess::init(ConfigFixtures::rsa_verify_only()).unwrap(),
    ));

    let (status, _) = send(router.clone(), "/bookings", Some("Bearer a.b.c")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // A missing credential is still a client error.
    let (status, _) = send(router.clone(), "/bookings", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Initialize once.
    let installed = registry::init_auth(ConfigFixtures::rsa()).unwrap();
    assert!(registry::is_initialized());
    assert!(Arc::ptr_eq(&installed, &registry::auth_access().unwrap()));

    let token = installed
        .token_manager
        .issue_token(PayloadFixtures::partner_basic(), &Default::default())
        .unwrap();

    let (status, body) = send(router.clone(), "/bookings", Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "partner-123");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    let context = GraphQlAuth::global().context_from_headers(&headers).unwrap();
    assert!(context.is_authenticated());

    // Second initialization fails and leaves the first handle in place.
    let err = registry::init_auth(ConfigFixtures::hmac()).unwrap_err();
    assert!(matches!(err, AuthError::Configuration { .. }));
    assert!(Arc::ptr_eq(&installed, &registry::auth_access().unwrap()));
}
