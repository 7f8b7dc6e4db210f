// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Scope and Role Integration Tests
//!
//! Decisions over verified credentials, through both the scope manager and
//! the shared authorizer.

use auth_access_core::{
    config::parse_lifetime, decision::RejectionReason, IssueOptions, RejectionKind,
    Requirement, ScopeManager, TokenPayload, ValidateOptions,
};
use auth_access_tests::prelude::*;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

// =============================================================================
// ScopeManager over verified claims
// =============================================================================

#[test]
fn test_scopes_partner_scenario() {
    let app = TestApp::rsa();
    let token = app.issue(PayloadFixtures::partner_basic());
    let claims = app
        .access
        .token_manager
        .validate_token(&token, &ValidateOptions::new())
        .unwrap();

    let scopes = ScopeManager::new();
    assert!(scopes.check_scopes(Some(&claims), ["read:analytics"]));
    assert!(scopes.check_scopes(Some(&claims), ["write:services", "read:bookings"]));
    assert!(!scopes.check_scopes(Some(&claims), ["write:analytics"]));
    assert!(scopes.has_role(&claims.role, "client"));
    assert!(!scopes.has_role(&claims.role, "partner:premium"));
}

#[test]
fn test_scopes_premium_partner_with_day_long_token() {
    let app = TestApp::rsa();
    let token = app.issue_with(
        TokenPayload::new("partner-123", "partner:premium").with_scope("read:analytics"),
        &IssueOptions::new().with_expires_in(parse_lifetime("24h").unwrap()),
    );
    let claims = app
        .access
        .token_manager
        .validate_token(&token, &ValidateOptions::new())
        .unwrap();
    assert_eq!(claims.role, "partner:premium");

    let scopes = ScopeManager::new();
    assert!(scopes.check_scopes(Some(&claims), ["read:analytics", "write:services"]));
    assert!(!scopes.check_scopes(Some(&claims), ["admin:billing"]));
}

#[test]
fn test_scopes_admin_satisfies_everything() {
    let app = TestApp::hmac();
    let token = app.issue(PayloadFixtures::admin());
    let claims = app
        .access
        .token_manager
        .validate_token(&token, &ValidateOptions::new())
        .unwrap();

    let scopes = ScopeManager::new();
    assert!(scopes.check_scopes(Some(&claims), ["admin:billing", "write:anything"]));
    assert!(scopes.has_role(&claims.role, "partner:premium"));
}

#[test]
fn test_scopes_missing_credential() {
    let scopes = ScopeManager::new();
    assert!(!scopes.check_scopes(None, ["read:services"]));
    assert_eq!(
        scopes.missing_scopes(None, ["read:services"]),
        vec!["read:services".to_string()]
    );
}

#[test]
fn test_scopes_hierarchy_is_cumulative() {
    let scopes = ScopeManager::new();
    let client = scopes.get_default_scopes("client");
    let basic = scopes.get_default_scopes("partner:basic");
    let premium = scopes.get_default_scopes("partner:premium");

    assert!(client.iter().all(|s| basic.contains(s)));
    assert!(basic.iter().all(|s| premium.contains(s)));
    assert!(premium.len() > basic.len() && basic.len() > client.len());
    assert_eq!(scopes.get_default_scopes("admin"), ["*".to_string()]);
}

// =============================================================================
// Authorizer
// =============================================================================

#[test]
fn test_authorize_scope_before_role() {
    let app = TestApp::rsa();
    let token = app.issue(PayloadFixtures::client());
    let authorizer = app.access.authorizer();

    let requirement = Requirement::scopes(["read:analytics"]).and_role("admin");
    let rejection = authorizer.authorize(Some(&token), &requirement).unwrap_err();
    assert_eq!(rejection.kind, RejectionKind::Forbidden);
    assert_eq!(rejection.reason, RejectionReason::InsufficientScope);

    let rejection = authorizer
        .authorize(Some(&token), &Requirement::role("admin"))
        .unwrap_err();
    assert_eq!(rejection.reason, RejectionReason::InsufficientRole);
}

#[test]
fn test_authorize_missing_and_invalid_credentials() {
    let app = TestApp::rsa();
    let authorizer = app.access.authorizer();

    let rejection = authorizer.authorize(None, &Requirement::none()).unwrap_err();
    assert_eq!(rejection.reason, RejectionReason::MissingCredential);

    let rejection = authorizer
        .authorize(Some("   "), &Requirement::none())
        .unwrap_err();
    assert_eq!(rejection.reason, RejectionReason::MissingCredential);

    let rejection = authorizer
        .authorize(Some("a.b.c"), &Requirement::none())
        .unwrap_err();
    assert_eq!(rejection.kind, RejectionKind::Unauthorized);
    assert_eq!(rejection.message(), "Invalid or expired token");
}

#[test]
fn test_authorize_rejects_signed_token_without_identity() {
    let app = TestApp::hmac();
    let exp = unix_now() + 3600;
    let forged = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "iss": "localpro", "exp": exp }),
        &EncodingKey::from_secret(KeyFixtures::HMAC_SECRET.as_bytes()),
    )
    .unwrap();

    let rejection = app
        .access
        .authorizer()
        .authorize(Some(&forged), &Requirement::none())
        .unwrap_err();
    assert_eq!(rejection.kind, RejectionKind::Unauthorized);
    assert_eq!(rejection.reason, RejectionReason::InvalidCredential);
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

#[test]
fn test_authorize_expired_reads_like_invalid() {
    let app = TestApp::rsa();
    let token = app.issue_with(
        PayloadFixtures::client(),
        &IssueOptions::new().with_expires_in(std::time::Duration::ZERO),
    );

    let rejection = app
        .access
        .authorizer()
        .authorize(Some(&token), &Requirement::none())
        .unwrap_err();
    assert_eq!(rejection.reason, RejectionReason::ExpiredCredential);
    assert_eq!(rejection.message(), "Invalid or expired token");
}

#[test]
fn test_authorize_identity_helpers() {
    let app = TestApp::rsa();
    let token = app.issue(PayloadFixtures::partner_premium());

    let identity = app
        .access
        .authorizer()
        .authorize(Some(&token), &Requirement::scopes(["write:analytics"]))
        .unwrap();

    assert_eq!(identity.partner_id, "partner-456");
    assert!(identity.has_scopes(["read:partner"]));
    assert!(identity.has_role("partner:basic"));
    assert!(identity.require_role("admin").is_err());
    assert!(identity.require_scopes(["admin:billing"]).is_err());
}
