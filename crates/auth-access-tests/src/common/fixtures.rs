// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Key pairs, configurations, and payloads shared by the suites.

use std::sync::Arc;

use auth_access_core::{Algorithm, AuthAccess, AuthConfig, TokenPayload};

// =============================================================================
// Key Fixtures
// =============================================================================

/// PEM key pairs from the core crate's test data.
pub struct KeyFixtures;

impl KeyFixtures {
    /// RSA private key.
    pub const RSA_PRIVATE: &'static str =
        include_str!("../../../auth-access-core/testdata/rsa_private.pem");

    /// RSA public key matching [`Self::RSA_PRIVATE`].
    pub const RSA_PUBLIC: &'static str =
        include_str!("../../../auth-access-core/testdata/rsa_public.pem");

    /// An unrelated RSA private key.
    pub const RSA_OTHER_PRIVATE: &'static str =
        include_str!("../../../auth-access-core/testdata/rsa_other_private.pem");

    /// EC P-256 private key.
    pub const EC_PRIVATE: &'static str =
        include_str!("../../../auth-access-core/testdata/ec_private.pem");

    /// EC P-256 public key.
    pub const EC_PUBLIC: &'static str =
        include_str!("../../../auth-access-core/testdata/ec_public.pem");

    /// HMAC secret.
    pub const HMAC_SECRET: &'static str = "integration-hmac-secret-0123456789abcdef";
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Ready-made configurations.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// RS256 with both keys.
    pub fn rsa() -> AuthConfig {
        AuthConfig::new()
            .with_private_key(KeyFixtures::RSA_PRIVATE)
            .with_public_key(KeyFixtures::RSA_PUBLIC)
    }

    /// RS256 verification only.
    pub fn rsa_verify_only() -> AuthConfig {
        AuthConfig::new().with_public_key(KeyFixtures::RSA_PUBLIC)
    }

    /// RS256 signing with the unrelated key, verifying with the usual public key.
    pub fn rsa_mismatched() -> AuthConfig {
        AuthConfig::new()
            .with_private_key(KeyFixtures::RSA_OTHER_PRIVATE)
            .with_public_key(KeyFixtures::RSA_PUBLIC)
    }

    /// ES256 with both keys.
    pub fn ec() -> AuthConfig {
        AuthConfig::new()
            .with_algorithm(Algorithm::ES256)
            .with_private_key(KeyFixtures::EC_PRIVATE)
            .with_public_key(KeyFixtures::EC_PUBLIC)
    }

    /// HS256 with a shared secret.
    pub fn hmac() -> AuthConfig {
        AuthConfig::new()
            .with_algorithm(Algorithm::HS256)
            .with_private_key(KeyFixtures::HMAC_SECRET)
    }

    /// Builds a shared handle from a configuration.
    pub fn access(config: AuthConfig) -> Arc<AuthAccess> {
        Arc::new(AuthAccess::init(config).expect("fixture configuration must be valid"))
    }
}

// =============================================================================
// Payload Fixtures
// =============================================================================

/// Representative identities.
pub struct PayloadFixtures;

impl PayloadFixtures {
    /// A basic partner with analytics read access granted explicitly.
    pub fn partner_basic() -> TokenPayload {
        TokenPayload::new("partner-123", "partner:basic").with_scope("read:analytics")
    }

    /// A premium partner with no explicit scopes.
    pub fn partner_premium() -> TokenPayload {
        TokenPayload::new("partner-456", "partner:premium")
    }

    /// A client.
    pub fn client() -> TokenPayload {
        TokenPayload::new("client-789", "client")
    }

    /// An administrator.
    pub fn admin() -> TokenPayload {
        TokenPayload::new("ops-1", "admin")
    }
}
