// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # auth-access Integration Tests
//!
//! Shared fixtures and a router harness for the integration suites.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p auth-access-tests
//!
//! # Run a specific suite
//! cargo test -p auth-access-tests --test integration_token
//! cargo test -p auth-access-tests --test integration_http
//! ```
//!
//! ## Test Categories
//!
//! - `integration_token.rs`: issuance, verification, refresh, key handling
//! - `integration_scopes.rs`: scope and role decisions
//! - `integration_http.rs`: middleware and extractors over an axum router
//! - `integration_graphql.rs`: query and subscription context resolution
//! - `integration_registry.rs`: the process-wide handle
//!
//! ## Using Fixtures
//!
//! ```rust,ignore
//! use auth_access_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::rsa();
//!     let token = app.issue(PayloadFixtures::partner_basic());
//!     let (status, _) = app.get("/bookings", Some(&token)).await;
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::init_test_logging;
}
