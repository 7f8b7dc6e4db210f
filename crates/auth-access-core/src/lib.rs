// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # auth-access-core
//!
//! Signed access tokens carrying a partner identity, a role, and scopes,
//! plus the scope and role predicates that authorize them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use auth_access_core::{AuthAccess, AuthConfig, IssueOptions, Requirement, TokenPayload};
//!
//! let access = AuthAccess::init(AuthConfig::from_env().unwrap()).unwrap();
//!
//! let token = access
//!     .token_manager
//!     .issue_token(
//!         TokenPayload::new("partner-123", "partner:premium").with_scope("read:analytics"),
//!         &IssueOptions::new(),
//!     )
//!     .unwrap();
//!
//! let identity = access
//!     .authorizer()
//!     .authorize(Some(&token), &Requirement::scopes(["write:services"]))
//!     .unwrap();
//! assert_eq!(identity.role, "partner:premium");
//! ```
//!
//! ## Modules
//!
//! - [`token`] - issuance, verification, refresh, and unverified decoding
//! - [`scope`] - role hierarchy and scope predicates
//! - [`decision`] - the admit/deny decision shared by every transport adapter
//! - [`access`] / [`registry`] - explicit handle and write-once process-wide slot
//! - [`config`] - file and environment configuration

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod access;
pub mod claims;
pub mod config;
pub mod decision;
pub mod error;
pub mod registry;
pub mod role;
pub mod scope;
pub mod token;

pub use access::{AccessSource, AuthAccess};
pub use claims::{Audience, Claims, TokenPayload};
pub use config::{AuthConfig, ConfigError, ConfigFormat, ConfigLoader};
pub use decision::{
    extract_bearer, AuthIdentity, Authorizer, Rejection, RejectionKind, RejectionReason,
    Requirement,
};
pub use error::{AuthError, AuthResult, CredentialFailure};
pub use registry::{auth_access, init_auth};
pub use role::Role;
pub use scope::ScopeManager;
pub use token::{DecodedToken, IssueOptions, RefreshOptions, TokenManager, ValidateOptions};

pub use jsonwebtoken::Algorithm;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
