// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # auth-access-bin
//!
//! Command-line tool for auth-access credentials.
//!
//! ## Usage
//!
//! ```bash
//! # Sign a credential using keys from a config file
//! auth-access -c auth.yaml issue -p partner-123 -r partner:basic -s read:analytics
//!
//! # Verify it and print the claims
//! auth-access -c auth.yaml validate <token>
//!
//! # Inspect without verifying
//! auth-access decode <token>
//!
//! # Show what a role grants
//! auth-access scopes partner:premium
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
