// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Process-wide, write-once auth registry.
//!
//! Prefer passing [`AuthAccess`] explicitly. The registry exists for call
//! sites that cannot receive it, such as adapters built with
//! [`AccessSource::Global`](crate::access::AccessSource::Global).

use std::sync::{Arc, OnceLock};

use crate::access::AuthAccess;
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

static GLOBAL: AuthRegistry = AuthRegistry::new();

// =============================================================================
// AuthRegistry
// =============================================================================

/// A single slot holding an [`AuthAccess`], assignable once.
#[derive(Debug)]
pub struct AuthRegistry {
    slot: OnceLock<Arc<AuthAccess>>,
}

impl AuthRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Builds and installs the handle, with the same environment fallback
    /// as [`AuthAccess::init`].
    ///
    /// Fails with a configuration error if the slot is already filled or the
    /// configuration is unusable.
    pub fn init(&self, config: AuthConfig) -> AuthResult<Arc<AuthAccess>> {
        if self.slot.get().is_some() {
            return Err(already_initialized());
        }
        self.install(AuthAccess::init(config)?)
    }

    /// Installs an already built handle.
    pub fn install(&self, access: AuthAccess) -> AuthResult<Arc<AuthAccess>> {
        let access = Arc::new(access);
        self.slot
            .set(access.clone())
            .map_err(|_| already_initialized())?;
        Ok(access)
    }

    /// Returns the installed handle.
    pub fn get(&self) -> AuthResult<Arc<AuthAccess>> {
        self.slot
            .get()
            .cloned()
            .ok_or_else(|| AuthError::configuration("auth access is not initialized"))
    }

    /// Returns `true` once a handle is installed.
    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl Default for AuthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn already_initialized() -> AuthError {
    AuthError::configuration("auth access is already initialized")
}

// =============================================================================
// Process-wide Functions
// =============================================================================

/// Initializes the process-wide handle. Callable once.
pub fn init_auth(config: AuthConfig) -> AuthResult<Arc<AuthAccess>> {
    GLOBAL.init(config)
}

/// Installs a prebuilt process-wide handle. Callable once.
pub fn install_auth(access: AuthAccess) -> AuthResult<Arc<AuthAccess>> {
    GLOBAL.install(access)
}

/// Returns the process-wide handle.
pub fn auth_access() -> AuthResult<Arc<AuthAccess>> {
    GLOBAL.get()
}

/// Returns `true` once the process-wide handle is installed.
pub fn is_initialized() -> bool {
    GLOBAL.is_initialized()
}

// =============================================================================
// Tests
// =============================================================================
