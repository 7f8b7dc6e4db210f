// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The configured manager pair and how adapters resolve it.

use std::env;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::{AuthConfig, DEFAULT_ENV_PREFIX};
use crate::decision::{Authorizer, Rejection};
use crate::error::AuthResult;
use crate::registry;
use crate::scope::ScopeManager;
use crate::token::TokenManager;

// =============================================================================
// AuthAccess
// =============================================================================

/// Handle to a configured token manager and scope manager.
///
/// Cheap to clone; pass it explicitly to adapters or install it once in the
/// process-wide registry.
#[derive(Debug, Clone)]
pub struct AuthAccess {
    /// Token manager.
    pub token_manager: Arc<TokenManager>,
    /// Scope manager.
    pub scope_manager: Arc<ScopeManager>,
}

impl AuthAccess {
    /// Builds both managers from configuration.
    ///
    /// Fields left unset fall back to `AUTH_ACCESS_*` environment variables;
    /// explicitly configured values always win.
    pub fn init(config: AuthConfig) -> AuthResult<Self> {
        Self::init_with_lookup(config, |name| env::var(name).ok())
    }

    /// Builds both managers, filling unset fields through `lookup` instead
    /// of the process environment.
    pub fn init_with_lookup<F>(config: AuthConfig, lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = config.with_fallback_from(DEFAULT_ENV_PREFIX, lookup)?;
        let token_manager = TokenManager::new(&config)?;

        info!(
            issuer = token_manager.issuer(),
            algorithm = ?token_manager.algorithm(),
            "Auth access initialized"
        );

        Ok(Self::from_parts(token_manager, ScopeManager::new()))
    }

    /// Wraps existing managers.
    pub fn from_parts(token_manager: TokenManager, scope_manager: ScopeManager) -> Self {
        Self {
            token_manager: Arc::new(token_manager),
            scope_manager: Arc::new(scope_manager),
        }
    }

    /// Returns an authorizer over this pair.
    pub fn authorizer(&self) -> Authorizer {
        Authorizer::new(self.token_manager.clone(), self.scope_manager.clone())
    }
}

// =============================================================================
// AccessSource
// =============================================================================

/// Where an adapter finds its [`AuthAccess`].
#[derive(Debug, Clone)]
pub enum AccessSource {
    /// An explicitly injected handle.
    Shared(Arc<AuthAccess>),
    /// The process-wide registry, looked up per request.
    Global,
}

impl AccessSource {
    /// Resolves the handle, rejecting as misconfigured when none exists.
    pub fn resolve(&self) -> Result<Arc<AuthAccess>, Rejection> {
        match self {
            AccessSource::Shared(access) => Ok(access.clone()),
            AccessSource::Global => registry::auth_access().map_err(|err| {
                error!(error = %err, "Auth access requested before initialization");
                Rejection::not_configured()
            }),
        }
    }
}

impl From<AuthAccess> for AccessSource {
    fn from(access: AuthAccess) -> Self {
        AccessSource::Shared(Arc::new(access))
    }
}

impl From<Arc<AuthAccess>> for AccessSource {
    fn from(access: Arc<AuthAccess>) -> Self {
        AccessSource::Shared(access)
    }
}

// =============================================================================
// Tests
// =============================================================================
