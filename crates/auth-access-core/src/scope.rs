// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Scope and role authorization predicates.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::claims::Claims;
use crate::error::{AuthError, AuthResult};
use crate::role::{role_level, Role, WILDCARD_SCOPE};

// =============================================================================
// ScopeManager
// =============================================================================

/// Evaluates scope and role sufficiency against the fixed role hierarchy.
///
/// The default scope table is built once at construction and shared across
/// clones; the manager carries no mutable state.
#[derive(Debug, Clone)]
pub struct ScopeManager {
    default_scopes: Arc<HashMap<&'static str, Vec<String>>>,
}

impl ScopeManager {
    /// Creates a scope manager over the built-in role table.
    pub fn new() -> Self {
        let default_scopes = Role::all()
            .iter()
            .map(|role| {
                let scopes = role.default_scopes().into_iter().map(String::from).collect();
                (role.as_str(), scopes)
            })
            .collect();

        Self {
            default_scopes: Arc::new(default_scopes),
        }
    }

    /// Returns the default scopes for a role; empty for unknown roles.
    pub fn get_default_scopes(&self, role: &str) -> &[String] {
        self.default_scopes
            .get(role)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns `true` if `role` belongs to the hierarchy.
    pub fn is_valid_role(&self, role: &str) -> bool {
        Role::parse(role).is_some()
    }

    /// Returns `true` if `user_role` ranks at or above `required_role`.
    ///
    /// An unknown `user_role` ranks below every defined role. An unknown
    /// `required_role` is never satisfied.
    pub fn has_role(&self, user_role: &str, required_role: &str) -> bool {
        match Role::parse(required_role) {
            Some(required) => role_level(user_role) >= required.level(),
            None => false,
        }
    }

    /// Returns the union of a credential's explicit and role-default scopes.
    pub fn effective_scopes<'a>(&'a self, claims: &'a Claims) -> BTreeSet<&'a str> {
        claims
            .scopes
            .iter()
            .chain(self.get_default_scopes(&claims.role))
            .map(String::as_str)
            .collect()
    }

    /// Returns `true` if the credential satisfies every required scope.
    ///
    /// A missing credential never satisfies. The `admin` role and an explicit
    /// `*` scope satisfy everything. A required scope containing `*` matches
    /// any effective scope it globs; otherwise matching is exact.
    pub fn check_scopes<I, S>(&self, claims: Option<&Claims>, required: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(claims) = claims else {
            return false;
        };

        if is_unrestricted(claims) {
            return true;
        }

        let effective = self.effective_scopes(claims);
        required
            .into_iter()
            .all(|scope| is_granted(&effective, scope.as_ref()))
    }

    /// Returns `true` if the credential satisfies a single required scope.
    pub fn check_scope(&self, claims: Option<&Claims>, required: &str) -> bool {
        self.check_scopes(claims, [required])
    }

    /// Returns the required scopes the credential does not satisfy.
    pub fn missing_scopes<I, S>(&self, claims: Option<&Claims>, required: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let required = required.into_iter().map(|s| s.as_ref().to_string());

        let Some(claims) = claims else {
            return required.collect();
        };

        if is_unrestricted(claims) {
            return Vec::new();
        }

        let effective = self.effective_scopes(claims);
        required
            .filter(|scope| !is_granted(&effective, scope))
            .collect()
    }

    /// Fails with [`AuthError::InsufficientScope`] listing every required
    /// scope the credential does not satisfy.
    pub fn require_scopes<I, S>(&self, claims: Option<&Claims>, required: I) -> AuthResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let missing = self.missing_scopes(claims, required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::insufficient_scope(missing))
        }
    }

    /// Fails with [`AuthError::InsufficientRole`] unless `user_role` ranks at
    /// or above `required_role`.
    pub fn require_role(&self, user_role: &str, required_role: &str) -> AuthResult<()> {
        if self.has_role(user_role, required_role) {
            Ok(())
        } else {
            Err(AuthError::insufficient_role(required_role))
        }
    }
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_unrestricted(claims: &Claims) -> bool {
    claims.role == Role::Admin.as_str() || claims.scopes.iter().any(|s| s == WILDCARD_SCOPE)
}

fn is_granted(effective: &BTreeSet<&str>, required: &str) -> bool {
    if required.contains('*') {
        effective.iter().any(|scope| glob_match(required, scope))
    } else {
        effective.contains(required)
    }
}

/// Matches `text` against a pattern where `*` matches zero or more
/// characters and every other character is literal.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some(p);
            resume = t;
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some(s) = star {
            p = s + 1;
            resume += 1;
            t = resume;
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenPayload;

    fn claims(role: &str, scopes: &[&str]) -> Claims {
        Claims::from_payload(TokenPayload::new("partner-1", role).with_scopes(scopes.iter().copied()))
    }

    #[test]
    fn test_default_scopes() {
        let manager = ScopeManager::new();
        assert_eq!(manager.get_default_scopes("admin"), ["*".to_string()]);
        assert_eq!(manager.get_default_scopes("client").len(), 5);
        assert!(manager.get_default_scopes("ghost").is_empty());
    }

    #[test]
    fn test_check_scopes_none_is_denied() {
        let manager = ScopeManager::new();
        assert!(!manager.check_scopes(None, ["read:services"]));
        assert!(!manager.check_scopes(None, Vec::<String>::new()));
    }

    #[test]
    fn test_check_scopes_union_of_explicit_and_defaults() {
        let manager = ScopeManager::new();
        let decoded = claims("client", &["read:analytics"]);

        assert!(manager.check_scopes(Some(&decoded), ["read:analytics", "write:bookings"]));
        assert!(!manager.check_scopes(Some(&decoded), ["read:analytics", "write:partner"]));
    }

    #[test]
    fn test_check_scopes_admin_and_wildcard_short_circuit() {
        let manager = ScopeManager::new();
        let admin = claims("admin", &[]);
        let wildcard = claims("client", &["*"]);

        assert!(manager.check_scopes(Some(&admin), ["admin:billing"]));
        assert!(manager.check_scopes(Some(&wildcard), ["admin:billing", "anything"]));
    }

    #[test]
    fn test_check_scopes_required_pattern() {
        let manager = ScopeManager::new();
        let decoded = claims("client", &[]);

        assert!(manager.check_scope(Some(&decoded), "read:*"));
        assert!(!manager.check_scope(Some(&decoded), "read:analytics*"));
        assert!(!manager.check_scope(Some(&decoded), "admin:*"));
    }

    #[test]
    fn test_check_scopes_empty_requirement_for_unknown_role() {
        let manager = ScopeManager::new();
        let decoded = claims("ghost", &["x:y"]);

        assert!(manager.check_scopes(Some(&decoded), Vec::<&str>::new()));
        assert!(manager.check_scope(Some(&decoded), "x:y"));
        assert!(!manager.check_scope(Some(&decoded), "read:services"));
    }

    #[test]
    fn test_missing_scopes() {
        let manager = ScopeManager::new();
        let decoded = claims("partner:basic", &[]);

        let missing =
            manager.missing_scopes(Some(&decoded), ["write:services", "read:analytics", "x:*"]);
        assert_eq!(missing, vec!["read:analytics".to_string(), "x:*".to_string()]);

        assert_eq!(manager.missing_scopes(None, ["a"]), vec!["a".to_string()]);
        assert!(manager
            .missing_scopes(Some(&claims("admin", &[])), ["a"])
            .is_empty());
    }

    #[test]
    fn test_require_scopes_reports_missing() {
        let manager = ScopeManager::new();
        let decoded = claims("client", &[]);

        assert!(manager
            .require_scopes(Some(&decoded), ["read:services"])
            .is_ok());

        let err = manager
            .require_scopes(Some(&decoded), ["read:services", "write:analytics"])
            .unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_SCOPE");
        match err {
            AuthError::InsufficientScope { required } => {
                assert_eq!(required, vec!["write:analytics".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            manager.require_scopes(None, ["read:services"]),
            Err(AuthError::InsufficientScope { .. })
        ));
    }

    #[test]
    fn test_require_role() {
        let manager = ScopeManager::new();

        assert!(manager.require_role("partner:premium", "partner:basic").is_ok());

        let err = manager.require_role("client", "admin").unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_ROLE");
        assert_eq!(err.to_string(), "Insufficient role: requires admin");
        assert!(matches!(
            manager.require_role("admin", "superuser"),
            Err(AuthError::InsufficientRole { .. })
        ));
    }

    #[test]
    fn test_has_role_ordering() {
        let manager = ScopeManager::new();

        assert!(manager.has_role("admin", "client"));
        assert!(!manager.has_role("client", "admin"));
        assert!(manager.has_role("partner:premium", "partner:basic"));
        assert!(!manager.has_role("partner:basic", "partner:premium"));
        assert!(manager.has_role("client", "client"));
    }

    #[test]
    fn test_has_role_unknown_roles_fail_closed() {
        let manager = ScopeManager::new();

        assert!(!manager.has_role("admin", "superuser"));
        assert!(!manager.has_role("ghost", "client"));
        assert!(!manager.has_role("ghost", "ghost"));
    }

    #[test]
    fn test_is_valid_role() {
        let manager = ScopeManager::new();
        assert!(manager.is_valid_role("partner:premium"));
        assert!(!manager.is_valid_role("partner"));
        assert!(!manager.is_valid_role(""));
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*", ""));
        assert!(glob_match("*", "read:services"));
        assert!(glob_match("read:*", "read:"));
        assert!(glob_match("read:*", "read:services"));
        assert!(glob_match("*:services", "write:services"));
        assert!(glob_match("r*d:s*s", "read:services"));
        assert!(!glob_match("read:*", "write:services"));
        assert!(!glob_match("read:?", "read:x"));
        assert!(glob_match("read.x", "read.x"));
        assert!(!glob_match("read.x", "readyx"));
    }
}
