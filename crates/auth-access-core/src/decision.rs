// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Framework-agnostic authorization decision.
//!
//! Every transport adapter funnels through [`Authorizer::authorize`]: a
//! credential string goes in, an [`AuthIdentity`] or a [`Rejection`] comes
//! out. Adapters only extract the credential and format the rejection.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::claims::Claims;
use crate::error::{AuthError, CredentialFailure};
use crate::scope::ScopeManager;
use crate::token::{TokenManager, ValidateOptions};

/// Client-facing message for every credential verification failure.
pub const INVALID_CREDENTIAL_MESSAGE: &str = "Invalid or expired token";

// =============================================================================
// Requirement
// =============================================================================

/// What a route or resolver demands of a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    /// Scopes that must all be granted.
    pub scopes: Vec<String>,
    /// Minimum role.
    pub role: Option<String>,
}

impl Requirement {
    /// Requires authentication only.
    pub fn none() -> Self {
        Self::default()
    }

    /// Requires every listed scope.
    pub fn scopes<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::none().and_scopes(scopes)
    }

    /// Requires a minimum role.
    pub fn role(role: impl Into<String>) -> Self {
        Self::none().and_role(role)
    }

    /// Adds required scopes.
    pub fn and_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Sets the minimum role.
    pub fn and_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Returns `true` if only authentication is required.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty() && self.role.is_none()
    }
}

// =============================================================================
// Rejection
// =============================================================================

/// Outcome category of a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    /// Credential absent or failed verification.
    Unauthorized,
    /// Credential verified but not sufficient.
    Forbidden,
    /// The auth subsystem is not configured.
    ServerMisconfigured,
    /// Unexpected failure.
    Internal,
}

impl RejectionKind {
    /// Returns the HTTP status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            RejectionKind::Unauthorized => 401,
            RejectionKind::Forbidden => 403,
            RejectionKind::ServerMisconfigured | RejectionKind::Internal => 500,
        }
    }

    /// Returns the category label used in response bodies.
    pub fn category(&self) -> &'static str {
        match self {
            RejectionKind::Unauthorized => "Unauthorized",
            RejectionKind::Forbidden => "Forbidden",
            RejectionKind::ServerMisconfigured => "ServerMisconfigured",
            RejectionKind::Internal => "InternalError",
        }
    }
}

/// Precise cause of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// No bearer credential was presented.
    MissingCredential,
    /// The credential failed verification.
    InvalidCredential,
    /// The credential has expired.
    ExpiredCredential,
    /// A required scope is missing.
    InsufficientScope,
    /// The role ranks below the requirement.
    InsufficientRole,
    /// No token or scope manager is available.
    NotConfigured,
    /// Anything else.
    Unexpected,
}

impl RejectionReason {
    /// Returns a stable code for logs and error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::MissingCredential => "missing_credential",
            RejectionReason::InvalidCredential => "invalid_credential",
            RejectionReason::ExpiredCredential => "expired_credential",
            RejectionReason::InsufficientScope => "insufficient_scope",
            RejectionReason::InsufficientRole => "insufficient_role",
            RejectionReason::NotConfigured => "not_configured",
            RejectionReason::Unexpected => "unexpected",
        }
    }

    /// Returns the rejection kind for this reason.
    pub fn kind(&self) -> RejectionKind {
        match self {
            RejectionReason::MissingCredential
            | RejectionReason::InvalidCredential
            | RejectionReason::ExpiredCredential => RejectionKind::Unauthorized,
            RejectionReason::InsufficientScope | RejectionReason::InsufficientRole => {
                RejectionKind::Forbidden
            }
            RejectionReason::NotConfigured => RejectionKind::ServerMisconfigured,
            RejectionReason::Unexpected => RejectionKind::Internal,
        }
    }

    /// Returns the client-facing message.
    ///
    /// Expired and otherwise invalid credentials read the same.
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::MissingCredential => "Authentication required",
            RejectionReason::InvalidCredential | RejectionReason::ExpiredCredential => {
                INVALID_CREDENTIAL_MESSAGE
            }
            RejectionReason::InsufficientScope => "Insufficient scope",
            RejectionReason::InsufficientRole => "Insufficient role",
            RejectionReason::NotConfigured => "Authentication is not configured",
            RejectionReason::Unexpected => "Internal server error",
        }
    }
}

/// A denied authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Outcome category.
    pub kind: RejectionKind,
    /// Precise cause.
    pub reason: RejectionReason,
}

impl Rejection {
    /// Creates a rejection for a reason.
    pub fn new(reason: RejectionReason) -> Self {
        Self {
            kind: reason.kind(),
            reason,
        }
    }

    /// Creates a missing-credential rejection.
    pub fn missing_credential() -> Self {
        Self::new(RejectionReason::MissingCredential)
    }

    /// Creates a not-configured rejection.
    pub fn not_configured() -> Self {
        Self::new(RejectionReason::NotConfigured)
    }

    /// Returns the HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Returns the client-facing message.
    pub fn message(&self) -> &'static str {
        self.reason.message()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.category(), self.message())
    }
}

impl std::error::Error for Rejection {}

impl From<&AuthError> for Rejection {
    fn from(err: &AuthError) -> Self {
        let reason = match err {
            AuthError::MissingField { .. } => RejectionReason::MissingCredential,
            AuthError::Configuration { .. } => RejectionReason::NotConfigured,
            AuthError::InvalidCredential {
                failure: CredentialFailure::Expired,
            } => RejectionReason::ExpiredCredential,
            AuthError::InvalidCredential { .. } => RejectionReason::InvalidCredential,
            AuthError::InsufficientScope { .. } => RejectionReason::InsufficientScope,
            AuthError::InsufficientRole { .. } => RejectionReason::InsufficientRole,
            AuthError::InvalidArgument { .. } | AuthError::Internal { .. } => {
                RejectionReason::Unexpected
            }
        };
        Self::new(reason)
    }
}

impl From<AuthError> for Rejection {
    fn from(err: AuthError) -> Self {
        Self::from(&err)
    }
}

// =============================================================================
// AuthIdentity
// =============================================================================

/// The verified caller attached to a request or GraphQL context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Partner identifier.
    pub partner_id: String,
    /// Role.
    pub role: String,
    /// Explicit scopes from the credential.
    pub scopes: Vec<String>,
    /// Full decoded claims.
    pub claims: Claims,
    /// Request ID for tracing.
    pub request_id: Uuid,
    #[serde(skip)]
    scope_manager: ScopeManager,
}

impl AuthIdentity {
    /// Creates an identity from verified claims.
    pub fn from_claims(claims: Claims, scope_manager: ScopeManager) -> Self {
        Self {
            partner_id: claims.partner_id.clone(),
            role: claims.role.clone(),
            scopes: claims.scopes.clone(),
            claims,
            request_id: Uuid::now_v7(),
            scope_manager,
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns `true` if the identity holds every listed scope.
    pub fn has_scopes<I, S>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scope_manager.check_scopes(Some(&self.claims), required)
    }

    /// Returns `true` if the identity ranks at or above `required`.
    pub fn has_role(&self, required: &str) -> bool {
        self.scope_manager.has_role(&self.role, required)
    }

    /// Fails with a forbidden rejection unless every scope is held.
    pub fn require_scopes<I, S>(&self, required: I) -> Result<(), Rejection>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scope_manager
            .require_scopes(Some(&self.claims), required)
            .map_err(|err| {
                if let AuthError::InsufficientScope { required } = &err {
                    warn!(
                        partner_id = %self.partner_id,
                        role = %self.role,
                        required_scopes = ?required,
                        "Insufficient scope"
                    );
                }
                Rejection::from(&err)
            })
    }

    /// Fails with a forbidden rejection unless the role suffices.
    pub fn require_role(&self, required: &str) -> Result<(), Rejection> {
        self.scope_manager
            .require_role(&self.role, required)
            .map_err(|err| {
                warn!(
                    partner_id = %self.partner_id,
                    role = %self.role,
                    required_role = required,
                    "Insufficient role"
                );
                Rejection::from(&err)
            })
    }
}

// =============================================================================
// Authorizer
// =============================================================================

/// Runs the admit/deny decision for a presented credential.
#[derive(Debug, Clone)]
pub struct Authorizer {
    token_manager: Arc<TokenManager>,
    scope_manager: Arc<ScopeManager>,
    options: ValidateOptions,
}

impl Authorizer {
    /// Creates an authorizer over a manager pair.
    pub fn new(token_manager: Arc<TokenManager>, scope_manager: Arc<ScopeManager>) -> Self {
        Self {
            token_manager,
            scope_manager,
            options: ValidateOptions::default(),
        }
    }

    /// Requires credentials to name the given audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.options = self.options.with_audience(audience);
        self
    }

    /// Verifies the credential and checks it against the requirement.
    ///
    /// Scopes are checked before the role. A missing or blank credential is
    /// rejected without attempting verification.
    pub fn authorize(
        &self,
        credential: Option<&str>,
        requirement: &Requirement,
    ) -> Result<AuthIdentity, Rejection> {
        let Some(token) = credential.map(str::trim).filter(|t| !t.is_empty()) else {
            debug!("No bearer credential presented");
            return Err(Rejection::missing_credential());
        };

        let claims = self
            .token_manager
            .validate_token(token, &self.options)
            .map_err(|err| {
                if err.is_server_error() {
                    error!(error = %err, "Token verification unavailable");
                } else {
                    debug!(failure = ?err.credential_failure(), "Credential rejected");
                }
                Rejection::from(err)
            })?;

        let identity = AuthIdentity::from_claims(claims, (*self.scope_manager).clone());

        if !requirement.scopes.is_empty() {
            identity.require_scopes(&requirement.scopes)?;
        }
        if let Some(role) = &requirement.role {
            identity.require_role(role)?;
        }

        Ok(identity)
    }

    /// Returns the token manager.
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.token_manager
    }

    /// Returns the scope manager.
    pub fn scope_manager(&self) -> &Arc<ScopeManager> {
        &self.scope_manager
    }
}

// =============================================================================
// Credential Extraction
// =============================================================================

/// Extracts the token from an `Authorization: Bearer <token>` value.
///
/// The scheme is matched case-insensitively; an empty token yields `None`.
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenPayload;
    use crate::config::AuthConfig;
    use crate::token::IssueOptions;
    use std::time::Duration;

    const SECRET: &str = "decision-test-secret-0123456789abcdef";

    fn authorizer() -> Authorizer {
        let config = AuthConfig::new()
            .with_algorithm(jsonwebtoken::Algorithm::HS256)
            .with_private_key(SECRET);
        Authorizer::new(
            Arc::new(TokenManager::new(&config).unwrap()),
            Arc::new(ScopeManager::new()),
        )
    }

    fn token_for(authorizer: &Authorizer, role: &str, scopes: &[&str]) -> String {
        authorizer
            .token_manager()
            .issue_token(
                TokenPayload::new("partner-1", role).with_scopes(scopes.iter().copied()),
                &IssueOptions::new(),
            )
            .unwrap()
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer("BEARER   abc  "), Some("abc"));
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Bearer"), None);
        assert_eq!(extract_bearer("Basic abc"), None);
        assert_eq!(extract_bearer(""), None);
    }

    #[test]
    fn test_missing_credential_is_unauthorized() {
        let authorizer = authorizer();
        let rejection = authorizer
            .authorize(None, &Requirement::scopes(["read:services"]))
            .unwrap_err();
        assert_eq!(rejection.reason, RejectionReason::MissingCredential);
        assert_eq!(rejection.status_code(), 401);

        let rejection = authorizer.authorize(Some("  "), &Requirement::none()).unwrap_err();
        assert_eq!(rejection.reason, RejectionReason::MissingCredential);
    }

    #[test]
    fn test_invalid_and_expired_share_message() {
        let authorizer = authorizer();
        let invalid = authorizer
            .authorize(Some("not.a.token"), &Requirement::none())
            .unwrap_err();

        let expired_token = authorizer
            .token_manager()
            .issue_token(
                TokenPayload::new("partner-1", "client"),
                &IssueOptions::new().with_expires_in(Duration::ZERO),
            )
            .unwrap();
        let expired = authorizer
            .authorize(Some(&expired_token), &Requirement::none())
            .unwrap_err();

        assert_eq!(invalid.reason, RejectionReason::InvalidCredential);
        assert_eq!(expired.reason, RejectionReason::ExpiredCredential);
        assert_eq!(invalid.message(), expired.message());
        assert_eq!(expired.kind, RejectionKind::Unauthorized);
    }

    #[test]
    fn test_scope_and_role_denials_are_forbidden() {
        let authorizer = authorizer();
        let token = token_for(&authorizer, "client", &[]);

        let rejection = authorizer
            .authorize(Some(&token), &Requirement::scopes(["read:analytics"]))
            .unwrap_err();
        assert_eq!(rejection.reason, RejectionReason::InsufficientScope);
        assert_eq!(rejection.status_code(), 403);

        let rejection = authorizer
            .authorize(Some(&token), &Requirement::role("admin"))
            .unwrap_err();
        assert_eq!(rejection.reason, RejectionReason::InsufficientRole);
        assert_eq!(rejection.kind, RejectionKind::Forbidden);
    }

    #[test]
    fn test_admitted_identity() {
        let authorizer = authorizer();
        let token = token_for(&authorizer, "partner:premium", &["read:analytics"]);

        let identity = authorizer
            .authorize(
                Some(&token),
                &Requirement::scopes(["write:services"]).and_role("partner:basic"),
            )
            .unwrap();

        assert_eq!(identity.partner_id, "partner-1");
        assert_eq!(identity.role, "partner:premium");
        assert_eq!(identity.scopes, vec!["read:analytics".to_string()]);
        assert!(identity.has_scopes(["read:analytics", "write:analytics"]));
        assert!(identity.has_role("partner:premium"));
        assert!(identity.require_role("admin").is_err());
        assert!(identity.require_scopes(["admin:billing"]).is_err());
    }

    #[test]
    fn test_identity_denials_map_from_auth_errors() {
        let authorizer = authorizer();
        let token = token_for(&authorizer, "client", &[]);
        let identity = authorizer.authorize(Some(&token), &Requirement::none()).unwrap();

        let rejection = identity.require_scopes(["write:analytics"]).unwrap_err();
        assert_eq!(
            rejection,
            Rejection::from(&AuthError::insufficient_scope(vec!["write:analytics".into()]))
        );

        let rejection = identity.require_role("partner:basic").unwrap_err();
        assert_eq!(rejection, Rejection::from(&AuthError::insufficient_role("partner:basic")));
        assert_eq!(rejection.reason, RejectionReason::InsufficientRole);
    }

    #[test]
    fn test_signed_token_without_identity_is_unauthorized() {
        let authorizer = authorizer();
        let forged = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            &serde_json::json!({ "iss": "localpro", "exp": chrono::Utc::now().timestamp() + 600 }),
            &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let rejection = authorizer
            .authorize(Some(&forged), &Requirement::none())
            .unwrap_err();
        assert_eq!(rejection.kind, RejectionKind::Unauthorized);
        assert_eq!(rejection.reason, RejectionReason::InvalidCredential);
    }

    #[test]
    fn test_unconfigured_manager_is_server_misconfigured() {
        let authorizer = Authorizer::new(
            Arc::new(TokenManager::new(&AuthConfig::new()).unwrap()),
            Arc::new(ScopeManager::new()),
        );
        let rejection = authorizer
            .authorize(Some("a.b.c"), &Requirement::none())
            .unwrap_err();
        assert_eq!(rejection.kind, RejectionKind::ServerMisconfigured);
        assert_eq!(rejection.status_code(), 500);
    }

    #[test]
    fn test_kind_categories() {
        assert_eq!(RejectionKind::Internal.category(), "InternalError");
        assert_eq!(
            Rejection::new(RejectionReason::Unexpected).status_code(),
            500
        );
        assert_eq!(RejectionReason::NotConfigured.code(), "not_configured");
    }
}
