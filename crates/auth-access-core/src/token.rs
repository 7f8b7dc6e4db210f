// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed credential issuance, verification, decoding, and refresh.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::claims::{Audience, Claims, TokenPayload, IDENTITY_CLAIMS, REGISTERED_CLAIMS};
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult, CredentialFailure};
use crate::role::Role;

// =============================================================================
// Options
// =============================================================================

/// Per-call issuance options.
#[derive(Debug, Clone, Default)]
pub struct IssueOptions {
    /// Lifetime override; the manager default applies when unset.
    pub expires_in: Option<Duration>,
    /// Audience claim.
    pub audience: Option<Audience>,
    /// Delay before the credential becomes valid.
    pub not_before: Option<Duration>,
    /// Explicit credential id; a fresh UUID is generated when unset.
    pub jwt_id: Option<String>,
    /// Subject claim.
    pub subject: Option<String>,
}

impl IssueOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lifetime.
    pub fn with_expires_in(mut self, lifetime: Duration) -> Self {
        self.expires_in = Some(lifetime);
        self
    }

    /// Sets the audience.
    pub fn with_audience(mut self, audience: impl Into<Audience>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sets the not-before delay.
    pub fn with_not_before(mut self, delay: Duration) -> Self {
        self.not_before = Some(delay);
        self
    }

    /// Sets the credential id.
    pub fn with_jwt_id(mut self, jwt_id: impl Into<String>) -> Self {
        self.jwt_id = Some(jwt_id.into());
        self
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// Per-call verification options.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Audience the credential must name.
    pub audience: Option<String>,
}

impl ValidateOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the given audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

/// Per-call refresh options.
#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    /// Lifetime of the new credential; the manager default applies when unset.
    pub expires_in: Option<Duration>,
    /// Audience override; the original audience is kept when unset.
    pub audience: Option<Audience>,
}

impl RefreshOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lifetime.
    pub fn with_expires_in(mut self, lifetime: Duration) -> Self {
        self.expires_in = Some(lifetime);
        self
    }

    /// Overrides the audience.
    pub fn with_audience(mut self, audience: impl Into<Audience>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

// =============================================================================
// DecodedToken
// =============================================================================

/// An unverified view of a credential, for inspection only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedToken {
    /// Credential header.
    pub header: Header,
    /// Raw claim body.
    pub claims: Value,
}

impl DecodedToken {
    /// Interprets the raw body as typed claims.
    pub fn typed_claims(&self) -> AuthResult<Claims> {
        serde_json::from_value(self.claims.clone())
            .map_err(|_| AuthError::invalid_credential(CredentialFailure::Malformed))
    }
}

// =============================================================================
// TokenManager
// =============================================================================

/// Issues, verifies, decodes, and refreshes signed credentials.
///
/// Keys are parsed once at construction. The manager is immutable afterwards
/// and cheap to clone.
#[derive(Clone)]
pub struct TokenManager {
    issuer: Arc<str>,
    algorithm: Algorithm,
    default_expires_in: Duration,
    clock_tolerance: Duration,
    allow_unknown_roles: bool,
    encoding_key: Option<Arc<EncodingKey>>,
    decoding_key: Option<Arc<DecodingKey>>,
    validation: Arc<Validation>,
}

impl TokenManager {
    /// Creates a token manager from configuration.
    ///
    /// Missing keys are allowed; the operation needing them fails later with
    /// a configuration error. Unparsable keys fail here.
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let algorithm = config.algorithm();

        let private_key = config.private_key_material()?;
        let public_key = config.public_key_material()?;

        let encoding_key = private_key
            .as_deref()
            .map(|pem| load_encoding_key(algorithm, pem))
            .transpose()?;

        let decoding_key = match (public_key.as_deref(), private_key.as_deref()) {
            (Some(pem), _) => Some(load_decoding_key(algorithm, pem)?),
            (None, Some(secret)) if is_hmac(algorithm) => Some(DecodingKey::from_secret(secret)),
            _ => None,
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.clock_tolerance.as_secs();
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_issuer(&[config.issuer()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        debug!(
            issuer = config.issuer(),
            algorithm = ?algorithm,
            can_issue = encoding_key.is_some(),
            can_validate = decoding_key.is_some(),
            "Token manager initialized"
        );

        Ok(Self {
            issuer: Arc::from(config.issuer()),
            algorithm,
            default_expires_in: config.default_expires_in(),
            clock_tolerance: config.clock_tolerance,
            allow_unknown_roles: config.allow_unknown_roles,
            encoding_key: encoding_key.map(Arc::new),
            decoding_key: decoding_key.map(Arc::new),
            validation: Arc::new(validation),
        })
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Signs a new credential for the payload.
    pub fn issue_token(&self, payload: TokenPayload, options: &IssueOptions) -> AuthResult<String> {
        if payload.partner_id.is_empty() {
            return Err(AuthError::missing_field("partnerId"));
        }
        if payload.role.is_empty() {
            return Err(AuthError::missing_field("role"));
        }
        if !self.allow_unknown_roles && Role::parse(&payload.role).is_none() {
            return Err(AuthError::invalid_argument(format!(
                "unknown role '{}'",
                payload.role
            )));
        }
        if let Some(key) = payload
            .extra
            .keys()
            .find(|k| REGISTERED_CLAIMS.contains(&k.as_str()) || IDENTITY_CLAIMS.contains(&k.as_str()))
        {
            return Err(AuthError::invalid_argument(format!(
                "claim '{key}' is reserved"
            )));
        }

        let key = self
            .encoding_key
            .as_ref()
            .ok_or_else(|| AuthError::configuration("private key is not configured"))?;

        let now = Utc::now().timestamp();
        let expires_in = options.expires_in.unwrap_or(self.default_expires_in);

        let mut claims = Claims::from_payload(payload);
        claims.iss = Some(self.issuer.to_string());
        claims.sub = options.subject.clone();
        claims.aud = options.audience.clone();
        claims.iat = Some(now);
        claims.exp = Some(now.saturating_add(duration_secs(expires_in)));
        claims.nbf = options
            .not_before
            .map(|delay| now.saturating_add(duration_secs(delay)));
        claims.jti = Some(
            options
                .jwt_id
                .clone()
                .unwrap_or_else(|| Uuid::now_v7().to_string()),
        );

        let token = encode(&Header::new(self.algorithm), &claims, key)?;

        debug!(
            partner_id = %claims.partner_id,
            role = %claims.role,
            scopes = claims.scopes.len(),
            expires_in_secs = expires_in.as_secs(),
            "Issued token"
        );

        Ok(token)
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Verifies a credential and returns its claims.
    ///
    /// Checks signature, algorithm, issuer, expiry, not-before, and the
    /// audience when one is requested.
    pub fn validate_token(&self, token: &str, options: &ValidateOptions) -> AuthResult<Claims> {
        if token.trim().is_empty() {
            return Err(AuthError::missing_field("token"));
        }

        let key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| AuthError::configuration("public key is not configured"))?;

        let data = match &options.audience {
            Some(audience) => {
                let mut validation = (*self.validation).clone();
                validation.validate_aud = true;
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".to_string());
                decode::<Claims>(token, key, &validation)
            }
            None => decode::<Claims>(token, key, &self.validation),
        };

        let claims = data
            .map_err(|e| {
                let err = AuthError::from(e);
                debug!(failure = ?err.credential_failure(), "Token validation failed");
                err
            })?
            .claims;

        if let Some(exp) = claims.exp {
            let deadline = exp.saturating_add(duration_secs(self.clock_tolerance));
            if Utc::now().timestamp() >= deadline {
                debug!(failure = %CredentialFailure::Expired, "Token validation failed");
                return Err(AuthError::invalid_credential(CredentialFailure::Expired));
            }
        }

        if claims.partner_id.is_empty() || claims.role.is_empty() {
            debug!(failure = %CredentialFailure::Malformed, "Token carries no identity");
            return Err(AuthError::invalid_credential(CredentialFailure::Malformed));
        }

        Ok(claims)
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Re-issues a still-valid credential with a fresh expiry.
    ///
    /// Expired credentials cannot be refreshed.
    pub fn refresh_token(&self, token: &str, options: &RefreshOptions) -> AuthResult<String> {
        let claims = self.validate_token(token, &ValidateOptions::default())?;

        let issue = IssueOptions {
            expires_in: options.expires_in,
            audience: options.audience.clone().or_else(|| claims.aud.clone()),
            not_before: None,
            jwt_id: None,
            subject: claims.sub.clone(),
        };

        debug!(partner_id = %claims.partner_id, "Refreshing token");
        self.issue_token(claims.into_payload(), &issue)
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    /// Decodes a credential without verifying it.
    ///
    /// The result must never be used for an authorization decision.
    pub fn decode_token(&self, token: &str) -> AuthResult<DecodedToken> {
        decode_unverified(token)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the configured issuer.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the signing algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the default credential lifetime.
    pub fn default_expires_in(&self) -> Duration {
        self.default_expires_in
    }

    /// Returns `true` if a signing key is configured.
    pub fn can_issue(&self) -> bool {
        self.encoding_key.is_some()
    }

    /// Returns `true` if a verification key is configured.
    pub fn can_validate(&self) -> bool {
        self.decoding_key.is_some()
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("default_expires_in", &self.default_expires_in)
            .field("can_issue", &self.can_issue())
            .field("can_validate", &self.can_validate())
            .finish()
    }
}

/// Decodes a credential's header and body without verifying anything.
pub fn decode_unverified(token: &str) -> AuthResult<DecodedToken> {
    if token.trim().is_empty() {
        return Err(AuthError::missing_field("token"));
    }

    let header = decode_header(token)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation)?;

    Ok(DecodedToken {
        header,
        claims: data.claims,
    })
}

// =============================================================================
// Key Loading
// =============================================================================

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

fn load_encoding_key(algorithm: Algorithm, material: &[u8]) -> AuthResult<EncodingKey> {
    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            return Ok(EncodingKey::from_secret(material));
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => EncodingKey::from_rsa_pem(material),
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(material),
        Algorithm::EdDSA => EncodingKey::from_ed_pem(material),
    };

    key.map_err(|e| AuthError::configuration(format!("invalid private key: {e}")))
}

fn load_decoding_key(algorithm: Algorithm, material: &[u8]) -> AuthResult<DecodingKey> {
    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            return Ok(DecodingKey::from_secret(material));
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(material),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(material),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(material),
    };

    key.map_err(|e| AuthError::configuration(format!("invalid public key: {e}")))
}

fn duration_secs(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RSA_PRIVATE: &str = include_str!("../testdata/rsa_private.pem");
    const RSA_PUBLIC: &str = include_str!("../testdata/rsa_public.pem");
    const RSA_OTHER_PUBLIC: &str = include_str!("../testdata/rsa_other_public.pem");
    const EC_PRIVATE: &str = include_str!("../testdata/ec_private.pem");
    const EC_PUBLIC: &str = include_str!("../testdata/ec_public.pem");
    const ED_PRIVATE: &str = include_str!("../testdata/ed_private.pem");
    const ED_PUBLIC: &str = include_str!("../testdata/ed_public.pem");

    fn rsa_config() -> AuthConfig {
        AuthConfig::new()
            .with_private_key(RSA_PRIVATE)
            .with_public_key(RSA_PUBLIC)
    }

    fn rsa_manager() -> TokenManager {
        TokenManager::new(&rsa_config()).unwrap()
    }

    fn payload() -> TokenPayload {
        TokenPayload::new("partner-123", "partner:premium").with_scopes(["read:analytics"])
    }

    #[test]
    fn test_manager_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenManager>();
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let manager = rsa_manager();
        let token = manager
            .issue_token(payload().with_claim("region", "eu"), &IssueOptions::new())
            .unwrap();

        let claims = manager.validate_token(&token, &ValidateOptions::new()).unwrap();
        assert_eq!(claims.partner_id, "partner-123");
        assert_eq!(claims.role, "partner:premium");
        assert_eq!(claims.scopes, vec!["read:analytics".to_string()]);
        assert_eq!(claims.iss.as_deref(), Some("localpro"));
        assert_eq!(claims.claim("region"), Some(&json!("eu")));
        assert!(claims.jti.is_some());

        let lifetime = claims.exp.unwrap() - claims.iat.unwrap();
        assert_eq!(lifetime, 3600);
    }

    #[test]
    fn test_issue_missing_fields() {
        let manager = rsa_manager();

        let err = manager
            .issue_token(TokenPayload::new("", "client"), &IssueOptions::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField { field: "partnerId" }));

        let err = manager
            .issue_token(TokenPayload::new("p", ""), &IssueOptions::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField { field: "role" }));
    }

    #[test]
    fn test_issue_rejects_unknown_role_unless_allowed() {
        let manager = rsa_manager();
        let err = manager
            .issue_token(TokenPayload::new("p", "superuser"), &IssueOptions::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidArgument { .. }));

        let lenient = TokenManager::new(&rsa_config().with_allow_unknown_roles(true)).unwrap();
        assert!(lenient
            .issue_token(TokenPayload::new("p", "superuser"), &IssueOptions::new())
            .is_ok());
    }

    #[test]
    fn test_issue_rejects_reserved_extra_claims() {
        let manager = rsa_manager();
        let err = manager
            .issue_token(payload().with_claim("exp", 1), &IssueOptions::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidArgument { .. }));
    }

    #[test]
    fn test_missing_keys_are_configuration_errors() {
        let verify_only = TokenManager::new(&AuthConfig::new().with_public_key(RSA_PUBLIC)).unwrap();
        let err = verify_only
            .issue_token(payload(), &IssueOptions::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));

        let sign_only = TokenManager::new(&AuthConfig::new().with_private_key(RSA_PRIVATE)).unwrap();
        let token = sign_only.issue_token(payload(), &IssueOptions::new()).unwrap();
        let err = sign_only
            .validate_token(&token, &ValidateOptions::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));
    }

    #[test]
    fn test_invalid_key_fails_construction() {
        let result = TokenManager::new(&AuthConfig::new().with_private_key("not a pem"));
        assert!(matches!(result, Err(AuthError::Configuration { .. })));
    }

    #[test]
    fn test_validate_empty_token() {
        let err = rsa_manager()
            .validate_token("  ", &ValidateOptions::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField { field: "token" }));
    }

    #[test]
    fn test_zero_lifetime_is_expired() {
        let manager = rsa_manager();
        let token = manager
            .issue_token(payload(), &IssueOptions::new().with_expires_in(Duration::ZERO))
            .unwrap();

        let err = manager
            .validate_token(&token, &ValidateOptions::new())
            .unwrap_err();
        assert!(err.is_expired());

        let err = manager
            .refresh_token(&token, &RefreshOptions::new())
            .unwrap_err();
        assert!(err.is_expired());
    }

    #[test]
    fn test_wrong_key_is_invalid_signature() {
        let manager = rsa_manager();
        let token = manager.issue_token(payload(), &IssueOptions::new()).unwrap();

        let other = TokenManager::new(&AuthConfig::new().with_public_key(RSA_OTHER_PUBLIC)).unwrap();
        let err = other
            .validate_token(&token, &ValidateOptions::new())
            .unwrap_err();
        assert_eq!(err.credential_failure(), Some(CredentialFailure::InvalidSignature));
    }

    #[test]
    fn test_algorithm_pinning() {
        let hmac = TokenManager::new(
            &AuthConfig::new()
                .with_algorithm(Algorithm::HS256)
                .with_private_key("shared-secret-for-testing-only-0123456789"),
        )
        .unwrap();
        let token = hmac.issue_token(payload(), &IssueOptions::new()).unwrap();

        let err = rsa_manager()
            .validate_token(&token, &ValidateOptions::new())
            .unwrap_err();
        assert_eq!(err.credential_failure(), Some(CredentialFailure::InvalidAlgorithm));
    }

    #[test]
    fn test_issuer_mismatch() {
        let other = TokenManager::new(&rsa_config().with_issuer("elsewhere")).unwrap();
        let token = other.issue_token(payload(), &IssueOptions::new()).unwrap();

        let err = rsa_manager()
            .validate_token(&token, &ValidateOptions::new())
            .unwrap_err();
        assert_eq!(err.credential_failure(), Some(CredentialFailure::InvalidIssuer));
    }

    #[test]
    fn test_audience_checks() {
        let manager = rsa_manager();
        let token = manager
            .issue_token(payload(), &IssueOptions::new().with_audience("web"))
            .unwrap();

        assert!(manager
            .validate_token(&token, &ValidateOptions::new().with_audience("web"))
            .is_ok());
        assert!(manager.validate_token(&token, &ValidateOptions::new()).is_ok());

        let err = manager
            .validate_token(&token, &ValidateOptions::new().with_audience("mobile"))
            .unwrap_err();
        assert_eq!(err.credential_failure(), Some(CredentialFailure::InvalidAudience));

        let bare = manager.issue_token(payload(), &IssueOptions::new()).unwrap();
        let err = manager
            .validate_token(&bare, &ValidateOptions::new().with_audience("web"))
            .unwrap_err();
        assert_eq!(err.credential_failure(), Some(CredentialFailure::InvalidAudience));
    }

    #[test]
    fn test_not_before_in_future() {
        let manager = rsa_manager();
        let token = manager
            .issue_token(
                payload(),
                &IssueOptions::new().with_not_before(Duration::from_secs(600)),
            )
            .unwrap();

        let err = manager
            .validate_token(&token, &ValidateOptions::new())
            .unwrap_err();
        assert_eq!(err.credential_failure(), Some(CredentialFailure::NotYetValid));
    }

    #[test]
    fn test_malformed_token() {
        let err = rsa_manager()
            .validate_token("invalid.token.here", &ValidateOptions::new())
            .unwrap_err();
        assert_eq!(err.credential_failure(), Some(CredentialFailure::Malformed));
    }

    #[test]
    fn test_signed_token_without_identity_is_malformed() {
        let manager = rsa_manager();
        let key = EncodingKey::from_rsa_pem(RSA_PRIVATE.as_bytes()).unwrap();
        let exp = Utc::now().timestamp() + 3600;

        for body in [
            json!({ "iss": "localpro", "exp": exp }),
            json!({ "iss": "localpro", "exp": exp, "partnerId": "partner-123" }),
            json!({ "iss": "localpro", "exp": exp, "role": "admin" }),
            json!({ "iss": "localpro", "exp": exp, "partnerId": "", "role": "admin" }),
        ] {
            let token = encode(&Header::new(Algorithm::RS256), &body, &key).unwrap();
            let err = manager
                .validate_token(&token, &ValidateOptions::new())
                .unwrap_err();
            assert_eq!(
                err.credential_failure(),
                Some(CredentialFailure::Malformed),
                "body {body}"
            );
        }
    }

    #[test]
    fn test_refresh_preserves_identity() {
        let manager = rsa_manager();
        let token = manager
            .issue_token(
                payload().with_claim("region", "eu"),
                &IssueOptions::new()
                    .with_expires_in(Duration::from_secs(60))
                    .with_audience("web")
                    .with_subject("user-7"),
            )
            .unwrap();
        let before = manager.validate_token(&token, &ValidateOptions::new()).unwrap();

        let refreshed = manager
            .refresh_token(&token, &RefreshOptions::new())
            .unwrap();
        assert_ne!(refreshed, token);

        let after = manager.validate_token(&refreshed, &ValidateOptions::new()).unwrap();
        assert_eq!(after.partner_id, before.partner_id);
        assert_eq!(after.role, before.role);
        assert_eq!(after.scopes, before.scopes);
        assert_eq!(after.aud, before.aud);
        assert_eq!(after.sub, before.sub);
        assert_eq!(after.claim("region"), Some(&json!("eu")));
        assert!(after.exp.unwrap() > before.exp.unwrap());
        assert_ne!(after.jti, before.jti);
    }

    #[test]
    fn test_decode_without_verification() {
        let manager = rsa_manager();
        let token = manager
            .issue_token(payload(), &IssueOptions::new().with_expires_in(Duration::ZERO))
            .unwrap();

        let other = TokenManager::new(&AuthConfig::new()).unwrap();
        let decoded = other.decode_token(&token).unwrap();
        assert_eq!(decoded.header.alg, Algorithm::RS256);
        assert_eq!(decoded.claims["partnerId"], json!("partner-123"));
        assert_eq!(decoded.typed_claims().unwrap().role, "partner:premium");

        assert!(other.decode_token("garbage").is_err());
    }

    #[test]
    fn test_hmac_secret_doubles_as_verification_key() {
        let manager = TokenManager::new(
            &AuthConfig::new()
                .with_algorithm(Algorithm::HS512)
                .with_private_key("another-shared-secret-for-testing-0123456789"),
        )
        .unwrap();
        assert!(manager.can_validate());

        let token = manager.issue_token(payload(), &IssueOptions::new()).unwrap();
        assert!(manager.validate_token(&token, &ValidateOptions::new()).is_ok());
    }

    #[test]
    fn test_ecdsa_and_eddsa_keys() {
        let es = TokenManager::new(
            &AuthConfig::new()
                .with_algorithm(Algorithm::ES256)
                .with_private_key(EC_PRIVATE)
                .with_public_key(EC_PUBLIC),
        )
        .unwrap();
        let token = es.issue_token(payload(), &IssueOptions::new()).unwrap();
        assert!(es.validate_token(&token, &ValidateOptions::new()).is_ok());

        let err = rsa_manager()
            .validate_token(&token, &ValidateOptions::new())
            .unwrap_err();
        assert_eq!(err.credential_failure(), Some(CredentialFailure::InvalidAlgorithm));

        let ed = TokenManager::new(
            &AuthConfig::new()
                .with_algorithm(Algorithm::EdDSA)
                .with_private_key(ED_PRIVATE)
                .with_public_key(ED_PUBLIC),
        )
        .unwrap();
        let token = ed.issue_token(payload(), &IssueOptions::new()).unwrap();
        assert!(ed.validate_token(&token, &ValidateOptions::new()).is_ok());
    }
}
