// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential payload and decoded claim structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registered JWT claim names managed by the token manager.
pub const REGISTERED_CLAIMS: &[&str] = &["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// Identity claim names carried by every credential.
pub const IDENTITY_CLAIMS: &[&str] = &["partnerId", "role", "scopes"];

// =============================================================================
// TokenPayload
// =============================================================================

/// Identity payload handed to the token manager for signing.
///
/// `partner_id` and `role` are required at issuance. When deserialized from
/// JSON, absent fields become empty strings so the manager can report which
/// one is missing. A scalar `scopes` value is accepted and normalized to a
/// one-element sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Stable tenant/partner identifier.
    #[serde(rename = "partnerId", default)]
    pub partner_id: String,

    /// Role from the role hierarchy.
    #[serde(default)]
    pub role: String,

    /// Fine-grained capability tags.
    #[serde(default, deserialize_with = "scopes_serde::deserialize")]
    pub scopes: Vec<String>,

    /// Application-defined fields passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenPayload {
    /// Creates a payload for a partner and role with no explicit scopes.
    pub fn new(partner_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            partner_id: partner_id.into(),
            role: role.into(),
            scopes: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Replaces the scope sequence.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a single scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds an application-defined claim.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Audience
// =============================================================================

/// The `aud` claim, which may be a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// A single audience.
    Single(String),
    /// Several audiences.
    Multiple(Vec<String>),
}

impl Audience {
    /// Returns `true` if the claim names the given audience.
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(value) => value == audience,
            Audience::Multiple(values) => values.iter().any(|v| v == audience),
        }
    }

    /// Returns the audiences as a list.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Audience::Single(value) => vec![value.clone()],
            Audience::Multiple(values) => values.clone(),
        }
    }
}

impl From<String> for Audience {
    fn from(value: String) -> Self {
        Audience::Single(value)
    }
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Audience::Single(value.to_string())
    }
}

// =============================================================================
// Claims
// =============================================================================

/// The full claim set of a signed credential.
///
/// Used both to build the signed body at issuance and to expose the decoded
/// body after verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    // =========================================================================
    // Identity
    // =========================================================================
    /// Stable tenant/partner identifier.
    #[serde(rename = "partnerId", default)]
    pub partner_id: String,

    /// Role from the role hierarchy.
    #[serde(default)]
    pub role: String,

    /// Explicit scopes granted to the credential.
    #[serde(default, deserialize_with = "scopes_serde::deserialize")]
    pub scopes: Vec<String>,

    // =========================================================================
    // Registered Claims (RFC 7519)
    // =========================================================================
    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    /// Expiration time (Unix timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at time (Unix timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before time (Unix timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// JWT ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    // =========================================================================
    // Application Claims
    // =========================================================================
    /// Additional application-defined fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Creates identity-only claims from a payload. Temporal claims are added
    /// by the token manager at signing time.
    pub fn from_payload(payload: TokenPayload) -> Self {
        Self {
            partner_id: payload.partner_id,
            role: payload.role,
            scopes: payload.scopes,
            iss: None,
            sub: None,
            aud: None,
            exp: None,
            iat: None,
            nbf: None,
            jti: None,
            extra: payload.extra,
        }
    }

    /// Strips every registered claim, returning the identity payload for
    /// re-issuance.
    pub fn into_payload(self) -> TokenPayload {
        TokenPayload {
            partner_id: self.partner_id,
            role: self.role,
            scopes: self.scopes,
            extra: self.extra,
        }
    }

    /// Returns the partner identifier.
    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }

    /// Returns the explicit scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns an application-defined claim.
    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }

    /// Returns `true` if the claims carry an expiry that has elapsed.
    pub fn is_expired(&self) -> bool {
        self.exp
            .map(|exp| Utc::now().timestamp() >= exp)
            .unwrap_or(false)
    }

    /// Returns the time remaining until expiration.
    pub fn time_until_expiration(&self) -> Option<std::time::Duration> {
        let now = Utc::now().timestamp();
        match self.exp {
            Some(exp) if exp > now => Some(std::time::Duration::from_secs((exp - now) as u64)),
            _ => None,
        }
    }
}

// =============================================================================
// Scope Serialization
// =============================================================================

mod scopes_serde {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    /// Accepts a scope sequence, a single scope string, or null.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::One(scope)) => vec![scope],
            Some(OneOrMany::Many(scopes)) => scopes,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_builder() {
        let payload = TokenPayload::new("partner-1", "client")
            .with_scopes(["read:services"])
            .with_scope("write:bookings")
            .with_claim("region", "eu");

        assert_eq!(payload.scopes, vec!["read:services", "write:bookings"]);
        assert_eq!(payload.extra.get("region"), Some(&json!("eu")));
    }

    #[test]
    fn test_scalar_scopes_normalized() {
        let payload: TokenPayload = serde_json::from_value(json!({
            "partnerId": "partner-1",
            "role": "client",
            "scopes": "read:services"
        }))
        .unwrap();

        assert_eq!(payload.scopes, vec!["read:services".to_string()]);
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let payload: TokenPayload = serde_json::from_value(json!({ "tier": 2 })).unwrap();

        assert!(payload.partner_id.is_empty());
        assert!(payload.role.is_empty());
        assert!(payload.scopes.is_empty());
        assert_eq!(payload.extra.get("tier"), Some(&json!(2)));
    }

    #[test]
    fn test_claims_round_trip_keeps_extra_fields() {
        let claims: Claims = serde_json::from_value(json!({
            "partnerId": "partner-9",
            "role": "admin",
            "scopes": ["*"],
            "iss": "localpro",
            "aud": ["web", "mobile"],
            "exp": 2_000_000_000_i64,
            "iat": 1_900_000_000_i64,
            "jti": "abc",
            "region": "eu"
        }))
        .unwrap();

        assert_eq!(claims.partner_id(), "partner-9");
        assert!(claims.aud.as_ref().unwrap().contains("mobile"));
        assert_eq!(claims.claim("region"), Some(&json!("eu")));
        assert!(!claims.extra.contains_key("jti"));

        let payload = claims.into_payload();
        assert_eq!(payload.partner_id, "partner-9");
        assert_eq!(payload.extra.len(), 1);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::from_payload(TokenPayload::new("p", "client"));
        assert!(!claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        claims.exp = Some(Utc::now().timestamp() + 3600);
        assert!(!claims.is_expired());
        assert!(claims.time_until_expiration().is_some());

        claims.exp = Some(Utc::now().timestamp() - 100);
        assert!(claims.is_expired());
    }
}
