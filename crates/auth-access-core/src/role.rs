// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The fixed role hierarchy and its default scope bundles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The universal wildcard scope.
pub const WILDCARD_SCOPE: &str = "*";

const CLIENT_SCOPES: &[&str] = &[
    "read:services",
    "read:bookings",
    "write:bookings",
    "read:profile",
    "write:profile",
];

const PARTNER_BASIC_SCOPES: &[&str] = &["write:services", "read:partner", "write:partner"];

const PARTNER_PREMIUM_SCOPES: &[&str] = &["read:analytics", "write:analytics"];

// =============================================================================
// Role
// =============================================================================

/// Roles of the hierarchy, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// End customer.
    #[serde(rename = "client")]
    Client,
    /// Partner on the basic plan.
    #[serde(rename = "partner:basic")]
    PartnerBasic,
    /// Partner on the premium plan.
    #[serde(rename = "partner:premium")]
    PartnerPremium,
    /// Platform administrator.
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    /// Returns all roles in hierarchy order.
    pub fn all() -> &'static [Role] {
        &[
            Role::Client,
            Role::PartnerBasic,
            Role::PartnerPremium,
            Role::Admin,
        ]
    }

    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::PartnerBasic => "partner:basic",
            Role::PartnerPremium => "partner:premium",
            Role::Admin => "admin",
        }
    }

    /// Parses a role name. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "client" => Some(Role::Client),
            "partner:basic" => Some(Role::PartnerBasic),
            "partner:premium" => Some(Role::PartnerPremium),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns the hierarchy level, starting at 1.
    pub fn level(&self) -> u8 {
        match self {
            Role::Client => 1,
            Role::PartnerBasic => 2,
            Role::PartnerPremium => 3,
            Role::Admin => 4,
        }
    }

    /// Returns the implicit scopes carried by this role.
    ///
    /// Each partner tier carries the scopes of the tiers below it.
    pub fn default_scopes(&self) -> Vec<&'static str> {
        match self {
            Role::Client => CLIENT_SCOPES.to_vec(),
            Role::PartnerBasic => [CLIENT_SCOPES, PARTNER_BASIC_SCOPES].concat(),
            Role::PartnerPremium => {
                [CLIENT_SCOPES, PARTNER_BASIC_SCOPES, PARTNER_PREMIUM_SCOPES].concat()
            }
            Role::Admin => vec![WILDCARD_SCOPE],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| format!("unknown role '{s}'"))
    }
}

/// Returns the hierarchy level of a role name; 0 for names outside the table.
pub fn role_level(role: &str) -> u8 {
    Role::parse(role).map(|r| r.level()).unwrap_or(0)
}

// =============================================================================
// Tests
// =============================================================================
