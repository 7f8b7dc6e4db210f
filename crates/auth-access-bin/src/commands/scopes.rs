// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `scopes` command.

use auth_access_core::{Role, ScopeManager};

use crate::cli::{Cli, OutputFormat, ScopesArgs};
use crate::error::{BinError, BinResult};

/// Describes a role's level and default scopes.
pub fn scopes(_cli: &Cli, args: &ScopesArgs) -> BinResult<String> {
    let role = Role::parse(&args.role).ok_or_else(|| {
        let known: Vec<&str> = Role::all().iter().map(Role::as_str).collect();
        BinError::invalid_input(format!(
            "unknown role '{}' (expected one of: {})",
            args.role,
            known.join(", ")
        ))
    })?;

    let manager = ScopeManager::new();
    let defaults = manager.get_default_scopes(role.as_str());

    let output = match args.format {
        OutputFormat::Text => {
            let mut out = format!("Role:   {}\nLevel:  {}\nScopes:\n", role, role.level());
            for scope in defaults {
                out.push_str("  ");
                out.push_str(scope);
                out.push('\n');
            }
            out.trim_end().to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "role": role.as_str(),
            "level": role.level(),
            "scopes": defaults,
        }))?,
    };

    Ok(output)
}
