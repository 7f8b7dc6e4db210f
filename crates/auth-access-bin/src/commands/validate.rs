// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use auth_access_core::ValidateOptions;

use super::token_manager;
use crate::cli::{Cli, ValidateArgs};
use crate::error::BinResult;

/// Verifies a credential and returns its claims as pretty JSON.
pub fn validate(cli: &Cli, args: &ValidateArgs) -> BinResult<String> {
    let manager = token_manager(cli)?;

    let mut options = ValidateOptions::new();
    if let Some(audience) = &args.audience {
        options = options.with_audience(audience.as_str());
    }

    let claims = manager.validate_token(args.token.trim(), &options)?;
    Ok(serde_json::to_string_pretty(&claims)?)
}
