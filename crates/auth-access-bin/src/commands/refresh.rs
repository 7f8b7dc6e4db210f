// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `refresh` command.

use auth_access_core::RefreshOptions;

use super::token_manager;
use crate::cli::{Cli, RefreshArgs};
use crate::error::BinResult;

/// Re-issues a valid credential and returns the new one.
pub fn refresh(cli: &Cli, args: &RefreshArgs) -> BinResult<String> {
    let manager = token_manager(cli)?;

    let mut options = RefreshOptions::new();
    if let Some(lifetime) = args.expires_in {
        options = options.with_expires_in(lifetime);
    }
    if let Some(audience) = &args.audience {
        options = options.with_audience(audience.as_str());
    }

    Ok(manager.refresh_token(args.token.trim(), &options)?)
}
