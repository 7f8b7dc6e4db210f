// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `issue` command.

use auth_access_core::{IssueOptions, TokenPayload};
use tracing::info;

use super::token_manager;
use crate::cli::{Cli, IssueArgs};
use crate::error::BinResult;

/// Signs a credential and returns it.
pub fn issue(cli: &Cli, args: &IssueArgs) -> BinResult<String> {
    let manager = token_manager(cli)?;

    let mut payload = TokenPayload::new(args.partner_id.as_str(), args.role.as_str())
        .with_scopes(args.scopes.iter().cloned());
    for (key, value) in &args.claims {
        payload = payload.with_claim(key.as_str(), value.clone());
    }

    let mut options = IssueOptions::new();
    if let Some(lifetime) = args.expires_in {
        options = options.with_expires_in(lifetime);
    }
    if let Some(audience) = &args.audience {
        options = options.with_audience(audience.as_str());
    }
    if let Some(subject) = &args.subject {
        options = options.with_subject(subject.as_str());
    }

    let token = manager.issue_token(payload, &options)?;

    let lifetime = args.expires_in.unwrap_or(manager.default_expires_in());
    info!(
        partner_id = %args.partner_id,
        role = %args.role,
        expires_in = %humantime::format_duration(lifetime),
        "Credential issued"
    );

    Ok(token)
}
