// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `decode` command.

use auth_access_core::token::decode_unverified;
use tracing::warn;

use crate::cli::{Cli, DecodeArgs};
use crate::error::BinResult;

/// Returns the header and claims as pretty JSON. Nothing is verified, so no
/// configuration is needed.
pub fn decode(_cli: &Cli, args: &DecodeArgs) -> BinResult<String> {
    let decoded = decode_unverified(args.token.trim())?;
    warn!("Decoded credential was not verified");
    Ok(serde_json::to_string_pretty(&decoded)?)
}
