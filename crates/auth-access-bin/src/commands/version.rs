// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Returns version information.
pub fn version(_cli: &Cli) -> BinResult<String> {
    let lines = [
        "auth-access - partner access credentials".to_string(),
        String::new(),
        "Version Information:".to_string(),
        format!("  auth-access-bin:  {}", env!("CARGO_PKG_VERSION")),
        format!("  auth-access-core: {}", auth_access_core::VERSION),
        String::new(),
        "Build Information:".to_string(),
        format!("  Target:           {}", std::env::consts::ARCH),
        format!("  OS:               {}", std::env::consts::OS),
        String::new(),
        "License: PolyForm Noncommercial License 1.0.0".to_string(),
        "Copyright (c) 2025 Sylvex. All rights reserved.".to_string(),
    ];

    Ok(lines.join("\n"))
}
