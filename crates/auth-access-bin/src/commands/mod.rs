// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! Each command returns the text to print on stdout; logs go to stderr.

mod decode;
mod issue;
mod refresh;
mod scopes;
mod validate;
mod version;

pub use decode::decode;
pub use issue::issue;
pub use refresh::refresh;
pub use scopes::scopes;
pub use validate::validate;
pub use version::version;

use auth_access_core::{AuthConfig, ConfigLoader, TokenManager};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::error::{BinError, BinResult};

/// Executes the appropriate command based on CLI arguments.
pub fn execute(cli: &Cli) -> BinResult<String> {
    match &cli.command {
        Commands::Issue(args) => issue::issue(cli, args),
        Commands::Validate(args) => validate::validate(cli, args),
        Commands::Decode(args) => decode::decode(cli, args),
        Commands::Refresh(args) => refresh::refresh(cli, args),
        Commands::Scopes(args) => scopes::scopes(cli, args),
        Commands::Version => version::version(cli),
    }
}

/// Loads configuration from `--config`, or from the environment alone.
pub fn load_config(cli: &Cli) -> BinResult<AuthConfig> {
    let loader = ConfigLoader::new();
    let config = match &cli.config {
        Some(path) => loader
            .load(path)
            .map_err(|e| BinError::from(e).with_context("Failed to load configuration"))?,
        None => {
            debug!("No configuration file given, reading environment");
            loader.load_from_env()?
        }
    };
    Ok(config)
}

/// Builds a token manager from the CLI's configuration.
///
/// Fails when neither a signing nor a verification key is configured.
pub fn token_manager(cli: &Cli) -> BinResult<TokenManager> {
    let config = load_config(cli)?;
    if !has_key(&config) {
        return Err(BinError::config(
            "no key configured; pass --config or set AUTH_ACCESS_PRIVATE_KEY or AUTH_ACCESS_PUBLIC_KEY",
        ));
    }
    Ok(TokenManager::new(&config)?)
}

fn has_key(config: &AuthConfig) -> bool {
    config.private_key.is_some()
        || config.public_key.is_some()
        || config.private_key_path.is_some()
        || config.public_key_path.is_some()
}

// =============================================================================
// Tests
// =============================================================================
