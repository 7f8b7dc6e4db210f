// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `issue`: Sign a new credential
//! - `validate`: Verify a credential and print its claims
//! - `decode`: Print header and claims without verification
//! - `refresh`: Re-issue a valid credential with a fresh lifetime
//! - `scopes`: Show a role's level and default scopes
//! - `version`: Show version information

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// auth-access - signed bearer credentials with role and scope checks
#[derive(Parser, Debug)]
#[command(
    name = "auth-access",
    author = "Sylvex <contact@sylvex.io>",
    version = auth_access_core::VERSION,
    about = "Issue, verify, and inspect partner access credentials",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (YAML, TOML, or JSON)
    ///
    /// When omitted, configuration is read from AUTH_ACCESS_* variables.
    #[arg(short, long, env = "AUTH_ACCESS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "warn",
        env = "AUTH_ACCESS_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, default_value = "text", env = "AUTH_ACCESS_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign a new credential
    ///
    /// The role's default scopes are not embedded; they are granted at check
    /// time. Use --scope to add scopes beyond the defaults.
    Issue(IssueArgs),

    /// Verify a credential and print its claims as JSON
    Validate(ValidateArgs),

    /// Print a credential's header and claims without verifying it
    Decode(DecodeArgs),

    /// Re-issue a valid credential with a fresh lifetime and identifier
    Refresh(RefreshArgs),

    /// Show a role's hierarchy level and default scopes
    Scopes(ScopesArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `issue` command.
#[derive(Args, Debug, Clone)]
pub struct IssueArgs {
    /// Partner identifier
    #[arg(short, long)]
    pub partner_id: String,

    /// Role (client, partner:basic, partner:premium, admin)
    #[arg(short, long)]
    pub role: String,

    /// Explicit scope; repeatable
    #[arg(short, long = "scope")]
    pub scopes: Vec<String>,

    /// Extra claim as key=value; the value is parsed as JSON when possible
    #[arg(long = "claim", value_parser = parse_claim)]
    pub claims: Vec<(String, Value)>,

    /// Lifetime such as 30m, 24h, 7d, or a number of seconds
    #[arg(short, long, value_parser = parse_duration)]
    pub expires_in: Option<Duration>,

    /// Audience
    #[arg(short, long)]
    pub audience: Option<String>,

    /// Subject
    #[arg(long)]
    pub subject: Option<String>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Credential to verify
    pub token: String,

    /// Required audience
    #[arg(short, long)]
    pub audience: Option<String>,
}

/// Arguments for the `decode` command.
#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Credential to decode
    pub token: String,
}

/// Arguments for the `refresh` command.
#[derive(Args, Debug, Clone)]
pub struct RefreshArgs {
    /// Credential to refresh
    pub token: String,

    /// Lifetime of the new credential
    #[arg(short, long, value_parser = parse_duration)]
    pub expires_in: Option<Duration>,

    /// Audience for the new credential, replacing the original
    #[arg(short, long)]
    pub audience: Option<String>,
}

/// Arguments for the `scopes` command.
#[derive(Args, Debug, Clone)]
pub struct ScopesArgs {
    /// Role to describe
    pub role: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Value Parsers
// =============================================================================

fn parse_duration(input: &str) -> Result<Duration, String> {
    auth_access_core::config::parse_lifetime(input).map_err(|e| e.to_string())
}

fn parse_claim(input: &str) -> Result<(String, Value), String> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{input}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err("claim key must not be empty".to_string());
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_command() {
        let cli = Cli::parse_from([
            "auth-access",
            "issue",
            "--partner-id",
            "partner-123",
            "--role",
            "partner:basic",
            "--scope",
            "read:analytics",
            "--scope",
            "write:analytics",
            "--expires-in",
            "30m",
        ]);

        let Commands::Issue(args) = cli.command else {
            panic!("Expected Issue command");
        };
        assert_eq!(args.partner_id, "partner-123");
        assert_eq!(args.role, "partner:basic");
        assert_eq!(args.scopes, vec!["read:analytics", "write:analytics"]);
        assert_eq!(args.expires_in, Some(Duration::from_secs(1800)));
        assert!(args.audience.is_none());
    }

    #[test]
    fn test_issue_claims() {
        let cli = Cli::parse_from([
            "auth-access",
            "issue",
            "-p",
            "p",
            "-r",
            "client",
            "--claim",
            "tier=3",
            "--claim",
            "region=eu-west",
        ]);

        let Commands::Issue(args) = cli.command else {
            panic!("Expected Issue command");
        };
        assert_eq!(args.claims[0], ("tier".to_string(), Value::from(3)));
        assert_eq!(args.claims[1], ("region".to_string(), Value::from("eu-west")));
    }

    #[test]
    fn test_invalid_claim_rejected() {
        let result = Cli::try_parse_from([
            "auth-access", "issue", "-p", "p", "-r", "client", "--claim", "novalue",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let result = Cli::try_parse_from([
            "auth-access", "issue", "-p", "p", "-r", "client", "--expires-in", "soon",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bare_seconds_duration() {
        let cli = Cli::parse_from(["auth-access", "refresh", "tok", "-e", "90"]);
        let Commands::Refresh(args) = cli.command else {
            panic!("Expected Refresh command");
        };
        assert_eq!(args.expires_in, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["auth-access", "validate", "abc.def.ghi", "--audience", "api"]);
        let Commands::Validate(args) = cli.command else {
            panic!("Expected Validate command");
        };
        assert_eq!(args.token, "abc.def.ghi");
        assert_eq!(args.audience.as_deref(), Some("api"));
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["auth-access", "-c", "/etc/auth/auth.yaml", "version"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/auth/auth.yaml")));
    }

    #[test]
    fn test_scopes_format() {
        let cli = Cli::parse_from(["auth-access", "scopes", "admin", "-f", "json"]);
        let Commands::Scopes(args) = cli.command else {
            panic!("Expected Scopes command");
        };
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_quiet_and_verbose() {
        let cli = Cli::parse_from(["auth-access", "-q", "version"]);
        assert_eq!(cli.effective_log_level(), "error");

        let cli = Cli::parse_from(["auth-access", "-v", "version"]);
        assert_eq!(cli.effective_log_level(), "debug");
    }

    #[test]
    fn test_log_format() {
        let cli = Cli::parse_from(["auth-access", "--log-format", "json", "version"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["auth-access", "--log-format", "compact", "version"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["auth-access"]).is_err());
    }
}
