// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging for the CLI.
//!
//! Diagnostics go to stderr; stdout carries only command output such as
//! issued tokens. The requested level applies to the auth crates while
//! dependencies stay at `warn` or quieter.

use std::cmp;
use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormat;

/// Crates whose events follow the requested level.
const AUTH_TARGETS: &[&str] = &["auth_access_core", "auth_access_api", "auth_access_bin"];

// =============================================================================
// Initialization
// =============================================================================

/// Installs the global subscriber.
///
/// `RUST_LOG` replaces the default filter when set.
pub fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let text = (format == LogFormat::Text).then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_ansi(io::stderr().is_terminal())
    });
    let json = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_writer(io::stderr)
            .flatten_event(true)
            .with_current_span(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

/// Builds the filter used when `RUST_LOG` is unset.
pub fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::builder().parse_lossy(filter_directives(level))
}

/// Renders the default directives, e.g.
/// `warn,auth_access_core=debug,auth_access_api=debug,auth_access_bin=debug`.
pub fn filter_directives(level: &str) -> String {
    let level = parse_level(level);
    let base = cmp::min(level, Level::WARN);

    let mut directives = lower(base);
    for target in AUTH_TARGETS {
        directives.push(',');
        directives.push_str(target);
        directives.push('=');
        directives.push_str(&lower(level));
    }
    directives
}

/// Parses a level name, falling back to `warn`.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn lower(level: Level) -> String {
    level.as_str().to_ascii_lowercase()
}

// =============================================================================
// Tests
// =============================================================================
