// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration for the token and scope managers.
//!
//! # Loading Pipeline
//!
//! 1. Read the YAML/TOML/JSON file selected by extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw text
//! 3. Deserialize into [`AuthConfig`]
//! 4. Fill fields left unset from prefixed environment variables
//!
//! # Environment Fallback
//!
//! ```text
//! AUTH_ACCESS_ISSUER=localpro
//! AUTH_ACCESS_PRIVATE_KEY_PATH=/etc/auth/private.pem
//! AUTH_ACCESS_PUBLIC_KEY_PATH=/etc/auth/public.pem
//! AUTH_ACCESS_ALGORITHM=RS256
//! AUTH_ACCESS_EXPIRES_IN=1h
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default issuer asserted in every credential.
pub const DEFAULT_ISSUER: &str = "localpro";

/// Default signing algorithm.
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::RS256;

/// Default credential lifetime.
pub const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(60 * 60);

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "AUTH_ACCESS";

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// ConfigError
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration or key file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// File I/O error.
    #[error("Failed to read file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to deserialize configuration content.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// The file extension does not name a supported format.
    #[error("Unsupported config format: {format}")]
    UnsupportedFormat {
        /// The rejected extension.
        format: String,
    },

    /// A fallback environment variable holds an unusable value.
    #[error("Invalid environment variable '{name}': {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A configuration field holds an unusable value.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an invalid environment variable error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// AuthConfig
// =============================================================================

/// Construction-time configuration for the token manager.
///
/// Every field is optional. Unset fields may be filled from the environment
/// with [`AuthConfig::with_env_fallback`]; remaining gaps fall back to the
/// built-in defaults through the accessor methods.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Issuer asserted in and required of every credential.
    pub issuer: Option<String>,

    /// Inline signing key (PEM text, or the raw secret for HMAC).
    pub private_key: Option<String>,

    /// Inline verification key (PEM text, or the raw secret for HMAC).
    pub public_key: Option<String>,

    /// Path to the signing key. Ignored when `private_key` is set.
    pub private_key_path: Option<PathBuf>,

    /// Path to the verification key. Ignored when `public_key` is set.
    pub public_key_path: Option<PathBuf>,

    /// Signing algorithm; also the only algorithm accepted at verification.
    pub algorithm: Option<Algorithm>,

    /// Lifetime of issued credentials.
    #[serde(with = "lifetime_serde")]
    pub default_expires_in: Option<Duration>,

    /// Leeway applied to `exp` and `nbf` checks.
    #[serde(with = "humantime_serde")]
    pub clock_tolerance: Duration,

    /// Accept roles outside the hierarchy at issuance.
    pub allow_unknown_roles: bool,
}

impl AuthConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from the default-prefixed environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_env_fallback(DEFAULT_ENV_PREFIX)
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the inline signing key.
    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Sets the inline verification key.
    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    /// Sets the signing key path.
    pub fn with_private_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    /// Sets the verification key path.
    pub fn with_public_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_key_path = Some(path.into());
        self
    }

    /// Sets the signing algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Sets the default credential lifetime.
    pub fn with_default_expires_in(mut self, lifetime: Duration) -> Self {
        self.default_expires_in = Some(lifetime);
        self
    }

    /// Sets the clock tolerance.
    pub fn with_clock_tolerance(mut self, tolerance: Duration) -> Self {
        self.clock_tolerance = tolerance;
        self
    }

    /// Allows roles outside the hierarchy at issuance.
    pub fn with_allow_unknown_roles(mut self, allow: bool) -> Self {
        self.allow_unknown_roles = allow;
        self
    }

    // =========================================================================
    // Resolved Values
    // =========================================================================

    /// Returns the issuer, or the default.
    pub fn issuer(&self) -> &str {
        self.issuer.as_deref().unwrap_or(DEFAULT_ISSUER)
    }

    /// Returns the algorithm, or the default.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm.unwrap_or(DEFAULT_ALGORITHM)
    }

    /// Returns the default lifetime, or the built-in default.
    pub fn default_expires_in(&self) -> Duration {
        self.default_expires_in.unwrap_or(DEFAULT_EXPIRES_IN)
    }

    /// Returns the signing key bytes. Inline material wins over a path.
    pub fn private_key_material(&self) -> ConfigResult<Option<Vec<u8>>> {
        key_material(self.private_key.as_deref(), self.private_key_path.as_deref())
    }

    /// Returns the verification key bytes. Inline material wins over a path.
    pub fn public_key_material(&self) -> ConfigResult<Option<Vec<u8>>> {
        key_material(self.public_key.as_deref(), self.public_key_path.as_deref())
    }

    // =========================================================================
    // Environment Fallback
    // =========================================================================

    /// Fills unset fields from `<PREFIX>_*` environment variables.
    pub fn with_env_fallback(self, prefix: &str) -> ConfigResult<Self> {
        self.with_fallback_from(prefix, |name| env::var(name).ok())
    }

    /// Fills unset fields from a variable lookup.
    pub fn with_fallback_from<F>(mut self, prefix: &str, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            let name = format!("{prefix}_{suffix}");
            lookup(&name).filter(|v| !v.is_empty()).map(|v| (name, v))
        };

        if self.issuer.is_none() {
            self.issuer = var("ISSUER").map(|(_, v)| v);
        }
        if self.private_key.is_none() {
            self.private_key = var("PRIVATE_KEY").map(|(_, v)| v);
        }
        if self.public_key.is_none() {
            self.public_key = var("PUBLIC_KEY").map(|(_, v)| v);
        }
        if self.private_key_path.is_none() {
            self.private_key_path = var("PRIVATE_KEY_PATH").map(|(_, v)| PathBuf::from(v));
        }
        if self.public_key_path.is_none() {
            self.public_key_path = var("PUBLIC_KEY_PATH").map(|(_, v)| PathBuf::from(v));
        }
        if self.algorithm.is_none() {
            if let Some((name, value)) = var("ALGORITHM") {
                let algorithm = Algorithm::from_str(value.trim())
                    .map_err(|_| ConfigError::invalid_env_var(name, "unknown algorithm"))?;
                self.algorithm = Some(algorithm);
            }
        }
        if self.default_expires_in.is_none() {
            if let Some((name, value)) = var("EXPIRES_IN") {
                let lifetime = parse_lifetime(&value)
                    .map_err(|e| ConfigError::invalid_env_var(name, e.to_string()))?;
                self.default_expires_in = Some(lifetime);
            }
        }

        Ok(self)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("AuthConfig")
            .field("issuer", &self.issuer)
            .field("private_key", &redact(&self.private_key))
            .field("public_key", &self.public_key.as_ref().map(|_| "<inline>"))
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .field("algorithm", &self.algorithm)
            .field("default_expires_in", &self.default_expires_in)
            .field("clock_tolerance", &self.clock_tolerance)
            .field("allow_unknown_roles", &self.allow_unknown_roles)
            .finish()
    }
}

fn key_material(inline: Option<&str>, path: Option<&Path>) -> ConfigResult<Option<Vec<u8>>> {
    if let Some(inline) = inline {
        return Ok(Some(inline.as_bytes().to_vec()));
    }

    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::file_not_found(path));
            }
            fs::read(path).map(Some).map_err(|e| ConfigError::io(path, e))
        }
        None => Ok(None),
    }
}

// =============================================================================
// Lifetime Parsing
// =============================================================================

/// Parses a credential lifetime.
///
/// Accepts humantime syntax (`"30m"`, `"24h"`, `"7d"`, `"0s"`) or a bare
/// integer meaning seconds.
pub fn parse_lifetime(input: &str) -> ConfigResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ConfigError::invalid_value("expires_in", "empty lifetime"));
    }

    if input.bytes().all(|b| b.is_ascii_digit()) {
        return input
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::invalid_value("expires_in", e.to_string()));
    }

    humantime::parse_duration(input)
        .map_err(|e| ConfigError::invalid_value("expires_in", e.to_string()))
}

mod lifetime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lifetime {
        Seconds(u64),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.collect_str(&humantime::format_duration(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Lifetime>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Lifetime::Seconds(secs)) => Ok(Some(Duration::from_secs(secs))),
            Some(Lifetime::Text(text)) => super::parse_lifetime(&text)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Loads [`AuthConfig`] from files and the environment.
///
/// # Examples
///
/// ```no_run
/// use auth_access_core::config::ConfigLoader;
///
/// let config = ConfigLoader::new().load("auth.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply the environment fallback.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Returns the environment variable prefix.
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    ///
    /// Relative key paths are resolved against the file's directory.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<AuthConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading auth configuration");

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let format = ConfigFormat::from_path(path)?;

        let mut config = self.load_from_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        if let Some(base) = path.parent() {
            resolve_relative(&mut config.private_key_path, base);
            resolve_relative(&mut config.public_key_path, base);
        }

        debug!(
            issuer = config.issuer(),
            algorithm = ?config.algorithm(),
            "Auth configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<AuthConfig> {
        let content = if self.resolve_env_vars {
            resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        let config: AuthConfig = parse_str(&content, format)?;

        if self.resolve_env_vars {
            config.with_env_fallback(&self.env_prefix)
        } else {
            Ok(config)
        }
    }

    /// Builds configuration from the environment alone.
    pub fn load_from_env(&self) -> ConfigResult<AuthConfig> {
        AuthConfig::default().with_env_fallback(&self.env_prefix)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_relative(path: &mut Option<PathBuf>, base: &Path) {
    if let Some(p) = path {
        if p.is_relative() && !base.as_os_str().is_empty() {
            let joined = base.join(p.as_path());
            *p = joined;
        }
    }
}

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => {
            let config = config::Config::builder()
                .add_source(config::File::from_str(content, config::FileFormat::Yaml))
                .build()
                .map_err(|e| ConfigError::serialization(e.to_string()))?;
            config
                .try_deserialize()
                .map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
///
/// Unknown variables without a default are left in place.
fn resolve_env_placeholders(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next();

        let mut var_content = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_content.push(c);
        }

        if !found_close {
            result.push_str("${");
            result.push_str(&var_content);
            continue;
        }

        let (var_name, default_value) = match var_content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (var_content.as_str(), None),
        };

        match (env::var(var_name), default_value) {
            (Ok(value), _) => result.push_str(&value),
            (Err(_), Some(default)) => result.push_str(default),
            (Err(_), None) => {
                warn!(variable = var_name, "Environment variable not found");
                result.push_str(&format!("${{{var_name}}}"));
            }
        }
    }

    result
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
