//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chatbox/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::channel::LoopbackSettings;
use crate::channel::loopback::DEFAULT_ECHO_DELAY_MS;
use crate::core::appearance::{Appearance, DEFAULT_ANONYMOUS_LABEL, DEFAULT_FEATURED_BADGE};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub loopback: LoopbackConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub client_id: Option<String>,
    pub featured_author: Option<String>,
    pub featured_badge: Option<String>,
    pub anonymous_label: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoopbackConfig {
    pub echo_delay_ms: Option<u64>,
    pub fail_sends: Option<bool>,
    pub redeliver: Option<bool>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub client_id: Option<String>,
    pub appearance: Appearance,
    pub loopback: LoopbackSettings,
}

/// Values supplied on the command line. `None` = flag not given.
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub client_id: Option<&'a str>,
    pub featured_author: Option<&'a str>,
    pub fail_sends: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.chatbox/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chatbox").join("config.toml"))
}

/// Load config from `~/.chatbox/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfig::default()`.
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(ChatConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ChatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Chatbox Configuration
# All settings are optional; defaults are used for anything left out.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# client_id = "alice"              # Or set CHATBOX_CLIENT_ID, or pass --client-id
# featured_author = "moderator"    # Or set CHATBOX_FEATURED_AUTHOR, or pass --featured-author
# featured_badge = "OFFICIAL"
# anonymous_label = "anonymous"

# [loopback]
# echo_delay_ms = 150
# fail_sends = false               # Reject every send (exercise the failure path)
# redeliver = false                # Deliver every message twice
"#;

fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &ChatConfig,
    cli: &CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Client id: CLI → env → config → anonymous
    let client_id = cli
        .client_id
        .map(str::to_string)
        .or_else(|| env("CHATBOX_CLIENT_ID"))
        .or_else(|| config.general.client_id.clone())
        .filter(|id| !id.trim().is_empty());

    // Featured author: CLI → env → config → nobody
    let featured_author = cli
        .featured_author
        .map(str::to_string)
        .or_else(|| env("CHATBOX_FEATURED_AUTHOR"))
        .or_else(|| config.general.featured_author.clone())
        .filter(|id| !id.trim().is_empty());

    let appearance = Appearance {
        featured_author,
        featured_badge: config
            .general
            .featured_badge
            .clone()
            .unwrap_or_else(|| DEFAULT_FEATURED_BADGE.to_string()),
        anonymous_label: config
            .general
            .anonymous_label
            .clone()
            .unwrap_or_else(|| DEFAULT_ANONYMOUS_LABEL.to_string()),
    };

    let loopback = LoopbackSettings {
        client_id: client_id.clone(),
        echo_delay: Duration::from_millis(
            config
                .loopback
                .echo_delay_ms
                .unwrap_or(DEFAULT_ECHO_DELAY_MS),
        ),
        fail_sends: cli.fail_sends || config.loopback.fail_sends.unwrap_or(false),
        redeliver: config.loopback.redeliver.unwrap_or(false),
    };

    ResolvedConfig {
        client_id,
        appearance,
        loopback,
    }
}
