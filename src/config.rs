//! TOML-based configuration system.
//!
//! Loaded once at startup and never re-validated. Every struct implements
//! `Default`, so a missing or partial config file yields a working shell for
//! the default site.
//!
//! ## Config file search order
//!
//! 1. `ORDERSHELL_CONFIG` environment variable (explicit override)
//! 2. Next to the executable (`<exe_dir>/config.toml`)
//! 3. Platform config directory (`%APPDATA%\OrderShell\config.toml` on Windows)
//! 4. Current working directory (`./config.toml`)
//! 5. No file found → `Config::default()`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::classifier::{AllowList, Classifier, UnknownHostPolicy};
use crate::rules::{PLATFORM_DOMAINS, RuleSet};

const CONFIG_ENV: &str = "ORDERSHELL_CONFIG";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Config structs
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub navigation: NavigationConfig,
    pub display: DisplayConfig,
}

/// The ordering site rendered by the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub start_url: String,
    /// Display name. Empty = derived from the start URL host.
    pub name: String,
    /// Extra exact hosts trusted on top of the start URL host.
    pub allowed_hosts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Verdict for hosts no rule recognises.
    pub external_handoff: UnknownHostPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub disable_zoom: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            start_url: "https://pizzamadeinitaly.kuriersoft.ch/".to_string(),
            name: String::new(),
            allowed_hosts: Vec::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { disable_zoom: true }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived values
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Effective allow-list: the start URL host, its `www.` twin, and the
    /// configured extras. When the start URL has no host, the platform
    /// domains stand in for it.
    pub fn allow_list(&self) -> AllowList {
        let mut hosts: Vec<String> = Vec::new();

        match start_host(&self.site.start_url) {
            Some(host) => {
                if !host.starts_with("www.") {
                    hosts.push(format!("www.{host}"));
                }
                hosts.push(host);
            }
            None => {
                warn!(url = %self.site.start_url, "Start URL has no host, falling back to platform domains");
                for domain in PLATFORM_DOMAINS {
                    hosts.push((*domain).to_string());
                    hosts.push(format!("www.{domain}"));
                }
            }
        }

        hosts.extend(self.site.allowed_hosts.iter().cloned());
        hosts.into_iter().collect()
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(
            self.allow_list(),
            RuleSet::builtin(),
            self.navigation.external_handoff,
        )
    }

    /// Name shown by the host app. Without an explicit `site.name`, known
    /// restaurants get their proper name from [`KNOWN_NAMES`]; anything else
    /// falls back to the first label of the start URL host (`www.` skipped),
    /// then to `"Restaurant"`.
    pub fn display_name(&self) -> String {
        let name = self.site.name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        let host = start_host(&self.site.start_url);
        if let Some(host) = &host
            && let Some((_, known)) = KNOWN_NAMES
                .iter()
                .find(|(needle, _)| host.contains(*needle))
        {
            return (*known).to_string();
        }
        host.and_then(|host| {
            host.trim_start_matches("www.")
                .split('.')
                .next()
                .filter(|label| !label.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Restaurant".to_string())
    }
}

/// Host fragment → display name, first match wins.
pub const KNOWN_NAMES: &[(&str, &str)] = &[
    ("pizzafulmine", "Pizzafulmine"),
    ("roemerhof", "Römerhof"),
    ("pizzamadeinitaly", "Pizza Made in Italy"),
];

fn start_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(str::to_ascii_lowercase)
}

// ─────────────────────────────────────────────────────────────────────────────
// Config loading and saving
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Loads configuration from the standard locations. Never panics —
    /// returns defaults if no file is found or if it cannot be used.
    pub fn load() -> Self {
        match find_config_path() {
            Some(path) => Self::load_or_default(&path),
            None => {
                info!("No config file found, using defaults");
                Config::default()
            }
        }
    }

    /// Like [`Config::load_from`], but logs and falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Config unusable, using defaults");
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Saves configuration to the platform config directory.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = save_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Searches for a config file in the standard locations.
fn find_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let p = PathBuf::from(path);
        if p.is_file() {
            return Some(p);
        }
        warn!(path = %p.display(), "{CONFIG_ENV} does not point to a file");
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let p = dir.join(CONFIG_FILE);
        if p.is_file() {
            return Some(p);
        }
    }

    if let Some(dir) = platform_config_dir() {
        let p = dir.join(CONFIG_FILE);
        if p.is_file() {
            return Some(p);
        }
    }

    let p = PathBuf::from(CONFIG_FILE);
    if p.is_file() {
        return Some(p);
    }

    None
}

fn save_path() -> PathBuf {
    platform_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE)
}

/// Returns the platform config directory without adding a dependency.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join("OrderShell"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .or_else(|| std::env::var("HOME").ok().map(|h| format!("{h}/.config")))
            .map(|dir| PathBuf::from(dir).join("ordershell"))
    }
}
