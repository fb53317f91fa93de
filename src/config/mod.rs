//! Configuration file management
//!
//! Loads TOML configuration files and provides pipeline settings.
//! Default config path: ~/.config/evchar/config.toml

use anyhow::{anyhow, bail, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::input::keymap::{Keymaps, Layout};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device discovery settings
    pub devices: DeviceConfig,
    /// Reader thread settings
    pub reader: ReaderConfig,
    /// Key table settings
    pub keymap: KeymapConfig,
}

/// Device discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Directory scanned for device nodes (default: /dev/input)
    pub dir: PathBuf,
    /// File name prefix of candidate nodes (default: "event")
    pub prefix: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/dev/input"),
            prefix: "event".to_string(),
        }
    }
}

/// Reader thread settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// How long a reader waits on its device before checking for shutdown
    /// (milliseconds, default: 100)
    pub poll_interval_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
        }
    }
}

/// Key table settings
///
/// ```toml
/// [keymap]
/// layout = "us"
///
/// [keymap.plain]
/// 41 = "`"
///
/// [keymap.shifted]
/// 41 = "~"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapConfig {
    /// Base layout: "gb" (default) or "us"
    pub layout: Layout,
    /// Unshifted overrides: decimal key code -> single character
    pub plain: BTreeMap<String, String>,
    /// Shifted overrides: decimal key code -> single character
    pub shifted: BTreeMap<String, String>,
}

impl KeymapConfig {
    /// Build the key tables, applying any overrides
    pub fn keymaps(&self) -> Result<Keymaps> {
        let plain = parse_overrides(&self.plain).context("Invalid [keymap.plain] entry")?;
        let shifted = parse_overrides(&self.shifted).context("Invalid [keymap.shifted] entry")?;
        Ok(Keymaps::with_overrides(self.layout, plain, shifted))
    }
}

/// Parse `"30" = "a"` style entries
fn parse_overrides(entries: &BTreeMap<String, String>) -> Result<Vec<(u16, char)>> {
    entries
        .iter()
        .map(|(code, sym)| -> Result<(u16, char)> {
            let code: u16 = code
                .trim()
                .parse()
                .map_err(|_| anyhow!("key code must be a number: {:?}", code))?;
            let mut chars = sym.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok((code, c)),
                _ => bail!("key {} must map to exactly one character, got {:?}", code, sym),
            }
        })
        .collect()
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/evchar/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. EVCHAR_CONFIG environment variable
        if let Ok(path) = std::env::var("EVCHAR_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/evchar/config.toml
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/evchar/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. EVCHAR_CONFIG environment variable
    /// 2. ~/.config/evchar/config.toml (user config)
    /// 3. /etc/evchar/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse TOML config text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write the built-in defaults to the user config path
    pub fn write_default_config() -> Result<PathBuf> {
        let config_path =
            default_config_path().ok_or_else(|| anyhow!("Cannot determine config directory"))?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let body = toml::to_string_pretty(&Self::default()).context("Failed to serialize config")?;
        let content = format!(
            "# evchar configuration\n\
             # Key overrides go in [keymap.plain] / [keymap.shifted] as\n\
             # <decimal key code> = \"<character>\"\n\n{}",
            body
        );
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        info!("Wrote default config: {}", config_path.display());
        Ok(config_path)
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("evchar").join("config.toml"))
}
