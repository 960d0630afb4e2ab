//! Configuration file parsing and management.
//!
//! This module handles loading scan defaults from TOML files and from
//! `KS_*` environment variables, with the CLI merging everything in
//! precedence order: CLI arguments > environment > local file > global
//! file > XDG file > built-in defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// combo_length = 2
/// tld = ".net"
/// cachefile = "/var/cache/kana/verdicts.cache"
///
/// syllables = ["ka", "ki", "ku"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Replacement syllable alphabet. Changing it invalidates existing
    /// caches, so this belongs in a per-project config next to its cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllables: Option<Vec<String>>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default combination length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo_length: Option<usize>,

    /// Default prefix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Default suffix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Default TLD (with leading dot)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tld: Option<String>,

    /// Default cache file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cachefile: Option<String>,

    /// Default probe timeout (as string, e.g., "5s", "30s", "2m"),
    /// applied to both DNS and WHOIS probes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, ScanError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScanError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ScanError::config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks in the XDG config directory, then the home directory, then the
    /// working directory, later files overriding earlier ones field by field.
    pub fn discover_and_load(&self) -> Result<FileConfig, ScanError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        // 1. XDG config (lowest precedence)
        if let Some(xdg_path) = self.xdg_config_path() {
            if let Ok(config) = self.load_file(&xdg_path) {
                merged_config = merge_configs(merged_config, config);
                loaded_files.push(xdg_path);
            }
        }

        // 2. Global config in the home directory
        if let Some(global_path) = self.global_config_path() {
            if let Ok(config) = self.load_file(&global_path) {
                merged_config = merge_configs(merged_config, config);
                loaded_files.push(global_path);
            }
        }

        // 3. Local config (highest precedence)
        if let Some(local_path) = self.local_config_path() {
            if let Ok(config) = self.load_file(&local_path) {
                merged_config = merge_configs(merged_config, config);
                loaded_files.push(local_path);
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            eprintln!("Multiple config files found. Using precedence:");
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "active"
                } else {
                    "overridden"
                };
                eprintln!("   {} ({})", path.display(), status);
            }
        }

        Ok(merged_config)
    }

    /// Configuration file in the current directory.
    fn local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./kana-scan.toml", "./.kana-scan.toml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        None
    }

    /// Configuration file in the user's home directory.
    fn global_config_path(&self) -> Option<PathBuf> {
        if let Some(home) = env::var_os("HOME") {
            let candidates = [".kana-scan.toml", "kana-scan.toml"];

            for candidate in &candidates {
                let path = Path::new(&home).join(candidate);
                if path.exists() {
                    return Some(path);
                }
            }
        }

        None
    }

    /// Configuration file per the XDG Base Directory Specification.
    fn xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("kana-scan").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), ScanError> {
        if let Some(defaults) = &config.defaults {
            if let Some(combo_length) = defaults.combo_length {
                if combo_length == 0 {
                    return Err(ScanError::config("combo_length must be at least 1"));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(ScanError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }
        }

        if let Some(syllables) = &config.syllables {
            if syllables.is_empty() {
                return Err(ScanError::config("syllables list cannot be empty"));
            }
            for syllable in syllables {
                if syllable.is_empty() || !syllable.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(ScanError::config(format!(
                        "Invalid syllable '{}': must be non-empty and alphanumeric",
                        syllable
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Merge two configurations, `higher` winning field by field.
fn merge_configs(lower: FileConfig, higher: FileConfig) -> FileConfig {
    FileConfig {
        defaults: match (lower.defaults, higher.defaults) {
            (Some(mut lower_defaults), Some(higher_defaults)) => {
                if higher_defaults.combo_length.is_some() {
                    lower_defaults.combo_length = higher_defaults.combo_length;
                }
                if higher_defaults.prefix.is_some() {
                    lower_defaults.prefix = higher_defaults.prefix;
                }
                if higher_defaults.suffix.is_some() {
                    lower_defaults.suffix = higher_defaults.suffix;
                }
                if higher_defaults.tld.is_some() {
                    lower_defaults.tld = higher_defaults.tld;
                }
                if higher_defaults.cachefile.is_some() {
                    lower_defaults.cachefile = higher_defaults.cachefile;
                }
                if higher_defaults.timeout.is_some() {
                    lower_defaults.timeout = higher_defaults.timeout;
                }
                Some(lower_defaults)
            }
            (None, Some(higher_defaults)) => Some(higher_defaults),
            (Some(lower_defaults), None) => Some(lower_defaults),
            (None, None) => None,
        },
        syllables: higher.syllables.or(lower.syllables),
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// These are the values that can be set via `KS_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub combo_length: Option<usize>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub tld: Option<String>,
    pub cachefile: Option<String>,
    pub timeout: Option<String>,
}

/// Load configuration from environment variables.
///
/// Parses all `KS_*` environment variables. Invalid values are reported as
/// warnings (when `verbose`) and ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    let mut env_config = EnvConfig::default();

    // KS_COMBO_LENGTH - syllables per candidate root
    if let Ok(val) = env::var("KS_COMBO_LENGTH") {
        match val.parse::<usize>() {
            Ok(combo_length) if combo_length > 0 => {
                env_config.combo_length = Some(combo_length);
                if verbose {
                    eprintln!("Using KS_COMBO_LENGTH={}", combo_length);
                }
            }
            _ => {
                if verbose {
                    eprintln!("Invalid KS_COMBO_LENGTH='{}', must be a positive integer", val);
                }
            }
        }
    }

    // KS_PREFIX / KS_SUFFIX - affixes around the root
    if let Ok(prefix) = env::var("KS_PREFIX") {
        env_config.prefix = Some(prefix);
    }
    if let Ok(suffix) = env::var("KS_SUFFIX") {
        env_config.suffix = Some(suffix);
    }

    // KS_TLD - TLD with leading dot
    if let Ok(tld) = env::var("KS_TLD") {
        if !tld.trim().is_empty() {
            env_config.tld = Some(tld.trim().to_string());
        }
    }

    // KS_CACHEFILE - cache snapshot path
    if let Ok(cachefile) = env::var("KS_CACHEFILE") {
        if !cachefile.trim().is_empty() {
            env_config.cachefile = Some(cachefile);
        }
    }

    // KS_TIMEOUT - probe timeout
    if let Ok(timeout_str) = env::var("KS_TIMEOUT") {
        if parse_timeout_string(&timeout_str).is_some() {
            env_config.timeout = Some(timeout_str);
        } else if verbose {
            eprintln!(
                "Invalid KS_TIMEOUT='{}', use format like '5s', '30s', '2m'",
                timeout_str
            );
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| m * 60)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}
