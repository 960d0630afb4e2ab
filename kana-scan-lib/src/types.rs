//! Core data types for the syllable-combination domain scanner.
//!
//! This module defines all the main data structures used throughout the library,
//! including verdicts, tier outcomes, scan configuration, and progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::syllables::default_syllables;

/// Final classification recorded for a fully-qualified name.
///
/// A verdict is final for the lifetime of the cache: once a name has one,
/// the scanner never checks that name again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The name is registered
    #[serde(rename = "exists")]
    Exists,

    /// The name can be registered
    #[serde(rename = "available")]
    Available,
}

/// Result of probing one tier of the existence-check protocol.
///
/// The tier chain stops at the first `Found` (registered) or `NotFound`
/// (available) and keeps going on `Inconclusive`. Only the registry tier
/// can produce a definitive `NotFound`; the DNS tiers report `Inconclusive`
/// on failure because a transient resolver error is indistinguishable from
/// absence at that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierOutcome {
    /// Positive evidence the name is registered
    Found,

    /// Definitive evidence the name is not registered
    NotFound,

    /// This tier could not decide either way
    Inconclusive,
}

/// Configuration for a scan run.
///
/// Covers the name-building parameters (prefix, root length, suffix, TLD),
/// the cache location, the syllable alphabet, and the per-probe timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// String prepended to every candidate root
    pub prefix: String,

    /// String appended to every candidate root, before the TLD
    pub suffix: String,

    /// Number of syllables per candidate root
    /// Default: 3
    pub combo_length: usize,

    /// TLD appended verbatim to every candidate (e.g. ".com")
    pub tld: String,

    /// Path of the persisted verdict cache
    pub cache_file: PathBuf,

    /// Ordered syllable alphabet used to build candidate roots.
    /// Defaults to the built-in kana list.
    pub syllables: Vec<String>,

    /// Timeout for each DNS probe (forward resolution and SOA lookup)
    /// Default: 5 seconds
    #[serde(skip)] // Don't serialize Duration directly
    pub dns_timeout: Duration,

    /// Timeout for each WHOIS query
    /// Default: 10 seconds
    #[serde(skip)] // Don't serialize Duration directly
    pub whois_timeout: Duration,
}

impl Default for ScanConfig {
    /// Create a sensible default configuration.
    ///
    /// Mirrors the CLI defaults: three-syllable roots, no affixes, `.com`,
    /// cache in `kana_domains.cache` in the working directory.
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            combo_length: 3,
            tld: ".com".to_string(),
            cache_file: PathBuf::from("kana_domains.cache"),
            syllables: default_syllables(),
            dns_timeout: Duration::from_secs(5),
            whois_timeout: Duration::from_secs(10),
        }
    }
}

impl ScanConfig {
    /// Set the prefix prepended to every candidate root.
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the suffix appended to every candidate root.
    pub fn with_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the number of syllables per candidate root.
    pub fn with_combo_length(mut self, r: usize) -> Self {
        self.combo_length = r;
        self
    }

    /// Set the TLD. Appended verbatim, so include the leading dot.
    pub fn with_tld<S: Into<String>>(mut self, tld: S) -> Self {
        self.tld = tld.into();
        self
    }

    /// Set the cache file path.
    pub fn with_cache_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cache_file = path.into();
        self
    }

    /// Replace the syllable alphabet.
    pub fn with_syllables(mut self, syllables: Vec<String>) -> Self {
        self.syllables = syllables;
        self
    }

    /// Build the fully-qualified name for a candidate root.
    ///
    /// This is the unit of identity for caching and checking:
    /// `prefix + root + suffix + tld`, concatenated verbatim.
    pub fn qualified_name(&self, root: &str) -> String {
        format!("{}{}{}{}", self.prefix, root, self.suffix, self.tld)
    }
}

/// Snapshot of scan progress, delivered to the progress observer after
/// every candidate (checked or skipped).
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Candidates handled so far, including cache skips
    pub processed: usize,

    /// Total number of candidates in this scan
    pub total: usize,

    /// Available names found during this run
    pub available: usize,

    /// Wall-clock time since the scan loop started
    pub elapsed: Duration,

    /// Estimated seconds remaining, None until at least one candidate
    /// has been processed
    pub eta_seconds: Option<u64>,
}

/// How the scan loop terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    /// The candidate sequence was exhausted
    #[serde(rename = "completed")]
    Completed,

    /// The interrupt flag was raised and the loop stopped early
    #[serde(rename = "interrupted")]
    Interrupted,
}

/// Final report surfaced to the caller after the cache has been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// How the scan ended
    pub status: ScanStatus,

    /// Candidates handled during this run, including cache skips
    pub processed: usize,

    /// Total number of candidates the scan would cover
    pub total: usize,

    /// Available names newly discovered during this run
    pub found_this_run: usize,

    /// Every name currently marked available in the cache, sorted
    pub available: Vec<String>,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Exists => write!(f, "exists"),
            Verdict::Available => write!(f, "available"),
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Completed => write!(f, "completed"),
            ScanStatus::Interrupted => write!(f, "interrupted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_concatenation() {
        let config = ScanConfig::default()
            .with_prefix("get")
            .with_suffix("app")
            .with_tld(".io");
        assert_eq!(config.qualified_name("kaki"), "getkakiapp.io");
    }

    #[test]
    fn test_qualified_name_bare() {
        let config = ScanConfig::default().with_tld(".test");
        assert_eq!(config.qualified_name("ka"), "ka.test");
    }

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.combo_length, 3);
        assert_eq!(config.tld, ".com");
        assert_eq!(config.cache_file, PathBuf::from("kana_domains.cache"));
        assert!(!config.syllables.is_empty());
    }
}
