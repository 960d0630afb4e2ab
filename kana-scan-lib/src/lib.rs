//! # Kana Scan Library
//!
//! A resumable scanner for domain names built from kana syllable combinations.
//!
//! The library enumerates every combination of `r` syllables from a fixed
//! alphabet, checks whether each resulting domain is registered, and records
//! the verdicts in a persisted cache so an interrupted sweep picks up where
//! it left off.
//!
//! Registration is decided by an escalating three-tier protocol: forward DNS
//! resolution, an authoritative SOA lookup, and finally a WHOIS registry
//! query. Ambiguous evidence always reads as "registered" so the scanner
//! never reports a false "available".
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kana_scan_lib::{ExistenceChecker, ScanConfig, ScanEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::default().with_combo_length(2);
//!     let checker = ExistenceChecker::new(&config);
//!     let mut engine = ScanEngine::new(config, checker);
//!
//!     let report = engine.run().await?;
//!     println!("{} names available", report.available.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Three-tier checking**: DNS resolution, SOA lookup, WHOIS fallback
//! - **Resumable scans**: verdicts persist across runs and interruptions
//! - **Deterministic enumeration**: combination order never changes
//! - **Observable progress**: per-candidate callback with count and ETA

// Re-export main public API types and functions
// This makes them available as kana_scan_lib::TypeName
pub use cache::ResultCache;
pub use checker::{ExistenceCheck, ExistenceChecker, Tier};
pub use config::{load_env_config, parse_timeout_string, ConfigManager, EnvConfig, FileConfig};
pub use engine::ScanEngine;
pub use error::ScanError;
pub use generate::{combination_count, NameGenerator};
pub use syllables::{default_syllables, SYLLABLES};
pub use types::{
    ScanConfig, ScanProgress, ScanReport, ScanStatus, TierOutcome, Verdict,
};

// Internal modules - these are not part of the public API surface
mod cache;
mod checker;
mod config;
mod engine;
mod error;
mod generate;
mod protocols;
mod syllables;
mod types;

// Protocol clients are exposed for callers that want to assemble their own
// tier chains.
pub use protocols::{DnsClient, WhoisClient};

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ScanError>;

// Library version metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
