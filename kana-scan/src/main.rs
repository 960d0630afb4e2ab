//! Kana Scan CLI Application
//!
//! A command-line interface for sweeping kana-syllable domain name
//! combinations and reporting the available ones. This CLI application
//! provides a user-friendly interface to the kana-scan-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use kana_scan_lib::{
    combination_count, load_env_config, parse_timeout_string, ConfigManager, ExistenceChecker,
    FileConfig, NameGenerator, ScanConfig, ScanEngine,
};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for kana-scan
#[derive(Parser, Debug)]
#[command(name = "kana-scan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Sweep kana-syllable domain combinations and report the available ones")]
#[command(
    long_about = "Enumerates every combination of syllables from the built-in kana alphabet,\nchecks each candidate domain via DNS resolution, SOA lookup and WHOIS fallback,\nand prints the available names. Verdicts persist in a cache file, so an\ninterrupted sweep resumes where it left off."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Number of syllables per candidate root [default: 3]
    #[arg(
        short = 'r',
        long = "combo-length",
        value_name = "N",
        help_heading = "Scan"
    )]
    pub combo_length: Option<usize>,

    /// String prepended to every candidate root [default: none]
    #[arg(long = "prefix", value_name = "STRING", help_heading = "Scan")]
    pub prefix: Option<String>,

    /// String appended to every candidate root, before the TLD [default: none]
    #[arg(long = "suffix", value_name = "STRING", help_heading = "Scan")]
    pub suffix: Option<String>,

    /// TLD for every candidate [default: .com]
    #[arg(long = "tld", value_name = "TLD", help_heading = "Scan")]
    pub tld: Option<String>,

    /// Verdict cache file [default: kana_domains.cache]
    #[arg(long = "cachefile", value_name = "FILE", help_heading = "Scan")]
    pub cachefile: Option<PathBuf>,

    /// Preview the candidate names without any network checks
    #[arg(long = "dry-run", help_heading = "Output Format")]
    pub dry_run: bool,

    /// Output the final report in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show detailed debug information
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(&args);

    let config = match build_scan_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if args.dry_run {
        run_dry_run(&config, &args);
        return;
    }

    if let Err(e) = run_scan(config, &args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Route log events to stderr so stdout stays clean for the name list.
fn init_tracing(args: &Args) {
    let default_filter = if args.debug {
        "kana_scan=debug,kana_scan_lib=debug"
    } else if args.verbose {
        "kana_scan=info,kana_scan_lib=info"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the scan configuration from CLI args with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (KS_*)
/// 3. Local config file (./.kana-scan.toml)
/// 4. Global config file (~/.kana-scan.toml)
/// 5. XDG config file (~/.config/kana-scan/config.toml)
/// 6. Built-in defaults
fn build_scan_config(args: &Args) -> Result<ScanConfig, Box<dyn std::error::Error>> {
    let mut config = ScanConfig::default();

    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: Determine config file path and load config files
    let file_config = if let Some(explicit_config_path) = &args.config {
        config_manager
            .load_file(explicit_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_config_path, e))?
    } else if let Ok(env_config_path) = std::env::var("KS_CONFIG") {
        config_manager
            .load_file(&env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?
    } else {
        config_manager.discover_and_load().unwrap_or_default()
    };

    config = merge_file_config(config, file_config);

    // Step 2: Apply environment variables (KS_*)
    let env_config = load_env_config(args.verbose);
    if let Some(combo_length) = env_config.combo_length {
        config.combo_length = combo_length;
    }
    if let Some(prefix) = env_config.prefix {
        config.prefix = prefix;
    }
    if let Some(suffix) = env_config.suffix {
        config.suffix = suffix;
    }
    if let Some(tld) = env_config.tld {
        config.tld = tld;
    }
    if let Some(cachefile) = env_config.cachefile {
        config.cache_file = PathBuf::from(cachefile);
    }
    if let Some(timeout_str) = env_config.timeout {
        if let Some(secs) = parse_timeout_string(&timeout_str) {
            config.dns_timeout = Duration::from_secs(secs);
            config.whois_timeout = Duration::from_secs(secs);
        }
    }

    // Step 3: Apply CLI arguments (highest precedence)
    if let Some(combo_length) = args.combo_length {
        config.combo_length = combo_length;
    }
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(suffix) = &args.suffix {
        config.suffix = suffix.clone();
    }
    if let Some(tld) = &args.tld {
        config.tld = tld.clone();
    }
    if let Some(cachefile) = &args.cachefile {
        config.cache_file = cachefile.clone();
    }

    // Candidates are built by plain concatenation, so the TLD needs its dot.
    if !config.tld.is_empty() && !config.tld.starts_with('.') {
        config.tld = format!(".{}", config.tld);
    }

    if config.combo_length == 0 {
        return Err("combo length must be at least 1".into());
    }
    if config.combo_length > config.syllables.len() {
        return Err(format!(
            "combo length {} exceeds the {}-syllable alphabet",
            config.combo_length,
            config.syllables.len()
        )
        .into());
    }

    Ok(config)
}

/// Merge FileConfig values into the scan configuration.
fn merge_file_config(mut config: ScanConfig, file_config: FileConfig) -> ScanConfig {
    if let Some(defaults) = file_config.defaults {
        if let Some(combo_length) = defaults.combo_length {
            config.combo_length = combo_length;
        }
        if let Some(prefix) = defaults.prefix {
            config.prefix = prefix;
        }
        if let Some(suffix) = defaults.suffix {
            config.suffix = suffix;
        }
        if let Some(tld) = defaults.tld {
            config.tld = tld;
        }
        if let Some(cachefile) = defaults.cachefile {
            config.cache_file = PathBuf::from(cachefile);
        }
        if let Some(timeout_str) = defaults.timeout {
            if let Some(secs) = parse_timeout_string(&timeout_str) {
                config.dns_timeout = Duration::from_secs(secs);
                config.whois_timeout = Duration::from_secs(secs);
            }
        }
    }

    if let Some(syllables) = file_config.syllables {
        config.syllables = syllables;
    }

    config
}

/// Print the candidate names without touching the network.
fn run_dry_run(config: &ScanConfig, args: &Args) {
    let total = combination_count(config.syllables.len(), config.combo_length);
    let names: Vec<String> = NameGenerator::new(&config.syllables, config.combo_length)
        .map(|root| config.qualified_name(&root))
        .collect();

    if args.json {
        match serde_json::to_string_pretty(&names) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    } else {
        for name in &names {
            println!("{}", name);
        }
    }

    eprintln!("{} candidates would be checked", total);
}

/// Run the scan end to end: engine, signal handling, progress, output.
async fn run_scan(config: ScanConfig, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let total = combination_count(config.syllables.len(), config.combo_length);
    if args.verbose {
        eprintln!(
            "Scanning {} candidates (r={}, tld={}) with cache {}",
            total,
            config.combo_length,
            config.tld,
            config.cache_file.display()
        );
    }

    let checker = ExistenceChecker::new(&config);
    let engine = ScanEngine::new(config, checker);

    // First Ctrl-C stops the scan at the next candidate; the in-flight
    // check finishes, the cache persists, and the results still print.
    let interrupt = engine.interrupt_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!();
            eprintln!("Interrupt received, finishing the current check...");
            interrupt.store(true, Ordering::Relaxed);
        }
    });

    let progress_line = ui::ProgressLine::stderr();
    let render_handle = progress_line.clone();
    let mut engine = engine.with_progress(move |progress| render_handle.render(progress));

    let report = engine.run().await;
    progress_line.finish();
    let report = report?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for name in &report.available {
            println!("{}", name);
        }
        ui::print_summary(&report);
    }

    Ok(())
}
