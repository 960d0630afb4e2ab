// kana-scan-lib/tests/integration.rs

//! Integration tests for kana-scan-lib: the public API wired together the
//! way the CLI uses it, with stub tiers standing in for the network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kana_scan_lib::{
    combination_count, default_syllables, ExistenceChecker, NameGenerator, ResultCache,
    ScanConfig, ScanEngine, ScanError, ScanStatus, Tier, TierOutcome, Verdict, SYLLABLES,
};

/// A probe tier that answers `Found` for the listed names and a fixed
/// fallback outcome for everything else, counting every call.
struct FixedTier {
    found: Vec<String>,
    fallback: TierOutcome,
    calls: Arc<AtomicUsize>,
}

impl FixedTier {
    fn boxed(found: &[&str], fallback: TierOutcome) -> (Box<dyn Tier>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Self {
                found: found.iter().map(|s| s.to_string()).collect(),
                fallback,
                calls: calls.clone(),
            }),
            calls,
        )
    }
}

#[async_trait]
impl Tier for FixedTier {
    fn label(&self) -> &'static str {
        "fixed"
    }

    async fn probe(&self, domain: &str) -> Result<TierOutcome, ScanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.found.iter().any(|name| name == domain) {
            Ok(TierOutcome::Found)
        } else {
            Ok(self.fallback)
        }
    }
}

fn syllables(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_builtin_alphabet_drives_the_expected_space() {
    assert_eq!(SYLLABLES.len(), 43);
    assert_eq!(default_syllables().len(), 43);

    // The default scan (r = 3) covers C(43, 3) candidates.
    assert_eq!(combination_count(43, 3), 12341);
    let count = NameGenerator::new(&default_syllables(), 3).count();
    assert_eq!(count, 12341);
}

#[tokio::test]
async fn test_scan_end_to_end_with_stub_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("verdicts.cache");

    let config = ScanConfig::default()
        .with_syllables(syllables(&["ka", "ki"]))
        .with_combo_length(1)
        .with_tld(".test")
        .with_cache_file(cache_file.clone());

    // ka.test resolves at tier 1; ki.test is refuted by every tier, the
    // registry answering definitively.
    let (resolve, resolve_calls) = FixedTier::boxed(&["ka.test"], TierOutcome::Inconclusive);
    let (soa, soa_calls) = FixedTier::boxed(&[], TierOutcome::Inconclusive);
    let (registry, registry_calls) = FixedTier::boxed(&[], TierOutcome::NotFound);
    let checker = ExistenceChecker::from_tiers(vec![resolve, soa, registry]);

    let mut engine = ScanEngine::new(config, checker);
    let report = engine.run().await.unwrap();

    assert_eq!(report.status, ScanStatus::Completed);
    assert_eq!(report.processed, 2);
    assert_eq!(report.total, 2);
    assert_eq!(report.found_this_run, 1);
    assert_eq!(report.available, vec!["ki.test"]);

    // ka.test short-circuited at tier 1; only ki.test escalated.
    assert_eq!(resolve_calls.load(Ordering::SeqCst), 2);
    assert_eq!(soa_calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry_calls.load(Ordering::SeqCst), 1);

    // The snapshot on disk reproduces both verdicts.
    let mut restored = ResultCache::new();
    restored.load(&cache_file).unwrap();
    assert_eq!(restored.verdict("ka.test"), Some(Verdict::Exists));
    assert_eq!(restored.verdict("ki.test"), Some(Verdict::Available));
}

#[tokio::test]
async fn test_interrupted_scan_resumes_without_rechecking() {
    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("verdicts.cache");

    let alphabet = syllables(&["ka", "ki", "ku", "ke", "ko", "sa", "su", "se", "so", "ta"]);
    let config = ScanConfig::default()
        .with_syllables(alphabet)
        .with_combo_length(1)
        .with_tld(".test")
        .with_cache_file(cache_file.clone());

    // First run: everything resolves; stop after four candidates.
    let (resolve, _) = FixedTier::boxed(
        &[
            "ka.test", "ki.test", "ku.test", "ke.test", "ko.test", "sa.test", "su.test",
            "se.test", "so.test", "ta.test",
        ],
        TierOutcome::Inconclusive,
    );
    let (soa, _) = FixedTier::boxed(&[], TierOutcome::Inconclusive);
    let (registry, _) = FixedTier::boxed(&[], TierOutcome::NotFound);
    let checker = ExistenceChecker::from_tiers(vec![resolve, soa, registry]);

    let engine = ScanEngine::new(config.clone(), checker);
    let flag = engine.interrupt_flag();
    let mut engine = engine.with_progress(move |progress| {
        if progress.processed == 4 {
            flag.store(true, Ordering::Relaxed);
        }
    });

    let report = engine.run().await.unwrap();
    assert_eq!(report.status, ScanStatus::Interrupted);
    assert_eq!(report.processed, 4);

    let mut after_first = ResultCache::new();
    after_first.load(&cache_file).unwrap();
    assert_eq!(after_first.exists_count() + after_first.available_count(), 4);

    // Second run: the four known names never reach tier 1 again.
    let (resolve, resolve_calls) = FixedTier::boxed(
        &[
            "ko.test", "sa.test", "su.test", "se.test", "so.test", "ta.test",
        ],
        TierOutcome::Inconclusive,
    );
    let (soa, _) = FixedTier::boxed(&[], TierOutcome::Inconclusive);
    let (registry, _) = FixedTier::boxed(&[], TierOutcome::NotFound);
    let checker = ExistenceChecker::from_tiers(vec![resolve, soa, registry]);

    let mut engine = ScanEngine::new(config, checker);
    let report = engine.run().await.unwrap();

    assert_eq!(report.status, ScanStatus::Completed);
    assert_eq!(report.processed, 10);
    assert_eq!(resolve_calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_whois_fault_surfaces_after_persisting() {
    /// Registry tier that fails hard, as a missing whois binary would.
    struct BrokenRegistry;

    #[async_trait]
    impl Tier for BrokenRegistry {
        fn label(&self) -> &'static str {
            "whois"
        }

        async fn probe(&self, domain: &str) -> Result<TierOutcome, ScanError> {
            Err(ScanError::whois(domain, "Failed to execute whois command"))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("verdicts.cache");

    let config = ScanConfig::default()
        .with_syllables(syllables(&["ka", "ki", "ku"]))
        .with_combo_length(1)
        .with_tld(".test")
        .with_cache_file(cache_file.clone());

    // ka.test resolves; ki.test falls through to the broken registry.
    let (resolve, _) = FixedTier::boxed(&["ka.test"], TierOutcome::Inconclusive);
    let (soa, _) = FixedTier::boxed(&[], TierOutcome::Inconclusive);
    let checker = ExistenceChecker::from_tiers(vec![resolve, soa, Box::new(BrokenRegistry)]);

    let mut engine = ScanEngine::new(config, checker);
    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, ScanError::WhoisError { .. }));

    // The verdict recorded before the fault is on disk.
    let mut restored = ResultCache::new();
    restored.load(&cache_file).unwrap();
    assert_eq!(restored.verdict("ka.test"), Some(Verdict::Exists));
    assert_eq!(restored.verdict("ki.test"), None);
}
