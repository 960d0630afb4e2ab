//! The resumable scan loop.
//!
//! The engine drives candidate roots from the generator through the checker,
//! one at a time, consulting and updating the verdict cache as it goes. The
//! loop runs `IDLE → LOADING_CACHE → SCANNING → (INTERRUPTED | COMPLETED) →
//! PERSISTING → DONE`: whichever way the scanning phase ends (exhausted,
//! interrupted, or faulted), the cache is persisted before anything is
//! surfaced to the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::cache::ResultCache;
use crate::checker::ExistenceCheck;
use crate::error::ScanError;
use crate::generate::{combination_count, NameGenerator};
use crate::types::{ScanConfig, ScanProgress, ScanReport, ScanStatus, Verdict};

/// Progress observer invoked after every candidate, checked or skipped.
pub type ProgressFn = Box<dyn FnMut(&ScanProgress) + Send>;

/// Sequential scan driver owning the verdict cache.
///
/// # Example
///
/// ```rust,no_run
/// use kana_scan_lib::{ExistenceChecker, ScanConfig, ScanEngine};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ScanConfig::default().with_combo_length(2);
///     let checker = ExistenceChecker::new(&config);
///     let mut engine = ScanEngine::new(config, checker);
///
///     let report = engine.run().await?;
///     for name in &report.available {
///         println!("{}", name);
///     }
///     Ok(())
/// }
/// ```
pub struct ScanEngine<C: ExistenceCheck> {
    config: ScanConfig,
    checker: C,
    cache: ResultCache,
    interrupt: Arc<AtomicBool>,
    on_progress: Option<ProgressFn>,
}

impl<C: ExistenceCheck> ScanEngine<C> {
    /// Create an engine with an empty cache. The persisted snapshot, if any,
    /// is merged in when [`run`](Self::run) starts.
    pub fn new(config: ScanConfig, checker: C) -> Self {
        Self {
            config,
            checker,
            cache: ResultCache::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
            on_progress: None,
        }
    }

    /// Handle to the interrupt flag.
    ///
    /// Raising the flag stops the scan at the next candidate boundary; an
    /// in-flight check is allowed to finish first. Interruption is not an
    /// error; the engine persists and reports exactly as on completion.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// Install a progress observer.
    pub fn with_progress(mut self, observer: impl FnMut(&ScanProgress) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(observer));
        self
    }

    /// The verdict cache in its current state.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Run the scan to completion, interruption, or fault.
    ///
    /// The cache snapshot is written on every termination path. A fault from
    /// the checker aborts the scan but is surfaced only after the verdicts
    /// accumulated so far have been persisted.
    pub async fn run(&mut self) -> Result<ScanReport, ScanError> {
        self.cache.load(&self.config.cache_file)?;

        let scan = self.scan_candidates().await;

        if let Err(save_err) = self.cache.save(&self.config.cache_file) {
            match scan {
                // The scan fault is the primary failure; the persist failure
                // only gets logged.
                Err(scan_err) => {
                    tracing::error!(error = %save_err, "cache persist failed after scan fault");
                    return Err(scan_err);
                }
                Ok(_) => return Err(save_err),
            }
        }

        let (status, processed, total, found) = scan?;

        Ok(ScanReport {
            status,
            processed,
            total,
            found_this_run: found,
            available: self.cache.available_names(),
        })
    }

    /// The scanning phase: iterate candidates until exhausted or stopped.
    async fn scan_candidates(&mut self) -> Result<(ScanStatus, usize, usize, usize), ScanError> {
        let r = self.config.combo_length;
        let total = combination_count(self.config.syllables.len(), r);
        let roots = NameGenerator::new(&self.config.syllables, r);

        tracing::info!(
            r,
            total,
            tld = %self.config.tld,
            known = self.cache.len(),
            "scan starting"
        );

        let started = Instant::now();
        let mut processed = 0usize;
        let mut found = 0usize;

        for root in roots {
            // Cancellation is observed between candidates only.
            if self.interrupt.load(Ordering::Relaxed) {
                tracing::info!(processed, total, "scan interrupted");
                return Ok((ScanStatus::Interrupted, processed, total, found));
            }

            let name = self.config.qualified_name(&root);

            if self.cache.contains(&name) {
                // Known registered: counts toward progress, no network call.
                processed += 1;
                self.report_progress(processed, total, found, &started);
                continue;
            }

            // Keep the runtime responsive between blocking tier chains.
            tokio::task::yield_now().await;

            let verdict = if self.checker.exists(&name).await? {
                Verdict::Exists
            } else {
                found += 1;
                Verdict::Available
            };
            self.cache.record(&name, verdict);

            processed += 1;
            self.report_progress(processed, total, found, &started);
        }

        tracing::info!(processed, found, "scan completed");
        Ok((ScanStatus::Completed, processed, total, found))
    }

    fn report_progress(&mut self, processed: usize, total: usize, found: usize, started: &Instant) {
        let observer = match self.on_progress.as_mut() {
            Some(observer) => observer,
            None => return,
        };

        let elapsed = started.elapsed();
        let eta_seconds = if processed > 0 && total >= processed {
            let per_candidate = elapsed.as_secs_f64() / processed as f64;
            Some((per_candidate * (total - processed) as f64) as u64)
        } else {
            None
        };

        observer(&ScanProgress {
            processed,
            total,
            available: found,
            elapsed,
            eta_seconds,
        });
    }
}
