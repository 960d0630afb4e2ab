//! Existence determination for a single fully-qualified name.
//!
//! The check is an escalating chain of probe tiers: forward DNS resolution,
//! then an authoritative SOA lookup, then a WHOIS registry query. Each tier
//! reports a tri-state [`TierOutcome`]; the driving loop stops at the first
//! definitive answer and otherwise keeps escalating.
//!
//! When every tier is inconclusive the chain answers "exists". That bias is
//! deliberate: a name wrongly reported taken costs nothing, a name wrongly
//! reported available costs a registration attempt.

use async_trait::async_trait;

use crate::error::ScanError;
use crate::protocols::{DnsClient, WhoisClient};
use crate::types::{ScanConfig, TierOutcome};

/// Anything that can decide whether a fully-qualified name is registered.
///
/// The scan engine only knows this trait, which keeps it testable with
/// call-counting stubs.
#[async_trait]
pub trait ExistenceCheck: Send + Sync {
    /// `true` means registered, `false` means available.
    async fn exists(&self, domain: &str) -> Result<bool, ScanError>;
}

/// One stage of the escalating existence-check protocol.
#[async_trait]
pub trait Tier: Send + Sync {
    /// Short label for log lines.
    fn label(&self) -> &'static str;

    /// Probe one name.
    ///
    /// Expected failures (resolver errors, unreadable registry responses)
    /// are folded into the outcome; only faults that say nothing about the
    /// name may surface as errors.
    async fn probe(&self, domain: &str) -> Result<TierOutcome, ScanError>;
}

/// Tier 1: forward resolution to an address.
struct ResolutionTier {
    dns: DnsClient,
}

#[async_trait]
impl Tier for ResolutionTier {
    fn label(&self) -> &'static str {
        "resolve"
    }

    async fn probe(&self, domain: &str) -> Result<TierOutcome, ScanError> {
        Ok(self.dns.resolves(domain).await)
    }
}

/// Tier 2: authoritative SOA record on the name itself.
struct SoaTier {
    dns: DnsClient,
}

#[async_trait]
impl Tier for SoaTier {
    fn label(&self) -> &'static str {
        "soa"
    }

    async fn probe(&self, domain: &str) -> Result<TierOutcome, ScanError> {
        Ok(self.dns.has_soa(domain).await)
    }
}

/// Tier 3: WHOIS registry lookup. The only tier that can answer
/// `NotFound` definitively.
struct RegistryTier {
    whois: WhoisClient,
}

#[async_trait]
impl Tier for RegistryTier {
    fn label(&self) -> &'static str {
        "whois"
    }

    async fn probe(&self, domain: &str) -> Result<TierOutcome, ScanError> {
        self.whois.lookup(domain).await
    }
}

/// The three-tier existence checker used for real scans.
pub struct ExistenceChecker {
    tiers: Vec<Box<dyn Tier>>,
}

impl ExistenceChecker {
    /// Build the standard resolve → SOA → WHOIS chain from a scan config.
    pub fn new(config: &ScanConfig) -> Self {
        let dns = DnsClient::new(config.dns_timeout);
        let whois = WhoisClient::with_timeout(config.whois_timeout);

        Self::from_tiers(vec![
            Box::new(ResolutionTier { dns: dns.clone() }),
            Box::new(SoaTier { dns }),
            Box::new(RegistryTier { whois }),
        ])
    }

    /// Build a checker from an explicit tier chain. Probing happens in the
    /// order given. Used by tests to substitute stub tiers.
    pub fn from_tiers(tiers: Vec<Box<dyn Tier>>) -> Self {
        Self { tiers }
    }
}

#[async_trait]
impl ExistenceCheck for ExistenceChecker {
    async fn exists(&self, domain: &str) -> Result<bool, ScanError> {
        for tier in &self.tiers {
            match tier.probe(domain).await? {
                TierOutcome::Found => {
                    tracing::debug!(domain, tier = tier.label(), "registered");
                    return Ok(true);
                }
                TierOutcome::NotFound => {
                    tracing::debug!(domain, tier = tier.label(), "available");
                    return Ok(false);
                }
                TierOutcome::Inconclusive => {
                    tracing::trace!(domain, tier = tier.label(), "inconclusive, escalating");
                }
            }
        }

        // Every tier was inconclusive: assume registered.
        tracing::debug!(domain, "all tiers inconclusive, assuming registered");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Stub tier with a fixed outcome and a call counter.
    struct StubTier {
        outcome: Result<TierOutcome, ScanError>,
        calls: Arc<AtomicUsize>,
    }

    impl StubTier {
        fn new(outcome: TierOutcome) -> (Box<dyn Tier>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    outcome: Ok(outcome),
                    calls: calls.clone(),
                }),
                calls,
            )
        }

        fn failing(err: ScanError) -> Box<dyn Tier> {
            Box::new(Self {
                outcome: Err(err),
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    #[async_trait]
    impl Tier for StubTier {
        fn label(&self) -> &'static str {
            "stub"
        }

        async fn probe(&self, _domain: &str) -> Result<TierOutcome, ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn test_first_tier_found_short_circuits() {
        let (t1, c1) = StubTier::new(TierOutcome::Found);
        let (t2, c2) = StubTier::new(TierOutcome::Found);
        let (t3, c3) = StubTier::new(TierOutcome::NotFound);
        let checker = ExistenceChecker::from_tiers(vec![t1, t2, t3]);

        assert!(checker.exists("kaki.test").await.unwrap());
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 0);
        assert_eq!(c3.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_tier_found_skips_third() {
        let (t1, c1) = StubTier::new(TierOutcome::Inconclusive);
        let (t2, c2) = StubTier::new(TierOutcome::Found);
        let (t3, c3) = StubTier::new(TierOutcome::NotFound);
        let checker = ExistenceChecker::from_tiers(vec![t1, t2, t3]);

        assert!(checker.exists("kaki.test").await.unwrap());
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        assert_eq!(c3.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_final_tier_not_found_means_available() {
        let (t1, _) = StubTier::new(TierOutcome::Inconclusive);
        let (t2, _) = StubTier::new(TierOutcome::Inconclusive);
        let (t3, c3) = StubTier::new(TierOutcome::NotFound);
        let checker = ExistenceChecker::from_tiers(vec![t1, t2, t3]);

        assert!(!checker.exists("kaki.test").await.unwrap());
        assert_eq!(c3.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_inconclusive_defaults_to_exists() {
        let (t1, _) = StubTier::new(TierOutcome::Inconclusive);
        let (t2, _) = StubTier::new(TierOutcome::Inconclusive);
        let (t3, _) = StubTier::new(TierOutcome::Inconclusive);
        let checker = ExistenceChecker::from_tiers(vec![t1, t2, t3]);

        // The conservative default: ambiguous evidence reads as registered.
        assert!(checker.exists("kaki.test").await.unwrap());
    }

    #[tokio::test]
    async fn test_tier_fault_propagates() {
        let (t1, _) = StubTier::new(TierOutcome::Inconclusive);
        let t2 = StubTier::failing(ScanError::whois("kaki.test", "whois missing"));
        let (t3, c3) = StubTier::new(TierOutcome::NotFound);
        let checker = ExistenceChecker::from_tiers(vec![t1, t2, t3]);

        let err = checker.exists("kaki.test").await.unwrap_err();
        assert!(matches!(err, ScanError::WhoisError { .. }));
        assert_eq!(c3.load(Ordering::SeqCst), 0);
    }
}
