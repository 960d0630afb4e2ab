//! DNS probes for the first two existence-check tiers.
//!
//! Both probes run against the system resolver configuration through
//! `hickory-resolver`. Names are queried in absolute form (trailing dot) so
//! resolver search domains never widen the question being asked.
//!
//! Resolver failures are folded into `TierOutcome::Inconclusive` rather than
//! surfaced: at the DNS level a transient failure is indistinguishable from
//! the name not existing, and the decision belongs to the later tiers.

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;

use crate::types::TierOutcome;

/// Async DNS client used by the resolution and SOA tiers.
#[derive(Clone)]
pub struct DnsClient {
    resolver: TokioAsyncResolver,
}

impl DnsClient {
    /// Create a DNS client from the system resolver configuration.
    ///
    /// Falls back to a public default configuration when the system
    /// configuration cannot be read (containers without /etc/resolv.conf).
    /// Queries use a single attempt; the tier chain does not retry.
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = match read_system_conf() {
            Ok((config, opts)) => (config, opts),
            Err(e) => {
                tracing::debug!(error = %e, "system resolver config unreadable, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        opts.attempts = 1;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// Tier 1: does the name forward-resolve to any address?
    pub async fn resolves(&self, domain: &str) -> TierOutcome {
        let absolute = format!("{}.", domain);
        match self.resolver.lookup_ip(absolute.as_str()).await {
            Ok(lookup) if lookup.iter().next().is_some() => {
                tracing::trace!(domain, "forward resolution succeeded");
                TierOutcome::Found
            }
            Ok(_) => {
                tracing::trace!(domain, "forward resolution returned no addresses");
                TierOutcome::Inconclusive
            }
            Err(e) => {
                tracing::trace!(domain, error = %e, "forward resolution failed");
                TierOutcome::Inconclusive
            }
        }
    }

    /// Tier 2: does the name carry an SOA record of its own?
    ///
    /// A registered-but-unresolvable domain still has an administered zone,
    /// which this catches.
    pub async fn has_soa(&self, domain: &str) -> TierOutcome {
        let absolute = format!("{}.", domain);
        match self.resolver.soa_lookup(absolute.as_str()).await {
            Ok(lookup) if lookup.iter().next().is_some() => {
                tracing::trace!(domain, "SOA record present");
                TierOutcome::Found
            }
            Ok(_) => {
                tracing::trace!(domain, "SOA query returned no records");
                TierOutcome::Inconclusive
            }
            Err(e) => {
                tracing::trace!(domain, error = %e, "SOA query failed");
                TierOutcome::Inconclusive
            }
        }
    }
}
