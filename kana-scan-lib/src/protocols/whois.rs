//! WHOIS registry lookup, the final existence-check tier.
//!
//! Uses the system's `whois` command-line tool. WHOIS responses are
//! unstructured text that varies wildly between registries, so the
//! classification works from pattern lists and reports `Inconclusive`
//! for responses it cannot read. The tier chain then falls back to its
//! conservative "assume registered" default rather than risk a false
//! "available".

use std::time::Duration;
use tokio::process::Command;

use crate::error::ScanError;
use crate::types::TierOutcome;

/// Response fragments that indicate the name is not registered.
const AVAILABLE_PATTERNS: &[&str] = &[
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "domain not found",
    "domain available",
    "status: available",
    "status: free",
    "no information available",
    "not registered",
    "no matching record",
    "domain status: no object found",
    "the queried object does not exist",
    "object does not exist",
    "no matching entry",
    "domain name not found",
    "this domain name has not been registered",
];

/// Response fragments that indicate an active registration. A single hit can
/// be boilerplate; two or more means a real record.
const TAKEN_PATTERNS: &[&str] = &[
    "domain status:",
    "registrar:",
    "creation date:",
    "created:",
    "registry domain id:",
    "registrant:",
    "admin contact:",
    "tech contact:",
    "name server:",
    "nameservers:",
    "expiry date:",
    "expires:",
    "updated:",
    "last updated:",
];

/// Response fragments that indicate the server throttled us.
const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit exceeded",
    "too many requests",
    "try again later",
    "quota exceeded",
    "limit exceeded",
    "throttled",
];

/// WHOIS client for the registry tier, backed by the system `whois` command.
#[derive(Clone)]
pub struct WhoisClient {
    /// Timeout for WHOIS requests
    timeout: Duration,
}

impl WhoisClient {
    /// Create a new WHOIS client with default settings.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }

    /// Create a new WHOIS client with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Query the registry for a name and classify the response.
    ///
    /// # Errors
    ///
    /// Returns `ScanError` if the `whois` command cannot be executed at all
    /// or the query exceeds the configured timeout. These are unclassified
    /// faults: unlike an unreadable response, they say nothing about the
    /// name, so they propagate to the caller instead of becoming a verdict.
    pub async fn lookup(&self, domain: &str) -> Result<TierOutcome, ScanError> {
        let result = tokio::time::timeout(self.timeout, self.execute_whois_command(domain)).await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(ScanError::timeout("WHOIS query", self.timeout)),
        }
    }

    /// Execute the system whois command and classify its output.
    async fn execute_whois_command(&self, domain: &str) -> Result<TierOutcome, ScanError> {
        let output = Command::new("whois")
            .arg(domain)
            .output()
            .await
            .map_err(|e| {
                ScanError::whois(
                    domain,
                    format!(
                        "Failed to execute whois command: {}. Make sure 'whois' is installed.",
                        e
                    ),
                )
            })?;

        let output_text = String::from_utf8_lossy(&output.stdout).to_lowercase();

        // A throttled response classifies as nothing; wait once and retry.
        if is_rate_limited(&output_text) {
            tracing::debug!(domain, "WHOIS rate limited, retrying once");
            tokio::time::sleep(Duration::from_millis(1000)).await;

            let retry_output = Command::new("whois")
                .arg(domain)
                .output()
                .await
                .map_err(|e| {
                    ScanError::whois(domain, format!("Failed to execute whois retry: {}", e))
                })?;

            let retry_text = String::from_utf8_lossy(&retry_output.stdout).to_lowercase();
            Ok(classify_response(&retry_text))
        } else {
            Ok(classify_response(&output_text))
        }
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a WHOIS response into a tier outcome.
///
/// Availability patterns win over registration patterns because they are the
/// more specific signal. An empty or near-empty response counts as not
/// registered (the registry returned nothing for the name). Anything else
/// the patterns cannot read is `Inconclusive`.
pub(crate) fn classify_response(whois_output: &str) -> TierOutcome {
    let output_lower = whois_output.to_lowercase();

    for pattern in AVAILABLE_PATTERNS {
        if output_lower.contains(pattern) {
            return TierOutcome::NotFound;
        }
    }

    let taken_hits = TAKEN_PATTERNS
        .iter()
        .filter(|pattern| output_lower.contains(*pattern))
        .count();
    if taken_hits >= 2 {
        return TierOutcome::Found;
    }

    if output_lower.trim().len() < 50 {
        return TierOutcome::NotFound;
    }

    TierOutcome::Inconclusive
}

/// Check if the WHOIS output indicates rate limiting.
fn is_rate_limited(output: &str) -> bool {
    let output_lower = output.to_lowercase();
    RATE_LIMIT_PATTERNS
        .iter()
        .any(|pattern| output_lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_available_patterns() {
        assert_eq!(
            classify_response("No matching record found for kakiku.com"),
            TierOutcome::NotFound
        );
        assert_eq!(classify_response("Domain not found"), TierOutcome::NotFound);
    }

    #[test]
    fn test_classify_taken_patterns() {
        let taken = "Domain Status: clientTransferProhibited\n\
                     Registrar: Example Registrar\n\
                     Creation Date: 2020-01-01";
        assert_eq!(classify_response(taken), TierOutcome::Found);
    }

    #[test]
    fn test_classify_single_taken_hit_is_not_enough() {
        // One registration keyword inside an otherwise unreadable response
        let ambiguous = format!(
            "registrar: maybe\n{}",
            "x".repeat(80) // keep it over the empty-response threshold
        );
        assert_eq!(classify_response(&ambiguous), TierOutcome::Inconclusive);
    }

    #[test]
    fn test_classify_empty_response_means_available() {
        assert_eq!(classify_response(""), TierOutcome::NotFound);
        assert_eq!(classify_response("  \n"), TierOutcome::NotFound);
    }

    #[test]
    fn test_classify_unreadable_response_is_inconclusive() {
        let garbled = "% quota page follows\n".repeat(5);
        assert_eq!(classify_response(&garbled), TierOutcome::Inconclusive);
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(is_rate_limited("Rate limit exceeded. Try again later."));
        assert!(is_rate_limited("TOO MANY REQUESTS from your IP."));
        assert!(!is_rate_limited("Normal whois response"));
    }

    #[test]
    fn test_whois_client_creation() {
        let client = WhoisClient::new();
        assert_eq!(client.timeout, Duration::from_secs(10));

        let custom_client = WhoisClient::with_timeout(Duration::from_secs(3));
        assert_eq!(custom_client.timeout, Duration::from_secs(3));
    }
}
