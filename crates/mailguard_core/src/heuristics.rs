//! Suspicious top-level domain heuristics
//!
//! Some TLDs are cheap to register and dominate throwaway sign-ups. A match
//! here marks an address as disposable even when no block-list knows about it.

use std::collections::HashSet;
use tracing::debug;

/// TLDs flagged by default
pub const DEFAULT_SUSPICIOUS_TLDS: &[&str] = &["xyz", "top", "tk", "lol", "click", "gq", "cf"];

/// Detector for domains under a suspicious TLD
#[derive(Debug, Clone)]
pub struct SuspiciousTldDetector {
    tlds: HashSet<String>,
}

impl SuspiciousTldDetector {
    /// Create a detector with the default TLD set
    pub fn new() -> Self {
        Self::with_tlds(DEFAULT_SUSPICIOUS_TLDS.iter().copied())
    }

    /// Create a detector with a custom TLD set
    ///
    /// Entries are trimmed, lowercased and stripped of a leading dot, so
    /// `".XYZ"` and `"xyz"` are equivalent.
    pub fn with_tlds<I, S>(tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tlds: HashSet<String> = tlds
            .into_iter()
            .map(|tld| tld.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|tld| !tld.is_empty())
            .collect();

        debug!("Suspicious TLD detector initialized with {} TLDs", tlds.len());
        Self { tlds }
    }

    /// Check whether the domain's TLD (text after the last `.`) is suspicious
    pub fn is_suspicious(&self, domain: &str) -> bool {
        let tld = domain.rsplit('.').next().unwrap_or(domain).to_lowercase();
        let result = self.tlds.contains(&tld);

        if result {
            debug!("Domain '{}' has suspicious TLD '{}'", domain, tld);
        }

        result
    }

    /// Number of TLDs being tracked
    pub fn tld_count(&self) -> usize {
        self.tlds.len()
    }
}

impl Default for SuspiciousTldDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_tlds() {
        let detector = SuspiciousTldDetector::new();
        assert_eq!(detector.tld_count(), 7);

        for domain in ["promo.xyz", "a.top", "free.tk", "ha.lol", "x.click", "y.gq", "z.cf"] {
            assert!(detector.is_suspicious(domain), "{} should be suspicious", domain);
        }
    }

    #[test]
    fn test_ordinary_tlds_pass() {
        let detector = SuspiciousTldDetector::new();
        assert!(!detector.is_suspicious("gmail.com"));
        assert!(!detector.is_suspicious("example.co.uk"));
        // Only the final label counts
        assert!(!detector.is_suspicious("xyz.example.com"));
    }

    #[test]
    fn test_case_insensitive() {
        let detector = SuspiciousTldDetector::new();
        assert!(detector.is_suspicious("PROMO.XYZ"));
        assert!(detector.is_suspicious("Promo.Top"));
    }

    #[test]
    fn test_domain_without_dot_uses_whole_label() {
        let detector = SuspiciousTldDetector::new();
        assert!(detector.is_suspicious("xyz"));
        assert!(!detector.is_suspicious("localhost"));
    }

    #[test]
    fn test_custom_tlds() {
        let detector = SuspiciousTldDetector::with_tlds([".ZIP", " mov ", ""]);
        assert_eq!(detector.tld_count(), 2);
        assert!(detector.is_suspicious("download.zip"));
        assert!(detector.is_suspicious("video.mov"));
        assert!(!detector.is_suspicious("promo.xyz"));
    }
}
