//! DNS-rebinding simulation state.
//!
//! Emulates the classic rebinding attack pattern: the first N resolutions of
//! a domain return the benign pool address, subsequent resolutions return an
//! attacker-chosen decoy address. Used to test whether a victim application
//! caches DNS results or re-resolves per connection.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Per-domain observation counters plus the decoy addresses handed out once
/// a domain crosses the threshold.
///
/// A family takes part in rebinding iff its decoy address is configured.
/// Counting is shared between both families, so v4 and v6 answers flip in
/// lockstep once a domain is observed often enough.
///
/// Counters are keyed by lowercase, trailing-dot-stripped domain names and
/// are never evicted; they live for the process lifetime.
#[derive(Debug)]
pub struct Rebind {
    ipv4: Option<Ipv4Addr>,
    ipv6: Option<Ipv6Addr>,
    threshold: u32,
    counters: Mutex<HashMap<String, u32>>,
}

impl Rebind {
    #[must_use]
    pub fn new(ipv4: Option<Ipv4Addr>, ipv6: Option<Ipv6Addr>, threshold: u32) -> Self {
        Rebind {
            ipv4,
            ipv6,
            threshold,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Record one observed question for `domain`. Counting happens once per
    /// question regardless of record type or match outcome.
    pub fn observe(&self, domain: &str) {
        let mut counters = self.counters.lock();
        *counters.entry(domain.to_string()).or_insert(0) += 1;
    }

    /// The v4 decoy address, iff one is configured and `domain` has been
    /// observed strictly more often than the threshold. A domain never
    /// observed is never active.
    #[must_use]
    pub fn active_v4(&self, domain: &str) -> Option<Ipv4Addr> {
        self.ipv4.filter(|_| self.above_threshold(domain))
    }

    /// The v6 decoy address, symmetric to [`Rebind::active_v4`].
    #[must_use]
    pub fn active_v6(&self, domain: &str) -> Option<Ipv6Addr> {
        self.ipv6.filter(|_| self.above_threshold(domain))
    }

    fn above_threshold(&self, domain: &str) -> bool {
        let counters = self.counters.lock();
        counters
            .get(domain)
            .map_or(false, |count| *count > self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const DECOY_V4: Ipv4Addr = Ipv4Addr::new(10, 10, 10, 10);
    const DECOY_V6: Ipv6Addr = Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 1);

    #[test]
    fn inactive_until_strictly_above_threshold() {
        let rebind = Rebind::new(Some(DECOY_V4), None, 2);

        assert_eq!(rebind.active_v4("example.org"), None);
        rebind.observe("example.org");
        rebind.observe("example.org");
        // count == threshold: still inactive.
        assert_eq!(rebind.active_v4("example.org"), None);
        rebind.observe("example.org");
        assert_eq!(rebind.active_v4("example.org"), Some(DECOY_V4));
        // Activation is sticky: counts never decrease.
        assert_eq!(rebind.active_v4("example.org"), Some(DECOY_V4));
    }

    #[test]
    fn unconfigured_family_never_activates() {
        let rebind = Rebind::new(Some(DECOY_V4), None, 0);
        rebind.observe("example.org");
        assert_eq!(rebind.active_v4("example.org"), Some(DECOY_V4));
        assert_eq!(rebind.active_v6("example.org"), None);
    }

    #[test]
    fn families_flip_in_lockstep() {
        let rebind = Rebind::new(Some(DECOY_V4), Some(DECOY_V6), 1);
        rebind.observe("example.org");
        rebind.observe("example.org");
        assert_eq!(rebind.active_v4("example.org"), Some(DECOY_V4));
        assert_eq!(rebind.active_v6("example.org"), Some(DECOY_V6));
    }

    #[test]
    fn domains_are_counted_independently() {
        let rebind = Rebind::new(Some(DECOY_V4), None, 0);
        rebind.observe("example.org");
        assert_eq!(rebind.active_v4("example.org"), Some(DECOY_V4));
        assert_eq!(rebind.active_v4("other.org"), None);
    }

    #[test]
    fn concurrent_observations_are_not_lost() {
        const THREADS: u32 = 8;
        const PER_THREAD: u32 = 100;

        // Threshold is one short of the total observation count: the domain
        // activates iff no increment is lost.
        let rebind = Arc::new(Rebind::new(Some(DECOY_V4), None, THREADS * PER_THREAD - 1));
        let mut handles = Vec::new();
        for _ in 0..THREADS {
            let rebind = rebind.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    rebind.observe("example.org");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(rebind.active_v4("example.org"), Some(DECOY_V4));
    }
}
