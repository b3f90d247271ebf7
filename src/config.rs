use std::time::Duration;

/// Unique identifier for an upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderId(pub &'static str);

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Maximum length of the freeform trailing data carried by a fetch request.
///
/// Providers agree on a fixed byte limit; anything longer is truncated
/// silently before the request goes out.
pub const MAX_EXTRA_DATA_LEN: usize = 32;

/// Configuration for a race-and-select fetch round.
///
/// A round carries two deadlines derived from a single budget: the soft
/// deadline at half the budget, where the round may short-circuit if partial
/// results already exist, and the hard deadline at the full budget, beyond
/// which the round terminates unconditionally.
#[derive(Debug, Clone)]
pub struct RaceConfig {
    /// Total wall-clock budget for one fetch round (the hard deadline).
    ///
    /// The soft deadline is always half this duration.
    pub timeout: Duration,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
        }
    }
}

impl RaceConfig {
    /// Soft deadline for this configuration: half the round budget.
    pub fn soft_timeout(&self) -> Duration {
        self.timeout / 2
    }

    /// Derives a round budget from a duty slot interval.
    ///
    /// Duty schedulers typically grant each phase of a slot one third of the
    /// interval, so a 12s slot yields a 4s round budget.
    pub fn for_slot_interval(slot_interval: Duration) -> Self {
        Self {
            timeout: slot_interval / 3,
        }
    }
}

/// Configuration for a fan-out submission round.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Maximum time to wait for any provider to accept the payload.
    ///
    /// If no provider accepts within this budget, the round fails.
    pub timeout: Duration,

    /// Maximum number of submission calls in flight simultaneously.
    ///
    /// Bounds outbound load when the provider set is large.
    pub concurrency: usize,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            concurrency: 2,
        }
    }
}

impl SubmitConfig {
    /// Creates a low-latency submission configuration.
    ///
    /// Pushes to every provider at once with a short budget:
    /// - unbounded fan-out (limiter sized to the provider count)
    /// - 1 second timeout
    pub fn low_latency(providers_len: usize) -> Self {
        Self {
            timeout: Duration::from_secs(1),
            concurrency: providers_len.max(1),
        }
    }

    /// Creates a conservative submission configuration.
    ///
    /// Minimizes outbound load, trickling submissions out:
    /// - at most 1 call in flight
    /// - 3 second timeout
    pub fn conservative() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            concurrency: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_timeout_is_half_the_budget() {
        let cfg = RaceConfig {
            timeout: Duration::from_millis(100),
        };
        assert_eq!(cfg.soft_timeout(), Duration::from_millis(50));
    }

    #[test]
    fn slot_interval_budget_is_one_third() {
        let cfg = RaceConfig::for_slot_interval(Duration::from_secs(12));
        assert_eq!(cfg.timeout, Duration::from_secs(4));
        assert_eq!(cfg.soft_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn low_latency_fans_out_to_all_providers() {
        let cfg = SubmitConfig::low_latency(5);
        assert_eq!(cfg.concurrency, 5);

        // An empty provider set still yields a usable limiter.
        let cfg = SubmitConfig::low_latency(0);
        assert_eq!(cfg.concurrency, 1);
    }
}
