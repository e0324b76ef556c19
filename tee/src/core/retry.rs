//! Bounded retry bookkeeping for the byte-level I/O primitives.

/// Number of consecutive failures tolerated for one logical I/O operation.
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Retry ceiling shared by the reader and both writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub limit: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RETRY_LIMIT,
        }
    }
}

impl RetryPolicy {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    /// Start a fresh counter for a single call.
    pub fn counter(&self) -> RetryCounter {
        RetryCounter {
            failures: 0,
            limit: self.limit,
        }
    }
}

/// Consecutive failure count for one call. Reset on every success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryCounter {
    failures: u32,
    limit: u32,
}

/// What the caller should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Try the same operation again; carries the 1-based failure number.
    Retry(u32),
    /// The ceiling was reached; carries the total failure count.
    Exhausted(u32),
}

impl RetryCounter {
    pub fn record_failure(&mut self) -> Attempt {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.limit {
            Attempt::Exhausted(self.failures)
        } else {
            Attempt::Retry(self.failures)
        }
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_consecutive_failure_exhausts_default_policy() {
        let mut counter = RetryPolicy::default().counter();
        assert_eq!(counter.record_failure(), Attempt::Retry(1));
        assert_eq!(counter.record_failure(), Attempt::Retry(2));
        assert_eq!(counter.record_failure(), Attempt::Exhausted(3));
    }

    #[test]
    fn success_resets_consecutive_failures() {
        let mut counter = RetryPolicy::default().counter();
        counter.record_failure();
        counter.record_failure();
        counter.record_success();
        assert_eq!(counter.record_failure(), Attempt::Retry(1));
        assert_eq!(counter.record_failure(), Attempt::Retry(2));
        assert_eq!(counter.record_failure(), Attempt::Exhausted(3));
    }

    #[test]
    fn limit_of_one_never_retries() {
        let mut counter = RetryPolicy::new(1).counter();
        assert_eq!(counter.record_failure(), Attempt::Exhausted(1));
    }
}
