// src/budget.rs
// =============================================================================
// The time budget shared by one whole analysis.
//
// A single deadline is created when the user's request starts. The page
// fetch, the markup analysis and every link probe all look at the SAME
// deadline, so the total wall-clock time is bounded no matter how many
// links a page has or how slow they are.
//
// Rust concepts:
// - Copy types: Budget is just an Instant, so it is passed around by value
// - tokio::time::Instant: a monotonic clock that tokio timers understand
// =============================================================================

use std::time::Duration;
use tokio::time::Instant;

/// A deadline shared by every network call of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    deadline: Instant,
}

impl Budget {
    /// Starts a budget that expires `total` from now.
    pub fn new(total: Duration) -> Self {
        Self::until(Instant::now() + total)
    }

    /// Wraps an existing deadline.
    pub fn until(deadline: Instant) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_exhausted(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Completes when the deadline fires.
    pub async fn expired(&self) {
        tokio::time::sleep_until(self.deadline).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_budget_has_time_left() {
        let budget = Budget::new(Duration::from_secs(30));
        assert!(!budget.is_exhausted());
        assert!(budget.remaining() > Duration::from_secs(29));
    }

    #[tokio::test]
    async fn test_past_deadline_is_exhausted() {
        let budget = Budget::until(Instant::now() - Duration::from_millis(1));
        assert!(budget.is_exhausted());
        assert_eq!(budget.remaining(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_expired_waits_for_deadline() {
        let started = Instant::now();
        let budget = Budget::new(Duration::from_millis(50));
        budget.expired().await;
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(budget.is_exhausted());
    }
}
