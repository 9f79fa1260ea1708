//! Fixed-window request throttling
//!
//! An explicitly owned rate limiter keyed by endpoint name. The caller
//! constructs one per scope (process, request handler, test) and drops it
//! when the scope ends; there is no global instance.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Limits for one rate limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window counter keyed by endpoint string
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    windows: HashMap<String, WindowEntry>,
}

impl RateLimiter {
    /// Create a limiter with the given limits
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            windows: HashMap::new(),
        }
    }

    /// Try to take one slot for the endpoint. Returns false when the
    /// current window is exhausted.
    pub fn try_acquire(&mut self, endpoint: &str) -> bool {
        let now = Instant::now();

        match self.windows.get_mut(endpoint) {
            Some(entry) if now.duration_since(entry.window_start) < self.config.window => {
                if entry.count < self.config.max_requests {
                    entry.count += 1;
                    true
                } else {
                    false
                }
            }
            _ => {
                // No window yet, or the old one expired
                self.windows.insert(
                    endpoint.to_string(),
                    WindowEntry {
                        count: 1,
                        window_start: now,
                    },
                );
                self.config.max_requests > 0
            }
        }
    }

    /// Slots left in the endpoint's current window
    pub fn remaining(&self, endpoint: &str) -> u32 {
        match self.windows.get(endpoint) {
            Some(entry)
                if Instant::now().duration_since(entry.window_start) < self.config.window =>
            {
                self.config.max_requests.saturating_sub(entry.count)
            }
            _ => self.config.max_requests,
        }
    }

    /// Forget the endpoint's window, restoring its full allowance
    pub fn reset(&mut self, endpoint: &str) {
        self.windows.remove(endpoint);
    }

    /// Drop every tracked window
    pub fn clear(&mut self) {
        self.windows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window: Duration) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            max_requests,
            window,
        })
    }

    #[test]
    fn allows_up_to_the_limit_then_denies() {
        let mut limiter = limiter(3, Duration::from_secs(60));

        assert!(limiter.try_acquire("reports"));
        assert!(limiter.try_acquire("reports"));
        assert!(limiter.try_acquire("reports"));
        assert!(!limiter.try_acquire("reports"));
    }

    #[test]
    fn endpoints_are_tracked_independently() {
        let mut limiter = limiter(1, Duration::from_secs(60));

        assert!(limiter.try_acquire("reports"));
        assert!(!limiter.try_acquire("reports"));
        assert!(limiter.try_acquire("transactions"));
    }

    #[test]
    fn window_expiry_restores_the_allowance() {
        let mut limiter = limiter(1, Duration::from_millis(10));

        assert!(limiter.try_acquire("reports"));
        assert!(!limiter.try_acquire("reports"));

        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.try_acquire("reports"));
    }

    #[test]
    fn remaining_counts_down_and_reset_restores() {
        let mut limiter = limiter(2, Duration::from_secs(60));

        assert_eq!(limiter.remaining("reports"), 2);
        limiter.try_acquire("reports");
        assert_eq!(limiter.remaining("reports"), 1);
        limiter.try_acquire("reports");
        assert_eq!(limiter.remaining("reports"), 0);

        limiter.reset("reports");
        assert_eq!(limiter.remaining("reports"), 2);
        assert!(limiter.try_acquire("reports"));
    }
}
