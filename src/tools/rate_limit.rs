//! Sliding-window rate limiter for network-bound tools.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

const WINDOW: Duration = Duration::from_secs(60);

/// Caps calls per trailing minute and enforces a minimum gap between calls.
///
/// One instance guards one upstream service and is shared (behind an `Arc`)
/// by every caller in the process. The lock is held while waiting, so callers
/// are admitted one at a time in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    requests_per_minute: usize,
    min_interval: Duration,
    state: Mutex<WindowState>,
}

#[derive(Debug, Default)]
struct WindowState {
    requests: VecDeque<Instant>,
    last_request: Option<Instant>,
}

impl WindowState {
    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.requests.front() {
            if now.duration_since(oldest) >= WINDOW {
                self.requests.pop_front();
            } else {
                break;
            }
        }
    }
}

impl RateLimiter {
    /// A cap of zero is treated as one.
    pub fn new(requests_per_minute: usize, min_interval: Duration) -> Self {
        Self {
            requests_per_minute: requests_per_minute.max(1),
            min_interval,
            state: Mutex::new(WindowState::default()),
        }
    }

    pub fn requests_per_minute(&self) -> usize {
        self.requests_per_minute
    }

    /// Wait until a call is allowed, then record it.
    pub async fn admit(&self) {
        let mut state = self.state.lock().await;

        let now = Instant::now();
        state.prune(now);

        if state.requests.len() >= self.requests_per_minute {
            if let Some(&oldest) = state.requests.front() {
                let wait = WINDOW.saturating_sub(now.duration_since(oldest));
                if !wait.is_zero() {
                    info!("Rate limit reached, waiting {:.1} seconds", wait.as_secs_f64());
                    sleep(wait).await;
                }
            }
            state.prune(Instant::now());
        }

        if let Some(last) = state.last_request {
            let elapsed = Instant::now().duration_since(last);
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Spacing requests, waiting {:?}", wait);
                sleep(wait).await;
            }
        }

        let admitted = Instant::now();
        state.requests.push_back(admitted);
        state.last_request = Some(admitted);
    }

    /// Calls recorded in the current window.
    pub async fn in_window(&self) -> usize {
        let mut state = self.state.lock().await;
        state.prune(Instant::now());
        state.requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_request_over_cap_waits_for_window() {
        let limiter = RateLimiter::new(30, Duration::from_millis(100));
        let start = Instant::now();

        for _ in 0..30 {
            limiter.admit().await;
        }
        // 29 gaps of 100ms
        assert!(start.elapsed() < Duration::from_secs(3));

        limiter.admit().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(60), "admitted after {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(61), "admitted after {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_minimum_spacing() {
        let limiter = RateLimiter::new(30, Duration::from_millis(100));
        let start = Instant::now();

        limiter.admit().await;
        assert!(start.elapsed() < Duration::from_millis(100));

        limiter.admit().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expires() {
        let limiter = RateLimiter::new(2, Duration::ZERO);
        limiter.admit().await;
        limiter.admit().await;
        assert_eq!(limiter.in_window().await, 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(limiter.in_window().await, 0);

        let before = Instant::now();
        limiter.admit().await;
        assert!(before.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_limiter_never_exceeds_cap() {
        let limiter = Arc::new(RateLimiter::new(5, Duration::ZERO));
        let admitted = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..12)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let admitted = Arc::clone(&admitted);
                tokio::spawn(async move {
                    limiter.admit().await;
                    admitted.lock().await.push(Instant::now());
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let mut times = admitted.lock().await.clone();
        times.sort();
        assert_eq!(times.len(), 12);
        for pair in times.windows(6) {
            assert!(pair[5].duration_since(pair[0]) >= WINDOW);
        }
    }

    #[test]
    fn test_zero_cap_clamped() {
        assert_eq!(RateLimiter::new(0, Duration::ZERO).requests_per_minute(), 1);
    }
}
