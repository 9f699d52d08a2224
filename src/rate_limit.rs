//! Fixed-window per-client rate limiting.
//!
//! Each route carries its own limiter. A client's first request in a
//! window starts its clock; once the count hits capacity, further requests
//! are refused until the window expires. Windows are per client, not
//! globally aligned.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// One client's window state.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// A fixed-window rate limiter keyed by client identifier.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window_ms` per client.
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_millis(window_ms),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request from `client` and return whether it is allowed.
    ///
    /// An expired window restarts rather than carrying over. A poisoned
    /// lock fails open.
    pub fn allow(&self, client: &str) -> bool {
        let now = Instant::now();
        let Ok(mut windows) = self.windows.lock() else {
            return true;
        };
        let window = windows.entry(client.to_owned()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });
        if now >= window.reset_at {
            window.count = 0;
            window.reset_at = now + self.window;
        }
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }

    /// Drop windows that have expired, bounding memory under churn.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        if let Ok(mut windows) = self.windows.lock() {
            windows.retain(|_, window| now < window.reset_at);
        }
    }

    /// Number of clients currently tracked.
    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.lock().map(|w| w.len()).unwrap_or(0)
    }
}
