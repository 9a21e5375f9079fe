use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{Error, Result};

// Initial grant capacity. The window grows on demand beyond it.
const MAX_PREALLOCATED: usize = 64;

/// Sliding-window limiter admitting at most `permits` acquisitions per `window`.
///
/// `acquire` never rejects; it suspends the caller until the oldest grant in the
/// window ages out. Waiters queue on a fair mutex, so permits are granted in
/// arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    permits: usize,
    window: Duration,
    granted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// `requests_per_second` acquisitions in any rolling one-second window.
    pub fn per_second(requests_per_second: u32) -> Result<Self> {
        Self::new(requests_per_second, Duration::from_secs(1))
    }

    pub fn new(permits: u32, window: Duration) -> Result<Self> {
        if permits == 0 || window.is_zero() {
            return Err(Error::InvalidRate);
        }
        let permits = permits as usize;
        Ok(Self {
            permits,
            window,
            granted: Mutex::new(VecDeque::with_capacity(permits.min(MAX_PREALLOCATED))),
        })
    }

    pub fn permits(&self) -> usize {
        self.permits
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait for a permit.
    pub async fn acquire(&self) {
        let mut granted = self.granted.lock().await;
        loop {
            let now = Instant::now();
            self.expire(&mut granted, now);

            if granted.len() < self.permits {
                granted.push_back(now);
                return;
            }

            if let Some(&oldest) = granted.front() {
                tokio::time::sleep_until(oldest + self.window).await;
            }
        }
    }

    /// Take a permit only if one is free right now.
    pub fn try_acquire(&self) -> bool {
        let Ok(mut granted) = self.granted.try_lock() else {
            return false;
        };
        let now = Instant::now();
        self.expire(&mut granted, now);

        if granted.len() < self.permits {
            granted.push_back(now);
            true
        } else {
            false
        }
    }

    fn expire(&self, granted: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = granted.front() {
            if now.duration_since(oldest) >= self.window {
                granted.pop_front();
            } else {
                break;
            }
        }
    }
}
