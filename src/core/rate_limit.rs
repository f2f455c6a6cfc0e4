//! Sliding-window rate limiting for outbound media-source calls.
//!
//! N calls per rolling period; a call past the budget waits until the
//! window admits it rather than failing.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Sliding-window call budget
#[derive(Debug)]
pub struct SlidingWindow {
    max_calls: usize,
    period: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl SlidingWindow {
    /// Budget of `max_calls` per rolling `period`
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            period,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until the window admits another call, then record it
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();

                while let Some(&front) = calls.front() {
                    if now.duration_since(front) >= self.period {
                        calls.pop_front();
                    } else {
                        break;
                    }
                }

                if calls.len() < self.max_calls {
                    calls.push_back(now);
                    return;
                }

                // Oldest call ages out of the window first
                let front = *calls.front().expect("window is full");
                self.period - now.duration_since(front)
            };

            debug!(wait_ms = wait.as_millis() as u64, "Rate limit window full, waiting");
            tokio::time::sleep(wait).await;
        }
    }
}
