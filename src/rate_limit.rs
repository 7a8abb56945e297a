//! Outbound request throttle.

use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;

/// Fixed-window throttle: after every K-th issued request, pause briefly.
///
/// Not a token bucket. The external API enforces a calls-per-second quota
/// and rejects the *whole batch's* requests when it is violated, so issuance
/// is serialized through a single counter and the pause is taken while
/// holding the lock: no request is reordered or dropped, all issuance simply
/// waits out the checkpoint.
pub struct FixedWindowThrottle {
    every: u32,
    pause: Duration,
    issued: Mutex<u64>,
}

impl FixedWindowThrottle {
    /// Creates a throttle that pauses for `pause` after every `every`
    /// requests. `every == 0` disables throttling.
    pub fn new(every: u32, pause: Duration) -> Self {
        FixedWindowThrottle {
            every,
            pause,
            issued: Mutex::new(0),
        }
    }

    /// Counts one outbound request, pausing at window boundaries.
    pub async fn acquire(&self) {
        if self.every == 0 {
            return;
        }
        let mut issued = self.issued.lock().await;
        *issued += 1;
        if *issued % u64::from(self.every) == 0 {
            debug!(
                "issued {} requests, pausing {:?} to stay under the API quota",
                *issued, self.pause
            );
            tokio::time::sleep(self.pause).await;
        }
    }

    /// Total requests issued through this throttle.
    pub async fn issued(&self) -> u64 {
        *self.issued.lock().await
    }
}
