//! Fixed-delay pacing between collaborator calls.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default minimum spacing between successive calls to one collaborator.
pub const DEFAULT_RATE_DELAY: Duration = Duration::from_secs(1);

/// Enforces a minimum delay between successive calls to one collaborator
/// class.
///
/// The first call passes immediately; each later call sleeps out whatever
/// remains of the delay window since the previous call. One gate is held per
/// collaborator class (completion, image, voice) so slow stages in one class
/// never throttle another.
#[derive(Debug)]
pub struct RateGate {
    delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Creates a gate with the given minimum spacing.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_call: Mutex::new(None),
        }
    }

    /// The configured minimum spacing.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the delay window since the previous call has elapsed.
    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                let remaining = self.delay - elapsed;
                debug!(remaining_ms = remaining.as_millis() as u64, "Pacing collaborator call");
                tokio::time::sleep(remaining).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_DELAY)
    }
}
