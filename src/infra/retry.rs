use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::CatalogError;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    fn to_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_interval,
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            multiplier: self.multiplier,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Runs `operation`, retrying transient catalog failures with exponential backoff.
pub fn retry_transient<T, F>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Result<T, CatalogError>,
{
    let mut backoff = policy.to_backoff();
    let mut attempts = 0;

    loop {
        attempts += 1;
        match operation() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempts < policy.max_attempts => {
                let Some(wait) = backoff.next_backoff() else {
                    return Err(e);
                };
                debug!(
                    operation = %operation_name,
                    attempt = attempts,
                    error = %e,
                    retry_in_ms = wait.as_millis() as u64,
                    "Transient failure, retrying"
                );
                thread::sleep(wait);
            }
            Err(e) => {
                if e.is_transient() {
                    warn!(
                        operation = %operation_name,
                        attempts = attempts,
                        error = %e,
                        "Giving up after max attempts"
                    );
                }
                return Err(e);
            }
        }
    }
}
