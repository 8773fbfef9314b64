use crate::config::RetryConfig;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// How many times to attempt an operation and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one attempt
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.delay_ms))
    }
}

/// Outcome of a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    Succeeded,
    Failed(String),
}

impl<T, E: Display> From<Result<T, E>> for AttemptResult {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => AttemptResult::Succeeded,
            Err(e) => AttemptResult::Failed(e.to_string()),
        }
    }
}

/// Aggregate outcome of all attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub succeeded: bool,
    /// Message of the final failed attempt; empty on success
    pub last_error: String,
    pub attempts: u32,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.succeeded {
            0
        } else {
            1
        }
    }
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// Attempts run strictly one after another. The delay is only applied
/// between two attempts, never after the last one.
pub async fn attempt_all<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> RunOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max = policy.max_attempts();
    let mut last_error = String::new();

    for attempt in 1..=max {
        info!("--- attempt {} of {} ---", attempt, max);

        match AttemptResult::from(operation().await) {
            AttemptResult::Succeeded => {
                return RunOutcome {
                    succeeded: true,
                    last_error: String::new(),
                    attempts: attempt,
                };
            }
            AttemptResult::Failed(message) => {
                warn!("Attempt {} failed: {}", attempt, message);
                last_error = message;

                if attempt < max {
                    info!("Waiting {:?} before retry...", policy.delay());
                    sleep(policy.delay()).await;
                }
            }
        }
    }

    warn!("All {} attempts failed", max);
    RunOutcome {
        succeeded: false,
        last_error,
        attempts: max,
    }
}
