use crate::alert::EscalationSink;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::retry::{attempt_all, RetryPolicy, RunOutcome};

/// Runs a fallible operation under a retry policy and escalates once
/// when every attempt has failed.
pub struct Orchestrator {
    policy: RetryPolicy,
    sink: Arc<dyn EscalationSink>,
}

impl Orchestrator {
    pub fn new(policy: RetryPolicy, sink: Arc<dyn EscalationSink>) -> Self {
        Self { policy, sink }
    }

    pub async fn run<F, Fut, T, E>(&self, operation: F) -> RunOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let outcome = attempt_all(&self.policy, operation).await;

        if outcome.succeeded {
            info!("Succeeded after {} attempt(s)", outcome.attempts);
        } else {
            self.escalate(&outcome);
        }

        outcome
    }

    fn escalate(&self, outcome: &RunOutcome) {
        error!(
            "Giving up after {} attempts, last error: {}",
            outcome.attempts, outcome.last_error
        );

        // Best effort: the outcome is reported regardless of the sink
        if let Err(e) = self.sink.escalate(&outcome.last_error) {
            warn!("Escalation failed: {}", e);
        }
    }
}
