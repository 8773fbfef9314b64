mod orchestrator;
mod retry;

pub use orchestrator::Orchestrator;
pub use retry::{RetryPolicy, RunOutcome};
