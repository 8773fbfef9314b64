mod channel;
mod platform;

pub use channel::{AlertChannel, Bell, Dialog, Toast};
pub use platform::Platform;

use crate::config::AlertConfig;
use crate::error::AlertError;
use tracing::{debug, error, warn};

/// Receives the final error once every attempt has failed
pub trait EscalationSink: Send + Sync {
    fn escalate(&self, message: &str) -> Result<(), AlertError>;
}

/// Swallows escalations
pub struct NoopSink;

impl EscalationSink for NoopSink {
    fn escalate(&self, message: &str) -> Result<(), AlertError> {
        debug!("Escalation suppressed: {}", message);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    /// Short text for notifications
    pub summary: String,
    /// Longer text for dialogs
    pub detail: String,
}

impl Alert {
    pub fn failure(title: &str, attempts: u32, last_error: &str) -> Self {
        Self {
            title: title.to_string(),
            summary: format!(
                "Failed after {} attempts. Last error: {}",
                attempts, last_error
            ),
            detail: format!(
                "The OM Automation script has failed after {} attempts.\n\nLast error: {}",
                attempts, last_error
            ),
        }
    }
}

/// Fans an escalation out to every enabled channel
pub struct Alerter {
    title: String,
    attempts: u32,
    channels: Vec<Box<dyn AlertChannel>>,
}

impl Alerter {
    pub fn new(title: &str, attempts: u32, channels: Vec<Box<dyn AlertChannel>>) -> Self {
        Self {
            title: title.to_string(),
            attempts,
            channels,
        }
    }

    pub fn from_config(config: &AlertConfig, attempts: u32) -> Self {
        let platform = Platform::current();
        let mut channels: Vec<Box<dyn AlertChannel>> = Vec::new();
        if config.sound {
            channels.push(Box::new(Bell));
        }
        if config.toast {
            channels.push(Box::new(Toast { platform }));
        }
        if config.dialog {
            channels.push(Box::new(Dialog { platform }));
        }
        Self::new(&config.title, attempts, channels)
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }
}

impl EscalationSink for Alerter {
    fn escalate(&self, message: &str) -> Result<(), AlertError> {
        error!(
            "Notifying operator of failure via {} channel(s)",
            self.channels.len()
        );

        let alert = Alert::failure(&self.title, self.attempts, message);
        let mut failed = 0;

        for channel in &self.channels {
            match channel.send(&alert) {
                Ok(()) => debug!("Sent {} alert", channel.name()),
                Err(e) => {
                    warn!("Could not send {} alert: {}", channel.name(), e);
                    failed += 1;
                }
            }
        }

        if failed > 0 && failed == self.channels.len() {
            return Err(AlertError::AllChannelsFailed(failed));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recording {
        name: &'static str,
        fail: bool,
        sent: Arc<Mutex<Vec<Alert>>>,
    }

    impl AlertChannel for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn send(&self, alert: &Alert) -> Result<(), AlertError> {
            self.sent.lock().unwrap().push(alert.clone());
            if self.fail {
                Err(AlertError::CommandFailed {
                    channel: self.name,
                    detail: "no display".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn channel(
        name: &'static str,
        fail: bool,
        sent: &Arc<Mutex<Vec<Alert>>>,
    ) -> Box<dyn AlertChannel> {
        Box::new(Recording {
            name,
            fail,
            sent: sent.clone(),
        })
    }

    #[test]
    fn test_alert_text() {
        let alert = Alert::failure("OM Automation FAILED", 5, "timeout");
        assert_eq!(alert.summary, "Failed after 5 attempts. Last error: timeout");
        assert!(alert.detail.starts_with("The OM Automation script has failed after 5"));
        assert!(alert.detail.ends_with("Last error: timeout"));
    }

    #[test]
    fn test_failing_channel_does_not_stop_the_rest() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let alerter = Alerter::new(
            "title",
            5,
            vec![
                channel("sound", false, &sent),
                channel("dialog", true, &sent),
                channel("toast", false, &sent),
            ],
        );

        alerter.escalate("timeout").unwrap();
        assert_eq!(sent.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_all_channels_failing_is_reported() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let alerter = Alerter::new(
            "title",
            5,
            vec![channel("toast", true, &sent), channel("dialog", true, &sent)],
        );

        let err = alerter.escalate("timeout").unwrap_err();
        assert!(matches!(err, AlertError::AllChannelsFailed(2)));
    }

    #[test]
    fn test_no_channels_is_ok() {
        let alerter = Alerter::new("title", 5, Vec::new());
        assert!(alerter.escalate("timeout").is_ok());
    }

    #[test]
    fn test_from_config_respects_toggles() {
        let config = AlertConfig {
            sound: true,
            toast: false,
            dialog: true,
            title: "t".to_string(),
        };
        let alerter = Alerter::from_config(&config, 3);
        assert_eq!(alerter.channel_names(), vec!["sound", "dialog"]);
    }
}
