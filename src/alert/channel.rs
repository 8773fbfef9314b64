use super::platform::{dialog_command, toast_command, Platform};
use super::Alert;
use crate::error::AlertError;
use std::io::Write;
use std::process::Stdio;
use tracing::debug;

/// One way of getting an operator's attention
pub trait AlertChannel: Send + Sync {
    fn name(&self) -> &'static str;

    fn send(&self, alert: &Alert) -> Result<(), AlertError>;
}

/// Terminal bell
pub struct Bell;

impl Bell {
    fn ring(out: &mut impl Write) -> std::io::Result<()> {
        out.write_all(b"\x07")?;
        out.flush()
    }
}

impl AlertChannel for Bell {
    fn name(&self) -> &'static str {
        "sound"
    }

    fn send(&self, _alert: &Alert) -> Result<(), AlertError> {
        Bell::ring(&mut std::io::stdout().lock())?;
        Ok(())
    }
}

/// Desktop notification; fire and forget
pub struct Toast {
    pub platform: Platform,
}

impl AlertChannel for Toast {
    fn name(&self) -> &'static str {
        "toast"
    }

    fn send(&self, alert: &Alert) -> Result<(), AlertError> {
        let spec = toast_command(self.platform, alert).ok_or(AlertError::Unsupported {
            channel: self.name(),
        })?;

        debug!("Spawning {} for toast", spec.program);
        // Child is left running; the toast outlives this call
        spec.to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

/// Blocking dialog; returns once the operator dismisses it
pub struct Dialog {
    pub platform: Platform,
}

impl AlertChannel for Dialog {
    fn name(&self) -> &'static str {
        "dialog"
    }

    fn send(&self, alert: &Alert) -> Result<(), AlertError> {
        let spec = dialog_command(self.platform, alert).ok_or(AlertError::Unsupported {
            channel: self.name(),
        })?;

        debug!("Running {} for dialog", spec.program);
        let output = spec.to_command().stdin(Stdio::null()).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AlertError::CommandFailed {
                channel: self.name(),
                detail: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        Ok(())
    }
}
