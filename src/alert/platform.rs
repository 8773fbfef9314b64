//! Per-platform commands for desktop notifications and blocking dialogs.
//!
//! User-supplied text never goes into a script body. Windows and macOS
//! scripts read it from environment variables; on Linux it is passed as
//! plain process arguments.

use super::Alert;

pub const TITLE_ENV: &str = "OMREPORT_ALERT_TITLE";
pub const BODY_ENV: &str = "OMREPORT_ALERT_BODY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd"
        )) {
            Platform::Linux
        } else {
            Platform::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: &'static str,
    pub args: Vec<String>,
    pub envs: Vec<(&'static str, String)>,
}

impl CommandSpec {
    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(self.program);
        cmd.args(&self.args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

fn env_pair(title: &str, body: &str) -> Vec<(&'static str, String)> {
    vec![(TITLE_ENV, title.to_string()), (BODY_ENV, body.to_string())]
}

fn powershell(script: &str, envs: Vec<(&'static str, String)>) -> CommandSpec {
    CommandSpec {
        program: "powershell",
        args: vec![
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-Command".to_string(),
            script.to_string(),
        ],
        envs,
    }
}

fn osascript(script: &str, envs: Vec<(&'static str, String)>) -> CommandSpec {
    CommandSpec {
        program: "osascript",
        args: vec!["-e".to_string(), script.to_string()],
        envs,
    }
}

/// Non-blocking desktop notification
pub fn toast_command(platform: Platform, alert: &Alert) -> Option<CommandSpec> {
    match platform {
        Platform::Windows => Some(powershell(
            "Add-Type -AssemblyName System.Windows.Forms; \
             $n = New-Object System.Windows.Forms.NotifyIcon; \
             $n.Icon = [System.Drawing.SystemIcons]::Error; \
             $n.BalloonTipIcon = 'Error'; \
             $n.BalloonTipTitle = $env:OMREPORT_ALERT_TITLE; \
             $n.BalloonTipText = $env:OMREPORT_ALERT_BODY; \
             $n.Visible = $true; \
             $n.ShowBalloonTip(10000); \
             Start-Sleep -Seconds 10; \
             $n.Dispose()",
            env_pair(&alert.title, &alert.summary),
        )),
        Platform::MacOs => Some(osascript(
            "display notification (system attribute \"OMREPORT_ALERT_BODY\") \
             with title (system attribute \"OMREPORT_ALERT_TITLE\") sound name \"Basso\"",
            env_pair(&alert.title, &alert.summary),
        )),
        Platform::Linux => Some(CommandSpec {
            program: "notify-send",
            args: vec![
                "--urgency=critical".to_string(),
                alert.title.clone(),
                alert.summary.clone(),
            ],
            envs: Vec::new(),
        }),
        Platform::Other => None,
    }
}

/// Modal dialog that stays up until the operator closes it
pub fn dialog_command(platform: Platform, alert: &Alert) -> Option<CommandSpec> {
    match platform {
        Platform::Windows => Some(powershell(
            "Add-Type -AssemblyName PresentationFramework; \
             [System.Windows.MessageBox]::Show($env:OMREPORT_ALERT_BODY, \
             'Automation Error', 'OK', 'Error') | Out-Null",
            env_pair(&alert.title, &alert.detail),
        )),
        Platform::MacOs => Some(osascript(
            "display dialog (system attribute \"OMREPORT_ALERT_BODY\") \
             with title \"Automation Error\" buttons {\"OK\"} default button \"OK\" with icon stop",
            env_pair(&alert.title, &alert.detail),
        )),
        Platform::Linux => Some(CommandSpec {
            program: "zenity",
            args: vec![
                "--error".to_string(),
                "--no-markup".to_string(),
                "--title=Automation Error".to_string(),
                format!("--text={}", alert.detail),
            ],
            envs: Vec::new(),
        }),
        Platform::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> Alert {
        Alert::failure("OM Automation FAILED", 5, "it's 'quoted' & <odd>")
    }

    #[test]
    fn test_windows_scripts_read_text_from_env() {
        let alert = alert();
        for spec in [
            toast_command(Platform::Windows, &alert).unwrap(),
            dialog_command(Platform::Windows, &alert).unwrap(),
        ] {
            assert_eq!(spec.program, "powershell");
            let script = spec.args.last().unwrap();
            assert!(!script.contains("quoted"));
            assert!(script.contains("$env:OMREPORT_ALERT_BODY"));
            assert!(spec
                .envs
                .iter()
                .any(|(k, v)| *k == BODY_ENV && v.contains("it's 'quoted'")));
        }
    }

    #[test]
    fn test_macos_uses_osascript_with_env() {
        let spec = dialog_command(Platform::MacOs, &alert()).unwrap();
        assert_eq!(spec.program, "osascript");
        assert!(spec.args[1].contains("system attribute \"OMREPORT_ALERT_BODY\""));
        assert_eq!(spec.envs[1].1, alert().detail);
    }

    #[test]
    fn test_linux_passes_text_as_arguments() {
        let alert = alert();
        let toast = toast_command(Platform::Linux, &alert).unwrap();
        assert_eq!(toast.program, "notify-send");
        assert_eq!(toast.args[1], "OM Automation FAILED");
        assert_eq!(toast.args[2], alert.summary);

        let dialog = dialog_command(Platform::Linux, &alert).unwrap();
        assert_eq!(dialog.program, "zenity");
        assert!(dialog.args.contains(&"--no-markup".to_string()));
        assert_eq!(dialog.args[3], format!("--text={}", alert.detail));
    }

    #[test]
    fn test_other_platform_unsupported() {
        assert!(toast_command(Platform::Other, &alert()).is_none());
        assert!(dialog_command(Platform::Other, &alert()).is_none());
    }
}
