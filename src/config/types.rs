use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default, alias = "reportUrl")]
    pub report_url: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    /// Blank means the current working directory
    #[serde(default, alias = "outputFolder")]
    pub output_folder: String,

    #[serde(default)]
    pub headless: bool,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub login: LoginConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub alert: AlertConfig,
}

// Manual Debug impl to avoid leaking the password
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("report_url", &self.report_url)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("output_folder", &self.output_folder)
            .field("headless", &self.headless)
            .field("retry", &self.retry)
            .field("browser", &self.browser)
            .field("login", &self.login)
            .field("timeouts", &self.timeouts)
            .field("report", &self.report)
            .field("alert", &self.alert)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Edge,
    Chrome,
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserKind::Edge => write!(f, "edge"),
            BrowserKind::Chrome => write!(f, "chrome"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct BrowserConfig {
    #[serde(default)]
    pub kind: BrowserKind,

    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pause after every browser action when not headless
    #[serde(default = "default_slow_mo_ms")]
    pub slow_mo_ms: u64,

    /// Terminate leftover browser processes before a visible launch
    #[serde(default = "default_true")]
    pub kill_existing: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            webdriver_url: default_webdriver_url(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            user_agent: default_user_agent(),
            slow_mo_ms: default_slow_mo_ms(),
            kill_existing: true,
        }
    }
}

/// Accessible names on the federated sign-in popup
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct LoginConfig {
    #[serde(default = "default_email_field")]
    pub email_field: String,

    #[serde(default = "default_next_button")]
    pub next_button: String,

    #[serde(default = "default_password_field")]
    pub password_field: String,

    /// "Stay signed in?" prompt; clicked if it shows up
    #[serde(default = "default_consent_button")]
    pub consent_button: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            email_field: default_email_field(),
            next_button: default_next_button(),
            password_field: default_password_field(),
            consent_button: default_consent_button(),
        }
    }
}

/// Per-step timeouts, in milliseconds
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TimeoutsConfig {
    /// Default wait for an element action
    #[serde(default = "default_action_ms")]
    pub action_ms: u64,

    /// Wait for a fallback selector before moving on to the next one
    #[serde(default = "default_fallback_ms")]
    pub fallback_ms: u64,

    #[serde(default = "default_login_popup_ms")]
    pub login_popup_ms: u64,

    #[serde(default = "default_password_field_ms")]
    pub password_field_ms: u64,

    #[serde(default = "default_consent_ms")]
    pub consent_ms: u64,

    #[serde(default = "default_popup_close_ms")]
    pub popup_close_ms: u64,

    #[serde(default = "default_page_load_ms")]
    pub page_load_ms: u64,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_download_ms")]
    pub download_ms: u64,

    #[serde(default = "default_dismiss_ms")]
    pub dismiss_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            action_ms: default_action_ms(),
            fallback_ms: default_fallback_ms(),
            login_popup_ms: default_login_popup_ms(),
            password_field_ms: default_password_field_ms(),
            consent_ms: default_consent_ms(),
            popup_close_ms: default_popup_close_ms(),
            page_load_ms: default_page_load_ms(),
            settle_ms: default_settle_ms(),
            download_ms: default_download_ms(),
            dismiss_ms: default_dismiss_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ReportConfig {
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// chrono format string used for the filter inputs and the file name
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Report date is today minus this many days (at most 36500 either way)
    #[serde(default = "default_day_offset")]
    pub day_offset: i64,

    #[serde(default = "default_filters")]
    pub filters: Vec<FilterDropdown>,

    #[serde(default = "default_option_selector")]
    pub option_selector: String,

    #[serde(default = "default_backdrop_selector")]
    pub backdrop_selector: String,

    #[serde(default = "default_from_date_selector")]
    pub from_date_selector: String,

    #[serde(default = "default_to_date_selector")]
    pub to_date_selector: String,

    #[serde(default = "default_view_button")]
    pub view_button: String,

    #[serde(default = "default_export_button")]
    pub export_button: String,

    /// Post-export confirmation; clicked if it shows up
    #[serde(default = "default_dismiss_button")]
    pub dismiss_button: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            date_format: default_date_format(),
            day_offset: default_day_offset(),
            filters: default_filters(),
            option_selector: default_option_selector(),
            backdrop_selector: default_backdrop_selector(),
            from_date_selector: default_from_date_selector(),
            to_date_selector: default_to_date_selector(),
            view_button: default_view_button(),
            export_button: default_export_button(),
            dismiss_button: default_dismiss_button(),
        }
    }
}

/// One filter dropdown on the report page
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct FilterDropdown {
    /// CSS selectors tried in order until one can be clicked
    pub open: Vec<String>,

    #[serde(default)]
    pub select_all: Option<SelectAll>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SelectAll {
    pub panel: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AlertConfig {
    #[serde(default = "default_true")]
    pub sound: bool,

    #[serde(default = "default_true")]
    pub toast: bool,

    #[serde(default = "default_true")]
    pub dialog: bool,

    #[serde(default = "default_alert_title")]
    pub title: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sound: true,
            toast: true,
            dialog: true,
            title: default_alert_title(),
        }
    }
}

impl Config {
    pub fn output_dir(&self) -> Option<PathBuf> {
        let trimmed = self.output_folder.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}
