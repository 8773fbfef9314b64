use super::types::{FilterDropdown, SelectAll};

pub fn default_max_attempts() -> u32 {
    5
}

pub fn default_delay_ms() -> u64 {
    10_000
}

pub fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

pub fn default_viewport_width() -> u32 {
    1280
}

pub fn default_viewport_height() -> u32 {
    720
}

pub fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
        .to_string()
}

pub fn default_slow_mo_ms() -> u64 {
    100
}

pub fn default_email_field() -> String {
    "Enter your email or phone".to_string()
}

pub fn default_next_button() -> String {
    "Next".to_string()
}

pub fn default_password_field() -> String {
    "Enter the password for".to_string()
}

pub fn default_consent_button() -> String {
    "Yes".to_string()
}

pub fn default_action_ms() -> u64 {
    30_000
}

pub fn default_fallback_ms() -> u64 {
    5_000
}

pub fn default_login_popup_ms() -> u64 {
    45_000
}

pub fn default_password_field_ms() -> u64 {
    30_000
}

pub fn default_consent_ms() -> u64 {
    5_000
}

pub fn default_popup_close_ms() -> u64 {
    15_000
}

pub fn default_page_load_ms() -> u64 {
    60_000
}

pub fn default_settle_ms() -> u64 {
    2_000
}

pub fn default_download_ms() -> u64 {
    120_000
}

pub fn default_dismiss_ms() -> u64 {
    2_000
}

pub fn default_file_prefix() -> String {
    "OrderReport".to_string()
}

pub fn default_date_format() -> String {
    "%m-%d-%Y".to_string()
}

pub fn default_day_offset() -> i64 {
    1
}

pub fn default_option_selector() -> String {
    ".mat-checkbox-inner-container".to_string()
}

pub fn default_backdrop_selector() -> String {
    ".cdk-overlay-backdrop".to_string()
}

pub fn default_from_date_selector() -> String {
    "input[formcontrolname=\"frmDate\"]".to_string()
}

pub fn default_to_date_selector() -> String {
    "input[formcontrolname=\"toDate\"]".to_string()
}

pub fn default_view_button() -> String {
    "View".to_string()
}

pub fn default_export_button() -> String {
    "Export To Excel".to_string()
}

pub fn default_dismiss_button() -> String {
    "OK".to_string()
}

pub fn default_filters() -> Vec<FilterDropdown> {
    vec![
        FilterDropdown {
            open: vec![".mat-select-arrow".to_string()],
            select_all: Some(SelectAll {
                panel: "#mat-select-0-panel div".to_string(),
                text: "Select All".to_string(),
            }),
        },
        FilterDropdown {
            open: vec![".mat-select-placeholder".to_string()],
            select_all: None,
        },
        // The generated class suffix changes between portal releases
        FilterDropdown {
            open: vec![
                ".mat-form-field-infix.ng-tns-c141-4".to_string(),
                ".mat-select-placeholder".to_string(),
            ],
            select_all: None,
        },
    ]
}

pub fn default_alert_title() -> String {
    "OM Automation FAILED".to_string()
}

pub fn default_true() -> bool {
    true
}
