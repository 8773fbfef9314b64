use crate::error::ConfigError;
use chrono::{NaiveDate, TimeDelta};
use std::fmt::Write;
use std::path::Path;

/// Date the report covers: `today` minus `day_offset` days
pub fn report_date(today: NaiveDate, day_offset: i64) -> Result<NaiveDate, ConfigError> {
    TimeDelta::try_days(day_offset)
        .and_then(|delta| today.checked_sub_signed(delta))
        .ok_or(ConfigError::DayOffset(day_offset))
}

/// Format `date`, rejecting specifiers a plain date cannot fill (`%H`, `%M`, ...)
pub fn format_date(date: NaiveDate, format: &str) -> Result<String, ConfigError> {
    let mut formatted = String::new();
    write!(formatted, "{}", date.format(format))
        .map_err(|_| ConfigError::DateFormat(format.to_string()))?;
    Ok(formatted)
}

/// `<prefix>_<date><ext>`, keeping the extension of the browser's file name
pub fn report_file_name(prefix: &str, date: &str, downloaded: &Path) -> String {
    let extension = downloaded
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let date: String = date
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            other => other,
        })
        .collect();

    format!("{}_{}{}", prefix, date, extension)
}
