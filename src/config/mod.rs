mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use crate::report::format_date;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Largest `report.day_offset` in either direction, about a century
pub const MAX_DAY_OFFSET: i64 = 36_500;

impl Default for Config {
    fn default() -> Self {
        Self {
            report_url: String::new(),
            email: String::new(),
            password: String::new(),
            output_folder: String::new(),
            headless: false,
            retry: RetryConfig::default(),
            browser: BrowserConfig::default(),
            login: LoginConfig::default(),
            timeouts: TimeoutsConfig::default(),
            report: ReportConfig::default(),
            alert: AlertConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a JSON or YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_url.trim().is_empty() {
            return Err(ConfigError::Missing("report_url"));
        }
        if self.email.trim().is_empty() {
            return Err(ConfigError::Missing("email"));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if !(-MAX_DAY_OFFSET..=MAX_DAY_OFFSET).contains(&self.report.day_offset) {
            return Err(ConfigError::DayOffset(self.report.day_offset));
        }
        // Formatting a sample date catches both bad specifiers and time fields
        format_date(NaiveDate::default(), &self.report.date_format)?;
        for (idx, filter) in self.report.filters.iter().enumerate() {
            if filter.open.is_empty() {
                return Err(ConfigError::EmptyFilter(idx + 1));
            }
        }
        Ok(())
    }

    /// Resolve the output folder (blank = cwd) and make sure it exists
    pub fn prepare_output_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = match self.output_dir() {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => std::env::current_dir()
                .map_err(|e| ConfigError::OutputDir {
                    path: dir.clone(),
                    source: e,
                })?
                .join(dir),
            None => std::env::current_dir().map_err(|e| ConfigError::OutputDir {
                path: PathBuf::from("."),
                source: e,
            })?,
        };

        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::OutputDir {
            path: dir.clone(),
            source: e,
        })?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> Config {
        Config {
            report_url: "https://portal.example/report".to_string(),
            email: "ops@example.com".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_load_original_json_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "reportUrl": "https://portal.example/report",
                "email": "ops@example.com",
                "password": "hunter2",
                "outputFolder": "  ",
                "headless": true
            }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.report_url, "https://portal.example/report");
        assert_eq!(config.password, "hunter2");
        assert!(config.headless);
        assert!(config.output_dir().is_none());
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_ms, 10_000);
        assert_eq!(config.report.filters.len(), 3);
        config.validate().unwrap();
    }

    #[test]
    fn test_load_yaml_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "report_url: https://portal.example/report\n\
             email: ops@example.com\n\
             retry:\n  max_attempts: 2\n  delay_ms: 50\n\
             browser:\n  kind: chrome\n\
             report:\n  filters:\n    - open: ['.mat-select-placeholder']\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.browser.kind, BrowserKind::Chrome);
        assert_eq!(config.report.filters.len(), 1);
        assert!(config.report.filters[0].select_all.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = valid_config();
        config.retry.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroAttempts)));
    }

    #[test]
    fn test_validate_requires_url_and_email() {
        let mut config = valid_config();
        config.report_url = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("report_url"))
        ));

        let mut config = valid_config();
        config.email.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("email"))));
    }

    #[test]
    fn test_validate_rejects_bad_date_format() {
        let mut config = valid_config();
        config.report.date_format = "%m-%Q".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::DateFormat(_))));
    }

    #[test]
    fn test_validate_rejects_time_fields_in_date_format() {
        let mut config = valid_config();
        config.report.date_format = "%m-%d-%Y_%H%M".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::DateFormat(_))));

        config.report.date_format = "%d.%m.%y".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_day_offset() {
        let mut config = valid_config();
        for offset in [i64::MAX / 2, i64::MIN, MAX_DAY_OFFSET + 1, -MAX_DAY_OFFSET - 1] {
            config.report.day_offset = offset;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::DayOffset(o)) if o == offset
            ));
        }

        for offset in [0, 7, -1, MAX_DAY_OFFSET] {
            config.report.day_offset = offset;
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_empty_filter() {
        let mut config = valid_config();
        config.report.filters[1].open.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyFilter(2))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = valid_config();
        config.password = "hunter2".to_string();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_prepare_output_dir_creates_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("reports/daily");
        let mut config = valid_config();
        config.output_folder = target.display().to_string();

        let dir = config.prepare_output_dir().unwrap();
        assert_eq!(dir, target);
        assert!(target.is_dir());
    }
}
