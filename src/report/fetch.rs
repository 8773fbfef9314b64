use crate::browser::{
    kill_stale_browser, BrowserLauncher, BrowserSession, LaunchOptions, Locator,
};
use crate::config::{Config, FilterDropdown};
use crate::error::{BrowserError, ConfigError, FetchError};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::naming::{format_date, report_date, report_file_name};

const DEBUG_SCREENSHOT: &str = "debug_error.png";

fn step(name: &'static str) -> impl FnOnce(BrowserError) -> FetchError {
    move |source| FetchError::Step { step: name, source }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Drives one browser session through login, filters and export
pub struct ReportFetcher {
    config: Config,
    launcher: Arc<dyn BrowserLauncher>,
    output_dir: PathBuf,
}

impl ReportFetcher {
    pub fn new(config: Config, launcher: Arc<dyn BrowserLauncher>, output_dir: PathBuf) -> Self {
        Self {
            config,
            launcher,
            output_dir,
        }
    }

    pub fn report_date(&self) -> Result<NaiveDate, ConfigError> {
        report_date(Local::now().date_naive(), self.config.report.day_offset)
    }

    /// One attempt for the current report date
    pub async fn fetch(&self) -> Result<PathBuf, FetchError> {
        self.fetch_for(self.report_date()?).await
    }

    /// One attempt. The browser session is closed before this returns,
    /// whatever the outcome.
    pub async fn fetch_for(&self, date: NaiveDate) -> Result<PathBuf, FetchError> {
        if !self.config.headless && self.config.browser.kill_existing {
            kill_stale_browser(self.config.browser.kind);
        }

        let options = LaunchOptions::from_config(&self.config);
        let mut session = self
            .launcher
            .launch(&options)
            .await
            .map_err(step("launch browser"))?;

        let result = self.drive(session.as_mut(), date).await;

        if let Err(e) = &result {
            error!("Attempt failed: {}", e);
            if !self.config.headless {
                self.capture_debug(session.as_mut()).await;
            }
        }

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        result
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        date: NaiveDate,
    ) -> Result<PathBuf, FetchError> {
        let config = &self.config;
        let timeouts = &config.timeouts;
        let action = ms(timeouts.action_ms);

        info!(
            "Navigating to the report page (headless: {})...",
            config.headless
        );
        session
            .navigate(&config.report_url)
            .await
            .map_err(step("open report page"))?;

        self.login(session).await?;

        info!("Refreshing page once...");
        session.reload().await.map_err(step("reload"))?;
        sleep(ms(timeouts.settle_ms)).await;

        info!("Re-opening report page...");
        session
            .navigate(&config.report_url)
            .await
            .map_err(step("reopen report page"))?;

        let date_str = format_date(date, &config.report.date_format)?;
        info!("Using date: {}", date_str);

        self.select_filters(session).await?;

        info!("Filling dates...");
        for selector in [
            &config.report.from_date_selector,
            &config.report.to_date_selector,
        ] {
            session
                .set_value(&Locator::css(selector), &date_str, action)
                .await
                .map_err(step("fill dates"))?;
        }

        info!("Clicking View...");
        session
            .click(&Locator::button(&config.report.view_button), action)
            .await
            .map_err(step("view report"))?;
        sleep(ms(timeouts.settle_ms)).await;

        info!("Exporting to Excel...");
        session
            .click(&Locator::button(&config.report.export_button), action)
            .await
            .map_err(step("export"))?;
        let downloaded = session
            .wait_for_download(ms(timeouts.download_ms))
            .await
            .map_err(step("download"))?;

        let saved = self.save(&downloaded, &date_str).await?;
        info!("Success! File saved to: {}", saved.display());

        let dismiss = Locator::button(&config.report.dismiss_button);
        if let Err(e) = session.click(&dismiss, ms(timeouts.dismiss_ms)).await {
            debug!("No confirmation to dismiss: {}", e);
        }

        Ok(saved)
    }

    async fn login(&self, session: &mut dyn BrowserSession) -> Result<(), FetchError> {
        let config = &self.config;
        let login = &config.login;
        let timeouts = &config.timeouts;
        let action = ms(timeouts.action_ms);

        info!("Waiting for login popup...");
        let popup = session
            .wait_for_popup(ms(timeouts.login_popup_ms))
            .await
            .map_err(step("login popup"))?;
        session.switch_to(&popup).await.map_err(step("login popup"))?;

        info!("Performing login...");
        session
            .fill(&Locator::textbox(&login.email_field), &config.email, action)
            .await
            .map_err(step("login email"))?;
        session
            .click(&Locator::button(&login.next_button), action)
            .await
            .map_err(step("login email"))?;

        let password = Locator::textbox(&login.password_field);
        session
            .wait_for(&password, ms(timeouts.password_field_ms))
            .await
            .map_err(step("login password"))?;
        session
            .fill(&password, &config.password, action)
            .await
            .map_err(step("login password"))?;
        session
            .press_enter(&password, action)
            .await
            .map_err(step("login password"))?;

        let consent = Locator::button(&login.consent_button);
        if let Err(e) = session.click(&consent, ms(timeouts.consent_ms)).await {
            debug!("No stay-signed-in prompt: {}", e);
        }
        if let Err(e) = session
            .wait_for_close(&popup, ms(timeouts.popup_close_ms))
            .await
        {
            debug!("Login popup did not close: {}", e);
        }

        session.switch_to_main().await.map_err(step("login"))?;
        Ok(())
    }

    async fn select_filters(&self, session: &mut dyn BrowserSession) -> Result<(), FetchError> {
        let report = &self.config.report;
        let action = ms(self.config.timeouts.action_ms);

        info!("Waiting for page elements...");
        if let Some(selector) = report.filters.first().and_then(|f| f.open.first()) {
            session
                .wait_for(
                    &Locator::css(selector),
                    ms(self.config.timeouts.page_load_ms),
                )
                .await
                .map_err(step("report page"))?;
        }

        info!("Selecting report parameters...");
        for (idx, filter) in report.filters.iter().enumerate() {
            debug!("Filter dropdown {}", idx + 1);
            self.open_dropdown(session, filter)
                .await
                .map_err(step("open filter"))?;

            if let Some(select_all) = &filter.select_all {
                session
                    .click(
                        &Locator::with_text(&select_all.panel, &select_all.text),
                        action,
                    )
                    .await
                    .map_err(step("select filter"))?;
            }
            session
                .click(&Locator::css(&report.option_selector), action)
                .await
                .map_err(step("select filter"))?;
            session
                .click(&Locator::last(&report.backdrop_selector), action)
                .await
                .map_err(step("close filter"))?;
        }
        Ok(())
    }

    /// Click the first of the dropdown's selectors that works
    async fn open_dropdown(
        &self,
        session: &mut dyn BrowserSession,
        filter: &FilterDropdown,
    ) -> Result<(), BrowserError> {
        let timeouts = &self.config.timeouts;
        let mut last_error = None;

        for (idx, selector) in filter.open.iter().enumerate() {
            let timeout = if idx + 1 == filter.open.len() {
                ms(timeouts.action_ms)
            } else {
                ms(timeouts.fallback_ms)
            };

            match session.click(&Locator::css(selector), timeout).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!("Could not open dropdown via '{}': {}", selector, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| BrowserError::Timeout {
            what: "filter dropdown".to_string(),
            timeout: Duration::ZERO,
        }))
    }

    async fn save(&self, downloaded: &Path, date_str: &str) -> Result<PathBuf, FetchError> {
        let file_name = report_file_name(&self.config.report.file_prefix, date_str, downloaded);
        let target = self.output_dir.join(file_name);

        tokio::fs::copy(downloaded, &target)
            .await
            .map_err(|e| FetchError::Save {
                path: target.clone(),
                source: e,
            })?;
        if let Err(e) = tokio::fs::remove_file(downloaded).await {
            debug!("Could not remove {}: {}", downloaded.display(), e);
        }

        Ok(target)
    }

    async fn capture_debug(&self, session: &mut dyn BrowserSession) {
        let path = self.output_dir.join(DEBUG_SCREENSHOT);
        match session.screenshot(&path).await {
            Ok(()) => info!("Saved debug screenshot to {}", path.display()),
            Err(e) => warn!("Could not capture debug screenshot: {}", e),
        }
    }
}
