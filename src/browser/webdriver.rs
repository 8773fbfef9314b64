use super::download::{deadline_after, wait_for_file};
use super::locator::{role_xpath, Locator, Nth};
use super::{BrowserLauncher, BrowserSession, LaunchOptions, WindowHandle};
use crate::config::BrowserKind;
use crate::error::BrowserError;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Method};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// W3C web element identifier key
const ELEMENT_KEY: &str = "element-6066-11e4-a932-00fb4c1ade71";
const ENTER_KEY: &str = "\u{E007}";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

const SET_VALUE_SCRIPT: &str = "const el = arguments[0]; el.value = arguments[1]; \
    el.dispatchEvent(new Event('input', { bubbles: true })); \
    el.dispatchEvent(new Event('change', { bubbles: true }));";

/// Launches sessions against a WebDriver server (msedgedriver, chromedriver)
pub struct WebDriverLauncher {
    client: Client,
    base_url: String,
    kind: BrowserKind,
}

impl WebDriverLauncher {
    pub fn new(base_url: &str, kind: BrowserKind) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            kind,
        }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(
        &self,
        options: &LaunchOptions,
    ) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let download_dir = tempfile::Builder::new().prefix("omreport-").tempdir()?;
        let body = capabilities(self.kind, options, download_dir.path());

        debug!("Creating {} session at {}", self.kind, self.base_url);
        let url = format!("{}/session", self.base_url);
        let value = send(&self.client, Method::POST, &url, Some(&body)).await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| BrowserError::Protocol("new session without sessionId".to_string()))?;

        let mut session = WebDriverSession {
            client: self.client.clone(),
            session_url: format!("{}/session/{}", self.base_url, session_id),
            main_window: WindowHandle(String::new()),
            initial_windows: Vec::new(),
            slow_mo: options.slow_mo,
            download_dir,
            closed: false,
        };

        if let Err(e) = session.record_windows().await {
            if let Err(close_err) = session.close().await {
                warn!("Failed to close browser session: {}", close_err);
            }
            return Err(e);
        }

        debug!("Session {} started", session_id);
        Ok(Box::new(session))
    }
}

/// New-session payload for Edge or Chrome
pub fn capabilities(kind: BrowserKind, options: &LaunchOptions, download_dir: &Path) -> Value {
    let mut args = vec![
        format!("--window-size={},{}", options.viewport.0, options.viewport.1),
        format!("--user-agent={}", options.user_agent),
    ];
    if options.headless {
        args.push("--headless=new".to_string());
    }

    let browser_options = json!({
        "args": args,
        "prefs": {
            "download.default_directory": download_dir.display().to_string(),
            "download.prompt_for_download": false,
            "download.directory_upgrade": true,
            "safebrowsing.enabled": true
        }
    });

    let (browser_name, options_key) = match kind {
        BrowserKind::Edge => ("MicrosoftEdge", "ms:edgeOptions"),
        BrowserKind::Chrome => ("chrome", "goog:chromeOptions"),
    };

    let mut always_match = Map::new();
    always_match.insert("browserName".to_string(), json!(browser_name));
    always_match.insert(
        "timeouts".to_string(),
        json!({ "pageLoad": options.page_load_timeout.as_millis() as u64 }),
    );
    always_match.insert(options_key.to_string(), browser_options);

    json!({ "capabilities": { "alwaysMatch": always_match } })
}

async fn send(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<&Value>,
) -> Result<Value, BrowserError> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await?;
    let ok = response.status().is_success();
    let payload: Value = response.json().await?;
    parse_response(ok, payload)
}

/// Unwrap `{"value": ...}`, mapping error payloads to `BrowserError`
fn parse_response(ok: bool, mut payload: Value) -> Result<Value, BrowserError> {
    let value = payload
        .get_mut("value")
        .map(Value::take)
        .unwrap_or(Value::Null);

    if ok {
        return Ok(value);
    }

    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Err(BrowserError::WebDriver { error, message })
}

fn element_ids(value: &Value) -> Result<Vec<String>, BrowserError> {
    let items = value
        .as_array()
        .ok_or_else(|| BrowserError::Protocol(format!("expected element list, got {}", value)))?;

    items
        .iter()
        .map(|item| {
            item.get(ELEMENT_KEY)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| BrowserError::Protocol(format!("not an element: {}", item)))
        })
        .collect()
}

fn element_ref(id: &str) -> Value {
    json!({ ELEMENT_KEY: id })
}

enum Action<'a> {
    Wait,
    Click,
    Fill(&'a str),
    Keys(&'a str),
    SetValue(&'a str),
}

pub struct WebDriverSession {
    client: Client,
    session_url: String,
    main_window: WindowHandle,
    initial_windows: Vec<String>,
    slow_mo: Duration,
    // Removed together with the session
    download_dir: TempDir,
    closed: bool,
}

impl WebDriverSession {
    async fn get(&self, path: &str) -> Result<Value, BrowserError> {
        self.ensure_open()?;
        let url = format!("{}/{}", self.session_url, path);
        send(&self.client, Method::GET, &url, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, BrowserError> {
        self.ensure_open()?;
        let url = format!("{}/{}", self.session_url, path);
        send(&self.client, Method::POST, &url, Some(&body)).await
    }

    fn ensure_open(&self) -> Result<(), BrowserError> {
        if self.closed {
            Err(BrowserError::Closed)
        } else {
            Ok(())
        }
    }

    async fn pace(&self) {
        if !self.slow_mo.is_zero() {
            sleep(self.slow_mo).await;
        }
    }

    async fn record_windows(&mut self) -> Result<(), BrowserError> {
        let main = self.get("window").await?;
        let main = main
            .as_str()
            .ok_or_else(|| BrowserError::Protocol(format!("bad window handle: {}", main)))?;
        self.main_window = WindowHandle(main.to_string());
        self.initial_windows = self.window_handles().await?;
        Ok(())
    }

    async fn window_handles(&self) -> Result<Vec<String>, BrowserError> {
        let value = self.get("window/handles").await?;
        let handles = value
            .as_array()
            .ok_or_else(|| BrowserError::Protocol(format!("bad window handles: {}", value)))?;
        Ok(handles
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }

    async fn find_all(&self, using: &str, value: &str) -> Result<Vec<String>, BrowserError> {
        let found = self
            .post("elements", json!({ "using": using, "value": value }))
            .await?;
        element_ids(&found)
    }

    async fn is_displayed(&self, id: &str) -> Result<bool, BrowserError> {
        let value = self.get(&format!("element/{}/displayed", id)).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn text(&self, id: &str) -> Result<String, BrowserError> {
        let value = self.get(&format!("element/{}/text", id)).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Visible element for the locator, if there is one right now
    async fn resolve(&self, locator: &Locator) -> Result<Option<String>, BrowserError> {
        let candidates = match locator {
            Locator::Css { selector, .. } => self.find_all("css selector", selector).await?,
            Locator::CssWithText { selector, text } => {
                let mut matching = Vec::new();
                for id in self.find_all("css selector", selector).await? {
                    if self.text(&id).await?.contains(text.as_str()) {
                        matching.push(id);
                    }
                }
                matching
            }
            Locator::Role { role, name } => self.find_all("xpath", &role_xpath(*role, name)).await?,
        };

        let mut visible = Vec::new();
        for id in candidates {
            if self.is_displayed(&id).await? {
                visible.push(id);
            }
        }

        Ok(match locator {
            Locator::Css { nth: Nth::Last, .. } => visible.pop(),
            _ => visible.into_iter().next(),
        })
    }

    async fn perform(&self, id: &str, action: &Action<'_>) -> Result<(), BrowserError> {
        match action {
            Action::Wait => {}
            Action::Click => {
                self.post(&format!("element/{}/click", id), json!({})).await?;
            }
            Action::Fill(text) => {
                self.post(&format!("element/{}/clear", id), json!({})).await?;
                self.post(&format!("element/{}/value", id), json!({ "text": text }))
                    .await?;
            }
            Action::Keys(text) => {
                self.post(&format!("element/{}/value", id), json!({ "text": text }))
                    .await?;
            }
            Action::SetValue(value) => {
                self.post(
                    "execute/sync",
                    json!({ "script": SET_VALUE_SCRIPT, "args": [element_ref(id), value] }),
                )
                .await?;
            }
        }
        Ok(())
    }

    /// Resolve and act, retrying stale or intercepted elements until the deadline
    async fn act(
        &self,
        locator: &Locator,
        timeout: Duration,
        action: Action<'_>,
    ) -> Result<(), BrowserError> {
        let deadline = deadline_after(timeout);
        let mut last_error = None;

        loop {
            let attempt = match self.resolve(locator).await {
                Ok(Some(id)) => self.perform(&id, &action).await.map(Some),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            };

            match attempt {
                Ok(Some(())) => {
                    if !matches!(action, Action::Wait) {
                        self.pace().await;
                    }
                    return Ok(());
                }
                Ok(None) => {}
                Err(e @ BrowserError::WebDriver { .. }) => {
                    debug!("Retrying {}: {}", locator, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Err(last_error.unwrap_or_else(|| BrowserError::Timeout {
                    what: locator.to_string(),
                    timeout,
                }));
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.post("url", json!({ "url": url })).await?;
        self.pace().await;
        Ok(())
    }

    async fn reload(&mut self) -> Result<(), BrowserError> {
        self.post("refresh", json!({})).await?;
        self.pace().await;
        Ok(())
    }

    async fn wait_for_popup(&mut self, timeout: Duration) -> Result<WindowHandle, BrowserError> {
        let deadline = deadline_after(timeout);
        loop {
            let handles = self.window_handles().await?;
            if let Some(new) = handles
                .into_iter()
                .find(|h| !self.initial_windows.contains(h))
            {
                return Ok(WindowHandle(new));
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    what: "popup window".to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn switch_to(&mut self, window: &WindowHandle) -> Result<(), BrowserError> {
        self.post("window", json!({ "handle": window.0 })).await?;
        Ok(())
    }

    async fn switch_to_main(&mut self) -> Result<(), BrowserError> {
        let main = self.main_window.clone();
        self.switch_to(&main).await
    }

    async fn wait_for_close(
        &mut self,
        window: &WindowHandle,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let deadline = deadline_after(timeout);
        loop {
            if !self.window_handles().await?.contains(&window.0) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    what: "popup window to close".to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        self.act(locator, timeout, Action::Wait).await
    }

    async fn fill(
        &mut self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.act(locator, timeout, Action::Fill(text)).await
    }

    async fn press_enter(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.act(locator, timeout, Action::Keys(ENTER_KEY)).await
    }

    async fn click(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        self.act(locator, timeout, Action::Click).await
    }

    async fn set_value(
        &mut self,
        locator: &Locator,
        value: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.act(locator, timeout, Action::SetValue(value)).await
    }

    async fn wait_for_download(&mut self, timeout: Duration) -> Result<PathBuf, BrowserError> {
        self.ensure_open()?;
        wait_for_file(self.download_dir.path(), timeout).await
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), BrowserError> {
        let value = self.get("screenshot").await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| BrowserError::Protocol("screenshot is not a string".to_string()))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| BrowserError::Protocol(format!("bad screenshot data: {}", e)))?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        match send(&self.client, Method::DELETE, &self.session_url, None).await {
            Ok(_) => {
                debug!("Closed session {}", self.session_url);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to close session {}: {}", self.session_url, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(headless: bool) -> LaunchOptions {
        LaunchOptions {
            headless,
            viewport: (1280, 720),
            user_agent: "test-agent".to_string(),
            slow_mo: Duration::ZERO,
            page_load_timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_edge_capabilities() {
        let caps = capabilities(BrowserKind::Edge, &options(true), Path::new("/tmp/dl"));
        let always = &caps["capabilities"]["alwaysMatch"];
        assert_eq!(always["browserName"], "MicrosoftEdge");
        assert_eq!(always["timeouts"]["pageLoad"], 60_000);

        let edge = &always["ms:edgeOptions"];
        let args: Vec<&str> = edge["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap())
            .collect();
        assert!(args.contains(&"--headless=new"));
        assert!(args.contains(&"--window-size=1280,720"));
        assert!(args.contains(&"--user-agent=test-agent"));
        assert_eq!(edge["prefs"]["download.default_directory"], "/tmp/dl");
        assert_eq!(edge["prefs"]["download.prompt_for_download"], false);
    }

    #[test]
    fn test_chrome_capabilities_visible() {
        let caps = capabilities(BrowserKind::Chrome, &options(false), Path::new("/tmp/dl"));
        let always = &caps["capabilities"]["alwaysMatch"];
        assert_eq!(always["browserName"], "chrome");
        let args = always["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
        assert!(always.get("ms:edgeOptions").is_none());
    }

    #[test]
    fn test_parse_response_success() {
        let value = parse_response(true, json!({ "value": { "sessionId": "abc" } })).unwrap();
        assert_eq!(value["sessionId"], "abc");

        let value = parse_response(true, json!({ "value": null })).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_parse_response_error() {
        let err = parse_response(
            false,
            json!({ "value": { "error": "no such element", "message": "Unable to locate" } }),
        )
        .unwrap_err();
        match err {
            BrowserError::WebDriver { error, message } => {
                assert_eq!(error, "no such element");
                assert_eq!(message, "Unable to locate");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_element_ids() {
        let ids = element_ids(&json!([
            { ELEMENT_KEY: "a" },
            { ELEMENT_KEY: "b" }
        ]))
        .unwrap();
        assert_eq!(ids, vec!["a", "b"]);

        assert!(element_ids(&json!({ "not": "a list" })).is_err());
        assert!(element_ids(&json!([{ "id": "x" }])).is_err());
    }

    #[test]
    fn test_element_ref() {
        assert_eq!(element_ref("e1")[ELEMENT_KEY], "e1");
    }
}
