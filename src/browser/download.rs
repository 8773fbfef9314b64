use crate::error::BrowserError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{sleep, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Stand-in deadline for timeouts too large to add to `Instant::now()`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Suffixes browsers use while a download is still in flight
const PARTIAL_SUFFIXES: &[&str] = &[".crdownload", ".part", ".partial", ".tmp", ".download"];

fn is_finished(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    let lower = name.to_lowercase();
    !PARTIAL_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// `now + timeout`, saturating at roughly 30 years out
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Finished files currently in `dir`, sorted by name
pub fn finished_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && is_finished(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Wait until a finished download shows up in `dir`
pub async fn wait_for_file(dir: &Path, timeout: Duration) -> Result<PathBuf, BrowserError> {
    let deadline = deadline_after(timeout);

    loop {
        if let Some(path) = finished_files(dir)?.into_iter().next() {
            return Ok(path);
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::Timeout {
                what: "download".to_string(),
                timeout,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}
