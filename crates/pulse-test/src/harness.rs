//! Test harness helpers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

/// How long [`next_event`] waits by default.
pub const DEFAULT_EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// Wait for the first event matching `predicate`, skipping the rest.
///
/// Returns `None` on timeout or when the channel closes. Lagged receivers
/// keep reading.
pub async fn next_event<T, F>(rx: &mut broadcast::Receiver<T>, predicate: F) -> Option<T>
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    next_event_within(rx, DEFAULT_EVENT_TIMEOUT, predicate).await
}

/// [`next_event`] with an explicit timeout.
pub async fn next_event_within<T, F>(
    rx: &mut broadcast::Receiver<T>,
    timeout: Duration,
    mut predicate: F,
) -> Option<T>
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    let wait = async {
        loop {
            match rx.recv().await {
                Ok(event) if predicate(&event) => return Some(event),
                Ok(_) | Err(RecvError::Lagged(_)) => {},
                Err(RecvError::Closed) => return None,
            }
        }
    };
    tokio::time::timeout(timeout, wait).await.ok().flatten()
}

/// Every event received during `window`.
pub async fn collect_events<T: Clone>(rx: &mut broadcast::Receiver<T>, window: Duration) -> Vec<T> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now()
        .checked_add(window)
        .unwrap_or_else(tokio::time::Instant::now);
    while let Ok(result) = tokio::time::timeout_at(deadline, rx.recv()).await {
        match result {
            Ok(event) => events.push(event),
            Err(RecvError::Lagged(_)) => {},
            Err(RecvError::Closed) => break,
        }
    }
    events
}

/// Create a temporary directory for testing.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn test_dir() -> TempDir {
    TempDir::new().expect("failed to create temp dir")
}

/// Write `contents` to `name` inside `dir`, returning the full path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent dir");
    }
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

/// Set up test logging with the given filter.
///
/// Safe to call from many tests; only the first call installs a subscriber.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn my_test() {
///     setup_test_logging("pulse_gateway=debug");
///     // ... test code
/// }
/// ```
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Set up test logging with default filter (warn level).
pub fn setup_test_logging_default() {
    setup_test_logging("warn");
}
