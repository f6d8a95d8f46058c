//! The navigation side effect triggered when a session cannot be recovered.

use std::sync::Mutex;

/// Performs a hard navigation, e.g. `window.location.href = path` in a browser.
pub trait Navigator: Send + Sync {
    /// Navigate to `path`.
    fn redirect(&self, path: &str);
}

/// Navigator that only records where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create an empty navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths redirected to, oldest first.
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().expect("Mutex is not poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        tracing::info!(path, "Redirecting");
        self.visited
            .lock()
            .expect("Mutex is not poisoned")
            .push(path.to_string());
    }
}
