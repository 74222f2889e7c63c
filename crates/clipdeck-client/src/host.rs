use std::cell::{Cell, RefCell};
use std::sync::Arc;

use clipdeck_common::{ClipdeckError, HostBridge, Subscription};
use tracing::{debug, warn};

use crate::history::HistoryStore;

/// Where written values end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    /// The system clipboard.
    System,
    /// Nowhere; values are only remembered for `--print`.
    Disabled,
}

/// System clipboard handle, opened on first write and kept for the life of
/// the process (on X11 the contents are served by the owning handle).
struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipdeckError> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(|e| ClipdeckError::Clipboard(e.to_string()))?,
        };
        let clipboard = self.inner.insert(clipboard);
        clipboard
            .set_text(text)
            .map_err(|e| ClipdeckError::Clipboard(e.to_string()))
    }
}

/// In-process host for the terminal front end.
pub struct LocalHost {
    store: Arc<HistoryStore>,
    clipboard: Option<RefCell<SystemClipboard>>,
    last_written: RefCell<Option<String>>,
    close_requested: Cell<bool>,
}

impl LocalHost {
    pub fn new(store: Arc<HistoryStore>, mode: ClipboardMode) -> Self {
        let clipboard = match mode {
            ClipboardMode::System => Some(RefCell::new(SystemClipboard { inner: None })),
            ClipboardMode::Disabled => None,
        };
        LocalHost {
            store,
            clipboard,
            last_written: RefCell::new(None),
            close_requested: Cell::new(false),
        }
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested.get()
    }

    /// The value most recently handed to `write_active_value`.
    pub fn last_written(&self) -> Option<String> {
        self.last_written.borrow().clone()
    }
}

impl HostBridge for LocalHost {
    fn request_history_snapshot(&self) {
        self.store.publish();
    }

    fn subscribe_history_updates(&self) -> Subscription {
        self.store.subscribe()
    }

    fn write_active_value(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        *self.last_written.borrow_mut() = Some(text.to_string());

        if let Some(clipboard) = &self.clipboard {
            match clipboard.borrow_mut().set_text(text) {
                Ok(()) => debug!("Copied {} bytes to the clipboard", text.len()),
                Err(e) => warn!("{}", e),
            }
        }
    }

    fn request_close(&self) {
        self.close_requested.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> LocalHost {
        let store = Arc::new(HistoryStore::new(10));
        store.append("first".to_string());
        store.append("second".to_string());
        LocalHost::new(store, ClipboardMode::Disabled)
    }

    #[test]
    fn test_snapshot_request_publishes_store() {
        let host = host();
        let mut sub = host.subscribe_history_updates();
        host.request_history_snapshot();
        assert_eq!(
            sub.try_next(),
            Some(vec!["first".to_string(), "second".to_string()])
        );
    }

    #[test]
    fn test_write_remembers_last_value() {
        let host = host();
        host.write_active_value("abc");
        host.write_active_value("");
        assert_eq!(host.last_written().as_deref(), Some("abc"));
    }

    #[test]
    fn test_close_sets_flag() {
        let host = host();
        assert!(!host.close_requested());
        host.request_close();
        assert!(host.close_requested());
    }
}
