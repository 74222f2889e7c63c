use std::rc::Rc;
use std::sync::Arc;

use crate::feed::Subscription;

/// The boundary a panel talks to. Every call is fire-and-forget: the host
/// reports its own failures and never hands a result back to the panel.
pub trait HostBridge {
    /// Ask the host to (re)publish the current history on the update feed.
    fn request_history_snapshot(&self);

    /// Register for full-history replacements. Dropping the handle
    /// unsubscribes.
    fn subscribe_history_updates(&self) -> Subscription;

    /// Place `text` on the system clipboard. Never called with "".
    fn write_active_value(&self, text: &str);

    /// Hide or terminate the surface hosting the panel.
    fn request_close(&self);
}

impl<T: HostBridge + ?Sized> HostBridge for &T {
    fn request_history_snapshot(&self) {
        (**self).request_history_snapshot()
    }

    fn subscribe_history_updates(&self) -> Subscription {
        (**self).subscribe_history_updates()
    }

    fn write_active_value(&self, text: &str) {
        (**self).write_active_value(text)
    }

    fn request_close(&self) {
        (**self).request_close()
    }
}

impl<T: HostBridge + ?Sized> HostBridge for Rc<T> {
    fn request_history_snapshot(&self) {
        (**self).request_history_snapshot()
    }

    fn subscribe_history_updates(&self) -> Subscription {
        (**self).subscribe_history_updates()
    }

    fn write_active_value(&self, text: &str) {
        (**self).write_active_value(text)
    }

    fn request_close(&self) {
        (**self).request_close()
    }
}

impl<T: HostBridge + ?Sized> HostBridge for Arc<T> {
    fn request_history_snapshot(&self) {
        (**self).request_history_snapshot()
    }

    fn subscribe_history_updates(&self) -> Subscription {
        (**self).subscribe_history_updates()
    }

    fn write_active_value(&self, text: &str) {
        (**self).write_active_value(text)
    }

    fn request_close(&self) {
        (**self).request_close()
    }
}
