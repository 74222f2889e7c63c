pub mod bridge;
pub mod error;
pub mod feed;
pub mod protocol;

pub use bridge::HostBridge;
pub use error::ClipdeckError;
pub use feed::{HistoryFeed, Subscription};
pub use protocol::{PanelAction, UnknownCommand};

use uuid::Uuid;

/// Unique identifier for a history subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
