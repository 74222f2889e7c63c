pub mod filter;
pub mod panel;
pub mod viewport;

pub use filter::filter_history;
pub use panel::{ClipboardPanel, Dispatch, Order, Row};
pub use viewport::Viewport;
