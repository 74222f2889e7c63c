pub mod config;
pub mod keybindings;
pub mod options;
pub mod parser;
pub mod style;

pub use config::Config;
pub use keybindings::{KeyBinding, KeyTable};
pub use options::{ListOrder, OptionError, Options};
pub use style::{Color, Style};
