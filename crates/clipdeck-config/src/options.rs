use thiserror::Error;

use crate::style::{parse_style, Color, Style};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("Unknown option: {0}")]
    Unknown(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Row order of the history list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Panel options.
#[derive(Debug, Clone)]
pub struct Options {
    // History
    pub history_limit: usize,
    pub order: ListOrder,

    // Input
    pub mouse: bool,
    pub poll_interval: u64,

    // Display
    pub title: String,
    pub prompt: String,
    pub header_style: Style,
    pub row_style: Style,
    pub selected_style: Style,

    // Exit
    pub print_on_exit: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            history_limit: 50,
            order: ListOrder::NewestFirst,

            mouse: true,
            poll_interval: 50,

            title: "clipdeck".to_string(),
            prompt: "/ ".to_string(),
            header_style: Style::new(Color::Indexed(0), Color::Rgb(0x80, 0x80, 0x80)),
            row_style: Style::default(),
            selected_style: Style::new(Color::Indexed(7), Color::Rgb(0x60, 0x60, 0x60)).bold(),

            print_on_exit: false,
        }
    }
}

impl Options {
    /// Set an option by name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let invalid = |reason: String| OptionError::InvalidValue {
            name: name.to_string(),
            reason,
        };

        match name {
            "history-limit" => {
                let limit: usize = value.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
                if limit == 0 {
                    return Err(invalid("must be at least 1".to_string()));
                }
                self.history_limit = limit;
            }
            "order" => {
                self.order = match unquote(value).as_str() {
                    "newest-first" | "newest" => ListOrder::NewestFirst,
                    "oldest-first" | "oldest" => ListOrder::OldestFirst,
                    other => return Err(invalid(format!("expected newest-first or oldest-first, got {}", other))),
                }
            }
            "mouse" => self.mouse = parse_bool(value).map_err(invalid)?,
            "poll-interval" => {
                self.poll_interval = value.trim().parse().map_err(|e| invalid(format!("{}", e)))?
            }
            "title" => self.title = unquote(value),
            "prompt" => self.prompt = unquote(value),
            "header-style" => self.header_style = parse_style(&unquote(value)).map_err(invalid)?,
            "row-style" => self.row_style = parse_style(&unquote(value)).map_err(invalid)?,
            "selected-style" => {
                self.selected_style = parse_style(&unquote(value)).map_err(invalid)?
            }
            "print-on-exit" => self.print_on_exit = parse_bool(value).map_err(invalid)?,
            _ => return Err(OptionError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("Invalid boolean value: {}", s)),
    }
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
