use std::str::FromStr;

use thiserror::Error;

/// Everything a front end can ask a mounted panel to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Move the selection one row up in the presented list.
    MoveUp,
    /// Move the selection one row down in the presented list.
    MoveDown,
    /// Move up by a viewport's worth of rows.
    PageUp,
    /// Move down by a viewport's worth of rows.
    PageDown,
    /// Jump to the first presented row.
    SelectFirst,
    /// Jump to the last presented row.
    SelectLast,
    /// Select the entry shown on a presented row (pointer click).
    SelectRow(usize),
    /// Select an entry by its index in the history.
    SelectIndex(usize),
    /// Append text to the search query.
    InsertText(String),
    /// Remove the last character of the search query.
    DeleteChar,
    /// Replace the whole search query.
    SetQuery(String),
    /// Empty the search query.
    ClearQuery,
    /// Keep the current selection and close.
    Confirm,
    /// Close without further changes.
    Close,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for PanelAction {
    type Err = UnknownCommand;

    /// Parse a bound command string such as `move-down` or
    /// `select-index 3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(' ') {
            Some((n, a)) => (n, Some(a.trim())),
            None => (s, None),
        };

        let action = match (name, arg) {
            ("move-up" | "up", None) => PanelAction::MoveUp,
            ("move-down" | "down", None) => PanelAction::MoveDown,
            ("page-up", None) => PanelAction::PageUp,
            ("page-down", None) => PanelAction::PageDown,
            ("select-first" | "top", None) => PanelAction::SelectFirst,
            ("select-last" | "bottom", None) => PanelAction::SelectLast,
            ("delete-char", None) => PanelAction::DeleteChar,
            ("clear-query", None) => PanelAction::ClearQuery,
            ("confirm", None) => PanelAction::Confirm,
            ("close" | "quit", None) => PanelAction::Close,
            ("select-row", Some(n)) => {
                PanelAction::SelectRow(n.parse().map_err(|_| UnknownCommand(s.to_string()))?)
            }
            ("select-index", Some(n)) => {
                PanelAction::SelectIndex(n.parse().map_err(|_| UnknownCommand(s.to_string()))?)
            }
            ("set-query", Some(q)) => PanelAction::SetQuery(q.to_string()),
            _ => return Err(UnknownCommand(s.to_string())),
        };

        Ok(action)
    }
}
