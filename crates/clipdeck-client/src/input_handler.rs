use clipdeck_common::PanelAction;
use clipdeck_config::keybindings::{Key, KeyBinding, KeyTable, Modifiers};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::renderer::Layout;

/// Turns terminal input into panel actions.
pub struct InputHandler {
    key_table: KeyTable,
    mouse: bool,
}

impl InputHandler {
    pub fn new(key_table: KeyTable, mouse: bool) -> Self {
        InputHandler { key_table, mouse }
    }

    /// Bound keys map to their action; unbound printable keys edit the query.
    pub fn handle_key(&self, event: KeyEvent) -> Option<PanelAction> {
        if let Some(binding) = crossterm_to_binding(event) {
            if let Some(action) = self.key_table.lookup(&binding) {
                return Some(action.clone());
            }
        }

        match event.code {
            KeyCode::Char(c)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(PanelAction::InsertText(c.to_string()))
            }
            _ => None,
        }
    }

    /// Clicks select rows or hit the close button; the wheel moves the
    /// selection.
    pub fn handle_mouse(&self, event: MouseEvent, layout: &Layout, offset: usize) -> Option<PanelAction> {
        if !self.mouse {
            return None;
        }
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => layout.hit_test(event.column, event.row, offset),
            MouseEventKind::ScrollUp => Some(PanelAction::MoveUp),
            MouseEventKind::ScrollDown => Some(PanelAction::MoveDown),
            _ => None,
        }
    }
}

/// Convert a crossterm KeyEvent to a KeyBinding.
fn crossterm_to_binding(event: KeyEvent) -> Option<KeyBinding> {
    let mut modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    };

    let key = match event.code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => {
            // The character already reflects shift, and terminals report
            // Ctrl+Shift+n as Ctrl+N while bindings are written C-n.
            modifiers.shift = false;
            Key::Char(if modifiers.ctrl { c.to_ascii_lowercase() } else { c })
        }
        KeyCode::F(n) => Key::F(n),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        _ => return None,
    };

    Some(KeyBinding { key, modifiers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn handler() -> InputHandler {
        InputHandler::new(KeyTable::default_bindings(), true)
    }

    #[test]
    fn test_navigation_keys() {
        let h = handler();
        assert_eq!(h.handle_key(key(KeyCode::Up, KeyModifiers::NONE)), Some(PanelAction::MoveUp));
        assert_eq!(h.handle_key(key(KeyCode::Down, KeyModifiers::NONE)), Some(PanelAction::MoveDown));
        assert_eq!(
            h.handle_key(key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(PanelAction::MoveDown)
        );
        assert_eq!(
            h.handle_key(key(KeyCode::Char('P'), KeyModifiers::CONTROL | KeyModifiers::SHIFT)),
            Some(PanelAction::MoveUp)
        );
        assert_eq!(h.handle_key(key(KeyCode::Esc, KeyModifiers::NONE)), Some(PanelAction::Close));
        assert_eq!(h.handle_key(key(KeyCode::Enter, KeyModifiers::NONE)), Some(PanelAction::Confirm));
    }

    #[test]
    fn test_printable_keys_edit_query() {
        let h = handler();
        assert_eq!(
            h.handle_key(key(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(PanelAction::InsertText("Q".to_string()))
        );
        assert_eq!(
            h.handle_key(key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(PanelAction::InsertText(" ".to_string()))
        );
        assert_eq!(
            h.handle_key(key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(PanelAction::DeleteChar)
        );
        assert_eq!(h.handle_key(key(KeyCode::Char('z'), KeyModifiers::ALT)), None);
        assert_eq!(h.handle_key(key(KeyCode::F(3), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_rebound_printable_key() {
        let mut table = KeyTable::default_bindings();
        table.bind(KeyBinding::plain(Key::Char('q')), PanelAction::Close);
        let h = InputHandler::new(table, true);
        let mut event = key(KeyCode::Char('q'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Press;
        assert_eq!(h.handle_key(event), Some(PanelAction::Close));
    }

    #[test]
    fn test_mouse_actions() {
        let h = handler();
        let layout = Layout::new(20, 10);
        assert_eq!(
            h.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 4, 3), &layout, 2),
            Some(PanelAction::SelectRow(3))
        );
        assert_eq!(
            h.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 19, 0), &layout, 0),
            Some(PanelAction::Close)
        );
        assert_eq!(
            h.handle_mouse(mouse(MouseEventKind::ScrollDown, 0, 0), &layout, 0),
            Some(PanelAction::MoveDown)
        );
        assert_eq!(
            h.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Right), 4, 3), &layout, 0),
            None
        );
    }

    #[test]
    fn test_mouse_disabled() {
        let h = InputHandler::new(KeyTable::default_bindings(), false);
        let layout = Layout::new(20, 10);
        assert_eq!(
            h.handle_mouse(mouse(MouseEventKind::ScrollUp, 0, 0), &layout, 0),
            None
        );
    }
}
