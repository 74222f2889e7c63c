use clipdeck_common::PanelAction;
use std::collections::HashMap;

/// A key combination that can trigger a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyBinding {
    pub fn plain(key: Key) -> Self {
        KeyBinding {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(key: Key) -> Self {
        KeyBinding {
            key,
            modifiers: Modifiers {
                ctrl: true,
                ..Default::default()
            },
        }
    }
}

/// Key identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    F(u8),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Space,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Keys mapped to panel actions.
pub struct KeyTable {
    pub bindings: HashMap<KeyBinding, PanelAction>,
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::default_bindings()
    }
}

impl KeyTable {
    pub fn new() -> Self {
        KeyTable {
            bindings: HashMap::new(),
        }
    }

    /// Arrow/emacs-style navigation plus the editing keys of the query line.
    pub fn default_bindings() -> Self {
        let mut table = KeyTable::new();

        // Navigation
        table.bind(KeyBinding::plain(Key::Up), PanelAction::MoveUp);
        table.bind(KeyBinding::plain(Key::Down), PanelAction::MoveDown);
        table.bind(KeyBinding::ctrl(Key::Char('p')), PanelAction::MoveUp);
        table.bind(KeyBinding::ctrl(Key::Char('n')), PanelAction::MoveDown);
        table.bind(KeyBinding::plain(Key::PageUp), PanelAction::PageUp);
        table.bind(KeyBinding::plain(Key::PageDown), PanelAction::PageDown);
        table.bind(KeyBinding::plain(Key::Home), PanelAction::SelectFirst);
        table.bind(KeyBinding::plain(Key::End), PanelAction::SelectLast);

        // Query
        table.bind(KeyBinding::plain(Key::Backspace), PanelAction::DeleteChar);
        table.bind(KeyBinding::ctrl(Key::Char('h')), PanelAction::DeleteChar);
        table.bind(KeyBinding::ctrl(Key::Char('u')), PanelAction::ClearQuery);

        // Exit
        table.bind(KeyBinding::plain(Key::Enter), PanelAction::Confirm);
        table.bind(KeyBinding::plain(Key::Escape), PanelAction::Close);
        table.bind(KeyBinding::ctrl(Key::Char('c')), PanelAction::Close);

        table
    }

    /// Add a binding.
    pub fn bind(&mut self, binding: KeyBinding, action: PanelAction) {
        self.bindings.insert(binding, action);
    }

    /// Remove a binding.
    pub fn unbind(&mut self, binding: &KeyBinding) {
        self.bindings.remove(binding);
    }

    /// Look up the action for a key binding.
    pub fn lookup(&self, binding: &KeyBinding) -> Option<&PanelAction> {
        self.bindings.get(binding)
    }
}

/// Parse a key string like "C-n", "M-a", "Up", "F1" into a KeyBinding.
pub fn parse_key(s: &str) -> Option<KeyBinding> {
    let mut modifiers = Modifiers::default();
    let mut remaining = s;

    // Parse modifiers
    loop {
        if let Some(rest) = remaining.strip_prefix("C-").or_else(|| remaining.strip_prefix("c-")) {
            modifiers.ctrl = true;
            remaining = rest;
        } else if let Some(rest) = remaining.strip_prefix("M-").or_else(|| remaining.strip_prefix("m-")) {
            modifiers.alt = true;
            remaining = rest;
        } else if let Some(rest) = remaining.strip_prefix("S-").or_else(|| remaining.strip_prefix("s-")) {
            modifiers.shift = true;
            remaining = rest;
        } else {
            break;
        }
    }

    let key = match remaining {
        "Enter" | "enter" => Key::Enter,
        "Escape" | "escape" | "Esc" | "esc" => Key::Escape,
        "Space" | "space" => Key::Space,
        "Backspace" | "BSpace" | "bspace" => Key::Backspace,
        "Tab" | "tab" => Key::Tab,
        "Up" | "up" => Key::Up,
        "Down" | "down" => Key::Down,
        "Left" | "left" => Key::Left,
        "Right" | "right" => Key::Right,
        "Home" | "home" => Key::Home,
        "End" | "end" => Key::End,
        "PageUp" | "PgUp" | "pgup" => Key::PageUp,
        "PageDown" | "PgDn" | "pgdn" => Key::PageDown,
        "Insert" | "insert" => Key::Insert,
        "Delete" | "delete" | "DC" | "dc" => Key::Delete,
        s if s.len() > 1 && (s.starts_with('F') || s.starts_with('f')) => {
            s[1..].parse::<u8>().ok().map(Key::F)?
        }
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyBinding { key, modifiers })
}
