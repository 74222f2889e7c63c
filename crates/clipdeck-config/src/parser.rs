use crate::keybindings::{self, KeyTable};
use crate::options::Options;
use anyhow::{anyhow, Result};
use clipdeck_common::PanelAction;

/// Parse a `set-option` command line.
pub fn parse_set_option(options: &mut Options, args: &str) -> Result<()> {
    let args = args.trim();

    // Strip -g (global) flag
    let args = args.strip_prefix("-g ").unwrap_or(args).trim();

    // Split into option name and value
    let (name, value) = match args.split_once(' ') {
        Some((n, v)) => (n.trim(), v.trim()),
        None => return Err(anyhow!("Missing value for option: {}", args)),
    };

    options.set(name, value)?;
    Ok(())
}

/// Parse a `bind-key` command line.
pub fn parse_bind_key(table: &mut KeyTable, args: &str) -> Result<()> {
    let args = args.trim();

    // Split into key and command
    let (key_str, command) = match args.split_once(' ') {
        Some((k, c)) => (k.trim(), c.trim()),
        None => return Err(anyhow!("Missing command for key: {}", args)),
    };

    let binding = keybindings::parse_key(key_str).ok_or_else(|| anyhow!("Unknown key: {}", key_str))?;
    let action: PanelAction = command.parse()?;
    table.bind(binding, action);

    Ok(())
}

/// Parse an `unbind-key` command line.
pub fn parse_unbind_key(table: &mut KeyTable, args: &str) -> Result<()> {
    let key_str = args.trim();
    let binding = keybindings::parse_key(key_str).ok_or_else(|| anyhow!("Unknown key: {}", key_str))?;
    table.unbind(&binding);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::{Key, KeyBinding};

    #[test]
    fn test_set_option_with_global_flag() {
        let mut options = Options::default();
        parse_set_option(&mut options, "-g history-limit 10").unwrap();
        parse_set_option(&mut options, "title \"my clips\"").unwrap();
        assert_eq!(options.history_limit, 10);
        assert_eq!(options.title, "my clips");
    }

    #[test]
    fn test_set_option_missing_value() {
        let mut options = Options::default();
        assert!(parse_set_option(&mut options, "mouse").is_err());
    }

    #[test]
    fn test_bind_key() {
        let mut table = KeyTable::new();
        parse_bind_key(&mut table, "C-j move-down").unwrap();
        parse_bind_key(&mut table, "q close").unwrap();
        assert_eq!(
            table.lookup(&KeyBinding::ctrl(Key::Char('j'))),
            Some(&PanelAction::MoveDown)
        );
        assert_eq!(
            table.lookup(&KeyBinding::plain(Key::Char('q'))),
            Some(&PanelAction::Close)
        );
    }

    #[test]
    fn test_bind_key_rejects_unknown_command_and_key() {
        let mut table = KeyTable::new();
        assert!(parse_bind_key(&mut table, "C-j launch-rockets").is_err());
        assert!(parse_bind_key(&mut table, "Hyper-x close").is_err());
        assert!(parse_bind_key(&mut table, "C-j").is_err());
        assert!(table.bindings.is_empty());
    }

    #[test]
    fn test_unbind_key() {
        let mut table = KeyTable::default_bindings();
        parse_unbind_key(&mut table, "Escape").unwrap();
        assert_eq!(table.lookup(&KeyBinding::plain(Key::Escape)), None);
    }
}
