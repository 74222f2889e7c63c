use crate::keybindings::KeyTable;
use crate::options::Options;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How deep `source-file` may nest before giving up.
const MAX_SOURCE_DEPTH: usize = 8;

/// Top-level configuration.
pub struct Config {
    pub options: Options,
    pub key_table: KeyTable,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// Create a default configuration.
    pub fn default_config() -> Self {
        Config {
            options: Options::default(),
            key_table: KeyTable::default_bindings(),
        }
    }

    /// Load configuration from `path`, or from the default config file
    /// (~/.clipdeck.conf) when none is given. An explicit path must exist;
    /// a missing default file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default_config();

        match path {
            Some(path) => {
                debug!("Loading config from: {}", path.display());
                config.apply_file(path, 0)?;
            }
            None => {
                if let Some(path) = Self::config_path() {
                    if path.exists() {
                        debug!("Loading config from: {}", path.display());
                        config.apply_file(&path, 0)?;
                    } else {
                        debug!("No config file found at: {}", path.display());
                    }
                }
            }
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(|home| PathBuf::from(home).join(".clipdeck.conf"))
    }

    /// Apply configuration from a string.
    pub fn apply_config_string(&mut self, content: &str) -> Result<()> {
        self.apply_lines(content, 0)
    }

    fn apply_file(&mut self, path: &Path, depth: usize) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        self.apply_lines(&content, depth)
    }

    fn apply_lines(&mut self, content: &str, depth: usize) -> Result<()> {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Err(e) = self.apply_config_line(line, depth) {
                warn!("Config error: {} (line: {})", e, line);
            }
        }
        Ok(())
    }

    fn apply_config_line(&mut self, line: &str, depth: usize) -> Result<()> {
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "set-option" | "set" => {
                crate::parser::parse_set_option(&mut self.options, args)?;
            }
            "bind-key" | "bind" => {
                crate::parser::parse_bind_key(&mut self.key_table, args)?;
            }
            "unbind-key" | "unbind" => {
                crate::parser::parse_unbind_key(&mut self.key_table, args)?;
            }
            "source-file" | "source" => {
                if depth >= MAX_SOURCE_DEPTH {
                    anyhow::bail!("source-file nested too deeply");
                }
                self.apply_file(Path::new(args.trim()), depth + 1)?;
            }
            _ => {
                anyhow::bail!("Unknown config command: {}", command);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::{Key, KeyBinding};
    use crate::options::ListOrder;
    use clipdeck_common::PanelAction;

    #[test]
    fn test_apply_config_string() {
        let mut config = Config::default_config();
        config
            .apply_config_string(
                "# comment\n\
                 set -g history-limit 5\n\
                 \n\
                 set order oldest-first\n\
                 bind C-j move-down\n\
                 unbind Escape\n",
            )
            .unwrap();

        assert_eq!(config.options.history_limit, 5);
        assert_eq!(config.options.order, ListOrder::OldestFirst);
        assert_eq!(
            config.key_table.lookup(&KeyBinding::ctrl(Key::Char('j'))),
            Some(&PanelAction::MoveDown)
        );
        assert_eq!(config.key_table.lookup(&KeyBinding::plain(Key::Escape)), None);
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let mut config = Config::default_config();
        config
            .apply_config_string("set mouse sometimes\nfrobnicate\nset title clips\n")
            .unwrap();
        assert!(config.options.mouse);
        assert_eq!(config.options.title, "clips");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = std::env::temp_dir().join(format!("clipdeck-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let extra = dir.join("extra.conf");
        let main = dir.join("main.conf");
        std::fs::write(&extra, "set print-on-exit on\n").unwrap();
        std::fs::write(&main, format!("set prompt '> '\nsource {}\n", extra.display())).unwrap();

        let config = Config::load(Some(&main)).unwrap();
        assert_eq!(config.options.prompt, "> ");
        assert!(config.options.print_on_exit);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let missing = std::env::temp_dir().join("clipdeck-definitely-missing.conf");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_self_sourcing_file_terminates() {
        let dir = std::env::temp_dir().join(format!("clipdeck-loop-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("loop.conf");
        std::fs::write(&path, format!("set title looped\nsource {}\n", path.display())).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.options.title, "looped");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
