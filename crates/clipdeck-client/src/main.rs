mod history;
mod host;
mod input_handler;
mod renderer;
mod source;

use anyhow::{Context, Result};
use clap::Parser;
use clipdeck_config::{Config, ListOrder, Options};
use clipdeck_panel::{ClipboardPanel, Dispatch, Order};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use history::HistoryStore;
use host::{ClipboardMode, LocalHost};
use input_handler::InputHandler;
use renderer::Renderer;
use source::FeedFormat;

#[derive(Parser)]
#[command(name = "clipdeck", about = "Searchable clipboard history panel")]
struct Cli {
    /// Config file (default: ~/.clipdeck.conf)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read history from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Encoding of the history input
    #[arg(short, long, value_enum, default_value_t = FeedFormat::Lines)]
    format: FeedFormat,

    /// Maximum number of entries kept (overrides history-limit)
    #[arg(short, long)]
    limit: Option<usize>,

    /// List the oldest entry first
    #[arg(long)]
    oldest_first: bool,

    /// Never touch the system clipboard
    #[arg(long)]
    no_clipboard: bool,

    /// Print the active entry to stdout on exit
    #[arg(short, long)]
    print: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let Config {
        mut options,
        key_table,
    } = Config::load(cli.config.as_deref())?;
    apply_cli_overrides(&mut options, &cli);

    let runtime = tokio::runtime::Runtime::new()?;
    let store = Arc::new(HistoryStore::new(options.history_limit));
    spawn_feed(&runtime, &cli, Arc::clone(&store))?;

    let mode = if cli.no_clipboard {
        ClipboardMode::Disabled
    } else {
        ClipboardMode::System
    };
    let host = LocalHost::new(store, mode);
    let input_handler = InputHandler::new(key_table, options.mouse);

    let result = run_interactive(&host, &input_handler, &options);

    // The stdin reader may be parked in a blocking read; don't wait for it.
    runtime.shutdown_background();
    result?;

    if options.print_on_exit {
        if let Some(text) = host.last_written() {
            println!("{}", text);
        }
    }

    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

fn apply_cli_overrides(options: &mut Options, cli: &Cli) {
    if let Some(limit) = cli.limit {
        options.history_limit = limit.max(1);
    }
    if cli.oldest_first {
        options.order = ListOrder::OldestFirst;
    }
    if cli.print {
        options.print_on_exit = true;
    }
}

/// Start reading the history feed on the runtime.
fn spawn_feed(runtime: &tokio::runtime::Runtime, cli: &Cli, store: Arc<HistoryStore>) -> Result<()> {
    let format = cli.format;

    match &cli.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open history input {}", path.display()))?;
            let reader = BufReader::new(tokio::fs::File::from_std(file));
            runtime.spawn(async move {
                match source::run_feed(reader, format, store).await {
                    Ok(lines) => debug!("History file read: {} lines", lines),
                    Err(e) => warn!("History feed failed: {}", e),
                }
            });
        }
        None if io::stdin().is_terminal() => {
            info!("stdin is a terminal; starting with an empty history");
        }
        None => {
            runtime.spawn(async move {
                let reader = BufReader::new(tokio::io::stdin());
                match source::run_feed(reader, format, store).await {
                    Ok(lines) => debug!("History input closed after {} lines", lines),
                    Err(e) => warn!("History feed failed: {}", e),
                }
            });
        }
    }

    Ok(())
}

/// Run the panel full-screen until the host is asked to close.
fn run_interactive(host: &LocalHost, input_handler: &InputHandler, options: &Options) -> Result<()> {
    terminal::enable_raw_mode()?;

    let result = enter_screen(&mut io::stdout(), options.mouse)
        .and_then(|()| interactive_loop(host, input_handler, options));

    let restored = restore_terminal(&mut io::stdout(), options.mouse, terminal::disable_raw_mode);
    result?;
    restored?;
    Ok(())
}

fn enter_screen<W: Write>(out: &mut W, mouse: bool) -> Result<()> {
    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    if mouse {
        execute!(out, EnableMouseCapture)?;
    }
    Ok(())
}

/// Undo `enter_screen` and raw mode. Every step runs even if an earlier one
/// fails; the first error is returned.
fn restore_terminal<W: Write>(
    out: &mut W,
    mouse: bool,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let mouse_result = if mouse {
        execute!(out, DisableMouseCapture)
    } else {
        Ok(())
    };
    let screen_result = execute!(out, LeaveAlternateScreen, cursor::Show);
    let raw_result = disable_raw_mode();

    mouse_result.and(screen_result).and(raw_result)
}

fn interactive_loop(host: &LocalHost, input_handler: &InputHandler, options: &Options) -> Result<()> {
    let mut stdout = io::stdout();
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols, rows, options);

    let order = match options.order {
        ListOrder::NewestFirst => Order::NewestFirst,
        ListOrder::OldestFirst => Order::OldestFirst,
    };
    let mut panel = ClipboardPanel::new(host, order);
    panel.set_viewport_height(renderer.layout().list_height());
    panel.mount();

    let poll_interval = Duration::from_millis(options.poll_interval);
    let mut dirty = true;

    while !host.close_requested() {
        if panel.pump() {
            dirty = true;
        }

        if dirty {
            stdout.write_all(&renderer.render(&panel))?;
            stdout.flush()?;
            dirty = false;
        }

        if !event::poll(poll_interval)? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                input_handler.handle_key(key_event)
            }
            Event::Mouse(mouse_event) => input_handler.handle_mouse(
                mouse_event,
                renderer.layout(),
                panel.viewport().offset(),
            ),
            Event::Resize(cols, rows) => {
                renderer.resize(cols, rows);
                panel.set_viewport_height(renderer.layout().list_height());
                dirty = true;
                None
            }
            _ => None, // Ignore key release/repeat, focus events
        };

        if let Some(action) = action {
            if panel.dispatch(action) == Dispatch::Handled {
                dirty = true;
            }
        }
    }

    panel.unmount();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Rejects the first write, accepts everything after it.
    struct FlakyWriter {
        failed: bool,
        written: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_restore_terminal_runs_every_step_after_failure() {
        let mut out = FlakyWriter {
            failed: false,
            written: Vec::new(),
        };
        let raw_disabled = Cell::new(false);

        let result = restore_terminal(&mut out, true, || {
            raw_disabled.set(true);
            Ok(())
        });

        let err = result.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(raw_disabled.get());
        let written = String::from_utf8_lossy(&out.written);
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?25h"));
    }

    #[test]
    fn test_restore_terminal_reports_raw_mode_failure() {
        let mut out = Vec::new();
        let result = restore_terminal(&mut out, false, || {
            Err(io::Error::new(io::ErrorKind::Other, "raw mode"))
        });
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::Other);
        assert!(String::from_utf8_lossy(&out).contains("\x1b[?1049l"));
    }
}
