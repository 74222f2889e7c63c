use std::ops::Range;

use clipdeck_common::{HostBridge, PanelAction};
use clipdeck_config::{Color, Options, Style};
use clipdeck_panel::ClipboardPanel;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Header row, prompt row, then the list.
const LIST_TOP: u16 = 2;
const CLOSE_LABEL: &str = " ✕ ";

/// Screen geometry shared by the renderer and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
}

impl Layout {
    pub fn new(cols: u16, rows: u16) -> Self {
        Layout { cols, rows }
    }

    /// Number of list rows that fit under the header and prompt.
    pub fn list_height(&self) -> usize {
        self.rows.saturating_sub(LIST_TOP) as usize
    }

    /// Columns of the close button on the header row. Empty when the
    /// terminal is too narrow to draw it.
    pub fn close_button(&self) -> Range<u16> {
        let width = CLOSE_LABEL.width() as u16;
        if self.cols < width {
            return self.cols..self.cols;
        }
        self.cols - width..self.cols
    }

    /// Map a left click at (`col`, `row`) to a panel action, given the
    /// list's current scroll offset.
    pub fn hit_test(&self, col: u16, row: u16, offset: usize) -> Option<PanelAction> {
        if row == 0 && self.close_button().contains(&col) {
            return Some(PanelAction::Close);
        }
        if row >= LIST_TOP && row < self.rows {
            return Some(PanelAction::SelectRow(offset + (row - LIST_TOP) as usize));
        }
        None
    }
}

/// Draws the whole panel as one ANSI frame.
pub struct Renderer {
    layout: Layout,
    title: String,
    prompt: String,
    header_style: Style,
    row_style: Style,
    selected_style: Style,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16, options: &Options) -> Self {
        Renderer {
            layout: Layout::new(cols, rows),
            title: options.title.clone(),
            prompt: options.prompt.clone(),
            header_style: options.header_style,
            row_style: options.row_style,
            selected_style: options.selected_style,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.layout = Layout::new(cols, rows);
    }

    /// Render the entire screen for a panel.
    pub fn render<B: HostBridge>(&self, panel: &ClipboardPanel<B>) -> Vec<u8> {
        let cols = self.layout.cols as usize;
        let mut output = Vec::with_capacity(cols * self.layout.rows as usize * 2);

        // Hide cursor during render
        output.extend_from_slice(b"\x1b[?25l");

        let rows = panel.rows();

        if self.layout.rows > 0 {
            let count = format!("{}/{}", rows.len(), panel.history().len());
            self.render_header(&mut output, &count);
        }

        if self.layout.rows > 1 {
            output.extend_from_slice(b"\x1b[2;1H");
            write_style(&mut output, &self.row_style);
            let line = format!("{}{}", self.prompt, panel.query());
            write_cell_text(&mut output, &line, cols);
        }

        let visible = panel.viewport().visible(rows.len());
        for screen_row in 0..self.layout.list_height() {
            let y = LIST_TOP as usize + screen_row + 1;
            output.extend_from_slice(format!("\x1b[{};1H", y).as_bytes());

            match rows.get(visible.start + screen_row) {
                Some(row) if visible.start + screen_row < visible.end => {
                    let style = if row.selected {
                        &self.selected_style
                    } else {
                        &self.row_style
                    };
                    write_style(&mut output, style);
                    write_cell_text(&mut output, &format!(" {}", display_text(row.text)), cols);
                }
                _ => {
                    output.extend_from_slice(b"\x1b[0m\x1b[K");
                }
            }
        }

        output.extend_from_slice(b"\x1b[0m");

        // Park the cursor at the end of the query
        if self.layout.rows > 1 {
            let prompt_width = self.prompt.width() + panel.query().width();
            let col = (prompt_width + 1).min(cols.max(1));
            output.extend_from_slice(format!("\x1b[2;{}H", col).as_bytes());
            output.extend_from_slice(b"\x1b[?25h");
        }

        output
    }

    fn render_header(&self, output: &mut Vec<u8>, count: &str) {
        let close = self.layout.close_button();
        let body_width = close.start as usize;
        let title_width = body_width.saturating_sub(count.width());

        output.extend_from_slice(b"\x1b[1;1H");
        write_style(output, &self.header_style);
        write_cell_text(output, &format!(" ⠿ {}", self.title), title_width);
        write_cell_text(output, count, body_width - title_width);
        if !close.is_empty() {
            output.extend_from_slice(CLOSE_LABEL.as_bytes());
        }
    }
}

/// Single-line form of an entry: line breaks become `↵`, tabs become a
/// space and other control characters are dropped.
pub fn display_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('↵');
            }
            '\n' => out.push('↵'),
            '\t' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Cut `text` to at most `width` display columns, ending in `…` when
/// something had to go, then pad with spaces to exactly `width`.
pub fn fit_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    let total = text.width();

    if total <= width {
        out.push_str(text);
        used = total;
    } else {
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    }

    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

fn write_cell_text(output: &mut Vec<u8>, text: &str, width: usize) {
    output.extend_from_slice(fit_width(text, width).as_bytes());
}

fn write_style(output: &mut Vec<u8>, style: &Style) {
    output.extend_from_slice(b"\x1b[0");
    if style.bold {
        output.extend_from_slice(b";1");
    }
    if style.reverse {
        output.extend_from_slice(b";7");
    }
    write_color(output, style.fg, true);
    write_color(output, style.bg, false);
    output.push(b'm');
}

fn write_color(output: &mut Vec<u8>, color: Color, is_fg: bool) {
    match color {
        Color::Default => {}
        Color::Indexed(n) if n < 8 => {
            let base = if is_fg { 30 } else { 40 };
            output.extend_from_slice(format!(";{}", base + n as u32).as_bytes());
        }
        Color::Indexed(n) if n < 16 => {
            let base = if is_fg { 90 } else { 100 };
            output.extend_from_slice(format!(";{}", base + n as u32 - 8).as_bytes());
        }
        Color::Indexed(n) => {
            let prefix = if is_fg { "38" } else { "48" };
            output.extend_from_slice(format!(";{};5;{}", prefix, n).as_bytes());
        }
        Color::Rgb(r, g, b) => {
            let prefix = if is_fg { "38" } else { "48" };
            output.extend_from_slice(format!(";{};2;{};{};{}", prefix, r, g, b).as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipdeck_common::{HistoryFeed, Subscription};
    use clipdeck_panel::Order;

    struct FeedOnly(HistoryFeed);

    impl HostBridge for FeedOnly {
        fn request_history_snapshot(&self) {}
        fn subscribe_history_updates(&self) -> Subscription {
            self.0.subscribe()
        }
        fn write_active_value(&self, _text: &str) {}
        fn request_close(&self) {}
    }

    fn panel_with(items: &[&str]) -> ClipboardPanel<FeedOnly> {
        let feed = HistoryFeed::new();
        let mut panel = ClipboardPanel::new(FeedOnly(feed.clone()), Order::NewestFirst);
        panel.mount();
        feed.publish(&items.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        panel.pump();
        panel
    }

    #[test]
    fn test_fit_width_pads_and_truncates() {
        assert_eq!(fit_width("abc", 5), "abc  ");
        assert_eq!(fit_width("abcdef", 4), "abc…");
        assert_eq!(fit_width("日本語", 5), "日本…");
        assert_eq!(fit_width("日本語", 4), "日… ");
        assert_eq!(fit_width("anything", 0), "");
    }

    #[test]
    fn test_display_text_flattens_lines() {
        assert_eq!(display_text("a\nb\r\nc\td\x07"), "a↵b↵c d");
    }

    #[test]
    fn test_hit_test() {
        let layout = Layout::new(20, 10);
        assert_eq!(layout.list_height(), 8);
        assert_eq!(layout.close_button(), 17..20);
        assert_eq!(layout.hit_test(18, 0, 0), Some(PanelAction::Close));
        assert_eq!(layout.hit_test(3, 0, 0), None);
        assert_eq!(layout.hit_test(3, 1, 0), None);
        assert_eq!(layout.hit_test(3, 2, 0), Some(PanelAction::SelectRow(0)));
        assert_eq!(layout.hit_test(3, 5, 4), Some(PanelAction::SelectRow(7)));
    }

    #[test]
    fn test_close_button_drawn_where_clickable() {
        let panel = panel_with(&["alpha", "beta", "gamma"]);

        for cols in [3, 5, 8, 30] {
            let renderer = Renderer::new(cols, 4, &Options::default());
            let close = renderer.layout().close_button();
            assert_eq!(close, cols - 3..cols);
            assert_eq!(renderer.layout().hit_test(cols - 1, 0, 0), Some(PanelAction::Close));

            let frame = String::from_utf8(renderer.render(&panel)).unwrap();
            let header = &frame[frame.find("\x1b[1;1H").unwrap()..frame.find("\x1b[2;1H").unwrap()];
            assert!(header.ends_with(CLOSE_LABEL), "cols {}: {:?}", cols, header);
        }

        let narrow = Renderer::new(2, 4, &Options::default());
        assert!(narrow.layout().close_button().is_empty());
        assert_eq!(narrow.layout().hit_test(1, 0, 0), None);
        let frame = String::from_utf8(narrow.render(&panel)).unwrap();
        assert!(!frame.contains('✕'));
    }

    #[test]
    fn test_render_lists_newest_first_and_highlights_selection() {
        let panel = panel_with(&["alpha", "beta", "gamma"]);
        let renderer = Renderer::new(30, 6, &Options::default());
        let frame = String::from_utf8(renderer.render(&panel)).unwrap();

        let gamma = frame.find(" gamma").unwrap();
        let beta = frame.find(" beta").unwrap();
        let alpha = frame.find(" alpha").unwrap();
        assert!(gamma < beta && beta < alpha);
        assert!(frame.contains("3/3"));

        // selected-style (bold, white on #606060) precedes the selected row only
        let selected_sgr = "\x1b[0;1;37;48;2;96;96;96m";
        assert_eq!(frame.matches(selected_sgr).count(), 1);
        assert!(frame[frame.find(selected_sgr).unwrap()..].starts_with(&format!("{} gamma", selected_sgr)));
    }

    #[test]
    fn test_render_empty_history() {
        let panel = panel_with(&[]);
        let renderer = Renderer::new(30, 5, &Options::default());
        let frame = String::from_utf8(renderer.render(&panel)).unwrap();
        assert!(frame.contains("0/0"));
        assert!(!frame.contains("\x1b[0;1;37;48;2;96;96;96m"));
    }
}
