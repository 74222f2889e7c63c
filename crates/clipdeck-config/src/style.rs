/// Terminal color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Color {
    #[default]
    Default,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

/// Foreground/background pair plus the few attributes the panel uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub reverse: bool,
}

impl Style {
    pub fn new(fg: Color, bg: Color) -> Self {
        Style {
            fg,
            bg,
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Parse a style string like "fg=white,bg=colour241,bold".
///
/// "default" alone resets everything. Later parts override earlier ones.
pub fn parse_style(s: &str) -> Result<Style, String> {
    let mut style = Style::default();

    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() || part == "default" || part == "none" {
            continue;
        }
        if let Some(fg) = part.strip_prefix("fg=") {
            style.fg = parse_color(fg)?;
        } else if let Some(bg) = part.strip_prefix("bg=") {
            style.bg = parse_color(bg)?;
        } else {
            match part {
                "bold" | "bright" => style.bold = true,
                "nobold" => style.bold = false,
                "reverse" => style.reverse = true,
                "noreverse" => style.reverse = false,
                _ => return Err(format!("Unknown style attribute: {}", part)),
            }
        }
    }

    Ok(style)
}

/// Parse a color: a name, "colourN"/"colorN", or "#rrggbb".
pub fn parse_color(s: &str) -> Result<Color, String> {
    let s = s.trim().to_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("Invalid hex color: #{}", hex));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("Invalid hex color: #{}", hex))
        };
        return Ok(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    if let Some(n) = s
        .strip_prefix("colour")
        .or_else(|| s.strip_prefix("color"))
    {
        return n
            .parse::<u8>()
            .map(Color::Indexed)
            .map_err(|_| format!("Invalid color index: {}", n));
    }

    let color = match s.as_str() {
        "default" => Color::Default,
        "black" => Color::Indexed(0),
        "red" => Color::Indexed(1),
        "green" => Color::Indexed(2),
        "yellow" => Color::Indexed(3),
        "blue" => Color::Indexed(4),
        "magenta" => Color::Indexed(5),
        "cyan" => Color::Indexed(6),
        "white" => Color::Indexed(7),
        "grey" | "gray" | "brightblack" => Color::Indexed(8),
        "brightred" => Color::Indexed(9),
        "brightgreen" => Color::Indexed(10),
        "brightyellow" => Color::Indexed(11),
        "brightblue" => Color::Indexed(12),
        "brightmagenta" => Color::Indexed(13),
        "brightcyan" => Color::Indexed(14),
        "brightwhite" => Color::Indexed(15),
        _ => return Err(format!("Unknown color: {}", s)),
    };

    Ok(color)
}
