use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Colours used by the renderer. Any of them can be overridden via
/// `[theme]` in `config.toml`.
#[derive(Debug, Clone)]
pub struct Theme {
    pub border_focused: Color,
    pub border_unfocused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub done: Color,
    pub error: Color,
    pub disabled: Color,
    pub dialog_border: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_focused: Color::Cyan,
            border_unfocused: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::DarkGray,
            accent: Color::Cyan,
            done: Color::Green,
            error: Color::Red,
            disabled: Color::DarkGray,
            dialog_border: Color::Yellow,
            selection: Color::Cyan,
        }
    }
}

impl Theme {
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border_unfocused)
        }
    }

    pub fn tab_style(&self, active: bool) -> Style {
        if active {
            Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(self.text_secondary)
        }
    }

    /// Completed tasks are struck through.
    pub fn task_style(&self, completed: bool, enabled: bool) -> Style {
        let style = match (completed, enabled) {
            (_, false) => Style::default().fg(self.disabled),
            (true, true) => Style::default().fg(self.done),
            (false, true) => Style::default().fg(self.text_primary),
        };
        if completed {
            style.add_modifier(Modifier::CROSSED_OUT)
        } else {
            style
        }
    }

    pub fn control_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.disabled)
        }
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// All-optional mirror of [`Theme`] for the `[theme]` section.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeConfig {
    pub border_focused: Option<String>,
    pub border_unfocused: Option<String>,
    pub text_primary: Option<String>,
    pub text_secondary: Option<String>,
    pub accent: Option<String>,
    pub done: Option<String>,
    pub error: Option<String>,
    pub disabled: Option<String>,
    pub dialog_border: Option<String>,
    pub selection: Option<String>,
}

/// Named colours (`"cyan"`, `"dark_gray"`, ...) or `"#rrggbb"`.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }
    match s.to_lowercase().replace('-', "_").as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

fn apply(target: &mut Color, source: Option<&String>) {
    if let Some(s) = source {
        match parse_color(s) {
            Some(color) => *target = color,
            None => tracing::warn!(value = %s, "ignoring unknown theme colour"),
        }
    }
}

impl ThemeConfig {
    pub fn build(&self) -> Theme {
        let mut t = Theme::default();
        apply(&mut t.border_focused, self.border_focused.as_ref());
        apply(&mut t.border_unfocused, self.border_unfocused.as_ref());
        apply(&mut t.text_primary, self.text_primary.as_ref());
        apply(&mut t.text_secondary, self.text_secondary.as_ref());
        apply(&mut t.accent, self.accent.as_ref());
        apply(&mut t.done, self.done.as_ref());
        apply(&mut t.error, self.error.as_ref());
        apply(&mut t.disabled, self.disabled.as_ref());
        apply(&mut t.dialog_border, self.dialog_border.as_ref());
        apply(&mut t.selection, self.selection.as_ref());
        t
    }
}
