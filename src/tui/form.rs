use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

// ── Text editing ──────────────────────────────────────────────────────

fn prev_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_boundary(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map_or(pos, |c| pos + c.len_utf8())
}

/// Start of the word before `pos`, skipping trailing whitespace first.
pub fn word_start_before(s: &str, pos: usize) -> usize {
    let trimmed = s[..pos].trim_end();
    trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Start of the next word after `pos`.
pub fn word_start_after(s: &str, pos: usize) -> usize {
    let rest = &s[pos..];
    let Some(gap) = rest.find(char::is_whitespace) else {
        return s.len();
    };
    rest[gap..]
        .find(|c: char| !c.is_whitespace())
        .map_or(s.len(), |word| pos + gap + word)
}

/// Apply one key press to a single-line buffer. `cursor` is a byte offset.
/// Returns `true` if the key was consumed.
pub fn edit_line(buf: &mut String, cursor: &mut usize, code: KeyCode, mods: KeyModifiers) -> bool {
    *cursor = (*cursor).min(buf.len());
    let word = mods.contains(KeyModifiers::ALT);
    let ctrl = mods.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Left if word => *cursor = word_start_before(buf, *cursor),
        KeyCode::Left => *cursor = prev_boundary(buf, *cursor),
        KeyCode::Right if word => *cursor = word_start_after(buf, *cursor),
        KeyCode::Right => *cursor = next_boundary(buf, *cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::Char('a') if ctrl => *cursor = 0,
        KeyCode::End => *cursor = buf.len(),
        KeyCode::Char('e') if ctrl => *cursor = buf.len(),
        KeyCode::Backspace if word => {
            let start = word_start_before(buf, *cursor);
            buf.drain(start..*cursor);
            *cursor = start;
        }
        KeyCode::Char('w') if ctrl => {
            let start = word_start_before(buf, *cursor);
            buf.drain(start..*cursor);
            *cursor = start;
        }
        KeyCode::Char('u') if ctrl => {
            buf.drain(..*cursor);
            *cursor = 0;
        }
        KeyCode::Backspace => {
            let start = prev_boundary(buf, *cursor);
            buf.drain(start..*cursor);
            *cursor = start;
        }
        KeyCode::Delete => {
            let end = next_boundary(buf, *cursor);
            buf.drain(*cursor..end);
        }
        KeyCode::Char(c) if !ctrl && !word => {
            buf.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => return false,
    }
    true
}

/// Spans for a buffer with a block cursor drawn at `cursor`.
pub fn cursor_spans(buf: &str, cursor: usize, cursor_style: Style) -> Vec<Span<'_>> {
    let (before, after) = buf.split_at(cursor.min(buf.len()));
    vec![
        Span::raw(before),
        Span::styled("\u{2588}", cursor_style),
        Span::raw(after),
    ]
}

// ── Rendering ─────────────────────────────────────────────────────────

/// Clear a centred panel, draw its border and title, and return the inner area.
pub fn render_modal(frame: &mut Frame, title: &str, border: Style, width: u16, height: u16) -> Rect {
    let area = frame.area();
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(2));
    let panel = Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    );

    frame.render_widget(Clear, panel);
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(panel);
    frame.render_widget(block, panel);
    inner
}

/// Alternating key/description spans on one line.
pub fn render_hints(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    key_style: Style,
    desc_style: Style,
) {
    let spans: Vec<Span<'_>> = hints
        .iter()
        .flat_map(|(key, desc)| [Span::styled(*key, key_style), Span::styled(*desc, desc_style)])
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn press(buf: &mut String, cursor: &mut usize, code: KeyCode, mods: KeyModifiers) -> bool {
        edit_line(buf, cursor, code, mods)
    }

    #[test]
    fn word_starts() {
        assert_eq!(word_start_before("buy oat milk", 12), 8);
        assert_eq!(word_start_before("buy oat  ", 9), 4);
        assert_eq!(word_start_before("buy", 3), 0);
        assert_eq!(word_start_before("", 0), 0);
        assert_eq!(word_start_after("buy oat milk", 0), 4);
        assert_eq!(word_start_after("buy oat milk", 9), 12);
    }

    #[test]
    fn inserts_and_deletes_at_cursor() {
        let mut buf = String::from("by milk");
        let mut cursor = 1;
        press(&mut buf, &mut cursor, KeyCode::Char('u'), KeyModifiers::NONE);
        assert_eq!((buf.as_str(), cursor), ("buy milk", 2));

        press(&mut buf, &mut cursor, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!((buf.as_str(), cursor), ("by milk", 1));

        press(&mut buf, &mut cursor, KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!((buf.as_str(), cursor), ("b milk", 1));
    }

    #[test]
    fn shifted_characters_are_inserted() {
        let mut buf = String::new();
        let mut cursor = 0;
        assert!(press(&mut buf, &mut cursor, KeyCode::Char('B'), KeyModifiers::SHIFT));
        assert_eq!(buf, "B");
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut buf = String::from("café");
        let mut cursor = buf.len();
        press(&mut buf, &mut cursor, KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(cursor, 3);
        press(&mut buf, &mut cursor, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(cursor, buf.len());
        press(&mut buf, &mut cursor, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(buf, "caf");
    }

    #[test]
    fn word_and_line_deletion() {
        let mut buf = String::from("buy oat milk");
        let mut cursor = buf.len();
        press(&mut buf, &mut cursor, KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(buf, "buy oat ");
        press(&mut buf, &mut cursor, KeyCode::Backspace, KeyModifiers::ALT);
        assert_eq!(buf, "buy ");
        press(&mut buf, &mut cursor, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!((buf.as_str(), cursor), ("", 0));
    }

    #[test]
    fn line_jumps() {
        let mut buf = String::from("buy milk");
        let mut cursor = 3;
        press(&mut buf, &mut cursor, KeyCode::Home, KeyModifiers::NONE);
        assert_eq!(cursor, 0);
        press(&mut buf, &mut cursor, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(cursor, 8);
    }

    #[test]
    fn unknown_control_keys_are_not_consumed() {
        let mut buf = String::from("buy");
        let mut cursor = 3;
        assert!(!press(&mut buf, &mut cursor, KeyCode::Char('k'), KeyModifiers::CONTROL));
        assert!(!press(&mut buf, &mut cursor, KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(buf, "buy");
    }

    #[test]
    fn cursor_spans_split_at_cursor() {
        let spans = cursor_spans("milk", 2, Style::default());
        let text: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, ["mi", "\u{2588}", "lk"]);
    }
}
