use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

/// `(keys, action)` pairs grouped under a section title.
type Section = (&'static str, &'static [(&'static str, &'static str)]);

const SECTIONS: &[Section] = &[
    (
        "Browse",
        &[
            ("j / ↓", "Move down"),
            ("k / ↑", "Move up"),
            ("g / Home", "First entry"),
            ("G / End", "Last entry"),
            ("Enter / l / →", "Open directory or view file"),
            ("Backspace / h / ←", "Parent directory"),
            ("J / K", "Scroll preview"),
            ("r / F5", "Reload listing"),
            ("s", "Save file to download directory"),
        ],
    ),
    (
        "Filter",
        &[
            ("/", "Fuzzy filter entries"),
            ("Enter", "Keep filter"),
            ("Esc", "Clear filter"),
        ],
    ),
    (
        "Viewer",
        &[
            ("l / → / n", "Next file"),
            ("h / ← / p", "Previous file"),
            ("j / k", "Scroll text"),
            ("i", "Toggle info"),
            ("Esc / q", "Close viewer"),
        ],
    ),
    (
        "Manage",
        &[
            ("m", "Toggle manage mode"),
            ("n", "Create directory"),
            ("x / Delete", "Delete entry"),
            ("u", "Upload panel"),
        ],
    ),
    (
        "Upload panel",
        &[
            ("a", "Add local file"),
            ("d", "Remove file"),
            ("c", "Clear list"),
            ("Enter", "Start upload"),
            ("Esc", "Close panel"),
        ],
    ),
    (
        "General",
        &[
            ("t", "Dark / light theme"),
            ("?", "This help"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
];

const KEY_COLUMN: usize = 20;

/// Scrollable key binding reference.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll: usize) -> Self {
        Self { theme, scroll }
    }

    /// Number of rows the overlay content occupies.
    pub fn total_lines() -> usize {
        SECTIONS.iter().map(|(_, keys)| keys.len() + 2).sum::<usize>() + 1
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default().fg(self.theme.warning_fg);
        let text_style = Style::default().fg(self.theme.list_fg);

        let mut lines = Vec::with_capacity(Self::total_lines());
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(format!("{}:", title), heading)));
            lines.extend(keys.iter().map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!("  {:<w$}", key, w = KEY_COLUMN), key_style),
                    Span::styled(*action, text_style),
                ])
            }));
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            "? / Esc to close",
            Style::default().fg(self.theme.dim_fg),
        )));
        lines
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_mul(7).saturating_div(10).min(64);
        let height = area.height.saturating_mul(4).saturating_div(5).min(48);
        let popup = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        Clear.render(popup, buf);

        let lines = self.lines();
        let total = lines.len();
        let block = Block::default()
            .title(" Keys ")
            .title_bottom(
                Line::from(format!(" {}/{} ", (self.scroll + 1).min(total), total))
                    .right_aligned(),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(popup);
        block.render(popup, buf);

        for (row, line) in lines
            .iter()
            .skip(self.scroll)
            .take(inner.height as usize)
            .enumerate()
        {
            buf.set_line(inner.x + 1, inner.y + row as u16, line, inner.width.saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;

    fn screen(scroll: usize) -> String {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 100, 40);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, scroll).render(area, &mut buf);
        (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn no_empty_sections() {
        assert!(SECTIONS.iter().all(|(_, keys)| !keys.is_empty()));
    }

    #[test]
    fn line_count_matches_total() {
        let theme = dark_theme();
        assert_eq!(
            HelpOverlay::new(&theme, 0).lines().len(),
            HelpOverlay::total_lines()
        );
    }

    #[test]
    fn shows_first_section() {
        let s = screen(0);
        assert!(s.contains("Keys"));
        assert!(s.contains("Browse:"));
        assert!(s.contains("Open directory or view file"));
    }

    #[test]
    fn scrolling_hides_top_rows() {
        assert!(!screen(3).contains("Browse:"));
    }
}
