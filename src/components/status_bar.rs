use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const BROWSE_HINTS: &str = " /:filter  m:manage  s:save  ?:help ";
const MANAGE_HINTS: &str = " n:mkdir  x:del  u:upload  m:browse ";

/// Truncate to at most `max` characters.
fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Keep the last `max` characters, prefixed with `...` when cut.
fn clip_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        s.to_string()
    } else if max > 3 {
        let tail: String = s.chars().skip(len - (max - 3)).collect();
        format!("...{}", tail)
    } else {
        clip(s, max)
    }
}

/// Status bar widget that displays the remote path, entry info, key hints, or
/// status messages.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    file_info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    manage: bool,
    upload_info: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, file_info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            file_info,
            theme,
            status_message: None,
            is_error: false,
            manage: false,
            upload_info: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn manage(mut self, manage: bool) -> Self {
        self.manage = manage;
        self
    }

    pub fn upload_info(mut self, info: &'a str) -> Self {
        self.upload_info = Some(info);
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default().fg(self.theme.success_fg)
            };

            let display = format!("{:<width$}", clip(msg, width), width = width);
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [path] [file_info] [upload] [key_hints]
        let key_hints = if self.manage {
            MANAGE_HINTS
        } else {
            BROWSE_HINTS
        };
        let hints_len = key_hints.chars().count();
        let upload_display = self.upload_info.unwrap_or("");
        let upload_len = if upload_display.is_empty() {
            0
        } else {
            upload_display.chars().count() + 1
        };

        let remaining = width.saturating_sub(hints_len).saturating_sub(upload_len);
        let info_len = self.file_info.chars().count();
        let path_budget = remaining.saturating_sub(info_len).saturating_sub(1);

        let path_display = clip_left(self.path_str, path_budget);
        let info_display = clip(
            self.file_info,
            remaining.saturating_sub(path_display.chars().count()),
        );
        let gap = remaining
            .saturating_sub(path_display.chars().count())
            .saturating_sub(info_display.chars().count());

        let path_style = Style::default().fg(self.theme.status_fg);
        let info_style = Style::default().fg(self.theme.info_fg);
        let hints_style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);

        let mut spans = vec![
            Span::styled(path_display, path_style),
            Span::raw(" ".repeat(gap)),
            Span::styled(info_display, info_style),
        ];

        if upload_len > 0 {
            let upload_style = Style::default()
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD);
            spans.push(Span::raw(" "));
            spans.push(Span::styled(upload_display.to_string(), upload_style));
        }

        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
        spans.push(Span::styled(key_hints, hints_style));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use ratatui::style::Color;

    fn test_theme() -> ThemeColors {
        theme::dark_theme()
    }

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_basic_widget_creation() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/photos/cat.png", "12.0 KB | Image", &tc);
        assert_eq!(widget.path_str, "/photos/cat.png");
        assert_eq!(widget.file_info, "12.0 KB | Image");
        assert!(widget.status_message.is_none());
        assert!(!widget.is_error);
        assert!(!widget.manage);
    }

    #[test]
    fn test_status_message_success() {
        let tc = test_theme();
        let widget =
            StatusBarWidget::new("/path", "info", &tc).status_message("Created photos/2024", false);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(row(&buf, 80).contains("Created photos/2024"));
        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.fg, Color::Rgb(166, 227, 161));
    }

    #[test]
    fn test_status_message_error() {
        let tc = test_theme();
        let widget =
            StatusBarWidget::new("/path", "info", &tc).status_message("Error: 403 Forbidden", true);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(row(&buf, 80).contains("Error: 403 Forbidden"));
        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.bg, Color::Rgb(243, 139, 168));
        assert_eq!(cell.fg, Color::Rgb(205, 214, 244));
    }

    #[test]
    fn test_browse_bar_rendering() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/docs", "3 dirs, 4 files", &tc);

        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row(&buf, 100);
        assert!(content.contains("/docs"));
        assert!(content.contains("3 dirs, 4 files"));
        assert!(content.contains("m:manage"));
    }

    #[test]
    fn test_manage_bar_shows_manage_hints_and_upload() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/docs", "info", &tc)
            .manage(true)
            .upload_info("upload 1/3");

        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row(&buf, 100);
        assert!(content.contains("n:mkdir"));
        assert!(content.contains("upload 1/3"));
    }

    #[test]
    fn test_long_path_is_clipped_from_the_left() {
        assert_eq!(clip_left("/a/very/long/path", 10), "...ng/path");
        assert_eq!(clip_left("/short", 10), "/short");
        assert_eq!(clip("héllo", 2), "hé");
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/path", "info", &tc);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
