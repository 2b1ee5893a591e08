use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(x, y, w, h)
    }

    fn hint_line(&self, hint: &'static str) -> Line<'static> {
        Line::from(Span::styled(
            hint,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ))
    }

    fn render_input(&self, title: &str, area: Rect, buf: &mut Buffer) {
        let dialog_width = 60.min(area.width.saturating_sub(4));
        let rect = Self::centered_rect(dialog_width, 5, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let input = &self.dialog_state.input;
        let cursor_pos = self.dialog_state.cursor_position.min(input.len());
        let max_width = inner.width as usize;

        let (before, cursor_char, after) = match input[cursor_pos..].chars().next() {
            Some(c) => {
                let end = cursor_pos + c.len_utf8();
                (&input[..cursor_pos], &input[cursor_pos..end], &input[end..])
            }
            None => (input.as_str(), " ", ""),
        };

        // Keep the cursor visible by dropping characters from the left.
        let room = max_width.saturating_sub(2);
        let before_display = if before.chars().count() > room {
            let skip = before.chars().count() - room;
            let start = before
                .char_indices()
                .nth(skip)
                .map(|(i, _)| i)
                .unwrap_or(before.len());
            &before[start..]
        } else {
            before
        };

        let input_style = Style::default().fg(self.theme.list_fg);
        let cursor_style = Style::default()
            .bg(self.theme.list_fg)
            .fg(self.theme.dialog_bg)
            .add_modifier(Modifier::BOLD);

        let line = Line::from(vec![
            Span::styled(before_display, input_style),
            Span::styled(cursor_char, cursor_style),
            Span::styled(after, input_style),
        ]);
        buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);

        if inner.height > 1 {
            let hint = self.hint_line("[Enter] Confirm  [Esc] Cancel");
            buf.set_line(inner.x, inner.y + inner.height - 1, &hint, inner.width);
        }
    }

    fn render_confirm(&self, path: &str, name: &str, area: Rect, buf: &mut Buffer) {
        let dialog_width = (path.chars().count() as u16 + 10)
            .max(40)
            .min(area.width.saturating_sub(4));
        let rect = Self::centered_rect(dialog_width, 7, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(" Delete Confirmation ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.error_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let header = Line::from(Span::styled(
            format!("Delete \"{}\"?", name),
            Style::default()
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(inner.x, inner.y, &header, inner.width);

        if inner.height > 2 {
            let target = Line::from(Span::styled(
                format!("  /{}", path),
                Style::default().fg(self.theme.list_fg),
            ));
            buf.set_line(inner.x, inner.y + 2, &target, inner.width);
        }

        let hint = self.hint_line("[y] Yes  [n/Esc] Cancel");
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint, inner.width);
    }

    fn render_error(&self, message: &str, area: Rect, buf: &mut Buffer) {
        let dialog_width = (message.chars().count() as u16 + 6)
            .max(30)
            .min(area.width.saturating_sub(4));
        let rect = Self::centered_rect(dialog_width, 5, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(" Error ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.error_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let msg_line = Line::from(Span::styled(
            message,
            Style::default().fg(self.theme.error_fg),
        ));
        buf.set_line(inner.x, inner.y + inner.height / 2, &msg_line, inner.width);

        if inner.height > 1 {
            let hint = self.hint_line("[Enter/Esc] Dismiss");
            buf.set_line(inner.x, inner.y + inner.height - 1, &hint, inner.width);
        }
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind,
            _ => return,
        };

        match kind {
            DialogKind::CreateDirectory => self.render_input("New Directory", area, buf),
            DialogKind::AddUpload => self.render_input("Add File to Upload", area, buf),
            DialogKind::DeleteConfirm { path, name } => self.render_confirm(path, name, area, buf),
            DialogKind::Error { message } => self.render_error(message, area, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn render(mode: &AppMode, state: &DialogState) -> String {
        let tc = theme::dark_theme();
        let widget = DialogWidget::new(mode, state, &tc);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buffer_to_string(&buf, area)
    }

    #[test]
    fn test_input_dialog_renders() {
        let mode = AppMode::Dialog(DialogKind::CreateDirectory);
        let state = DialogState {
            input: "holidays".to_string(),
            cursor_position: 8,
        };
        let content = render(&mode, &state);
        assert!(content.contains("New Directory"));
        assert!(content.contains("holidays"));
        assert!(content.contains("[Enter] Confirm"));
    }

    #[test]
    fn test_input_dialog_cursor_on_multibyte_char() {
        let mode = AppMode::Dialog(DialogKind::AddUpload);
        let state = DialogState {
            input: "café.jpg".to_string(),
            cursor_position: 3,
        };
        let content = render(&mode, &state);
        assert!(content.contains("Add File to Upload"));
        assert!(content.contains("caf"));
    }

    #[test]
    fn test_confirm_dialog_renders() {
        let mode = AppMode::Dialog(DialogKind::DeleteConfirm {
            path: "photos/cat.png".into(),
            name: "cat.png".into(),
        });
        let content = render(&mode, &DialogState::default());
        assert!(content.contains("Delete \"cat.png\"?"));
        assert!(content.contains("/photos/cat.png"));
        assert!(content.contains("[y] Yes"));
    }

    #[test]
    fn test_error_dialog_renders() {
        let mode = AppMode::Dialog(DialogKind::Error {
            message: "Error: 403 Forbidden".to_string(),
        });
        let content = render(&mode, &DialogState::default());
        assert!(content.contains(" Error "));
        assert!(content.contains("Error: 403 Forbidden"));
    }

    #[test]
    fn test_no_dialog_mode_noop() {
        let content = render(&AppMode::Normal, &DialogState::default());
        assert!(content.trim().is_empty());
    }

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }
}
