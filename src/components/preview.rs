use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::PreviewState;
use crate::preview_content::caption_lines;
use crate::theme::ThemeColors;

/// Preview of the selected entry: metadata, description caption, then the
/// text body scrolled by `PreviewState::scroll`.
pub struct PreviewWidget<'a> {
    preview_state: &'a PreviewState,
    theme: &'a ThemeColors,
    info: Vec<Line<'static>>,
    block: Option<Block<'a>>,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(preview_state: &'a PreviewState, theme: &'a ThemeColors) -> Self {
        Self {
            preview_state,
            theme,
            info: Vec::new(),
            block: None,
        }
    }

    /// Metadata lines shown above the caption.
    pub fn info(mut self, info: Vec<Line<'static>>) -> Self {
        self.info = info;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let mut lines = self.info.clone();
        if let Some(caption) = &self.preview_state.caption {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.extend(caption_lines(caption, self.theme.caption_fg));
        }
        lines
    }

    fn body_placeholder(&self) -> Option<Line<'static>> {
        let dim = Style::default().fg(self.theme.dim_fg);
        if self.preview_state.loading {
            Some(Line::from(Span::styled("Loading...", dim)))
        } else if let Some(note) = &self.preview_state.note {
            Some(Line::from(Span::styled(
                note.clone(),
                dim.add_modifier(Modifier::ITALIC),
            )))
        } else {
            None
        }
    }
}

impl<'a> Widget for PreviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut lines = self.header_lines();
        let body = &self.preview_state.lines;

        if let Some(placeholder) = self.body_placeholder() {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(placeholder);
        } else if !body.is_empty() {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            let start = self.preview_state.scroll.min(body.len());
            lines.extend(body[start..].iter().cloned());
        }

        if lines.is_empty() {
            let line = Line::from(Span::styled(
                "No preview",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        for (i, line) in lines.iter().take(inner.height as usize).enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use ratatui::widgets::Borders;

    fn row(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_empty_preview_shows_placeholder() {
        let state = PreviewState::default();
        let tc = theme::dark_theme();
        let widget = PreviewWidget::new(&state, &tc)
            .block(Block::default().borders(Borders::ALL).title(" Preview "));
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert!(row(&buf, 1, 30).contains("No preview"));
    }

    #[test]
    fn test_caption_then_body() {
        let state = PreviewState {
            lines: vec![Line::from("line 1"), Line::from("line 2")],
            caption: Some("A cat on a mat".into()),
            ..Default::default()
        };
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        PreviewWidget::new(&state, &tc).render(area, &mut buf);

        assert!(row(&buf, 0, 20).contains("A cat on a mat"));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, tc.caption_fg);
        assert!(row(&buf, 2, 20).contains("line 1"));
        assert!(row(&buf, 3, 20).contains("line 2"));
    }

    #[test]
    fn test_info_lines_come_first() {
        let state = PreviewState {
            loading: true,
            ..Default::default()
        };
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        PreviewWidget::new(&state, &tc)
            .info(vec![Line::from("  Name: a.txt")])
            .render(area, &mut buf);

        assert!(row(&buf, 0, 30).contains("Name: a.txt"));
        assert!(row(&buf, 2, 30).contains("Loading..."));
    }

    #[test]
    fn test_note_replaces_body() {
        let state = PreviewState {
            note: Some("Error: 404 Not Found".into()),
            ..Default::default()
        };
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 2);
        let mut buf = Buffer::empty(area);
        PreviewWidget::new(&state, &tc).render(area, &mut buf);
        assert!(row(&buf, 0, 30).contains("Error: 404 Not Found"));
    }

    #[test]
    fn test_preview_scroll_offset() {
        let state = PreviewState {
            lines: vec![
                Line::from("line 1"),
                Line::from("line 2"),
                Line::from("line 3"),
            ],
            scroll: 1,
            ..Default::default()
        };
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        PreviewWidget::new(&state, &tc).render(area, &mut buf);
        assert!(row(&buf, 0, 20).contains("line 2"));
    }
}
