use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::theme::ThemeColors;
use crate::upload::{UploadQueue, UploadStatus};

/// Upload panel: queued local files with their per-file status.
pub struct UploadPanel<'a> {
    queue: &'a UploadQueue,
    selected: usize,
    target_dir: &'a str,
    theme: &'a ThemeColors,
}

impl<'a> UploadPanel<'a> {
    pub fn new(
        queue: &'a UploadQueue,
        selected: usize,
        target_dir: &'a str,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            queue,
            selected,
            target_dir,
            theme,
        }
    }

    fn status_style(&self, status: UploadStatus) -> Style {
        match status {
            UploadStatus::Pending => Style::default().fg(self.theme.dim_fg),
            UploadStatus::Uploading => Style::default()
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD),
            UploadStatus::Success => Style::default().fg(self.theme.success_fg),
            UploadStatus::Error => Style::default().fg(self.theme.error_fg),
        }
    }
}

impl<'a> Widget for UploadPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (area.width as f32 * 0.70).clamp(20.0, 90.0) as u16;
        let height = (self.queue.len() as u16 + 5).clamp(7, area.height.saturating_sub(2).max(7));
        let width = width.min(area.width);
        let height = height.min(area.height);
        let rect = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        Clear.render(rect, buf);

        let block = Block::default()
            .title(format!(" Upload to /{} ", self.target_dir))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height < 2 || inner.width == 0 {
            return;
        }

        let list_height = inner.height.saturating_sub(2) as usize;
        if self.queue.is_empty() {
            let line = Line::from(Span::styled(
                "No files queued. Press [a] to add one.",
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
        }

        let skip = (self.selected + 1).saturating_sub(list_height);
        for (row, (idx, item)) in self
            .queue
            .items()
            .iter()
            .enumerate()
            .skip(skip)
            .take(list_height)
            .enumerate()
        {
            let label = format!("{:<10}", item.status.label());
            let name_style = if idx == self.selected {
                Style::default()
                    .bg(self.theme.list_selected_bg)
                    .fg(self.theme.list_selected_fg)
            } else {
                Style::default().fg(self.theme.list_fg)
            };
            let mut spans = vec![
                Span::styled(label, self.status_style(item.status)),
                Span::styled(item.file_name(), name_style),
            ];
            if let Some(message) = &item.message {
                spans.push(Span::styled(
                    format!("  {}", message),
                    Style::default().fg(self.theme.error_fg),
                ));
            }
            buf.set_line(inner.x, inner.y + row as u16, &Line::from(spans), inner.width);
        }

        let hint = if self.queue.is_running() {
            let done = self
                .queue
                .items()
                .iter()
                .filter(|i| i.status.is_finished())
                .count();
            format!("Uploading {}/{}...  [Esc] Hide", done, self.queue.len())
        } else {
            "[a] Add  [d] Remove  [c] Clear  [Enter] Start  [Esc] Close".to_string()
        };
        let hint_line = Line::from(Span::styled(
            hint,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ));
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}
