use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use crate::app::WelcomeView;
use crate::theme::ThemeColors;

/// Full-screen welcome card shown at the served root.
pub struct WelcomeWidget<'a> {
    view: &'a WelcomeView,
    theme: &'a ThemeColors,
}

impl<'a> WelcomeWidget<'a> {
    pub fn new(view: &'a WelcomeView, theme: &'a ThemeColors) -> Self {
        Self { view, theme }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let v = self.view;
        let dim = Style::default().fg(self.theme.dim_fg);
        let mut lines = Vec::new();

        if !v.header.is_empty() {
            lines.push(Line::from(Span::styled(v.header.as_str(), dim)));
            lines.push(Line::from(""));
        }
        if !v.title.is_empty() {
            lines.push(Line::from(Span::styled(
                v.title.as_str(),
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        if !v.sub_title.is_empty() {
            lines.push(Line::from(Span::styled(
                v.sub_title.as_str(),
                Style::default().fg(self.theme.info_fg),
            )));
        }
        if !v.introduction.is_empty() {
            lines.push(Line::from(""));
            lines.extend(
                v.introduction
                    .lines()
                    .map(|l| Line::from(Span::styled(l, Style::default().fg(self.theme.list_fg)))),
            );
        }
        if v.avatar_url.is_some() || v.background_url.is_some() {
            lines.push(Line::from(""));
        }
        if let Some(url) = &v.avatar_url {
            lines.push(Line::from(Span::styled(format!("Avatar: {}", url), dim)));
        }
        if let Some(url) = &v.background_url {
            lines.push(Line::from(Span::styled(format!("Background: {}", url), dim)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[Enter] {}", v.enter_text),
            Style::default()
                .fg(self.theme.success_fg)
                .add_modifier(Modifier::BOLD),
        )));
        lines
    }
}

impl<'a> Widget for WelcomeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let width = (area.width as f32 * 0.70).clamp(20.0, 80.0) as u16;
        let width = width.min(area.width);
        let height = (lines.len() as u16 + 4).min(area.height);
        let rect = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        Clear.render(rect, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::new(2, 2, 1, 1));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(rect, buf);
    }
}
