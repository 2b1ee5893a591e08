use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::nav::Breadcrumb;
use crate::theme::ThemeColors;

const SEPARATOR: &str = " › ";

/// Header line: site title, breadcrumb trail and the active mode.
pub struct BreadcrumbsWidget<'a> {
    crumbs: &'a [Breadcrumb],
    theme: &'a ThemeColors,
    title: Option<&'a str>,
    manage: bool,
}

impl<'a> BreadcrumbsWidget<'a> {
    pub fn new(crumbs: &'a [Breadcrumb], theme: &'a ThemeColors) -> Self {
        Self {
            crumbs,
            theme,
            title: None,
            manage: false,
        }
    }

    pub fn title(mut self, title: Option<&'a str>) -> Self {
        self.title = title;
        self
    }

    pub fn manage(mut self, manage: bool) -> Self {
        self.manage = manage;
        self
    }
}

impl<'a> Widget for BreadcrumbsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut spans = Vec::new();
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            spans.push(Span::styled(
                format!(" {} ", title),
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│ ", Style::default().fg(self.theme.dim_fg)));
        } else {
            spans.push(Span::raw(" "));
        }

        let last = self.crumbs.len().saturating_sub(1);
        for (i, crumb) in self.crumbs.iter().enumerate() {
            if i > 1 {
                spans.push(Span::styled(SEPARATOR, Style::default().fg(self.theme.dim_fg)));
            } else if i == 1 {
                spans.push(Span::raw(" "));
            }
            let style = if i == last {
                Style::default()
                    .fg(self.theme.list_dir_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.list_fg)
            };
            spans.push(Span::styled(crumb.label.clone(), style));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);

        let tag = if self.manage { " MANAGE " } else { " BROWSE " };
        let tag_width = tag.len() as u16;
        if area.width > line.width() as u16 + tag_width {
            let style = if self.manage {
                Style::default()
                    .bg(self.theme.warning_fg)
                    .fg(self.theme.dialog_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.dim_fg)
            };
            buf.set_span(
                area.x + area.width - tag_width,
                area.y,
                &Span::styled(tag, style),
                tag_width,
            );
        }
    }
}
