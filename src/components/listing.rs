use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::api::category::FileCategory;
use crate::api::entry::EnrichedFileEntry;
use crate::preview_content::format_size;
use crate::theme::ThemeColors;

/// What the listing panel shows when there are no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus<'a> {
    Ready,
    Loading,
    Failed(&'a str),
}

/// Flat list of the current directory's children.
pub struct ListingWidget<'a> {
    entries: &'a [&'a EnrichedFileEntry],
    theme: &'a ThemeColors,
    use_icons: bool,
    manage: bool,
    selected: usize,
    scroll_offset: usize,
    status: ListingStatus<'a>,
    block: Option<Block<'a>>,
}

impl<'a> ListingWidget<'a> {
    pub fn new(entries: &'a [&'a EnrichedFileEntry], theme: &'a ThemeColors, use_icons: bool) -> Self {
        Self {
            entries,
            theme,
            use_icons,
            manage: false,
            selected: 0,
            scroll_offset: 0,
            status: ListingStatus::Ready,
            block: None,
        }
    }

    pub fn selection(mut self, selected: usize, scroll_offset: usize) -> Self {
        self.selected = selected;
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn manage(mut self, manage: bool) -> Self {
        self.manage = manage;
        self
    }

    pub fn status(mut self, status: ListingStatus<'a>) -> Self {
        self.status = status;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn entry_style(&self, entry: &EnrichedFileEntry, is_selected: bool) -> Style {
        if is_selected {
            Style::default()
                .bg(self.theme.list_selected_bg)
                .fg(self.theme.list_selected_fg)
                .add_modifier(Modifier::BOLD)
        } else if entry.view_hidden {
            Style::default().fg(self.theme.list_hidden_fg)
        } else if entry.is_dir() {
            Style::default()
                .fg(self.theme.list_dir_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.list_fg)
        }
    }

    fn placeholder(&self) -> Line<'a> {
        match self.status {
            ListingStatus::Loading => Line::from(Span::styled(
                "Loading...",
                Style::default().fg(self.theme.dim_fg),
            )),
            ListingStatus::Failed(message) => Line::from(Span::styled(
                message,
                Style::default().fg(self.theme.error_fg),
            )),
            ListingStatus::Ready => Line::from(Span::styled(
                "(empty)",
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            )),
        }
    }
}

impl<'a> Widget for ListingWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if visible_height == 0 || inner_area.width == 0 {
            return;
        }

        if self.entries.is_empty() || self.status != ListingStatus::Ready {
            let line = self.placeholder();
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
            return;
        }

        let width = inner_area.width as usize;
        let visible = self
            .entries
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (row, (idx, entry)) in visible.enumerate() {
            let y = inner_area.y + row as u16;
            let style = self.entry_style(entry, idx == self.selected);

            let icon = FileCategory::from(*entry).icon(self.use_icons);
            let mut name = format!("{}{}", icon, entry.display_name(self.manage));
            if entry.is_dir() {
                name.push('/');
            }
            if entry.desc_file_path().is_some() && !self.manage {
                name.push_str(" *");
            }

            // Right-align the size for files when there is room.
            let size = if entry.is_dir() {
                String::new()
            } else {
                format_size(entry.entry.size)
            };
            let name_len = name.chars().count();
            let size_len = size.chars().count();
            let content = if !size.is_empty() && name_len + size_len + 2 <= width {
                format!("{}{}{}", name, " ".repeat(width - name_len - size_len), size)
            } else {
                format!("{:<width$}", name, width = width)
            };

            let line = Line::from(Span::styled(content, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::entry::FileEntry;
    use crate::api::normalize::normalize;
    use crate::api::ApiBase;
    use crate::theme;
    use ratatui::widgets::Borders;

    fn listing() -> EnrichedFileEntry {
        let file = |name: &str, file_name: &str, mime: &str| FileEntry {
            name: name.into(),
            file_name: file_name.into(),
            file_ext: file_name
                .rfind('.')
                .map(|i| file_name[i..].to_string())
                .unwrap_or_default(),
            path: file_name.into(),
            mime_type: mime.into(),
            size: 2048,
            ..Default::default()
        };
        normalize(
            FileEntry {
                is_dir: true,
                dirs: vec![FileEntry {
                    name: "photos".into(),
                    file_name: "photos".into(),
                    path: "photos".into(),
                    is_dir: true,
                    ..Default::default()
                }],
                files: vec![
                    file("cat", "cat.png", "image/png"),
                    file(".cat", ".cat.txt", "text/plain"),
                ],
                ..Default::default()
            },
            &ApiBase::new("http://h", "-"),
        )
    }

    fn row(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_entries_with_tags_and_sizes() {
        let listing = listing();
        let entries: Vec<&EnrichedFileEntry> = listing.children().filter(|e| !e.view_hidden).collect();
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        ListingWidget::new(&entries, &tc, false).render(area, &mut buf);

        assert!(row(&buf, 0, 30).starts_with("[D] photos/"));
        let second = row(&buf, 1, 30);
        assert!(second.starts_with("[I] cat *"));
        assert!(second.trim_end().ends_with("2.00 KB"));
    }

    #[test]
    fn manage_mode_shows_file_names() {
        let listing = listing();
        let entries: Vec<&EnrichedFileEntry> = listing.children().collect();
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        ListingWidget::new(&entries, &tc, false)
            .manage(true)
            .render(area, &mut buf);

        assert!(row(&buf, 1, 30).starts_with("[I] cat.png "));
        assert!(row(&buf, 2, 30).starts_with("[T] .cat.txt"));
    }

    #[test]
    fn selected_row_is_highlighted() {
        let listing = listing();
        let entries: Vec<&EnrichedFileEntry> = listing.children().collect();
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        ListingWidget::new(&entries, &tc, false)
            .selection(1, 0)
            .render(area, &mut buf);

        assert_eq!(buf.cell((0, 1)).unwrap().bg, tc.list_selected_bg);
        assert_ne!(buf.cell((0, 0)).unwrap().bg, tc.list_selected_bg);
        assert_eq!(buf.cell((0, 2)).unwrap().fg, tc.list_hidden_fg);
    }

    #[test]
    fn scroll_offset_skips_rows() {
        let listing = listing();
        let entries: Vec<&EnrichedFileEntry> = listing.children().collect();
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        ListingWidget::new(&entries, &tc, false)
            .manage(true)
            .selection(2, 2)
            .render(area, &mut buf);

        assert!(row(&buf, 0, 30).starts_with("[T] .cat.txt"));
    }

    #[test]
    fn placeholders_for_loading_error_and_empty() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 3);

        let mut buf = Buffer::empty(area);
        ListingWidget::new(&[], &tc, false)
            .status(ListingStatus::Loading)
            .block(Block::default().borders(Borders::ALL))
            .render(area, &mut buf);
        assert!(row(&buf, 1, 40).contains("Loading..."));

        let mut buf = Buffer::empty(area);
        ListingWidget::new(&[], &tc, false)
            .status(ListingStatus::Failed("Error: 404 Not Found"))
            .render(area, &mut buf);
        assert!(row(&buf, 0, 40).contains("Error: 404 Not Found"));

        let mut buf = Buffer::empty(area);
        ListingWidget::new(&[], &tc, false).render(area, &mut buf);
        assert!(row(&buf, 0, 40).contains("(empty)"));
    }
}
