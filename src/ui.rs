use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api::category::FileCategory;
use crate::app::{App, AppMode, DialogKind};
use crate::components::breadcrumbs::BreadcrumbsWidget;
use crate::components::dialog::DialogWidget;
use crate::components::help::HelpOverlay;
use crate::components::listing::{ListingStatus, ListingWidget};
use crate::components::preview::PreviewWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::upload::UploadPanel;
use crate::components::welcome::WelcomeWidget;
use crate::preview_content::{caption_lines, format_size};

/// Most rows the directory description may take above the list.
const MAX_DESCRIPTION_ROWS: u16 = 6;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let crumbs = app.location.breadcrumbs();
    frame.render_widget(
        BreadcrumbsWidget::new(&crumbs, &app.theme)
            .title(app.title.as_deref())
            .manage(app.manage),
        rows[0],
    );

    if app.mode == AppMode::Viewer {
        render_viewer(app, frame, rows[1]);
    } else {
        render_browser(app, frame, rows[1]);
    }

    render_status_bar(app, frame, rows[2]);
    render_overlays(app, frame, area);
}

fn render_browser(app: &mut App, frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let mut list_area = columns[0];
    if !app.manage {
        if let Some(text) = app.dir_description.as_deref().filter(|t| !t.trim().is_empty()) {
            let height = (text.lines().count() as u16 + 2).min(MAX_DESCRIPTION_ROWS);
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(height), Constraint::Min(1)])
                .split(list_area);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_fg));
            frame.render_widget(
                Paragraph::new(caption_lines(text, app.theme.caption_fg))
                    .block(block)
                    .wrap(Wrap { trim: true }),
                parts[0],
            );
            list_area = parts[1];
        }
    }

    // Keep the selected row inside the bordered list.
    app.update_scroll(list_area.height.saturating_sub(2) as usize);

    let list_title = match app.mode {
        AppMode::Filter => format!(" /{}▏", app.filter),
        _ if !app.filter.is_empty() => format!(" Filter: {} ", app.filter),
        _ => " Files ".to_string(),
    };
    let list_border = if app.mode == AppMode::Filter {
        app.theme.border_focused_fg
    } else {
        app.theme.border_fg
    };
    let status = if app.loading {
        ListingStatus::Loading
    } else if let Some(err) = app.load_error.as_deref() {
        ListingStatus::Failed(err)
    } else {
        ListingStatus::Ready
    };

    let entries = app.visible_entries();
    let listing = ListingWidget::new(&entries, &app.theme, app.settings.use_icons)
        .selection(app.selected_index, app.scroll_offset)
        .manage(app.manage)
        .status(status)
        .block(
            Block::default()
                .title(list_title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(list_border)),
        );
    frame.render_widget(listing, list_area);

    let preview = PreviewWidget::new(&app.preview, &app.theme)
        .info(app.info_lines())
        .block(
            Block::default()
                .title(" Preview ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_fg)),
        );
    frame.render_widget(preview, columns[1]);
}

fn render_viewer(app: &App, frame: &mut Frame, area: Rect) {
    let title = app
        .selected_entry()
        .map(|e| format!(" {} ", e.file_name()))
        .unwrap_or_default();
    let info = if app.show_viewer_info {
        app.info_lines()
    } else {
        Vec::new()
    };
    let preview = PreviewWidget::new(&app.preview, &app.theme)
        .info(info)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focused_fg)),
        );
    frame.render_widget(preview, area);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let selected = app.selected_entry();
    let path_str = match selected {
        Some(entry) => format!("/{}", entry.path()),
        None => format!("/{}", app.location.path),
    };
    let file_info = match selected {
        Some(entry) if entry.is_dir() => FileCategory::Folder.label().to_string(),
        Some(entry) => format!(
            "{} | {}",
            format_size(entry.entry.size),
            FileCategory::from(entry).label()
        ),
        None => String::new(),
    };
    let upload_info = if app.uploads.is_running() {
        let done = app
            .uploads
            .items()
            .iter()
            .filter(|i| i.status.is_finished())
            .count();
        format!("upload {}/{}", done, app.uploads.len())
    } else {
        String::new()
    };

    let mut status_bar =
        StatusBarWidget::new(&path_str, &file_info, &app.theme).manage(app.manage);
    if !upload_info.is_empty() {
        status_bar = status_bar.upload_info(&upload_info);
    }
    if let Some((msg, _, is_error)) = &app.status_message {
        status_bar = status_bar.status_message(msg, *is_error);
    }
    frame.render_widget(status_bar, area);
}

fn render_overlays(app: &App, frame: &mut Frame, area: Rect) {
    match &app.mode {
        AppMode::Welcome => {
            if let Some(view) = app.welcome_view() {
                frame.render_widget(WelcomeWidget::new(&view, &app.theme), area);
            }
        }
        AppMode::Help => {
            frame.render_widget(HelpOverlay::new(&app.theme, app.help_scroll), area);
        }
        AppMode::Upload | AppMode::Dialog(DialogKind::AddUpload) => {
            frame.render_widget(
                UploadPanel::new(
                    &app.uploads,
                    app.upload_selected,
                    &app.location.path,
                    &app.theme,
                ),
                area,
            );
        }
        _ => {}
    }

    if matches!(app.mode, AppMode::Dialog(_)) {
        frame.render_widget(DialogWidget::new(&app.mode, &app.dialog_state, &app.theme), area);
    }
}
