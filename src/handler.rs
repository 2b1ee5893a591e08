use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode, DialogKind};
use crate::components::help::HelpOverlay;
use crate::worker::Command;

/// Handle a key event, returning the side effects it requested.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Vec<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Vec::new();
    }

    match app.mode.clone() {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Dialog(kind) => handle_dialog_mode(app, key, &kind),
        AppMode::Filter => handle_filter_mode(app, key),
        AppMode::Viewer => handle_viewer_mode(app, key),
        AppMode::Upload => handle_upload_mode(app, key),
        AppMode::Help => {
            handle_help_mode(app, key);
            Vec::new()
        }
        AppMode::Welcome => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.dismiss_welcome();
            } else if key.code == KeyCode::Char('q') {
                app.quit();
            }
            Vec::new()
        }
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Vec<Command> {
    match key.code {
        KeyCode::Char('q') => {
            app.quit();
            Vec::new()
        }
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_selected(),
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => app.go_parent(),
        KeyCode::Char('J') => {
            app.scroll_preview_down();
            Vec::new()
        }
        KeyCode::Char('K') => {
            app.scroll_preview_up();
            Vec::new()
        }
        KeyCode::Char('r') | KeyCode::F(5) => app.refresh(),
        KeyCode::Char('s') => app.request_download(),
        KeyCode::Char('m') => app.toggle_manage(),
        KeyCode::Char('t') => {
            app.toggle_theme();
            Vec::new()
        }
        KeyCode::Char('/') => {
            app.start_filter();
            Vec::new()
        }
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Char('?') => {
            app.toggle_help();
            Vec::new()
        }
        KeyCode::Char('n') => {
            app.request_create_dir();
            Vec::new()
        }
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('u') => {
            app.open_upload_panel();
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent, kind: &DialogKind) -> Vec<Command> {
    match kind {
        DialogKind::DeleteConfirm { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_dialog(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_dialog();
                Vec::new()
            }
            _ => Vec::new(),
        },
        DialogKind::Error { .. } => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.cancel_dialog();
            }
            Vec::new()
        }
        DialogKind::CreateDirectory | DialogKind::AddUpload => {
            match key.code {
                KeyCode::Enter => return app.confirm_dialog(),
                KeyCode::Esc => app.cancel_dialog(),
                KeyCode::Backspace => app.dialog_delete_char(),
                KeyCode::Left => app.dialog_move_cursor_left(),
                KeyCode::Right => app.dialog_move_cursor_right(),
                KeyCode::Home => app.dialog_cursor_home(),
                KeyCode::End => app.dialog_cursor_end(),
                KeyCode::Char(c) => app.dialog_input_char(c),
                _ => {}
            }
            Vec::new()
        }
    }
}

fn handle_filter_mode(app: &mut App, key: KeyEvent) -> Vec<Command> {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Enter => {
            app.accept_filter();
            Vec::new()
        }
        KeyCode::Backspace => app.filter_pop(),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Char(c) => app.filter_push(c),
        _ => Vec::new(),
    }
}

fn handle_viewer_mode(app: &mut App, key: KeyEvent) -> Vec<Command> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_viewer();
            Vec::new()
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('n') => app.viewer_next(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('p') => app.viewer_previous(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_preview_down();
            Vec::new()
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_preview_up();
            Vec::new()
        }
        KeyCode::Char('i') => {
            app.toggle_viewer_info();
            Vec::new()
        }
        KeyCode::Char('s') => app.request_download(),
        _ => Vec::new(),
    }
}

fn handle_upload_mode(app: &mut App, key: KeyEvent) -> Vec<Command> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_upload_panel(),
        KeyCode::Char('a') => app.request_add_upload(),
        KeyCode::Char('d') | KeyCode::Delete => app.remove_selected_upload(),
        KeyCode::Char('c') => app.clear_uploads(),
        KeyCode::Char('j') | KeyCode::Down => app.upload_select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.upload_select_previous(),
        KeyCode::Enter => return app.start_upload(),
        _ => {}
    }
    Vec::new()
}

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_help_down(HelpOverlay::total_lines()),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_help_up(),
        _ => {}
    }
}
