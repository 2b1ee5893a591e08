use std::path::Path;
use std::time::Instant;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::text::Line;
use syntect::highlighting::Theme;
use syntect::parsing::SyntaxSet;
use tracing::{debug, info, warn};

use crate::api::category::FileCategory;
use crate::api::entry::{EnrichedFileEntry, FileEntry};
use crate::api::normalize::normalize;
use crate::api::transform::{build_transform_url, TransformOp};
use crate::api::ApiBase;
use crate::config::{AppConfig, ThemeColorsConfig};
use crate::error::{AppError, Result};
use crate::event::{OperationResult, TextTarget};
use crate::nav::{Location, NavTicket, Navigator};
use crate::preview_content::{self, MediaOptions};
use crate::state::SharedUiState;
use crate::theme::{resolve_scheme, ThemeColors};
use crate::upload::{UploadQueue, UploadStatus};
use crate::worker::Command;

/// Characters the file server refuses in names.
pub const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '<', '>', '|'];

/// Size of the avatar thumbnail requested for the welcome screen.
const AVATAR_SIZE: u32 = 140;

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    CreateDirectory,
    DeleteConfirm { path: String, name: String },
    /// Input is a local file path to queue for upload.
    AddUpload,
    Error { message: String },
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
    /// Typing a fuzzy filter.
    Filter,
    /// Full-screen entry viewer.
    Viewer,
    /// Upload panel.
    Upload,
    Help,
    Welcome,
}

/// State for a dialog's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    pub cursor_position: usize,
}

/// Settings resolved from config once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub confirm_delete: bool,
    pub use_icons: bool,
    pub preview_enabled: bool,
    pub max_text_bytes: u64,
    pub tab_width: usize,
    pub media: MediaOptions,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            confirm_delete: config.confirm_delete(),
            use_icons: config.use_icons(),
            preview_enabled: config.preview_enabled(),
            max_text_bytes: config.max_text_bytes(),
            tab_width: config.tab_width(),
            media: MediaOptions {
                thumbnail: config.thumbnail_size(),
                view: config.view_size(),
                image_format: config.preview.image_format.clone(),
                poster_frame: config.preview.poster_frame,
            },
        }
    }
}

/// Preview of the selected entry.
#[derive(Debug, Default)]
pub struct PreviewState {
    /// Highlighted text body, when the entry is a text file.
    pub lines: Vec<Line<'static>>,
    pub loading: bool,
    /// Why there is no body (fetch failed, too large).
    pub note: Option<String>,
    /// Description caption of the selected entry.
    pub caption: Option<String>,
    pub scroll: usize,
}

/// Content of the welcome screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeView {
    pub header: String,
    pub title: String,
    pub sub_title: String,
    pub introduction: String,
    pub enter_text: String,
    pub avatar_url: Option<String>,
    pub background_url: Option<String>,
}

/// Reject names the server would refuse.
pub fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::InvalidName(format!("'{}'", name)));
    }
    if name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(AppError::InvalidName(format!(
            "'{}' must not contain any of \\ / : * < > |",
            name
        )));
    }
    Ok(name)
}

fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Main application state.
pub struct App {
    pub base: ApiBase,
    pub settings: Settings,
    pub ui_state: SharedUiState,
    pub theme: ThemeColors,
    custom_theme: Option<ThemeColorsConfig>,

    pub location: Location,
    pub listing: Option<EnrichedFileEntry>,
    pub loading: bool,
    pub load_error: Option<String>,
    /// Directory description text, shown in browse mode.
    pub dir_description: Option<String>,
    pub title: Option<String>,
    listing_nav: Navigator,
    preview_nav: Navigator,
    /// Path to reselect once the next listing arrives.
    pending_select: Option<String>,
    /// Open the reselected entry in the viewer.
    pending_view: bool,

    pub manage: bool,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub filter: String,
    matcher: SkimMatcherV2,

    pub preview: PreviewState,
    pub show_viewer_info: bool,
    syntax_set: SyntaxSet,
    syntax_theme: Theme,

    pub uploads: UploadQueue,
    pub upload_selected: usize,

    pub help_scroll: usize,
    pub should_quit: bool,
    pub mode: AppMode,
    pub dialog_state: DialogState,
    pub status_message: Option<(String, Instant, bool)>,
}

impl App {
    pub fn new(config: &AppConfig, ui_state: SharedUiState, start_path: &str) -> Self {
        let theme = resolve_scheme(&ui_state.theme_scheme(), config.theme.custom.as_ref());
        Self {
            base: config.api_base(),
            settings: Settings::from_config(config),
            ui_state,
            theme,
            custom_theme: config.theme.custom.clone(),
            location: Location::parse(start_path),
            listing: None,
            loading: false,
            load_error: None,
            dir_description: None,
            title: None,
            listing_nav: Navigator::new(),
            preview_nav: Navigator::new(),
            pending_select: None,
            pending_view: false,
            manage: config.manage(),
            selected_index: 0,
            scroll_offset: 0,
            filter: String::new(),
            matcher: SkimMatcherV2::default(),
            preview: PreviewState::default(),
            show_viewer_info: true,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            syntax_theme: preview_content::load_theme(Some(config.syntax_theme_name())),
            uploads: UploadQueue::new(),
            upload_selected: 0,
            help_scroll: 0,
            should_quit: false,
            mode: AppMode::Normal,
            dialog_state: DialogState::default(),
            status_message: None,
        }
    }

    /// Initial commands: load the start location.
    pub fn start(&mut self) -> Vec<Command> {
        let path = self.location.path.clone();
        self.navigate(&path)
    }

    // ── Listing ─────────────────────────────────────────────────────────────

    /// Switch to `path` and request its listing.
    pub fn navigate(&mut self, path: &str) -> Vec<Command> {
        self.location = Location::parse(path);
        self.listing = None;
        self.loading = true;
        self.load_error = None;
        self.dir_description = None;
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.filter.clear();
        self.pending_view = false;
        self.preview = PreviewState::default();
        // Invalidate preview fetches for the old directory.
        self.preview_nav.begin();

        let ticket = self.listing_nav.begin();
        info!(path = %self.location.path, "navigate");
        vec![
            Command::CancelText(TextTarget::Preview),
            Command::CancelText(TextTarget::Caption),
            Command::CancelText(TextTarget::DirDescription),
            Command::LoadListing {
                ticket,
                path: self.location.path.clone(),
            },
        ]
    }

    /// Reload the current directory, keeping the cursor on the same entry.
    pub fn refresh(&mut self) -> Vec<Command> {
        self.pending_select = self.selected_entry().map(|e| e.path().to_string());
        let path = self.location.path.clone();
        self.navigate(&path)
    }

    pub fn go_parent(&mut self) -> Vec<Command> {
        if self.location.is_root() {
            return Vec::new();
        }
        self.pending_select = Some(self.location.path.clone());
        let parent = self.location.parent().path;
        self.navigate(&parent)
    }

    /// Enter a directory or open a file in the viewer.
    pub fn open_selected(&mut self) -> Vec<Command> {
        let Some(entry) = self.selected_entry() else {
            return Vec::new();
        };
        if entry.is_dir() {
            let path = entry.path().to_string();
            self.navigate(&path)
        } else {
            self.mode = AppMode::Viewer;
            Vec::new()
        }
    }

    pub fn handle_listing_loaded(
        &mut self,
        ticket: NavTicket,
        path: &str,
        result: std::result::Result<FileEntry, String>,
    ) -> Vec<Command> {
        if !self.listing_nav.is_current(ticket) {
            debug!(%path, "dropping stale listing");
            return Vec::new();
        }
        self.loading = false;

        let raw = match result {
            Ok(raw) => raw,
            Err(message) => {
                warn!(%path, error = %message, "listing failed");
                self.load_error = Some(message);
                return Vec::new();
            }
        };

        // A file location is shown in the viewer over its parent directory.
        if !raw.is_dir && !self.location.is_root() {
            info!(%path, "location is a file, opening it from its parent");
            let file_path = self.location.path.clone();
            let parent = self.location.parent().path;
            let commands = self.navigate(&parent);
            self.pending_select = Some(file_path);
            self.pending_view = true;
            return commands;
        }

        if let Some(frontend) = &raw.frontend {
            self.title = frontend.title.clone();
            if let Some(scheme) = frontend.theme.as_deref() {
                self.apply_theme_scheme(scheme);
            }
        }

        let listing = normalize(raw, &self.base);
        debug!(
            %path,
            dirs = listing.dirs.len(),
            files = listing.files.len(),
            "listing loaded"
        );

        let mut commands = Vec::new();
        if let Some(url) = listing.desc_file_url() {
            commands.push(Command::LoadText {
                ticket,
                target: TextTarget::DirDescription,
                url: url.to_string(),
            });
        }

        let welcome_enabled = listing.welcome().is_some_and(|w| w.enable);
        self.listing = Some(listing);

        let open_viewer = std::mem::take(&mut self.pending_view);
        let mut viewing = false;
        if let Some(target) = self.pending_select.take() {
            let found = self
                .visible_entries()
                .iter()
                .enumerate()
                .find(|(_, e)| e.path() == target)
                .map(|(i, e)| (i, e.is_dir()));
            if let Some((i, is_dir)) = found {
                self.selected_index = i;
                viewing = open_viewer && !is_dir;
            }
        }

        if viewing {
            self.mode = AppMode::Viewer;
        } else if self.location.is_root()
            && welcome_enabled
            && !self.ui_state.welcome_dismissed()
        {
            self.mode = AppMode::Welcome;
        }

        commands.extend(self.selection_changed());
        commands
    }

    /// Entries shown in the list: directories then files, hidden ones only in
    /// manage mode, narrowed by the filter.
    pub fn visible_entries(&self) -> Vec<&EnrichedFileEntry> {
        let Some(listing) = &self.listing else {
            return Vec::new();
        };
        listing
            .children()
            .filter(|e| self.manage || !e.view_hidden)
            .filter(|e| {
                self.filter.is_empty()
                    || self
                        .matcher
                        .fuzzy_match(e.display_name(self.manage), &self.filter)
                        .is_some()
            })
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&EnrichedFileEntry> {
        self.visible_entries().get(self.selected_index).copied()
    }

    /// Keep the selected item within the visible window.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index + 1 - visible_height;
        }
    }

    // ── Selection & preview ─────────────────────────────────────────────────

    fn set_selection(&mut self, index: usize) -> Vec<Command> {
        if index == self.selected_index {
            return Vec::new();
        }
        self.selected_index = index;
        self.selection_changed()
    }

    pub fn select_next(&mut self) -> Vec<Command> {
        let len = self.visible_entries().len();
        if len > 0 && self.selected_index < len - 1 {
            self.set_selection(self.selected_index + 1)
        } else {
            Vec::new()
        }
    }

    pub fn select_previous(&mut self) -> Vec<Command> {
        if self.selected_index > 0 {
            self.set_selection(self.selected_index - 1)
        } else {
            Vec::new()
        }
    }

    pub fn select_first(&mut self) -> Vec<Command> {
        self.set_selection(0)
    }

    pub fn select_last(&mut self) -> Vec<Command> {
        let len = self.visible_entries().len();
        self.set_selection(len.saturating_sub(1))
    }

    /// Reset the preview for the newly selected entry and request its text
    /// body and description caption.
    fn selection_changed(&mut self) -> Vec<Command> {
        let len = self.visible_entries().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }

        self.preview = PreviewState::default();
        let ticket = self.preview_nav.begin();
        let mut commands = vec![
            Command::CancelText(TextTarget::Preview),
            Command::CancelText(TextTarget::Caption),
        ];

        let Some(entry) = self.selected_entry() else {
            return commands;
        };
        let caption_url = entry.desc_file_url().map(str::to_string);
        let is_text = FileCategory::from(entry) == FileCategory::Text;
        let size = entry.entry.size;
        let url = entry.url.clone();

        if let Some(url) = caption_url {
            commands.push(Command::LoadText {
                ticket,
                target: TextTarget::Caption,
                url,
            });
        }

        if is_text && self.settings.preview_enabled {
            if size > self.settings.max_text_bytes {
                self.preview.note = Some(format!(
                    "File too large to preview ({})",
                    preview_content::format_size(size)
                ));
            } else {
                self.preview.loading = true;
                commands.push(Command::LoadText {
                    ticket,
                    target: TextTarget::Preview,
                    url,
                });
            }
        }
        commands
    }

    pub fn handle_text_loaded(
        &mut self,
        ticket: NavTicket,
        target: TextTarget,
        result: std::result::Result<String, String>,
    ) {
        let current = match target {
            TextTarget::DirDescription => self.listing_nav.is_current(ticket),
            TextTarget::Preview | TextTarget::Caption => self.preview_nav.is_current(ticket),
        };
        if !current {
            debug!(?target, "dropping stale text");
            return;
        }

        match (target, result) {
            (TextTarget::Preview, Ok(text)) => {
                let file_name = self
                    .selected_entry()
                    .map(|e| e.file_name().to_string())
                    .unwrap_or_default();
                self.preview.lines = preview_content::highlight_text(
                    &file_name,
                    &text,
                    &self.syntax_set,
                    &self.syntax_theme,
                    self.settings.tab_width,
                );
                self.preview.loading = false;
            }
            (TextTarget::Preview, Err(e)) => {
                self.preview.loading = false;
                self.preview.note = Some(e);
            }
            (TextTarget::Caption, Ok(text)) => self.preview.caption = Some(text),
            (TextTarget::DirDescription, Ok(text)) => self.dir_description = Some(text),
            (target, Err(e)) => warn!(?target, error = %e, "description fetch failed"),
        }
    }

    pub fn scroll_preview_down(&mut self) {
        if self.preview.scroll + 1 < self.preview.lines.len() {
            self.preview.scroll += 1;
        }
    }

    pub fn scroll_preview_up(&mut self) {
        self.preview.scroll = self.preview.scroll.saturating_sub(1);
    }

    /// Metadata and media URL lines for the selected entry.
    pub fn info_lines(&self) -> Vec<Line<'static>> {
        match self.selected_entry() {
            Some(entry) => {
                let mut lines = preview_content::metadata_lines(entry);
                lines.extend(preview_content::media_lines(
                    entry,
                    &self.base,
                    &self.settings.media,
                ));
                lines
            }
            None => Vec::new(),
        }
    }

    // ── Modes ───────────────────────────────────────────────────────────────

    pub fn toggle_manage(&mut self) -> Vec<Command> {
        self.manage = !self.manage;
        let selected = self.selected_entry().map(|e| e.path().to_string());
        self.selected_index = 0;
        if let Some(path) = selected {
            if let Some(i) = self.visible_entries().iter().position(|e| e.path() == path) {
                self.selected_index = i;
            }
        }
        self.set_status_message(
            if self.manage {
                "Manage mode"
            } else {
                "Browse mode"
            }
            .to_string(),
        );
        self.selection_changed()
    }

    /// Switch between the dark and light palettes.
    pub fn toggle_theme(&mut self) {
        let next = if self.ui_state.theme_scheme() == "light" {
            "dark"
        } else {
            "light"
        };
        self.apply_theme_scheme(next);
    }

    fn apply_theme_scheme(&mut self, scheme: &str) {
        if self.ui_state.set_theme_scheme(scheme) {
            self.theme = resolve_scheme(scheme, self.custom_theme.as_ref());
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_scroll = 0;
        self.mode = if self.mode == AppMode::Help {
            AppMode::Normal
        } else {
            AppMode::Help
        };
    }

    pub fn scroll_help_down(&mut self, total_lines: usize) {
        if self.help_scroll + 1 < total_lines {
            self.help_scroll += 1;
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn dismiss_welcome(&mut self) {
        self.ui_state.dismiss_welcome();
        self.mode = AppMode::Normal;
    }

    /// Welcome screen content for the current listing.
    pub fn welcome_view(&self) -> Option<WelcomeView> {
        let welcome = self.listing.as_ref()?.welcome()?;
        let thumb = |file: &str| {
            (!file.is_empty()).then(|| {
                build_transform_url(
                    &self.base,
                    file,
                    TransformOp::thumbnail(AVATAR_SIZE, AVATAR_SIZE),
                )
            })
        };
        Some(WelcomeView {
            header: welcome.header.clone(),
            title: welcome.title.clone(),
            sub_title: welcome.sub_title.clone(),
            introduction: welcome.introduction.clone(),
            enter_text: if welcome.enter_text.is_empty() {
                "Enter".to_string()
            } else {
                welcome.enter_text.clone()
            },
            avatar_url: thumb(&welcome.avatar_image_file),
            background_url: (!welcome.background_image_file.is_empty())
                .then(|| self.base.url_for(&welcome.background_image_file)),
        })
    }

    // ── Filter ──────────────────────────────────────────────────────────────

    pub fn start_filter(&mut self) {
        self.mode = AppMode::Filter;
    }

    pub fn filter_push(&mut self, c: char) -> Vec<Command> {
        self.filter.push(c);
        self.selected_index = 0;
        self.selection_changed()
    }

    pub fn filter_pop(&mut self) -> Vec<Command> {
        self.filter.pop();
        self.selected_index = 0;
        self.selection_changed()
    }

    /// Keep the filter and return to the list.
    pub fn accept_filter(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn clear_filter(&mut self) -> Vec<Command> {
        self.mode = AppMode::Normal;
        if self.filter.is_empty() {
            return Vec::new();
        }
        let selected = self.selected_entry().map(|e| e.path().to_string());
        self.filter.clear();
        self.selected_index = selected
            .and_then(|p| self.visible_entries().iter().position(|e| e.path() == p))
            .unwrap_or(0);
        self.selection_changed()
    }

    // ── Viewer ──────────────────────────────────────────────────────────────

    /// Indices (into the visible list) of entries the viewer cycles through.
    fn viewer_indices(&self) -> Vec<usize> {
        self.visible_entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_dir())
            .map(|(i, _)| i)
            .collect()
    }

    fn viewer_step(&mut self, forward: bool) -> Vec<Command> {
        let indices = self.viewer_indices();
        if indices.is_empty() {
            return Vec::new();
        }
        let pos = indices.iter().position(|&i| i == self.selected_index);
        let next = match (pos, forward) {
            (Some(p), true) => indices[(p + 1) % indices.len()],
            (Some(p), false) => indices[(p + indices.len() - 1) % indices.len()],
            (None, _) => indices[0],
        };
        if next == self.selected_index {
            return Vec::new();
        }
        self.selected_index = next;
        self.selection_changed()
    }

    pub fn viewer_next(&mut self) -> Vec<Command> {
        self.viewer_step(true)
    }

    pub fn viewer_previous(&mut self) -> Vec<Command> {
        self.viewer_step(false)
    }

    pub fn toggle_viewer_info(&mut self) {
        self.show_viewer_info = !self.show_viewer_info;
    }

    pub fn close_viewer(&mut self) {
        self.mode = AppMode::Normal;
    }

    // ── Manage actions ──────────────────────────────────────────────────────

    pub fn request_create_dir(&mut self) {
        if self.manage {
            self.open_dialog(DialogKind::CreateDirectory);
        }
    }

    pub fn request_delete(&mut self) -> Vec<Command> {
        if !self.manage {
            return Vec::new();
        }
        let Some(entry) = self.selected_entry() else {
            return Vec::new();
        };
        let path = entry.path().to_string();
        let name = entry.file_name().to_string();
        if self.settings.confirm_delete {
            self.open_dialog(DialogKind::DeleteConfirm { path, name });
            Vec::new()
        } else {
            vec![Command::Delete { path }]
        }
    }

    pub fn request_download(&mut self) -> Vec<Command> {
        let Some(entry) = self.selected_entry() else {
            return Vec::new();
        };
        if entry.is_dir() {
            self.set_error_message("Only files can be downloaded".to_string());
            return Vec::new();
        }
        let command = Command::Download {
            path: entry.path().to_string(),
            file_name: entry.file_name().to_string(),
        };
        self.set_status_message(format!("Downloading {}...", entry.file_name()));
        vec![command]
    }

    /// Confirm the open dialog.
    pub fn confirm_dialog(&mut self) -> Vec<Command> {
        let AppMode::Dialog(kind) = self.mode.clone() else {
            return Vec::new();
        };
        match kind {
            DialogKind::CreateDirectory => {
                let input = self.dialog_state.input.clone();
                match validate_name(&input) {
                    Ok(name) => {
                        let path = join_path(&self.location.path, name);
                        self.pending_select = Some(path.clone());
                        self.close_dialog();
                        vec![Command::CreateDir { path }]
                    }
                    Err(e) => {
                        self.open_dialog(DialogKind::Error {
                            message: e.to_string(),
                        });
                        Vec::new()
                    }
                }
            }
            DialogKind::DeleteConfirm { path, .. } => {
                self.close_dialog();
                vec![Command::Delete { path }]
            }
            DialogKind::AddUpload => {
                let input = self.dialog_state.input.trim().to_string();
                self.mode = AppMode::Upload;
                self.dialog_state = DialogState::default();
                if let Err(e) = self.add_upload(Path::new(&input)) {
                    self.set_error_message(e.to_string());
                }
                Vec::new()
            }
            DialogKind::Error { .. } => {
                self.close_dialog();
                Vec::new()
            }
        }
    }

    /// Cancel the open dialog. Upload dialogs return to the upload panel.
    pub fn cancel_dialog(&mut self) {
        if self.mode == AppMode::Dialog(DialogKind::AddUpload) {
            self.mode = AppMode::Upload;
            self.dialog_state = DialogState::default();
        } else {
            self.close_dialog();
        }
    }

    pub fn handle_operation_complete(&mut self, op: OperationResult) -> Vec<Command> {
        match op.error {
            Some(error) => {
                self.pending_select = None;
                self.open_dialog(DialogKind::Error {
                    message: format!("{}: {}", op.summary, error),
                });
            }
            None => self.set_status_message(op.summary),
        }
        if !op.refresh {
            return Vec::new();
        }
        // A freshly created directory takes precedence over the old cursor.
        let created = self.pending_select.take();
        let commands = self.refresh();
        if created.is_some() {
            self.pending_select = created;
        }
        commands
    }

    // ── Uploads ─────────────────────────────────────────────────────────────

    pub fn open_upload_panel(&mut self) {
        if self.manage {
            self.mode = AppMode::Upload;
        }
    }

    pub fn close_upload_panel(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn request_add_upload(&mut self) {
        if !self.uploads.is_running() {
            self.open_dialog(DialogKind::AddUpload);
        }
    }

    /// Queue a local file. New files go to the front.
    pub fn add_upload(&mut self, source: &Path) -> Result<()> {
        if !source.is_file() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a file",
                source.display()
            )));
        }
        if self.uploads.add(source) {
            self.upload_selected = 0;
        }
        Ok(())
    }

    pub fn remove_selected_upload(&mut self) {
        if self.uploads.remove(self.upload_selected).is_some() {
            self.upload_selected = self
                .upload_selected
                .min(self.uploads.len().saturating_sub(1));
        }
    }

    pub fn clear_uploads(&mut self) {
        self.uploads.clear();
        self.upload_selected = 0;
    }

    pub fn upload_select_next(&mut self) {
        if self.upload_selected + 1 < self.uploads.len() {
            self.upload_selected += 1;
        }
    }

    pub fn upload_select_previous(&mut self) {
        self.upload_selected = self.upload_selected.saturating_sub(1);
    }

    pub fn start_upload(&mut self) -> Vec<Command> {
        match self.uploads.start() {
            Some(sources) => {
                info!(dir = %self.location.path, count = sources.len(), "starting upload");
                vec![Command::Upload {
                    dir: self.location.path.clone(),
                    sources,
                }]
            }
            None => Vec::new(),
        }
    }

    pub fn handle_upload_progress(
        &mut self,
        index: usize,
        status: UploadStatus,
        message: Option<String>,
    ) {
        self.uploads.set_status(index, status, message);
    }

    pub fn handle_upload_finished(&mut self) -> Vec<Command> {
        self.uploads.finish();
        let (ok, failed) = self.uploads.summary();
        if failed > 0 {
            self.set_error_message(format!("Uploaded {}, {} failed", ok, failed));
        } else {
            self.set_status_message(format!("Uploaded {} file(s)", ok));
        }
        self.refresh()
    }

    // ── Dialog input ────────────────────────────────────────────────────────

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    /// Insert a character at the current cursor position.
    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn dialog_delete_char(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(prev) = self.dialog_state.input[..pos].chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
            self.dialog_state
                .input
                .remove(self.dialog_state.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn dialog_move_cursor_left(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(prev) = self.dialog_state.input[..pos].chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn dialog_move_cursor_right(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(next) = self.dialog_state.input[pos..].chars().next() {
            self.dialog_state.cursor_position += next.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), false));
    }

    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), true));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created, _)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
