//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--server`, `--prefix`, `--manage`, `--theme`, etc.)
//! 2. `--config <file>`
//! 3. `$WFS_CONFIG` environment variable (path to config file)
//! 4. Project-local `.wfs.toml` in the current working directory
//! 5. Global `~/.config/wfs/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::api::ApiBase;

// ── Section configs ──────────────────────────────────────────────────────────

/// Where the file server lives.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Scheme + host + port, e.g. `http://127.0.0.1:8000`.
    pub url: Option<String>,
    /// Route prefix of the file API, e.g. `/-`.
    pub prefix: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Start in manage mode (hidden files, delete/upload actions).
    pub manage: Option<bool>,
    /// Confirm before delete operations.
    pub confirm_delete: Option<bool>,
    /// Directory downloads are saved to.
    pub download_dir: Option<String>,
    /// Use nerd font icons (false = ASCII fallback).
    pub use_icons: Option<bool>,
}

/// Preview panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether the preview panel is enabled.
    pub enabled: Option<bool>,
    /// Text files larger than this (bytes) are not fetched for preview.
    pub max_text_bytes: Option<u64>,
    /// Tab rendering width.
    pub tab_width: Option<usize>,
    /// Syntax highlighting theme (syntect theme name).
    pub syntax_theme: Option<String>,
    /// Thumbnail size requested for image/video previews.
    pub thumbnail_width: Option<u32>,
    pub thumbnail_height: Option<u32>,
    /// Bounding box for full-size image views.
    pub view_width: Option<u32>,
    pub view_height: Option<u32>,
    /// Output format for transformed images (`jpeg`, `png`, ...).
    pub image_format: Option<String>,
    /// Video frame number used for posters.
    pub poster_frame: Option<u32>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub list_fg: Option<String>,
    pub list_selected_bg: Option<String>,
    pub list_selected_fg: Option<String>,
    pub list_dir_fg: Option<String>,
    pub list_hidden_fg: Option<String>,
    pub preview_fg: Option<String>,
    pub caption_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. `"info"` or `"webfs_tui=debug"`.
    pub level: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub general: GeneralConfig,
    pub preview: PreviewConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
/// The file API is mounted under `{basePath}/-/`.
pub const DEFAULT_API_PREFIX: &str = "/-";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default max text preview size (1 MiB).
pub const DEFAULT_MAX_TEXT_BYTES: u64 = 1_048_576;
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;
pub const DEFAULT_VIEW_WIDTH: u32 = 1920;
pub const DEFAULT_VIEW_HEIGHT: u32 = 1080;
pub const DEFAULT_TAB_WIDTH: usize = 4;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("WFS_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".wfs.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("wfs").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                url: other.server.url.clone().or(self.server.url),
                prefix: other.server.prefix.clone().or(self.server.prefix),
                timeout_secs: other.server.timeout_secs.or(self.server.timeout_secs),
            },
            general: GeneralConfig {
                manage: other.general.manage.or(self.general.manage),
                confirm_delete: other.general.confirm_delete.or(self.general.confirm_delete),
                download_dir: other
                    .general
                    .download_dir
                    .clone()
                    .or(self.general.download_dir),
                use_icons: other.general.use_icons.or(self.general.use_icons),
            },
            preview: PreviewConfig {
                enabled: other.preview.enabled.or(self.preview.enabled),
                max_text_bytes: other.preview.max_text_bytes.or(self.preview.max_text_bytes),
                tab_width: other.preview.tab_width.or(self.preview.tab_width),
                syntax_theme: other
                    .preview
                    .syntax_theme
                    .clone()
                    .or(self.preview.syntax_theme),
                thumbnail_width: other
                    .preview
                    .thumbnail_width
                    .or(self.preview.thumbnail_width),
                thumbnail_height: other
                    .preview
                    .thumbnail_height
                    .or(self.preview.thumbnail_height),
                view_width: other.preview.view_width.or(self.preview.view_width),
                view_height: other.preview.view_height.or(self.preview.view_height),
                image_format: other
                    .preview
                    .image_format
                    .clone()
                    .or(self.preview.image_format),
                poster_frame: other.preview.poster_frame.or(self.preview.poster_frame),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                file: other.log.file.clone().or(self.log.file),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn server_url(&self) -> &str {
        self.server.url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn api_prefix(&self) -> &str {
        self.server.prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX)
    }

    /// Base all request URLs are built from.
    pub fn api_base(&self) -> ApiBase {
        ApiBase::new(self.server_url(), self.api_prefix())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Whether to start in manage mode.
    pub fn manage(&self) -> bool {
        self.general.manage.unwrap_or(false)
    }

    /// Whether to confirm before delete.
    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    /// Target directory for downloads: configured, else the user's download
    /// directory, else the current directory.
    pub fn download_dir(&self) -> PathBuf {
        self.general
            .download_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Whether to use nerd font icons.
    pub fn use_icons(&self) -> bool {
        self.general.use_icons.unwrap_or(true)
    }

    /// Whether the preview panel is enabled.
    pub fn preview_enabled(&self) -> bool {
        self.preview.enabled.unwrap_or(true)
    }

    pub fn max_text_bytes(&self) -> u64 {
        self.preview.max_text_bytes.unwrap_or(DEFAULT_MAX_TEXT_BYTES)
    }

    pub fn tab_width(&self) -> usize {
        self.preview.tab_width.unwrap_or(DEFAULT_TAB_WIDTH)
    }

    /// Syntax highlighting theme name.
    pub fn syntax_theme_name(&self) -> &str {
        self.preview
            .syntax_theme
            .as_deref()
            .unwrap_or("base16-ocean.dark")
    }

    /// `(w, h)` requested for thumbnails and video posters.
    pub fn thumbnail_size(&self) -> (u32, u32) {
        (
            self.preview.thumbnail_width.unwrap_or(DEFAULT_THUMBNAIL_SIZE),
            self.preview.thumbnail_height.unwrap_or(DEFAULT_THUMBNAIL_SIZE),
        )
    }

    /// `(w, h)` bounding box for full-size image views.
    pub fn view_size(&self) -> (u32, u32) {
        (
            self.preview.view_width.unwrap_or(DEFAULT_VIEW_WIDTH),
            self.preview.view_height.unwrap_or(DEFAULT_VIEW_HEIGHT),
        )
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Log file: configured, else `<cache_dir>/wfs/wfs.log`, else `./wfs.log`.
    pub fn log_file(&self) -> PathBuf {
        self.log
            .file
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|d| d.join("wfs").join("wfs.log")))
            .unwrap_or_else(|| PathBuf::from("wfs.log"))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
