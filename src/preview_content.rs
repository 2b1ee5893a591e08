use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::api::category::FileCategory;
use crate::api::entry::EnrichedFileEntry;
use crate::api::transform::{build_transform_url, Pipeline, TransformOp};
use crate::api::ApiBase;

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// What the preview asks the transform endpoint for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaOptions {
    pub thumbnail: (u32, u32),
    pub view: (u32, u32),
    /// Output format for image views and thumbnails; the server picks one
    /// from the mime type when unset.
    pub image_format: Option<String>,
    /// Video frame used for posters.
    pub poster_frame: Option<u32>,
}

impl MediaOptions {
    fn image_op(&self, op: TransformOp) -> TransformOp {
        match &self.image_format {
            Some(format) => op.with_format(format.as_str()),
            None => op,
        }
    }
}

/// Detect the syntax name for a remote file based on its extension.
pub fn detect_syntax_name(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "py" => "Python",
        "rs" => "Rust",
        "yaml" | "yml" => "YAML",
        "json" => "JSON",
        "toml" => "TOML",
        "sh" | "bash" | "zsh" => "Bash",
        "sql" => "SQL",
        "md" | "markdown" => "Markdown",
        "html" | "htm" => "HTML",
        "css" => "CSS",
        "js" | "jsx" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "c" | "h" => "C",
        "cpp" | "hpp" | "cc" => "C++",
        "java" => "Java",
        "go" => "Go",
        "rb" => "Ruby",
        _ => "Plain Text",
    }
}

/// Load a theme from the built-in theme set by name, with fallback.
pub fn load_theme(theme_name: Option<&str>) -> Theme {
    let mut ts = ThemeSet::load_defaults();
    let name = theme_name.unwrap_or(FALLBACK_THEME);
    ts.themes
        .remove(name)
        .or_else(|| ts.themes.remove(FALLBACK_THEME))
        .unwrap_or_default()
}

/// Convert syntect color to ratatui Color.
fn syntect_color_to_ratatui(c: syntect::highlighting::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Syntax-highlight fetched text, returning styled lines with a line-number
/// gutter.
pub fn highlight_text(
    file_name: &str,
    content: &str,
    ss: &SyntaxSet,
    theme: &Theme,
    tab_width: usize,
) -> Vec<Line<'static>> {
    let syntax = ss
        .find_syntax_by_name(detect_syntax_name(file_name))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    let mut highlighter = syntect::easy::HighlightLines::new(syntax, theme);
    let tab = " ".repeat(tab_width);
    let lines_text: Vec<String> = content.lines().map(|l| l.replace('\t', &tab)).collect();
    let line_num_width = lines_text.len().max(1).to_string().len();

    let mut result_lines = Vec::with_capacity(lines_text.len());
    for (i, line_str) in lines_text.iter().enumerate() {
        let mut spans: Vec<Span<'static>> = Vec::new();

        let num = format!("{:>width$} │ ", i + 1, width = line_num_width);
        spans.push(Span::styled(num, Style::default().fg(Color::DarkGray)));

        match highlighter.highlight_line(line_str, ss) {
            Ok(ranges) => {
                for (style, text) in ranges {
                    let fg = syntect_color_to_ratatui(style.foreground);
                    spans.push(Span::styled(text.to_string(), Style::default().fg(fg)));
                }
            }
            Err(_) => spans.push(Span::raw(line_str.clone())),
        }

        result_lines.push(Line::from(spans));
    }

    if result_lines.is_empty() {
        result_lines.push(Line::from(Span::styled(
            "(empty file)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    result_lines
}

/// Plain lines for a description caption.
pub fn caption_lines(text: &str, color: Color) -> Vec<Line<'static>> {
    text.lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(color))))
        .collect()
}

/// Format bytes into human-readable size string.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a Unix timestamp (seconds, UTC) as `YYYY-MM-DD HH:MM`.
pub fn format_mtime(secs: i64) -> String {
    if secs < 0 {
        return "Unknown".to_string();
    }
    let secs = secs as u64;
    let days = secs / 86400;
    let remaining = secs % 86400;
    let (year, month, day) = epoch_days_to_date(days);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        year,
        month,
        day,
        remaining / 3600,
        (remaining % 3600) / 60
    )
}

/// Convert days since Unix epoch to (year, month, day).
fn epoch_days_to_date(days: u64) -> (u64, u64, u64) {
    let mut remaining = days;
    let mut year = 1970u64;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining < days_in_year {
            break;
        }
        remaining -= days_in_year;
        year += 1;
    }

    let days_in_months: [u64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u64;
    for &dm in &days_in_months {
        if remaining < dm {
            break;
        }
        remaining -= dm;
        month += 1;
    }

    (year, month, remaining + 1)
}

fn is_leap_year(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn field(label: &str, value: String) -> Line<'static> {
    let label_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled(format!("  {}: ", label), label_style),
        Span::raw(value),
    ])
}

/// Metadata block for any entry.
pub fn metadata_lines(entry: &EnrichedFileEntry) -> Vec<Line<'static>> {
    let category = FileCategory::from(entry);
    let mut lines = vec![
        Line::from(""),
        field("Name", entry.file_name().to_string()),
        field("Path", format!("/{}", entry.path())),
        field("Type", category.label().to_string()),
    ];
    if entry.is_dir() {
        let raw = &entry.entry;
        if !raw.dirs.is_empty() || !raw.files.is_empty() {
            lines.push(field(
                "Items",
                format!("{} dirs, {} files", raw.dirs.len(), raw.files.len()),
            ));
        }
    } else {
        if !entry.mime_type().is_empty() {
            lines.push(field("Mime", entry.mime_type().to_string()));
        }
        lines.push(field("Size", format_size(entry.entry.size)));
    }
    lines.push(field("Modified", format_mtime(entry.entry.mtime)));
    lines
}

/// Transform URLs for image and video entries; empty for other categories.
pub fn media_lines(
    entry: &EnrichedFileEntry,
    base: &ApiBase,
    options: &MediaOptions,
) -> Vec<Line<'static>> {
    let (tw, th) = options.thumbnail;
    let (vw, vh) = options.view;
    match FileCategory::from(entry) {
        FileCategory::Image => vec![
            Line::from(""),
            field(
                "View",
                build_transform_url(base, entry, options.image_op(TransformOp::resize(vw, vh))),
            ),
            field(
                "Thumbnail",
                build_transform_url(base, entry, options.image_op(TransformOp::thumbnail(tw, th))),
            ),
            field("Original", entry.url.clone()),
        ],
        FileCategory::Video => vec![
            Line::from(""),
            field("Stream", entry.url.clone()),
            field(
                "Poster",
                build_transform_url(
                    base,
                    entry,
                    Pipeline::video_poster(tw, th, options.poster_frame),
                ),
            ),
        ],
        _ => Vec::new(),
    }
}
