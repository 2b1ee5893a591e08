//! Wire types for the `?info` endpoint and the enriched listing built from them.

use serde::{Deserialize, Serialize};

/// Optional UI settings the server attaches to every info response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontendSettings {
    pub title: Option<String>,
    /// Theme scheme name, e.g. `"dark"` or `"light"`.
    pub theme: Option<String>,
    pub welcome: Option<WelcomeSettings>,
}

/// Welcome screen shown at the served root until dismissed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WelcomeSettings {
    pub enable: bool,
    pub header: String,
    pub background_image_file: String,
    pub avatar_image_file: String,
    pub title: String,
    pub sub_title: String,
    pub introduction: String,
    pub enter_text: String,
}

/// One node of a directory listing, as received from the file API.
///
/// Every field is defaulted so partially populated listings still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileEntry {
    /// Base name without extension.
    pub name: String,
    /// Full name including extension.
    pub file_name: String,
    /// Extension including the dot, e.g. `.txt`.
    pub file_ext: String,
    /// Slash-separated path relative to the served root.
    pub path: String,
    pub is_dir: bool,
    pub mime_type: String,
    pub size: u64,
    pub mtime: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend: Option<FrontendSettings>,
    #[serde(deserialize_with = "null_as_empty")]
    pub dirs: Vec<FileEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    pub files: Vec<FileEntry>,
}

/// Servers written against nil slices send `null` for empty child lists.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<FileEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<FileEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Link from an entry to the sibling `.txt` file that describes it
/// (`descFilePath` / `descFileUrl`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionLink {
    pub path: String,
    pub url: String,
}

/// A [`FileEntry`] with the fields derived by [`normalize`](super::normalize::normalize).
///
/// For the listing root, `dirs`/`files` hold the enriched children and
/// `entry.dirs`/`entry.files` are left empty. Children keep whatever raw
/// grandchildren the server sent in `entry` and have empty enriched lists.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedFileEntry {
    pub entry: FileEntry,
    pub url: String,
    pub view_hidden: bool,
    pub description: Option<DescriptionLink>,
    pub dirs: Vec<EnrichedFileEntry>,
    pub files: Vec<EnrichedFileEntry>,
}

impl EnrichedFileEntry {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn file_name(&self) -> &str {
        &self.entry.file_name
    }

    pub fn path(&self) -> &str {
        &self.entry.path
    }

    pub fn is_dir(&self) -> bool {
        self.entry.is_dir
    }

    pub fn mime_type(&self) -> &str {
        &self.entry.mime_type
    }

    /// Name shown in the list: the bare name normally, the full file name in
    /// manage mode. Falls back to the file name when the bare name is empty.
    pub fn display_name(&self, manage: bool) -> &str {
        if manage || self.entry.name.is_empty() {
            &self.entry.file_name
        } else {
            &self.entry.name
        }
    }

    /// Path of the description file, if one was linked.
    pub fn desc_file_path(&self) -> Option<&str> {
        self.description.as_ref().map(|d| d.path.as_str())
    }

    /// URL of the description file, if one was linked.
    pub fn desc_file_url(&self) -> Option<&str> {
        self.description.as_ref().map(|d| d.url.as_str())
    }

    /// Directories first, then files, in listing order.
    pub fn children(&self) -> impl Iterator<Item = &EnrichedFileEntry> {
        self.dirs.iter().chain(self.files.iter())
    }

    /// Welcome settings, if the server enabled a welcome screen.
    pub fn welcome(&self) -> Option<&WelcomeSettings> {
        self.entry.frontend.as_ref()?.welcome.as_ref()
    }
}
