use super::entry::{EnrichedFileEntry, FileEntry};

/// Viewer category of an entry, derived from its mime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Folder,
    Image,
    Video,
    Text,
    Generic,
}

impl FileCategory {
    /// Map `(is_dir, mime)` onto a category. Directories win over any mime.
    pub fn classify(is_dir: bool, mime: &str) -> Self {
        if is_dir {
            FileCategory::Folder
        } else if mime.starts_with("image/") {
            FileCategory::Image
        } else if mime.starts_with("video/") {
            FileCategory::Video
        } else if mime.starts_with("text/") {
            FileCategory::Text
        } else {
            FileCategory::Generic
        }
    }

    pub fn of(entry: &FileEntry) -> Self {
        Self::classify(entry.is_dir, &entry.mime_type)
    }

    pub fn label(self) -> &'static str {
        match self {
            FileCategory::Folder => "Folder",
            FileCategory::Image => "Image",
            FileCategory::Video => "Video",
            FileCategory::Text => "Text",
            FileCategory::Generic => "File",
        }
    }

    /// Nerd Font glyph, or an ASCII tag when icons are disabled.
    pub fn icon(self, use_icons: bool) -> &'static str {
        if use_icons {
            match self {
                FileCategory::Folder => " ",
                FileCategory::Image => " ",
                FileCategory::Video => " ",
                FileCategory::Text => " ",
                FileCategory::Generic => " ",
            }
        } else {
            match self {
                FileCategory::Folder => "[D] ",
                FileCategory::Image => "[I] ",
                FileCategory::Video => "[V] ",
                FileCategory::Text => "[T] ",
                FileCategory::Generic => "[F] ",
            }
        }
    }
}

impl From<&EnrichedFileEntry> for FileCategory {
    fn from(entry: &EnrichedFileEntry) -> Self {
        FileCategory::of(&entry.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_mime_prefix() {
        assert_eq!(FileCategory::classify(false, "image/png"), FileCategory::Image);
        assert_eq!(FileCategory::classify(false, "video/mp4"), FileCategory::Video);
        assert_eq!(
            FileCategory::classify(false, "text/plain; charset=utf-8"),
            FileCategory::Text
        );
        assert_eq!(
            FileCategory::classify(false, "application/pdf"),
            FileCategory::Generic
        );
        assert_eq!(FileCategory::classify(false, ""), FileCategory::Generic);
    }

    #[test]
    fn directories_are_folders_regardless_of_mime() {
        assert_eq!(FileCategory::classify(true, "image/png"), FileCategory::Folder);
        assert_eq!(FileCategory::classify(true, ""), FileCategory::Folder);
    }

    #[test]
    fn ascii_icons_are_distinct() {
        let all = [
            FileCategory::Folder,
            FileCategory::Image,
            FileCategory::Video,
            FileCategory::Text,
            FileCategory::Generic,
        ];
        let mut icons: Vec<&str> = all.iter().map(|c| c.icon(false)).collect();
        icons.sort();
        icons.dedup();
        assert_eq!(icons.len(), all.len());
    }
}
