//! Enrich a raw `?info` listing with display URLs, hidden flags and
//! description links.
//!
//! A description file is a sibling `.txt` whose bare name is `"." + <name>`
//! of the entry it annotates: `.a.txt` describes `a.jpg`, `.docs.txt` inside
//! `docs/` describes the directory itself.
//!
//! Linking policy: description files are visited in listing order. Each one
//! links to the first candidate in `dirs ++ files` order whose name matches,
//! never to itself. An entry that already has a description keeps it, so the
//! first description file in listing order wins. Only immediate children are
//! considered.

use tracing::trace;

use super::entry::{DescriptionLink, EnrichedFileEntry, FileEntry};
use super::ApiBase;

/// Extension that marks a candidate description file.
pub const DESCRIPTION_EXT: &str = ".txt";

/// Display URL for an entry. Files carry `mtime` so an overwritten file gets a
/// new URL; directory listings are always fetched fresh and carry no token.
pub fn entry_url(base: &ApiBase, entry: &FileEntry) -> String {
    if entry.is_dir {
        base.url_for(&entry.path)
    } else {
        format!("{}?mtime={}", base.url_for(&entry.path), entry.mtime)
    }
}

/// Whether an entry is hidden from browse mode (dot-file).
pub fn is_hidden(entry: &FileEntry) -> bool {
    entry.file_name.starts_with('.')
}

fn enrich_child(base: &ApiBase, entry: FileEntry) -> EnrichedFileEntry {
    EnrichedFileEntry {
        url: entry_url(base, &entry),
        view_hidden: is_hidden(&entry),
        description: None,
        dirs: Vec::new(),
        files: Vec::new(),
        entry,
    }
}

/// Whether `desc` names `target` as the entry it describes.
fn describes(desc: &FileEntry, target_name: &str) -> bool {
    desc.name.strip_prefix('.') == Some(target_name)
}

/// Normalize one directory (or single file) listing. Pure; never fails.
pub fn normalize(mut raw: FileEntry, base: &ApiBase) -> EnrichedFileEntry {
    let raw_dirs = std::mem::take(&mut raw.dirs);
    let raw_files = std::mem::take(&mut raw.files);

    let mut dirs: Vec<EnrichedFileEntry> =
        raw_dirs.into_iter().map(|d| enrich_child(base, d)).collect();
    let mut files: Vec<EnrichedFileEntry> =
        raw_files.into_iter().map(|f| enrich_child(base, f)).collect();

    let mut root_description = None;

    // (index into files, link) pairs resolved against a snapshot so that the
    // borrow of `files` while scanning does not overlap the assignment.
    let descriptions: Vec<(usize, DescriptionLink)> = files
        .iter()
        .enumerate()
        .filter(|(_, f)| f.entry.file_ext == DESCRIPTION_EXT)
        .map(|(i, f)| {
            (
                i,
                DescriptionLink {
                    path: f.entry.path.clone(),
                    url: f.url.clone(),
                },
            )
        })
        .collect();

    for (desc_index, link) in descriptions {
        let desc_entry = files[desc_index].entry.clone();

        if describes(&desc_entry, &raw.name) {
            if root_description.is_none() {
                trace!(desc = %link.path, "linked directory description");
                root_description = Some(link);
            }
            continue;
        }

        let dir_match = dirs
            .iter()
            .position(|d| describes(&desc_entry, &d.entry.name));
        if let Some(i) = dir_match {
            if dirs[i].description.is_none() {
                trace!(desc = %link.path, target = %dirs[i].entry.path, "linked description");
                dirs[i].description = Some(link);
            }
            continue;
        }

        let file_match = files
            .iter()
            .enumerate()
            .position(|(i, f)| i != desc_index && describes(&desc_entry, &f.entry.name));
        if let Some(i) = file_match {
            if files[i].description.is_none() {
                trace!(desc = %link.path, target = %files[i].entry.path, "linked description");
                files[i].description = Some(link);
            }
        }
    }

    EnrichedFileEntry {
        url: entry_url(base, &raw),
        // The listing root is always shown.
        view_hidden: false,
        description: root_description,
        dirs,
        files,
        entry: raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ApiBase {
        ApiBase::new("http://h", "-")
    }

    fn file(dir: &str, file_name: &str, mtime: i64) -> FileEntry {
        let (name, ext) = match file_name.rfind('.') {
            Some(i) if i > 0 => (&file_name[..i], &file_name[i..]),
            _ => (file_name, ""),
        };
        let path = if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", dir, file_name)
        };
        FileEntry {
            name: name.to_string(),
            file_name: file_name.to_string(),
            file_ext: ext.to_string(),
            path,
            is_dir: false,
            mime_type: "text/plain".into(),
            size: 1,
            mtime,
            ..Default::default()
        }
    }

    fn dir(parent: &str, name: &str) -> FileEntry {
        let path = if parent.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", parent, name)
        };
        FileEntry {
            name: name.to_string(),
            file_name: name.to_string(),
            path,
            is_dir: true,
            ..Default::default()
        }
    }

    fn listing(name: &str, dirs: Vec<FileEntry>, files: Vec<FileEntry>) -> FileEntry {
        FileEntry {
            dirs,
            files,
            ..dir("", name)
        }
    }

    #[test]
    fn file_urls_carry_mtime_and_dir_urls_do_not() {
        let raw = listing("docs", vec![dir("docs", "sub")], vec![file("docs", "a.txt", 100)]);
        let out = normalize(raw, &base());
        assert_eq!(out.url, "http://h/-/docs");
        assert_eq!(out.dirs[0].url, "http://h/-/docs/sub");
        assert_eq!(out.files[0].url, "http://h/-/docs/a.txt?mtime=100");
    }

    #[test]
    fn changing_mtime_changes_url() {
        let a = normalize(listing("d", vec![], vec![file("d", "x.png", 1)]), &base());
        let b = normalize(listing("d", vec![], vec![file("d", "x.png", 2)]), &base());
        assert_ne!(a.files[0].url, b.files[0].url);
    }

    #[test]
    fn urls_are_unique_per_path() {
        let raw = listing(
            "d",
            vec![dir("d", "x")],
            vec![file("d", "a.png", 5), file("d", "b.png", 5)],
        );
        let out = normalize(raw, &base());
        let mut urls: Vec<&str> = out.children().map(|e| e.url.as_str()).collect();
        let before = urls.len();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), before);
    }

    #[test]
    fn view_hidden_follows_leading_dot() {
        let raw = listing(
            "d",
            vec![dir("d", ".git")],
            vec![file("d", ".env", 1), file("d", "main.rs", 1)],
        );
        let out = normalize(raw, &base());
        assert!(out.dirs[0].view_hidden);
        assert!(out.files[0].view_hidden);
        assert!(!out.files[1].view_hidden);
    }

    #[test]
    fn root_is_never_hidden() {
        let raw = listing(".config", vec![], vec![]);
        let out = normalize(raw, &base());
        assert!(!out.view_hidden);
    }

    #[test]
    fn dot_txt_describes_sibling_file_not_the_reverse() {
        let raw = listing("d", vec![], vec![file("d", "a.txt", 1), file("d", ".a.txt", 2)]);
        let out = normalize(raw, &base());
        let a = &out.files[0];
        let dot_a = &out.files[1];
        assert_eq!(a.desc_file_path(), Some("d/.a.txt"));
        assert_eq!(a.desc_file_url(), Some("http://h/-/d/.a.txt?mtime=2"));
        assert!(dot_a.description.is_none());
    }

    #[test]
    fn directory_describes_itself() {
        let raw = listing("docs", vec![], vec![file("docs", ".docs.txt", 7)]);
        let out = normalize(raw, &base());
        assert_eq!(out.desc_file_path(), Some("docs/.docs.txt"));
        assert_eq!(out.desc_file_url(), Some("http://h/-/docs/.docs.txt?mtime=7"));
    }

    #[test]
    fn root_description_is_not_reused_for_children() {
        let raw = listing(
            "docs",
            vec![dir("docs", "docs")],
            vec![file("docs", ".docs.txt", 7)],
        );
        let out = normalize(raw, &base());
        assert!(out.description.is_some());
        assert!(out.dirs[0].description.is_none());
    }

    #[test]
    fn directories_win_over_files_with_same_name() {
        let raw = listing(
            "d",
            vec![dir("d", "trip")],
            vec![file("d", "trip.jpg", 1), file("d", ".trip.txt", 2)],
        );
        let out = normalize(raw, &base());
        assert_eq!(out.dirs[0].desc_file_path(), Some("d/.trip.txt"));
        assert!(out.files[0].description.is_none());
    }

    #[test]
    fn first_description_in_listing_order_wins() {
        let mut second = file("d", ".a.txt", 9);
        second.file_name = ".a.hash.txt".into();
        second.path = "d/.a.hash.txt".into();
        let raw = listing(
            "d",
            vec![],
            vec![file("d", "a.jpg", 1), file("d", ".a.txt", 2), second],
        );
        let out = normalize(raw, &base());
        assert_eq!(out.files[0].desc_file_path(), Some("d/.a.txt"));
    }

    #[test]
    fn non_txt_files_are_not_descriptions() {
        let raw = listing("d", vec![], vec![file("d", "a.jpg", 1), file("d", ".a.md", 2)]);
        let out = normalize(raw, &base());
        assert!(out.files[0].description.is_none());
    }

    #[test]
    fn unmatched_description_is_ignored() {
        let raw = listing("d", vec![], vec![file("d", ".ghost.txt", 1)]);
        let out = normalize(raw, &base());
        assert!(out.description.is_none());
        assert!(out.files[0].description.is_none());
    }

    #[test]
    fn grandchildren_stay_raw() {
        let mut sub = dir("d", "sub");
        sub.files.push(file("d/sub", "deep.txt", 1));
        let raw = listing("d", vec![sub], vec![]);
        let out = normalize(raw, &base());
        assert!(out.dirs[0].dirs.is_empty());
        assert!(out.dirs[0].files.is_empty());
        assert_eq!(out.dirs[0].entry.files.len(), 1);
        assert!(out.entry.dirs.is_empty());
    }

    #[test]
    fn single_file_listing_gets_file_url() {
        let raw = file("docs", "a.txt", 100);
        let out = normalize(raw, &base());
        assert_eq!(out.url, "http://h/-/docs/a.txt?mtime=100");
        assert!(out.dirs.is_empty() && out.files.is_empty());
    }

    #[test]
    fn end_to_end_docs_listing() {
        let json = r#"{"name":"docs","isDir":true,"path":"docs","dirs":[],
            "files":[{"name":"a","fileName":"a.txt","fileExt":".txt","path":"docs/a.txt","mtime":100}]}"#;
        let raw: FileEntry = serde_json::from_str(json).unwrap();
        let out = normalize(raw, &base());
        assert_eq!(out.files[0].url, "http://h/-/docs/a.txt?mtime=100");
        assert!(!out.files[0].view_hidden);
    }
}
