//! Client side of the webfs file API.
//!
//! - [`entry`]: wire types for `?info` listings and their enriched form
//! - [`normalize`]: derives display URLs, hidden flags and description links
//! - [`transform`]: builds `?t=` transform URLs for thumbnails and posters
//! - [`category`]: maps mime types onto the fixed set of viewer categories
//! - [`client`]: the [`FileApi`](client::FileApi) trait and its HTTP implementation

pub mod category;
pub mod client;
pub mod entry;
pub mod normalize;
pub mod transform;

use reqwest::Url;

use crate::error::{AppError, Result};

/// Root under which every served path is addressed, e.g. `http://host:8000/-`.
///
/// Stored without a trailing slash so that `url_for("a/b")` always yields
/// exactly `prefix + "/" + path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    prefix: String,
}

impl ApiBase {
    /// Join a server URL and a route prefix (`"http://host:8000"` + `"/-"`).
    pub fn new(server: &str, prefix: &str) -> Self {
        let server = server.trim_end_matches('/');
        let prefix = prefix.trim_matches('/');
        let joined = if prefix.is_empty() {
            server.to_string()
        } else {
            format!("{}/{}", server, prefix)
        };
        Self { prefix: joined }
    }

    /// The prefix itself, without trailing slash.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// URL for a served path. Leading slashes on `path` are ignored.
    ///
    /// This is the display form; names are not escaped. Requests go through
    /// [`request_url`](Self::request_url) or [`resolve_url`](Self::resolve_url).
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.prefix, path.trim_start_matches('/'))
    }

    /// Request URL for a served path with every segment percent-encoded, so
    /// `#`, `?` and `%` in names stay part of the path.
    pub fn request_url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.prefix)
            .map_err(|e| AppError::InvalidPath(format!("{}: {}", self.prefix, e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::InvalidPath(self.prefix.clone()))?;
            segments.pop_if_empty();
            let mut any = false;
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
                any = true;
            }
            if !any {
                segments.push("");
            }
        }
        Ok(url)
    }

    /// Request URL for a display URL built by [`url_for`](Self::url_for),
    /// optionally followed by the `?mtime=` or `?t=` query this crate appends.
    /// URLs outside the prefix are parsed as they are.
    pub fn resolve_url(&self, display: &str) -> Result<Url> {
        let Some(rest) = display
            .strip_prefix(self.prefix.as_str())
            .and_then(|r| r.strip_prefix('/'))
        else {
            return Url::parse(display)
                .map_err(|e| AppError::InvalidPath(format!("{}: {}", display, e)));
        };
        let (path, query) = match rest.rsplit_once('?') {
            Some((path, query)) if query.starts_with("mtime=") || query.starts_with("t=") => {
                (path, Some(query))
            }
            _ => (rest, None),
        };
        let mut url = self.request_url(path)?;
        url.set_query(query);
        Ok(url)
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SERVER_URL, crate::config::DEFAULT_API_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_server_and_prefix() {
        let base = ApiBase::new("http://localhost:8000/", "/-/");
        assert_eq!(base.prefix(), "http://localhost:8000/-");
    }

    #[test]
    fn empty_prefix_uses_server_only() {
        let base = ApiBase::new("http://localhost:8000", "");
        assert_eq!(base.prefix(), "http://localhost:8000");
        assert_eq!(base.url_for("a.txt"), "http://localhost:8000/a.txt");
    }

    #[test]
    fn url_for_strips_leading_slash() {
        let base = ApiBase::new("http://h", "-");
        assert_eq!(base.url_for("/docs/a.txt"), "http://h/-/docs/a.txt");
        assert_eq!(base.url_for("docs/a.txt"), "http://h/-/docs/a.txt");
    }

    #[test]
    fn url_for_root_is_prefix_with_slash() {
        let base = ApiBase::new("http://h", "-");
        assert_eq!(base.url_for(""), "http://h/-/");
    }

    #[test]
    fn request_url_escapes_reserved_characters_in_names() {
        let base = ApiBase::new("http://h", "-");
        let url = base.request_url("photos#2024/a?b%c d.txt").unwrap();
        assert_eq!(url.path(), "/-/photos%232024/a%3Fb%25c%20d.txt");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn request_url_root_keeps_trailing_slash() {
        let base = ApiBase::new("http://h", "-");
        assert_eq!(base.request_url("").unwrap().as_str(), "http://h/-/");
        assert_eq!(base.request_url("/").unwrap().as_str(), "http://h/-/");
        let bare = ApiBase::new("http://h", "");
        assert_eq!(bare.request_url("a").unwrap().as_str(), "http://h/a");
    }

    #[test]
    fn resolve_url_escapes_path_and_keeps_query() {
        let base = ApiBase::new("http://h", "-");
        let display = format!("{}?mtime=5", base.url_for("notes #1/.a?.txt"));
        let url = base.resolve_url(&display).unwrap();
        assert_eq!(url.path(), "/-/notes%20%231/.a%3F.txt");
        assert_eq!(url.query(), Some("mtime=5"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn resolve_url_without_query() {
        let base = ApiBase::new("http://h", "-");
        let url = base.resolve_url(&base.url_for("x?y")).unwrap();
        assert_eq!(url.path(), "/-/x%3Fy");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn resolve_url_passes_foreign_urls_through() {
        let base = ApiBase::new("http://h", "-");
        let url = base.resolve_url("http://other/pic.png?x=1").unwrap();
        assert_eq!(url.as_str(), "http://other/pic.png?x=1");
    }
}
