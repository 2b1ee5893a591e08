//! Location parsing, breadcrumbs and request tickets.

use std::sync::atomic::{AtomicU64, Ordering};

/// A remote directory location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Non-empty segments joined by `/`, no leading slash. Empty at the root.
    pub path: String,
    pub path_items: Vec<String>,
    /// `/` followed by all but the last segment.
    pub parent_path: String,
}

impl Location {
    pub fn parse(path: &str) -> Self {
        let path_items: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let parent = match path_items.split_last() {
            Some((_, rest)) => rest.join("/"),
            None => String::new(),
        };
        Self {
            path: path_items.join("/"),
            parent_path: format!("/{}", parent),
            path_items,
        }
    }

    pub fn is_root(&self) -> bool {
        self.path_items.is_empty()
    }

    pub fn parent(&self) -> Self {
        Self::parse(&self.parent_path)
    }

    /// Home crumb followed by one crumb per segment with its cumulative path.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            label: "/".to_string(),
            path: String::new(),
        }];
        let mut acc = Vec::with_capacity(self.path_items.len());
        for item in &self.path_items {
            acc.push(item.as_str());
            crumbs.push(Breadcrumb {
                label: item.clone(),
                path: acc.join("/"),
            });
        }
        crumbs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// Identifies one request; only the newest ticket of a [`Navigator`] is
/// current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavTicket(u64);

/// Issues monotonically increasing tickets.
#[derive(Debug, Default)]
pub struct Navigator {
    latest: AtomicU64,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn begin(&self) -> NavTicket {
        NavTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: NavTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
