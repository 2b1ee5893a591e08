//! UI state shared between views: welcome dismissal and the active scheme.
//!
//! Cheap to clone; every clone observes the same values. Lives for one run
//! only and is never persisted.

use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
struct UiState {
    welcome_dismissed: bool,
    theme_scheme: String,
}

/// Handle to the shared UI state.
#[derive(Debug, Clone)]
pub struct SharedUiState {
    inner: Arc<RwLock<UiState>>,
}

impl SharedUiState {
    pub fn new(theme_scheme: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(UiState {
                welcome_dismissed: false,
                theme_scheme: theme_scheme.into(),
            })),
        }
    }

    pub fn welcome_dismissed(&self) -> bool {
        match self.inner.read() {
            Ok(state) => state.welcome_dismissed,
            Err(poisoned) => poisoned.into_inner().welcome_dismissed,
        }
    }

    pub fn dismiss_welcome(&self) {
        self.update(|state| state.welcome_dismissed = true);
    }

    pub fn theme_scheme(&self) -> String {
        match self.inner.read() {
            Ok(state) => state.theme_scheme.clone(),
            Err(poisoned) => poisoned.into_inner().theme_scheme.clone(),
        }
    }

    /// Switch scheme. Returns whether the value changed.
    pub fn set_theme_scheme(&self, scheme: &str) -> bool {
        let mut changed = false;
        self.update(|state| {
            if state.theme_scheme != scheme {
                state.theme_scheme = scheme.to_string();
                changed = true;
            }
        });
        changed
    }

    fn update(&self, f: impl FnOnce(&mut UiState)) {
        match self.inner.write() {
            Ok(mut state) => f(&mut state),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl Default for SharedUiState {
    fn default() -> Self {
        Self::new("dark")
    }
}
