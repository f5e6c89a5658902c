//! In-memory browser history.
//!
//! [`MemoryHistory`] behaves like `window.history` for a single tab: a stack
//! of entries with a cursor. Pushing truncates forward entries; replacing
//! overwrites the entry under the cursor. Full page loads are recorded but do
//! not change the stack.

use conduit_core::navigation::{History, NavKey, NavigationError, Url};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
struct Entries {
    stack: Vec<Url>,
    cursor: usize,
}

/// History stack kept in memory
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Mutex<Entries>,
    loads: Mutex<Vec<String>>,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial`
    #[must_use]
    pub fn new(initial: Url) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![initial],
                cursor: 0,
            }),
            loads: Mutex::new(Vec::new()),
        }
    }

    /// Create a history and a navigation key for it
    #[must_use]
    pub fn with_key(initial: Url) -> (Arc<Self>, NavKey) {
        let history = Arc::new(Self::new(initial));
        let key = NavKey::new(Arc::clone(&history) as Arc<dyn History>);
        (history, key)
    }

    /// Move the cursor back one entry, returning the URL now displayed
    pub fn back(&self) -> Option<Url> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.cursor == 0 {
            return None;
        }
        entries.cursor -= 1;
        Some(entries.stack[entries.cursor].clone())
    }

    /// Move the cursor forward one entry, returning the URL now displayed
    pub fn forward(&self) -> Option<Url> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.cursor + 1 >= entries.stack.len() {
            return None;
        }
        entries.cursor += 1;
        Some(entries.stack[entries.cursor].clone())
    }

    /// Every entry in the stack, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<Url> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stack
            .clone()
    }

    /// Every href passed to [`History::load`]
    #[must_use]
    pub fn loads(&self) -> Vec<String> {
        self.loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn resolve(current: &Url, href: &str) -> Result<Url, NavigationError> {
        current.join(href).map_err(|e| NavigationError::InvalidHref {
            href: href.to_string(),
            reason: e.to_string(),
        })
    }
}

impl History for MemoryHistory {
    fn current(&self) -> Url {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.stack[entries.cursor].clone()
    }

    fn push(&self, href: &str) -> Result<Url, NavigationError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let url = Self::resolve(&entries.stack[entries.cursor], href)?;

        let cursor = entries.cursor;
        entries.stack.truncate(cursor + 1);
        entries.stack.push(url.clone());
        entries.cursor += 1;

        tracing::trace!(url = %url, "history push");
        Ok(url)
    }

    fn replace(&self, href: &str) -> Result<Url, NavigationError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let cursor = entries.cursor;
        let url = Self::resolve(&entries.stack[cursor], href)?;

        entries.stack[cursor] = url.clone();

        tracing::trace!(url = %url, "history replace");
        Ok(url)
    }

    fn load(&self, href: &str) {
        tracing::trace!(href, "history load");
        self.loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(href.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        #[allow(clippy::unwrap_used)]
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_push_resolves_fragment_against_current() {
        let history = MemoryHistory::new(url("http://localhost:8000/#/"));

        let pushed = history.push("#/login");

        assert_eq!(pushed, Ok(url("http://localhost:8000/#/login")));
        assert_eq!(history.current(), url("http://localhost:8000/#/login"));
        assert_eq!(history.entries().len(), 2);
    }

    #[test]
    fn test_replace_overwrites_current_entry() {
        let history = MemoryHistory::new(url("http://localhost/"));

        let _ = history.replace("#/");

        assert_eq!(history.entries(), vec![url("http://localhost/#/")]);
    }

    #[test]
    fn test_push_after_back_truncates_forward_entries() {
        let history = MemoryHistory::new(url("http://localhost/#/"));
        let _ = history.push("#/login");
        let _ = history.push("#/register");

        assert_eq!(history.back(), Some(url("http://localhost/#/login")));
        let _ = history.push("#/settings");

        assert_eq!(
            history.entries(),
            vec![
                url("http://localhost/#/"),
                url("http://localhost/#/login"),
                url("http://localhost/#/settings"),
            ]
        );
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_back_at_start_is_none() {
        let history = MemoryHistory::new(url("http://localhost/"));
        assert_eq!(history.back(), None);
    }

    #[test]
    fn test_load_is_recorded_without_touching_stack() {
        let history = MemoryHistory::new(url("http://localhost/"));

        history.load("https://github.com/gothinkster/realworld");

        assert_eq!(
            history.loads(),
            vec!["https://github.com/gothinkster/realworld".to_string()]
        );
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn test_with_key_drives_same_history() {
        let (history, key) = MemoryHistory::with_key(url("http://localhost/"));

        let _ = key.history().push("#/editor");

        assert_eq!(history.current(), url("http://localhost/#/editor"));
    }
}
