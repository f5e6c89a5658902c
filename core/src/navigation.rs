//! URL navigation primitives.
//!
//! The runtime owns the browser history; reducers only ever see an opaque
//! [`NavKey`] handle to it and describe URL changes as [`Navigation`] values
//! inside [`Effect::Navigate`](crate::effect::Effect::Navigate).
//!
//! # Example
//!
//! ```
//! use conduit_core::navigation::{UrlRequest, Url};
//!
//! let current = Url::parse("http://localhost:8000/#/").unwrap();
//!
//! let request = UrlRequest::classify(&current, "#/login").unwrap();
//! assert!(matches!(request, UrlRequest::Internal(ref url) if url.fragment() == Some("/login")));
//!
//! let request = UrlRequest::classify(&current, "https://github.com").unwrap();
//! assert!(matches!(request, UrlRequest::External(_)));
//! ```

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use url::Url;

/// Errors produced while resolving or applying a navigation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The href could not be resolved against the current URL
    #[error("Invalid href '{href}': {reason}")]
    InvalidHref {
        /// The offending href
        href: String,
        /// Why it failed to resolve
        reason: String,
    },
}

/// Browser history capability
///
/// Implemented by the imperative shell (an in-memory stack, a WASM binding to
/// `window.history`, ...). Reducers never call it directly.
pub trait History: Send + Sync {
    /// The URL currently displayed
    fn current(&self) -> Url;

    /// Resolve `href` against the current URL and push it as a new entry
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::InvalidHref`] if `href` cannot be resolved.
    fn push(&self, href: &str) -> Result<Url, NavigationError>;

    /// Resolve `href` against the current URL and replace the current entry
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::InvalidHref`] if `href` cannot be resolved.
    fn replace(&self, href: &str) -> Result<Url, NavigationError>;

    /// Leave the application and load `href` as a full page
    fn load(&self, href: &str);
}

/// Opaque navigation handle
///
/// Cloning a key yields another handle to the same history. Two keys are equal
/// when they point at the same history.
#[derive(Clone)]
pub struct NavKey(Arc<dyn History>);

impl NavKey {
    /// Wrap a history implementation
    #[must_use]
    pub fn new(history: Arc<dyn History>) -> Self {
        Self(history)
    }

    /// The history this key drives
    #[must_use]
    pub fn history(&self) -> &dyn History {
        self.0.as_ref()
    }
}

impl PartialEq for NavKey {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Eq for NavKey {}

impl fmt::Debug for NavKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavKey").finish_non_exhaustive()
    }
}

/// A URL change requested by a reducer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Add a history entry (the back button returns here)
    Push {
        /// History to drive
        key: NavKey,
        /// Target, resolved against the current URL
        href: String,
    },
    /// Overwrite the current history entry
    Replace {
        /// History to drive
        key: NavKey,
        /// Target, resolved against the current URL
        href: String,
    },
    /// Full page load, leaving the application
    Load {
        /// History to drive
        key: NavKey,
        /// Target URL
        href: String,
    },
}

impl Navigation {
    /// The target of this navigation
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Self::Push { href, .. } | Self::Replace { href, .. } | Self::Load { href, .. } => href,
        }
    }

    /// The navigation handle this command drives
    #[must_use]
    pub const fn key(&self) -> &NavKey {
        match self {
            Self::Push { key, .. } | Self::Replace { key, .. } | Self::Load { key, .. } => key,
        }
    }
}

/// A link activation, as reported by the host
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlRequest {
    /// Same-origin link, stays inside the application
    Internal(Url),
    /// Link to another origin
    External(String),
}

impl UrlRequest {
    /// Classify an `href` clicked while `current` is displayed
    ///
    /// The href is resolved against `current`; a same-origin result is
    /// internal. An empty href resolves to the current document without its
    /// fragment.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::InvalidHref`] if `href` cannot be resolved.
    pub fn classify(current: &Url, href: &str) -> Result<Self, NavigationError> {
        let resolved = current.join(href).map_err(|e| NavigationError::InvalidHref {
            href: href.to_string(),
            reason: e.to_string(),
        })?;

        if resolved.origin() == current.origin() {
            Ok(Self::Internal(resolved))
        } else {
            Ok(Self::External(href.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHistory(Url);

    impl History for FixedHistory {
        fn current(&self) -> Url {
            self.0.clone()
        }

        fn push(&self, href: &str) -> Result<Url, NavigationError> {
            self.replace(href)
        }

        fn replace(&self, href: &str) -> Result<Url, NavigationError> {
            self.0.join(href).map_err(|e| NavigationError::InvalidHref {
                href: href.to_string(),
                reason: e.to_string(),
            })
        }

        fn load(&self, _href: &str) {}
    }

    fn url(s: &str) -> Url {
        #[allow(clippy::unwrap_used)]
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_nav_key_equality_is_identity() {
        let history: Arc<dyn History> = Arc::new(FixedHistory(url("http://localhost/")));
        let a = NavKey::new(Arc::clone(&history));
        let b = a.clone();
        let c = NavKey::new(Arc::new(FixedHistory(url("http://localhost/"))));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_classify_empty_href_drops_fragment() {
        let current = url("http://localhost/#/settings");
        let request = UrlRequest::classify(&current, "");

        assert_eq!(request, Ok(UrlRequest::Internal(url("http://localhost/"))));
    }

    #[test]
    fn test_classify_fragment_href_is_internal() {
        let current = url("http://localhost/#/");
        let request = UrlRequest::classify(&current, "#/article/hello");

        assert_eq!(
            request,
            Ok(UrlRequest::Internal(url("http://localhost/#/article/hello")))
        );
    }

    #[test]
    fn test_classify_other_origin_is_external() {
        let current = url("http://localhost/#/");
        let request = UrlRequest::classify(&current, "https://thinkster.io");

        assert_eq!(
            request,
            Ok(UrlRequest::External("https://thinkster.io".to_string()))
        );
    }

    #[test]
    fn test_navigation_accessors() {
        let key = NavKey::new(Arc::new(FixedHistory(url("http://localhost/"))));
        let navigation = Navigation::Replace {
            key: key.clone(),
            href: "#/".to_string(),
        };

        assert_eq!(navigation.href(), "#/");
        assert_eq!(navigation.key(), &key);
    }
}
