//! # Conduit Testing
//!
//! Testing utilities and helpers for the Conduit reducer architecture.
//!
//! This crate provides:
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effects, including navigation commands
//! - Navigation keys backed by an in-memory history
//!
//! ## Example
//!
//! ```ignore
//! use conduit_testing::{ReducerTest, assertions, test_nav_key};
//!
//! let (_history, key) = test_nav_key("http://localhost/#/settings");
//!
//! ReducerTest::new(AppReducer)
//!     .with_env(test_environment())
//!     .given_state(AppState::Redirect(Session::Guest(key)))
//!     .when_action(AppAction::RouteChanged(Some(Route::Logout)))
//!     .then_effects(|effects| assertions::assert_has_future_effect(effects))
//!     .run();
//! ```

use conduit_core::navigation::{NavKey, Url};
use conduit_runtime::history::MemoryHistory;
use std::sync::Arc;


pub use reducer_test::{ReducerTest, assertions};

/// Test helpers and utilities
pub mod helpers {
    use super::{Arc, MemoryHistory, NavKey, Url};

    /// Create a navigation key backed by a fresh in-memory history at `url`
    ///
    /// # Panics
    ///
    /// Panics if `url` is not an absolute URL.
    #[must_use]
    #[allow(clippy::expect_used)] // Test helper
    pub fn test_nav_key(url: &str) -> (Arc<MemoryHistory>, NavKey) {
        let url = Url::parse(url).expect("test URL should be absolute");
        MemoryHistory::with_key(url)
    }

    /// Install a fmt subscriber filtered by `RUST_LOG`
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::{init_test_tracing, test_nav_key};

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::History;

    #[test]
    fn test_nav_key_drives_returned_history() {
        let (history, key) = test_nav_key("http://localhost/#/");

        let _ = key.history().push("#/login");

        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.current().fragment(), Some("/login"));
    }

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
