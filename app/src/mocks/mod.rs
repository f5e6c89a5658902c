//! Fixtures and test doubles.
//!
//! Everything here is deterministic: one viewer (`alice`), one article
//! (`hello-world`), a fixed timestamp, and an [`MockApi`] that answers from
//! them without touching the network.

use crate::api::{CredentialStore, MemoryCredentialStore};
use crate::article::{Article, Author, Comment, Slug};
use crate::environment::AppEnvironment;
use crate::session::Session;
use crate::viewer::{Cred, Username, Viewer};
use chrono::{DateTime, Utc};
use conduit_core::NavKey;
use conduit_runtime::history::MemoryHistory;
use std::sync::Arc;
use url::Url;

mod api;

pub use api::MockApi;

/// Where fixture histories start
pub const START_URL: &str = "http://localhost:8000/";

/// The fixture viewer's email
pub const EMAIL: &str = "alice@example.com";

/// The fixture viewer's password
pub const PASSWORD: &str = "correct horse";

/// Token handed out by [`MockApi`]
pub const TOKEN: &str = "jwt.alice";

/// Build a username from a fixture literal
///
/// # Panics
///
/// Panics if `name` is empty.
#[must_use]
#[allow(clippy::expect_used)] // Fixture literals are never empty
pub fn username(name: &str) -> Username {
    Username::parse(name).expect("fixture usernames are not empty")
}

/// Build a slug from a fixture literal
///
/// # Panics
///
/// Panics if `slug` is empty.
#[must_use]
#[allow(clippy::expect_used)] // Fixture literals are never empty
pub fn slug(slug: &str) -> Slug {
    Slug::parse(slug).expect("fixture slugs are not empty")
}

/// The timestamp every fixture carries (2025-01-01 00:00:00 UTC)
///
/// # Panics
///
/// Never in practice; the literal is valid RFC 3339.
#[must_use]
#[allow(clippy::expect_used)]
pub fn timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
        .expect("hardcoded timestamp should always parse")
        .with_timezone(&Utc)
}

/// The signed-in fixture user, `alice`
#[must_use]
pub fn viewer() -> Viewer {
    Viewer::new(Cred::new(username("alice"), TOKEN.to_string()), None)
}

/// A session for [`viewer`]
#[must_use]
pub fn logged_in(key: NavKey) -> Session {
    Session::LoggedIn(key, viewer())
}

/// A profile nobody follows
#[must_use]
pub fn author(name: &str) -> Author {
    Author {
        username: username(name),
        bio: None,
        image: None,
        following: false,
    }
}

/// `hello-world`, written by `alice`
#[must_use]
pub fn article() -> Article {
    Article {
        slug: slug("hello-world"),
        title: "Hello, world".to_string(),
        description: "A first post".to_string(),
        body: "Conduit says hi.".to_string(),
        tag_list: vec!["rust".to_string()],
        created_at: timestamp(),
        favorited: false,
        favorites_count: 0,
        author: author("alice"),
    }
}

/// A comment by `bob`
#[must_use]
pub fn comment(id: i64, body: &str) -> Comment {
    Comment {
        id,
        created_at: timestamp(),
        body: body.to_string(),
        author: author("bob"),
    }
}

/// An environment over `api` and an empty in-memory credential store,
/// plus a history at [`START_URL`] and its navigation key
///
/// # Panics
///
/// Never in practice; [`START_URL`] is a valid URL.
#[must_use]
#[allow(clippy::expect_used)]
pub fn environment(api: MockApi) -> (AppEnvironment, Arc<MemoryHistory>, NavKey) {
    let credentials: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::default());
    let env = AppEnvironment::new(Arc::new(api), credentials);
    let start = Url::parse(START_URL).expect("fixture start URL should parse");
    let (history, key) = MemoryHistory::with_key(start);
    (env, history, key)
}
