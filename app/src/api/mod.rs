//! Collaborators the pages talk to: the RealWorld API and the credential store.
//!
//! Both are traits so reducers can be driven by mocks in tests. Methods
//! return boxed futures so the environment can hold them as trait objects
//! (`Arc<dyn Api>`, `Arc<dyn CredentialStore>`).

use crate::article::{Article, ArticleDraft, Author, Comment, Slug};
use crate::error::ApiError;
use crate::viewer::{Cred, Username, Viewer};
use conduit_core::Effect;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Credential persistence
pub mod credentials;

/// `reqwest` implementation of [`Api`]
pub mod http;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use http::HttpApi;

/// Future returned by [`Api`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Which list of articles to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    /// Articles by authors the viewer follows
    Following,
    /// Every article
    Global,
    /// Articles with a tag
    Tag(String),
    /// Articles written by a user
    Author(Username),
    /// Articles a user favorited
    FavoritedBy(Username),
}

/// The signed-in user's account as the settings form shows it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    /// Email address
    pub email: String,
    /// Username
    pub username: String,
    /// Profile bio
    pub bio: Option<String>,
    /// Avatar image URL
    pub image: Option<String>,
}

/// Changes to the signed-in user's account
///
/// `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    /// New email
    pub email: Option<String>,
    /// New username
    pub username: Option<String>,
    /// New bio
    pub bio: Option<String>,
    /// New avatar image URL
    pub image: Option<String>,
    /// New password
    pub password: Option<String>,
}

/// The RealWorld REST API
pub trait Api: Send + Sync {
    /// Sign in with email and password
    fn login(&self, email: String, password: String) -> ApiFuture<'_, Viewer>;

    /// Create an account
    fn register(&self, username: String, email: String, password: String)
    -> ApiFuture<'_, Viewer>;

    /// Fetch the signed-in user's account
    fn current_user(&self, cred: Cred) -> ApiFuture<'_, Account>;

    /// Update the signed-in user's account
    fn update_user(&self, cred: Cred, update: AccountUpdate) -> ApiFuture<'_, Viewer>;

    /// List articles
    fn feed(&self, cred: Option<Cred>, query: FeedQuery) -> ApiFuture<'_, Vec<Article>>;

    /// List popular tags
    fn tags(&self) -> ApiFuture<'_, Vec<String>>;

    /// Fetch a user's profile
    fn profile(&self, cred: Option<Cred>, username: Username) -> ApiFuture<'_, Author>;

    /// Follow a user
    fn follow(&self, cred: Cred, username: Username) -> ApiFuture<'_, Author>;

    /// Stop following a user
    fn unfollow(&self, cred: Cred, username: Username) -> ApiFuture<'_, Author>;

    /// Fetch one article
    fn article(&self, cred: Option<Cred>, slug: Slug) -> ApiFuture<'_, Article>;

    /// Fetch an article's comments
    fn comments(&self, cred: Option<Cred>, slug: Slug) -> ApiFuture<'_, Vec<Comment>>;

    /// Comment on an article
    fn post_comment(&self, cred: Cred, slug: Slug, body: String) -> ApiFuture<'_, Comment>;

    /// Delete an article
    fn delete_article(&self, cred: Cred, slug: Slug) -> ApiFuture<'_, ()>;

    /// Publish a new article
    fn create_article(&self, cred: Cred, draft: ArticleDraft) -> ApiFuture<'_, Article>;

    /// Update an existing article
    fn update_article(&self, cred: Cred, slug: Slug, draft: ArticleDraft)
    -> ApiFuture<'_, Article>;
}

/// Persist `viewer` as the signed-in user
///
/// Every active session subscription is notified through
/// [`CredentialStore::changes`]; the effect itself produces no action.
pub fn store_viewer<A: Send + 'static>(
    credentials: &Arc<dyn CredentialStore>,
    viewer: Viewer,
) -> Effect<A> {
    let credentials = Arc::clone(credentials);
    Effect::Future(Box::pin(async move {
        match credentials.store(&viewer) {
            Ok(()) => tracing::info!(username = %viewer.username(), "Stored credentials"),
            Err(error) => tracing::warn!(error = %error, "Failed to store credentials"),
        }
        None
    }))
}

/// Forget the signed-in user
///
/// Every active session subscription is notified through
/// [`CredentialStore::changes`]; the effect itself produces no action.
pub fn logout<A: Send + 'static>(credentials: &Arc<dyn CredentialStore>) -> Effect<A> {
    let credentials = Arc::clone(credentials);
    Effect::Future(Box::pin(async move {
        match credentials.clear() {
            Ok(()) => tracing::info!("Cleared credentials"),
            Err(error) => tracing::warn!(error = %error, "Failed to clear credentials"),
        }
        None
    }))
}
