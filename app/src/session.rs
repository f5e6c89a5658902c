//! Who is using the application, and the handle for changing its URL.

use crate::api::CredentialStore;
use crate::viewer::{Cred, Viewer};
use conduit_core::{NavKey, Subscription};
use futures::StreamExt;
use std::sync::Arc;

/// Subscription id for credential changes
pub const CHANGES_ID: &str = "session-changes";

/// The current session
///
/// Every page state owns exactly one. Transitions move it from the old page
/// to the new one; a change of viewer replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Nobody is signed in
    Guest(NavKey),
    /// A viewer is signed in
    LoggedIn(NavKey, Viewer),
}

impl Session {
    /// Build a session from an optional viewer
    #[must_use]
    pub fn from_viewer(key: NavKey, viewer: Option<Viewer>) -> Self {
        match viewer {
            Some(viewer) => Self::LoggedIn(key, viewer),
            None => Self::Guest(key),
        }
    }

    /// The navigation handle
    #[must_use]
    pub const fn nav_key(&self) -> &NavKey {
        match self {
            Self::Guest(key) | Self::LoggedIn(key, _) => key,
        }
    }

    /// The signed-in viewer, if any
    #[must_use]
    pub const fn viewer(&self) -> Option<&Viewer> {
        match self {
            Self::Guest(_) => None,
            Self::LoggedIn(_, viewer) => Some(viewer),
        }
    }

    /// Credentials of the signed-in viewer, if any
    #[must_use]
    pub fn cred(&self) -> Option<&Cred> {
        self.viewer().map(Viewer::cred)
    }

    /// Notify with a fresh session whenever the stored viewer changes
    ///
    /// Signing in or out anywhere goes through the credential store, so this
    /// is how every page learns about it.
    pub fn changes<A: Send + 'static>(
        to_action: fn(Self) -> A,
        key: &NavKey,
        credentials: &Arc<dyn CredentialStore>,
    ) -> Subscription<A> {
        let key = key.clone();
        let credentials = Arc::clone(credentials);

        Subscription::stream(CHANGES_ID, move || {
            let key = key.clone();
            credentials
                .changes()
                .map(move |viewer| to_action(Self::from_viewer(key.clone(), viewer)))
                .boxed()
        })
    }
}
