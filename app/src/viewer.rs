//! The signed-in user and their credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A RealWorld username, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Parse a username, rejecting empty strings
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        (!name.is_empty()).then(|| Self(name.to_string()))
    }

    /// The username as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err("username cannot be empty".to_string())
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authentication credentials: who the viewer is and the API token proving it
#[derive(Clone, PartialEq, Eq)]
pub struct Cred {
    username: Username,
    token: String,
}

impl Cred {
    /// Create credentials
    #[must_use]
    pub const fn new(username: Username, token: String) -> Self {
        Self { username, token }
    }

    /// The signed-in username
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// The API token
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

// The token never appears in logs
impl fmt::Debug for Cred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cred")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// The signed-in user
///
/// Persisted as `{"username": ..., "token": ..., "image": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredViewer", into = "StoredViewer")]
pub struct Viewer {
    cred: Cred,
    avatar: Option<String>,
}

impl Viewer {
    /// Create a viewer
    #[must_use]
    pub const fn new(cred: Cred, avatar: Option<String>) -> Self {
        Self { cred, avatar }
    }

    /// The viewer's credentials
    #[must_use]
    pub const fn cred(&self) -> &Cred {
        &self.cred
    }

    /// The viewer's username
    #[must_use]
    pub const fn username(&self) -> &Username {
        self.cred.username()
    }

    /// Avatar image URL, if the viewer set one
    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }
}

#[derive(Serialize, Deserialize)]
struct StoredViewer {
    username: Username,
    token: String,
    #[serde(default)]
    image: Option<String>,
}

impl From<StoredViewer> for Viewer {
    fn from(stored: StoredViewer) -> Self {
        Self::new(Cred::new(stored.username, stored.token), stored.image)
    }
}

impl From<Viewer> for StoredViewer {
    fn from(viewer: Viewer) -> Self {
        Self {
            username: viewer.cred.username,
            token: viewer.cred.token,
            image: viewer.avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Viewer {
        Viewer::new(
            Cred::new(Username::parse("alice").unwrap(), "jwt.token".to_string()),
            None,
        )
    }

    #[test]
    fn test_username_rejects_empty() {
        assert!(Username::parse("").is_none());
        assert_eq!(Username::parse("bob").map(|u| u.to_string()), Some("bob".to_string()));
    }

    #[test]
    fn test_cred_debug_hides_token() {
        let debug = format!("{:?}", alice().cred());
        assert!(debug.contains("alice"));
        assert!(!debug.contains("jwt.token"));
    }

    #[test]
    fn test_viewer_json_shape() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"username": "alice", "token": "jwt.token", "image": null})
        );

        let decoded: Viewer =
            serde_json::from_str(r#"{"username":"alice","token":"jwt.token"}"#).unwrap();
        assert_eq!(decoded, alice());
    }

    #[test]
    fn test_viewer_with_empty_username_is_rejected() {
        let decoded = serde_json::from_str::<Viewer>(r#"{"username":"","token":"t"}"#);
        assert!(decoded.is_err());
    }
}
