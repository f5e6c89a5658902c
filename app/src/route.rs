//! Routes: the destinations a URL fragment can name.
//!
//! Routing is done on the fragment only (`http://host/#/article/slug`), so
//! the application works from any static file server.
//!
//! | Fragment               | Route                 |
//! |------------------------|-----------------------|
//! | none, or empty         | `Root`                |
//! | `/`                    | `Home`                |
//! | `/login`               | `Login`               |
//! | `/logout`              | `Logout`              |
//! | `/register`            | `Register`            |
//! | `/settings`            | `Settings`            |
//! | `/profile/{username}`  | `Profile(username)`   |
//! | `/article/{slug}`      | `Article(slug)`       |
//! | `/editor`              | `NewArticle`          |
//! | `/editor/{slug}`       | `EditArticle(slug)`   |
//!
//! The leading `/` is optional and one trailing `/` is ignored.

use crate::article::Slug;
use crate::viewer::Username;
use conduit_core::{Effect, NavKey, Navigation, Url};
use std::fmt;

/// A destination inside the application
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Global feed and tags
    Home,
    /// Redirects to `Home`; never rendered
    Root,
    /// Sign in
    Login,
    /// Sign out, then redirect
    Logout,
    /// Sign up
    Register,
    /// Account settings
    Settings,
    /// An article and its comments
    Article(Slug),
    /// A user's articles
    Profile(Username),
    /// Write a new article
    NewArticle,
    /// Edit an existing article
    EditArticle(Slug),
}

impl Route {
    /// Decode the route named by a URL's fragment
    #[must_use]
    pub fn from_url(url: &Url) -> Option<Self> {
        Self::parse(url.fragment().unwrap_or_default())
    }

    /// Decode the route named by a fragment (without the `#`)
    #[must_use]
    pub fn parse(fragment: &str) -> Option<Self> {
        if fragment.is_empty() {
            return Some(Self::Root);
        }

        let path = fragment.strip_prefix('/').unwrap_or(fragment);
        let path = path.strip_suffix('/').unwrap_or(path);
        let segments: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect()
        };

        match segments.as_slice() {
            [] => Some(Self::Home),
            ["login"] => Some(Self::Login),
            ["logout"] => Some(Self::Logout),
            ["register"] => Some(Self::Register),
            ["settings"] => Some(Self::Settings),
            ["profile", username] => Username::parse(username).map(Self::Profile),
            ["article", slug] => Slug::parse(slug).map(Self::Article),
            ["editor"] => Some(Self::NewArticle),
            ["editor", slug] => Slug::parse(slug).map(Self::EditArticle),
            _ => None,
        }
    }

    /// The href linking to this route, e.g. `#/profile/alice`
    #[must_use]
    pub fn href(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home | Self::Root => write!(f, "#/"),
            Self::Login => write!(f, "#/login"),
            Self::Logout => write!(f, "#/logout"),
            Self::Register => write!(f, "#/register"),
            Self::Settings => write!(f, "#/settings"),
            Self::Article(slug) => write!(f, "#/article/{slug}"),
            Self::Profile(username) => write!(f, "#/profile/{username}"),
            Self::NewArticle => write!(f, "#/editor"),
            Self::EditArticle(slug) => write!(f, "#/editor/{slug}"),
        }
    }
}

/// Replace the current history entry with `route`
pub fn replace_url<A>(key: &NavKey, route: &Route) -> Effect<A> {
    Effect::Navigate(Navigation::Replace {
        key: key.clone(),
        href: route.href(),
    })
}

/// Add a history entry for `route`
pub fn push_url<A>(key: &NavKey, route: &Route) -> Effect<A> {
    Effect::Navigate(Navigation::Push {
        key: key.clone(),
        href: route.href(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn username(name: &str) -> Username {
        Username::parse(name).unwrap()
    }

    fn slug(s: &str) -> Slug {
        Slug::parse(s).unwrap()
    }

    #[test]
    fn test_grammar() {
        let cases = [
            ("http://localhost/", Some(Route::Root)),
            ("http://localhost/#", Some(Route::Root)),
            ("http://localhost/#/", Some(Route::Home)),
            ("http://localhost/#/login", Some(Route::Login)),
            ("http://localhost/#login", Some(Route::Login)),
            ("http://localhost/#/logout", Some(Route::Logout)),
            ("http://localhost/#/register/", Some(Route::Register)),
            ("http://localhost/#/settings", Some(Route::Settings)),
            ("http://localhost/#/profile/alice", Some(Route::Profile(username("alice")))),
            ("http://localhost/#/article/hello-world", Some(Route::Article(slug("hello-world")))),
            ("http://localhost/#/editor", Some(Route::NewArticle)),
            ("http://localhost/#/editor/hello-world", Some(Route::EditArticle(slug("hello-world")))),
        ];

        for (input, expected) in cases {
            assert_eq!(Route::from_url(&url(input)), expected, "{input}");
        }
    }

    #[test]
    fn test_unmatched_fragments() {
        for input in [
            "http://localhost/#/nope",
            "http://localhost/#/profile",
            "http://localhost/#/profile/",
            "http://localhost/#/profile//",
            "http://localhost/#/article/a/b",
            "http://localhost/#/login/extra",
        ] {
            assert_eq!(Route::from_url(&url(input)), None, "{input}");
        }
    }

    #[test]
    fn test_href() {
        assert_eq!(Route::Home.href(), "#/");
        assert_eq!(Route::Root.href(), "#/");
        assert_eq!(Route::Profile(username("alice")).href(), "#/profile/alice");
        assert_eq!(Route::EditArticle(slug("x")).href(), "#/editor/x");
    }

    #[test]
    fn test_navigation_effects() {
        let (_history, key) = conduit_testing::test_nav_key("http://localhost/");

        let effect: Effect<()> = replace_url(&key, &Route::Home);
        assert!(matches!(
            effect,
            Effect::Navigate(Navigation::Replace { ref href, .. }) if href == "#/"
        ));

        let effect: Effect<()> = push_url(&key, &Route::Login);
        assert!(matches!(
            effect,
            Effect::Navigate(Navigation::Push { ref href, .. }) if href == "#/login"
        ));
    }

    fn any_route() -> impl Strategy<Value = Route> {
        let name = "[a-z0-9-]{1,12}";
        prop_oneof![
            Just(Route::Home),
            Just(Route::Login),
            Just(Route::Logout),
            Just(Route::Register),
            Just(Route::Settings),
            Just(Route::NewArticle),
            name.prop_map(|s| Route::Article(slug(&s))),
            name.prop_map(|s| Route::Profile(username(&s))),
            name.prop_map(|s| Route::EditArticle(slug(&s))),
        ]
    }

    proptest! {
        #[test]
        fn prop_href_decodes_to_same_route(route in any_route()) {
            let href = route.href();
            let fragment = href.strip_prefix('#').unwrap();
            prop_assert_eq!(Route::parse(fragment), Some(route));
        }

        #[test]
        fn prop_parse_never_panics(fragment in ".*") {
            let _ = Route::parse(&fragment);
        }
    }
}
