//! A user's profile: who they are and what they wrote or favorited.

use super::home::article_preview;
use super::{Status, slow_threshold};
use crate::api::FeedQuery;
use crate::article::{Article, Author};
use crate::environment::AppEnvironment;
use crate::error::ApiError;
use crate::page::{Document, Node};
use crate::session::Session;
use crate::viewer::Username;
use conduit_core::{Effect, Effects, Reducer, Subscription, async_effect, smallvec};
use std::sync::Arc;

/// Which of the author's articles are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    /// Articles the author wrote
    MyArticles,
    /// Articles the author favorited
    FavoritedArticles,
}

/// Profile page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    /// Current session
    pub session: Session,
    /// Whose profile this is
    pub username: Username,
    /// Errors from follow requests, until dismissed
    pub errors: Vec<String>,
    /// Selected list
    pub tab: ProfileTab,
    /// The author
    pub author: Status<Author>,
    /// Articles in the selected list
    pub feed: Status<Vec<Article>>,
}

impl ProfileState {
    /// The session this page holds
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    fn is_own_profile(&self) -> bool {
        self.session
            .viewer()
            .is_some_and(|viewer| viewer.username() == &self.username)
    }
}

/// Profile page actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    /// Error messages were dismissed
    ClickedDismissErrors,
    /// Follow button
    ClickedFollow,
    /// Unfollow button
    ClickedUnfollow,
    /// A list tab was clicked
    ClickedTab(ProfileTab),
    /// Author reply, tagged with the profile it was requested for
    CompletedAuthorLoad(Username, Result<Author, ApiError>),
    /// Feed reply, tagged with the profile it was requested for
    CompletedFeedLoad(Username, Result<Vec<Article>, ApiError>),
    /// Follow or unfollow reply, tagged with the profile it was requested for
    CompletedFollowChange(Username, Result<Author, ApiError>),
    /// The viewer signed in or out
    GotSession(Session),
    /// Loading is taking a while
    PassedSlowLoadThreshold,
}

fn fetch_feed(
    session: &Session,
    username: &Username,
    tab: ProfileTab,
    env: &AppEnvironment,
) -> Effect<ProfileAction> {
    let api = Arc::clone(&env.api);
    let cred = session.cred().cloned();
    let username = username.clone();
    let query = match tab {
        ProfileTab::MyArticles => FeedQuery::Author(username.clone()),
        ProfileTab::FavoritedArticles => FeedQuery::FavoritedBy(username.clone()),
    };
    async_effect! {
        Some(ProfileAction::CompletedFeedLoad(username, api.feed(cred, query).await))
    }
}

/// Start a visit to `username`'s profile
#[must_use]
pub fn init(
    session: Session,
    username: Username,
    env: &AppEnvironment,
) -> (ProfileState, Effects<ProfileAction>) {
    let tab = ProfileTab::MyArticles;
    let api = Arc::clone(&env.api);
    let cred = session.cred().cloned();
    let author = username.clone();

    let effects = smallvec![
        async_effect! {
            let result = api.profile(cred, author.clone()).await;
            Some(ProfileAction::CompletedAuthorLoad(author, result))
        },
        fetch_feed(&session, &username, tab, env),
        slow_threshold(env, ProfileAction::PassedSlowLoadThreshold),
    ];

    let state = ProfileState {
        session,
        username,
        errors: Vec::new(),
        tab,
        author: Status::Loading,
        feed: Status::Loading,
    };
    (state, effects)
}

impl ProfileAction {
    /// The profile an API reply belongs to
    const fn requested_for(&self) -> Option<&Username> {
        match self {
            Self::CompletedAuthorLoad(username, _)
            | Self::CompletedFeedLoad(username, _)
            | Self::CompletedFollowChange(username, _) => Some(username),
            _ => None,
        }
    }
}

/// Profile page reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileReducer;

impl ProfileReducer {
    fn change_follow(
        state: &ProfileState,
        env: &AppEnvironment,
        follow: bool,
    ) -> Effects<ProfileAction> {
        let Some(cred) = state.session.cred().cloned() else {
            tracing::debug!("Ignoring follow change without credentials");
            return smallvec![Effect::None];
        };
        let api = Arc::clone(&env.api);
        let username = state.username.clone();
        smallvec![async_effect! {
            let result = if follow {
                api.follow(cred, username.clone()).await
            } else {
                api.unfollow(cred, username.clone()).await
            };
            Some(ProfileAction::CompletedFollowChange(username, result))
        }]
    }
}

impl Reducer for ProfileReducer {
    type State = ProfileState;
    type Action = ProfileAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut ProfileState,
        action: ProfileAction,
        env: &AppEnvironment,
    ) -> Effects<ProfileAction> {
        if let Some(requested) = action.requested_for().filter(|r| **r != state.username) {
            tracing::debug!(
                requested = %requested,
                showing = %state.username,
                "Discarding reply for another profile"
            );
            return smallvec![Effect::None];
        }

        match action {
            ProfileAction::ClickedDismissErrors => {
                state.errors.clear();
                smallvec![Effect::None]
            },
            ProfileAction::ClickedFollow => Self::change_follow(state, env, true),
            ProfileAction::ClickedUnfollow => Self::change_follow(state, env, false),
            ProfileAction::ClickedTab(tab) => {
                state.tab = tab;
                state.feed = Status::Loading;
                smallvec![fetch_feed(&state.session, &state.username, tab, env)]
            },
            ProfileAction::CompletedAuthorLoad(_, result) => {
                state.author.complete("profile", result);
                smallvec![Effect::None]
            },
            ProfileAction::CompletedFeedLoad(_, result) => {
                state.feed.complete("feed", result);
                smallvec![Effect::None]
            },
            ProfileAction::CompletedFollowChange(_, Ok(author)) => {
                state.author = Status::Loaded(author);
                smallvec![Effect::None]
            },
            ProfileAction::CompletedFollowChange(_, Err(error)) => {
                state.errors.extend(error.messages());
                smallvec![Effect::None]
            },
            ProfileAction::GotSession(session) => {
                state.session = session;
                smallvec![Effect::None]
            },
            ProfileAction::PassedSlowLoadThreshold => {
                state.author.passed_slow_threshold();
                state.feed.passed_slow_threshold();
                smallvec![Effect::None]
            },
        }
    }

    fn subscriptions(
        &self,
        state: &ProfileState,
        env: &AppEnvironment,
    ) -> Subscription<ProfileAction> {
        Session::changes(
            ProfileAction::GotSession,
            state.session.nav_key(),
            &env.credentials,
        )
    }
}

fn follow_button(state: &ProfileState, author: &Author) -> Node {
    if state.session.viewer().is_none() || state.is_own_profile() {
        return Node::text("");
    }
    let label = if author.following {
        format!("Unfollow {}", author.username)
    } else {
        format!("Follow {}", author.username)
    };
    Node::element("button")
        .class("btn btn-sm btn-outline-secondary action-btn")
        .child(Node::text(label))
}

fn tab_link(label: &str, active: bool) -> Node {
    let class = if active { "nav-link active" } else { "nav-link" };
    Node::element("li")
        .class("nav-item")
        .child(Node::link("", label).class(class))
}

/// Render the profile page
#[must_use]
pub fn view(state: &ProfileState) -> Document {
    let title = if state.is_own_profile() {
        "My Profile".to_string()
    } else {
        state.username.to_string()
    };

    let errors = Node::element("div").class("error-messages").children(
        state
            .errors
            .iter()
            .map(|error| Node::element("p").child(Node::text(error))),
    );

    let author = state.author.view("profile", |author| {
        let mut info = Node::element("div").class("user-info");
        if let Some(image) = &author.image {
            info = info.child(Node::element("img").class("user-img").attr("src", image));
        }
        info.child(Node::element("h4").child(Node::text(author.username.as_str())))
            .child(Node::element("p").child(Node::text(author.bio.clone().unwrap_or_default())))
            .child(follow_button(state, author))
    });

    let feed = state.feed.view("feed", |articles| {
        if articles.is_empty() {
            Node::element("div")
                .class("article-preview")
                .child(Node::text("No articles are here... yet."))
        } else {
            Node::element("div").children(articles.iter().map(article_preview))
        }
    });

    Document::new(
        title,
        vec![
            Node::element("div")
                .class("profile-page")
                .child(errors)
                .child(author)
                .child(
                    Node::element("div")
                        .class("articles-toggle")
                        .child(Node::element("ul").class("nav nav-pills outline-active").children([
                            tab_link("My Articles", state.tab == ProfileTab::MyArticles),
                            tab_link(
                                "Favorited Articles",
                                state.tab == ProfileTab::FavoritedArticles,
                            ),
                        ]))
                        .child(feed),
                ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{self, MockApi};
    use conduit_testing::{ReducerTest, assertions};

    fn bob() -> Username {
        Username::parse("bob").unwrap()
    }

    #[tokio::test]
    async fn test_init_loads_author_and_articles() {
        let api = MockApi::with_fixtures();
        let (env, _history, key) = mocks::environment(api.clone());
        let (state, effects) = init(Session::Guest(key), bob(), &env);

        assert_eq!(state.username, bob());
        assert_eq!(state.tab, ProfileTab::MyArticles);
        assertions::assert_effects_count(&effects, 3);

        let mut replies = Vec::new();
        for effect in effects {
            if let Effect::Future(fut) = effect {
                replies.extend(fut.await);
            }
        }
        assert_eq!(replies.len(), 2);
        assert!(matches!(
            &replies[0],
            ProfileAction::CompletedAuthorLoad(requested, Ok(author))
                if *requested == bob() && author.username == bob()
        ));
        assert_eq!(
            api.calls(),
            vec!["profile bob".to_string(), "feed Author(Username(\"bob\"))".to_string()]
        );
    }

    #[test]
    fn test_guest_follow_is_ignored() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(Session::Guest(key), bob(), &env);

        ReducerTest::new(ProfileReducer)
            .with_env(env)
            .given_state(state)
            .when_action(ProfileAction::ClickedFollow)
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn test_follow_updates_author() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (mut state, _) = init(mocks::logged_in(key), bob(), &env);

        let mut effects = ProfileReducer.reduce(&mut state, ProfileAction::ClickedFollow, &env);
        let Some(Effect::Future(fut)) = effects.pop() else {
            panic!("expected a follow request");
        };
        let reply = fut.await.unwrap();
        ProfileReducer.reduce(&mut state, reply, &env);

        let author = state.author.loaded().unwrap();
        assert!(author.following);
    }

    #[test]
    fn test_follow_errors_until_dismissed() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(mocks::logged_in(key), bob(), &env);

        ReducerTest::new(ProfileReducer)
            .with_env(env.clone())
            .given_state(state.clone())
            .when_action(ProfileAction::CompletedFollowChange(bob(), Err(ApiError::Unauthorized)))
            .then_state(|state| {
                assert_eq!(state.errors, vec!["You are not signed in.".to_string()]);
            })
            .run();

        ReducerTest::new(ProfileReducer)
            .with_env(env)
            .given_state(state)
            .when_action(ProfileAction::CompletedFollowChange(bob(), Err(ApiError::Unauthorized)))
            .when_action(ProfileAction::ClickedDismissErrors)
            .then_state(|state| assert!(state.errors.is_empty()))
            .run();
    }

    #[test]
    fn test_tab_reloads_feed() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(Session::Guest(key), bob(), &env);

        ReducerTest::new(ProfileReducer)
            .with_env(env)
            .given_state(state)
            .when_action(ProfileAction::CompletedFeedLoad(bob(), Ok(Vec::new())))
            .when_action(ProfileAction::ClickedTab(ProfileTab::FavoritedArticles))
            .then_state(|state| {
                assert_eq!(state.tab, ProfileTab::FavoritedArticles);
                assert_eq!(state.feed, Status::Loading);
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn test_replies_for_another_profile_are_discarded() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(mocks::logged_in(key), bob(), &env);
        let alice = mocks::username("alice");

        ReducerTest::new(ProfileReducer)
            .with_env(env)
            .given_state(state)
            .when_action(ProfileAction::CompletedAuthorLoad(
                alice.clone(),
                Ok(mocks::author("alice")),
            ))
            .when_action(ProfileAction::CompletedFeedLoad(
                alice.clone(),
                Ok(vec![mocks::article()]),
            ))
            .when_action(ProfileAction::CompletedFollowChange(
                alice,
                Err(ApiError::Unauthorized),
            ))
            .then_state(|state| {
                assert_eq!(state.username, bob());
                assert_eq!(state.author, Status::Loading);
                assert_eq!(state.feed, Status::Loading);
                assert!(state.errors.is_empty());
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_view_titles() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());

        let (other, _) = init(mocks::logged_in(key.clone()), bob(), &env);
        assert_eq!(view(&other).title, "bob");

        let (own, _) = init(
            mocks::logged_in(key),
            Username::parse("alice").unwrap(),
            &env,
        );
        assert_eq!(view(&own).title, "My Profile");
    }

    #[test]
    fn test_view_follow_button_only_for_others() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (mut state, _) = init(mocks::logged_in(key), bob(), &env);
        state.author = Status::Loaded(mocks::author("bob"));

        assert!(view(&state).text().contains("Follow bob"));

        state.username = Username::parse("alice").unwrap();
        state.author = Status::Loaded(mocks::author("alice"));
        assert!(!view(&state).text().contains("Follow"));
    }
}
