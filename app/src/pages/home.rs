//! Home page: article feeds and popular tags.

use super::{Status, slow_threshold};
use crate::article::Article;
use crate::api::FeedQuery;
use crate::environment::AppEnvironment;
use crate::error::ApiError;
use crate::page::{Document, Node};
use crate::route::Route;
use crate::session::Session;
use conduit_core::{Effects, Reducer, Subscription, async_effect, smallvec, Effect};
use std::sync::Arc;

/// Which feed is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedTab {
    /// Articles by followed authors (signed in only)
    YourFeed,
    /// Every article
    GlobalFeed,
    /// Articles with one tag
    TagFeed(String),
}

impl FeedTab {
    fn query(&self) -> FeedQuery {
        match self {
            Self::YourFeed => FeedQuery::Following,
            Self::GlobalFeed => FeedQuery::Global,
            Self::TagFeed(tag) => FeedQuery::Tag(tag.clone()),
        }
    }
}

/// Home page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeState {
    /// Current session
    pub session: Session,
    /// Selected feed
    pub tab: FeedTab,
    /// Popular tags
    pub tags: Status<Vec<String>>,
    /// Articles in the selected feed
    pub feed: Status<Vec<Article>>,
}

impl HomeState {
    /// The session this page holds
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

/// Home page actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    /// A feed tab was clicked
    ClickedTab(FeedTab),
    /// A popular tag was clicked
    ClickedTag(String),
    /// Feed reply
    CompletedFeedLoad(Result<Vec<Article>, ApiError>),
    /// Tags reply
    CompletedTagsLoad(Result<Vec<String>, ApiError>),
    /// The viewer signed in or out
    GotSession(Session),
    /// Loading is taking a while
    PassedSlowLoadThreshold,
}

fn fetch_feed(session: &Session, tab: &FeedTab, env: &AppEnvironment) -> Effect<HomeAction> {
    let api = Arc::clone(&env.api);
    let cred = session.cred().cloned();
    let query = tab.query();
    async_effect! {
        Some(HomeAction::CompletedFeedLoad(api.feed(cred, query).await))
    }
}

/// Start a visit to the home page
///
/// Signed-in viewers start on their own feed, guests on the global feed.
#[must_use]
pub fn init(session: Session, env: &AppEnvironment) -> (HomeState, Effects<HomeAction>) {
    let tab = if session.viewer().is_some() {
        FeedTab::YourFeed
    } else {
        FeedTab::GlobalFeed
    };

    let api = Arc::clone(&env.api);
    let effects = smallvec![
        fetch_feed(&session, &tab, env),
        async_effect! {
            Some(HomeAction::CompletedTagsLoad(api.tags().await))
        },
        slow_threshold(env, HomeAction::PassedSlowLoadThreshold),
    ];

    let state = HomeState {
        session,
        tab,
        tags: Status::Loading,
        feed: Status::Loading,
    };
    (state, effects)
}

/// Home page reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeReducer;

impl Reducer for HomeReducer {
    type State = HomeState;
    type Action = HomeAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut HomeState,
        action: HomeAction,
        env: &AppEnvironment,
    ) -> Effects<HomeAction> {
        match action {
            HomeAction::ClickedTab(tab) => {
                state.feed = Status::Loading;
                let effect = fetch_feed(&state.session, &tab, env);
                state.tab = tab;
                smallvec![effect]
            },
            HomeAction::ClickedTag(tag) => {
                let tab = FeedTab::TagFeed(tag);
                state.feed = Status::Loading;
                let effect = fetch_feed(&state.session, &tab, env);
                state.tab = tab;
                smallvec![effect]
            },
            HomeAction::CompletedFeedLoad(result) => {
                state.feed.complete("feed", result);
                smallvec![Effect::None]
            },
            HomeAction::CompletedTagsLoad(result) => {
                state.tags.complete("tags", result);
                smallvec![Effect::None]
            },
            HomeAction::GotSession(session) => {
                state.session = session;
                smallvec![Effect::None]
            },
            HomeAction::PassedSlowLoadThreshold => {
                state.feed.passed_slow_threshold();
                state.tags.passed_slow_threshold();
                smallvec![Effect::None]
            },
        }
    }

    fn subscriptions(&self, state: &HomeState, env: &AppEnvironment) -> Subscription<HomeAction> {
        Session::changes(HomeAction::GotSession, state.session.nav_key(), &env.credentials)
    }
}

/// Render an article summary, shared with the profile page
#[must_use]
pub fn article_preview(article: &Article) -> Node {
    let author = &article.author;
    Node::element("div")
        .class("article-preview")
        .child(
            Node::element("div")
                .class("article-meta")
                .child(Node::link(
                    Route::Profile(author.username.clone()).href(),
                    author.username.as_str(),
                ))
                .child(
                    Node::element("span")
                        .class("date")
                        .child(Node::text(article.created_at.format("%B %e, %Y").to_string())),
                ),
        )
        .child(
            Node::element("a")
                .class("preview-link")
                .attr("href", Route::Article(article.slug.clone()).href())
                .child(Node::element("h1").child(Node::text(&article.title)))
                .child(Node::element("p").child(Node::text(&article.description))),
        )
}

fn tab_link(label: &str, active: bool) -> Node {
    let class = if active { "nav-link active" } else { "nav-link" };
    Node::element("li")
        .class("nav-item")
        .child(Node::link("", label).class(class))
}

/// Render the home page
#[must_use]
pub fn view(state: &HomeState) -> Document {
    let mut tabs = Vec::new();
    if state.session.viewer().is_some() {
        tabs.push(tab_link("Your Feed", state.tab == FeedTab::YourFeed));
    }
    tabs.push(tab_link("Global Feed", state.tab == FeedTab::GlobalFeed));
    if let FeedTab::TagFeed(tag) = &state.tab {
        tabs.push(tab_link(&format!("#{tag}"), true));
    }

    let feed = state.feed.view("feed", |articles| {
        if articles.is_empty() {
            Node::element("div")
                .class("article-preview")
                .child(Node::text("No articles are here... yet."))
        } else {
            Node::element("div").children(articles.iter().map(article_preview))
        }
    });

    let tags = state.tags.view("tags", |tags| {
        Node::element("div").class("tag-list").children(
            tags.iter()
                .map(|tag| Node::link("", tag.as_str()).class("tag-pill tag-default")),
        )
    });

    Document::new(
        "Conduit",
        vec![
            Node::element("div").class("home-page").children([
                Node::element("div").class("banner").child(
                    Node::element("div")
                        .class("container")
                        .child(Node::element("h1").class("logo-font").child(Node::text("conduit")))
                        .child(
                            Node::element("p").child(Node::text("A place to share your knowledge.")),
                        ),
                ),
                Node::element("div").class("container page").children([
                    Node::element("div")
                        .class("feed-toggle")
                        .child(Node::element("ul").class("nav nav-pills outline-active").children(tabs))
                        .child(feed),
                    Node::element("div")
                        .class("sidebar")
                        .child(Node::element("p").child(Node::text("Popular Tags")))
                        .child(tags),
                ]),
            ]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{self, MockApi};
    use conduit_testing::{ReducerTest, assertions};

    #[test]
    fn test_guest_starts_on_global_feed() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, effects) = init(Session::Guest(key), &env);

        assert_eq!(state.tab, FeedTab::GlobalFeed);
        assert_eq!(state.feed, Status::Loading);
        assertions::assert_effects_count(&effects, 3);
        assertions::assert_has_delay_effect(&effects, &HomeAction::PassedSlowLoadThreshold);
    }

    #[test]
    fn test_viewer_starts_on_own_feed() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(mocks::logged_in(key), &env);

        assert_eq!(state.tab, FeedTab::YourFeed);
    }

    #[tokio::test]
    async fn test_init_effects_load_feed_and_tags() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (_, effects) = init(Session::Guest(key), &env);

        let mut replies = Vec::new();
        for effect in effects {
            if let Effect::Future(fut) = effect {
                replies.extend(fut.await);
            }
        }

        assert_eq!(
            replies,
            vec![
                HomeAction::CompletedFeedLoad(Ok(vec![mocks::article()])),
                HomeAction::CompletedTagsLoad(Ok(vec!["rust".to_string(), "elm".to_string()])),
            ]
        );
    }

    #[test]
    fn test_clicking_tag_reloads_feed() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(Session::Guest(key), &env);

        ReducerTest::new(HomeReducer)
            .with_env(env)
            .given_state(state)
            .when_action(HomeAction::CompletedFeedLoad(Ok(Vec::new())))
            .when_action(HomeAction::ClickedTag("rust".to_string()))
            .then_state(|state| {
                assert_eq!(state.tab, FeedTab::TagFeed("rust".to_string()));
                assert_eq!(state.feed, Status::Loading);
            })
            .then_effects(|effects| {
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_slow_threshold_marks_pending_loads() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(Session::Guest(key), &env);

        ReducerTest::new(HomeReducer)
            .with_env(env)
            .given_state(state)
            .when_action(HomeAction::CompletedTagsLoad(Ok(vec!["rust".to_string()])))
            .when_action(HomeAction::PassedSlowLoadThreshold)
            .then_state(|state| {
                assert_eq!(state.feed, Status::LoadingSlowly);
                assert_eq!(state.tags, Status::Loaded(vec!["rust".to_string()]));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_got_session_only_updates_session() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, _) = init(Session::Guest(key.clone()), &env);
        let before = state.clone();

        ReducerTest::new(HomeReducer)
            .with_env(env)
            .given_state(state)
            .when_action(HomeAction::GotSession(mocks::logged_in(key.clone())))
            .then_state(move |state| {
                assert_eq!(state.session, mocks::logged_in(key));
                assert_eq!(state.tab, before.tab);
                assert_eq!(state.feed, before.feed);
            })
            .then_effects(|effects| assertions::assert_no_navigation(effects))
            .run();
    }

    #[test]
    fn test_view_lists_articles() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (mut state, _) = init(Session::Guest(key), &env);
        state.feed = Status::Loaded(vec![mocks::article()]);

        let document = view(&state);

        assert_eq!(document.title, "Conduit");
        assert!(document.links().contains(&"#/article/hello-world"));
        assert!(document.links().contains(&"#/profile/alice"));
        assert!(document.text().contains("Global Feed"));
        assert!(!document.text().contains("Your Feed"));
    }
}
