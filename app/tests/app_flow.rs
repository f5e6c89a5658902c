//! End-to-end flows through the Store
//!
//! Each test boots the application on an in-memory history with the mock API
//! and drives it the way a browser would: clicking links and editing forms.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use conduit::api::CredentialStore;
use conduit::app::{self, AppAction, AppReducer, AppState};
use conduit::mocks::{self, MockApi};
use conduit::pages::Status;
use conduit::pages::login::LoginAction;
use conduit::{AppEnvironment, Session};
use conduit_core::{Effects, History, Url, UrlRequest};
use conduit_runtime::Store;
use conduit_runtime::history::MemoryHistory;
use std::sync::Arc;
use std::time::Duration;

type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

const SETTLE: Duration = Duration::from_secs(2);

async fn boot(api: MockApi, fragment: &str, signed_in: bool) -> (AppStore, Arc<MemoryHistory>) {
    let (env, _, _) = mocks::environment(api);
    if signed_in {
        env.credentials.store(&mocks::viewer()).unwrap();
    }
    let start = Url::parse(mocks::START_URL).unwrap().join(fragment).unwrap();
    let (history, key) = MemoryHistory::with_key(start.clone());

    let viewer = env.credentials.load().unwrap();
    let (state, effects) = app::init(viewer, &start, key, &env);
    let store = Store::new(state, AppReducer, env).on_url_change(AppAction::UrlChanged);
    store.boot(effects).await.unwrap();
    store.settle(SETTLE).await.unwrap();
    (store, history)
}

async fn click(store: &AppStore, history: &MemoryHistory, href: &str) {
    let request = UrlRequest::classify(&history.current(), href).unwrap();
    store.send(AppAction::LinkClicked(request)).await.unwrap();
    store.settle(SETTLE).await.unwrap();
}

/// Poll until `done` holds; session changes arrive through subscriptions,
/// which `settle` does not track
async fn wait_until(store: &AppStore, done: impl Fn(&AppState) -> bool) {
    let deadline = tokio::time::Instant::now() + SETTLE;
    while !store.state(&done).await {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out on page {}",
            store.state(|s| s.name()).await
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    store.settle(SETTLE).await.unwrap();
}

#[tokio::test]
async fn test_root_redirects_to_home() {
    let (store, history) = boot(MockApi::with_fixtures(), "", false).await;

    let state = store.state(Clone::clone).await;
    let AppState::Home(home) = state else {
        panic!("expected home, got {}", state.name());
    };
    assert_eq!(home.feed, Status::Loaded(vec![mocks::article()]));
    assert_eq!(history.current().fragment(), Some("/"));
    assert_eq!(history.entries().len(), 1, "redirect replaces the entry");
    assert_eq!(
        store
            .running_subscriptions()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect::<Vec<_>>(),
        vec!["home/session-changes"]
    );
}

#[tokio::test]
async fn test_reply_for_page_left_is_discarded() {
    let api = MockApi::with_fixtures().with_latency(Duration::from_millis(50));
    let (env, _, _) = mocks::environment(api);
    let start = Url::parse(mocks::START_URL)
        .unwrap()
        .join("#/article/hello-world")
        .unwrap();
    let (history, key) = MemoryHistory::with_key(start.clone());
    let (state, effects) = app::init(None, &start, key, &env);
    let store = Store::new(state, AppReducer, env).on_url_change(AppAction::UrlChanged);
    store.boot(effects).await.unwrap();

    // Leave before the article arrives
    click(&store, &history, "#/login").await;

    let state = store.state(Clone::clone).await;
    let AppState::Login(login) = state else {
        panic!("expected login, got {}", state.name());
    };
    assert!(login.problems.is_empty());
    assert_eq!(login.form, conduit::pages::login::LoginForm::default());
}

#[tokio::test]
async fn test_login_stores_viewer_and_goes_home() {
    let (store, history) = boot(MockApi::with_fixtures(), "#/login", false).await;

    for action in [
        LoginAction::EnteredEmail(mocks::EMAIL.to_string()),
        LoginAction::EnteredPassword(mocks::PASSWORD.to_string()),
        LoginAction::SubmittedForm,
    ] {
        store.send(AppAction::Login(action)).await.unwrap();
    }
    store.settle(SETTLE).await.unwrap();

    wait_until(&store, |state| {
        matches!(state, AppState::Home(_)) && state.session().viewer().is_some()
    })
    .await;

    assert_eq!(history.current().fragment(), Some("/"));
    let document = store.state(app::view).await;
    assert!(document.links().contains(&"#/logout"));
}

#[tokio::test]
async fn test_wrong_password_stays_on_login() {
    let (store, _history) = boot(MockApi::with_fixtures(), "#/login", false).await;

    store
        .send(AppAction::Login(LoginAction::EnteredEmail(mocks::EMAIL.to_string())))
        .await
        .unwrap();
    store
        .send(AppAction::Login(LoginAction::EnteredPassword("nope".to_string())))
        .await
        .unwrap();
    store
        .send(AppAction::Login(LoginAction::SubmittedForm))
        .await
        .unwrap();
    store.settle(SETTLE).await.unwrap();

    let text = store.state(app::view).await.text();
    assert!(text.contains("email or password is invalid"));
}

#[tokio::test]
async fn test_logout_from_settings_returns_home_as_guest() {
    let (store, history) = boot(MockApi::with_fixtures(), "#/settings", true).await;
    assert!(store.state(|s| matches!(s, AppState::Settings(_))).await);

    click(&store, &history, "#/logout").await;

    wait_until(&store, |state| {
        matches!(state, AppState::Home(_)) && state.session().viewer().is_none()
    })
    .await;
    assert!(matches!(
        store.state(|s| s.session().clone()).await,
        Session::Guest(_)
    ));
}

#[tokio::test]
async fn test_sign_in_during_redirect_is_not_lost() {
    let (env, _, _) = mocks::environment(MockApi::with_fixtures());
    let credentials = Arc::clone(&env.credentials);
    let (history, key) = MemoryHistory::with_key(Url::parse(mocks::START_URL).unwrap());
    let store = Store::new(AppState::Redirect(Session::Guest(key)), AppReducer, env)
        .on_url_change(AppAction::UrlChanged);

    store.boot(Effects::new()).await.unwrap();
    credentials.store(&mocks::viewer()).unwrap();

    wait_until(&store, |state| {
        matches!(state, AppState::Home(_)) && state.session().viewer().is_some()
    })
    .await;
    assert_eq!(history.current().fragment(), Some("/"));
}

#[tokio::test]
async fn test_unknown_url_is_not_found() {
    let (store, history) = boot(MockApi::with_fixtures(), "#/", false).await;

    click(&store, &history, "#/nowhere").await;

    assert!(store.state(|s| matches!(s, AppState::NotFound(_))).await);
    assert!(store.running_subscriptions().is_empty());
    assert_eq!(store.state(app::view).await.title, "Page Not Found - Conduit");
}

#[tokio::test]
async fn test_external_link_leaves_state_alone() {
    let (store, history) = boot(MockApi::with_fixtures(), "#/register", false).await;
    let before = store.state(Clone::clone).await;

    click(&store, &history, "https://thinkster.io").await;

    assert_eq!(history.loads(), vec!["https://thinkster.io".to_string()]);
    assert_eq!(store.state(Clone::clone).await, before);
}

#[tokio::test]
async fn test_back_button_revisits_previous_page() {
    let (store, history) = boot(MockApi::with_fixtures(), "#/", false).await;
    click(&store, &history, "#/profile/alice").await;
    assert!(store.state(|s| matches!(s, AppState::Profile(..))).await);

    let previous = history.back().unwrap();
    store.send(AppAction::UrlChanged(previous)).await.unwrap();
    store.settle(SETTLE).await.unwrap();

    assert!(store.state(|s| matches!(s, AppState::Home(_))).await);
}
