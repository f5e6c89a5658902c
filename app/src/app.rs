//! The application core: which page is active, and how it changes.
//!
//! [`AppState`] holds exactly one page. URL changes go through
//! [`AppReducer::change_route_to`], which hands the current [`Session`] to
//! the destination page's `init` and discards everything else. Page actions
//! are tagged with their page and only reach it while it is active; replies
//! to requests made by a page the user already left are dropped.

use crate::api;
use crate::article::Slug;
use crate::environment::AppEnvironment;
use crate::page::{self, ActivePage, Document, frame};
use crate::pages::article::{self, ArticleAction, ArticleReducer, ArticleState};
use crate::pages::editor::{self, EditorAction, EditorReducer, EditorState};
use crate::pages::home::{self, HomeAction, HomeReducer, HomeState};
use crate::pages::login::{self, LoginAction, LoginReducer, LoginState};
use crate::pages::profile::{self, ProfileAction, ProfileReducer, ProfileState};
use crate::pages::register::{self, RegisterAction, RegisterReducer, RegisterState};
use crate::pages::settings::{self, SettingsAction, SettingsReducer, SettingsState};
use crate::route::{self, Route};
use crate::session::Session;
use crate::viewer::{Username, Viewer};
use conduit_core::composition::{lift, lift_effects};
use conduit_core::{
    Effect, Effects, NavKey, Navigation, Reducer, Subscription, Url, UrlRequest, smallvec,
};

/// The active page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for a redirect to resolve
    Redirect(Session),
    /// The URL names no route
    NotFound(Session),
    /// Home page
    Home(HomeState),
    /// Account settings
    Settings(SettingsState),
    /// Sign in
    Login(LoginState),
    /// Sign up
    Register(RegisterState),
    /// One article
    Article(ArticleState),
    /// Editor, for a new article (`None`) or an existing one
    Editor(Option<Slug>, EditorState),
    /// A user's profile
    Profile(Username, ProfileState),
}

impl AppState {
    /// The session the active page holds
    #[must_use]
    pub const fn session(&self) -> &Session {
        match self {
            Self::Redirect(session) | Self::NotFound(session) => session,
            Self::Home(page) => page.session(),
            Self::Settings(page) => page.session(),
            Self::Login(page) => page.session(),
            Self::Register(page) => page.session(),
            Self::Article(page) => page.session(),
            Self::Editor(_, page) => page.session(),
            Self::Profile(_, page) => page.session(),
        }
    }

    /// Short name of the active page, for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Redirect(_) => "redirect",
            Self::NotFound(_) => "not-found",
            Self::Home(_) => "home",
            Self::Settings(_) => "settings",
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Article(_) => "article",
            Self::Editor(..) => "editor",
            Self::Profile(..) => "profile",
        }
    }
}

/// Everything that can happen in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Nothing happened
    Ignored,
    /// Go to a route directly
    RouteChanged(Option<Route>),
    /// The URL changed
    UrlChanged(Url),
    /// A link was clicked
    LinkClicked(UrlRequest),
    /// The viewer signed in or out while a redirect was pending
    SessionChanged(Session),
    /// For the home page
    Home(HomeAction),
    /// For the settings page
    Settings(SettingsAction),
    /// For the sign-in page
    Login(LoginAction),
    /// For the sign-up page
    Register(RegisterAction),
    /// For the article page
    Article(ArticleAction),
    /// For the editor
    Editor(EditorAction),
    /// For the profile page
    Profile(ProfileAction),
}

/// Start the application at `url`
///
/// `viewer` is whoever the credential store remembers.
#[must_use]
pub fn init(
    viewer: Option<Viewer>,
    url: &Url,
    key: NavKey,
    env: &AppEnvironment,
) -> (AppState, Effects<AppAction>) {
    let mut state = AppState::Redirect(Session::from_viewer(key, viewer));
    let effects = AppReducer.change_route_to(Route::from_url(url), &mut state, env);
    (state, effects)
}

/// The application reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct AppReducer;

impl AppReducer {
    /// Move to `route`, carrying the session over
    ///
    /// `Root` and `Logout` leave the state alone: the first replaces the URL
    /// with the home route, the second clears the credentials and lets the
    /// resulting session change drive what happens next.
    pub fn change_route_to(
        &self,
        route: Option<Route>,
        state: &mut AppState,
        env: &AppEnvironment,
    ) -> Effects<AppAction> {
        let session = state.session().clone();
        let from = state.name();

        let (next, effects) = match route {
            None => (AppState::NotFound(session), smallvec![Effect::None]),
            Some(Route::Root) => {
                return smallvec![route::replace_url(session.nav_key(), &Route::Home)];
            },
            Some(Route::Logout) => {
                tracing::info!("Signing out");
                return smallvec![api::logout(&env.credentials)];
            },
            Some(Route::Home) => lift(home::init(session, env), AppState::Home, AppAction::Home),
            Some(Route::Settings) => lift(
                settings::init(session, env),
                AppState::Settings,
                AppAction::Settings,
            ),
            Some(Route::Login) => lift(login::init(session), AppState::Login, AppAction::Login),
            Some(Route::Register) => lift(
                register::init(session),
                AppState::Register,
                AppAction::Register,
            ),
            Some(Route::Profile(username)) => lift(
                profile::init(session, username.clone(), env),
                |page| AppState::Profile(username, page),
                AppAction::Profile,
            ),
            Some(Route::Article(slug)) => lift(
                article::init(session, slug, env),
                AppState::Article,
                AppAction::Article,
            ),
            Some(Route::NewArticle) => lift(
                editor::init(session, None, env),
                |page| AppState::Editor(None, page),
                AppAction::Editor,
            ),
            Some(Route::EditArticle(slug)) => lift(
                editor::init(session, Some(slug.clone()), env),
                |page| AppState::Editor(Some(slug), page),
                AppAction::Editor,
            ),
        };

        tracing::debug!(from, to = next.name(), effects = effects.len(), "Changed page");
        *state = next;
        effects
    }

    fn link_clicked(request: UrlRequest, state: &AppState) -> Effects<AppAction> {
        let key = state.session().nav_key().clone();
        match request {
            UrlRequest::Internal(url) if url.fragment().is_none() => {
                tracing::debug!(%url, "Ignoring link without a fragment");
                smallvec![Effect::None]
            },
            UrlRequest::Internal(url) => smallvec![Effect::Navigate(Navigation::Push {
                key,
                href: url.to_string(),
            })],
            UrlRequest::External(href) => smallvec![Effect::Navigate(Navigation::Load { key, href })],
        }
    }

    fn session_changed(session: Session, state: &mut AppState) -> Effects<AppAction> {
        if !matches!(state, AppState::Redirect(_)) {
            tracing::debug!(page = state.name(), "Session change handled by the page");
            return smallvec![Effect::None];
        }
        let effect = route::push_url(session.nav_key(), &Route::Home);
        *state = AppState::Redirect(session);
        smallvec![effect]
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &AppEnvironment,
    ) -> Effects<AppAction> {
        let action = match action {
            AppAction::Ignored => return smallvec![Effect::None],
            AppAction::RouteChanged(route) => return self.change_route_to(route, state, env),
            AppAction::UrlChanged(url) => {
                return self.change_route_to(Route::from_url(&url), state, env);
            },
            AppAction::LinkClicked(request) => return Self::link_clicked(request, state),
            AppAction::SessionChanged(session) => return Self::session_changed(session, state),
            page_action => page_action,
        };

        match (action, state) {
            (AppAction::Home(action), AppState::Home(page)) => {
                lift_effects(HomeReducer.reduce(page, action, env), AppAction::Home)
            },
            (AppAction::Settings(action), AppState::Settings(page)) => {
                lift_effects(SettingsReducer.reduce(page, action, env), AppAction::Settings)
            },
            (AppAction::Login(action), AppState::Login(page)) => {
                lift_effects(LoginReducer.reduce(page, action, env), AppAction::Login)
            },
            (AppAction::Register(action), AppState::Register(page)) => {
                lift_effects(RegisterReducer.reduce(page, action, env), AppAction::Register)
            },
            (AppAction::Article(action), AppState::Article(page)) => {
                lift_effects(ArticleReducer.reduce(page, action, env), AppAction::Article)
            },
            (AppAction::Editor(action), AppState::Editor(_, page)) => {
                lift_effects(EditorReducer.reduce(page, action, env), AppAction::Editor)
            },
            (AppAction::Profile(action), AppState::Profile(_, page)) => {
                lift_effects(ProfileReducer.reduce(page, action, env), AppAction::Profile)
            },
            (action, state) => {
                tracing::debug!(?action, page = state.name(), "Discarding stale action");
                smallvec![Effect::None]
            },
        }
    }

    fn subscriptions(&self, state: &AppState, env: &AppEnvironment) -> Subscription<AppAction> {
        match state {
            AppState::Redirect(session) => {
                Session::changes(AppAction::SessionChanged, session.nav_key(), &env.credentials)
            },
            AppState::NotFound(_) => Subscription::None,
            AppState::Home(page) => HomeReducer.subscriptions(page, env).scope("home", AppAction::Home),
            AppState::Settings(page) => SettingsReducer
                .subscriptions(page, env)
                .scope("settings", AppAction::Settings),
            AppState::Login(page) => LoginReducer
                .subscriptions(page, env)
                .scope("login", AppAction::Login),
            AppState::Register(page) => RegisterReducer
                .subscriptions(page, env)
                .scope("register", AppAction::Register),
            AppState::Article(page) => ArticleReducer
                .subscriptions(page, env)
                .scope("article", AppAction::Article),
            AppState::Editor(_, page) => EditorReducer
                .subscriptions(page, env)
                .scope("editor", AppAction::Editor),
            AppState::Profile(_, page) => ProfileReducer
                .subscriptions(page, env)
                .scope("profile", AppAction::Profile),
        }
    }
}

/// Render the active page inside the frame
#[must_use]
pub fn view(state: &AppState) -> Document {
    let viewer = state.session().viewer();
    match state {
        AppState::Redirect(_) => frame(viewer, &ActivePage::Other, page::blank()),
        AppState::NotFound(_) => frame(viewer, &ActivePage::Other, page::not_found()),
        AppState::Home(page) => frame(viewer, &ActivePage::Home, home::view(page)),
        AppState::Settings(page) => frame(viewer, &ActivePage::Settings, settings::view(page)),
        AppState::Login(page) => frame(viewer, &ActivePage::Login, login::view(page)),
        AppState::Register(page) => frame(viewer, &ActivePage::Register, register::view(page)),
        AppState::Article(page) => frame(viewer, &ActivePage::Other, article::view(page)),
        AppState::Editor(None, page) => frame(viewer, &ActivePage::NewArticle, editor::view(page)),
        AppState::Editor(Some(_), page) => frame(viewer, &ActivePage::Other, editor::view(page)),
        AppState::Profile(username, page) => frame(
            viewer,
            &ActivePage::Profile(username.clone()),
            profile::view(page),
        ),
    }
}
