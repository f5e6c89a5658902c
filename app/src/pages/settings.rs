//! Account settings page.

use super::{Problem, Status, input, server_problems, slow_threshold, view_problems};
use crate::api::{self, Account, AccountUpdate};
use crate::environment::AppEnvironment;
use crate::error::ApiError;
use crate::page::{Document, Node};
use crate::route::{self, Route};
use crate::session::Session;
use crate::viewer::Viewer;
use conduit_core::{Effect, Effects, Reducer, Subscription, async_effect, smallvec};
use std::sync::Arc;

/// Settings form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    /// Avatar image URL
    pub avatar: String,
    /// Username
    pub username: String,
    /// Profile bio
    pub bio: String,
    /// Email address
    pub email: String,
    /// New password; blank keeps the old one
    pub password: String,
}

impl From<Account> for SettingsForm {
    fn from(account: Account) -> Self {
        Self {
            avatar: account.image.unwrap_or_default(),
            username: account.username,
            bio: account.bio.unwrap_or_default(),
            email: account.email,
            password: String::new(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl SettingsForm {
    fn validate(&self) -> Vec<Problem> {
        let mut problems = Vec::new();
        if self.username.trim().is_empty() {
            problems.push(Problem::InvalidEntry {
                field: "username",
                message: "username can't be blank.",
            });
        }
        if self.email.trim().is_empty() {
            problems.push(Problem::InvalidEntry {
                field: "email",
                message: "email can't be blank.",
            });
        }
        let password = self.password.trim();
        if !password.is_empty() && password.chars().count() < super::register::MIN_PASSWORD_LENGTH {
            problems.push(Problem::InvalidEntry {
                field: "password",
                message: "password must be at least 6 characters long.",
            });
        }
        problems
    }

    fn update(&self) -> AccountUpdate {
        AccountUpdate {
            email: non_blank(&self.email),
            username: non_blank(&self.username),
            bio: Some(self.bio.trim().to_string()),
            image: non_blank(&self.avatar),
            password: non_blank(&self.password),
        }
    }
}

/// Settings page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    /// Current session
    pub session: Session,
    /// Problems from the last submission
    pub problems: Vec<Problem>,
    /// The form, once the account has loaded
    pub status: Status<SettingsForm>,
}

impl SettingsState {
    /// The session this page holds
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

/// Settings page actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// The form was submitted
    SubmittedForm,
    /// Avatar field edited
    EnteredAvatar(String),
    /// Username field edited
    EnteredUsername(String),
    /// Bio field edited
    EnteredBio(String),
    /// Email field edited
    EnteredEmail(String),
    /// Password field edited
    EnteredPassword(String),
    /// Account reply
    CompletedFormLoad(Result<Account, ApiError>),
    /// Save reply
    CompletedSave(Result<Viewer, ApiError>),
    /// The viewer signed in or out
    GotSession(Session),
    /// Loading is taking a while
    PassedSlowLoadThreshold,
}

/// Start a visit to the settings page
///
/// Without credentials there is nothing to load and the page fails at once.
#[must_use]
pub fn init(session: Session, env: &AppEnvironment) -> (SettingsState, Effects<SettingsAction>) {
    let Some(cred) = session.cred().cloned() else {
        let state = SettingsState {
            session,
            problems: Vec::new(),
            status: Status::Failed,
        };
        return (state, smallvec![Effect::None]);
    };

    let api = Arc::clone(&env.api);
    let effects = smallvec![
        async_effect! {
            Some(SettingsAction::CompletedFormLoad(api.current_user(cred).await))
        },
        slow_threshold(env, SettingsAction::PassedSlowLoadThreshold),
    ];
    let state = SettingsState {
        session,
        problems: Vec::new(),
        status: Status::Loading,
    };
    (state, effects)
}

/// Settings page reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsReducer;

impl SettingsReducer {
    fn edit(state: &mut SettingsState, edit: impl FnOnce(&mut SettingsForm)) -> Effects<SettingsAction> {
        if let Some(form) = state.status.loaded_mut() {
            edit(form);
        }
        smallvec![Effect::None]
    }
}

impl Reducer for SettingsReducer {
    type State = SettingsState;
    type Action = SettingsAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut SettingsState,
        action: SettingsAction,
        env: &AppEnvironment,
    ) -> Effects<SettingsAction> {
        match action {
            SettingsAction::SubmittedForm => {
                let (Some(form), Some(cred)) = (state.status.loaded(), state.session.cred()) else {
                    return smallvec![Effect::None];
                };
                let problems = form.validate();
                if !problems.is_empty() {
                    state.problems = problems;
                    return smallvec![Effect::None];
                }

                state.problems.clear();
                let api = Arc::clone(&env.api);
                let cred = cred.clone();
                let update = form.update();
                smallvec![async_effect! {
                    Some(SettingsAction::CompletedSave(api.update_user(cred, update).await))
                }]
            },
            SettingsAction::EnteredAvatar(avatar) => Self::edit(state, |form| form.avatar = avatar),
            SettingsAction::EnteredUsername(username) => {
                Self::edit(state, |form| form.username = username)
            },
            SettingsAction::EnteredBio(bio) => Self::edit(state, |form| form.bio = bio),
            SettingsAction::EnteredEmail(email) => Self::edit(state, |form| form.email = email),
            SettingsAction::EnteredPassword(password) => {
                Self::edit(state, |form| form.password = password)
            },
            SettingsAction::CompletedFormLoad(result) => {
                state
                    .status
                    .complete("settings", result.map(SettingsForm::from));
                smallvec![Effect::None]
            },
            SettingsAction::CompletedSave(Ok(viewer)) => {
                smallvec![api::store_viewer(&env.credentials, viewer)]
            },
            SettingsAction::CompletedSave(Err(error)) => {
                state.problems = server_problems(&error);
                smallvec![Effect::None]
            },
            SettingsAction::GotSession(session) => {
                let effect = route::replace_url(session.nav_key(), &Route::Home);
                state.session = session;
                smallvec![effect]
            },
            SettingsAction::PassedSlowLoadThreshold => {
                state.status.passed_slow_threshold();
                smallvec![Effect::None]
            },
        }
    }

    fn subscriptions(
        &self,
        state: &SettingsState,
        env: &AppEnvironment,
    ) -> Subscription<SettingsAction> {
        Session::changes(
            SettingsAction::GotSession,
            state.session.nav_key(),
            &env.credentials,
        )
    }
}

/// Render the settings page
#[must_use]
pub fn view(state: &SettingsState) -> Document {
    let form = state.status.view("page", |form| {
        Node::element("form")
            .child(input("text", "URL of profile picture", &form.avatar))
            .child(input("text", "Username", &form.username))
            .child(
                Node::element("fieldset").class("form-group").child(
                    Node::element("textarea")
                        .class("form-control form-control-lg")
                        .attr("placeholder", "Short bio about you")
                        .child(Node::text(&form.bio)),
                ),
            )
            .child(input("text", "Email", &form.email))
            .child(input("password", "Password", &form.password))
            .child(
                Node::element("button")
                    .class("btn btn-lg btn-primary pull-xs-right")
                    .child(Node::text("Update Settings")),
            )
    });

    Document::new(
        "Settings",
        vec![
            Node::element("div").class("settings-page").child(
                Node::element("div")
                    .class("container page")
                    .child(Node::element("h1").class("text-xs-center").child(Node::text("Your Settings")))
                    .child(view_problems(&state.problems))
                    .child(form),
            ),
        ],
    )
}
