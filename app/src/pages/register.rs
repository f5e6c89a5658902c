//! Sign-up page.

use super::{Problem, input, server_problems, view_problems};
use crate::api;
use crate::environment::AppEnvironment;
use crate::error::ApiError;
use crate::page::{Document, Node};
use crate::route::{self, Route};
use crate::session::Session;
use crate::viewer::Viewer;
use conduit_core::{Effect, Effects, Reducer, Subscription, async_effect, smallvec};
use std::sync::Arc;

/// Shortest password the form accepts
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Sign-up form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

impl RegisterForm {
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
        if password.is_empty() {
            problems.push(Problem::InvalidEntry {
                field: "password",
                message: "password can't be blank.",
            });
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            problems.push(Problem::InvalidEntry {
                field: "password",
                message: "password must be at least 6 characters long.",
            });
        }
        problems
    }
}

/// Sign-up page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterState {
    /// Current session
    pub session: Session,
    /// Problems from the last submission
    pub problems: Vec<Problem>,
    /// Form contents
    pub form: RegisterForm,
}

impl RegisterState {
    /// The session this page holds
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

/// Sign-up page actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterAction {
    /// The form was submitted
    SubmittedForm,
    /// Username field edited
    EnteredUsername(String),
    /// Email field edited
    EnteredEmail(String),
    /// Password field edited
    EnteredPassword(String),
    /// Sign-up reply
    CompletedRegister(Result<Viewer, ApiError>),
    /// The viewer signed in or out
    GotSession(Session),
}

/// Start a visit to the sign-up page
#[must_use]
pub fn init(session: Session) -> (RegisterState, Effects<RegisterAction>) {
    let state = RegisterState {
        session,
        problems: Vec::new(),
        form: RegisterForm::default(),
    };
    (state, smallvec![Effect::None])
}

/// Sign-up page reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterReducer;

impl Reducer for RegisterReducer {
    type State = RegisterState;
    type Action = RegisterAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut RegisterState,
        action: RegisterAction,
        env: &AppEnvironment,
    ) -> Effects<RegisterAction> {
        match action {
            RegisterAction::SubmittedForm => {
                let problems = state.form.validate();
                if !problems.is_empty() {
                    state.problems = problems;
                    return smallvec![Effect::None];
                }

                state.problems.clear();
                let api = Arc::clone(&env.api);
                let form = &state.form;
                let (username, email, password) = (
                    form.username.trim().to_string(),
                    form.email.trim().to_string(),
                    form.password.trim().to_string(),
                );
                smallvec![async_effect! {
                    Some(RegisterAction::CompletedRegister(
                        api.register(username, email, password).await,
                    ))
                }]
            },
            RegisterAction::EnteredUsername(username) => {
                state.form.username = username;
                smallvec![Effect::None]
            },
            RegisterAction::EnteredEmail(email) => {
                state.form.email = email;
                smallvec![Effect::None]
            },
            RegisterAction::EnteredPassword(password) => {
                state.form.password = password;
                smallvec![Effect::None]
            },
            RegisterAction::CompletedRegister(Ok(viewer)) => {
                smallvec![api::store_viewer(&env.credentials, viewer)]
            },
            RegisterAction::CompletedRegister(Err(error)) => {
                state.problems = server_problems(&error);
                smallvec![Effect::None]
            },
            RegisterAction::GotSession(session) => {
                let effect = route::replace_url(session.nav_key(), &Route::Home);
                state.session = session;
                smallvec![effect]
            },
        }
    }

    fn subscriptions(
        &self,
        state: &RegisterState,
        env: &AppEnvironment,
    ) -> Subscription<RegisterAction> {
        Session::changes(
            RegisterAction::GotSession,
            state.session.nav_key(),
            &env.credentials,
        )
    }
}

/// Render the sign-up page
#[must_use]
pub fn view(state: &RegisterState) -> Document {
    Document::new(
        "Register",
        vec![
            Node::element("div").class("auth-page").child(
                Node::element("div")
                    .class("container page")
                    .child(Node::element("h1").class("text-xs-center").child(Node::text("Sign up")))
                    .child(
                        Node::element("p")
                            .class("text-xs-center")
                            .child(Node::link(Route::Login.href(), "Have an account?")),
                    )
                    .child(view_problems(&state.problems))
                    .child(
                        Node::element("form")
                            .child(input("text", "Username", &state.form.username))
                            .child(input("text", "Email", &state.form.email))
                            .child(input("password", "Password", &state.form.password))
                            .child(
                                Node::element("button")
                                    .class("btn btn-lg btn-primary pull-xs-right")
                                    .child(Node::text("Sign up")),
                            ),
                    ),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{self, MockApi};
    use conduit_testing::{ReducerTest, assertions};

    fn filled(username: &str, email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_short_password_is_rejected() {
        let problems = filled("carol", "carol@example.com", "12345").validate();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].message(), "password must be at least 6 characters long.");

        assert!(filled("carol", "carol@example.com", "123456").validate().is_empty());
    }

    #[test]
    fn test_blank_fields_are_all_reported() {
        let problems = RegisterForm::default().validate();
        let fields: Vec<_> = problems
            .iter()
            .map(|problem| match problem {
                Problem::InvalidEntry { field, .. } => *field,
                Problem::ServerError(_) => "server",
            })
            .collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn test_invalid_form_sends_nothing() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());

        ReducerTest::new(RegisterReducer)
            .with_env(env)
            .given_state(init(Session::Guest(key)).0)
            .when_action(RegisterAction::EnteredUsername("carol".to_string()))
            .when_action(RegisterAction::SubmittedForm)
            .then_state(|state| assert_eq!(state.problems.len(), 2))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn test_valid_form_registers() {
        let api = MockApi::with_fixtures();
        let (env, _history, key) = mocks::environment(api.clone());
        let (mut state, _) = init(Session::Guest(key));
        state.form = filled("carol", "carol@example.com", "secret-password");

        let mut effects = RegisterReducer.reduce(&mut state, RegisterAction::SubmittedForm, &env);
        let Some(Effect::Future(fut)) = effects.pop() else {
            panic!("expected a register request");
        };

        let Some(RegisterAction::CompletedRegister(Ok(viewer))) = fut.await else {
            panic!("expected a successful registration");
        };
        assert_eq!(viewer.username().as_str(), "carol");
        assert_eq!(api.calls(), vec!["register carol".to_string()]);
    }

    #[test]
    fn test_got_session_redirects_home() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());

        ReducerTest::new(RegisterReducer)
            .with_env(env)
            .given_state(init(Session::Guest(key.clone())).0)
            .when_action(RegisterAction::GotSession(mocks::logged_in(key)))
            .then_effects(|effects| assertions::assert_replaces(effects, "#/"))
            .run();
    }

    #[test]
    fn test_view() {
        let (_env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let document = view(&init(Session::Guest(key)).0);

        assert_eq!(document.title, "Register");
        assert!(document.links().contains(&"#/login"));
    }
}
