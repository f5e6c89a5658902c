//! Sign-in page.

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

/// Sign-in form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

impl LoginForm {
    fn validate(&self) -> Vec<Problem> {
        let mut problems = Vec::new();
        if self.email.trim().is_empty() {
            problems.push(Problem::InvalidEntry {
                field: "email",
                message: "email can't be blank.",
            });
        }
        if self.password.trim().is_empty() {
            problems.push(Problem::InvalidEntry {
                field: "password",
                message: "password can't be blank.",
            });
        }
        problems
    }
}

/// Sign-in page state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginState {
    /// Current session
    pub session: Session,
    /// Problems from the last submission
    pub problems: Vec<Problem>,
    /// Form contents
    pub form: LoginForm,
}

impl LoginState {
    /// The session this page holds
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

/// Sign-in page actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    /// The form was submitted
    SubmittedForm,
    /// Email field edited
    EnteredEmail(String),
    /// Password field edited
    EnteredPassword(String),
    /// Sign-in reply
    CompletedLogin(Result<Viewer, ApiError>),
    /// The viewer signed in or out
    GotSession(Session),
}

/// Start a visit to the sign-in page
#[must_use]
pub fn init(session: Session) -> (LoginState, Effects<LoginAction>) {
    let state = LoginState {
        session,
        problems: Vec::new(),
        form: LoginForm::default(),
    };
    (state, smallvec![Effect::None])
}

/// Sign-in page reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginReducer;

impl Reducer for LoginReducer {
    type State = LoginState;
    type Action = LoginAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut LoginState,
        action: LoginAction,
        env: &AppEnvironment,
    ) -> Effects<LoginAction> {
        match action {
            LoginAction::SubmittedForm => {
                let problems = state.form.validate();
                if !problems.is_empty() {
                    state.problems = problems;
                    return smallvec![Effect::None];
                }

                state.problems.clear();
                let api = Arc::clone(&env.api);
                let email = state.form.email.trim().to_string();
                let password = state.form.password.clone();
                smallvec![async_effect! {
                    Some(LoginAction::CompletedLogin(api.login(email, password).await))
                }]
            },
            LoginAction::EnteredEmail(email) => {
                state.form.email = email;
                smallvec![Effect::None]
            },
            LoginAction::EnteredPassword(password) => {
                state.form.password = password;
                smallvec![Effect::None]
            },
            LoginAction::CompletedLogin(Ok(viewer)) => {
                smallvec![api::store_viewer(&env.credentials, viewer)]
            },
            LoginAction::CompletedLogin(Err(error)) => {
                state.problems = server_problems(&error);
                smallvec![Effect::None]
            },
            LoginAction::GotSession(session) => {
                let effect = route::replace_url(session.nav_key(), &Route::Home);
                state.session = session;
                smallvec![effect]
            },
        }
    }

    fn subscriptions(
        &self,
        state: &LoginState,
        env: &AppEnvironment,
    ) -> Subscription<LoginAction> {
        Session::changes(LoginAction::GotSession, state.session.nav_key(), &env.credentials)
    }
}

/// Render the sign-in page
#[must_use]
pub fn view(state: &LoginState) -> Document {
    Document::new(
        "Login",
        vec![
            Node::element("div").class("auth-page").child(
                Node::element("div")
                    .class("container page")
                    .child(Node::element("h1").class("text-xs-center").child(Node::text("Sign in")))
                    .child(
                        Node::element("p")
                            .class("text-xs-center")
                            .child(Node::link(Route::Register.href(), "Need an account?")),
                    )
                    .child(view_problems(&state.problems))
                    .child(
                        Node::element("form")
                            .child(input("text", "Email", &state.form.email))
                            .child(input("password", "Password", &state.form.password))
                            .child(
                                Node::element("button")
                                    .class("btn btn-lg btn-primary pull-xs-right")
                                    .child(Node::text("Sign in")),
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

    #[test]
    fn test_init_has_no_effects() {
        let (_env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (state, effects) = init(Session::Guest(key));

        assert_eq!(state.form, LoginForm::default());
        assertions::assert_no_effects(&effects);
    }

    #[test]
    fn test_blank_form_is_rejected_locally() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());

        ReducerTest::new(LoginReducer)
            .with_env(env)
            .given_state(init(Session::Guest(key)).0)
            .when_action(LoginAction::EnteredEmail("   ".to_string()))
            .when_action(LoginAction::SubmittedForm)
            .then_state(|state| {
                assert_eq!(state.problems.len(), 2);
                assert_eq!(state.problems[0].message(), "email can't be blank.");
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn test_valid_form_signs_in() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (mut state, _) = init(Session::Guest(key));

        for action in [
            LoginAction::EnteredEmail(mocks::EMAIL.to_string()),
            LoginAction::EnteredPassword(mocks::PASSWORD.to_string()),
        ] {
            LoginReducer.reduce(&mut state, action, &env);
        }
        let mut effects = LoginReducer.reduce(&mut state, LoginAction::SubmittedForm, &env);

        let Some(Effect::Future(fut)) = effects.pop() else {
            panic!("expected a login request");
        };
        assert_eq!(
            fut.await,
            Some(LoginAction::CompletedLogin(Ok(mocks::viewer())))
        );
    }

    #[test]
    fn test_server_rejection_becomes_problems() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());

        ReducerTest::new(LoginReducer)
            .with_env(env)
            .given_state(init(Session::Guest(key)).0)
            .when_action(LoginAction::CompletedLogin(Err(ApiError::Validation(vec![
                "email or password is invalid".to_string(),
            ]))))
            .then_state(|state| {
                assert_eq!(
                    state.problems,
                    vec![Problem::ServerError("email or password is invalid".to_string())]
                );
            })
            .run();
    }

    #[tokio::test]
    async fn test_successful_login_stores_viewer() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (mut state, _) = init(Session::Guest(key));

        let mut effects = LoginReducer.reduce(
            &mut state,
            LoginAction::CompletedLogin(Ok(mocks::viewer())),
            &env,
        );
        let Some(Effect::Future(fut)) = effects.pop() else {
            panic!("expected a store effect");
        };
        assert_eq!(fut.await, None);
        assert_eq!(env.credentials.load().unwrap(), Some(mocks::viewer()));
    }

    #[test]
    fn test_got_session_redirects_home() {
        let (env, _history, key) = mocks::environment(MockApi::with_fixtures());

        ReducerTest::new(LoginReducer)
            .with_env(env)
            .given_state(init(Session::Guest(key.clone())).0)
            .when_action(LoginAction::GotSession(mocks::logged_in(key.clone())))
            .then_state(move |state| assert_eq!(state.session, mocks::logged_in(key)))
            .then_effects(|effects| assertions::assert_replaces(effects, "#/"))
            .run();
    }

    #[test]
    fn test_view() {
        let (_env, _history, key) = mocks::environment(MockApi::with_fixtures());
        let (mut state, _) = init(Session::Guest(key));
        state.problems = vec![Problem::ServerError("nope".to_string())];

        let document = view(&state);

        assert_eq!(document.title, "Login");
        assert!(document.text().contains("nope"));
        assert!(document.links().contains(&"#/register"));
    }
}
