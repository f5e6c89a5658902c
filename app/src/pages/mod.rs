//! The pages of the application.
//!
//! Each page module exposes the same shape:
//!
//! - `XState`: local state, owning the [`Session`](crate::session::Session)
//! - `XAction`: everything that can happen on the page
//! - `XReducer`: the page's [`Reducer`](conduit_core::Reducer), including
//!   its subscriptions
//! - `init(session, ...)`: the state and effects a fresh visit starts with
//! - `view(&XState)`: the page's [`Document`](crate::page::Document)

use crate::environment::AppEnvironment;
use crate::page::Node;
use conduit_core::Effect;

pub mod article;
pub mod editor;
pub mod home;
pub mod login;
pub mod profile;
pub mod register;
pub mod settings;

/// Progress of something a page loads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status<T> {
    /// Request in flight
    Loading,
    /// Request in flight for longer than the slow-load threshold
    LoadingSlowly,
    /// Request succeeded
    Loaded(T),
    /// Request failed
    Failed,
}

impl<T> Status<T> {
    /// The loaded value, if any
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The loaded value, mutably
    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Show the spinner if still loading
    pub fn passed_slow_threshold(&mut self) {
        if matches!(self, Self::Loading) {
            *self = Self::LoadingSlowly;
        }
    }

    /// Settle with a reply
    pub fn complete<E: std::fmt::Display>(&mut self, what: &str, result: Result<T, E>) {
        *self = match result {
            Ok(value) => Self::Loaded(value),
            Err(error) => {
                tracing::warn!(error = %error, "Failed to load {what}");
                Self::Failed
            },
        };
    }

    /// Render with `loaded`, or a placeholder while loading or after failure
    pub fn view(&self, what: &str, loaded: impl FnOnce(&T) -> Node) -> Node {
        match self {
            Self::Loading => Node::text(""),
            Self::LoadingSlowly => Node::element("div")
                .class("loading")
                .child(Node::text("Loading...")),
            Self::Loaded(value) => loaded(value),
            Self::Failed => Node::element("div")
                .class("error")
                .child(Node::text(format!("Error loading {what}."))),
        }
    }
}

/// Something wrong with a submitted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A field failed client-side validation
    InvalidEntry {
        /// The field
        field: &'static str,
        /// What's wrong with it
        message: &'static str,
    },
    /// The server rejected the submission
    ServerError(String),
}

impl Problem {
    /// Message shown to the user
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidEntry { message, .. } => (*message).to_string(),
            Self::ServerError(message) => message.clone(),
        }
    }
}

/// Server problems for a failed submission
#[must_use]
pub fn server_problems(error: &crate::error::ApiError) -> Vec<Problem> {
    error.messages().into_iter().map(Problem::ServerError).collect()
}

/// Render a form's problems
#[must_use]
pub fn view_problems(problems: &[Problem]) -> Node {
    Node::element("ul").class("error-messages").children(
        problems
            .iter()
            .map(|problem| Node::element("li").child(Node::text(problem.message()))),
    )
}

/// Fire `action` once the slow-load threshold passes
pub fn slow_threshold<A>(env: &AppEnvironment, action: A) -> Effect<A> {
    Effect::Delay {
        duration: env.slow_threshold,
        action: Box::new(action),
    }
}

/// A labelled text input
#[must_use]
pub fn input(kind: &'static str, placeholder: &'static str, value: &str) -> Node {
    Node::element("fieldset")
        .class("form-group")
        .child(
            Node::element("input")
                .class("form-control")
                .attr("type", kind)
                .attr("placeholder", placeholder)
                .attr("value", value),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_slow_threshold_only_affects_loading() {
        let mut status: Status<u32> = Status::Loading;
        status.passed_slow_threshold();
        assert_eq!(status, Status::LoadingSlowly);

        let mut status = Status::Loaded(1);
        status.passed_slow_threshold();
        assert_eq!(status, Status::Loaded(1));

        let mut status: Status<u32> = Status::Failed;
        status.passed_slow_threshold();
        assert_eq!(status, Status::Failed);
    }

    #[test]
    fn test_complete() {
        let mut status = Status::LoadingSlowly;
        status.complete("feed", Ok::<_, ApiError>(vec![1]));
        assert_eq!(status.loaded(), Some(&vec![1]));

        status.complete("feed", Err(ApiError::NotFound));
        assert_eq!(status, Status::Failed);
    }

    #[test]
    fn test_status_view() {
        let failed: Status<u32> = Status::Failed;
        assert_eq!(
            failed.view("article", |_| Node::text("x")).to_string(),
            "<div class=\"error\">Error loading article.</div>"
        );
        assert_eq!(
            Status::Loaded(7).view("article", |n| Node::text(n.to_string())).to_string(),
            "7"
        );
    }

    #[test]
    fn test_server_problems() {
        let problems = server_problems(&ApiError::Validation(vec!["email is taken".to_string()]));
        assert_eq!(problems, vec![Problem::ServerError("email is taken".to_string())]);
    }
}
