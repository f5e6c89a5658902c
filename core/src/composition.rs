//! Lifting page results into a parent state and action space.
//!
//! A parent state that is a closed enum of pages embeds each page by
//! wrapping the page's state in an enum case and the page's actions in an
//! action case:
//!
//! - **`lift`**: turn a page's `(state, effects)` into the parent's
//! - **`lift_effects`**: re-tag a page's effects for the parent
//!
//! # Example
//!
//! ```
//! use conduit_core::composition::lift;
//! use conduit_core::{smallvec, Effect, Effects};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct LoginState {
//!     email: String,
//! }
//!
//! #[derive(Debug)]
//! enum LoginAction {
//!     TimedOut,
//! }
//!
//! #[derive(Debug)]
//! enum AppState {
//!     Login(LoginState),
//! }
//!
//! #[derive(Debug)]
//! enum AppAction {
//!     Login(LoginAction),
//! }
//!
//! let init: (LoginState, Effects<LoginAction>) = (
//!     LoginState { email: String::new() },
//!     smallvec![Effect::Delay {
//!         duration: Duration::from_secs(1),
//!         action: Box::new(LoginAction::TimedOut),
//!     }],
//! );
//!
//! let (state, effects) = lift(init, AppState::Login, AppAction::Login);
//! assert!(matches!(state, AppState::Login(_)));
//! assert!(matches!(
//!     &effects[0],
//!     Effect::Delay { action, .. } if matches!(**action, AppAction::Login(LoginAction::TimedOut))
//! ));
//! ```

use crate::effect::Effects;

/// Re-tag a child's effects so that every reply routes through `into_action`
///
/// # Type Parameters
///
/// - `A`: The child action type
/// - `M`: The parent action type
#[must_use]
pub fn lift_effects<A, M>(effects: Effects<A>, into_action: fn(A) -> M) -> Effects<M>
where
    A: Send + 'static,
    M: Send + 'static,
{
    effects
        .into_iter()
        .map(|effect| effect.map(into_action))
        .collect()
}

/// Lift a child's `(state, effects)` pair into the parent's state and action space
///
/// `into_state` wraps the child state (usually an enum case constructor, or a
/// closure that also captures route parameters), `into_action` wraps every
/// action the child's effects can produce.
///
/// # Type Parameters
///
/// - `S`: The child state type
/// - `P`: The parent state type
/// - `A`: The child action type
/// - `M`: The parent action type
pub fn lift<S, P, A, M>(
    (state, effects): (S, Effects<A>),
    into_state: impl FnOnce(S) -> P,
    into_action: fn(A) -> M,
) -> (P, Effects<M>)
where
    A: Send + 'static,
    M: Send + 'static,
{
    (into_state(state), lift_effects(effects, into_action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use crate::smallvec;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    struct ProfileState {
        loaded: bool,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ProfileAction {
        PassedSlowLoadThreshold,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentState {
        Profile(String, ProfileState),
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentAction {
        Profile(ProfileAction),
    }

    #[test]
    fn test_lift_wraps_state_with_captured_parameter() {
        let username = "alice".to_string();
        let init = (
            ProfileState { loaded: false },
            smallvec![Effect::Delay {
                duration: Duration::from_millis(500),
                action: Box::new(ProfileAction::PassedSlowLoadThreshold),
            }],
        );

        let (state, effects) = lift(
            init,
            move |profile| ParentState::Profile(username, profile),
            ParentAction::Profile,
        );

        assert_eq!(
            state,
            ParentState::Profile("alice".to_string(), ProfileState { loaded: false })
        );
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Delay { action, .. } => assert_eq!(
                **action,
                ParentAction::Profile(ProfileAction::PassedSlowLoadThreshold)
            ),
            other => unreachable!("expected delay, got {other:?}"),
        }
    }

    #[test]
    fn test_lift_effects_keeps_none() {
        let effects: Effects<ProfileAction> = smallvec![Effect::None];
        let lifted = lift_effects(effects, ParentAction::Profile);

        assert_eq!(lifted.len(), 1);
        assert!(lifted[0].is_none());
    }
}
