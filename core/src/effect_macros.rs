//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants for
//! asynchronous calls and timers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use conduit_core::async_effect;
///
/// let api = Arc::clone(&env.api);
/// async_effect! {
///     let result = api.tags().await;
///     Some(HomeAction::CompletedTagsLoad(result))
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use conduit_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(500),
///     action: HomeAction::PassedSlowLoadThreshold
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        Loaded { value: i32 },
        PassedSlowLoadThreshold,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Loaded { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_millis(500),
            action: TestAction::PassedSlowLoadThreshold
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }
}
