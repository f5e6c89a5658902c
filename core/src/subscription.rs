//! Subscriptions - long-lived action sources.
//!
//! A reducer declares which sources it wants to listen to for its current
//! state via [`Reducer::subscriptions`](crate::reducer::Reducer::subscriptions).
//! The runtime reconciles the declaration after every action: sources whose
//! [`SubscriptionId`] newly appears are started, sources whose id disappears
//! are stopped.
//!
//! Ids are the identity of a subscription. [`Subscription::scope`] prefixes the
//! id along with re-tagging the produced actions, so the same source embedded
//! by two different pages is two different subscriptions.

use futures::stream::{BoxStream, StreamExt};
use std::fmt;
use std::sync::Arc;

/// Identity of a running subscription
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    /// Create an id from a name
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix this id with a scope (`scope/id`)
    #[must_use]
    pub fn scoped(&self, scope: &str) -> Self {
        Self(format!("{scope}/{}", self.0))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Starts a fresh stream for a subscription
pub type StreamFactory<A> = Arc<dyn Fn() -> BoxStream<'static, A> + Send + Sync>;

/// Declaration of the action sources a state listens to
pub enum Subscription<A> {
    /// Listen to nothing
    None,

    /// Listen to all of these
    Batch(Vec<Subscription<A>>),

    /// A stream of actions, identified by `id`
    Stream {
        /// Identity used for reconciliation
        id: SubscriptionId,
        /// Creates the stream when the subscription starts
        start: StreamFactory<A>,
    },
}

impl<A> Subscription<A> {
    /// Declare a stream subscription
    pub fn stream<F>(id: impl Into<String>, start: F) -> Self
    where
        F: Fn() -> BoxStream<'static, A> + Send + Sync + 'static,
    {
        Self::Stream {
            id: SubscriptionId::new(id),
            start: Arc::new(start),
        }
    }

    /// Listen to several subscriptions at once
    #[must_use]
    pub const fn batch(subscriptions: Vec<Self>) -> Self {
        Self::Batch(subscriptions)
    }

    /// Returns `true` if this declaration listens to nothing
    #[must_use]
    pub fn is_none(&self) -> bool {
        match self {
            Self::None => true,
            Self::Batch(subscriptions) => subscriptions.iter().all(Self::is_none),
            Self::Stream { .. } => false,
        }
    }

    /// Ids of every stream in this declaration, in declaration order
    #[must_use]
    pub fn ids(&self) -> Vec<SubscriptionId> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(subscriptions) => subscriptions.iter().flat_map(Self::ids).collect(),
            Self::Stream { id, .. } => vec![id.clone()],
        }
    }

    /// Flatten into `(id, factory)` pairs
    ///
    /// When the same id is declared twice the first declaration wins.
    #[must_use]
    pub fn into_streams(self) -> Vec<(SubscriptionId, StreamFactory<A>)> {
        let mut streams = Vec::new();
        self.collect_streams(&mut streams);
        streams
    }

    fn collect_streams(self, streams: &mut Vec<(SubscriptionId, StreamFactory<A>)>) {
        match self {
            Self::None => {},
            Self::Batch(subscriptions) => {
                for subscription in subscriptions {
                    subscription.collect_streams(streams);
                }
            },
            Self::Stream { id, start } => {
                if !streams.iter().any(|(existing, _)| *existing == id) {
                    streams.push((id, start));
                }
            },
        }
    }
}

impl<A: Send + 'static> Subscription<A> {
    /// Embed a child's subscriptions into a parent's action space
    ///
    /// Every id is prefixed with `scope` and every produced action is wrapped
    /// by `f`.
    #[must_use]
    pub fn scope<B: Send + 'static>(self, scope: &'static str, f: fn(A) -> B) -> Subscription<B> {
        match self {
            Self::None => Subscription::None,
            Self::Batch(subscriptions) => Subscription::Batch(
                subscriptions
                    .into_iter()
                    .map(|subscription| subscription.scope(scope, f))
                    .collect(),
            ),
            Self::Stream { id, start } => Subscription::Stream {
                id: id.scoped(scope),
                start: Arc::new(move || start().map(f).boxed()),
            },
        }
    }
}

impl<A> fmt::Debug for Subscription<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Subscription::None"),
            Self::Batch(subscriptions) => {
                f.debug_tuple("Subscription::Batch").field(subscriptions).finish()
            },
            Self::Stream { id, .. } => f
                .debug_struct("Subscription::Stream")
                .field("id", id)
                .finish_non_exhaustive(),
        }
    }
}
