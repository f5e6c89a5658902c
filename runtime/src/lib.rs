//! # Conduit Runtime
//!
//! Runtime implementation for the Conduit reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution,
//! effect handling, navigation, and subscriptions.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Navigation**: Applies [`Navigation`](conduit_core::Navigation) commands to the
//!   history behind their key and reports URL changes back as actions
//! - **Subscriptions**: Keeps the streams the current state asks for running
//!
//! ## Example
//!
//! ```ignore
//! use conduit_runtime::{history::MemoryHistory, Store};
//!
//! let (history, key) = MemoryHistory::with_key(start_url.clone());
//! let (state, effects) = app::init(viewer, start_url, key, &env);
//!
//! let store = Store::new(state, AppReducer, env).on_url_change(AppAction::UrlChanged);
//! store.boot(effects).await?;
//!
//! store.send(AppAction::LinkClicked(request)).await?;
//! let title = store.state(|s| app::view(s).title).await;
//! ```

use conduit_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory browser history
pub mod history;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for an action or for effects to complete
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use conduit_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of actions buffered for observers of [`Store::subscribe_actions`]
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of one
/// action to complete. Actions fed back by those effects get their own
/// handles; waiting does not follow them.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(AppAction::RouteChanged(Some(Route::Home))).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a handle and the tracking context used during effect execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Running subscription tasks, keyed by id
type RunningSubscriptions = Arc<Mutex<HashMap<conduit_core::SubscriptionId, tokio::task::AbortHandle>>>;

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Ordering, PoisonError, Reducer, RunningSubscriptions,
        RwLock, StoreConfig, StoreError,
    };
    use conduit_core::navigation::{Navigation, Url};
    use conduit_core::{Effects, Subscription};
    use futures::StreamExt;
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Subscriptions declared by the reducer for the current state
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Action broadcast channel for observing actions produced by effects
        /// and subscriptions, sent after the reducer has processed them.
        action_broadcast: broadcast::Sender<A>,
        /// Turns a URL reached through a navigation effect into an action
        on_url_change: Option<fn(Url) -> A>,
        subscriptions: RunningSubscriptions,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
                on_url_change: None,
                subscriptions: RunningSubscriptions::default(),
                config,
            }
        }

        /// Report URLs reached through navigation effects as actions
        ///
        /// Without this, `Push`/`Replace` navigations change the history but
        /// nothing is fed back to the reducer.
        #[must_use]
        pub fn on_url_change(mut self, to_action: fn(Url) -> A) -> Self {
            self.on_url_change = Some(to_action);
            self
        }

        /// Start the program
        ///
        /// Executes the initial effects (from the program's `init`) and starts
        /// the subscriptions the initial state declares.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        pub async fn boot(&self, effects: Effects<A>) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::info!(effects = effects.len(), "Booting store");

            let subscriptions = {
                let state = self.state.read().await;
                self.reducer.subscriptions(&state, &self.environment)
            };
            self.reconcile_subscriptions(subscriptions);

            let (handle, tracking) = EffectHandle::new();
            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Stops every subscription
        /// 3. Waits for pending effects to complete (with timeout)
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            {
                let mut running = self
                    .subscriptions
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                for (id, task) in running.drain() {
                    tracing::debug!(subscription = %id, "Stopping subscription");
                    task.abort();
                }
            }

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running", pending
                    );
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Shut down using the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.config.default_shutdown_timeout).await
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Collects the subscriptions the new state declares
        /// 4. Releases the lock, reconciles subscriptions, starts effects
        ///
        /// Actions are reduced strictly one at a time; `send()` returns after
        /// starting effect execution, not after completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let (effects, subscriptions) = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                let duration = start.elapsed();
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(duration.as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                // Note: Precision loss acceptable for metrics (effect counts < 2^52)
                #[allow(clippy::cast_precision_loss)]
                metrics::histogram!("store.effects.count").record(effects.len() as f64);

                let subscriptions = self.reducer.subscriptions(&state, &self.environment);
                (effects, subscriptions)
            };

            self.reconcile_subscriptions(subscriptions);

            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }
            tracing::debug!("Action processing completed, returning handle");

            Ok(handle)
        }

        /// Send an action and wait for a matching action produced afterwards
        ///
        /// Subscribes to the action broadcast before sending, so a reply
        /// produced by the action's effects cannot be missed. The returned
        /// action has already been reduced.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(
                                skipped,
                                "Action observer lagged, {} actions skipped",
                                skipped
                            );
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions fed back into this store
        ///
        /// Receives a clone of every action produced by effects, navigation,
        /// and subscriptions, after the reducer has processed it. Actions sent
        /// directly through [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let title = store.state(|s| app::view(s).title).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Number of effects currently running across all actions
        ///
        /// Subscriptions are not counted.
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Wait until no effect is running
        ///
        /// Effects spawned by fed-back actions are counted before the effect
        /// that produced the action finishes, so a settled store has no
        /// follow-up work in flight.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] if effects are still running when
        /// `timeout` elapses.
        pub async fn settle(&self, timeout: Duration) -> Result<(), StoreError> {
            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            while self.pending_effects() > 0 {
                if start.elapsed() >= timeout {
                    return Err(StoreError::Timeout);
                }
                tokio::time::sleep(poll_interval).await;
            }
            Ok(())
        }

        /// Ids of the subscriptions currently running, sorted
        #[must_use]
        pub fn running_subscriptions(&self) -> Vec<conduit_core::SubscriptionId> {
            let mut ids: Vec<_> = self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .keys()
                .cloned()
                .collect();
            ids.sort();
            ids
        }

        /// Start declared subscriptions that aren't running, stop running ones
        /// that are no longer declared
        fn reconcile_subscriptions(&self, declared: Subscription<A>)
        where
            R: Clone,
            E: Clone,
        {
            let streams = declared.into_streams();
            let mut running = self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            running.retain(|id, task| {
                let keep = streams.iter().any(|(declared, _)| declared == id);
                if !keep {
                    tracing::debug!(subscription = %id, "Subscription stopped");
                    task.abort();
                }
                keep
            });

            for (id, start) in streams {
                if running.contains_key(&id) {
                    continue;
                }

                tracing::debug!(subscription = %id, "Subscription started");
                metrics::counter!("store.subscriptions.started").increment(1);

                // Anything the source emits after this point is delivered
                let mut stream = start();
                let store = self.clone();
                let task = tokio::spawn(async move {
                    while let Some(action) = stream.next().await {
                        tracing::trace!("Subscription produced an action, sending to store");
                        if store.send(action.clone()).await.is_err() {
                            break;
                        }
                        let _ = store.action_broadcast.send(action);
                    }
                });
                running.insert(id, task.abort_handle());
            }
        }

        /// Spawn a task that feeds `action` back into the store
        fn feed_back(&self, action: A, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));
            let store = self.clone();

            tokio::spawn(async move {
                let _guard = DecrementGuard(tracking);
                let _pending_guard = pending_guard;

                if store.send(action.clone()).await.is_ok() {
                    let _ = store.action_broadcast.send(action);
                }
            });
        }

        /// Apply a navigation to the history behind its key
        ///
        /// Push and replace report the resulting URL through `on_url_change`;
        /// a full page load leaves the application and reports nothing.
        fn navigate(&self, navigation: Navigation, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            let result = match &navigation {
                Navigation::Push { key, href } => key.history().push(href).map(Some),
                Navigation::Replace { key, href } => key.history().replace(href).map(Some),
                Navigation::Load { key, href } => {
                    key.history().load(href);
                    Ok(None)
                },
            };

            match result {
                Ok(Some(url)) => {
                    tracing::debug!(url = %url, "Navigated");
                    if let Some(to_action) = self.on_url_change {
                        self.feed_back(to_action(url), tracking);
                    }
                },
                Ok(None) => {
                    tracing::info!(href = navigation.href(), "Left application");
                },
                Err(error) => {
                    tracing::warn!(error = %error, "Navigation failed");
                    metrics::counter!("store.navigation.failed").increment(1);
                },
            }
        }

        /// Execute an effect with tracking
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Delay`: Waits for duration, then sends action
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        /// - `Navigate`: Changes the URL, then feeds the URL change back
        ///
        /// # Error Handling Strategy
        ///
        /// **Reducer panics**: Propagate (fail fast).
        ///
        /// **Effect execution failures**: Log and continue. The [`DecrementGuard`]
        /// ensures the counter is always updated even on panic.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned, so pass by value is intentional
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            if store.send(action.clone()).await.is_ok() {
                                let _ = store.action_broadcast.send(action);
                            }
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard;

                        tokio::time::sleep(duration).await;
                        tracing::trace!("Effect::Delay completed, sending action");

                        let action = *action;
                        if store.send(action.clone()).await.is_ok() {
                            let _ = store.action_broadcast.send(action);
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect_internal(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let tracking_clone = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking_clone);
                        let _pending_guard = pending_guard;

                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!(
                                "Executing sequential effect {} of {}",
                                idx + 1,
                                effect_count
                            );

                            let (sub_tx, mut sub_rx) = watch::channel(());
                            let sub_tracking = EffectTracking {
                                counter: Arc::new(AtomicUsize::new(0)),
                                notifier: sub_tx,
                            };

                            store.execute_effect_internal(effect, sub_tracking.clone());

                            while sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                                if sub_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        }
                        tracing::trace!("Effect::Sequential completed");
                    });
                },
                Effect::Navigate(navigation) => {
                    tracing::trace!("Executing Effect::Navigate");
                    metrics::counter!("store.effects.executed", "type" => "navigate").increment(1);
                    self.navigate(navigation, tracking);
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
                on_url_change: self.on_url_change,
                subscriptions: Arc::clone(&self.subscriptions),
                config: self.config.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
