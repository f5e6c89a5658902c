//! # Conduit
//!
//! The routing and application-state core of Conduit, the RealWorld
//! "Medium clone", written as a set of composable reducers.
//!
//! - [`route`]: URL fragment to [`Route`](route::Route) and back
//! - [`session`]: who is signed in, plus the navigation handle
//! - [`pages`]: one reducer per page, each with `init` and `view`
//! - [`app`]: the active page, transitions between pages, and dispatch
//! - [`api`]: the RealWorld REST API and the credential store
//!
//! The program runs on a [`conduit_runtime::Store`]:
//!
//! ```no_run
//! use conduit::api::{HttpApi, MemoryCredentialStore};
//! use conduit::app::{self, AppAction, AppReducer};
//! use conduit::AppEnvironment;
//! use conduit_runtime::Store;
//! use conduit_runtime::history::MemoryHistory;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpApi::new(Url::parse("https://api.realworld.io/api/")?, Duration::from_secs(10))?;
//! let env = AppEnvironment::new(Arc::new(api), Arc::new(MemoryCredentialStore::default()));
//! let url = Url::parse("http://localhost:8000/#/login")?;
//! let (_history, key) = MemoryHistory::with_key(url.clone());
//!
//! let (state, effects) = app::init(None, &url, key, &env);
//! let store = Store::new(state, AppReducer, env).on_url_change(AppAction::UrlChanged);
//! store.boot(effects).await?;
//!
//! let document = store.state(app::view).await;
//! assert_eq!(document.title, "Login - Conduit");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod article;
pub mod config;
pub mod environment;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod page;
pub mod pages;
pub mod route;
pub mod session;
pub mod viewer;

pub use app::{AppAction, AppReducer, AppState};
pub use config::AppConfig;
pub use environment::AppEnvironment;
pub use error::{ApiError, ConfigError, StorageError};
pub use route::Route;
pub use session::Session;
