//! Dependencies injected into every reducer.

use crate::api::{Api, CredentialStore};
use crate::config::DEFAULT_SLOW_THRESHOLD;
use std::sync::Arc;
use std::time::Duration;

/// Environment shared by the application core and every page
#[derive(Clone)]
pub struct AppEnvironment {
    /// RealWorld API
    pub api: Arc<dyn Api>,
    /// Where the signed-in viewer is remembered
    pub credentials: Arc<dyn CredentialStore>,
    /// Delay before a loading page shows its spinner
    pub slow_threshold: Duration,
}

impl AppEnvironment {
    /// Create an environment with the default slow-load threshold
    #[must_use]
    pub fn new(api: Arc<dyn Api>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            credentials,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }

    /// Override the slow-load threshold
    #[must_use]
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("slow_threshold", &self.slow_threshold)
            .finish_non_exhaustive()
    }
}
