//! Conduit command-line driver
//!
//! Boots the application against the configured RealWorld API, then clicks
//! through the given hrefs one by one, printing the rendered page after
//! each has settled.
//!
//! Usage:
//!   conduit '#/' '#/article/how-to-train-your-dragon' '#/login'
//!
//! Configuration comes from `CONDUIT_*` environment variables, see
//! [`conduit::config`].

use anyhow::Context;
use clap::Parser;
use conduit::api::{CredentialStore, FileCredentialStore, HttpApi, MemoryCredentialStore};
use conduit::app::{self, AppAction, AppReducer};
use conduit::{AppConfig, AppEnvironment};
use conduit_core::{History, UrlRequest};
use conduit_runtime::Store;
use conduit_runtime::history::MemoryHistory;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Drive the Conduit application from the command line
#[derive(Parser, Debug)]
#[command(name = "conduit")]
#[command(about = "Visit Conduit pages and print what they render")]
struct Cli {
    /// Links to click, in order (e.g. "#/login" or "#/profile/jake")
    hrefs: Vec<String>,

    /// How long to wait for a page to finish loading, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    settle_ms: u64,

    /// Keep credentials in memory even if CONDUIT_CREDENTIALS is set
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    config.validate().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).context("invalid log filter")?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(api = %config.api_url, start = %config.start_url, "Starting Conduit");

    let credentials: Arc<dyn CredentialStore> = match (&config.credentials_path, cli.ephemeral) {
        (Some(path), false) => Arc::new(
            FileCredentialStore::open(path)
                .with_context(|| format!("failed to open credentials at {}", path.display()))?,
        ),
        _ => Arc::new(MemoryCredentialStore::default()),
    };
    let api = HttpApi::new(config.api_url.clone(), config.request_timeout)
        .context("failed to build HTTP client")?;
    let env = AppEnvironment::new(Arc::new(api), Arc::clone(&credentials))
        .with_slow_threshold(config.slow_threshold);

    let viewer = credentials.load().context("failed to read credentials")?;
    let (history, key) = MemoryHistory::with_key(config.start_url.clone());
    let (state, effects) = app::init(viewer, &config.start_url, key, &env);

    let store = Store::new(state, AppReducer, env).on_url_change(AppAction::UrlChanged);
    let settle = Duration::from_millis(cli.settle_ms);

    store.boot(effects).await?;
    store.settle(settle).await?;
    println!("{}", store.state(app::view).await);

    for href in &cli.hrefs {
        let request = UrlRequest::classify(&history.current(), href)?;
        tracing::info!(%href, "Clicking link");
        store.send(AppAction::LinkClicked(request)).await?;
        store.settle(settle).await?;
        println!("{}", store.state(app::view).await);
    }

    store.shutdown_default().await?;
    Ok(())
}
