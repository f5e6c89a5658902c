//! Where the signed-in viewer is remembered between runs.
//!
//! Every store keeps a `tokio::sync::watch` channel of the current viewer so
//! that [`CredentialStore::changes`] can notify subscribers whenever the
//! viewer is stored or cleared.

use crate::error::StorageError;
use crate::viewer::Viewer;
use futures::stream::BoxStream;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Persistence for the signed-in viewer
pub trait CredentialStore: Send + Sync {
    /// The stored viewer, if any
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the stored viewer can't be read.
    fn load(&self) -> Result<Option<Viewer>, StorageError>;

    /// Remember `viewer` as the signed-in user
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the viewer can't be written.
    fn store(&self, viewer: &Viewer) -> Result<(), StorageError>;

    /// Forget the signed-in user
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the stored viewer can't be removed.
    fn clear(&self) -> Result<(), StorageError>;

    /// Every change to the stored viewer made after this call
    fn changes(&self) -> BoxStream<'static, Option<Viewer>>;
}

fn watch_changes(mut rx: watch::Receiver<Option<Viewer>>) -> BoxStream<'static, Option<Viewer>> {
    Box::pin(async_stream::stream! {
        while rx.changed().await.is_ok() {
            let viewer = rx.borrow_and_update().clone();
            yield viewer;
        }
    })
}

/// Credentials kept in a JSON file
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    current: watch::Sender<Option<Viewer>>,
}

impl FileCredentialStore {
    /// Open the store at `path`, reading whatever viewer it holds
    ///
    /// A missing file means nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but can't be read or decoded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let viewer = read_viewer(&path)?;
        let (current, _) = watch::channel(viewer);
        Ok(Self { path, current })
    }

    /// The file backing this store
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_viewer(path: &Path) -> Result<Option<Viewer>, StorageError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error.into()),
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Viewer>, StorageError> {
        read_viewer(&self.path)
    }

    fn store(&self, viewer: &Viewer) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(viewer)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "Wrote credentials");
        self.current.send_replace(Some(viewer.clone()));
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {},
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {},
            Err(error) => return Err(error.into()),
        }
        tracing::debug!(path = %self.path.display(), "Removed credentials");
        self.current.send_replace(None);
        Ok(())
    }

    fn changes(&self) -> BoxStream<'static, Option<Viewer>> {
        watch_changes(self.current.subscribe())
    }
}

/// Credentials kept for the lifetime of the process
#[derive(Debug)]
pub struct MemoryCredentialStore {
    current: watch::Sender<Option<Viewer>>,
}

impl MemoryCredentialStore {
    /// Create a store holding `viewer`
    #[must_use]
    pub fn new(viewer: Option<Viewer>) -> Self {
        let (current, _) = watch::channel(viewer);
        Self { current }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Viewer>, StorageError> {
        Ok(self.current.borrow().clone())
    }

    fn store(&self, viewer: &Viewer) -> Result<(), StorageError> {
        self.current.send_replace(Some(viewer.clone()));
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.current.send_replace(None);
        Ok(())
    }

    fn changes(&self) -> BoxStream<'static, Option<Viewer>> {
        watch_changes(self.current.subscribe())
    }
}
