//! Application state shared across handlers.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use ampkicks_core::{Catalog, CatalogError};
use tokio::sync::Mutex;

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::store::{FileStore, KeyValueStore, MemoryStore, Session, StoreError};

/// Error building application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog is read-only;
/// the shopper session sits behind a mutex so each request finishes its
/// load, mutate, and save before the next one starts. Session work runs on
/// the blocking pool since file-backed stores write synchronously.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    session: Arc<Mutex<Session>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                session: Arc::new(Mutex::new(Session::new(store))),
            }),
        }
    }

    /// Load the catalog and open the store named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or is invalid, or if the
    /// store file exists but cannot be opened.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StartupError> {
        let catalog = load_catalog(&config.catalog_path)?;
        tracing::info!(
            path = %config.catalog_path.display(),
            products = catalog.len(),
            "Catalog loaded"
        );

        let store: Box<dyn KeyValueStore> = match &config.store_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Using file store");
                Box::new(FileStore::open(path)?)
            }
            None => {
                tracing::info!("Using in-memory store");
                Box::new(MemoryStore::new())
            }
        };

        Ok(Self::new(config, catalog, store))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Run `work` against the locked shopper session on the blocking pool.
    ///
    /// The lock is held until `work` returns, and the caller's tracing span
    /// stays current inside it.
    ///
    /// # Errors
    ///
    /// Returns whatever `work` returns, or [`AppError::Internal`] if the
    /// blocking task panicked or was cancelled.
    pub async fn with_session<T, F>(&self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Session) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let mut session = Arc::clone(&self.inner.session).lock_owned().await;
        let span = tracing::Span::current();

        tokio::task::spawn_blocking(move || span.in_scope(|| work(&mut *session)))
            .await
            .map_err(|e| AppError::Internal(format!("session task failed: {e}")))?
    }
}

fn load_catalog(path: &std::path::Path) -> Result<Catalog, StartupError> {
    let json = fs::read_to_string(path).map_err(|source| StartupError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_json(&json).map_err(|source| StartupError::Catalog {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            StorefrontConfig::default(),
            Catalog::default(),
            Box::new(MemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn test_with_session_runs_work_and_keeps_writes() {
        let state = state();
        state
            .with_session(|session| Ok(session.save_cart(&ampkicks_core::Cart::new())?))
            .await
            .unwrap();

        let orders = state
            .with_session(|session| Ok(session.orders()?))
            .await
            .unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_with_session_passes_errors_through() {
        let result: Result<(), AppError> = state()
            .with_session(|_| Err(AppError::NotFound("line".to_string())))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_panicking_work_is_an_internal_error() {
        let state = state();
        let result: Result<(), AppError> = state
            .with_session(|_| panic!("session work failed"))
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));

        // The lock is released after the panic
        assert!(state.with_session(|s| Ok(s.orders()?)).await.is_ok());
    }
}
