//! Key-value persistence for the cart and placed orders.
//!
//! The storefront keeps shopper state the way a browser keeps local storage:
//! string values under a couple of fixed keys, last write wins. Two backends
//! are provided:
//!
//! - [`MemoryStore`] - in-process map (default, and used by tests)
//! - [`FileStore`] - a single JSON object file on disk
//!
//! [`Session`] layers typed access on top of either backend.

mod file;
mod memory;
mod session;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::{CART_KEY, ORDERS_KEY, Session};

/// Errors that can occur when reading or writing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored value could not be encoded or decoded.
    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key-value store.
///
/// Implementations are used behind the storefront's session lock, so writes
/// take `&mut self` and need no interior synchronization. A write that fails
/// leaves the store as it was.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Store several values at once. Either every entry is written or none is.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written; the previous values
    /// are then still in place.
    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}
