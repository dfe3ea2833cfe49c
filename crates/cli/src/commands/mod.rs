//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod orders;

use std::path::Path;

use ampkicks_storefront::store::{FileStore, Session, StoreError};

/// Open the session kept in a storefront file store.
///
/// The store is only read; a missing file shows as an empty cart and no
/// orders.
fn open_session(path: &Path) -> Result<Session, StoreError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Store file does not exist");
    }
    Ok(Session::new(Box::new(FileStore::open(path)?)))
}
