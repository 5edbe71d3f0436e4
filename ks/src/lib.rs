//! KeyStore - write-through key/value string storage
//!
//! A tiny local persistence layer in the spirit of a browser's `localStorage`:
//! string values under fixed string keys, written to disk synchronously on
//! every mutation.
//!
//! # Layout
//!
//! ```text
//! {data_dir}/
//! ├── store.json          # {"key": "value", ...}
//! ├── store.json.lock     # exclusive lock held while rewriting
//! └── store.json.corrupt  # previous file, if it failed to parse
//! ```
//!
//! # Example
//!
//! ```ignore
//! use keystore::{FileStore, Storage};
//!
//! let mut store = FileStore::open(keystore::default_store_path("skillfolio"))?;
//! store.set("skillsData", "[]")?;
//! assert_eq!(store.get("skillsData")?.as_deref(), Some("[]"));
//! ```

pub mod cli;
mod error;
mod store;

use std::path::PathBuf;

pub use error::{StoreError, StoreResult};
pub use store::{FileStore, MemoryStore, Storage};

/// File name of the backing JSON object
pub const STORE_FILE: &str = "store.json";

/// Default store location for an application: `{data_local_dir}/{app}/store.json`
pub fn default_store_path(app: &str) -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app)
        .join(STORE_FILE)
}
