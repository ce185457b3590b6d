//! Document storage abstraction for the KB viewer.
//!
//! This crate provides a [`Storage`] trait for fetching JSON documents by
//! relative path, decoupling the loader from the underlying backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Fetch accounting** (the mock counts reads per path)
//! - **Failure injection** for load error paths
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `read()` and `exists()` methods
//! - [`FsStorage`] implementation rooted at a data directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use kb_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("data"));
//! let metadata = storage.read("metadata.json")?;
//! # Ok::<(), kb_storage::StorageError>(())
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
