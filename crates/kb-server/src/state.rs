//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use kb_site::{NoopTypesetter, Viewer};
use kb_storage::Storage;
use kb_store::KeyValueStore;

use crate::error::ServerError;

/// Viewer session, or the reason it could not start.
pub(crate) enum Session {
    Ready(Mutex<Viewer>),
    Failed(String),
}

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Backend serving raw data documents.
    pub(crate) storage: Arc<dyn Storage>,
    /// The single viewer session of this process.
    pub(crate) session: Session,
}

impl AppState {
    /// Start the viewer. A metadata failure is kept and reported on every request.
    pub(crate) fn new(
        storage: Arc<dyn Storage>,
        store: Arc<dyn KeyValueStore>,
        metadata_file: &str,
    ) -> Self {
        let session = match Viewer::start(
            Arc::clone(&storage),
            store,
            Arc::new(NoopTypesetter),
            metadata_file,
        ) {
            Ok(viewer) => Session::Ready(Mutex::new(viewer)),
            Err(e) => {
                tracing::error!(error = %e, path = metadata_file, "Viewer failed to start");
                Session::Failed(e.to_string())
            }
        };
        Self { storage, session }
    }

    /// Lock the viewer, or report why there is none.
    ///
    /// A poisoned lock panics; only a handler that panicked mid-event can
    /// poison it.
    pub(crate) fn viewer(&self) -> Result<MutexGuard<'_, Viewer>, ServerError> {
        match &self.session {
            Session::Ready(viewer) => Ok(viewer.lock().unwrap()),
            Session::Failed(message) => Err(ServerError::MetadataUnavailable(message.clone())),
        }
    }
}

