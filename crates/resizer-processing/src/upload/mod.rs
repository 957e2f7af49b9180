//! Upload pipeline: read → validate → name → resize → store.
//!
//! [`BatchDispatcher`] checks a request as a whole and fans its files out to
//! [`ImageHandler`], which in turn fans each file out to its versions. Both
//! levels run their units as spawned tasks and fail fast on the first error.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::BatchDispatcher;
pub use handler::ImageHandler;
pub use types::UploadFile;

use futures::future::try_join_all;
use resizer_core::{UploadError, UploadResult};
use tokio::task::JoinHandle;

/// Await spawned units in order, rejecting with the first error.
///
/// A panicking unit surfaces as a codec error. Handles still pending when
/// another unit fails are dropped, which detaches their tasks.
pub(crate) async fn join_all_ordered<T>(
    handles: Vec<JoinHandle<UploadResult<T>>>,
) -> UploadResult<Vec<T>> {
    try_join_all(handles.into_iter().map(|handle| async move {
        handle
            .await
            .map_err(|e| UploadError::codec(format!("task failed: {}", e)))?
    }))
    .await
}
