use client::ApiError;
use store::StoreError;
use thiserror::Error;

/// Failure of a composite operation: either the backend call or recording
/// its outcome in a local store.
#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
