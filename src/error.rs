//! Errors surfaced to the host through `Cmd::ReportError`

use thiserror::Error;

use crate::store::StoreError;
use crate::transform::TransformError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("content store: {0}")]
    Store(#[from] StoreError),
    #[error("view geometry: {0}")]
    Transform(#[from] TransformError),
}
