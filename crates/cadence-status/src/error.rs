use thiserror::Error;

use crate::authorizer::Denial;

/// Errors returned by status queries.
#[derive(Debug, Error)]
pub enum StatusError {
  /// Reading from storage failed. Retrying is up to the caller.
  #[error("storage read failed: {0}")]
  StorageRead(#[from] cadence_store::Error),

  /// The requested identity can not name a workflow instance.
  #[error("invalid workflow identity: {0}")]
  InvalidIdentity(#[from] cadence_model::KeyError),

  /// The authorizer rejected the request.
  #[error("authorization denied: {0}")]
  AuthorizationDenied(Denial),
}
