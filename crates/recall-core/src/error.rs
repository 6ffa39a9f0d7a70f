//! Error types for `recall-core`.

use thiserror::Error;

use crate::entity::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  /// A field the operation cannot proceed without was absent in the payload.
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  /// A strictly-resolved reference, or the target of an update, does not
  /// exist in its store.
  #[error("{kind} not found: {id}")]
  NotFound { kind: EntityKind, id: i64 },

  /// A failure reported by a store backend, passed through unmodified.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
