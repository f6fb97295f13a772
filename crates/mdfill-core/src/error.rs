//! Error types for `mdfill-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Empty identifiers, or ones containing NUL, cannot be quoted into a
  /// well-formed statement.
  #[error("invalid identifier {0:?}")]
  InvalidIdentifier(String),

  #[error("batch size must be at least 1")]
  InvalidBatchSize,

  #[error("unknown text encoding: {0:?}")]
  UnknownEncoding(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
