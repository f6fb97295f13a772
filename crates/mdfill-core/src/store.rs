//! The `BackfillStore` trait: what the runner needs from a database.
//!
//! Implemented by storage backends (e.g. `mdfill-store-sqlite`). The runner
//! in [`crate::runner`] only ever talks to this abstraction.

use std::{fmt::Debug, future::Future, path::PathBuf};

/// A row selected for backfilling: content unset, path non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRow<Id> {
  pub id:   Id,
  /// `None` when the stored path value is not text.
  pub path: Option<PathBuf>,
}

/// Abstraction over the table being backfilled.
///
/// Writes are transactional: `write_content` opens a transaction when none
/// is open and `commit` closes it. Nothing is visible to other connections
/// until a commit.
pub trait BackfillStore: Send + Sync {
  /// Row identifier as read back from the table.
  type Id: Debug + Send + 'static;
  type Error: std::error::Error + From<crate::Error> + Send + Sync + 'static;

  /// Make sure the content column exists, adding it as nullable text if not.
  /// Returns `true` when the column was added.
  fn ensure_content_column(
    &self,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All rows whose content is null and whose path is neither null nor
  /// empty.
  fn pending_rows(
    &self,
  ) -> impl Future<Output = Result<Vec<PendingRow<Self::Id>>, Self::Error>> + Send + '_;

  /// Set the content of row `id`.
  fn write_content(
    &self,
    id: Self::Id,
    text: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Commit any open transaction. A no-op when nothing is pending.
  fn commit(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
