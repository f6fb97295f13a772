//! Run summary.

/// Counts gathered over one backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
  /// Rows whose content was written.
  pub processed: u64,
  /// Rows skipped because their file could not be read.
  pub missing:   u64,
  /// Intermediate commits plus the final one.
  pub commits:   u64,
}

impl Report {
  /// Lines printed at the end of a run. The warning line only appears when
  /// something was skipped.
  pub fn summary_lines(&self) -> Vec<String> {
    let mut lines = vec![format!("processed: {}", self.processed)];
    if self.missing > 0 {
      lines.push(format!("warning: missing: {}", self.missing));
    }
    lines
  }
}
