//! The backfill loop.

use tracing::{debug, info};

use crate::{
  BackfillOptions, Report,
  decode::TextDecoder,
  store::{BackfillStore, PendingRow},
};

/// Fill the content column for every pending row of `store`.
///
/// Rows are handled one at a time, in selection order. A row whose file
/// cannot be read is counted in [`Report::missing`] and left untouched. Any
/// store error aborts the run; batches committed before it stay committed.
pub async fn run<S>(store: &S, options: &BackfillOptions) -> Result<Report, S::Error>
where
  S: BackfillStore,
{
  options.validate()?;
  let decoder = TextDecoder::for_label(&options.encoding)?
    .with_newline_normalization(options.normalize_newlines);

  if store.ensure_content_column().await? {
    info!(
      table = %options.table,
      column = %options.content_column,
      "added content column"
    );
  }

  let rows = store.pending_rows().await?;
  info!(
    rows = rows.len(),
    encoding = decoder.name(),
    batch_size = options.batch_size,
    "selected rows without content"
  );

  let mut report = Report::default();
  for PendingRow { id, path } in rows {
    let Some(path) = path else {
      debug!(?id, "path value is not text; skipping");
      report.missing += 1;
      continue;
    };

    let text = match decoder.read_file(&path).await {
      Ok(text) => text,
      Err(e) => {
        debug!(?id, path = %path.display(), error = %e, "unreadable path; skipping");
        report.missing += 1;
        continue;
      }
    };

    store.write_content(id, text).await?;
    report.processed += 1;

    if report.processed % options.batch_size == 0 {
      store.commit().await?;
      report.commits += 1;
      debug!(processed = report.processed, "committed batch");
    }
  }

  store.commit().await?;
  report.commits += 1;

  info!(
    processed = report.processed,
    missing = report.missing,
    commits = report.commits,
    "backfill finished"
  );
  Ok(report)
}
