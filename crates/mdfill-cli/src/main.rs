//! `mdfill` — backfill a text column from the files a SQLite table points at.
//!
//! # Usage
//!
//! ```
//! mdfill --db notes.db --table documents
//! mdfill --db notes.db --table documents --content-col body --encoding shift_jis
//! mdfill --db notes.db --table documents --config mdfill.toml
//! ```
//!
//! Prints `processed: N`, plus `warning: missing: M` when some paths could
//! not be read. Logs go to stderr; set `RUST_LOG=debug` to see each skipped
//! row.

mod settings;

use anyhow::Context as _;
use clap::Parser;
use mdfill_store_sqlite::SqliteStore;
use settings::{Args, FileConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg = match &args.config {
    Some(path) => FileConfig::load(path)?,
    None => FileConfig::default(),
  };
  let options = settings::resolve(&args, file_cfg);
  let db_path = settings::expand_tilde(&args.db);
  tracing::info!(db = %db_path.display(), table = %options.table, "starting backfill");

  let store = SqliteStore::open(&db_path, options.clone())
    .await
    .with_context(|| format!("failed to open database at {}", db_path.display()))?;

  // Close the connection whether or not the run succeeded.
  let outcome = mdfill_core::runner::run(&store, &options).await;
  let closed = store.close().await;

  let report = outcome
    .with_context(|| format!("backfill of table {:?} failed", options.table))?;
  closed.context("failed to close database")?;

  for line in report.summary_lines() {
    println!("{line}");
  }
  Ok(())
}
