//! Merging command-line flags with the optional config file.
//!
//! Precedence: flag, then config file, then built-in default.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use mdfill_core::BackfillOptions;
use serde::Deserialize;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "mdfill",
  version,
  about = "Read the files referenced by a SQLite table into a text column"
)]
pub struct Args {
  /// SQLite database file (e.g. my.db).
  #[arg(long, value_name = "FILE")]
  pub db: PathBuf,

  /// Table to backfill.
  #[arg(long)]
  pub table: String,

  /// Column holding file paths [default: path].
  #[arg(long)]
  pub path_col: Option<String>,

  /// Column receiving file contents; added if absent [default: md_content].
  #[arg(long)]
  pub content_col: Option<String>,

  /// Row identifier column [default: id].
  #[arg(long)]
  pub id_col: Option<String>,

  /// Encoding of the files [default: utf-8].
  #[arg(long)]
  pub encoding: Option<String>,

  /// Writes between intermediate commits [default: 500].
  #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
  pub batch_size: Option<u64>,

  /// Store CRLF and CR line endings as found instead of converting to LF.
  #[arg(long)]
  pub keep_newlines: bool,

  /// Keep the database's journal mode and synchronous setting.
  #[arg(long)]
  pub no_fast_pragmas: bool,

  /// Optional TOML file supplying defaults for the flags above.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file. Every key is optional.
#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
  pub path_col:           Option<String>,
  pub content_col:        Option<String>,
  pub id_col:             Option<String>,
  pub encoding:           Option<String>,
  pub batch_size:         Option<u64>,
  pub normalize_newlines: Option<bool>,
  pub fast_pragmas:       Option<bool>,
}

impl FileConfig {
  /// Load `path`; unlike the flags, a named config file must exist.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .with_context(|| format!("invalid config file {}", path.display()))
  }
}

// ─── Resolution ───────────────────────────────────────────────────────────────

/// Combine `args` and `file` into run options.
pub fn resolve(args: &Args, file: FileConfig) -> BackfillOptions {
  let defaults = BackfillOptions::new(args.table.clone());

  BackfillOptions {
    path_column: args
      .path_col
      .clone()
      .or(file.path_col)
      .unwrap_or(defaults.path_column),
    content_column: args
      .content_col
      .clone()
      .or(file.content_col)
      .unwrap_or(defaults.content_column),
    id_column: args
      .id_col
      .clone()
      .or(file.id_col)
      .unwrap_or(defaults.id_column),
    encoding: args
      .encoding
      .clone()
      .or(file.encoding)
      .unwrap_or(defaults.encoding),
    batch_size: args
      .batch_size
      .or(file.batch_size)
      .unwrap_or(defaults.batch_size),
    normalize_newlines: !args.keep_newlines
      && file.normalize_newlines.unwrap_or(defaults.normalize_newlines),
    fast_pragmas: !args.no_fast_pragmas
      && file.fast_pragmas.unwrap_or(defaults.fast_pragmas),
    table: defaults.table,
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(argv: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("mdfill").chain(argv.iter().copied()))
      .expect("valid args")
  }

  #[test]
  fn defaults_match_the_documented_flags() {
    let args = parse(&["--db", "x.db", "--table", "documents"]);
    let o = resolve(&args, FileConfig::default());
    assert_eq!(o, BackfillOptions::new("documents"));
  }

  #[test]
  fn db_and_table_are_required() {
    assert!(Args::try_parse_from(["mdfill", "--table", "t"]).is_err());
    assert!(Args::try_parse_from(["mdfill", "--db", "x.db"]).is_err());
  }

  #[test]
  fn zero_batch_size_is_rejected_by_the_parser() {
    assert!(
      Args::try_parse_from(["mdfill", "--db", "x", "--table", "t", "--batch-size", "0"])
        .is_err()
    );
  }

  #[test]
  fn flags_override_file_which_overrides_defaults() {
    let args = parse(&[
      "--db", "x.db", "--table", "t", "--content-col", "body", "--batch-size", "7",
    ]);
    let file = FileConfig {
      content_col: Some("from_file".into()),
      encoding: Some("shift_jis".into()),
      batch_size: Some(50),
      fast_pragmas: Some(false),
      ..FileConfig::default()
    };

    let o = resolve(&args, file);

    assert_eq!(o.content_column, "body");
    assert_eq!(o.batch_size, 7);
    assert_eq!(o.encoding, "shift_jis");
    assert_eq!(o.path_column, "path");
    assert!(!o.fast_pragmas);
  }

  #[test]
  fn boolean_flags() {
    let args = parse(&[
      "--db", "x.db", "--table", "t", "--keep-newlines", "--no-fast-pragmas",
    ]);
    let o = resolve(&args, FileConfig::default());
    assert!(!o.normalize_newlines);
    assert!(!o.fast_pragmas);
  }

  #[test]
  fn config_file_can_turn_off_newline_normalization() {
    let args = parse(&["--db", "x.db", "--table", "t"]);
    let file = FileConfig { normalize_newlines: Some(false), ..FileConfig::default() };
    assert!(!resolve(&args, file).normalize_newlines);

    let o = resolve(&args, FileConfig::default());
    assert!(o.normalize_newlines);
  }

  #[test]
  fn loads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mdfill.toml");
    std::fs::write(
      &path,
      "content_col = \"body\"\nbatch_size = 100\nnormalize_newlines = false\n",
    )
    .unwrap();

    let file = FileConfig::load(&path).unwrap();

    assert_eq!(
      file,
      FileConfig {
        content_col: Some("body".into()),
        batch_size: Some(100),
        normalize_newlines: Some(false),
        ..FileConfig::default()
      }
    );
  }

  #[test]
  fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(FileConfig::load(&dir.path().join("absent.toml")).is_err());
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/a.db")), PathBuf::from(home).join("a.db"));
    assert_eq!(expand_tilde(Path::new("/abs/a.db")), PathBuf::from("/abs/a.db"));
  }
}
