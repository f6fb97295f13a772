//! SQL text for one backfill run.
//!
//! Table and column names are interpolated with [`quote_ident`]; values are
//! always bound.

use mdfill_core::{BackfillOptions, ident::quote_ident};

/// Applied at open unless fast pragmas are disabled.
pub const FAST_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
";

/// Column names of a table, in declaration order.
pub const TABLE_COLUMNS: &str = "SELECT name FROM pragma_table_info(?1)";

/// Names that address the implicit rowid; never listed by `table_info`.
pub const ROWID_ALIASES: [&str; 3] = ["rowid", "oid", "_rowid_"];

#[derive(Debug)]
pub struct Statements {
  pub add_column:     String,
  pub select_pending: String,
  pub update:         String,
}

impl Statements {
  pub fn new(options: &BackfillOptions) -> Self {
    let table   = quote_ident(&options.table);
    let path    = quote_ident(&options.path_column);
    let content = quote_ident(&options.content_column);
    let id      = quote_ident(&options.id_column);

    Self {
      add_column:     format!("ALTER TABLE {table} ADD COLUMN {content} TEXT"),
      select_pending: format!(
        "SELECT {id}, {path} FROM {table} \
         WHERE {content} IS NULL AND {path} IS NOT NULL AND {path} <> ''"
      ),
      update:         format!("UPDATE {table} SET {content} = ?1 WHERE {id} = ?2"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_statements() {
    let s = Statements::new(&BackfillOptions::new("documents"));
    assert_eq!(
      s.add_column,
      "ALTER TABLE \"documents\" ADD COLUMN \"md_content\" TEXT"
    );
    assert_eq!(
      s.select_pending,
      "SELECT \"id\", \"path\" FROM \"documents\" WHERE \"md_content\" IS NULL \
       AND \"path\" IS NOT NULL AND \"path\" <> ''"
    );
    assert_eq!(
      s.update,
      "UPDATE \"documents\" SET \"md_content\" = ?1 WHERE \"id\" = ?2"
    );
  }

  #[test]
  fn quotes_are_doubled_in_every_statement() {
    let o = BackfillOptions {
      content_column: "body\"x".into(),
      ..BackfillOptions::new("t\"1")
    };
    let s = Statements::new(&o);
    assert!(s.add_column.contains("\"t\"\"1\""));
    assert!(s.add_column.contains("\"body\"\"x\""));
    assert!(s.update.starts_with("UPDATE \"t\"\"1\" SET \"body\"\"x\""));
  }
}
