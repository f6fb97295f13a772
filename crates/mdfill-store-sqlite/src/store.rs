//! [`SqliteStore`] — the SQLite implementation of [`BackfillStore`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use mdfill_core::{BackfillOptions, BackfillStore, PendingRow};
use rusqlite::types::{Value, ValueRef};

use crate::{
  Error, Result,
  sql::{FAST_PRAGMAS, ROWID_ALIASES, Statements, TABLE_COLUMNS},
};

/// Outcome of inspecting the target table before the run.
enum SchemaCheck {
  NoTable,
  NoColumn(String),
  ContentPresent,
  ContentAdded,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// One target table in a SQLite file, opened for a single backfill run.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  options: Arc<BackfillOptions>,
  sql:     Arc<Statements>,
}

impl SqliteStore {
  /// Open the database at `path` for backfilling the table named in
  /// `options`. Options are validated before the file is touched.
  pub async fn open(path: impl AsRef<Path>, options: BackfillOptions) -> Result<Self> {
    options.validate()?;
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, options).await
  }

  /// Open an in-memory database — useful for testing.
  pub async fn open_in_memory(options: BackfillOptions) -> Result<Self> {
    options.validate()?;
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, options).await
  }

  async fn init(conn: tokio_rusqlite::Connection, options: BackfillOptions) -> Result<Self> {
    if options.fast_pragmas {
      conn
        .call(|conn| {
          conn.execute_batch(FAST_PRAGMAS)?;
          Ok(())
        })
        .await?;
    }

    let sql = Statements::new(&options);
    Ok(Self {
      conn,
      options: Arc::new(options),
      sql: Arc::new(sql),
    })
  }

  /// Run arbitrary SQL against the connection. Used to seed fixtures.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: impl Into<String>) -> Result<()> {
    let sql = sql.into();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the connection. An open transaction is rolled back.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── BackfillStore impl ──────────────────────────────────────────────────────

impl BackfillStore for SqliteStore {
  type Id = Value;
  type Error = Error;

  async fn ensure_content_column(&self) -> Result<bool> {
    let table      = self.options.table.clone();
    let path_col   = self.options.path_column.clone();
    let id_col     = self.options.id_column.clone();
    let content    = self.options.content_column.clone();
    let add_column = self.sql.add_column.clone();

    let check = self
      .conn
      .call(move |conn| {
        let columns = {
          let mut stmt = conn.prepare(TABLE_COLUMNS)?;
          let rows = stmt.query_map(rusqlite::params![table], |row| row.get::<_, String>(0))?;
          rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        if columns.is_empty() {
          return Ok(SchemaCheck::NoTable);
        }

        // SQLite compares identifiers case-insensitively.
        let has = |name: &str| columns.iter().any(|c| c.eq_ignore_ascii_case(name));
        let is_rowid = ROWID_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(&id_col));

        if !has(&path_col) {
          return Ok(SchemaCheck::NoColumn(path_col));
        }
        if !has(&id_col) && !is_rowid {
          return Ok(SchemaCheck::NoColumn(id_col));
        }
        if has(&content) {
          return Ok(SchemaCheck::ContentPresent);
        }

        conn.execute(&add_column, [])?;
        Ok(SchemaCheck::ContentAdded)
      })
      .await?;

    match check {
      SchemaCheck::NoTable => Err(Error::TableNotFound(self.options.table.clone())),
      SchemaCheck::NoColumn(column) => Err(Error::ColumnNotFound {
        table: self.options.table.clone(),
        column,
      }),
      SchemaCheck::ContentPresent => Ok(false),
      SchemaCheck::ContentAdded => Ok(true),
    }
  }

  async fn pending_rows(&self) -> Result<Vec<PendingRow<Value>>> {
    let sql = Arc::clone(&self.sql);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql.select_pending)?;
        let rows = stmt.query_map([], |row| {
          let path = match row.get_ref(1)? {
            ValueRef::Text(bytes) => {
              Some(PathBuf::from(String::from_utf8_lossy(bytes).into_owned()))
            }
            _ => None,
          };
          Ok(PendingRow { id: row.get::<_, Value>(0)?, path })
        })?;
        let rows = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn write_content(&self, id: Value, text: String) -> Result<()> {
    let sql = Arc::clone(&self.sql);

    self
      .conn
      .call(move |conn| {
        if conn.is_autocommit() {
          conn.execute_batch("BEGIN")?;
        }
        conn.execute(&sql.update, rusqlite::params![text, id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn commit(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        if !conn.is_autocommit() {
          conn.execute_batch("COMMIT")?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }
}
