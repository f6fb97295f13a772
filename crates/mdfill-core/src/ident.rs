//! SQL identifier quoting.
//!
//! Table and column names cannot be bound as statement parameters, so they
//! are interpolated into the SQL text. The quoting rule is the standard one:
//! wrap in double quotes and double any embedded `"`. This does not make an
//! untrusted identifier safe; it only keeps a trusted one well-formed.

use crate::{Error, Result};

/// Quote `ident` for use as an SQL identifier.
pub fn quote_ident(ident: &str) -> String {
  format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Reject identifiers that would produce a malformed statement.
pub fn validate_ident(ident: &str) -> Result<()> {
  if ident.is_empty() || ident.contains('\0') {
    return Err(Error::InvalidIdentifier(ident.to_owned()));
  }
  Ok(())
}
