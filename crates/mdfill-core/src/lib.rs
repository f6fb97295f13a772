//! Backend-independent pieces of the `mdfill` backfill tool.
//!
//! The runner loop lives here and is written against the [`BackfillStore`]
//! trait; concrete databases live in their own crates (e.g.
//! `mdfill-store-sqlite`).

pub mod decode;
pub mod error;
pub mod ident;
pub mod options;
pub mod report;
pub mod runner;
pub mod store;

pub use error::{Error, Result};
pub use options::BackfillOptions;
pub use report::Report;
pub use store::{BackfillStore, PendingRow};
