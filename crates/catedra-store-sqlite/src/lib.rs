//! SQLite backend for the Catedra catalog store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Cross-reference arrays and the
//! rating-statistics snapshot are stored as JSON text columns, mirroring the
//! document layout the catalog was originally designed around.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
