//! Domain types, name folding, and the [`store::CatalogStore`] trait for
//! the Catedra professor-rating catalog.
//!
//! Everything here is storage- and transport-agnostic; the SQLite backend
//! and the HTTP layer live in sibling crates and depend on this one.

// Native async-in-trait, with explicit `Send` bounds on the returned
// futures where the trait spells them out.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod error;
pub mod faculty;
pub mod name;
pub mod professor;
pub mod rating;
pub mod report;
pub mod store;
pub mod subject;

pub use error::{Error, Result};
