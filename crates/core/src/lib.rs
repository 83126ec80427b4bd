//! Domain rules for the book catalog: validation, error taxonomy, and
//! the on-disk file store for uploaded books.

pub mod catalog;
pub mod error;
pub mod store;
pub mod types;
