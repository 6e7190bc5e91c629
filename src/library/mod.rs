//! Personal book catalog.
//!
//! Books are flat records (title, author, year, file path) kept in an
//! ordered list and persisted as a single JSON array. Book files are
//! downloaded from URLs into a books directory and can be read back as
//! plain text through the `extract` module.

pub mod error;
pub mod export;
pub mod fetch;
pub mod manager;
pub mod model;
pub mod store;

pub use error::{LibraryError, LibraryResult};
pub use fetch::{Fetcher, HttpFetcher};
pub use manager::{Library, ReadOutcome};
pub use model::{BookPatch, BookRecord, ContentFormat, NewBook};
pub use store::{BookStore, LoadState};
