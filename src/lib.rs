// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # bibliotheca
//!
//! A personal library catalog: book metadata in a JSON-backed list, book
//! files downloaded from URLs, and plain-text extraction from PDF and DOCX
//! files with an OCR fallback for scanned PDF pages.
//!
//! ## Architecture
//!
//! - **Catalog** (`library`): book records, the JSON store, downloads, CSV export
//! - **Extraction** (`extract`): PDF text layer + tesseract OCR, DOCX paragraphs
//! - **Configuration** (`config`, `paths`): TOML config under XDG directories
//! - **Interactive mode** (`menu`): numbered menu loop
//!
//! ## Library usage
//!
//! ```no_run
//! use bibliotheca::config::LibraryConfig;
//! use bibliotheca::library::{Library, NewBook};
//!
//! let mut library = Library::open(&LibraryConfig::default()).unwrap();
//! library
//!     .add_book(NewBook {
//!         title: "Sample".into(),
//!         author: "Someone".into(),
//!         year: "2024".into(),
//!         url: "https://example.org/sample.pdf".into(),
//!     })
//!     .unwrap();
//! library.save().unwrap();
//! let outcome = library.read_book("Sample").unwrap();
//! println!("{}", outcome.extracted.text);
//! ```

pub mod config;
pub mod extract;
pub mod library;
pub mod menu;
pub mod paths;
