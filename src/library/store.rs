//! Persistent book store backed by a JSON array.
//!
//! The store is a flat list of [`BookRecord`]s kept in memory and written
//! back as a whole on [`BookStore::save`]. Lookup is a linear scan by exact
//! title; titles are not required to be unique, the first match wins.

use std::path::{Path, PathBuf};

use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::{BookPatch, BookRecord};

/// How the store contents were obtained when it was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Parsed from an existing file.
    Loaded(usize),
    /// No file yet.
    Missing,
    /// The file exists but is not a JSON array of books.
    Corrupt,
}

/// Ordered, in-memory list of books with its backing file.
pub struct BookStore {
    path: PathBuf,
    books: Vec<BookRecord>,
    state: LoadState,
}

impl BookStore {
    /// Open the store at `path`.
    ///
    /// A missing file and a file that fails to parse both yield an empty
    /// store. Read errors other than "not found" are reported.
    pub fn open(path: &Path) -> LibraryResult<Self> {
        let path = path.to_path_buf();

        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no book store yet, starting empty");
                return Ok(Self {
                    path,
                    books: Vec::new(),
                    state: LoadState::Missing,
                });
            }
            Err(e) => {
                return Err(LibraryError::StoreIo {
                    message: format!("read {}: {e}", path.display()),
                });
            }
        };

        let (books, state) = match serde_json::from_str::<Vec<BookRecord>>(&data) {
            Ok(books) => {
                let n = books.len();
                tracing::info!(path = %path.display(), count = n, "book store loaded");
                (books, LoadState::Loaded(n))
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "book store is not valid JSON, starting empty"
                );
                (Vec::new(), LoadState::Corrupt)
            }
        };

        Ok(Self { path, books, state })
    }

    /// Write all records to disk as an indented JSON array.
    pub fn save(&self) -> LibraryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| LibraryError::StoreIo {
                message: format!("create dir {}: {e}", parent.display()),
            })?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(&self.books, &mut ser).map_err(|e| {
            LibraryError::StoreIo {
                message: format!("serialize store: {e}"),
            }
        })?;

        std::fs::write(&self.path, buf).map_err(|e| LibraryError::StoreIo {
            message: format!("write {}: {e}", self.path.display()),
        })?;
        tracing::info!(path = %self.path.display(), count = self.books.len(), "book store saved");
        Ok(())
    }

    /// Append a record and return it. Only the title is checked for presence.
    pub fn add(&mut self, record: BookRecord) -> LibraryResult<&BookRecord> {
        if record.title.trim().is_empty() {
            return Err(LibraryError::MissingField { field: "title" });
        }
        let idx = self.books.len();
        self.books.push(record);
        Ok(&self.books[idx])
    }

    /// First book whose title matches exactly.
    pub fn find(&self, title: &str) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.title == title)
    }

    /// Apply `patch` to the first book titled `title`.
    pub fn update(&mut self, title: &str, patch: &BookPatch) -> LibraryResult<&BookRecord> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.title == title)
            .ok_or_else(|| LibraryError::BookNotFound {
                title: title.into(),
            })?;
        patch.apply(book);
        Ok(&*book)
    }

    /// Remove the first book titled `title` and return it.
    pub fn remove(&mut self, title: &str) -> LibraryResult<BookRecord> {
        let pos = self
            .books
            .iter()
            .position(|b| b.title == title)
            .ok_or_else(|| LibraryError::BookNotFound {
                title: title.into(),
            })?;
        Ok(self.books.remove(pos))
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Path of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How the store was loaded.
    pub fn load_state(&self) -> LoadState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str) -> BookRecord {
        BookRecord {
            title: title.into(),
            author: author.into(),
            year: "2001".into(),
            file_path: format!("books/{title}.pdf"),
        }
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = BookStore::open(&dir.path().join("books.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.load_state(), LoadState::Missing);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("books.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = BookStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.load_state(), LoadState::Corrupt);
    }

    #[test]
    fn record_missing_a_field_is_corrupt() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("books.json");
        std::fs::write(&path, r#"[{"title": "A", "author": "B", "year": "1"}]"#).unwrap();

        let store = BookStore::open(&path).unwrap();
        assert_eq!(store.load_state(), LoadState::Corrupt);
    }

    #[test]
    fn add_and_find() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = BookStore::open(&dir.path().join("books.json")).unwrap();
        store.add(book("Dune", "Herbert")).unwrap();
        store.add(book("Emma", "Austen")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.find("Emma").unwrap().author, "Austen");
        assert!(store.find("emma").is_none());
    }

    #[test]
    fn blank_title_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = BookStore::open(&dir.path().join("books.json")).unwrap();
        let err = store.add(book("  ", "Nobody")).unwrap_err();
        assert!(matches!(err, LibraryError::MissingField { field: "title" }));
    }

    #[test]
    fn duplicate_titles_allowed_first_match_wins() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = BookStore::open(&dir.path().join("books.json")).unwrap();
        store.add(book("Twin", "First")).unwrap();
        store.add(book("Twin", "Second")).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.find("Twin").unwrap().author, "First");

        let removed = store.remove("Twin").unwrap();
        assert_eq!(removed.author, "First");
        assert_eq!(store.find("Twin").unwrap().author, "Second");
    }

    #[test]
    fn add_returns_the_appended_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = BookStore::open(&dir.path().join("books.json")).unwrap();
        store.add(book("Twin", "First")).unwrap();

        let added = store.add(book("Twin", "Second")).unwrap();
        assert_eq!(added.author, "Second");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_applies_patch() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = BookStore::open(&dir.path().join("books.json")).unwrap();
        store.add(book("Dune", "Herbert")).unwrap();

        let patch = BookPatch {
            title: Some("Dune Messiah".into()),
            year: Some("1969".into()),
            ..Default::default()
        };
        let updated = store.update("Dune", &patch).unwrap();
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.year, "1969");
        assert_eq!(updated.author, "Herbert");
        assert!(store.find("Dune").is_none());
    }

    #[test]
    fn update_and_remove_unknown_title() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = BookStore::open(&dir.path().join("books.json")).unwrap();
        let err = store.update("Ghost", &BookPatch::default()).unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound { .. }));
        let err = store.remove("Ghost").unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound { .. }));
    }

    #[test]
    fn save_writes_indented_array() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("books.json");
        let mut store = BookStore::open(&path).unwrap();
        store.add(book("Dune", "Herbert")).unwrap();
        store.save().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n    {"));
        assert!(raw.contains("\"file_path\": \"books/Dune.pdf\""));
    }

    #[test]
    fn changes_are_not_persisted_until_save() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("books.json");

        {
            let mut store = BookStore::open(&path).unwrap();
            store.add(book("Unsaved", "Nobody")).unwrap();
        }
        assert!(!path.exists());

        {
            let mut store = BookStore::open(&path).unwrap();
            store.add(book("Saved", "Somebody")).unwrap();
            store.save().unwrap();
        }

        let store = BookStore::open(&path).unwrap();
        assert_eq!(store.load_state(), LoadState::Loaded(1));
        assert_eq!(store.list()[0].title, "Saved");
    }
}
