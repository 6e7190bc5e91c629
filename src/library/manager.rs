//! High-level library operations: add, edit, view, remove, save, export and
//! read books.
//!
//! [`Library`] ties the [`BookStore`] to the configured directories, a
//! [`Fetcher`] for downloads and a [`PageOcr`] engine for scanned PDFs.

use std::path::{Path, PathBuf};

use crate::config::LibraryConfig;
use crate::extract::{self, ExtractedText, NoOcr, PageOcr, TesseractOcr};
use crate::library::error::{LibraryError, LibraryResult};
use crate::library::export;
use crate::library::fetch::{self, Fetcher, HttpFetcher};
use crate::library::model::{BookPatch, BookRecord, NewBook};
use crate::library::store::BookStore;

/// Result of reading a book.
#[derive(Debug)]
pub struct ReadOutcome {
    /// The record that was read.
    pub book: BookRecord,
    /// Extracted text and page statistics.
    pub extracted: ExtractedText,
    /// Where the text was written.
    pub text_file: PathBuf,
}

/// A book store plus everything needed to fill and read it.
pub struct Library {
    store: BookStore,
    books_dir: PathBuf,
    output_dir: PathBuf,
    fetcher: Box<dyn Fetcher>,
    ocr: Box<dyn PageOcr>,
}

impl Library {
    /// Open the library described by `config` with the HTTP fetcher and,
    /// unless disabled, the tesseract OCR pipeline.
    pub fn open(config: &LibraryConfig) -> LibraryResult<Self> {
        let ocr: Box<dyn PageOcr> = if config.ocr.enabled {
            Box::new(TesseractOcr::new(&config.ocr))
        } else {
            Box::new(NoOcr)
        };
        Self::with_backends(config, Box::new(HttpFetcher::new(&config.http)), ocr)
    }

    /// Open the library with explicit download and OCR backends.
    pub fn with_backends(
        config: &LibraryConfig,
        fetcher: Box<dyn Fetcher>,
        ocr: Box<dyn PageOcr>,
    ) -> LibraryResult<Self> {
        let store = BookStore::open(&config.store_file)?;
        Ok(Self {
            store,
            books_dir: config.books_dir.clone(),
            output_dir: config.output_dir.clone(),
            fetcher,
            ocr,
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &BookStore {
        &self.store
    }

    /// Validate the URL, download the book and record it.
    pub fn add_book(&mut self, new: NewBook) -> LibraryResult<&BookRecord> {
        if new.title.trim().is_empty() {
            return Err(LibraryError::MissingField { field: "title" });
        }
        let url = fetch::validate_url(&new.url)?;
        let path = fetch::download_book(self.fetcher.as_ref(), &url, &self.books_dir, &new.title)?;

        let added = self.store.add(BookRecord {
            title: new.title,
            author: new.author,
            year: new.year,
            file_path: path.display().to_string(),
        })?;
        tracing::info!(title = %added.title, path = %added.file_path, "book added");
        Ok(added)
    }

    /// Update the first book titled `title`.
    pub fn edit_book(&mut self, title: &str, patch: &BookPatch) -> LibraryResult<&BookRecord> {
        let updated = self.store.update(title, patch)?;
        tracing::info!(title, new_title = %updated.title, "book updated");
        Ok(updated)
    }

    /// All books in store order.
    pub fn view_books(&self) -> &[BookRecord] {
        self.store.list()
    }

    /// First book titled `title`.
    pub fn find_book(&self, title: &str) -> LibraryResult<&BookRecord> {
        self.store.find(title).ok_or_else(|| LibraryError::BookNotFound {
            title: title.into(),
        })
    }

    /// Remove the first book titled `title`. The downloaded file is kept.
    pub fn remove_book(&mut self, title: &str) -> LibraryResult<BookRecord> {
        let removed = self.store.remove(title)?;
        tracing::info!(title, "book removed");
        Ok(removed)
    }

    /// Persist the store.
    pub fn save(&self) -> LibraryResult<()> {
        self.store.save()
    }

    /// Export the current records as CSV.
    pub fn export_csv(&self, path: &Path) -> LibraryResult<usize> {
        export::export_csv(self.store.list(), path)
    }

    /// Extract the text of a book and write it to `{output_dir}/{title}.txt`.
    pub fn read_book(&self, title: &str) -> LibraryResult<ReadOutcome> {
        let book = self.find_book(title)?.clone();
        let file = Path::new(&book.file_path);

        let format = book.format().ok_or_else(|| LibraryError::UnsupportedFormat {
            title: book.title.clone(),
            path: book.file_path.clone(),
        })?;
        if !file.is_file() {
            return Err(LibraryError::BookFileMissing {
                path: book.file_path.clone(),
            });
        }

        let extracted = extract::extract_text(file, format, self.ocr.as_ref())?;
        if !extracted.unreadable_pages.is_empty() {
            tracing::warn!(
                title = %book.title,
                pages = ?extracted.unreadable_pages,
                "some pages have no recoverable text"
            );
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| LibraryError::Io { source: e })?;
        let text_file = self.output_dir.join(text_file_name(&book.title));
        std::fs::write(&text_file, &extracted.text).map_err(|e| LibraryError::Io { source: e })?;
        tracing::info!(title = %book.title, path = %text_file.display(), "text written");

        Ok(ReadOutcome {
            book,
            extracted,
            text_file,
        })
    }
}

/// `{title}.txt`, with characters that would escape the output directory
/// replaced.
pub fn text_file_name(title: &str) -> String {
    let safe: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    match safe.as_str() {
        "" | "." | ".." => "book.txt".into(),
        _ => format!("{safe}.txt"),
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::extract::docx::tests::docx_with_body;
    use crate::extract::ExtractResult;

    struct StaticFetcher(Vec<u8>);

    impl Fetcher for StaticFetcher {
        fn fetch(&self, _url: &Url) -> LibraryResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    struct FailingFetcher;

    impl Fetcher for FailingFetcher {
        fn fetch(&self, url: &Url) -> LibraryResult<Vec<u8>> {
            Err(LibraryError::FetchError {
                url: url.to_string(),
                message: "status 404".into(),
            })
        }
    }

    struct PanicOcr;

    impl PageOcr for PanicOcr {
        fn recognize_page(&self, _pdf: &Path, _page: usize) -> ExtractResult<String> {
            panic!("OCR not expected");
        }
    }

    fn config(dir: &Path) -> LibraryConfig {
        LibraryConfig {
            store_file: dir.join("books.json"),
            books_dir: dir.join("books"),
            output_dir: dir.join("out"),
            csv_file: dir.join("books.csv"),
            ..LibraryConfig::default()
        }
    }

    fn library(dir: &Path, body: Vec<u8>) -> Library {
        Library::with_backends(&config(dir), Box::new(StaticFetcher(body)), Box::new(PanicOcr))
            .unwrap()
    }

    fn new_book(title: &str, url: &str) -> NewBook {
        NewBook {
            title: title.into(),
            author: "Anon".into(),
            year: "2020".into(),
            url: url.into(),
        }
    }

    #[test]
    fn add_downloads_and_records() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut lib = library(dir.path(), b"bytes".to_vec());

        let added = lib
            .add_book(new_book("Notes", "https://example.org/files/notes.docx"))
            .unwrap()
            .clone();
        let expected = dir.path().join("books").join("notes.docx");
        assert_eq!(added.file_path, expected.display().to_string());
        assert_eq!(std::fs::read(&expected).unwrap(), b"bytes");
        assert_eq!(lib.view_books().len(), 1);
    }

    #[test]
    fn add_with_invalid_url_records_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut lib = library(dir.path(), Vec::new());
        let err = lib.add_book(new_book("Bad", "not-a-url")).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidUrl { .. }));
        assert!(lib.view_books().is_empty());
        assert!(!dir.path().join("books").exists());
    }

    #[test]
    fn failed_download_records_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut lib =
            Library::with_backends(&config(dir.path()), Box::new(FailingFetcher), Box::new(NoOcr))
                .unwrap();
        let err = lib
            .add_book(new_book("Gone", "https://example.org/gone.pdf"))
            .unwrap_err();
        assert!(matches!(err, LibraryError::FetchError { .. }));
        assert!(lib.view_books().is_empty());
    }

    #[test]
    fn read_docx_writes_text_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let docx = docx_with_body(
            r#"<w:p><w:r><w:t>Chapter 1</w:t></w:r></w:p><w:p><w:r><w:t>It was a dark night.</w:t></w:r></w:p>"#,
        );
        let mut lib = library(dir.path(), docx);
        lib.add_book(new_book("Dark/Night", "https://example.org/dark.docx"))
            .unwrap();

        let outcome = lib.read_book("Dark/Night").unwrap();
        assert_eq!(outcome.extracted.text, "Chapter 1\nIt was a dark night.");
        assert_eq!(outcome.extracted.page_count, None);
        assert_eq!(outcome.text_file, dir.path().join("out").join("Dark_Night.txt"));
        assert_eq!(
            std::fs::read_to_string(&outcome.text_file).unwrap(),
            "Chapter 1\nIt was a dark night."
        );
    }

    #[test]
    fn read_unknown_title() {
        let dir = tempfile::TempDir::new().unwrap();
        let lib = library(dir.path(), Vec::new());
        let err = lib.read_book("Nope").unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound { .. }));
    }

    #[test]
    fn read_unsupported_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut lib = library(dir.path(), b"EPUB".to_vec());
        lib.add_book(new_book("Novel", "https://example.org/novel.epub"))
            .unwrap();
        let err = lib.read_book("Novel").unwrap_err();
        assert!(matches!(err, LibraryError::UnsupportedFormat { .. }));
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut lib = library(dir.path(), b"x".to_vec());
        lib.add_book(new_book("Lost", "https://example.org/lost.pdf"))
            .unwrap();
        std::fs::remove_file(dir.path().join("books").join("lost.pdf")).unwrap();

        let err = lib.read_book("Lost").unwrap_err();
        assert!(matches!(err, LibraryError::BookFileMissing { .. }));
    }

    #[test]
    fn edit_remove_and_find() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut lib = library(dir.path(), b"x".to_vec());
        lib.add_book(new_book("Old", "https://example.org/old.pdf"))
            .unwrap();

        let patch = BookPatch {
            title: Some("New".into()),
            ..Default::default()
        };
        assert_eq!(lib.edit_book("Old", &patch).unwrap().title, "New");
        assert!(lib.find_book("Old").is_err());
        assert_eq!(lib.find_book("New").unwrap().author, "Anon");

        lib.remove_book("New").unwrap();
        assert!(lib.view_books().is_empty());
        // Removing a record keeps the downloaded file.
        assert!(dir.path().join("books").join("old.pdf").exists());
    }

    #[test]
    fn save_then_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        {
            let mut lib = library(dir.path(), b"x".to_vec());
            lib.add_book(new_book("Kept", "https://example.org/kept.pdf"))
                .unwrap();
            lib.save().unwrap();
        }
        let lib = library(dir.path(), Vec::new());
        assert_eq!(lib.view_books().len(), 1);
        assert_eq!(lib.view_books()[0].title, "Kept");
    }

    #[test]
    fn text_file_names() {
        assert_eq!(text_file_name("Dune"), "Dune.txt");
        assert_eq!(text_file_name("a/b\\c"), "a_b_c.txt");
        assert_eq!(text_file_name(".."), "book.txt");
        assert_eq!(text_file_name("  "), "book.txt");
    }
}
