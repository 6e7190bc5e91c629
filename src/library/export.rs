//! CSV export of the book store.

use std::path::Path;

use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::BookRecord;

/// Write `books` to `path` as CSV with a `title,author,year,file_path`
/// header. Returns the number of data rows written.
pub fn export_csv(books: &[BookRecord], path: &Path) -> LibraryResult<usize> {
    let failed = |message: String| LibraryError::ExportFailed {
        path: path.display().to_string(),
        message,
    };

    let mut writer = csv::Writer::from_path(path).map_err(|e| failed(e.to_string()))?;
    if books.is_empty() {
        // serialize() only emits the header together with the first row.
        writer
            .write_record(["title", "author", "year", "file_path"])
            .map_err(|e| failed(e.to_string()))?;
    }
    for book in books {
        writer.serialize(book).map_err(|e| failed(e.to_string()))?;
    }
    writer.flush().map_err(|e| failed(e.to_string()))?;

    tracing::info!(path = %path.display(), rows = books.len(), "exported CSV");
    Ok(books.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_in_store_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("books.csv");
        let books = vec![
            BookRecord {
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                year: "1965".into(),
                file_path: "books/dune.pdf".into(),
            },
            BookRecord {
                title: "War, and Peace".into(),
                author: "Tolstoy".into(),
                year: "1869".into(),
                file_path: "books/wp.docx".into(),
            },
        ];

        assert_eq!(export_csv(&books, &path).unwrap(), 2);
        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "title,author,year,file_path");
        assert_eq!(lines[1], "Dune,Frank Herbert,1965,books/dune.pdf");
        assert_eq!(lines[2], "\"War, and Peace\",Tolstoy,1869,books/wp.docx");
    }

    #[test]
    fn empty_store_writes_header_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        assert_eq!(export_csv(&[], &path).unwrap(), 0);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "title,author,year,file_path\n"
        );
    }

    #[test]
    fn unwritable_destination_is_export_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("books.csv");
        let err = export_csv(&[], &path).unwrap_err();
        assert!(matches!(err, LibraryError::ExportFailed { .. }));
    }
}
