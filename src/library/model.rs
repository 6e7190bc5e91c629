//! Core data types for the book catalog.
//!
//! A book is a flat record of four strings. The serialized field names are
//! the on-disk format of `books.json` and the CSV header, so they must not
//! be renamed.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Book file formats that text can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentFormat {
    Pdf,
    Docx,
}

impl ContentFormat {
    /// Human-readable name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the content format from a file extension.
pub fn detect_format(path: &Path) -> Option<ContentFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(ContentFormat::Pdf),
        "docx" => Some(ContentFormat::Docx),
        _ => None,
    }
}

/// Persistent record for a book in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Title, used as the lookup key.
    pub title: String,
    /// Author as entered by the user.
    pub author: String,
    /// Publication date or year, kept verbatim.
    pub year: String,
    /// Local path of the downloaded book file.
    pub file_path: String,
}

impl BookRecord {
    /// Format of the book file, if it is one we can read.
    pub fn format(&self) -> Option<ContentFormat> {
        detect_format(Path::new(&self.file_path))
    }
}

impl std::fmt::Display for BookRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, " Author: {}", self.author)?;
        writeln!(f, " Publication Date: {}", self.year)?;
        write!(f, " File Path: {}", self.file_path)
    }
}

/// Input for adding a book: metadata plus the URL to download it from.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: String,
    pub url: String,
}

/// Partial update of a book record.
///
/// `None` and blank values leave the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
    pub file_path: Option<String>,
}

impl BookPatch {
    /// Apply the patch in place. Returns whether any field changed.
    pub fn apply(&self, record: &mut BookRecord) -> bool {
        let mut changed = false;
        for (value, field) in [
            (&self.title, &mut record.title),
            (&self.author, &mut record.author),
            (&self.year, &mut record.year),
            (&self.file_path, &mut record.file_path),
        ] {
            if let Some(new) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                if new != field.as_str() {
                    *field = new.to_string();
                    changed = true;
                }
            }
        }
        changed
    }

    /// Whether the patch carries no usable value.
    pub fn is_empty(&self) -> bool {
        [&self.title, &self.author, &self.year, &self.file_path]
            .iter()
            .all(|v| v.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BookRecord {
        BookRecord {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            year: "1965".into(),
            file_path: "books/dune.pdf".into(),
        }
    }

    #[test]
    fn detect_pdf_and_docx() {
        assert_eq!(detect_format(Path::new("a/b.pdf")), Some(ContentFormat::Pdf));
        assert_eq!(detect_format(Path::new("B.PDF")), Some(ContentFormat::Pdf));
        assert_eq!(detect_format(Path::new("notes.docx")), Some(ContentFormat::Docx));
    }

    #[test]
    fn detect_unknown() {
        assert_eq!(detect_format(Path::new("novel.epub")), None);
        assert_eq!(detect_format(Path::new("no_extension")), None);
        assert_eq!(detect_format(Path::new("legacy.doc")), None);
    }

    #[test]
    fn json_field_names_are_stable() {
        let json = serde_json::to_value(record()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 4);
        for key in ["title", "author", "year", "file_path"] {
            assert!(keys.contains(&key), "missing key {key}");
        }
    }

    #[test]
    fn patch_blank_fields_keep_current_value() {
        let mut rec = record();
        let patch = BookPatch {
            title: Some("   ".into()),
            author: Some("F. Herbert".into()),
            year: None,
            file_path: Some(String::new()),
        };
        assert!(patch.apply(&mut rec));
        assert_eq!(rec.title, "Dune");
        assert_eq!(rec.author, "F. Herbert");
        assert_eq!(rec.year, "1965");
        assert_eq!(rec.file_path, "books/dune.pdf");
    }

    #[test]
    fn patch_with_same_values_reports_no_change() {
        let mut rec = record();
        let patch = BookPatch {
            title: Some("Dune".into()),
            ..Default::default()
        };
        assert!(!patch.apply(&mut rec));
        assert!(BookPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn display_lists_all_fields() {
        let shown = record().to_string();
        assert!(shown.contains("Title: Dune"));
        assert!(shown.contains("Author: Frank Herbert"));
        assert!(shown.contains("Publication Date: 1965"));
        assert!(shown.contains("File Path: books/dune.pdf"));
    }
}
