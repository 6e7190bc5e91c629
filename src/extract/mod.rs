//! Text extraction from book files.
//!
//! PDFs are read page by page from their text layer; pages without one are
//! handed to a [`PageOcr`] engine. DOCX files are read paragraph by
//! paragraph from the WordprocessingML body.

pub mod docx;
pub mod error;
pub mod ocr;
pub mod pdf;

use std::path::Path;

use crate::library::model::ContentFormat;

pub use error::{ExtractError, ExtractResult};
pub use ocr::{NoOcr, PageOcr, TesseractOcr};

/// Text recovered from a book file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Full text, pages or paragraphs in document order.
    pub text: String,
    /// Number of pages (PDF only).
    pub page_count: Option<usize>,
    /// 1-based pages whose text came from OCR.
    pub ocr_pages: Vec<usize>,
    /// 1-based pages that had no text layer and OCR could not recover.
    pub unreadable_pages: Vec<usize>,
}

/// Extract text from the file at `path`, interpreted as `format`.
pub fn extract_text(
    path: &Path,
    format: ContentFormat,
    ocr: &dyn PageOcr,
) -> ExtractResult<ExtractedText> {
    let data = std::fs::read(path).map_err(|e| ExtractError::Io { source: e })?;
    tracing::debug!(path = %path.display(), %format, bytes = data.len(), "extracting text");

    match format {
        ContentFormat::Pdf => pdf::extract(path, &data, ocr),
        ContentFormat::Docx => Ok(ExtractedText {
            text: docx::extract_paragraphs(&data)?.join("\n"),
            ..Default::default()
        }),
    }
}
