//! PDF text extraction using the `pdf-extract` crate, with per-page OCR.
//!
//! `pdf-extract` yields one string per page. A page whose string is blank
//! after trimming has no usable text layer (typically a scan), so it is
//! sent through the OCR engine instead.

use std::path::Path;

use crate::extract::error::{ExtractError, ExtractResult};
use crate::extract::ocr::PageOcr;
use crate::extract::ExtractedText;

/// Extract the text of every page of the PDF in `data`.
///
/// `path` is the file `data` was read from; the OCR engine renders pages
/// from it.
pub fn extract(path: &Path, data: &[u8], ocr: &dyn PageOcr) -> ExtractResult<ExtractedText> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data).map_err(|e| {
        ExtractError::ParseError {
            format: "pdf".into(),
            message: e.to_string(),
        }
    })?;
    tracing::info!(path = %path.display(), pages = pages.len(), "pdf text layer read");

    Ok(fill_blank_pages(path, pages, ocr))
}

/// Replace blank pages with OCR output and join everything in page order.
///
/// OCR failures are logged and leave the page empty; the rest of the
/// document is still returned.
pub(crate) fn fill_blank_pages(path: &Path, pages: Vec<String>, ocr: &dyn PageOcr) -> ExtractedText {
    let page_count = pages.len();
    let mut text = String::new();
    let mut ocr_pages = Vec::new();
    let mut unreadable_pages = Vec::new();

    for (idx, page_text) in pages.into_iter().enumerate() {
        let page = idx + 1;

        let page_text = if !page_text.trim().is_empty() {
            page_text
        } else if !ocr.enabled() {
            unreadable_pages.push(page);
            String::new()
        } else {
            match ocr.recognize_page(path, page) {
                Ok(recognized) if !recognized.trim().is_empty() => {
                    ocr_pages.push(page);
                    recognized
                }
                Ok(_) => {
                    tracing::warn!(page, "OCR found no text on blank page");
                    unreadable_pages.push(page);
                    String::new()
                }
                Err(e) => {
                    tracing::warn!(page, error = %e, "OCR fallback failed");
                    unreadable_pages.push(page);
                    String::new()
                }
            }
        };

        text.push_str(&page_text);
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
    }

    ExtractedText {
        text,
        page_count: Some(page_count),
        ocr_pages,
        unreadable_pages,
    }
}
