//! Diagnostic error types for text extraction and OCR.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from text extraction.
#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("parse error in {format} document: {message}")]
    #[diagnostic(
        code(biblio::extract::parse_error),
        help(
            "The document could not be parsed. Verify the file is a valid {format} \
             and not corrupted."
        )
    )]
    ParseError { format: String, message: String },

    #[error("failed to run {program}: {source}")]
    #[diagnostic(
        code(biblio::extract::tool_missing),
        help(
            "OCR needs `pdftoppm` (poppler-utils) and `tesseract` on PATH, or their \
             locations set under [ocr] in the config file."
        )
    )]
    ToolUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed on page {page}: {stderr}")]
    #[diagnostic(
        code(biblio::extract::tool_failed),
        help("Run the command by hand to inspect its output.")
    )]
    ToolFailed {
        program: String,
        page: usize,
        stderr: String,
    },

    #[error("I/O error: {source}")]
    #[diagnostic(
        code(biblio::extract::io),
        help("A filesystem operation failed. Check file paths and permissions.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for extraction results.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
