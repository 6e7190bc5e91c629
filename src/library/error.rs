//! Rich diagnostic error types for the book catalog.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from library operations.
#[derive(Debug, Error, Diagnostic)]
pub enum LibraryError {
    #[error("book not found: \"{title}\"")]
    #[diagnostic(
        code(biblio::library::not_found),
        help(
            "No book with this exact title exists in the store. \
             List recorded books with `biblio list`."
        )
    )]
    BookNotFound { title: String },

    #[error("missing required field: {field}")]
    #[diagnostic(
        code(biblio::library::missing_field),
        help("Every book needs a non-empty {field}.")
    )]
    MissingField { field: &'static str },

    #[error("invalid URL: \"{url}\"")]
    #[diagnostic(
        code(biblio::library::invalid_url),
        help("Enter an absolute http:// or https:// URL, e.g. https://example.org/book.pdf")
    )]
    InvalidUrl { url: String },

    #[error("fetch error for URL \"{url}\": {message}")]
    #[diagnostic(
        code(biblio::library::fetch_error),
        help(
            "Failed to download the book. Check that the URL is reachable \
             and the network is available."
        )
    )]
    FetchError { url: String, message: String },

    #[error("book file not found: {path}")]
    #[diagnostic(
        code(biblio::library::file_missing),
        help(
            "The store points at a file that no longer exists. Restore the file \
             or update the path with `biblio edit --file-path`."
        )
    )]
    BookFileMissing { path: String },

    #[error("unsupported file format for \"{title}\": {path}")]
    #[diagnostic(
        code(biblio::library::unsupported_format),
        help("Only .pdf and .docx books can be read.")
    )]
    UnsupportedFormat { title: String, path: String },

    #[error("store I/O error: {message}")]
    #[diagnostic(
        code(biblio::library::store_io),
        help(
            "Failed to read or write the book store. Check that the store \
             directory exists and has correct permissions."
        )
    )]
    StoreIo { message: String },

    #[error("CSV export failed for {path}: {message}")]
    #[diagnostic(
        code(biblio::library::export_failed),
        help("Check that the destination directory exists and is writable.")
    )]
    ExportFailed { path: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] crate::extract::ExtractError),

    #[error("I/O error: {source}")]
    #[diagnostic(
        code(biblio::library::io),
        help("A filesystem operation failed. Check file paths and permissions.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for library operation results.
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
