//! Book downloads over HTTP.
//!
//! URLs are validated up front, fetched through a [`Fetcher`], and the body
//! is written into the books directory under the URL's file name.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::config::HttpConfig;
use crate::library::error::{LibraryError, LibraryResult};

/// Source of book bytes.
pub trait Fetcher {
    /// Download the resource at `url`. Only a complete 200 response is a success.
    fn fetch(&self, url: &Url) -> LibraryResult<Vec<u8>>;
}

/// Blocking HTTP fetcher backed by a shared `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build();
        Self { agent }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> LibraryResult<Vec<u8>> {
        let response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| LibraryError::FetchError {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if response.status() != 200 {
            return Err(LibraryError::FetchError {
                url: url.to_string(),
                message: format!("unexpected status {} {}", response.status(), response.status_text()),
            });
        }

        let mut data = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut data)
            .map_err(|e| LibraryError::FetchError {
                url: url.to_string(),
                message: format!("read body: {e}"),
            })?;
        Ok(data)
    }
}

/// Parse `raw` and require an http(s) URL with a host.
pub fn validate_url(raw: &str) -> LibraryResult<Url> {
    let invalid = || LibraryError::InvalidUrl {
        url: raw.to_string(),
    };
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

/// File name to store a download under.
///
/// Uses the last non-empty path segment of the URL, falling back to a slug
/// of the book title when the URL ends in `/` or has no path.
pub fn file_name_for(url: &Url, title: &str) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .filter(|s| *s != "." && *s != "..")
        .map(str::to_string)
        .unwrap_or_else(|| {
            let slug = slugify(title);
            if slug.is_empty() { "book".into() } else { slug }
        })
}

/// Download `url` into `books_dir` and return the written path.
pub fn download_book(
    fetcher: &dyn Fetcher,
    url: &Url,
    books_dir: &Path,
    title: &str,
) -> LibraryResult<PathBuf> {
    std::fs::create_dir_all(books_dir).map_err(|e| LibraryError::Io { source: e })?;

    let data = fetcher.fetch(url)?;
    let dest = books_dir.join(file_name_for(url, title));
    std::fs::write(&dest, &data).map_err(|e| LibraryError::Io { source: e })?;

    tracing::info!(url = %url, path = %dest.display(), bytes = data.len(), "book downloaded");
    Ok(dest)
}

/// Generate a file-name-safe slug from a title string.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
