//! Library configuration, persisted as TOML.
//!
//! Looked up at `$XDG_CONFIG_HOME/bibliotheca/config.toml` unless a file is
//! given explicitly. Every key is optional; defaults keep the store and the
//! downloaded books in the working directory.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::AppPaths;

/// Errors from configuration loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(biblio::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(biblio::config::parse),
        help("Check the TOML syntax and key names in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(biblio::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config already exists: {path}")]
    #[diagnostic(
        code(biblio::config::exists),
        help("Pass --force to overwrite it.")
    )]
    Exists { path: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Paths(#[from] crate::paths::PathError),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// JSON file holding the book list.
    #[serde(default = "default_store_file")]
    pub store_file: PathBuf,
    /// Directory downloaded books are written to.
    #[serde(default = "default_books_dir")]
    pub books_dir: PathBuf,
    /// Directory extracted `{title}.txt` files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default CSV export destination.
    #[serde(default = "default_csv_file")]
    pub csv_file: PathBuf,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

/// HTTP client settings for book downloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Overall request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// OCR fallback settings for image-only PDF pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// When false, blank pages are left blank.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `tesseract` executable.
    #[serde(default = "default_tesseract")]
    pub tesseract: String,
    /// `pdftoppm` executable (poppler-utils) used to rasterize pages.
    #[serde(default = "default_pdftoppm")]
    pub pdftoppm: String,
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    #[serde(default = "default_language")]
    pub language: String,
    /// Rasterization resolution.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_store_file() -> PathBuf {
    PathBuf::from("books.json")
}
fn default_books_dir() -> PathBuf {
    PathBuf::from("books")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_csv_file() -> PathBuf {
    PathBuf::from("books.csv")
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_user_agent() -> String {
    concat!("bibliotheca/", env!("CARGO_PKG_VERSION")).into()
}
fn default_true() -> bool {
    true
}
fn default_tesseract() -> String {
    "tesseract".into()
}
fn default_pdftoppm() -> String {
    "pdftoppm".into()
}
fn default_language() -> String {
    "eng".into()
}
fn default_dpi() -> u32 {
    150
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            books_dir: default_books_dir(),
            output_dir: default_output_dir(),
            csv_file: default_csv_file(),
            http: HttpConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            tesseract: default_tesseract(),
            pdftoppm: default_pdftoppm(),
            language: default_language(),
            dpi: default_dpi(),
        }
    }
}

impl LibraryConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Write `self` to `path` unless a file is already there.
    ///
    /// With `overwrite` an existing file is replaced.
    pub fn init(&self, path: &Path, overwrite: bool) -> ConfigResult<()> {
        if path.exists() && !overwrite {
            return Err(ConfigError::Exists {
                path: path.display().to_string(),
            });
        }
        self.save(path)?;
        tracing::info!(path = %path.display(), "config written");
        Ok(())
    }

    /// The XDG location of the config file.
    pub fn default_path() -> ConfigResult<PathBuf> {
        Ok(AppPaths::resolve()?.config_file())
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Otherwise the XDG config file is used if
    /// present, and defaults if not.
    pub fn resolve(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let file = Self::default_path()?;
        if file.is_file() {
            tracing::debug!(path = %file.display(), "loading config");
            Self::load(&file)
        } else {
            Ok(Self::default())
        }
    }
}
