//! XDG-compliant path resolution for bibliotheca.
//!
//! Only the configuration directory is resolved here. Book data lives
//! wherever the configuration points, relative to the working directory by
//! default.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(biblio::paths::no_home),
        help("Set the HOME environment variable or pass --config explicitly.")
    )]
    NoHome,
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Global directories for bibliotheca.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// `$XDG_CONFIG_HOME/bibliotheca/`
    pub config_dir: PathBuf,
}

impl AppPaths {
    /// Resolve directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let config_base = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .ok_or(PathError::NoHome)?,
        };

        Ok(Self {
            config_dir: config_base.join("bibliotheca"),
        })
    }

    /// Path to the global config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}
