//! OCR fallback for PDF pages without a text layer.
//!
//! [`TesseractOcr`] shells out to two CLI tools: `pdftoppm` renders a single
//! page to PNG in a scratch directory, then `tesseract` reads the image and
//! prints the recognized text on stdout.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;

use crate::config::OcrConfig;
use crate::extract::error::{ExtractError, ExtractResult};

/// Engine that recovers the text of one rendered PDF page.
pub trait PageOcr {
    /// Recognize the text of 1-based `page` of the PDF at `pdf`.
    fn recognize_page(&self, pdf: &Path, page: usize) -> ExtractResult<String>;

    /// Whether the engine should be consulted at all.
    fn enabled(&self) -> bool {
        true
    }
}

/// Disabled OCR: blank pages stay blank.
pub struct NoOcr;

impl PageOcr for NoOcr {
    fn recognize_page(&self, _pdf: &Path, _page: usize) -> ExtractResult<String> {
        Ok(String::new())
    }

    fn enabled(&self) -> bool {
        false
    }
}

/// `pdftoppm` + `tesseract` pipeline.
pub struct TesseractOcr {
    pdftoppm: String,
    tesseract: String,
    language: String,
    dpi: u32,
}

impl TesseractOcr {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            pdftoppm: config.pdftoppm.clone(),
            tesseract: config.tesseract.clone(),
            language: config.language.clone(),
            dpi: config.dpi,
        }
    }

    /// Render `page` to `{dir}/page.png`.
    fn rasterize(&self, pdf: &Path, page: usize, dir: &Path) -> ExtractResult<PathBuf> {
        let prefix = dir.join("page");
        let page_arg = page.to_string();
        run(
            &self.pdftoppm,
            page,
            Command::new(&self.pdftoppm)
                .args(["-f", &page_arg, "-l", &page_arg])
                .args(["-r", &self.dpi.to_string()])
                .args(["-png", "-singlefile"])
                .arg(pdf)
                .arg(&prefix),
        )?;
        Ok(prefix.with_extension("png"))
    }
}

impl PageOcr for TesseractOcr {
    fn recognize_page(&self, pdf: &Path, page: usize) -> ExtractResult<String> {
        let start = Instant::now();
        let scratch = tempfile::TempDir::new().map_err(|e| ExtractError::Io { source: e })?;

        let image = self.rasterize(pdf, page, scratch.path())?;
        let output = run(
            &self.tesseract,
            page,
            Command::new(&self.tesseract)
                .arg(&image)
                .arg("stdout")
                .args(["-l", &self.language]),
        )?;
        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        tracing::info!(
            page,
            chars = text.trim().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "OCR recognized page"
        );
        Ok(text)
    }
}

/// Run `cmd` to completion, mapping spawn failures and non-zero exits.
fn run(program: &str, page: usize, cmd: &mut Command) -> ExtractResult<Output> {
    tracing::debug!(?cmd, "running OCR tool");
    let output = cmd.output().map_err(|e| ExtractError::ToolUnavailable {
        program: program.to_string(),
        source: e,
    })?;
    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            program: program.to_string(),
            page,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}
