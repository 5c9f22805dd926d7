//! Text recognition.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};

use super::options::OcrOptions;
use super::raster::PageImage;
use super::tool::{self, ToolError};

/// Recognized text layer for one page, as a standalone single-page PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFragment {
    /// 0-based position in the input document
    pub ordinal: usize,
    /// Serialized PDF bytes
    pub pdf: Vec<u8>,
}

impl PageFragment {
    /// Create a fragment.
    pub fn new(ordinal: usize, pdf: Vec<u8>) -> Self {
        Self { ordinal, pdf }
    }
}

/// Produces a single-page PDF with a positioned text layer from an image.
pub trait TextRecognizer: Send + Sync {
    /// Recognize `image`. The fragment must carry the image's ordinal.
    fn recognize(&self, image: &PageImage) -> Result<PageFragment>;
}

/// [`TextRecognizer`] that drives the `tesseract` CLI with its `pdf` config.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    /// Create a recognizer using `program` and `language`.
    pub fn new(program: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }

    /// Create a recognizer from conversion options.
    pub fn from_options(options: &OcrOptions) -> Self {
        Self::new(&options.tesseract_program, options.language.clone())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &PageImage) -> Result<PageFragment> {
        let page = image.ordinal;
        let scratch = tempfile::tempdir()?;
        let image_path = scratch.path().join("page.png");
        let output_base = scratch.path().join("page");
        fs::write(&image_path, &image.data)?;

        // tesseract appends ".pdf" to the output base itself
        let mut cmd = Command::new(&self.program);
        cmd.arg(&image_path)
            .arg(&output_base)
            .arg("-l")
            .arg(&self.language)
            .arg("--dpi")
            .arg(image.dpi.to_string())
            .arg("pdf");

        tool::run(&mut cmd).map_err(|e| match e {
            ToolError::NotFound(name) => Error::ToolNotFound(name),
            ToolError::Failed(message) => Error::Recognize { page, message },
        })?;

        let pdf = fs::read(output_base.with_extension("pdf")).map_err(|e| Error::Recognize {
            page,
            message: format!("no PDF output: {}", e),
        })?;

        log::debug!("Recognized page {} ({} bytes)", page, pdf.len());
        Ok(PageFragment::new(page, pdf))
    }
}
