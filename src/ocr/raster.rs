//! Page rasterization.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

use super::options::OcrOptions;
use super::tool::{self, ToolError};

/// One rasterized input page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// 0-based position in the input document
    pub ordinal: usize,
    /// Resolution the page was rendered at
    pub dpi: u32,
    /// Encoded image (PNG)
    pub data: Vec<u8>,
}

impl PageImage {
    /// Create a page image.
    pub fn new(ordinal: usize, dpi: u32, data: Vec<u8>) -> Self {
        Self { ordinal, dpi, data }
    }
}

/// Turns a PDF into one image per page, in page order.
pub trait Rasterizer: Send + Sync {
    /// Rasterize every page of the PDF at `input`.
    fn rasterize(&self, input: &Path) -> Result<Vec<PageImage>>;
}

/// [`Rasterizer`] that drives poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    program: PathBuf,
    dpi: u32,
}

impl PdftoppmRasterizer {
    /// Create a rasterizer using `program` at `dpi`.
    pub fn new(program: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            program: program.into(),
            dpi,
        }
    }

    /// Create a rasterizer from conversion options.
    pub fn from_options(options: &OcrOptions) -> Self {
        Self::new(&options.pdftoppm_program, options.dpi)
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(&self, input: &Path) -> Result<Vec<PageImage>> {
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join("page");

        let mut cmd = Command::new(&self.program);
        cmd.arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(input)
            .arg(&prefix);

        tool::run(&mut cmd).map_err(|e| match e {
            ToolError::NotFound(name) => Error::ToolNotFound(name),
            ToolError::Failed(message) => Error::Rasterize(message),
        })?;

        let mut names = Vec::new();
        for entry in fs::read_dir(scratch.path())? {
            let path = entry?.path();
            if let Some(number) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(page_number)
            {
                names.push((number, path));
            }
        }
        names.sort_by_key(|(number, _)| *number);

        let mut images = Vec::with_capacity(names.len());
        for (ordinal, (_, path)) in names.into_iter().enumerate() {
            images.push(PageImage::new(ordinal, self.dpi, fs::read(&path)?));
        }

        log::debug!("Rasterized {} pages from {}", images.len(), input.display());
        Ok(images)
    }
}

/// Page number from a `pdftoppm` output name such as `page-007.png`.
///
/// `pdftoppm` zero-pads to the width of the last page number, so names are
/// ordered numerically rather than lexically.
fn page_number(file_name: &str) -> Option<u32> {
    static PAGE_FILE: OnceLock<Regex> = OnceLock::new();
    let re = PAGE_FILE.get_or_init(|| Regex::new(r"^page-(\d+)\.png$").unwrap());
    re.captures(file_name)?.get(1)?.as_str().parse().ok()
}
