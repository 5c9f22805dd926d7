//! Searchable-PDF conversion.
//!
//! The pipeline has three stages, each behind a swappable seam:
//!
//! 1. [`Rasterizer`] renders every input page to an image.
//! 2. [`TextRecognizer`] turns each image into a single-page PDF carrying
//!    the recognized text layer.
//! 3. [`OutputDocument`] appends those pages in input order and writes the
//!    result once.
//!
//! Conversion is all-or-nothing. Any failure aborts the build and the
//! destination file is left exactly as it was.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use uploadkit::ocr::{OcrOptions, SearchablePdfBuilder};
//!
//! fn main() -> uploadkit::Result<()> {
//!     let builder = SearchablePdfBuilder::new(OcrOptions::new().with_dpi(300));
//!     let summary = builder.build(Path::new("scan.pdf"), Path::new("scan-ocr.pdf"))?;
//!     println!("{} pages", summary.page_count);
//!     Ok(())
//! }
//! ```

mod assemble;
mod options;
mod raster;
mod recognize;
mod tool;

pub use assemble::OutputDocument;
pub use options::{OcrOptions, DEFAULT_DPI, DEFAULT_LANGUAGE};
pub use raster::{PageImage, PdftoppmRasterizer, Rasterizer};
pub use recognize::{PageFragment, TesseractRecognizer, TextRecognizer};

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};

/// Progress notifications emitted while building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// The input was rasterized.
    Rasterized {
        /// Number of pages found
        page_count: usize,
    },

    /// A page finished recognition.
    ///
    /// In parallel mode these arrive in completion order.
    PageRecognized {
        /// 0-based page ordinal
        ordinal: usize,
        /// Total pages in the document
        page_count: usize,
    },

    /// The output file was written.
    Saved {
        /// Destination path
        path: PathBuf,
        /// Pages written
        page_count: usize,
    },
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    /// Pages written (always equal to the input page count)
    pub page_count: usize,
    /// Destination path
    pub output: PathBuf,
}

type EventCallback = Box<dyn Fn(&BuildEvent) + Send + Sync>;

/// Converts image-only PDFs into PDFs with a recognized text layer.
pub struct SearchablePdfBuilder {
    rasterizer: Box<dyn Rasterizer>,
    recognizer: Box<dyn TextRecognizer>,
    options: OcrOptions,
    on_event: Option<EventCallback>,
}

impl SearchablePdfBuilder {
    /// Create a builder backed by `pdftoppm` and `tesseract`.
    pub fn new(options: OcrOptions) -> Self {
        let rasterizer = PdftoppmRasterizer::from_options(&options);
        let recognizer = TesseractRecognizer::from_options(&options);
        Self::with_backends(rasterizer, recognizer, options)
    }

    /// Create a builder with custom backends.
    pub fn with_backends(
        rasterizer: impl Rasterizer + 'static,
        recognizer: impl TextRecognizer + 'static,
        options: OcrOptions,
    ) -> Self {
        Self {
            rasterizer: Box::new(rasterizer),
            recognizer: Box::new(recognizer),
            options,
            on_event: None,
        }
    }

    /// Register a progress callback.
    pub fn on_event(mut self, callback: impl Fn(&BuildEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    /// The active options.
    pub fn options(&self) -> &OcrOptions {
        &self.options
    }

    /// Convert `input` into a searchable PDF at `output`.
    ///
    /// `input` is not validated here; whatever the rasterizer reports for a
    /// missing or unreadable file is returned. `output` is overwritten on
    /// success and untouched on failure.
    pub fn build(&self, input: &Path, output: &Path) -> Result<BuildSummary> {
        log::info!("Rasterizing {}", input.display());
        let images = self.rasterizer.rasterize(input)?;
        let page_count = images.len();
        if page_count == 0 {
            return Err(Error::EmptyDocument);
        }
        self.emit(&BuildEvent::Rasterized { page_count });

        let mut document = OutputDocument::new();
        if self.options.parallel {
            let fragments = images
                .par_iter()
                .map(|image| self.recognize_page(image, page_count))
                .collect::<Result<Vec<_>>>()?;
            for fragment in &fragments {
                document.append(fragment)?;
            }
        } else {
            for image in &images {
                let fragment = self.recognize_page(image, page_count)?;
                document.append(&fragment)?;
            }
        }
        drop(images);

        debug_assert_eq!(document.page_count(), page_count);
        document.save(output)?;
        log::info!("Wrote {} pages to {}", page_count, output.display());

        self.emit(&BuildEvent::Saved {
            path: output.to_path_buf(),
            page_count,
        });

        Ok(BuildSummary {
            page_count,
            output: output.to_path_buf(),
        })
    }

    fn recognize_page(&self, image: &PageImage, page_count: usize) -> Result<PageFragment> {
        let mut fragment = self.recognizer.recognize(image)?;
        fragment.ordinal = image.ordinal;
        self.emit(&BuildEvent::PageRecognized {
            ordinal: image.ordinal,
            page_count,
        });
        Ok(fragment)
    }

    fn emit(&self, event: &BuildEvent) {
        if let Some(callback) = &self.on_event {
            callback(event);
        }
    }
}
