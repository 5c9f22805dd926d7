//! # uploadkit
//!
//! Housekeeping for upload directories.
//!
//! Two independent tools live here:
//!
//! - **Retention sweeping** ([`sweep`]): delete files older than a threshold
//!   from a flat upload directory, reporting what happened to every entry.
//! - **Searchable PDFs** ([`ocr`]): rasterize each page of a scanned PDF,
//!   run OCR on it, and reassemble the recognized text-layer pages into a
//!   new PDF with the same page count and order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use uploadkit::{build_searchable_pdf, sweep, SweepConfig};
//!
//! fn main() -> uploadkit::Result<()> {
//!     let report = sweep(&SweepConfig::new().with_max_age_hours(24))?;
//!     println!("Cleanup completed: removed {} old files", report.removed());
//!
//!     build_searchable_pdf("Page1.pdf", "searchable_output.pdf")?;
//!     Ok(())
//! }
//! ```
//!
//! ## External programs
//!
//! The default OCR backends drive poppler's `pdftoppm` and `tesseract`.
//! Both are looked up on `PATH` unless [`OcrOptions`] names another binary.

pub mod error;
pub mod ocr;
pub mod sweep;

// Re-export commonly used types
pub use error::{Error, Result};
pub use ocr::{BuildEvent, BuildSummary, OcrOptions, SearchablePdfBuilder};
pub use sweep::{EntryOutcome, SweepConfig, SweepReport, Sweeper};

use std::path::Path;

/// Run one retention sweep on the real filesystem.
///
/// # Example
///
/// ```no_run
/// use uploadkit::{sweep, SweepConfig};
///
/// let report = sweep(&SweepConfig::default()).unwrap();
/// for (path, reason) in report.failures() {
///     eprintln!("{}: {}", path.display(), reason);
/// }
/// ```
pub fn sweep(config: &SweepConfig) -> Result<SweepReport> {
    Sweeper::new(config.clone()).sweep()
}

/// Convert a scanned PDF into a searchable one with default options.
///
/// # Arguments
///
/// * `input` - Path to the source PDF
/// * `output` - Destination path; overwritten on success
///
/// # Example
///
/// ```no_run
/// use uploadkit::build_searchable_pdf;
///
/// let summary = build_searchable_pdf("scan.pdf", "scan-ocr.pdf").unwrap();
/// println!("{} pages", summary.page_count);
/// ```
pub fn build_searchable_pdf<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<BuildSummary> {
    build_searchable_pdf_with_options(input, output, OcrOptions::default())
}

/// Convert a scanned PDF into a searchable one with custom options.
///
/// # Example
///
/// ```no_run
/// use uploadkit::{build_searchable_pdf_with_options, OcrOptions};
///
/// let options = OcrOptions::new().with_dpi(300).with_language("eng+deu");
/// build_searchable_pdf_with_options("scan.pdf", "scan-ocr.pdf", options).unwrap();
/// ```
pub fn build_searchable_pdf_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: OcrOptions,
) -> Result<BuildSummary> {
    SearchablePdfBuilder::new(options).build(input.as_ref(), output.as_ref())
}
