//! OCR conversion options.

use std::path::PathBuf;

/// Rasterization resolution used when none is given.
pub const DEFAULT_DPI: u32 = 200;

/// Tesseract language used when none is given.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Options for building a searchable PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrOptions {
    /// Rasterization resolution in dots per inch
    pub dpi: u32,

    /// Tesseract language code(s), e.g. `eng` or `eng+deu`
    pub language: String,

    /// Path or name of the `pdftoppm` executable
    pub pdftoppm_program: PathBuf,

    /// Path or name of the `tesseract` executable
    pub tesseract_program: PathBuf,

    /// Recognize pages on the rayon pool instead of one by one
    pub parallel: bool,
}

impl OcrOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rasterization resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set recognition language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Use a specific `pdftoppm` binary.
    pub fn with_pdftoppm(mut self, program: impl Into<PathBuf>) -> Self {
        self.pdftoppm_program = program.into();
        self
    }

    /// Use a specific `tesseract` binary.
    pub fn with_tesseract(mut self, program: impl Into<PathBuf>) -> Self {
        self.tesseract_program = program.into();
        self
    }

    /// Enable or disable parallel recognition.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Recognize pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            language: DEFAULT_LANGUAGE.to_string(),
            pdftoppm_program: PathBuf::from("pdftoppm"),
            tesseract_program: PathBuf::from("tesseract"),
            parallel: false,
        }
    }
}
