//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use lopdf::{dictionary, Document, Object, Stream};
use uploadkit::ocr::{PageFragment, PageImage, Rasterizer, TextRecognizer};
use uploadkit::{Error, Result};

/// Build a PDF with one Helvetica text line per page.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => pages.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Text shown by the first `(...) Tj` in a content stream.
pub fn shown_text(content: &[u8]) -> String {
    let content = String::from_utf8_lossy(content);
    let start = content.find('(').map(|i| i + 1).unwrap_or(0);
    let end = content[start..].find(')').map(|i| start + i).unwrap_or(content.len());
    content[start..end].to_string()
}

/// Text on each page of the PDF at `path`, in page order.
pub fn page_texts(path: &Path) -> Vec<String> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|id| shown_text(&doc.get_page_content(*id).unwrap()))
        .collect()
}

/// "Rasterizes" by handing each page's content stream over as the image.
pub struct ContentRasterizer;

impl Rasterizer for ContentRasterizer {
    fn rasterize(&self, input: &Path) -> Result<Vec<PageImage>> {
        let doc = Document::load(input)?;
        let mut images = Vec::new();
        for (ordinal, page_id) in doc.get_pages().values().enumerate() {
            images.push(PageImage::new(ordinal, 72, doc.get_page_content(*page_id)?));
        }
        Ok(images)
    }
}

/// "Recognizes" the text drawn in the image and emits it as a one-page PDF.
pub struct EchoRecognizer {
    pub fail_on: Option<usize>,
}

impl EchoRecognizer {
    pub fn new() -> Self {
        Self { fail_on: None }
    }

    pub fn failing_on(page: usize) -> Self {
        Self {
            fail_on: Some(page),
        }
    }
}

impl TextRecognizer for EchoRecognizer {
    fn recognize(&self, image: &PageImage) -> Result<PageFragment> {
        if self.fail_on == Some(image.ordinal) {
            return Err(Error::Recognize {
                page: image.ordinal,
                message: "simulated OCR failure".into(),
            });
        }
        let text = shown_text(&image.data);
        Ok(PageFragment::new(image.ordinal, text_pdf(&[&text])))
    }
}
