use crate::error::ProductibleError;
use crate::extraction::{split_lines, PageContent, PdfExtractor};
use lopdf::Document;

/// Pure-Rust extraction backend built on lopdf.
///
/// Less faithful to the visual layout than pdftotext, but needs no external
/// binary. Pages that fail to decode yield an empty page instead of failing
/// the whole document.
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        LopdfExtractor
    }
}

impl Default for LopdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ProductibleError> {
        let doc = Document::load_mem(pdf_bytes).map_err(|e| ProductibleError::DocumentUnreadable {
            document: "<input>".into(),
            reason: e.to_string(),
        })?;

        let pages = doc
            .get_pages()
            .keys()
            .enumerate()
            .map(|(i, &page_number)| {
                let text = doc.extract_text(&[page_number]).unwrap_or_else(|e| {
                    log::debug!("lopdf could not decode page {page_number}: {e}");
                    String::new()
                });
                PageContent {
                    page_number: i + 1,
                    lines: split_lines(&text),
                }
            })
            .collect();

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "lopdf"
    }
}
