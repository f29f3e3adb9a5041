pub mod lopdf_text;
pub mod pdftotext;

use crate::error::ProductibleError;
use crate::model::SourceFormat;
use crate::parsing::format::detect_format;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ProductibleError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// A vendor PDF whose text has been extracted and whose format has been
/// detected. Both happen exactly once, in [`SourceDocument::load`].
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub format: SourceFormat,
    pub pages: Vec<PageContent>,
}

impl SourceDocument {
    pub fn load(
        name: &str,
        pdf_bytes: &[u8],
        extractor: &dyn PdfExtractor,
    ) -> Result<SourceDocument, ProductibleError> {
        let pages = extractor.extract_pages(pdf_bytes).map_err(|e| match e {
            ProductibleError::DocumentUnreadable { reason, .. } => {
                ProductibleError::DocumentUnreadable {
                    document: name.to_string(),
                    reason,
                }
            }
            ProductibleError::PdftotextFailed { code, stderr } => {
                ProductibleError::DocumentUnreadable {
                    document: name.to_string(),
                    reason: format!("pdftotext exited with code {code}: {}", stderr.trim()),
                }
            }
            other => other,
        })?;

        let format = detect_format(&pages);
        log::debug!(
            "{name}: {} page(s) via {}, detected format {format}",
            pages.len(),
            extractor.backend_name()
        );
        if format == SourceFormat::Unknown {
            log::warn!("{name}: vendor format not recognized, values are read without unit correction");
        }

        Ok(SourceDocument {
            name: name.to_string(),
            format,
            pages,
        })
    }

    /// Page by zero-based index.
    pub fn page(&self, page_index: usize) -> Result<&PageContent, ProductibleError> {
        self.pages
            .get(page_index)
            .ok_or_else(|| ProductibleError::PageOutOfRange {
                document: self.name.clone(),
                page: page_index.saturating_add(1),
                page_count: self.pages.len(),
            })
    }
}

/// Convert a user-facing, 1-based page number into a zero-based index.
pub fn parse_page_number(raw: &str) -> Result<usize, ProductibleError> {
    let trimmed = raw.trim();
    let number: usize = trimmed.parse().map_err(|_| {
        ProductibleError::InvalidInput(format!("page number '{trimmed}' is not a positive integer"))
    })?;
    if number == 0 {
        return Err(ProductibleError::InvalidInput(
            "page numbers start at 1".into(),
        ));
    }
    Ok(number - 1)
}

/// Split raw page text into lines, dropping trailing carriage returns.
pub(crate) fn split_lines(page_text: &str) -> Vec<String> {
    page_text.lines().map(|l| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<&'static str>);

    impl PdfExtractor for FixedPages {
        fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ProductibleError> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, text)| PageContent {
                    page_number: i + 1,
                    lines: split_lines(text),
                })
                .collect())
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(parse_page_number("6").unwrap(), 5);
        assert_eq!(parse_page_number(" 1 ").unwrap(), 0);
    }

    #[test]
    fn test_parse_page_number_rejects_garbage() {
        assert!(matches!(
            parse_page_number("six"),
            Err(ProductibleError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_page_number("0"),
            Err(ProductibleError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_page_number("-2"),
            Err(ProductibleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_detects_format_once() {
        let extractor = FixedPages(vec!["PVGIS-5 estimates", "January 10.0 20.0"]);
        let doc = SourceDocument::load("pvgis.pdf", &[], &extractor).unwrap();
        assert_eq!(doc.format, SourceFormat::Pvgis);
        assert_eq!(doc.pages.len(), 2);
    }

    #[test]
    fn test_page_out_of_range() {
        let extractor = FixedPages(vec!["only page"]);
        let doc = SourceDocument::load("met.pdf", &[], &extractor).unwrap();
        assert!(doc.page(0).is_ok());
        match doc.page(3) {
            Err(ProductibleError::PageOutOfRange {
                document,
                page,
                page_count,
            }) => {
                assert_eq!(document, "met.pdf");
                assert_eq!(page, 4);
                assert_eq!(page_count, 1);
            }
            other => panic!("expected PageOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_page_out_of_range_at_usize_max() {
        let extractor = FixedPages(vec!["only page"]);
        let doc = SourceDocument::load("met.pdf", &[], &extractor).unwrap();
        match doc.page(usize::MAX) {
            Err(ProductibleError::PageOutOfRange { page, .. }) => assert_eq!(page, usize::MAX),
            other => panic!("expected PageOutOfRange, got {other:?}"),
        }
    }
}
