pub mod detect;
pub mod extract;
pub mod job;
pub mod report;

use clap::ValueEnum;
use productible_core::error::ProductibleError;
use productible_core::extraction::lopdf_text::LopdfExtractor;
use productible_core::extraction::pdftotext::PdftotextExtractor;
use productible_core::extraction::{PdfExtractor, SourceDocument};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// pdftotext when installed, the built-in reader otherwise
    Auto,
    Pdftotext,
    Lopdf,
}

pub fn extractor(backend: Backend) -> Result<Box<dyn PdfExtractor>, ProductibleError> {
    match backend {
        Backend::Pdftotext if !PdftotextExtractor::is_available() => {
            Err(ProductibleError::PdftotextNotFound)
        }
        Backend::Pdftotext => Ok(Box::new(PdftotextExtractor::new())),
        Backend::Lopdf => Ok(Box::new(LopdfExtractor::new())),
        Backend::Auto if PdftotextExtractor::is_available() => {
            Ok(Box::new(PdftotextExtractor::new()))
        }
        Backend::Auto => {
            log::warn!("pdftotext not found, falling back to the built-in PDF text reader");
            Ok(Box::new(LopdfExtractor::new()))
        }
    }
}

/// Read and extract a source PDF, naming it after its file name.
pub fn load_source(
    path: &Path,
    extractor: &dyn PdfExtractor,
) -> Result<SourceDocument, ProductibleError> {
    let name = display_name(path);
    let bytes = std::fs::read(path).map_err(|e| ProductibleError::DocumentUnreadable {
        document: name.clone(),
        reason: e.to_string(),
    })?;
    SourceDocument::load(&name, &bytes, extractor)
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
