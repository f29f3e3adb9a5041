use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProductibleError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("could not read document '{document}': {reason}")]
    DocumentUnreadable { document: String, reason: String },

    #[error("document '{document}' has {page_count} page(s), page {page} was requested")]
    PageOutOfRange {
        document: String,
        page: usize,
        page_count: usize,
    },

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to render report: {0}")]
    Render(String),

    #[error("failed to append '{document}': {reason}")]
    Merge { document: String, reason: String },

    #[error("failed to load report job from {path}: {reason}")]
    JobLoad { path: PathBuf, reason: String },

    #[error("invalid report job: {0}")]
    JobInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}
