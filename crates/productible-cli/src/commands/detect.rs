use productible_core::error::ProductibleError;
use std::path::Path;

use super::Backend;

pub fn run(pdf_file: &Path, backend: Backend) -> Result<(), ProductibleError> {
    let extractor = super::extractor(backend)?;
    let document = super::load_source(pdf_file, extractor.as_ref())?;
    println!("{}", document.format);
    Ok(())
}
