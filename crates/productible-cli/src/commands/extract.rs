use productible_core::error::ProductibleError;
use productible_core::extraction::parse_page_number;
use productible_core::model::{DeclaredUnit, Metric};
use std::path::Path;

use super::Backend;
use crate::output;

pub fn run(
    pdf_file: &Path,
    page: &str,
    metric: &str,
    unit: &str,
    output_format: &str,
    backend: Backend,
) -> Result<(), ProductibleError> {
    let page_index = parse_page_number(page)?;
    let metric = Metric::from_str_loose(metric).ok_or_else(|| {
        ProductibleError::InvalidInput(format!(
            "unknown metric '{metric}' (expected 'energy' or 'irradiation')"
        ))
    })?;
    let unit = parse_unit(unit)?;

    let extractor = super::extractor(backend)?;
    let document = super::load_source(pdf_file, extractor.as_ref())?;
    let extraction = productible_core::extract_monthly(&document, page_index, metric, unit)?;

    match output_format {
        "json" => output::json::print(&extraction)?,
        _ => {
            println!(
                "{} ({}), page {}\n",
                document.name,
                document.format,
                page_index.saturating_add(1)
            );
            output::table::print_series(metric, &extraction.series);
            output::table::print_warnings(&extraction.warnings);
        }
    }
    Ok(())
}

pub fn parse_unit(raw: &str) -> Result<DeclaredUnit, ProductibleError> {
    DeclaredUnit::from_str_loose(raw).ok_or_else(|| {
        ProductibleError::InvalidInput(format!("unknown unit '{raw}' (expected 'kWh' or 'MWh')"))
    })
}
