pub mod derive;
pub mod error;
pub mod extraction;
pub mod job;
pub mod model;
pub mod parsing;
pub mod render;
pub mod tables;

use error::ProductibleError;
use extraction::{PdfExtractor, SourceDocument};
use model::{AnnualProbability, DeclaredUnit, ExtractionWarning, Metric, SourceFormat};
use parsing::policy::policy_for;
use parsing::{extract_monthly_rows, MonthlyExtraction};
use rust_decimal::Decimal;
use serde::Serialize;
use tables::{build_tables, ReportSeries, ReportTables};

/// Read one metric's monthly series from a page of an already loaded document.
///
/// The unit policy comes from the format detected when the document was
/// loaded, so every metric read from the same document agrees on it.
pub fn extract_monthly(
    document: &SourceDocument,
    page_index: usize,
    metric: Metric,
    declared_unit: DeclaredUnit,
) -> Result<MonthlyExtraction, ProductibleError> {
    let page = document.page(page_index)?;
    let policy = policy_for(document.format, metric, declared_unit);
    log::debug!(
        "{}: reading {metric} from page {} as {} ({:?})",
        document.name,
        page.page_number,
        policy.column.describe(),
        policy.unit_rule
    );
    Ok(extract_monthly_rows(
        &document.name,
        &page.lines,
        metric,
        policy,
    ))
}

/// Load a PDF and read one metric from it in a single call.
pub fn extract_monthly_pdf(
    name: &str,
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    page_index: usize,
    metric: Metric,
    declared_unit: DeclaredUnit,
) -> Result<MonthlyExtraction, ProductibleError> {
    let document = SourceDocument::load(name, pdf_bytes, extractor)?;
    extract_monthly(&document, page_index, metric, declared_unit)
}

/// Operator inputs for one report.
#[derive(Debug, Clone, Copy)]
pub struct ReportRequest {
    /// Zero-based index of the page holding the monthly balance table.
    pub page_index: usize,
    pub declared_unit: DeclaredUnit,
    pub met: AnnualProbability,
    pub pvgis: AnnualProbability,
}

/// Everything computed for one report, before rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub met_format: SourceFormat,
    pub pvgis_format: SourceFormat,
    pub uplift: Decimal,
    pub series: ReportSeries,
    pub tables: ReportTables,
    pub warnings: Vec<ExtractionWarning>,
}

/// Main API entry point: extract both documents, derive P90 and build the
/// four report tables.
///
/// Any fatal error from either document aborts the whole report; gaps in
/// individual months are carried as warnings and empty cells.
pub fn generate_report(
    met: &SourceDocument,
    pvgis: &SourceDocument,
    request: &ReportRequest,
) -> Result<ReportOutcome, ProductibleError> {
    check_expected_format(met, SourceFormat::Met);
    check_expected_format(pvgis, SourceFormat::Pvgis);

    let energy_met = extract_monthly(met, request.page_index, Metric::Energy, request.declared_unit)?;
    let energy_pvgis =
        extract_monthly(pvgis, request.page_index, Metric::Energy, request.declared_unit)?;
    let irradiation_met =
        extract_monthly(met, request.page_index, Metric::Irradiation, DeclaredUnit::Kwh)?;
    let irradiation_pvgis =
        extract_monthly(pvgis, request.page_index, Metric::Irradiation, DeclaredUnit::Kwh)?;

    let uplift = derive::uplift_ratio(request.met, request.pvgis)?;
    let p90_met = derive::apply_uplift(&energy_met.series, uplift);
    let p90_pvgis = derive::apply_uplift(&energy_pvgis.series, uplift);

    let series = ReportSeries {
        energy_met: energy_met.series,
        energy_pvgis: energy_pvgis.series,
        irradiation_met: irradiation_met.series,
        irradiation_pvgis: irradiation_pvgis.series,
        p90_average: derive::average_series(&p90_met, &p90_pvgis),
        irradiation_average: derive::average_series(
            &irradiation_met.series,
            &irradiation_pvgis.series,
        ),
        p90_met,
        p90_pvgis,
    };
    let tables = build_tables(&series, request.met, request.pvgis);

    let warnings: Vec<ExtractionWarning> = [energy_met, energy_pvgis, irradiation_met, irradiation_pvgis]
        .into_iter()
        .flat_map(|e| e.warnings)
        .collect();

    log::info!(
        "report data ready: uplift {uplift}, {} missing value(s)",
        warnings.len()
    );

    Ok(ReportOutcome {
        met_format: met.format,
        pvgis_format: pvgis.format,
        uplift,
        series,
        tables,
        warnings,
    })
}

fn check_expected_format(document: &SourceDocument, expected: SourceFormat) {
    if document.format != expected && document.format != SourceFormat::Unknown {
        log::warn!(
            "{} was supplied as {expected} but looks like a {} report",
            document.name,
            document.format
        );
    }
}
