use chrono::Local;
use productible_core::error::ProductibleError;
use productible_core::extraction::{parse_page_number, PdfExtractor};
use productible_core::job::schema::ReportJob;
use productible_core::job::validate_job;
use productible_core::model::{AnnualProbability, SiteInfo};
use productible_core::render::merge::{assemble_report, NamedPdf};
use productible_core::render::{render_report, Logo, ReportMetadata};
use std::path::Path;

use super::{extract::parse_unit, Backend};
use crate::{output, ReportArgs};

pub fn run(args: ReportArgs, backend: Backend) -> Result<(), ProductibleError> {
    let page = parse_page_number(&args.page)? + 1;
    let job = ReportJob {
        met_pdf: args.met,
        pvgis_pdf: args.pvgis,
        page,
        declared_unit: parse_unit(&args.unit)?,
        met: AnnualProbability::new(args.p50_met, args.p90_met),
        pvgis: AnnualProbability::new(args.p50_pvgis, args.p90_pvgis),
        logo: args.logo,
        technical_summary: args.trs,
        wiring_diagram: args.wiring,
        site: SiteInfo {
            site_code: args.site_code,
            analyst: args.analyst,
            tilt_deg: args.tilt,
            orientation_deg: args.orientation,
            direction: args.direction,
            comment: args.comment,
        },
        output: args.out,
    };
    validate_job(&job).map_err(|e| match e {
        ProductibleError::JobInvalid(reason) => ProductibleError::InvalidInput(reason),
        other => other,
    })?;

    let extractor = super::extractor(backend)?;
    produce(&job, extractor.as_ref(), &args.output)
}

/// Extract, compute, print and write the PDF for one job.
pub fn produce(
    job: &ReportJob,
    extractor: &dyn PdfExtractor,
    output_format: &str,
) -> Result<(), ProductibleError> {
    let logo = match &job.logo {
        Some(path) => Some(read_logo(path)?),
        None => None,
    };

    let met = super::load_source(&job.met_pdf, extractor)?;
    let pvgis = super::load_source(&job.pvgis_pdf, extractor)?;
    let outcome = productible_core::generate_report(&met, &pvgis, &job.request())?;

    match output_format {
        "json" => output::json::print(&outcome)?,
        _ => output::table::print_report(&outcome),
    }

    let metadata = ReportMetadata {
        site: job.site.clone(),
        date: Local::now().format("%d/%m/%Y").to_string(),
    };
    let report = render_report(&outcome.tables, &metadata, logo.as_ref())?;
    let pdf = assemble_report(
        report,
        read_annex(job.technical_summary.as_deref())?,
        read_annex(job.wiring_diagram.as_deref())?,
    )?;

    let out = job.output_path();
    std::fs::write(&out, pdf)?;
    eprintln!("Report written to {}", out.display());
    if !outcome.warnings.is_empty() {
        eprintln!(
            "  {} monthly value(s) could not be extracted and are left empty",
            outcome.warnings.len()
        );
    }
    Ok(())
}

fn read_logo(path: &Path) -> Result<Logo, ProductibleError> {
    let bytes = std::fs::read(path).map_err(|e| {
        ProductibleError::InvalidInput(format!(
            "could not read logo '{}': {e}",
            super::display_name(path)
        ))
    })?;
    Logo::from_bytes(&bytes)
}

fn read_annex(path: Option<&Path>) -> Result<Option<NamedPdf>, ProductibleError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let name = super::display_name(path);
    let bytes = std::fs::read(path).map_err(|e| ProductibleError::Merge {
        document: name.clone(),
        reason: e.to_string(),
    })?;
    Ok(Some(NamedPdf::new(name, bytes)))
}
