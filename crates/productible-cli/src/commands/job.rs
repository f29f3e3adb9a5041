use productible_core::error::ProductibleError;
use productible_core::job::load_job;
use std::path::Path;

use super::Backend;

pub fn run(file: &Path, output_format: &str, backend: Backend) -> Result<(), ProductibleError> {
    let job = load_job(file)?;
    let extractor = super::extractor(backend)?;
    super::report::produce(&job, extractor.as_ref(), output_format)
}

pub fn validate(file: &Path) -> Result<(), ProductibleError> {
    let job = load_job(file)?;

    println!("Job for site '{}' is valid.", job.site.site_code);
    println!("  MET:    {} (page {})", job.met_pdf.display(), job.page);
    println!("  PVGIS:  {}", job.pvgis_pdf.display());
    println!("  Unit:   {}", job.declared_unit);
    println!("  Output: {}", job.output_path().display());

    let mut warnings = Vec::new();
    for (label, path) in [("met_pdf", Some(&job.met_pdf)), ("pvgis_pdf", Some(&job.pvgis_pdf))]
        .into_iter()
        .chain([
            ("logo", job.logo.as_ref()),
            ("technical_summary", job.technical_summary.as_ref()),
            ("wiring_diagram", job.wiring_diagram.as_ref()),
        ])
    {
        if let Some(path) = path {
            if !path.exists() {
                warnings.push(format!("{label}: {} does not exist", path.display()));
            }
        }
    }
    if job.technical_summary.is_none() {
        warnings.push("no technical_summary: the report will be produced without it".into());
    }
    if job.wiring_diagram.is_none() {
        warnings.push("no wiring_diagram: the report will be produced without it".into());
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  {w}");
        }
    }
    Ok(())
}

pub fn schema() -> Result<(), ProductibleError> {
    print!(
        r#"JSON Job Schema
===============

A job file describes one report: the two source PDFs, the annual figures
read from them, the site details and the optional annexes. Relative paths
are resolved against the directory of the job file.

Top-level fields:
  met_pdf            (string, required)  MET (simulation) report PDF
  pvgis_pdf          (string, required)  PVGIS report PDF
  page               (integer, required) 1-based page holding the monthly
                                         table, in both documents
  declared_unit      (string, optional)  Unit of the energy column: "kWh"
                                         (default) or "MWh". With "MWh" every
                                         energy value is multiplied by 1000.
  met                (object, required)  Annual figures of the MET report
  pvgis              (object, required)  Annual figures of the PVGIS report
  logo               (string, optional)  JPEG or PNG logo printed above the title
  technical_summary  (string, optional)  TRS PDF appended after the report
  wiring_diagram     (string, optional)  Wiring diagram PDF appended last
  site               (object, required)  Site details (see below)
  output             (string, optional)  Output PDF.
                                         Default: Productible_<site_code>.pdf

"met" and "pvgis":
  p50_mwh            (string, required)  Annual P50 in MWh, must be positive
  p90_mwh            (string, required)  Annual P90 in MWh, must be positive

"site":
  site_code          (string, required)  Site code, must not be empty
  analyst            (string, optional)  Analyst in charge of the study
  tilt_deg           (integer, required) Panel tilt, 0 to 90
  orientation_deg    (integer, required) Panel orientation, 0 to 360 (0 = North)
  direction          (string, required)  Facing direction, e.g. "Est" or "Ouest"
  comment            (string, optional)  Project power or free comment

Example:
{{
  "met_pdf": "CH-042_PVsyst.pdf",
  "pvgis_pdf": "CH-042_PVGIS.pdf",
  "page": 6,
  "declared_unit": "kWh",
  "met": {{ "p50_mwh": "108.13", "p90_mwh": "101.86" }},
  "pvgis": {{ "p50_mwh": "113.11", "p90_mwh": "106.54" }},
  "logo": "logo.jpg",
  "technical_summary": "CH-042_TRS.pdf",
  "site": {{
    "site_code": "CH-042",
    "analyst": "C. Dupont",
    "tilt_deg": 15,
    "orientation_deg": 90,
    "direction": "Est",
    "comment": "250 kWc"
  }}
}}

Note: annual figures must be quoted strings, not bare numbers,
to preserve exact decimal precision (e.g., "108.13" not 108.13).
"#
    );
    Ok(())
}
