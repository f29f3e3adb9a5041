pub mod schema;

use crate::error::ProductibleError;
use rust_decimal::Decimal;
use schema::ReportJob;
use std::path::Path;

const MAX_TILT_DEG: u32 = 90;
const MAX_ORIENTATION_DEG: u32 = 360;

/// Load a report job from a JSON file. Relative paths inside it are
/// resolved against the file's directory.
pub fn load_job(path: &Path) -> Result<ReportJob, ProductibleError> {
    let content = std::fs::read_to_string(path).map_err(|e| ProductibleError::JobLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut job = parse_job(&content, path)?;
    if let Some(dir) = path.parent() {
        job.resolve_paths(dir);
    }
    Ok(job)
}

/// Parse a report job from a JSON string.
pub fn parse_job(json: &str, source: &Path) -> Result<ReportJob, ProductibleError> {
    let job: ReportJob = serde_json::from_str(json).map_err(|e| ProductibleError::JobLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_job(&job)?;
    Ok(job)
}

/// Parse a report job from a JSON string (no file path context).
pub fn parse_job_str(json: &str) -> Result<ReportJob, ProductibleError> {
    let job: ReportJob = serde_json::from_str(json)?;
    validate_job(&job)?;
    Ok(job)
}

/// Check the values serde cannot: ranges, positivity and required text.
pub fn validate_job(job: &ReportJob) -> Result<(), ProductibleError> {
    if job.page == 0 {
        return Err(ProductibleError::JobInvalid(
            "page is 1-based and must be at least 1".into(),
        ));
    }

    for (label, p) in [("met", &job.met), ("pvgis", &job.pvgis)] {
        if p.p50_mwh <= Decimal::ZERO || p.p90_mwh <= Decimal::ZERO {
            return Err(ProductibleError::JobInvalid(format!(
                "{label}: p50_mwh and p90_mwh must be positive (got {} and {})",
                p.p50_mwh, p.p90_mwh
            )));
        }
    }

    let site = &job.site;
    if site.site_code.trim().is_empty() {
        return Err(ProductibleError::JobInvalid(
            "site.site_code must not be empty".into(),
        ));
    }
    if site.tilt_deg > MAX_TILT_DEG {
        return Err(ProductibleError::JobInvalid(format!(
            "site.tilt_deg must be between 0 and {MAX_TILT_DEG} (got {})",
            site.tilt_deg
        )));
    }
    if site.orientation_deg > MAX_ORIENTATION_DEG {
        return Err(ProductibleError::JobInvalid(format!(
            "site.orientation_deg must be between 0 and {MAX_ORIENTATION_DEG} (got {})",
            site.orientation_deg
        )));
    }

    Ok(())
}
