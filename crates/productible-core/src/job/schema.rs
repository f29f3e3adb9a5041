use crate::model::{AnnualProbability, DeclaredUnit, SiteInfo};
use crate::ReportRequest;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One report to produce: the two source PDFs, the operator's figures and
/// the optional annexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportJob {
    pub met_pdf: PathBuf,
    pub pvgis_pdf: PathBuf,
    /// 1-based page holding the monthly balance table, in both documents.
    pub page: usize,
    #[serde(default)]
    pub declared_unit: DeclaredUnit,
    /// Annual figures in MWh, as quoted decimal strings.
    pub met: AnnualProbability,
    pub pvgis: AnnualProbability,
    /// JPEG or PNG.
    #[serde(default)]
    pub logo: Option<PathBuf>,
    #[serde(default)]
    pub technical_summary: Option<PathBuf>,
    #[serde(default)]
    pub wiring_diagram: Option<PathBuf>,
    pub site: SiteInfo,
    /// Defaults to `Productible_<site_code>.pdf`.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl ReportJob {
    pub fn request(&self) -> ReportRequest {
        ReportRequest {
            page_index: self.page.saturating_sub(1),
            declared_unit: self.declared_unit,
            met: self.met,
            pvgis: self.pvgis,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_name(&self.site.site_code))
    }

    /// Make every relative path relative to `base` instead of the working
    /// directory.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.met_pdf);
        resolve(&mut self.pvgis_pdf);
        for p in [
            &mut self.logo,
            &mut self.technical_summary,
            &mut self.wiring_diagram,
            &mut self.output,
        ]
        .into_iter()
        .flatten()
        {
            resolve(p);
        }
    }
}

pub fn default_output_name(site_code: &str) -> PathBuf {
    PathBuf::from(format!("Productible_{site_code}.pdf"))
}
