use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the twelve canonical months, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    #[serde(rename = "Janvier")]
    Janvier,
    #[serde(rename = "Février")]
    Fevrier,
    #[serde(rename = "Mars")]
    Mars,
    #[serde(rename = "Avril")]
    Avril,
    #[serde(rename = "Mai")]
    Mai,
    #[serde(rename = "Juin")]
    Juin,
    #[serde(rename = "Juillet")]
    Juillet,
    #[serde(rename = "Août")]
    Aout,
    #[serde(rename = "Septembre")]
    Septembre,
    #[serde(rename = "Octobre")]
    Octobre,
    #[serde(rename = "Novembre")]
    Novembre,
    #[serde(rename = "Décembre")]
    Decembre,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Janvier,
        Month::Fevrier,
        Month::Mars,
        Month::Avril,
        Month::Mai,
        Month::Juin,
        Month::Juillet,
        Month::Aout,
        Month::Septembre,
        Month::Octobre,
        Month::Novembre,
        Month::Decembre,
    ];

    /// Zero-based calendar position.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical French name, as printed in the report tables.
    pub fn name(self) -> &'static str {
        match self {
            Month::Janvier => "Janvier",
            Month::Fevrier => "Février",
            Month::Mars => "Mars",
            Month::Avril => "Avril",
            Month::Mai => "Mai",
            Month::Juin => "Juin",
            Month::Juillet => "Juillet",
            Month::Aout => "Août",
            Month::Septembre => "Septembre",
            Month::Octobre => "Octobre",
            Month::Novembre => "Novembre",
            Month::Decembre => "Décembre",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Twelve optional values in calendar order. `None` means the month could
/// not be extracted; it is never conflated with zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeries([Option<Decimal>; 12]);

impl MonthlySeries {
    /// A series with every month absent.
    pub fn empty() -> Self {
        MonthlySeries([None; 12])
    }

    pub fn from_values(values: [Option<Decimal>; 12]) -> Self {
        MonthlySeries(values)
    }

    pub fn get(&self, month: Month) -> Option<Decimal> {
        self.0[month.index()]
    }

    pub fn set(&mut self, month: Month, value: Option<Decimal>) {
        self.0[month.index()] = value;
    }

    pub fn values(&self) -> &[Option<Decimal>; 12] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, Option<Decimal>)> + '_ {
        Month::ALL.iter().map(move |m| (*m, self.get(*m)))
    }

    /// Months that carry no value.
    pub fn missing_months(&self) -> Vec<Month> {
        self.iter()
            .filter(|(_, v)| v.is_none())
            .map(|(m, _)| m)
            .collect()
    }

    pub fn present_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    /// Apply `f` to every present value; absent months stay absent.
    pub fn map(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        MonthlySeries(self.0.map(|v| v.map(&f)))
    }

    /// Like [`MonthlySeries::map`], but a month becomes absent when `f`
    /// returns `None`.
    pub fn and_then(&self, f: impl Fn(Decimal) -> Option<Decimal>) -> Self {
        MonthlySeries(self.0.map(|v| v.and_then(&f)))
    }
}

/// The column family read from the monthly balance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Energy injected into the grid (E_Grid).
    Energy,
    /// Global irradiation on the horizontal plane.
    Irradiation,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Energy => write!(f, "energy"),
            Metric::Irradiation => write!(f, "irradiation"),
        }
    }
}

impl Metric {
    pub fn from_str_loose(s: &str) -> Option<Metric> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "energy" | "e_grid" | "egrid" | "energie" | "énergie" => Some(Metric::Energy),
            "irradiation" | "irrad" | "ghi" => Some(Metric::Irradiation),
            _ => None,
        }
    }
}

/// Unit the operator declares for the energy column of the source table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclaredUnit {
    #[serde(rename = "kWh")]
    #[default]
    Kwh,
    #[serde(rename = "MWh")]
    Mwh,
}

impl fmt::Display for DeclaredUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredUnit::Kwh => write!(f, "kWh"),
            DeclaredUnit::Mwh => write!(f, "MWh"),
        }
    }
}

impl DeclaredUnit {
    pub fn from_str_loose(s: &str) -> Option<DeclaredUnit> {
        match s.trim().to_lowercase().as_str() {
            "kwh" => Some(DeclaredUnit::Kwh),
            "mwh" => Some(DeclaredUnit::Mwh),
            _ => None,
        }
    }
}

/// Vendor format of a source document, detected once per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceFormat {
    /// Simulation-tool report built on Meteonorm weather data.
    Met,
    /// Satellite-irradiance estimate from PVGIS.
    Pvgis,
    Unknown,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Met => write!(f, "MET"),
            SourceFormat::Pvgis => write!(f, "PVGIS"),
            SourceFormat::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Annual production exceeded with 50% / 90% confidence, in MWh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualProbability {
    pub p50_mwh: Decimal,
    pub p90_mwh: Decimal,
}

impl AnnualProbability {
    pub fn new(p50_mwh: Decimal, p90_mwh: Decimal) -> Self {
        AnnualProbability { p50_mwh, p90_mwh }
    }
}

/// A month whose value could not be located or parsed. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    pub document: String,
    pub metric: Metric,
    pub month: Month,
    pub reason: String,
}

/// Site and study details printed above the tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub site_code: String,
    #[serde(default)]
    pub analyst: Option<String>,
    pub tilt_deg: u32,
    /// 0 = North.
    pub orientation_deg: u32,
    pub direction: String,
    #[serde(default)]
    pub comment: Option<String>,
}
