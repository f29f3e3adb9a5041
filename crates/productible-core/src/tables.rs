use crate::model::{AnnualProbability, Month, MonthlySeries};
use crate::parsing::policy::MWH_TO_KWH;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A single table cell. Missing months stay visibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Value(Decimal),
    Empty,
}

impl From<Option<Decimal>> for Cell {
    fn from(value: Option<Decimal>) -> Self {
        match value {
            Some(v) => Cell::Value(v),
            None => Cell::Empty,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Value(v) => write!(f, "{v}"),
            Cell::Empty => Ok(()),
        }
    }
}

/// A titled rectangular table, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    /// Cell in the first row whose first cell is `row_label`, under `header`.
    pub fn cell(&self, row_label: &str, header: &str) -> Option<&Cell> {
        let col = self.headers.iter().position(|h| h == header)?;
        self.rows
            .iter()
            .find(|r| matches!(r.first(), Some(Cell::Text(t)) if t == row_label))
            .and_then(|r| r.get(col))
    }
}

/// Every monthly series the report shows.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSeries {
    pub energy_met: MonthlySeries,
    pub energy_pvgis: MonthlySeries,
    pub irradiation_met: MonthlySeries,
    pub irradiation_pvgis: MonthlySeries,
    pub p90_met: MonthlySeries,
    pub p90_pvgis: MonthlySeries,
    pub p90_average: MonthlySeries,
    pub irradiation_average: MonthlySeries,
}

/// The four tables, in the order they are rendered.
#[derive(Debug, Clone, Serialize)]
pub struct ReportTables {
    pub data: ReportTable,
    pub p90: ReportTable,
    pub irradiation: ReportTable,
    pub probability: ReportTable,
}

impl ReportTables {
    pub fn in_order(&self) -> [&ReportTable; 4] {
        [&self.data, &self.p90, &self.irradiation, &self.probability]
    }
}

pub fn build_tables(
    series: &ReportSeries,
    met: AnnualProbability,
    pvgis: AnnualProbability,
) -> ReportTables {
    ReportTables {
        data: monthly_table(
            "Données extraites :",
            &[
                ("E_Grid_MET (kWh)", &series.energy_met),
                ("E_Grid_PVGIS (kWh)", &series.energy_pvgis),
                ("Irradiation_MET (kWh/m²)", &series.irradiation_met),
                ("Irradiation_PVGIS (kWh/m²)", &series.irradiation_pvgis),
                ("P90_MET (kWh)", &series.p90_met),
                ("P90_PVGIS (kWh)", &series.p90_pvgis),
            ],
        ),
        p90: monthly_table(
            "Production mensuelle estimée en P90 :",
            &[
                ("P90_MET (kWh)", &series.p90_met),
                ("P90_PVGIS (kWh)", &series.p90_pvgis),
                ("P90_MOYEN (kWh)", &series.p90_average),
            ],
        ),
        irradiation: monthly_table(
            "Irradiation moyenne mensuelle :",
            &[
                ("Irradiation_MET (kWh/m²)", &series.irradiation_met),
                ("Irradiation_PVGIS (kWh/m²)", &series.irradiation_pvgis),
                ("Irradiation_MOYENNE (kWh/m²)", &series.irradiation_average),
            ],
        ),
        probability: probability_table(met, pvgis),
    }
}

fn monthly_table(title: &str, columns: &[(&str, &MonthlySeries)]) -> ReportTable {
    let mut headers = vec!["Mois".to_string()];
    headers.extend(columns.iter().map(|(h, _)| h.to_string()));

    let rows = Month::ALL
        .iter()
        .map(|month| {
            let mut row = vec![Cell::Text(month.name().to_string())];
            row.extend(columns.iter().map(|(_, s)| Cell::from(s.get(*month))));
            row
        })
        .collect();

    ReportTable {
        title: title.to_string(),
        headers,
        rows,
    }
}

/// Annual figures converted from MWh to kWh. Only the mean row is rounded.
/// A figure too large to convert is left empty.
fn probability_table(met: AnnualProbability, pvgis: AnnualProbability) -> ReportTable {
    let kwh = |mwh: Decimal| Cell::from(mwh.checked_mul(MWH_TO_KWH));
    let mean_kwh = |a: Decimal, b: Decimal| {
        let mean = a
            .checked_add(b)
            .and_then(|sum| (sum / Decimal::TWO).checked_mul(MWH_TO_KWH));
        Cell::from(mean.map(|v| v.round_dp(2)))
    };

    let rows = vec![
        vec![
            Cell::Text("MET".into()),
            kwh(met.p50_mwh),
            kwh(met.p90_mwh),
        ],
        vec![
            Cell::Text("PVGIS".into()),
            kwh(pvgis.p50_mwh),
            kwh(pvgis.p90_mwh),
        ],
        vec![
            Cell::Text("Moyenne".into()),
            mean_kwh(met.p50_mwh, pvgis.p50_mwh),
            mean_kwh(met.p90_mwh, pvgis.p90_mwh),
        ],
    ];

    ReportTable {
        title: "Probabilité de production annuelle (en kWh) :".into(),
        headers: vec!["Source".into(), "P50 (kWh)".into(), "P90 (kWh)".into()],
        rows,
    }
}
