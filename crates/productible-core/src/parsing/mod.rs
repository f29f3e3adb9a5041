pub mod format;
pub mod month;
pub mod numbers;
pub mod policy;

use crate::model::{ExtractionWarning, Metric, Month, MonthlySeries};
use month::normalize_month;
use numbers::numeric_tokens;
use policy::ExtractionPolicy;
use serde::Serialize;

/// Result of reading one metric from one page.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyExtraction {
    pub series: MonthlySeries,
    /// One entry per month left absent.
    pub warnings: Vec<ExtractionWarning>,
}

/// Read a twelve-month series from the lines of a single page.
///
/// A line is a month row when its first word normalizes to a month. The
/// value is picked from the row's numeric tokens by `policy`, unit-corrected
/// and rounded to 2 places. The first row that yields a value wins; later
/// rows for the same month are ignored. Months without a usable row are left
/// absent and reported as warnings, never as errors.
pub fn extract_monthly_rows(
    document: &str,
    lines: &[String],
    metric: Metric,
    policy: ExtractionPolicy,
) -> MonthlyExtraction {
    let mut series = MonthlySeries::empty();
    let mut failures: [Option<String>; 12] = Default::default();

    for line in lines {
        let Some(first_word) = line.split_whitespace().next() else {
            continue;
        };
        let Some(month) = normalize_month(first_word) else {
            continue;
        };
        if series.get(month).is_some() {
            continue;
        }

        let tokens = match numeric_tokens(line) {
            Ok(tokens) => tokens,
            Err(bad) => {
                failures[month.index()] = Some(format!(
                    "row '{}' has a number too large to read ({})",
                    line.trim(),
                    bad.0
                ));
                continue;
            }
        };
        match policy.column.select(&tokens) {
            Some(raw) => match policy.unit_rule.apply(raw) {
                Some(value) => {
                    series.set(month, Some(value.round_dp(2)));
                    failures[month.index()] = None;
                }
                None => {
                    failures[month.index()] = Some(format!(
                        "value {raw} in row '{}' is out of range after unit correction",
                        line.trim()
                    ));
                }
            },
            None => {
                failures[month.index()] = Some(format!(
                    "row '{}' has no {} ({} numeric value(s))",
                    line.trim(),
                    policy.column.describe(),
                    tokens.len()
                ));
            }
        }
    }

    let warnings: Vec<ExtractionWarning> = Month::ALL
        .iter()
        .filter(|m| series.get(**m).is_none())
        .map(|m| {
            let reason = failures[m.index()]
                .clone()
                .unwrap_or_else(|| "no row starting with this month on the page".to_string());
            log::warn!("{document}: {metric} for {m} not extracted: {reason}");
            ExtractionWarning {
                document: document.to_string(),
                metric,
                month: *m,
                reason,
            }
        })
        .collect();

    MonthlyExtraction { series, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclaredUnit, SourceFormat};
    use policy::policy_for;
    use rust_decimal_macros::dec;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    fn met_energy() -> ExtractionPolicy {
        policy_for(SourceFormat::Met, Metric::Energy, DeclaredUnit::Kwh)
    }

    #[test]
    fn test_empty_page_gives_twelve_absent_months() {
        let result = extract_monthly_rows("met.pdf", &[], Metric::Energy, met_energy());
        assert_eq!(result.series, MonthlySeries::empty());
        assert_eq!(result.series.values().len(), 12);
        assert_eq!(result.warnings.len(), 12);
        assert_eq!(result.warnings[0].month, Month::Janvier);
        assert_eq!(result.warnings[11].month, Month::Decembre);
    }

    #[test]
    fn test_met_balance_table() {
        let page = lines(&[
            "                Balances and main results",
            "            GlobHor  DiffHor  T_Amb  GlobInc  GlobEff  EArray  E_Grid  PR",
            "            kWh/m²   kWh/m²   °C     kWh/m²   kWh/m²   MWh     MWh     ratio",
            "January     33.7     17.52    3.62   61.3     58.9     3.402   3.311   0.862",
            "February    50.4     25.41    4.55   78.2     75.6     5.001   4.867   0.868",
            "Year        1290.1   589.7    11.8   1437.0   1391.2   111.2   108.1   0.855",
        ]);
        let result = extract_monthly_rows("met.pdf", &page, Metric::Energy, met_energy());
        assert_eq!(result.series.get(Month::Janvier), Some(dec!(3311)));
        assert_eq!(result.series.get(Month::Fevrier), Some(dec!(4867)));
        assert_eq!(result.series.get(Month::Mars), None);
        assert_eq!(result.warnings.len(), 10);

        let irradiation = extract_monthly_rows(
            "met.pdf",
            &page,
            Metric::Irradiation,
            policy_for(SourceFormat::Met, Metric::Irradiation, DeclaredUnit::Kwh),
        );
        assert_eq!(irradiation.series.get(Month::Janvier), Some(dec!(33.7)));
        assert_eq!(irradiation.series.get(Month::Fevrier), Some(dec!(50.4)));
    }

    #[test]
    fn test_pvgis_french_rows_with_decimal_comma() {
        let page = lines(&[
            "Mois     H(i)_m   E_m       SD_m",
            "Janvier  61,3     3594,12   412,5",
            "Février  88,1     6330,4    501,0",
            "Août     201,7    14483     690,2",
        ]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("pvgis.pdf", &page, Metric::Energy, policy);
        assert_eq!(result.series.get(Month::Janvier), Some(dec!(3594.12)));
        assert_eq!(result.series.get(Month::Fevrier), Some(dec!(6330.4)));
        assert_eq!(result.series.get(Month::Aout), Some(dec!(14483)));

        let policy = policy_for(SourceFormat::Pvgis, Metric::Irradiation, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("pvgis.pdf", &page, Metric::Irradiation, policy);
        assert_eq!(result.series.get(Month::Fevrier), Some(dec!(88.1)));
    }

    #[test]
    fn test_first_row_wins() {
        let page = lines(&["March 10 20 30", "March 40 50 60"]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("doc", &page, Metric::Energy, policy);
        assert_eq!(result.series.get(Month::Mars), Some(dec!(20)));
    }

    #[test]
    fn test_malformed_row_is_a_gap_not_an_error() {
        let page = lines(&["April n/a", "May 1 2 3"]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("doc", &page, Metric::Energy, policy);
        assert_eq!(result.series.get(Month::Avril), None);
        assert_eq!(result.series.get(Month::Mai), Some(dec!(2)));
        let april = result
            .warnings
            .iter()
            .find(|w| w.month == Month::Avril)
            .unwrap();
        assert!(april.reason.contains("second-to-last"));
        let june = result.warnings.iter().find(|w| w.month == Month::Juin).unwrap();
        assert!(june.reason.contains("no row"));
    }

    #[test]
    fn test_single_token_row_has_no_energy() {
        let page = lines(&["June 12.5"]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("doc", &page, Metric::Energy, policy);
        assert_eq!(result.series.get(Month::Juin), None);
    }

    #[test]
    fn test_rounding_to_two_places() {
        let page = lines(&["July 1.23456 9.87654 0"]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("doc", &page, Metric::Energy, policy);
        assert_eq!(result.series.get(Month::Juillet), Some(dec!(9.88)));
    }

    #[test]
    fn test_zero_is_a_value() {
        let page = lines(&["December 0 0 0"]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("doc", &page, Metric::Energy, policy);
        assert_eq!(result.series.get(Month::Decembre), Some(dec!(0)));
    }

    #[test]
    fn test_overflowing_value_is_a_gap() {
        let page = lines(&[
            "January 12.5 9999999999999999999999999999 0.8",
            "February 12.5 4.867 0.8",
        ]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Mwh);
        let result = extract_monthly_rows("doc", &page, Metric::Energy, policy);
        assert_eq!(result.series.get(Month::Janvier), None);
        assert_eq!(result.series.get(Month::Fevrier), Some(dec!(4867)));
        let january = result
            .warnings
            .iter()
            .find(|w| w.month == Month::Janvier)
            .unwrap();
        assert!(january.reason.contains("out of range"));
    }

    #[test]
    fn test_unreadable_number_does_not_shift_columns() {
        let page = lines(&[
            "March 12.5 123456789012345678901234567890 0.8",
            "April 10 20 30",
        ]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("doc", &page, Metric::Energy, policy);
        assert_eq!(result.series.get(Month::Mars), None);
        assert_eq!(result.series.get(Month::Avril), Some(dec!(20)));
        let march = result.warnings.iter().find(|w| w.month == Month::Mars).unwrap();
        assert!(march.reason.contains("too large"));
    }

    #[test]
    fn test_line_not_starting_with_month_is_ignored() {
        let page = lines(&["Total January 5 6 7"]);
        let policy = policy_for(SourceFormat::Pvgis, Metric::Energy, DeclaredUnit::Kwh);
        let result = extract_monthly_rows("doc", &page, Metric::Energy, policy);
        assert_eq!(result.series.present_count(), 0);
    }
}
