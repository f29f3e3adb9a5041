use crate::model::{DeclaredUnit, Metric, SourceFormat};
use rust_decimal::Decimal;
use serde::Serialize;

/// Energy values below this on a MET report are in MWh, not kWh.
pub const MET_SMALL_VALUE_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

pub const MWH_TO_KWH: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Which numeric token of a month row holds the wanted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSelector {
    First,
    SecondToLast,
}

impl ColumnSelector {
    pub fn select(self, tokens: &[Decimal]) -> Option<Decimal> {
        match self {
            ColumnSelector::First => tokens.first().copied(),
            ColumnSelector::SecondToLast => {
                if tokens.len() < 2 {
                    None
                } else {
                    Some(tokens[tokens.len() - 2])
                }
            }
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ColumnSelector::First => "first numeric column",
            ColumnSelector::SecondToLast => "second-to-last numeric column",
        }
    }
}

/// Unit correction applied to the selected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum UnitRule {
    Keep,
    Scale { factor: Decimal },
    /// Scale only values strictly below `threshold`.
    ScaleBelow { threshold: Decimal, factor: Decimal },
}

impl UnitRule {
    /// The corrected value, or `None` when scaling overflows.
    pub fn apply(self, value: Decimal) -> Option<Decimal> {
        match self {
            UnitRule::Keep => Some(value),
            UnitRule::Scale { factor } => value.checked_mul(factor),
            UnitRule::ScaleBelow { threshold, factor } => {
                if value < threshold {
                    value.checked_mul(factor)
                } else {
                    Some(value)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractionPolicy {
    pub column: ColumnSelector,
    pub unit_rule: UnitRule,
}

/// Look up how to read `metric` from a document of the given format.
///
/// An explicit MWh declaration scales every energy value; otherwise only MET
/// reports get the small-value correction. Unknown formats fall back to
/// reading values as they are.
pub fn policy_for(format: SourceFormat, metric: Metric, declared: DeclaredUnit) -> ExtractionPolicy {
    match (metric, declared, format) {
        (Metric::Irradiation, _, _) => ExtractionPolicy {
            column: ColumnSelector::First,
            unit_rule: UnitRule::Keep,
        },
        (Metric::Energy, DeclaredUnit::Mwh, _) => ExtractionPolicy {
            column: ColumnSelector::SecondToLast,
            unit_rule: UnitRule::Scale {
                factor: MWH_TO_KWH,
            },
        },
        (Metric::Energy, DeclaredUnit::Kwh, SourceFormat::Met) => ExtractionPolicy {
            column: ColumnSelector::SecondToLast,
            unit_rule: UnitRule::ScaleBelow {
                threshold: MET_SMALL_VALUE_THRESHOLD,
                factor: MWH_TO_KWH,
            },
        },
        (Metric::Energy, DeclaredUnit::Kwh, SourceFormat::Pvgis | SourceFormat::Unknown) => {
            ExtractionPolicy {
                column: ColumnSelector::SecondToLast,
                unit_rule: UnitRule::Keep,
            }
        }
    }
}
