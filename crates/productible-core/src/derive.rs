use crate::error::ProductibleError;
use crate::model::{AnnualProbability, MonthlySeries};
use rust_decimal::Decimal;

/// Single proportional adjustment from P50 to P90, shared by both sources.
///
/// `((P90_a + P90_b)/2 - (P50_a + P50_b)/2) / ((P50_a + P50_b)/2)`, rounded
/// to 4 places. Usually negative; no sign is enforced.
pub fn uplift_ratio(
    a: AnnualProbability,
    b: AnnualProbability,
) -> Result<Decimal, ProductibleError> {
    for (label, p) in [("first source", a), ("second source", b)] {
        if p.p50_mwh <= Decimal::ZERO || p.p90_mwh <= Decimal::ZERO {
            return Err(ProductibleError::InvalidInput(format!(
                "annual P50/P90 of the {label} must be positive (got P50 {} MWh, P90 {} MWh)",
                p.p50_mwh, p.p90_mwh
            )));
        }
    }

    let out_of_range = || {
        ProductibleError::InvalidInput(format!(
            "annual P50/P90 figures are out of range (P50 {} and {} MWh, P90 {} and {} MWh)",
            a.p50_mwh, b.p50_mwh, a.p90_mwh, b.p90_mwh
        ))
    };
    let mean = |x: Decimal, y: Decimal| x.checked_add(y).map(|sum| sum / Decimal::TWO);

    let p50_mean = mean(a.p50_mwh, b.p50_mwh).ok_or_else(out_of_range)?;
    let p90_mean = mean(a.p90_mwh, b.p90_mwh).ok_or_else(out_of_range)?;
    let ratio = (p90_mean - p50_mean)
        .checked_div(p50_mean)
        .ok_or_else(out_of_range)?
        .round_dp(4);

    log::debug!("P50 mean {p50_mean} MWh, P90 mean {p90_mean} MWh, uplift {ratio}");
    Ok(ratio)
}

/// Scale every present month by `1 + uplift`, rounded to 2 places.
///
/// A month whose scaled value overflows is left absent.
pub fn apply_uplift(series: &MonthlySeries, uplift: Decimal) -> MonthlySeries {
    let Some(factor) = Decimal::ONE.checked_add(uplift) else {
        log::warn!("uplift {uplift} is out of range, P90 months left empty");
        return MonthlySeries::empty();
    };
    series.and_then(|v| match v.checked_mul(factor) {
        Some(scaled) => Some(scaled.round_dp(2)),
        None => {
            log::warn!("P90 of {v} with uplift {uplift} is out of range, month left empty");
            None
        }
    })
}

/// Monthly P90 series for both sources, from one shared uplift ratio.
pub fn derive_p90(
    series_a: &MonthlySeries,
    series_b: &MonthlySeries,
    a: AnnualProbability,
    b: AnnualProbability,
) -> Result<(MonthlySeries, MonthlySeries), ProductibleError> {
    let uplift = uplift_ratio(a, b)?;
    Ok((apply_uplift(series_a, uplift), apply_uplift(series_b, uplift)))
}

/// Month-by-month mean of two series, rounded to 2 places.
///
/// A month is absent when either side is absent, or when the sum
/// overflows. Zero is a present value.
pub fn average_series(a: &MonthlySeries, b: &MonthlySeries) -> MonthlySeries {
    let mut values = [None; 12];
    for (slot, (x, y)) in values.iter_mut().zip(a.values().iter().zip(b.values())) {
        *slot = match (x, y) {
            (Some(x), Some(y)) => x
                .checked_add(*y)
                .map(|sum| (sum / Decimal::TWO).round_dp(2)),
            _ => None,
        };
    }
    MonthlySeries::from_values(values)
}
