use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Signed, optionally fractional numbers: "12", "-3.5", ".75", "+4".
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.?\d+").expect("number pattern is valid"));

/// A numeric token too large for a `Decimal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadableNumber(pub String);

/// Parse every numeric token on a line, in order of appearance.
///
/// Decimal commas are turned into points first, so "12,5" reads as 12.5.
/// Thousands separators are not recognized: "1,234" reads as 1.234, like the
/// vendor tables that never group digits.
///
/// Fails on the first token that cannot be represented; skipping it would
/// shift the column positions of the tokens after it.
pub fn numeric_tokens(line: &str) -> Result<Vec<Decimal>, UnreadableNumber> {
    let normalized = line.replace(',', ".");
    NUMBER
        .find_iter(&normalized)
        .map(|m| {
            parse_decimal(m.as_str()).ok_or_else(|| UnreadableNumber(m.as_str().to_string()))
        })
        .collect()
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let unsigned = s.strip_prefix('+').unwrap_or(s);
    let (sign, digits) = match unsigned.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", unsigned),
    };
    let text = if digits.starts_with('.') {
        format!("{sign}0{digits}")
    } else {
        format!("{sign}{digits}")
    };
    match Decimal::from_str(&text) {
        Ok(d) => Some(d),
        Err(e) => {
            log::debug!("skipping numeric token '{s}': {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_met_row() {
        let tokens = numeric_tokens("January    33.7   12.52   3.62   45.23   3.311   3.232").unwrap();
        assert_eq!(
            tokens,
            vec![dec!(33.7), dec!(12.52), dec!(3.62), dec!(45.23), dec!(3.311), dec!(3.232)]
        );
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(numeric_tokens("Février 48,2 4867,0 1").unwrap(), vec![dec!(48.2), dec!(4867.0), dec!(1)]);
    }

    #[test]
    fn test_signs_and_leading_point() {
        assert_eq!(numeric_tokens("x -1.5 +2 .75").unwrap(), vec![dec!(-1.5), dec!(2), dec!(0.75)]);
    }

    #[test]
    fn test_oversized_token_fails_the_row() {
        let huge = "123456789012345678901234567890";
        assert_eq!(
            numeric_tokens(&format!("January 12.5 {huge} 0.8")),
            Err(UnreadableNumber(huge.to_string()))
        );
    }

    #[test]
    fn test_no_numbers() {
        assert!(numeric_tokens("Janvier  -  n/a").unwrap().is_empty());
    }

    #[test]
    fn test_digits_inside_words() {
        // "E_Grid2" still yields its digit, as in the vendor text layer
        assert_eq!(numeric_tokens("E_Grid2 10").unwrap(), vec![dec!(2), dec!(10)]);
    }
}
