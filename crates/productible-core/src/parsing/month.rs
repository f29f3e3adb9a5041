use crate::error::ProductibleError;
use crate::model::Month;
use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase a token and remove its diacritics.
///
/// Uses canonical decomposition (NFD) and drops the combining marks, so
/// "Février", "FÉVRIER" and "fevrier" all become "fevrier".
pub fn strip_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Map a raw month token (French or English, any case, with or without
/// accents) to its canonical month.
///
/// Returns `None` when the token is not a month name; callers treat that as
/// "this line is not a month row".
pub fn normalize_month(token: &str) -> Option<Month> {
    MONTHS.get(strip_accents(token.trim()).as_str()).copied()
}

/// Same as [`normalize_month`] for a token that has not been decoded yet.
///
/// Fails with `InvalidInput` when the bytes are not UTF-8 text.
pub fn normalize_month_bytes(token: &[u8]) -> Result<Option<Month>, ProductibleError> {
    let text = std::str::from_utf8(token).map_err(|e| {
        ProductibleError::InvalidInput(format!("month token is not valid UTF-8 text: {e}"))
    })?;
    Ok(normalize_month(text))
}

static MONTHS: LazyLock<HashMap<&'static str, Month>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("january", Month::Janvier);
    m.insert("janvier", Month::Janvier);
    m.insert("february", Month::Fevrier);
    m.insert("fevrier", Month::Fevrier);
    m.insert("march", Month::Mars);
    m.insert("mars", Month::Mars);
    m.insert("april", Month::Avril);
    m.insert("avril", Month::Avril);
    m.insert("may", Month::Mai);
    m.insert("mai", Month::Mai);
    m.insert("june", Month::Juin);
    m.insert("juin", Month::Juin);
    m.insert("july", Month::Juillet);
    m.insert("juillet", Month::Juillet);
    m.insert("august", Month::Aout);
    m.insert("aout", Month::Aout);
    m.insert("september", Month::Septembre);
    m.insert("septembre", Month::Septembre);
    m.insert("october", Month::Octobre);
    m.insert("octobre", Month::Octobre);
    m.insert("november", Month::Novembre);
    m.insert("novembre", Month::Novembre);
    m.insert("december", Month::Decembre);
    m.insert("decembre", Month::Decembre);

    m
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_accents() {
        assert_eq!(strip_accents("Février"), "fevrier");
        assert_eq!(strip_accents("Mars"), "mars");
        assert_eq!(strip_accents("AOÛT"), "aout");
        assert_eq!(strip_accents("Décembre"), "decembre");
    }

    #[test]
    fn test_strip_accents_decomposes_precomposed_and_combining() {
        // precomposed U+00E9 and e + U+0301 must agree
        assert_eq!(strip_accents("F\u{e9}vrier"), strip_accents("Fe\u{301}vrier"));
    }

    #[test]
    fn test_french_and_english_agree() {
        assert_eq!(normalize_month("January"), Some(Month::Janvier));
        assert_eq!(normalize_month("janvier"), Some(Month::Janvier));
        assert_eq!(normalize_month("August"), Some(Month::Aout));
        assert_eq!(normalize_month("août"), Some(Month::Aout));
        assert_eq!(normalize_month("Aout"), Some(Month::Aout));
        assert_eq!(normalize_month("MAY"), Some(Month::Mai));
    }

    #[test]
    fn test_every_canonical_name_is_idempotent() {
        for month in Month::ALL {
            assert_eq!(normalize_month(month.name()), Some(month));
            let lower = month.name().to_lowercase();
            assert_eq!(normalize_month(&lower), Some(month));
            assert_eq!(normalize_month(&strip_accents(month.name())), Some(month));
        }
    }

    #[test]
    fn test_non_month_tokens() {
        assert_eq!(normalize_month("Year"), None);
        assert_eq!(normalize_month("Année"), None);
        assert_eq!(normalize_month("Jan"), None);
        assert_eq!(normalize_month(""), None);
    }

    #[test]
    fn test_bytes_must_be_text() {
        assert_eq!(
            normalize_month_bytes("Décembre".as_bytes()).unwrap(),
            Some(Month::Decembre)
        );
        assert!(matches!(
            normalize_month_bytes(&[0x46, 0xff, 0xfe]),
            Err(ProductibleError::InvalidInput(_))
        ));
    }
}
