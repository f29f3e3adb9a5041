use crate::extraction::PageContent;
use crate::model::SourceFormat;

/// Number of leading pages searched for vendor markers.
pub const DETECTION_PAGES: usize = 3;

const SIMULATION_TOOL_MARKER: &str = "pvsyst";
const WEATHER_SOURCE_MARKER: &str = "meteonorm";
const SATELLITE_SERVICE_MARKERS: &[&str] = &["pvgis", "photovoltaic geographical information system"];

/// Classify a document from the text of its first pages.
pub fn detect_format(pages: &[PageContent]) -> SourceFormat {
    let text = pages
        .iter()
        .take(DETECTION_PAGES)
        .flat_map(|p| p.lines.iter().map(|s| s.as_str()))
        .collect::<Vec<_>>()
        .join("\n");
    detect_format_text(&text)
}

/// Classify a document from already-concatenated leading text.
///
/// A simulation report only counts as MET when it also names the weather
/// database; the satellite service wins otherwise. Matching ignores case.
pub fn detect_format_text(text: &str) -> SourceFormat {
    let lower = text.to_lowercase();

    if lower.contains(SIMULATION_TOOL_MARKER) && lower.contains(WEATHER_SOURCE_MARKER) {
        SourceFormat::Met
    } else if SATELLITE_SERVICE_MARKERS.iter().any(|m| lower.contains(m)) {
        SourceFormat::Pvgis
    } else {
        SourceFormat::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_met_needs_both_markers() {
        assert_eq!(
            detect_format_text("PVsyst V7.4.0\nMeteo data: Meteonorm 8.1"),
            SourceFormat::Met
        );
        assert_eq!(detect_format_text("PVsyst V7.4.0"), SourceFormat::Unknown);
        assert_eq!(detect_format_text("Meteonorm 8.1"), SourceFormat::Unknown);
    }

    #[test]
    fn test_pvgis_by_abbreviation_or_full_name() {
        assert_eq!(detect_format_text("Performance of grid-connected PV: PVGIS-5"), SourceFormat::Pvgis);
        assert_eq!(
            detect_format_text("Photovoltaic Geographical Information System - European Commission"),
            SourceFormat::Pvgis
        );
    }

    #[test]
    fn test_met_wins_over_pvgis_mention() {
        assert_eq!(
            detect_format_text("PVsyst, Meteonorm 8.1, compared with PVGIS"),
            SourceFormat::Met
        );
    }

    #[test]
    fn test_only_leading_pages_are_searched() {
        let pages = vec![
            page(1, &["Cover"]),
            page(2, &["Summary"]),
            page(3, &["Losses"]),
            page(4, &["Source: PVGIS"]),
        ];
        assert_eq!(detect_format(&pages), SourceFormat::Unknown);

        let pages = vec![page(1, &["PVsyst"]), page(2, &["Meteonorm"])];
        assert_eq!(detect_format(&pages), SourceFormat::Met);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(detect_format(&[]), SourceFormat::Unknown);
    }
}
