//! PDF output: the generated report pages and the annex concatenation.
//!
//! Pages are drawn with the standard Helvetica fonts, so no font files are
//! embedded. Layout follows a simple top-down flow: logo, title, site
//! details, then the four tables with a page break after the first two.

pub mod canvas;
pub mod logo;
pub mod merge;

use crate::error::ProductibleError;
use crate::model::SiteInfo;
use crate::tables::{ReportTable, ReportTables};
use canvas::{text_width, Canvas, Font, Rgb, BOTTOM, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, Stream};
pub use logo::Logo;

const TITLE: &str = "Rapport Productible MET / PVGIS";

const GREY: Rgb = (0.502, 0.502, 0.502);
const LIGHT_BLUE: Rgb = (0.678, 0.847, 0.902);
const LIGHT_GREEN: Rgb = (0.565, 0.933, 0.565);
const LIGHT_GREY: Rgb = (0.827, 0.827, 0.827);

const LOGO_WIDTH: f32 = 108.0;
const LOGO_HEIGHT: f32 = 50.4;
const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const CELL_SIZE: f32 = 9.0;
const ROW_HEIGHT: f32 = 16.0;
const CELL_PADDING: f32 = 6.0;

/// Details printed above the tables.
#[derive(Debug, Clone)]
pub struct ReportMetadata {
    pub site: SiteInfo,
    /// Study date, already formatted as DD/MM/YYYY.
    pub date: String,
}

impl ReportMetadata {
    fn paragraphs(&self) -> Vec<(&'static str, String)> {
        let site = &self.site;
        vec![
            ("Code chantier :", site.site_code.clone()),
            (
                "Chargé(e) d'étude :",
                site.analyst.clone().unwrap_or_default(),
            ),
            ("Date de l'étude :", self.date.clone()),
            ("Inclinaison :", format!("{}°", site.tilt_deg)),
            ("Orientation :", format!("{}°", site.orientation_deg)),
            ("Direction :", site.direction.clone()),
            (
                "Puissance projet/ Commentaire:",
                site.comment.clone().unwrap_or_default(),
            ),
        ]
    }
}

/// Render the report pages to PDF bytes.
pub fn render_report(
    tables: &ReportTables,
    metadata: &ReportMetadata,
    logo: Option<&Logo>,
) -> Result<Vec<u8>, ProductibleError> {
    let mut canvas = Canvas::new();

    if logo.is_some() {
        canvas.y -= LOGO_HEIGHT;
        canvas.image(
            b"Im1",
            (PAGE_WIDTH - LOGO_WIDTH) / 2.0,
            canvas.y,
            LOGO_WIDTH,
            LOGO_HEIGHT,
        );
    }
    canvas.space(2.0);

    canvas.space(TITLE_SIZE + 6.0);
    let title_width = text_width(TITLE, Font::Bold, TITLE_SIZE);
    canvas.text(
        (PAGE_WIDTH - title_width) / 2.0,
        canvas.y,
        Font::Bold,
        TITLE_SIZE,
        TITLE,
    );
    canvas.space(12.0);

    for (label, value) in metadata.paragraphs() {
        canvas.ensure_room(BODY_SIZE + 2.0);
        canvas.space(BODY_SIZE + 2.0);
        let label = format!("{label} ");
        canvas.text_runs(
            MARGIN,
            canvas.y,
            &[
                (Font::Bold, BODY_SIZE, label.as_str()),
                (Font::Regular, BODY_SIZE, value.as_str()),
            ],
        );
    }
    canvas.space(2.0);

    draw_table(&mut canvas, &tables.data, GREY);
    canvas.page_break();
    draw_table(&mut canvas, &tables.p90, LIGHT_BLUE);
    canvas.page_break();
    draw_table(&mut canvas, &tables.irradiation, LIGHT_GREEN);
    canvas.space(6.0);
    draw_table(&mut canvas, &tables.probability, LIGHT_GREY);

    let pages = canvas.finish();
    log::debug!("rendering {} report page(s)", pages.len());
    build_document(pages, logo)
}

/// Bold heading, then a centred grid with a coloured header row.
///
/// Rows that do not fit continue on the next page.
fn draw_table(canvas: &mut Canvas, table: &ReportTable, header_color: Rgb) {
    canvas.ensure_room(HEADING_SIZE + 8.0 + 2.0 * ROW_HEIGHT);
    canvas.space(HEADING_SIZE + 8.0);
    canvas.text(MARGIN, canvas.y, Font::Bold, HEADING_SIZE, &table.title);
    canvas.space(6.0);

    let widths = column_widths(table);
    let total: f32 = widths.iter().sum();
    let left = ((PAGE_WIDTH - total) / 2.0).max(MARGIN / 2.0);

    draw_row(canvas, &table.headers, &widths, left, Font::Bold, Some(header_color));
    for row in &table.rows {
        if canvas.y - ROW_HEIGHT < BOTTOM {
            canvas.page_break();
        }
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        draw_row(canvas, &cells, &widths, left, Font::Regular, None);
    }
    canvas.space(4.0);
}

fn draw_row(
    canvas: &mut Canvas,
    cells: &[String],
    widths: &[f32],
    left: f32,
    font: Font,
    background: Option<Rgb>,
) {
    let top = canvas.y;
    let bottom = top - ROW_HEIGHT;
    let total: f32 = widths.iter().sum();

    if let Some(color) = background {
        canvas.fill_rect(left, bottom, total, ROW_HEIGHT, color);
    }

    let mut x = left;
    for (cell, width) in cells.iter().zip(widths) {
        let w = text_width(cell, font, CELL_SIZE);
        canvas.text(x + (width - w) / 2.0, bottom + 5.0, font, CELL_SIZE, cell);
        canvas.line((x, bottom), (x, top), 1.0);
        x += width;
    }
    canvas.line((x, bottom), (x, top), 1.0);
    canvas.line((left, top), (left + total, top), 1.0);
    canvas.line((left, bottom), (left + total, bottom), 1.0);

    canvas.y = bottom;
}

fn column_widths(table: &ReportTable) -> Vec<f32> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let widest_cell = table
                .rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| text_width(&c.to_string(), Font::Regular, CELL_SIZE))
                .fold(0.0f32, f32::max);
            text_width(header, Font::Bold, CELL_SIZE).max(widest_cell) + 2.0 * CELL_PADDING
        })
        .collect()
}

fn build_document(
    pages: Vec<Vec<lopdf::content::Operation>>,
    logo: Option<&Logo>,
) -> Result<Vec<u8>, ProductibleError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut resources = dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    };
    if let Some(logo) = logo {
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(logo.width),
                "Height" => i64::from(logo.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            logo.rgb.clone(),
        );
        let image_id = doc.add_object(image);
        resources.set("XObject", dictionary! { "Im1" => image_id });
    }
    let resources_id = doc.add_object(resources);

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box(),
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ProductibleError::Render(e.to_string()))?;
    Ok(out)
}

fn media_box() -> Vec<Object> {
    vec![
        0.into(),
        0.into(),
        (PAGE_WIDTH as i64).into(),
        (PAGE_HEIGHT as i64).into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnualProbability, MonthlySeries};
    use crate::tables::{build_tables, ReportSeries};
    use rust_decimal_macros::dec;

    fn tables() -> ReportTables {
        let flat = MonthlySeries::from_values([Some(dec!(1234.56)); 12]);
        let series = ReportSeries {
            energy_met: flat,
            energy_pvgis: flat,
            irradiation_met: flat,
            irradiation_pvgis: flat,
            p90_met: flat,
            p90_pvgis: flat,
            p90_average: flat,
            irradiation_average: MonthlySeries::empty(),
        };
        build_tables(
            &series,
            AnnualProbability::new(dec!(108.13), dec!(101.86)),
            AnnualProbability::new(dec!(113.11), dec!(106.54)),
        )
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            site: SiteInfo {
                site_code: "CH-042".into(),
                analyst: Some("A. Martin".into()),
                tilt_deg: 20,
                orientation_deg: 180,
                direction: "Est".into(),
                comment: Some("250 kWc".into()),
            },
            date: "18/10/2026".into(),
        }
    }

    #[test]
    fn test_render_produces_three_pages() {
        let bytes = render_report(&tables(), &metadata(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_render_with_logo() {
        let logo = Logo::from_bytes(&logo::tests::png_logo(300, 140)).unwrap();
        let bytes = render_report(&tables(), &metadata(), Some(&logo)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        let image = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .find(|s| {
                s.dict.get(b"Subtype").and_then(|t| t.as_name()).ok() == Some(b"Image".as_slice())
            })
            .unwrap();
        assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 300);
        assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 140);
        let samples = match image.decompressed_content() {
            Ok(samples) => samples,
            Err(_) => image.content.clone(),
        };
        assert_eq!(samples.len(), 300 * 140 * 3);
    }

    #[test]
    fn test_rendered_text_contains_site_details() {
        let bytes = render_report(&tables(), &metadata(), None).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("CH-042"));
        assert!(text.contains("18/10/2026"));
    }

    #[test]
    fn test_column_widths_fit_headers() {
        let t = tables();
        let widths = column_widths(&t.data);
        assert_eq!(widths.len(), t.data.headers.len());
        for (w, h) in widths.iter().zip(&t.data.headers) {
            assert!(*w >= text_width(h, Font::Bold, CELL_SIZE));
        }
        let total: f32 = widths.iter().sum();
        assert!(total < PAGE_WIDTH);
    }
}
