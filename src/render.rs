//! PDF emission of laid-out pages through `printpdf`.
//!
//! The renderer is a thin drawing layer: every position has already been fixed
//! by [`crate::layout`], so this module only converts top-down millimetre
//! offsets into PDF coordinates, picks fonts and colours from the style table,
//! and serializes the document.
//!
//! Output is byte-for-byte reproducible: dates are fixed to the Unix epoch, no
//! XMP packet or ICC profile is embedded, and the trailer `/ID` is derived from
//! the document content.

use std::collections::HashMap;
use std::io::BufWriter;

use genpdf::style::Color;
use lopdf::Object;
use printpdf::{
    CustomPdfConformance, IndirectFontRef, Line, Mm, OffsetDateTime, PdfConformance, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use uuid::Uuid;

use crate::error::ResumeError;
use crate::fonts::{FontFace, TextMeasure};
use crate::layout::{LayoutSettings, PageCanvas, PageGeometry, PlacedBlock, PlacedContent};
use crate::style::{rgb_components, FontDescriptor, StyleTable};
use crate::wrap;

/// Share of the line height between the top of a line and its baseline.
const BASELINE_RATIO: f64 = 0.8;
const CHIP_BORDER_THICKNESS_PT: f64 = 0.3;
const CHIP_BORDER_COLOR: Color = Color::Rgb(0xd1, 0xd5, 0xdb);
const CONFORMANCE_ID: &str = "resume_pdf";

/// Draws `pages` and returns the serialized PDF.
///
/// `measure` must be the same implementation used for layout so chip boxes
/// line up with the rows computed there.
pub fn render(
    pages: &[PageCanvas],
    styles: &StyleTable,
    measure: &dyn TextMeasure,
    settings: &LayoutSettings,
    title: &str,
) -> Result<Vec<u8>, ResumeError> {
    let first = pages
        .first()
        .ok_or_else(|| ResumeError::Render("document has no pages".to_string()))?;
    let geometry = first.geometry();

    let (document, page_index, layer_index) = PdfDocument::new(
        title,
        Mm(geometry.width_mm),
        Mm(geometry.height_mm),
        "Page 1",
    );
    let document = document
        .with_conformance(PdfConformance::Custom(CustomPdfConformance {
            identifier: CONFORMANCE_ID.to_string(),
            allows_default_fonts: true,
            ..CustomPdfConformance::default()
        }))
        .with_creation_date(OffsetDateTime::unix_epoch())
        .with_mod_date(OffsetDateTime::unix_epoch());
    let mut painter = Painter {
        document: &document,
        fonts: HashMap::new(),
        styles,
        measure,
        settings,
    };

    let first_layer = document.get_page(page_index).get_layer(layer_index);
    painter.draw_page(&first_layer, first)?;

    for (index, page) in pages.iter().enumerate().skip(1) {
        let geometry = page.geometry();
        let (page_index, layer_index) = document.add_page(
            Mm(geometry.width_mm),
            Mm(geometry.height_mm),
            format!("Page {}", index + 1),
        );
        let layer = document.get_page(page_index).get_layer(layer_index);
        painter.draw_page(&layer, page)?;
    }

    let mut writer = BufWriter::new(Vec::new());
    document.save(&mut writer).map_err(render_error)?;
    let bytes = writer.into_inner().map_err(render_error)?;
    pin_document_id(&bytes)
}

fn render_error(err: impl std::fmt::Display) -> ResumeError {
    ResumeError::Render(err.to_string())
}

/// Replaces the random trailer `/ID` written by `printpdf` with a UUID v5 of
/// the document serialized without one.
fn pin_document_id(pdf_bytes: &[u8]) -> Result<Vec<u8>, ResumeError> {
    let mut document = lopdf::Document::load_mem(pdf_bytes).map_err(render_error)?;
    document.trailer.remove(b"ID");

    let mut unpinned = Vec::with_capacity(pdf_bytes.len());
    document.save_to(&mut unpinned).map_err(render_error)?;
    let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, &unpinned).simple().to_string();

    document.trailer.set(
        "ID",
        Object::Array(vec![
            Object::string_literal(id.as_str()),
            Object::string_literal(id.as_str()),
        ]),
    );
    let mut pinned = Vec::with_capacity(unpinned.len());
    document.save_to(&mut pinned).map_err(render_error)?;
    Ok(pinned)
}

fn pdf_color(color: Color) -> printpdf::Color {
    let (r, g, b) = rgb_components(color);
    printpdf::Color::Rgb(Rgb::new(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        None,
    ))
}

fn point(geometry: &PageGeometry, x_mm: f64, top_mm: f64) -> (Point, bool) {
    (Point::new(Mm(x_mm), Mm(geometry.height_mm - top_mm)), false)
}

struct Painter<'a> {
    document: &'a PdfDocumentReference,
    fonts: HashMap<FontFace, IndirectFontRef>,
    styles: &'a StyleTable,
    measure: &'a dyn TextMeasure,
    settings: &'a LayoutSettings,
}

impl Painter<'_> {
    fn font(&mut self, face: FontFace) -> Result<IndirectFontRef, ResumeError> {
        if let Some(font) = self.fonts.get(&face) {
            return Ok(font.clone());
        }
        let font = self
            .document
            .add_builtin_font(face.builtin())
            .map_err(render_error)?;
        self.fonts.insert(face, font.clone());
        Ok(font)
    }

    fn draw_page(&mut self, layer: &PdfLayerReference, page: &PageCanvas) -> Result<(), ResumeError> {
        for block in page.blocks() {
            let style = self.styles.descriptor(block.style)?.clone();
            match &block.content {
                PlacedContent::Lines(lines) => self.draw_lines(layer, page.geometry(), block, &style, lines)?,
                PlacedContent::Chips(rows) => self.draw_chips(layer, page.geometry(), block, &style, rows)?,
                PlacedContent::Rule => self.draw_rule(layer, page.geometry(), block, &style),
            }
        }
        Ok(())
    }

    fn draw_lines(
        &mut self,
        layer: &PdfLayerReference,
        geometry: &PageGeometry,
        block: &PlacedBlock,
        style: &FontDescriptor,
        lines: &[String],
    ) -> Result<(), ResumeError> {
        let font = self.font(style.face)?;
        let line_height = style.size_pt * self.settings.line_height_mm_per_pt;
        layer.set_fill_color(pdf_color(style.color));

        for (index, line) in lines.iter().enumerate() {
            let baseline = block.top_mm + index as f64 * line_height + line_height * BASELINE_RATIO;
            layer.use_text(
                line.as_str(),
                style.size_pt,
                Mm(geometry.margin_left_mm),
                Mm(geometry.height_mm - baseline),
                &font,
            );
        }
        Ok(())
    }

    fn draw_chips(
        &mut self,
        layer: &PdfLayerReference,
        geometry: &PageGeometry,
        block: &PlacedBlock,
        style: &FontDescriptor,
        rows: &[Vec<String>],
    ) -> Result<(), ResumeError> {
        let font = self.font(style.face)?;
        let settings = self.settings;
        let line_height = style.size_pt * settings.line_height_mm_per_pt;
        let row_height = line_height + 2.0 * settings.chip_padding_y_mm;

        for (row_index, row) in rows.iter().enumerate() {
            let row_top = block.top_mm + row_index as f64 * (row_height + settings.chip_row_gap_mm);
            let mut x = geometry.margin_left_mm;

            for label in row {
                let width = wrap::chip_width(label, style, self.measure, settings.chip_padding_x_mm);
                let row_bottom = row_top + row_height;

                if let Some(fill) = style.fill {
                    layer.set_fill_color(pdf_color(fill));
                }
                layer.set_outline_color(pdf_color(CHIP_BORDER_COLOR));
                layer.set_outline_thickness(CHIP_BORDER_THICKNESS_PT);
                layer.add_shape(Line {
                    points: vec![
                        point(geometry, x, row_top),
                        point(geometry, x + width, row_top),
                        point(geometry, x + width, row_bottom),
                        point(geometry, x, row_bottom),
                    ],
                    is_closed: true,
                    has_fill: style.fill.is_some(),
                    has_stroke: true,
                    is_clipping_path: false,
                });

                let baseline = row_top + settings.chip_padding_y_mm + line_height * BASELINE_RATIO;
                layer.set_fill_color(pdf_color(style.color));
                layer.use_text(
                    label.as_str(),
                    style.size_pt,
                    Mm(x + settings.chip_padding_x_mm),
                    Mm(geometry.height_mm - baseline),
                    &font,
                );

                x += width + settings.chip_gap_mm;
            }
        }
        Ok(())
    }

    fn draw_rule(
        &self,
        layer: &PdfLayerReference,
        geometry: &PageGeometry,
        block: &PlacedBlock,
        style: &FontDescriptor,
    ) {
        layer.set_outline_color(pdf_color(style.color));
        layer.set_outline_thickness(self.settings.rule_thickness_pt);
        layer.add_shape(Line {
            points: vec![
                point(geometry, geometry.margin_left_mm, block.top_mm),
                point(geometry, geometry.width_mm - geometry.margin_right_mm, block.top_mm),
            ],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::ContentBlock;
    use crate::fonts::BuiltinMetrics;
    use crate::layout::layout;

    fn pages(blocks: &[ContentBlock]) -> Vec<PageCanvas> {
        layout(
            blocks,
            &PageGeometry::default(),
            &StyleTable::default(),
            &BuiltinMetrics,
            &LayoutSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn renders_pdf_header() {
        let pages = pages(&[
            ContentBlock::title("Jane Doe"),
            ContentBlock::divider(),
            ContentBlock::chips(["Rust", "PDF"]),
        ]);
        let bytes = render(
            &pages,
            &StyleTable::default(),
            &BuiltinMetrics,
            &LayoutSettings::default(),
            "Jane Doe",
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    fn render_default(pages: &[PageCanvas]) -> Vec<u8> {
        render(
            pages,
            &StyleTable::default(),
            &BuiltinMetrics,
            &LayoutSettings::default(),
            "Jane Doe",
        )
        .unwrap()
    }

    #[test]
    fn identical_pages_render_identical_bytes() {
        let pages = pages(&[
            ContentBlock::title("Jane Doe"),
            ContentBlock::divider(),
            ContentBlock::body("Builds document pipelines."),
        ]);
        assert_eq!(render_default(&pages), render_default(&pages));
    }

    #[test]
    fn document_id_follows_content() {
        let first = render_default(&pages(&[ContentBlock::title("Jane Doe")]));
        let second = render_default(&pages(&[ContentBlock::title("John Roe")]));

        let trailer_id = |bytes: &[u8]| -> Vec<Vec<u8>> {
            let document = lopdf::Document::load_mem(bytes).unwrap();
            let Ok(Object::Array(parts)) = document.trailer.get(b"ID") else {
                panic!("trailer ID is not an array");
            };
            parts
                .iter()
                .map(|part| part.as_str().unwrap().to_vec())
                .collect()
        };
        let id = trailer_id(&first);
        assert_eq!(id.len(), 2);
        assert_eq!(id[0], id[1]);
        assert_eq!(id[0].len(), 32);
        assert_ne!(id, trailer_id(&second));
    }

    #[test]
    fn output_carries_no_xmp_packet_or_icc_profile() {
        let bytes = render_default(&pages(&[ContentBlock::title("Jane Doe")]));
        let contains = |needle: &[u8]| bytes.windows(needle.len()).any(|window| window == needle);

        assert!(!contains(b"/OutputIntents"));
        assert!(!contains(b"x:xmpmeta"));
        assert!(contains(b"(D:19700101000000"));
        assert!(bytes.len() < 100_000, "one page took {} bytes", bytes.len());
    }

    #[test]
    fn empty_page_list_is_an_error() {
        let err = render(
            &[],
            &StyleTable::default(),
            &BuiltinMetrics,
            &LayoutSettings::default(),
            "empty",
        )
        .unwrap_err();
        assert!(matches!(err, ResumeError::Render(_)));
    }
}
